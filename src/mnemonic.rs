// Deterministic entropy from BIP32 keychains (BIP85).
//
// SPDX-License-Identifier: Apache-2.0
//
// Written in 2020-2024 by
//     Dr Maxim Orlovsky <orlovsky@lnp-bp.org>
//
// Copyright (C) 2020-2024 LNP/BP Standards Association. All rights reserved.
// Copyright (C) 2020-2024 Dr Maxim Orlovsky. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use bip39::Mnemonic;
use derive::Xpriv;
use zeroize::Zeroize;

use crate::{Entropy, Error, Language, WordCount};

/// Encodes the leading part of the entropy as a BIP39 mnemonic of the
/// requested length. Only the first [`WordCount::entropy_len`] bytes are used.
pub fn entropy_to_mnemonic(
    entropy: &Entropy,
    language: Language,
    words: WordCount,
) -> Result<Mnemonic, Error> {
    let len = words.entropy_len();
    let mnemonic = Mnemonic::from_entropy_in(language.into(), &entropy.as_bytes()[..len])?;
    debug_assert_eq!(mnemonic.word_count(), words.count());
    Ok(mnemonic)
}

/// Restores BIP32 root key from a BIP39 mnemonic and an optional passphrase
/// (use an empty string for none).
pub fn root_from_mnemonic(
    mnemonic: &Mnemonic,
    passphrase: &str,
    testnet: bool,
) -> Result<Xpriv, Error> {
    let mut seed = mnemonic.to_seed(passphrase);
    let root = Xpriv::new_master(testnet, &seed);
    seed.zeroize();
    Ok(root?)
}
