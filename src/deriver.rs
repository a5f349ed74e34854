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

use crate::{
    entropy_to_hex, entropy_to_mnemonic, entropy_to_xprv, Application, Entropy, Error, HexSecret,
    KeySource, Language, WordCount,
};

/// Derives BIP85 entropy for an application at the given index.
///
/// Every call derives the child key from scratch; nothing is cached between
/// calls.
pub fn derive_entropy<K: KeySource + ?Sized>(
    root: &K,
    app: &Application,
    index: u32,
) -> Result<Entropy, Error> {
    let path = app.path(index).map_err(|err| {
        debug!(%app, index, %err, "BIP85 request rejected");
        err
    })?;
    trace!(%app, %path, "deriving BIP85 entropy");
    let secret = root.derive_secret(&path)?;
    Ok(Entropy::from_child_secret(&secret))
}

/// Derives English BIP39 mnemonic with `word_count` words, which must be 12,
/// 18 or 24.
pub fn derive_mnemonic<K: KeySource + ?Sized>(
    root: &K,
    word_count: usize,
    index: u32,
) -> Result<Mnemonic, Error> {
    let words = WordCount::try_from(word_count)?;
    root.bip85_mnemonic(Language::English, words, index)
}

/// Derives BIP32 root extended private key.
pub fn derive_xprv<K: KeySource + ?Sized>(root: &K, index: u32) -> Result<Xpriv, Error> {
    root.bip85_xprv(index)
}

/// Derives a secret of `num_bytes` bytes, which must lie in range 16..=64.
pub fn derive_hex<K: KeySource + ?Sized>(
    root: &K,
    num_bytes: usize,
    index: u32,
) -> Result<HexSecret, Error> {
    root.bip85_hex(num_bytes, index)
}

/// BIP85 derivations available for any source of hardened child keys.
pub trait Bip85: KeySource {
    fn bip85_entropy(&self, app: &Application, index: u32) -> Result<Entropy, Error> {
        derive_entropy(self, app, index)
    }

    fn bip85_mnemonic(
        &self,
        language: Language,
        words: WordCount,
        index: u32,
    ) -> Result<Mnemonic, Error> {
        let entropy = self.bip85_entropy(&Application::Bip39 { language, words }, index)?;
        entropy_to_mnemonic(&entropy, language, words)
    }

    /// Derives root extended private key; it belongs to the same network as
    /// the key source.
    fn bip85_xprv(&self, index: u32) -> Result<Xpriv, Error> {
        let entropy = self.bip85_entropy(&Application::Xprv, index)?;
        entropy_to_xprv(&entropy, self.is_testnet())
    }

    fn bip85_hex(&self, num_bytes: usize, index: u32) -> Result<HexSecret, Error> {
        let entropy = self.bip85_entropy(&Application::Hex { num_bytes }, index)?;
        entropy_to_hex(&entropy, num_bytes)
    }
}

impl<K: KeySource + ?Sized> Bip85 for K {}
