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

use derive::Xpriv;
use zeroize::Zeroizing;

use crate::{Entropy, Error};

/// Turns the entropy into a root extended private key: the first 32 bytes
/// become the chain code and the last 32 bytes the private key.
///
/// The key carries no derivation history (zero depth, parent fingerprint and
/// child number), so it can be used anywhere a freshly generated BIP32 root is
/// expected.
pub fn entropy_to_xprv(entropy: &Entropy, testnet: bool) -> Result<Xpriv, Error> {
    let bytes = entropy.as_bytes();
    let mut chain_code = Zeroizing::new([0u8; 32]);
    chain_code.copy_from_slice(&bytes[..32]);
    let mut secret = Zeroizing::new([0u8; 32]);
    secret.copy_from_slice(&bytes[32..]);
    Ok(Xpriv::from_parts(testnet, *chain_code, &secret)?)
}
