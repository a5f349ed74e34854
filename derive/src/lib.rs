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

//! BIP32 hierarchical deterministic derivation of extended private keys.
//!
//! The crate covers exactly what deterministic entropy derivation needs from a
//! key tree: index and path types which can't express an out-of-range or
//! accidentally unhardened step, extended keys with their standard binary and
//! Base58Check encodings, and fallible private child key derivation.

#[macro_use]
extern crate amplify;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;
pub extern crate bitcoin_hashes as hashes;
pub extern crate secp256k1;

mod index;
mod path;
mod xkey;

pub use index::{
    DerivationIndex, HardenedIndex, IdxBase, IndexError, IndexParseError, NormalIndex,
    HARDENED_INDEX_BOUNDARY,
};
pub use path::{DerivationParseError, DerivationPath};
pub use xkey::{
    ChainCode, DeriveError, XkeyDecodeError, XkeyMeta, XkeyParseError, Xpriv, Xpub, XpubFp,
    XpubId, XKEY_LEN, XPRIV_MAINNET_MAGIC, XPRIV_TESTNET_MAGIC, XPUB_MAINNET_MAGIC,
    XPUB_TESTNET_MAGIC,
};
