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

//! Deterministic entropy from BIP32 keychains, as specified by BIP85.
//!
//! A single root extended private key yields any number of independent
//! secrets: raw entropy, BIP39 mnemonics, BIP32 root keys and hex-encoded
//! secrets. Each of them is reproducible from the root key, the application
//! with its parameters, and an index; none of them reveals anything about the
//! root key or the other derived secrets.
//!
//! ```
//! use std::str::FromStr;
//!
//! use bip85::{Bip85, Language, WordCount, Xpriv};
//!
//! let root = Xpriv::from_str(
//!     "xprv9s21ZrQH143K2LBWUUQRFXhucrQqBpKdRRxNVq2zBqsx8HVqFk2uYo8kmbaLLHRdqtQpUm98uKfu3vca1LqdGhUtyoFnCNkfmXRyPXLjbKb",
//! )?;
//! let mnemonic = root.bip85_mnemonic(Language::English, WordCount::Words12, 0)?;
//! assert_eq!(
//!     mnemonic.to_string(),
//!     "girl mad pet galaxy egg matter matrix prison refuse sense ordinary nose"
//! );
//! # Ok::<_, bip85::Error>(())
//! ```

#[macro_use]
extern crate amplify;
#[macro_use]
extern crate tracing;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;
pub extern crate bip39;
pub extern crate derive;

mod app;
mod deriver;
mod entropy;
mod error;
mod hex;
mod mnemonic;
mod xprv;

pub use app::{
    Application, Language, WordCount, APP_BIP39, APP_ENTROPY, APP_HEX, APP_XPRV, BIP85_PURPOSE,
    HEX_MAX_LEN, HEX_MIN_LEN,
};
pub use bip39::Mnemonic;
pub use derive::{DerivationPath, DeriveError, HardenedIndex, XkeyParseError, Xpriv};
pub use deriver::{derive_entropy, derive_hex, derive_mnemonic, derive_xprv, Bip85};
pub use entropy::{Entropy, KeySource, ENTROPY_LABEL, ENTROPY_LEN};
pub use error::{Error, ParamError};
pub use hex::{entropy_to_hex, HexSecret};
pub use mnemonic::{entropy_to_mnemonic, root_from_mnemonic};
pub use xprv::entropy_to_xprv;
