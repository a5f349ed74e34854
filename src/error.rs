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

use derive::{DeriveError, XkeyParseError};

use crate::app::{HEX_MAX_LEN, HEX_MIN_LEN};

/// Request parameters rejected before any key derivation takes place.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum ParamError {
    /// unsupported mnemonic length of {0} words; only 12, 18 and 24-word mnemonics can be derived.
    WordCount(usize),

    /// unsupported secret length of {0} bytes; the length must lie in range 16..=64.
    HexLength(usize),

    /// application index {0} exceeds maximal hardened child number 2147483647.
    Index(u32),
}

impl ParamError {
    pub(crate) fn check_hex_len(num_bytes: usize) -> Result<(), ParamError> {
        if (HEX_MIN_LEN..=HEX_MAX_LEN).contains(&num_bytes) {
            Ok(())
        } else {
            Err(ParamError::HexLength(num_bytes))
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Display, Error, From)]
#[display(doc_comments)]
pub enum Error {
    /// invalid BIP85 request - {0}
    #[from]
    InvalidParameter(ParamError),

    /// key derivation has failed - {0}
    #[from]
    InvalidKey(DeriveError),

    /// malformed extended key - {0}
    #[from]
    MalformedEncoding(XkeyParseError),

    /// invalid BIP39 mnemonic - {0}
    #[from]
    InvalidMnemonic(bip39::Error),
}
