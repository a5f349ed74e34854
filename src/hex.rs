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

use std::fmt::{self, Debug, Display, Formatter, LowerHex};

use amplify::hex::{self, ToHex};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{Entropy, Error, ParamError};

/// Raw secret bytes derived by the hex application.
///
/// Erased from memory on drop. `Display` gives lower-case hex; `Debug` never
/// prints the bytes.
#[derive(Clone, Eq, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct HexSecret(Vec<u8>);

impl HexSecret {
    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn to_hex(&self) -> String { self.0.as_slice().to_hex() }

    /// Converts into bytes which are still erased when dropped.
    pub fn into_bytes(mut self) -> Zeroizing<Vec<u8>> { Zeroizing::new(std::mem::take(&mut self.0)) }
}

impl AsRef<[u8]> for HexSecret {
    fn as_ref(&self) -> &[u8] { &self.0 }
}

impl LowerHex for HexSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { hex::format_hex(&self.0, f) }
}

impl Display for HexSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { LowerHex::fmt(self, f) }
}

impl Debug for HexSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "HexSecret({} bytes)", self.0.len())
    }
}

/// Takes the first `num_bytes` of the entropy verbatim. The length must lie
/// in range 16..=64.
pub fn entropy_to_hex(entropy: &Entropy, num_bytes: usize) -> Result<HexSecret, Error> {
    ParamError::check_hex_len(num_bytes)?;
    Ok(HexSecret(entropy.as_bytes()[..num_bytes].to_vec()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn truncation() {
        let entropy = Entropy::from_child_secret(&[0x77u8; 32]);
        let secret = entropy_to_hex(&entropy, 16).unwrap();
        assert_eq!(secret.as_bytes(), &entropy.as_bytes()[..16]);
        assert_eq!(secret.to_string(), entropy.to_hex()[..32]);
        assert_eq!(format!("{secret:?}"), "HexSecret(16 bytes)");

        let full = entropy_to_hex(&entropy, 64).unwrap();
        assert_eq!(full.to_hex(), entropy.to_hex());
        assert_eq!(&full.into_bytes()[..], &entropy.as_bytes()[..]);
    }

    #[test]
    fn hex_form() {
        let secret = HexSecret(vec![0x00, 0x0f, 0xa0, 0xff]);
        assert_eq!(secret.to_hex(), "000fa0ff");
        assert_eq!(secret.to_string(), "000fa0ff");
        assert_eq!(format!("{secret:x}"), "000fa0ff");
        assert_eq!(format!("{secret:.4x}"), "000f");
        assert_eq!(format!("{secret:010x}"), "00000fa0ff");
    }

    #[test]
    fn length_checked() {
        let entropy = Entropy::from_child_secret(&[0x77u8; 32]);
        assert_eq!(
            entropy_to_hex(&entropy, 15),
            Err(Error::InvalidParameter(ParamError::HexLength(15)))
        );
        assert_eq!(
            entropy_to_hex(&entropy, 65),
            Err(Error::InvalidParameter(ParamError::HexLength(65)))
        );
    }
}
