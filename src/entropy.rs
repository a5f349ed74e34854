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

use std::fmt::{self, Debug, Formatter, LowerHex};

use amplify::hex::{self, ToHex};
use derive::hashes::{sha512, Hash, HashEngine, Hmac, HmacEngine};
use derive::{DeriveError, HardenedIndex, Xpriv};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Length of the entropy produced for each BIP85 derivation path.
pub const ENTROPY_LEN: usize = 64;

/// HMAC-SHA512 key separating BIP85 entropy from any other use of the same
/// derived private keys.
pub const ENTROPY_LABEL: &[u8] = b"bip-entropy-from-k";

/// Source of hardened child private keys for BIP85 derivation.
///
/// Implemented by [`Xpriv`]; other key stores (hardware devices, remote
/// signers) may provide the same capability without exposing the root key.
pub trait KeySource {
    /// Derives private key located at `path` and returns its 32-byte secret
    /// scalar.
    fn derive_secret(&self, path: &[HardenedIndex]) -> Result<Zeroizing<[u8; 32]>, DeriveError>;

    /// Whether the keys belong to a test network, which determines the version
    /// bytes of derived extended keys.
    fn is_testnet(&self) -> bool;
}

impl KeySource for Xpriv {
    fn derive_secret(&self, path: &[HardenedIndex]) -> Result<Zeroizing<[u8; 32]>, DeriveError> {
        let child = self.derive_hardened(path)?;
        let mut sk = child.to_private_ecdsa();
        let secret = Zeroizing::new(sk.secret_bytes());
        sk.non_secure_erase();
        Ok(secret)
    }

    fn is_testnet(&self) -> bool { Xpriv::is_testnet(self) }
}

/// 64 bytes of BIP85 entropy.
///
/// Erased from memory on drop; `Debug` never prints the bytes.
#[derive(Clone, Eq, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct Entropy([u8; ENTROPY_LEN]);

impl Entropy {
    /// Computes entropy as HMAC-SHA512 of a derived private key, keyed with
    /// [`ENTROPY_LABEL`].
    pub fn from_child_secret(secret: &[u8; 32]) -> Self {
        let mut engine = HmacEngine::<sha512::Hash>::new(ENTROPY_LABEL);
        engine.input(secret);
        Entropy(Hmac::from_engine(engine).to_byte_array())
    }

    pub fn as_bytes(&self) -> &[u8; ENTROPY_LEN] { &self.0 }

    /// Returns first `len` bytes of the entropy, or `None` if `len` exceeds
    /// [`ENTROPY_LEN`].
    pub fn prefix(&self, len: usize) -> Option<&[u8]> { self.0.get(..len) }

    /// Lower-case hex representation of the entropy.
    pub fn to_hex(&self) -> String { self.0.as_slice().to_hex() }
}

impl AsRef<[u8]> for Entropy {
    fn as_ref(&self) -> &[u8] { &self.0 }
}

impl LowerHex for Entropy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { hex::format_hex(&self.0, f) }
}

impl Debug for Entropy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str("Entropy(..)") }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use derive::DerivationPath;

    use super::*;

    #[test]
    fn label_is_hmac_key() {
        // the label is the HMAC key and the child secret is the message
        let secret = [0x11u8; 32];
        let entropy = Entropy::from_child_secret(&secret);

        let mut swapped = HmacEngine::<sha512::Hash>::new(&secret);
        swapped.input(ENTROPY_LABEL);
        let swapped = Hmac::from_engine(swapped).to_byte_array();

        assert_ne!(entropy.as_bytes(), &swapped);
        assert_eq!(entropy, Entropy::from_child_secret(&secret));
    }

    #[test]
    fn prefix() {
        let entropy = Entropy::from_child_secret(&[0x22u8; 32]);
        assert_eq!(entropy.prefix(16), Some(&entropy.as_bytes()[..16]));
        assert_eq!(entropy.prefix(64).map(<[u8]>::len), Some(64));
        assert_eq!(entropy.prefix(65), None);
        assert_eq!(entropy.to_hex().len(), 128);
        assert_eq!(format!("{entropy:?}"), "Entropy(..)");
    }

    #[test]
    fn hex_form() {
        let mut bytes = [0u8; ENTROPY_LEN];
        bytes[..4].copy_from_slice(&[0x00, 0x0f, 0xa0, 0xff]);
        let entropy = Entropy(bytes);
        let hex = entropy.to_hex();
        assert_eq!(hex.len(), ENTROPY_LEN * 2);
        assert!(hex.starts_with("000fa0ff00"));
        assert_eq!(format!("{entropy:x}"), hex);
        assert_eq!(format!("{entropy:.8x}"), "000fa0ff");
    }

    #[test]
    fn xpriv_key_source() {
        let root = Xpriv::from_str(
            "xprv9s21ZrQH143K2LBWUUQRFXhucrQqBpKdRRxNVq2zBqsx8HVqFk2uYo8kmbaLLHRdqtQpUm98uKfu3vca1LqdGhUtyoFnCNkfmXRyPXLjbKb",
        )
        .unwrap();
        let path = DerivationPath::<HardenedIndex>::from_str("m/83696968'/0'/0'").unwrap();

        let secret = root.derive_secret(&path).unwrap();
        let child = root.derive_hardened(&path).unwrap();
        assert_eq!(*secret, child.to_private_ecdsa().secret_bytes());
        assert!(!KeySource::is_testnet(&root));

        // BIP85 test case 1
        assert_eq!(
            Entropy::from_child_secret(&secret).to_hex(),
            "efecfbccffea313214232d29e71563d941229afb4338c21f9517c41aaa0d16f00b83d2a09ef747e7a64e8e2bd5a14869e693da66ce94ac2da570ab7ee48618f7"
        );
    }
}
