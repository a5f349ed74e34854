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

use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use amplify::{ByteArray, Bytes20, Bytes4, Wrapper};
use bitcoin_hashes::{hash160, sha512, Hash, HashEngine, Hmac, HmacEngine};
use secp256k1::{PublicKey, Scalar, SecretKey, SECP256K1};
use zeroize::Zeroize;

use crate::{DerivationIndex, HardenedIndex, IdxBase};

pub const XPRIV_MAINNET_MAGIC: [u8; 4] = [0x04u8, 0x88, 0xAD, 0xE4];
pub const XPRIV_TESTNET_MAGIC: [u8; 4] = [0x04u8, 0x35, 0x83, 0x94];

pub const XPUB_MAINNET_MAGIC: [u8; 4] = [0x04u8, 0x88, 0xB2, 0x1E];
pub const XPUB_TESTNET_MAGIC: [u8; 4] = [0x04u8, 0x35, 0x87, 0xCF];

/// Length of the BIP32 binary serialization of an extended key.
pub const XKEY_LEN: usize = 78;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum XkeyDecodeError {
    /// wrong length of extended key data ({0}).
    WrongExtendedKeyLength(usize),

    /// provided key is not a standard BIP-32 extended key
    UnknownKeyType([u8; 4]),

    /// extended pubkey contains invalid public key data.
    InvalidPubkey,

    /// xpriv contains invalid byte for the secret key type ({0:#04x}) which must be set to zero.
    InvalidType(u8),

    /// xpriv contains invalid data with secret key value overflowing over field order.
    InvalidSecretKey,
}

impl From<secp256k1::Error> for XkeyDecodeError {
    fn from(_: secp256k1::Error) -> Self { XkeyDecodeError::InvalidPubkey }
}

#[derive(Clone, Eq, PartialEq, Debug, Display, Error, From)]
pub enum XkeyParseError {
    /// wrong Base58 encoding of extended key data - {0}
    #[display(doc_comments)]
    #[from]
    Base58(base58ck::Error),

    #[display(inner)]
    #[from]
    Decode(XkeyDecodeError),
}

/// Failures of BIP32 key generation and child key derivation.
///
/// All of them are deterministic functions of the input key material, so
/// retrying the same operation never helps.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum DeriveError {
    /// seed length of {0} bytes lies outside of the 16..=64 bytes range allowed by BIP32.
    SeedLength(usize),

    /// key material is not a valid secp256k1 secret key.
    InvalidSecretKey,

    /// child key at index {0} is invalid and must be skipped.
    InvalidChild(DerivationIndex),

    /// extended key depth overflow: keys can't be derived below level 255.
    DepthOverflow,
}

/// BIP32 chain code used for hierarchical derivation
#[derive(Copy, Clone, Eq, PartialEq, Hash, Zeroize)]
pub struct ChainCode([u8; 32]);

impl AsRef<[u8]> for ChainCode {
    fn as_ref(&self) -> &[u8] { &self.0 }
}

impl From<[u8; 32]> for ChainCode {
    fn from(value: [u8; 32]) -> Self { Self(value) }
}

impl From<ChainCode> for [u8; 32] {
    fn from(value: ChainCode) -> Self { value.0 }
}

impl ChainCode {
    pub fn to_byte_array(&self) -> [u8; 32] { self.0 }
}

impl Debug for ChainCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str("ChainCode(..)") }
}

/// Key fingerprint: first four bytes of the public key identifier.
#[derive(Wrapper, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default, Debug, Display, From)]
#[wrapper(RangeOps, LowerHex)]
#[display(LowerHex)]
pub struct XpubFp(
    #[from]
    #[from([u8; 4])]
    Bytes4,
);

impl AsRef<[u8]> for XpubFp {
    fn as_ref(&self) -> &[u8] { self.0.as_ref() }
}

impl XpubFp {
    pub const fn master() -> Self { Self(Bytes4::zero()) }
}

/// HASH160 of the serialized public key.
#[derive(Wrapper, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default, Debug, Display, From)]
#[wrapper(RangeOps, LowerHex)]
#[display(LowerHex)]
pub struct XpubId(
    #[from]
    #[from([u8; 20])]
    Bytes20,
);

impl AsRef<[u8]> for XpubId {
    fn as_ref(&self) -> &[u8] { self.0.as_ref() }
}

/// Non-key part of the extended key serialization: its position in the key
/// tree.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct XkeyMeta {
    pub depth: u8,
    pub parent_fp: XpubFp,
    pub child_number: DerivationIndex,
}

impl XkeyMeta {
    /// Metadata of a root key: depth zero, no parent, zero child number.
    pub const fn master() -> Self {
        XkeyMeta {
            depth: 0,
            parent_fp: XpubFp::master(),
            child_number: DerivationIndex::ZERO,
        }
    }

    fn child(&self, parent_fp: XpubFp, idx: DerivationIndex) -> Result<Self, DeriveError> {
        Ok(XkeyMeta {
            depth: self.depth.checked_add(1).ok_or(DeriveError::DepthOverflow)?,
            parent_fp,
            child_number: idx,
        })
    }
}

fn decode_header(
    data: &[u8],
    mainnet_magic: [u8; 4],
    testnet_magic: [u8; 4],
) -> Result<(bool, XkeyMeta, ChainCode), XkeyDecodeError> {
    if data.len() != XKEY_LEN {
        return Err(XkeyDecodeError::WrongExtendedKeyLength(data.len()));
    }

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&data[0..4]);
    let testnet = match magic {
        magic if magic == mainnet_magic => false,
        magic if magic == testnet_magic => true,
        unknown => return Err(XkeyDecodeError::UnknownKeyType(unknown)),
    };
    let depth = data[4];

    let mut parent_fp = [0u8; 4];
    parent_fp.copy_from_slice(&data[5..9]);

    let mut child_number = [0u8; 4];
    child_number.copy_from_slice(&data[9..13]);
    let child_number = u32::from_be_bytes(child_number);

    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&data[13..45]);

    let meta = XkeyMeta {
        depth,
        parent_fp: parent_fp.into(),
        child_number: child_number.into(),
    };
    Ok((testnet, meta, chain_code.into()))
}

fn encode_header(ret: &mut [u8; XKEY_LEN], magic: [u8; 4], meta: &XkeyMeta, chain_code: &ChainCode) {
    ret[0..4].copy_from_slice(&magic);
    ret[4] = meta.depth;
    ret[5..9].copy_from_slice(meta.parent_fp.as_ref());
    ret[9..13].copy_from_slice(&meta.child_number.to_be_bytes());
    ret[13..45].copy_from_slice(chain_code.as_ref());
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Xpub {
    testnet: bool,
    meta: XkeyMeta,
    public_key: PublicKey,
    chain_code: ChainCode,
}

impl Xpub {
    pub fn decode(data: &[u8]) -> Result<Xpub, XkeyDecodeError> {
        let (testnet, meta, chain_code) =
            decode_header(data, XPUB_MAINNET_MAGIC, XPUB_TESTNET_MAGIC)?;
        if !matches!(data[45], 0x02 | 0x03) {
            return Err(XkeyDecodeError::InvalidPubkey);
        }
        let public_key = PublicKey::from_slice(&data[45..78])?;
        Ok(Xpub {
            testnet,
            meta,
            public_key,
            chain_code,
        })
    }

    pub fn encode(&self) -> [u8; XKEY_LEN] {
        let mut ret = [0; XKEY_LEN];
        let magic = if self.testnet { XPUB_TESTNET_MAGIC } else { XPUB_MAINNET_MAGIC };
        encode_header(&mut ret, magic, &self.meta, &self.chain_code);
        ret[45..78].copy_from_slice(&self.public_key.serialize());
        ret
    }

    #[must_use]
    pub fn is_testnet(&self) -> bool { self.testnet }

    pub fn depth(&self) -> u8 { self.meta.depth }

    pub fn child_number(&self) -> DerivationIndex { self.meta.child_number }

    pub fn parent_fp(&self) -> XpubFp { self.meta.parent_fp }

    pub fn chain_code(&self) -> ChainCode { self.chain_code }

    pub fn to_public_key(&self) -> PublicKey { self.public_key }

    /// Returns the HASH160 of the public key
    pub fn identifier(&self) -> XpubId {
        let hash = hash160::Hash::hash(&self.public_key.serialize());
        XpubId::from_byte_array(hash.to_byte_array())
    }

    pub fn fingerprint(&self) -> XpubFp {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.identifier()[..4]);
        XpubFp::from_byte_array(bytes)
    }
}

impl Display for Xpub {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        base58ck::encode_check_to_fmt(f, &self.encode())
    }
}

impl FromStr for Xpub {
    type Err = XkeyParseError;

    fn from_str(inp: &str) -> Result<Xpub, XkeyParseError> {
        let data = base58ck::decode_check(inp)?;
        Ok(Xpub::decode(&data)?)
    }
}

/// BIP32 extended private key.
///
/// The secret key and chain code are erased from memory when the value is
/// dropped; the type is therefore not `Copy`, and its `Debug` representation
/// omits both of them.
#[derive(Clone, Eq, PartialEq)]
pub struct Xpriv {
    testnet: bool,
    meta: XkeyMeta,
    private_key: SecretKey,
    chain_code: ChainCode,
}

impl Drop for Xpriv {
    fn drop(&mut self) {
        // `non_secure_erase` fills the key with a valid constant, which keeps
        // `SecretKey` invariants intact.
        self.private_key.non_secure_erase();
        self.chain_code.zeroize();
    }
}

impl Debug for Xpriv {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Xpriv")
            .field("testnet", &self.testnet)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// Splits HMAC-SHA512 output into a secret key (left half) and a chain code
/// (right half), erasing the intermediate buffer.
fn split_hmac(engine: HmacEngine<sha512::Hash>) -> (Result<SecretKey, secp256k1::Error>, ChainCode) {
    let mut hmac_result = Hmac::from_engine(engine).to_byte_array();
    let sk = SecretKey::from_slice(&hmac_result[..32]);
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&hmac_result[32..]);
    hmac_result.zeroize();
    (sk, chain_code.into())
}

impl Xpriv {
    /// Generates master extended private key from a seed, as defined by BIP32.
    pub fn new_master(testnet: bool, seed: &[u8]) -> Result<Xpriv, DeriveError> {
        if !(16..=64).contains(&seed.len()) {
            return Err(DeriveError::SeedLength(seed.len()));
        }
        let mut hmac_engine: HmacEngine<sha512::Hash> = HmacEngine::new(b"Bitcoin seed");
        hmac_engine.input(seed);
        let (private_key, chain_code) = split_hmac(hmac_engine);

        Ok(Xpriv {
            testnet,
            meta: XkeyMeta::master(),
            private_key: private_key.map_err(|_| DeriveError::InvalidSecretKey)?,
            chain_code,
        })
    }

    /// Constructs extended private key positioned as a root of a new key tree
    /// (zero depth, no parent fingerprint, zero child number) from a raw
    /// secret and chain code.
    pub fn from_parts(
        testnet: bool,
        chain_code: impl Into<ChainCode>,
        secret: &[u8; 32],
    ) -> Result<Xpriv, DeriveError> {
        let private_key =
            SecretKey::from_slice(secret).map_err(|_| DeriveError::InvalidSecretKey)?;
        Ok(Xpriv {
            testnet,
            meta: XkeyMeta::master(),
            private_key,
            chain_code: chain_code.into(),
        })
    }

    pub fn decode(data: &[u8]) -> Result<Xpriv, XkeyDecodeError> {
        let (testnet, meta, chain_code) =
            decode_header(data, XPRIV_MAINNET_MAGIC, XPRIV_TESTNET_MAGIC)?;
        if data[45] != 0x00 {
            return Err(XkeyDecodeError::InvalidType(data[45]));
        }
        let private_key =
            SecretKey::from_slice(&data[46..78]).map_err(|_| XkeyDecodeError::InvalidSecretKey)?;

        Ok(Xpriv {
            testnet,
            meta,
            private_key,
            chain_code,
        })
    }

    /// Serializes the key into BIP32 binary format.
    ///
    /// The returned buffer contains the secret key; callers are responsible
    /// for erasing it.
    pub fn encode(&self) -> [u8; XKEY_LEN] {
        let mut ret = [0; XKEY_LEN];
        let magic = if self.testnet { XPRIV_TESTNET_MAGIC } else { XPRIV_MAINNET_MAGIC };
        encode_header(&mut ret, magic, &self.meta, &self.chain_code);
        ret[45] = 0;
        ret[46..78].copy_from_slice(&self.private_key.secret_bytes());
        ret
    }

    #[must_use]
    pub fn is_testnet(&self) -> bool { self.testnet }

    pub fn meta(&self) -> XkeyMeta { self.meta }

    pub fn depth(&self) -> u8 { self.meta.depth }

    pub fn child_number(&self) -> DerivationIndex { self.meta.child_number }

    pub fn parent_fp(&self) -> XpubFp { self.meta.parent_fp }

    pub fn chain_code(&self) -> ChainCode { self.chain_code }

    pub fn fingerprint(&self) -> XpubFp { self.to_xpub().fingerprint() }

    pub fn identifier(&self) -> XpubId { self.to_xpub().identifier() }

    pub fn to_xpub(&self) -> Xpub {
        Xpub {
            testnet: self.testnet,
            meta: self.meta,
            public_key: self.private_key.public_key(SECP256K1),
            chain_code: self.chain_code,
        }
    }

    pub fn to_private_ecdsa(&self) -> SecretKey { self.private_key }

    /// Attempts to derive an extended private key from a path.
    ///
    /// The `path` argument can be both of type `DerivationPath` or `Vec<DerivationIndex>`.
    pub fn derive_priv<I: Into<DerivationIndex> + Copy>(
        &self,
        path: &[I],
    ) -> Result<Xpriv, DeriveError> {
        let mut xpriv = self.clone();
        for idx in path {
            xpriv = xpriv.ckd_priv(*idx)?;
        }
        Ok(xpriv)
    }

    /// Derives a child key using hardened steps only, so that the result can't
    /// be linked back to the parent through its public key.
    pub fn derive_hardened(&self, path: &[HardenedIndex]) -> Result<Xpriv, DeriveError> {
        self.derive_priv(path)
    }

    /// Private->Private child key derivation
    pub fn ckd_priv(&self, idx: impl Into<DerivationIndex>) -> Result<Xpriv, DeriveError> {
        let idx = idx.into();

        let mut hmac_engine: HmacEngine<sha512::Hash> =
            HmacEngine::new(self.chain_code.as_ref());
        match idx {
            DerivationIndex::Normal(_) => {
                // Non-hardened key: compute public data and use that
                hmac_engine.input(
                    &PublicKey::from_secret_key(SECP256K1, &self.private_key).serialize(),
                );
            }
            DerivationIndex::Hardened(_) => {
                // Hardened key: use only secret data to prevent public derivation
                hmac_engine.input(&[0u8]);
                hmac_engine.input(&self.private_key.secret_bytes());
            }
        }
        hmac_engine.input(&idx.to_be_bytes());

        let (tweak, chain_code) = split_hmac(hmac_engine);
        let private_key = tweak
            .and_then(|sk| sk.add_tweak(&Scalar::from(self.private_key)))
            .map_err(|_| DeriveError::InvalidChild(idx))?;

        Ok(Xpriv {
            testnet: self.testnet,
            meta: self.meta.child(self.fingerprint(), idx)?,
            private_key,
            chain_code,
        })
    }
}

impl Display for Xpriv {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut data = self.encode();
        let res = base58ck::encode_check_to_fmt(f, &data);
        data.zeroize();
        res
    }
}

impl FromStr for Xpriv {
    type Err = XkeyParseError;

    fn from_str(inp: &str) -> Result<Xpriv, XkeyParseError> {
        let mut data = base58ck::decode_check(inp)?;
        let xpriv = Xpriv::decode(&data);
        data.zeroize();
        Ok(xpriv?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::DerivationPath;

    // BIP32 test vector 1
    const SEED: [u8; 16] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];
    const MASTER_XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
    const MASTER_XPUB: &str = "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8";

    #[test]
    fn master_from_seed() {
        let master = Xpriv::new_master(false, &SEED).unwrap();
        assert_eq!(master.to_string(), MASTER_XPRV);
        assert_eq!(master.to_xpub().to_string(), MASTER_XPUB);
        assert_eq!(master.depth(), 0);
        assert_eq!(master.parent_fp(), XpubFp::master());
        assert_eq!(master.fingerprint().to_string(), "3442193e");
    }

    #[test]
    fn seed_length() {
        assert_eq!(Xpriv::new_master(false, &[0u8; 15]), Err(DeriveError::SeedLength(15)));
        assert_eq!(Xpriv::new_master(false, &[1u8; 65]), Err(DeriveError::SeedLength(65)));
    }

    #[test]
    fn derivation_chain() {
        let master = Xpriv::from_str(MASTER_XPRV).unwrap();

        let path = DerivationPath::<HardenedIndex>::from_str("m/0h").unwrap();
        let child = master.derive_hardened(&path).unwrap();
        assert_eq!(
            child.to_string(),
            "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7"
        );
        assert_eq!(child.depth(), 1);
        assert_eq!(child.parent_fp(), master.fingerprint());
        assert_eq!(child.child_number(), DerivationIndex::hardened(0));

        let path = DerivationPath::<DerivationIndex>::from_str("m/0h/1/2h").unwrap();
        let grandchild = master.derive_priv(&path).unwrap();
        assert_eq!(
            grandchild.to_string(),
            "xprv9z4pot5VBttmtdRTWfWQmoH1taj2axGVzFqSb8C9xaxKymcFzXBDptWmT7FwuEzG3ryjH4ktypQSAewRiNMjANTtpgP4mLTj34bhnZX7UiM"
        );
    }

    #[test]
    fn depth_overflow() {
        let mut xpriv = Xpriv::new_master(true, &SEED).unwrap();
        xpriv.meta.depth = u8::MAX;
        assert_eq!(xpriv.ckd_priv(HardenedIndex::ZERO), Err(DeriveError::DepthOverflow));
    }

    #[test]
    fn from_parts_is_root() {
        let xpriv = Xpriv::from_parts(true, [7u8; 32], &[1u8; 32]).unwrap();
        assert!(xpriv.is_testnet());
        assert_eq!(xpriv.meta(), XkeyMeta::master());
        assert_eq!(xpriv.chain_code().to_byte_array(), [7u8; 32]);
        assert!(xpriv.to_string().starts_with("tprv"));

        assert_eq!(
            Xpriv::from_parts(false, [7u8; 32], &[0u8; 32]),
            Err(DeriveError::InvalidSecretKey)
        );
        assert_eq!(
            Xpriv::from_parts(false, [7u8; 32], &[0xFFu8; 32]),
            Err(DeriveError::InvalidSecretKey)
        );
    }

    #[test]
    fn decode_errors() {
        let master = Xpriv::from_str(MASTER_XPRV).unwrap();
        let data = master.encode();

        assert_eq!(Xpriv::decode(&data[..77]), Err(XkeyDecodeError::WrongExtendedKeyLength(77)));

        let mut wrong = data;
        wrong[0..4].copy_from_slice(&XPUB_MAINNET_MAGIC);
        assert_eq!(Xpriv::decode(&wrong), Err(XkeyDecodeError::UnknownKeyType(XPUB_MAINNET_MAGIC)));

        let mut wrong = data;
        wrong[45] = 0x02;
        assert_eq!(Xpriv::decode(&wrong), Err(XkeyDecodeError::InvalidType(0x02)));

        let mut wrong = data;
        wrong[46..78].copy_from_slice(&[0xFF; 32]);
        assert_eq!(Xpriv::decode(&wrong), Err(XkeyDecodeError::InvalidSecretKey));

        assert!(matches!(Xpriv::from_str("xprv1234"), Err(XkeyParseError::Base58(_))));
        assert!(matches!(Xpriv::from_str(MASTER_XPUB), Err(XkeyParseError::Decode(_))));
    }

    #[test]
    fn xpub_roundtrip() {
        let xpub = Xpub::from_str(MASTER_XPUB).unwrap();
        assert_eq!(Xpub::decode(&xpub.encode()).unwrap(), xpub);
        assert_eq!(xpub.to_string(), MASTER_XPUB);
    }

    #[test]
    fn debug_redacts_secret() {
        let master = Xpriv::from_str(MASTER_XPRV).unwrap();
        let debug = format!("{master:?}");
        let secret = master.to_private_ecdsa().display_secret().to_string();
        assert!(!debug.contains(&secret));
        assert!(!debug.contains("chain_code"));
    }
}
