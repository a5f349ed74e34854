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

use std::num::ParseIntError;
use std::str::FromStr;

/// Constant determining BIP32 boundary for u32 values after which index
/// is treated as hardened
pub const HARDENED_INDEX_BOUNDARY: u32 = 1 << 31;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Display, Error)]
#[display("child number {0} lies outside of the 0..2^31 range")]
pub struct IndexError(pub u32);

#[derive(Clone, Eq, PartialEq, Debug, Display, Error, From)]
#[display(doc_comments)]
pub enum IndexParseError {
    #[from]
    #[display(inner)]
    Invalid(IndexError),

    #[from]
    /// invalid index string representation - {0}
    Parse(ParseIntError),

    /// expected hardened index value instead of the provided unhardened {0}
    HardenedRequired(String),
}

/// Common functionality of hardened, normal and mixed path segments.
pub trait IdxBase: Sized + Eq + Ord + Copy {
    /// Detects whether path segment uses hardened index
    fn is_hardened(&self) -> bool;

    /// Zero-based child number, always below [`HARDENED_INDEX_BOUNDARY`].
    fn child_number(&self) -> u32;

    /// Value entering child key derivation: the child number, offset by
    /// [`HARDENED_INDEX_BOUNDARY`] for hardened segments.
    fn index(&self) -> u32;

    /// Big-endian serialization of [`IdxBase::index`].
    fn to_be_bytes(&self) -> [u8; 4] { self.index().to_be_bytes() }
}

/// Index for unhardened children derivation; the inner value is always
/// below 2^31.
#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Debug, Hash, Default, Display)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", try_from = "u32", into = "u32")
)]
#[display(inner)]
pub struct NormalIndex(u32);

impl NormalIndex {
    pub const ZERO: Self = NormalIndex(0);

    pub const MAX: Self = NormalIndex(HARDENED_INDEX_BOUNDARY - 1);

    pub const fn normal(child_number: u16) -> Self { NormalIndex(child_number as u32) }

    /// Constructs index from a child number, returning `None` if it doesn't
    /// fit below [`HARDENED_INDEX_BOUNDARY`].
    pub const fn checked(child_number: u32) -> Option<Self> {
        if child_number < HARDENED_INDEX_BOUNDARY {
            Some(NormalIndex(child_number))
        } else {
            None
        }
    }
}

impl IdxBase for NormalIndex {
    #[inline]
    fn is_hardened(&self) -> bool { false }

    #[inline]
    fn child_number(&self) -> u32 { self.0 }

    #[inline]
    fn index(&self) -> u32 { self.0 }
}

impl TryFrom<u32> for NormalIndex {
    type Error = IndexError;

    fn try_from(child_number: u32) -> Result<Self, Self::Error> {
        NormalIndex::checked(child_number).ok_or(IndexError(child_number))
    }
}

impl From<NormalIndex> for u32 {
    fn from(idx: NormalIndex) -> Self { idx.0 }
}

impl FromStr for NormalIndex {
    type Err = IndexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(NormalIndex::try_from(u32::from_str(s)?)?)
    }
}

/// Index for hardened children derivation. Keeps the zero-based child number;
/// the derivation value is offset by 2^31.
#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default, Display)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", try_from = "u32", into = "u32")
)]
#[display("{0}h", alt = "{0}'")]
pub struct HardenedIndex(u32);

impl HardenedIndex {
    pub const ZERO: Self = HardenedIndex(0);

    pub const MAX: Self = HardenedIndex(HARDENED_INDEX_BOUNDARY - 1);

    pub const fn hardened(child_number: u16) -> Self { HardenedIndex(child_number as u32) }

    /// Constructs hardened index from a child number which may exceed `u16`
    /// range, returning `None` if it doesn't fit below
    /// [`HARDENED_INDEX_BOUNDARY`].
    pub const fn checked(child_number: u32) -> Option<Self> {
        if child_number < HARDENED_INDEX_BOUNDARY {
            Some(HardenedIndex(child_number))
        } else {
            None
        }
    }
}

impl IdxBase for HardenedIndex {
    #[inline]
    fn is_hardened(&self) -> bool { true }

    #[inline]
    fn child_number(&self) -> u32 { self.0 }

    #[inline]
    fn index(&self) -> u32 { self.0 + HARDENED_INDEX_BOUNDARY }
}

impl TryFrom<u32> for HardenedIndex {
    type Error = IndexError;

    fn try_from(child_number: u32) -> Result<Self, Self::Error> {
        HardenedIndex::checked(child_number).ok_or(IndexError(child_number))
    }
}

impl From<HardenedIndex> for u32 {
    fn from(idx: HardenedIndex) -> Self { idx.0 }
}

impl FromStr for HardenedIndex {
    type Err = IndexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num = s
            .strip_suffix(['h', 'H', '\''])
            .ok_or_else(|| IndexParseError::HardenedRequired(s.to_owned()))?;
        Ok(HardenedIndex::try_from(u32::from_str(num)?)?)
    }
}

/// Path segment which may be either hardened or normal.
#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display, From)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
#[display(inner)]
pub enum DerivationIndex {
    #[from]
    Normal(NormalIndex),
    #[from]
    Hardened(HardenedIndex),
}

impl From<u32> for DerivationIndex {
    fn from(value: u32) -> Self { Self::from_index(value) }
}

impl DerivationIndex {
    pub const ZERO: Self = DerivationIndex::Normal(NormalIndex::ZERO);

    pub const fn normal(child_number: u16) -> Self {
        Self::Normal(NormalIndex::normal(child_number))
    }

    pub const fn hardened(child_number: u16) -> Self {
        Self::Hardened(HardenedIndex::hardened(child_number))
    }

    /// Interprets a raw BIP32 derivation value, as found in serialized
    /// extended keys.
    pub const fn from_index(value: u32) -> Self {
        if value < HARDENED_INDEX_BOUNDARY {
            DerivationIndex::Normal(NormalIndex(value))
        } else {
            DerivationIndex::Hardened(HardenedIndex(value - HARDENED_INDEX_BOUNDARY))
        }
    }
}

impl IdxBase for DerivationIndex {
    fn is_hardened(&self) -> bool { matches!(self, DerivationIndex::Hardened(_)) }

    fn child_number(&self) -> u32 {
        match self {
            DerivationIndex::Normal(idx) => idx.child_number(),
            DerivationIndex::Hardened(idx) => idx.child_number(),
        }
    }

    fn index(&self) -> u32 {
        match self {
            DerivationIndex::Normal(idx) => idx.index(),
            DerivationIndex::Hardened(idx) => idx.index(),
        }
    }
}

impl FromStr for DerivationIndex {
    type Err = IndexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_suffix(['h', 'H', '\'']) {
            Some(_) => HardenedIndex::from_str(s).map(Self::Hardened),
            None => NormalIndex::from_str(s).map(Self::Normal),
        }
    }
}
