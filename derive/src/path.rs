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

use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use crate::{DerivationIndex, HardenedIndex, IdxBase, IndexParseError};

#[derive(Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum DerivationParseError {
    /// unable to parse derivation path '{0}' - {1}
    InvalidIndex(String, IndexParseError),
    /// invalid derivation path format '{0}'
    InvalidFormat(String),
}

/// Derivation path consisting of a single type of segments.
///
/// An empty path denotes the key itself (`m`). Paths of [`HardenedIndex`]
/// segments are statically guaranteed to contain only hardened steps, which is
/// what derivation of secrets from a private key requires.
#[derive(Wrapper, WrapperMut, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default, Debug, From)]
#[wrapper(Deref)]
#[wrapper_mut(DerefMut)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct DerivationPath<I = DerivationIndex>(Vec<I>);

impl<I: Clone> From<&[I]> for DerivationPath<I> {
    fn from(path: &[I]) -> Self { Self(path.to_vec()) }
}

impl<I: Clone, const LEN: usize> From<[I; LEN]> for DerivationPath<I> {
    fn from(path: [I; LEN]) -> Self { Self(path.to_vec()) }
}

impl From<DerivationPath<HardenedIndex>> for DerivationPath {
    fn from(path: DerivationPath<HardenedIndex>) -> Self {
        path.0.into_iter().map(DerivationIndex::Hardened).collect()
    }
}

/// Formats the path as `m/83696968h/0h/0h`; the alternative form (`{:#}`)
/// uses apostrophes for hardened segments.
impl<I: Display> Display for DerivationPath<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for segment in &self.0 {
            f.write_str("/")?;
            Display::fmt(segment, f)?;
        }
        Ok(())
    }
}

impl<I: FromStr> FromStr for DerivationPath<I>
where IndexParseError: From<<I as FromStr>::Err>
{
    type Err = DerivationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.strip_prefix('m').unwrap_or(s);
        if path.is_empty() {
            return Ok(Self(vec![]));
        }
        let path = path
            .strip_prefix('/')
            .ok_or_else(|| DerivationParseError::InvalidFormat(s.to_owned()))?;
        if path.is_empty() || path.ends_with('/') {
            return Err(DerivationParseError::InvalidFormat(s.to_owned()));
        }
        let inner = path
            .split('/')
            .map(I::from_str)
            .collect::<Result<Vec<_>, I::Err>>()
            .map_err(|err| DerivationParseError::InvalidIndex(s.to_owned(), err.into()))?;
        Ok(Self(inner))
    }
}

impl<I> IntoIterator for DerivationPath<I> {
    type Item = I;
    type IntoIter = std::vec::IntoIter<I>;

    fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

impl<'path, I: Copy> IntoIterator for &'path DerivationPath<I> {
    type Item = I;
    type IntoIter = std::iter::Copied<std::slice::Iter<'path, I>>;

    fn into_iter(self) -> Self::IntoIter { self.0.iter().copied() }
}

impl<I> FromIterator<I> for DerivationPath<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self { Self(iter.into_iter().collect()) }
}

impl<I> Extend<I> for DerivationPath<I> {
    fn extend<T: IntoIterator<Item = I>>(&mut self, iter: T) { self.0.extend(iter) }
}

impl<I: IdxBase> DerivationPath<I> {
    /// Constructs empty derivation path.
    pub fn new() -> Self { Self(vec![]) }

    /// Constructs a new path by appending `index` to a copy of this one.
    #[must_use]
    pub fn child(&self, index: I) -> Self {
        let mut path = self.clone();
        path.0.push(index);
        path
    }

    /// Detects whether every segment of the path is hardened.
    pub fn is_fully_hardened(&self) -> bool { self.0.iter().all(I::is_hardened) }
}
