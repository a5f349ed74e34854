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

//! BIP85 applications and construction of their derivation paths.

use std::fmt::{self, Display, Formatter};

use derive::{DerivationPath, HardenedIndex};

use crate::ParamError;

const fn hardened(child_number: u32) -> HardenedIndex {
    match HardenedIndex::checked(child_number) {
        Some(index) => index,
        None => panic!("BIP85 constant exceeds hardened index range"),
    }
}

/// BIP85 purpose: `83696968'`, which is ASCII "SEED" written as a decimal number.
pub const BIP85_PURPOSE: HardenedIndex = hardened(83696968);

/// Raw entropy application, `m/83696968'/0'/{index}'`.
pub const APP_ENTROPY: HardenedIndex = HardenedIndex::ZERO;
/// BIP39 mnemonic application, `m/83696968'/39'/{language}'/{words}'/{index}'`.
pub const APP_BIP39: HardenedIndex = hardened(39);
/// BIP32 root key application, `m/83696968'/32'/{index}'`.
pub const APP_XPRV: HardenedIndex = hardened(32);
/// Hex secret application, `m/83696968'/128169'/{num_bytes}'/{index}'`.
pub const APP_HEX: HardenedIndex = hardened(128169);

/// Minimal number of bytes which can be requested from the hex application.
pub const HEX_MIN_LEN: usize = 16;
/// Maximal number of bytes which can be requested from the hex application.
pub const HEX_MAX_LEN: usize = 64;

/// Number of words in a derived BIP39 mnemonic.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", try_from = "usize", into = "usize")
)]
pub enum WordCount {
    #[default]
    Words12,
    Words18,
    Words24,
}

impl WordCount {
    pub const fn count(self) -> usize {
        match self {
            WordCount::Words12 => 12,
            WordCount::Words18 => 18,
            WordCount::Words24 => 24,
        }
    }

    /// Number of entropy bytes encoded by a mnemonic of this length: 11 bits
    /// per word minus the checksum, rounded up to a whole byte. Gives 16, 24
    /// and 32 bytes for 12, 18 and 24 words.
    pub const fn entropy_len(self) -> usize { ((self.count() - 1) * 11) / 8 + 1 }

    fn to_hardened(self) -> HardenedIndex { hardened(self.count() as u32) }
}

impl TryFrom<usize> for WordCount {
    type Error = ParamError;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        match count {
            12 => Ok(WordCount::Words12),
            18 => Ok(WordCount::Words18),
            24 => Ok(WordCount::Words24),
            invalid => Err(ParamError::WordCount(invalid)),
        }
    }
}

impl From<WordCount> for usize {
    fn from(words: WordCount) -> Self { words.count() }
}

impl Display for WordCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { write!(f, "{} words", self.count()) }
}

/// Word list of a derived mnemonic. Each language occupies its own BIP85
/// subtree, so the same index gives unrelated phrases in different languages.
///
/// Only English is available unless the `all-languages` feature is enabled.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "kebab-case")
)]
pub enum Language {
    #[default]
    English,
    #[cfg(feature = "all-languages")]
    Japanese,
    #[cfg(feature = "all-languages")]
    Korean,
    #[cfg(feature = "all-languages")]
    Spanish,
    #[cfg(feature = "all-languages")]
    ChineseSimplified,
    #[cfg(feature = "all-languages")]
    ChineseTraditional,
    #[cfg(feature = "all-languages")]
    French,
    #[cfg(feature = "all-languages")]
    Italian,
    #[cfg(feature = "all-languages")]
    Czech,
}

impl Language {
    /// Language code used as a derivation path segment.
    pub const fn code(self) -> HardenedIndex {
        let code = match self {
            Language::English => 0,
            #[cfg(feature = "all-languages")]
            Language::Japanese => 1,
            #[cfg(feature = "all-languages")]
            Language::Korean => 2,
            #[cfg(feature = "all-languages")]
            Language::Spanish => 3,
            #[cfg(feature = "all-languages")]
            Language::ChineseSimplified => 4,
            #[cfg(feature = "all-languages")]
            Language::ChineseTraditional => 5,
            #[cfg(feature = "all-languages")]
            Language::French => 6,
            #[cfg(feature = "all-languages")]
            Language::Italian => 7,
            #[cfg(feature = "all-languages")]
            Language::Czech => 8,
        };
        HardenedIndex::hardened(code)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Language::English => "english",
            #[cfg(feature = "all-languages")]
            Language::Japanese => "japanese",
            #[cfg(feature = "all-languages")]
            Language::Korean => "korean",
            #[cfg(feature = "all-languages")]
            Language::Spanish => "spanish",
            #[cfg(feature = "all-languages")]
            Language::ChineseSimplified => "chinese-simplified",
            #[cfg(feature = "all-languages")]
            Language::ChineseTraditional => "chinese-traditional",
            #[cfg(feature = "all-languages")]
            Language::French => "french",
            #[cfg(feature = "all-languages")]
            Language::Italian => "italian",
            #[cfg(feature = "all-languages")]
            Language::Czech => "czech",
        }
    }
}

impl From<Language> for bip39::Language {
    fn from(lang: Language) -> Self {
        match lang {
            Language::English => bip39::Language::English,
            #[cfg(feature = "all-languages")]
            Language::Japanese => bip39::Language::Japanese,
            #[cfg(feature = "all-languages")]
            Language::Korean => bip39::Language::Korean,
            #[cfg(feature = "all-languages")]
            Language::Spanish => bip39::Language::Spanish,
            #[cfg(feature = "all-languages")]
            Language::ChineseSimplified => bip39::Language::SimplifiedChinese,
            #[cfg(feature = "all-languages")]
            Language::ChineseTraditional => bip39::Language::TraditionalChinese,
            #[cfg(feature = "all-languages")]
            Language::French => bip39::Language::French,
            #[cfg(feature = "all-languages")]
            Language::Italian => bip39::Language::Italian,
            #[cfg(feature = "all-languages")]
            Language::Czech => bip39::Language::Czech,
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// BIP85 application: the kind of secret to derive together with its
/// parameters.
///
/// Each application owns a distinct subtree under [`BIP85_PURPOSE`], and the
/// parameters are part of the path, so no two requests share a derivation
/// path unless they are equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase", tag = "app")
)]
pub enum Application {
    /// Raw 64 bytes of entropy.
    Entropy,

    /// BIP39 mnemonic phrase.
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    Bip39 { language: Language, words: WordCount },

    /// BIP32 root extended private key.
    Xprv,

    /// Secret of `num_bytes` raw bytes, usually presented as hex.
    #[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
    Hex { num_bytes: usize },
}

impl Application {
    /// English mnemonic application with the given number of words.
    pub const fn bip39(words: WordCount) -> Self {
        Application::Bip39 {
            language: Language::English,
            words,
        }
    }

    /// Application number, which is the derivation segment right after
    /// [`BIP85_PURPOSE`].
    pub const fn code(&self) -> HardenedIndex {
        match self {
            Application::Entropy => APP_ENTROPY,
            Application::Bip39 { .. } => APP_BIP39,
            Application::Xprv => APP_XPRV,
            Application::Hex { .. } => APP_HEX,
        }
    }

    /// Constructs full derivation path for the application, validating all
    /// its parameters and the index.
    pub fn path(&self, index: u32) -> Result<DerivationPath<HardenedIndex>, ParamError> {
        let index = HardenedIndex::checked(index).ok_or(ParamError::Index(index))?;
        let mut path = DerivationPath::from([BIP85_PURPOSE, self.code()]);
        match *self {
            Application::Entropy | Application::Xprv => {}
            Application::Bip39 { language, words } => {
                path.extend([language.code(), words.to_hardened()]);
            }
            Application::Hex { num_bytes } => {
                ParamError::check_hex_len(num_bytes)?;
                path.push(hardened(num_bytes as u32));
            }
        }
        path.push(index);
        Ok(path)
    }
}

impl Display for Application {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Application::Entropy => f.write_str("entropy"),
            Application::Bip39 { language, words } => write!(f, "bip39({language}, {words})"),
            Application::Xprv => f.write_str("xprv"),
            Application::Hex { num_bytes } => write!(f, "hex({num_bytes} bytes)"),
        }
    }
}
