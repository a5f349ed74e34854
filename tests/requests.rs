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

//! Request validation, failure reporting and concurrent use of the deriver.

use std::str::FromStr;
use std::thread;

use bip85::{
    derive_entropy, derive_hex, derive_mnemonic, derive_xprv, entropy_to_mnemonic, Application,
    Bip85, Error, Language, ParamError, WordCount, Xpriv,
};

const ROOT_XPRV: &str = "xprv9s21ZrQH143K2LBWUUQRFXhucrQqBpKdRRxNVq2zBqsx8HVqFk2uYo8kmbaLLHRdqtQpUm98uKfu3vca1LqdGhUtyoFnCNkfmXRyPXLjbKb";

fn root() -> Xpriv { Xpriv::from_str(ROOT_XPRV).unwrap() }

#[test]
fn hex_length_rejected() {
    let root = root();
    assert_eq!(
        derive_hex(&root, 15, 0).unwrap_err(),
        Error::InvalidParameter(ParamError::HexLength(15))
    );
    assert_eq!(
        derive_hex(&root, 65, 0).unwrap_err(),
        Error::InvalidParameter(ParamError::HexLength(65))
    );
    assert_eq!(derive_hex(&root, 16, 0).unwrap().len(), 16);
    assert_eq!(derive_hex(&root, 64, 0).unwrap().len(), 64);
}

#[test]
fn word_count_rejected() {
    let root = root();
    for count in [0usize, 11, 13, 15, 21, 25] {
        assert_eq!(
            derive_mnemonic(&root, count, 0).unwrap_err(),
            Error::InvalidParameter(ParamError::WordCount(count))
        );
    }
}

#[test]
fn index_rejected() {
    let root = root();
    let index = 1u32 << 31;
    assert_eq!(
        derive_xprv(&root, index).unwrap_err(),
        Error::InvalidParameter(ParamError::Index(index))
    );
    assert_eq!(
        derive_entropy(&root, &Application::Entropy, u32::MAX).unwrap_err(),
        Error::InvalidParameter(ParamError::Index(u32::MAX))
    );
    assert!(derive_xprv(&root, index - 1).is_ok());
}

#[test]
fn malformed_root() {
    let mut garbled = ROOT_XPRV.to_owned();
    garbled.replace_range(20..21, "1");
    let err = Xpriv::from_str(&garbled).map_err(Error::from).unwrap_err();
    assert!(matches!(err, Error::MalformedEncoding(_)));

    let err = Xpriv::from_str("xprv").map_err(Error::from).unwrap_err();
    assert!(matches!(err, Error::MalformedEncoding(_)));
}

#[test]
fn applications_are_independent() {
    let root = root();
    let raw = root.bip85_entropy(&Application::Entropy, 0).unwrap();
    let hex = root.bip85_entropy(&Application::Hex { num_bytes: 64 }, 0).unwrap();
    let xprv = root.bip85_entropy(&Application::Xprv, 0).unwrap();
    let bip39 = root.bip85_entropy(&Application::bip39(WordCount::Words24), 0).unwrap();
    let all = [raw.as_bytes(), hex.as_bytes(), xprv.as_bytes(), bip39.as_bytes()];
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn mnemonic_truncates_entropy() {
    let root = root();
    let entropy = root.bip85_entropy(&Application::Entropy, 3).unwrap();
    let short = entropy_to_mnemonic(&entropy, Language::English, WordCount::Words12).unwrap();
    let long = entropy_to_mnemonic(&entropy, Language::English, WordCount::Words24).unwrap();
    let short = short.to_entropy();
    let long = long.to_entropy();
    assert_eq!(short.len(), 16);
    assert_eq!(long.len(), 32);
    assert_eq!(short[..], long[..16]);
    assert_eq!(&long[..], entropy.prefix(32).unwrap());
}

#[test]
fn mnemonic_is_reproducible() {
    let root = root();
    let first = root.bip85_mnemonic(Language::English, WordCount::Words18, 7).unwrap();
    let second = root.bip85_mnemonic(Language::English, WordCount::Words18, 7).unwrap();
    let other = root.bip85_mnemonic(Language::English, WordCount::Words18, 8).unwrap();
    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(first.word_count(), 18);
}

#[test]
fn testnet_root() {
    let mainnet = root();
    let secret = mainnet.to_private_ecdsa().secret_bytes();
    let testnet = Xpriv::from_parts(true, mainnet.chain_code(), &secret).unwrap();
    let derived = derive_xprv(&testnet, 0).unwrap();
    assert!(derived.to_string().starts_with("tprv"));
    // network flag does not affect derived entropy
    assert_eq!(
        testnet.bip85_entropy(&Application::Entropy, 0).unwrap(),
        mainnet.bip85_entropy(&Application::Entropy, 0).unwrap()
    );
}

#[test]
fn concurrent_requests() {
    let root = root();
    let expected = (0..8u32)
        .map(|index| derive_hex(&root, 32, index).unwrap().to_hex())
        .collect::<Vec<_>>();

    thread::scope(|scope| {
        let handles = (0..8u32)
            .map(|index| {
                let root = &root;
                scope.spawn(move || derive_hex(root, 32, index).unwrap().to_hex())
            })
            .collect::<Vec<_>>();
        for (handle, expected) in handles.into_iter().zip(&expected) {
            assert_eq!(&handle.join().unwrap(), expected);
        }
    });
}

#[cfg(feature = "all-languages")]
#[test]
fn japanese_mnemonic() {
    let root = root();
    let english = root.bip85_mnemonic(Language::English, WordCount::Words12, 0).unwrap();
    let japanese = root.bip85_mnemonic(Language::Japanese, WordCount::Words12, 0).unwrap();

    assert_eq!(japanese.language(), bip85::bip39::Language::Japanese);
    assert_eq!(japanese.word_count(), 12);
    let wordlist = bip85::bip39::Language::Japanese.word_list();
    assert!(japanese.words().all(|word| wordlist.contains(&word)));

    // separate subtree, not a translation of the English phrase
    assert_ne!(japanese.to_entropy(), english.to_entropy());
    let app = Application::Bip39 {
        language: Language::Japanese,
        words: WordCount::Words12,
    };
    let entropy = root.bip85_entropy(&app, 0).unwrap();
    assert_eq!(&japanese.to_entropy()[..], entropy.prefix(16).unwrap());
}

#[cfg(feature = "serde")]
#[test]
fn serde_application() {
    let app = Application::bip39(WordCount::Words24);
    let json = serde_json::to_string(&app).unwrap();
    let back: Application = serde_json::from_str(&json).unwrap();
    assert_eq!(back, app);

    let words: WordCount = serde_json::from_str("18").unwrap();
    assert_eq!(words, WordCount::Words18);
    assert!(serde_json::from_str::<WordCount>("13").is_err());
}
