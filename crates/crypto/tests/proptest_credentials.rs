//! Property-based tests for mnemonics, key derivation and keystores
//!
//! Uses proptest to verify key invariants across many randomly generated inputs.

use deposit_crypto::derivation::{derive_child_sk, derive_master_sk, validator_keys};
use deposit_crypto::keystore::{KdfConfig, Keystore};
use deposit_crypto::{ExposeSecret, Language, Mnemonic};
use proptest::prelude::*;

fn language() -> impl Strategy<Value = Language> {
    prop::sample::select(Language::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: Entropy survives phrase encoding
    #[test]
    fn prop_mnemonic_phrase_roundtrip(entropy in any::<[u8; 32]>(), lang in language()) {
        let mnemonic = Mnemonic::from_entropy(lang, &entropy).unwrap();
        prop_assert_eq!(mnemonic.word_count(), 24);
        prop_assert!(Mnemonic::validate(mnemonic.phrase(), lang).is_ok());

        let restored = Mnemonic::from_phrase(mnemonic.phrase(), lang).unwrap();
        let restored_entropy = restored.entropy();
        prop_assert_eq!(restored_entropy.expose_secret(), &entropy);

        let (seed, restored_seed) = (mnemonic.to_seed(""), restored.to_seed(""));
        prop_assert_eq!(restored_seed.expose_secret(), seed.expose_secret());
    }

    /// Property: Replacing one word breaks the phrase
    ///
    /// Either the checksum fails or, rarely, the phrase decodes to different entropy.
    #[test]
    fn prop_single_word_substitution(
        entropy in any::<[u8; 32]>(),
        position in 0usize..24,
        replacement in 0u16..2048,
    ) {
        let mnemonic = Mnemonic::from_entropy(Language::English, &entropy).unwrap();
        let mut words: Vec<&str> = mnemonic.phrase().split(' ').collect();
        let word = Language::English.word_list().word(replacement).unwrap();
        prop_assume!(words[position] != word);
        words[position] = word;

        match Mnemonic::from_phrase(&words.join(" "), Language::English) {
            Err(_) => {}
            Ok(other) => {
                let other_entropy = other.entropy();
                prop_assert_ne!(other_entropy.expose_secret(), &entropy);
            }
        }
    }

    /// Property: Derivation is deterministic and children are distinct
    #[test]
    fn prop_child_derivation(seed in any::<[u8; 32]>(), a in 0u32..1000, b in 1000u32..2000) {
        let master = derive_master_sk(&seed).unwrap();
        let again = derive_master_sk(&seed).unwrap();
        prop_assert_eq!(master.expose_secret(), again.expose_secret());

        let child_a = derive_child_sk(&master, a).unwrap();
        let child_a_again = derive_child_sk(&master, a).unwrap();
        let child_b = derive_child_sk(&master, b).unwrap();
        prop_assert_eq!(child_a.expose_secret(), child_a_again.expose_secret());
        prop_assert_ne!(child_a.expose_secret(), child_b.expose_secret());
    }

    /// Property: Signing and withdrawal keys never coincide across validators
    #[test]
    fn prop_validator_keys_independent(seed in any::<[u8; 64]>(), index in 0u32..500) {
        let keys = validator_keys(&seed, index).unwrap();
        let next = validator_keys(&seed, index + 1).unwrap();

        prop_assert_ne!(keys.signing_pubkey(), keys.withdrawal_pubkey());
        prop_assert_ne!(keys.signing_pubkey(), next.signing_pubkey());
        prop_assert_ne!(keys.withdrawal_pubkey(), next.withdrawal_pubkey());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))] // Reduced cases due to slow scrypt

    /// Property: Keystore roundtrip with arbitrary secrets and passwords
    #[test]
    fn prop_keystore_roundtrip(secret in any::<[u8; 32]>(), password in "[a-zA-Z0-9 ]{1,24}") {
        let kdf = KdfConfig::Scrypt { n: 1024, r: 8, p: 1 };
        let keystore = Keystore::encrypt(&secret, &password, "", "", kdf).unwrap();

        let json = serde_json::to_string(&keystore).unwrap();
        let parsed: Keystore = serde_json::from_str(&json).unwrap();
        let decrypted = parsed.decrypt(&password).unwrap();
        prop_assert_eq!(decrypted.expose_secret().as_slice(), &secret[..]);

        let wrong = format!("{password}x");
        prop_assert!(parsed.decrypt(&wrong).is_err());
    }
}
