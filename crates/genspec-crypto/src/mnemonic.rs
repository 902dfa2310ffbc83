//! BIP39 phrases and the Substrate seed derivation.
//!
//! Unlike plain BIP39, the seed is stretched from the phrase's *entropy*, not
//! its text, so the resulting keys match what Substrate wallets derive from the
//! same phrase. This is `substrate-bip39`'s `mini_secret_from_entropy`,
//! written against `pbkdf2` and `sha2` rather than pulling in `sp-core`.

use bip39::{Language, Mnemonic};
use genspec_core::constants::{MNEMONIC_ENTROPY_BYTES, SEED_PBKDF2_ROUNDS, SEED_SALT_PREFIX};
use genspec_core::{GenspecError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha512;
use zeroize::Zeroizing;

/// Generate a fresh 12-word English phrase from the OS CSPRNG.
pub fn generate() -> Result<Mnemonic> {
    let mut entropy = Zeroizing::new([0u8; MNEMONIC_ENTROPY_BYTES]);
    OsRng
        .try_fill_bytes(&mut entropy[..])
        .map_err(|e| GenspecError::KeyGeneration(format!("entropy source: {e}")))?;
    Mnemonic::from_entropy_in(Language::English, &entropy[..])
        .map_err(|e| GenspecError::KeyGeneration(format!("mnemonic encoding: {e}")))
}

/// Parse an English phrase, validating its checksum word.
pub fn parse(phrase: &str) -> Result<Mnemonic> {
    Mnemonic::parse_in(Language::English, phrase)
        .map_err(|e| GenspecError::KeyGeneration(format!("invalid mnemonic: {e}")))
}

/// 64-byte seed for `mnemonic` with an optional `password`.
pub fn seed(mnemonic: &Mnemonic, password: &str) -> Result<Zeroizing<[u8; 64]>> {
    let entropy = Zeroizing::new(mnemonic.to_entropy());
    seed_from_entropy(&entropy, password)
}

/// PBKDF2-HMAC-SHA512 over raw entropy, salted with `"mnemonic" || password`.
pub fn seed_from_entropy(entropy: &[u8], password: &str) -> Result<Zeroizing<[u8; 64]>> {
    if !(16..=32).contains(&entropy.len()) || entropy.len() % 4 != 0 {
        return Err(GenspecError::KeyGeneration(format!(
            "invalid entropy length {}",
            entropy.len()
        )));
    }
    let salt = Zeroizing::new(format!("{SEED_SALT_PREFIX}{password}"));
    let mut seed = Zeroizing::new([0u8; 64]);
    pbkdf2::pbkdf2_hmac::<Sha512>(entropy, salt.as_bytes(), SEED_PBKDF2_ROUNDS, &mut seed[..]);
    Ok(seed)
}

/// First 32 bytes of the seed: the secret both schemes derive from.
pub fn mini_secret(mnemonic: &Mnemonic) -> Result<Zeroizing<[u8; 32]>> {
    let seed = seed(mnemonic, "")?;
    let mut out = Zeroizing::new([0u8; 32]);
    out.copy_from_slice(&seed[..32]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use genspec_core::constants::MNEMONIC_WORDS;

    const DEV_PHRASE: &str =
        "bottom drive obey lake curtain smoke basket hold race lonely fit walk";

    #[test]
    fn generated_phrase_has_twelve_words() {
        let m = generate().unwrap();
        assert_eq!(m.word_count(), MNEMONIC_WORDS);
        assert_eq!(m.to_string().split_whitespace().count(), MNEMONIC_WORDS);
    }

    #[test]
    fn generated_phrases_differ() {
        let a = generate().unwrap().to_string();
        let b = generate().unwrap().to_string();
        assert_ne!(a, b);
    }

    #[test]
    fn seed_is_deterministic_and_password_bound() {
        let m = parse(DEV_PHRASE).unwrap();
        let s1 = seed(&m, "").unwrap();
        let s2 = seed(&m, "").unwrap();
        let s3 = seed(&m, "hunter2").unwrap();
        assert_eq!(*s1, *s2);
        assert_ne!(*s1, *s3);
    }

    #[test]
    fn dev_phrase_matches_substrate_secret_seed() {
        let secret = mini_secret(&parse(DEV_PHRASE).unwrap()).unwrap();
        assert_eq!(
            hex::encode(&secret[..]),
            "fac7959dbfe72f052e5a0c3c8d6530f202b02fd8f9f5ca3580ec8deb7797479e"
        );
    }

    #[test]
    fn unknown_word_rejected() {
        let broken = DEV_PHRASE.replace("walk", "walkabout");
        assert!(matches!(parse(&broken), Err(GenspecError::KeyGeneration(_))));
    }

    #[test]
    fn odd_entropy_length_rejected() {
        assert!(seed_from_entropy(&[0u8; 15], "").is_err());
        assert!(seed_from_entropy(&[0u8; 36], "").is_err());
        assert!(seed_from_entropy(&[0u8; 16], "").is_ok());
    }
}
