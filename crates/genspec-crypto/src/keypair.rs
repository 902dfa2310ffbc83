use ed25519_dalek::{Signer, Verifier};
use genspec_core::constants::SR25519_SIGNING_CONTEXT;
use genspec_core::{decode_hex_32, GenspecError, PublicKey, Result, Scheme};
use schnorrkel::{signing_context, ExpansionMode, MiniSecretKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

/// A key pair for one scheme, held as its 32-byte secret seed plus the
/// derived public key.
///
/// The seed is held in `Zeroizing` so it is wiped on drop.
#[derive(Clone)]
pub struct KeyPair {
    scheme: Scheme,
    public_key: PublicKey,
    secret_seed: Zeroizing<[u8; 32]>,
}

impl KeyPair {
    /// Derive the key pair for `scheme` from a 32-byte secret seed.
    ///
    /// sr25519 treats the seed as a schnorrkel mini secret expanded in
    /// Ed25519 mode; ed25519 uses it directly as the signing key.
    pub fn from_seed(scheme: Scheme, seed: &[u8; 32]) -> Result<Self> {
        let public = match scheme {
            Scheme::Sr25519 => {
                let mini = MiniSecretKey::from_bytes(seed)
                    .map_err(|e| GenspecError::KeyGeneration(format!("sr25519: {e}")))?;
                mini.expand_to_keypair(ExpansionMode::Ed25519)
                    .public
                    .to_bytes()
            }
            Scheme::Ed25519 => ed25519_dalek::SigningKey::from_bytes(seed)
                .verifying_key()
                .to_bytes(),
        };
        Ok(Self {
            scheme,
            public_key: PublicKey::from_bytes(public),
            secret_seed: Zeroizing::new(*seed),
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Return a read-only view of the secret seed bytes.
    pub fn secret_seed(&self) -> &[u8; 32] {
        &self.secret_seed
    }

    /// Sign `message`. Returns a 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> Result<[u8; 64]> {
        match self.scheme {
            Scheme::Sr25519 => {
                let mini = MiniSecretKey::from_bytes(&self.secret_seed[..])
                    .map_err(|e| GenspecError::KeyGeneration(format!("sr25519: {e}")))?;
                let pair = mini.expand_to_keypair(ExpansionMode::Ed25519);
                let ctx = signing_context(SR25519_SIGNING_CONTEXT);
                Ok(pair.sign(ctx.bytes(message)).to_bytes())
            }
            Scheme::Ed25519 => {
                let sk = ed25519_dalek::SigningKey::from_bytes(&self.secret_seed);
                Ok(sk.sign(message).to_bytes())
            }
        }
    }

    /// Verify a signature produced by [`KeyPair::sign`] for this key pair's scheme.
    pub fn verify(&self, message: &[u8], signature: &[u8; 64]) -> bool {
        verify(self.scheme, &self.public_key, message, signature)
    }
}

/// Verify a detached signature under `scheme`.
pub fn verify(scheme: Scheme, public: &PublicKey, message: &[u8], signature: &[u8; 64]) -> bool {
    match scheme {
        Scheme::Sr25519 => {
            let Ok(pk) = schnorrkel::PublicKey::from_bytes(public.as_bytes()) else {
                return false;
            };
            let Ok(sig) = schnorrkel::Signature::from_bytes(signature) else {
                return false;
            };
            let ctx = signing_context(SR25519_SIGNING_CONTEXT);
            pk.verify(ctx.bytes(message), &sig).is_ok()
        }
        Scheme::Ed25519 => {
            let Ok(vk) = ed25519_dalek::VerifyingKey::from_bytes(public.as_bytes()) else {
                return false;
            };
            let sig = ed25519_dalek::Signature::from_bytes(signature);
            vk.verify(message, &sig).is_ok()
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyPairRepr {
    scheme: Scheme,
    public_key: PublicKey,
    secret_seed: String,
}

impl Serialize for KeyPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        KeyPairRepr {
            scheme: self.scheme,
            public_key: self.public_key,
            secret_seed: format!("0x{}", hex::encode(&self.secret_seed[..])),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for KeyPair {
    /// Re-derives the public key from the seed and rejects a mismatch.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use serde::de::Error;
        let repr = KeyPairRepr::deserialize(deserializer)?;
        let seed = Zeroizing::new(decode_hex_32(&repr.secret_seed).map_err(D::Error::custom)?);
        let pair = KeyPair::from_seed(repr.scheme, &seed).map_err(D::Error::custom)?;
        if pair.public_key != repr.public_key {
            return Err(D::Error::custom("public key does not match secret seed"));
        }
        Ok(pair)
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("scheme", &self.scheme)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemes_derive_different_keys_from_one_seed() {
        let seed = [42u8; 32];
        let sr = KeyPair::from_seed(Scheme::Sr25519, &seed).unwrap();
        let ed = KeyPair::from_seed(Scheme::Ed25519, &seed).unwrap();
        assert_ne!(sr.public_key(), ed.public_key());
        assert_eq!(
            KeyPair::from_seed(Scheme::Sr25519, &seed).unwrap().public_key(),
            sr.public_key()
        );
    }

    #[test]
    fn sign_verify_round_trip() {
        for scheme in [Scheme::Sr25519, Scheme::Ed25519] {
            let kp = KeyPair::from_seed(scheme, &[7u8; 32]).unwrap();
            let sig = kp.sign(b"genesis").unwrap();
            assert!(kp.verify(b"genesis", &sig), "{scheme} must verify");
            assert!(!kp.verify(b"tampered", &sig), "{scheme} must reject");
        }
    }

    #[test]
    fn serde_round_trip_checks_public_key() {
        let kp = KeyPair::from_seed(Scheme::Ed25519, &[5u8; 32]).unwrap();
        let json = serde_json::to_value(&kp).unwrap();
        assert_eq!(json["scheme"], "ed25519");
        let back: KeyPair = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back.public_key(), kp.public_key());

        let mut forged = json;
        forged["publicKey"] = serde_json::Value::String(format!("0x{}", "00".repeat(32)));
        assert!(serde_json::from_value::<KeyPair>(forged).is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let kp = KeyPair::from_seed(Scheme::Sr25519, &[0xaa; 32]).unwrap();
        let dbg = format!("{kp:?}");
        assert!(!dbg.contains(&"aa".repeat(32)));
    }
}
