//! One-time readiness gate for the key material generator.
//!
//! `CryptoGate::ready` runs a sign/verify self test for both schemes on a
//! blocking thread the first time it is awaited; later awaits return at once.
//! A `KeyGenerator` can only be obtained after the gate has opened.

use genspec_core::{GenspecError, Result, Scheme};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::account::Account;
use crate::keypair::KeyPair;
use crate::{mnemonic, ss58};

#[derive(Debug, Default)]
pub struct CryptoGate {
    ready: OnceCell<()>,
}

impl CryptoGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the gate. Idempotent; concurrent callers share one self test.
    pub async fn ready(&self) -> Result<()> {
        self.ready
            .get_or_try_init(|| async {
                match tokio::task::spawn_blocking(self_test).await {
                    Ok(result) => result,
                    Err(e) => Err(GenspecError::KeyGeneration(format!(
                        "self test aborted: {e}"
                    ))),
                }
            })
            .await?;
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    /// A generator encoding addresses under `ss58_prefix`.
    ///
    /// Fails with `CryptoNotReady` until [`CryptoGate::ready`] has resolved.
    pub fn generator(&self, ss58_prefix: u16) -> Result<KeyGenerator> {
        if !self.is_ready() {
            return Err(GenspecError::CryptoNotReady);
        }
        Ok(KeyGenerator { ss58_prefix })
    }
}

/// Produces fresh, independent accounts. Cheap to copy across threads.
#[derive(Clone, Copy, Debug)]
pub struct KeyGenerator {
    ss58_prefix: u16,
}

impl KeyGenerator {
    pub fn ss58_prefix(&self) -> u16 {
        self.ss58_prefix
    }

    /// Generate a new phrase and derive an account for `scheme` from it.
    pub fn generate_account(&self, scheme: Scheme) -> Result<Account> {
        let phrase = mnemonic::generate()?;
        Account::from_mnemonic(&phrase, scheme, self.ss58_prefix)
    }
}

fn self_test() -> Result<()> {
    let seed = mnemonic::seed_from_entropy(&[0x5a; 16], "")?;
    let mut secret = [0u8; 32];
    secret.copy_from_slice(&seed[..32]);

    for scheme in [Scheme::Sr25519, Scheme::Ed25519] {
        let pair = KeyPair::from_seed(scheme, &secret)?;
        let sig = pair.sign(b"genspec self test")?;
        if !pair.verify(b"genspec self test", &sig) || pair.verify(b"genspec", &sig) {
            return Err(GenspecError::KeyGeneration(format!(
                "{scheme} self test failed"
            )));
        }
        let address = ss58::encode(pair.public_key(), 42)?;
        if ss58::decode(&address)?.1 != *pair.public_key() {
            return Err(GenspecError::KeyGeneration("ss58 self test failed".into()));
        }
        debug!(%scheme, "self test passed");
    }
    info!("crypto subsystem ready");
    Ok(())
}
