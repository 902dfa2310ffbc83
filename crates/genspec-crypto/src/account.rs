use bip39::Mnemonic;
use genspec_core::{PublicKey, Result, Scheme};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::keypair::KeyPair;
use crate::{mnemonic, ss58};

/// One generated identity: the phrase it came from, the derived key pair and
/// both address renderings of the public key.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub mnemonic: Zeroizing<String>,
    pub key_pair: KeyPair,
    pub address_hex: String,
    #[serde(rename = "addressSS58")]
    pub address_ss58: String,
}

impl Account {
    /// Derive an account from an existing phrase.
    pub fn from_phrase(phrase: &str, scheme: Scheme, ss58_prefix: u16) -> Result<Self> {
        let m = mnemonic::parse(phrase)?;
        Self::from_mnemonic(&m, scheme, ss58_prefix)
    }

    pub fn from_mnemonic(m: &Mnemonic, scheme: Scheme, ss58_prefix: u16) -> Result<Self> {
        let secret = mnemonic::mini_secret(m)?;
        let key_pair = KeyPair::from_seed(scheme, &secret)?;
        let public = *key_pair.public_key();
        Ok(Self {
            mnemonic: Zeroizing::new(m.to_string()),
            key_pair,
            address_hex: public.to_hex(),
            address_ss58: ss58::encode(&public, ss58_prefix)?,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        self.key_pair.public_key()
    }

    pub fn scheme(&self) -> Scheme {
        self.key_pair.scheme()
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Account {{ {} {} }}", self.scheme(), self.address_ss58)
    }
}
