use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_SPEC_HOST, SPEC_PATH_SEGMENT};
use crate::error::GenspecError;

/// Token amount in the chain's smallest unit.
pub type Balance = u128;

// ── Scheme ───────────────────────────────────────────────────────────────────

/// Signature scheme a key pair is derived for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Sr25519,
    Ed25519,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Sr25519 => "sr25519",
            Scheme::Ed25519 => "ed25519",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = GenspecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sr25519" => Ok(Scheme::Sr25519),
            "ed25519" => Ok(Scheme::Ed25519),
            other => Err(GenspecError::Config(format!("unknown scheme: {other}"))),
        }
    }
}

// ── PublicKey ────────────────────────────────────────────────────────────────

/// 32-byte public key shared by sr25519 and ed25519.
///
/// Serialized as a `0x`-prefixed lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    pub fn from_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse a hex string, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, GenspecError> {
        let bytes = decode_hex_32(s)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}…)", &self.to_hex()[..18])
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PublicKey::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Decode exactly 32 bytes of hex, accepting an optional `0x` prefix.
pub fn decode_hex_32(s: &str) -> Result<[u8; 32], GenspecError> {
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(trimmed)
        .map_err(|e| GenspecError::InvalidAddress(format!("bad hex: {e}")))?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
        GenspecError::InvalidAddress(format!("expected 32 bytes, got {}", bytes.len()))
    })
}

// ── BaseSpecName ─────────────────────────────────────────────────────────────

/// The fixed set of network templates a derivation can start from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseSpecName {
    Polkadot,
    Kusama,
    Rococo,
    #[default]
    Westend,
}

impl BaseSpecName {
    pub const ALL: [BaseSpecName; 4] = [
        BaseSpecName::Polkadot,
        BaseSpecName::Kusama,
        BaseSpecName::Rococo,
        BaseSpecName::Westend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BaseSpecName::Polkadot => "polkadot",
            BaseSpecName::Kusama => "kusama",
            BaseSpecName::Rococo => "rococo",
            BaseSpecName::Westend => "westend",
        }
    }

    /// `<host>/spec/<name>.json`; a trailing slash on `host` is ignored.
    pub fn url_on(&self, host: &str) -> String {
        format!(
            "{}/{}/{}.json",
            host.trim_end_matches('/'),
            SPEC_PATH_SEGMENT,
            self.as_str()
        )
    }

    pub fn default_url(&self) -> String {
        self.url_on(DEFAULT_SPEC_HOST)
    }
}

impl fmt::Display for BaseSpecName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseSpecName {
    type Err = GenspecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BaseSpecName::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| GenspecError::UnknownBaseSpec(s.to_string()))
    }
}
