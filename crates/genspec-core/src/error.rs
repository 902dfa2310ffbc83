use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenspecError {
    // ── Key material ─────────────────────────────────────────────────────────
    #[error("crypto subsystem not ready; await CryptoGate::ready() first")]
    CryptoNotReady,

    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    // ── Base spec ────────────────────────────────────────────────────────────
    #[error("failed to fetch base spec: {0}")]
    SpecFetch(String),

    #[error("base spec has unexpected shape: {0}")]
    SpecShape(String),

    #[error("unknown base spec: {0}")]
    UnknownBaseSpec(String),

    // ── Pipeline ─────────────────────────────────────────────────────────────
    #[error("derivation {generation} superseded by a newer selection")]
    Superseded { generation: u64 },

    // ── Serialization / config ───────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for GenspecError {
    fn from(e: serde_json::Error) -> Self {
        GenspecError::Serialization(e.to_string())
    }
}

pub type Result<T, E = GenspecError> = std::result::Result<T, E>;
