//! SS58 address codec for 32-byte account keys.
//!
//! Layout: `prefix (1 or 2 bytes) || public key (32 bytes) || checksum (2 bytes)`,
//! base58-encoded. The checksum is the head of
//! `BLAKE2b-512("SS58PRE" || prefix || public key)`.
//!
//! Output matches `sp_core::crypto::Ss58Codec` for 32-byte account ids, built
//! on `bs58` and `blake2` directly instead of the Substrate primitives crates.

use blake2::{Blake2b512, Digest};
use genspec_core::constants::{MAX_SS58_PREFIX, SS58_CHECKSUM_LEN, SS58_CHECKSUM_PREAMBLE};
use genspec_core::{GenspecError, PublicKey, Result};

/// Encode `public` under network `prefix`.
pub fn encode(public: &PublicKey, prefix: u16) -> Result<String> {
    let mut payload = prefix_bytes(prefix)?;
    payload.extend_from_slice(public.as_bytes());
    let hash = checksum(&payload);
    payload.extend_from_slice(&hash[..SS58_CHECKSUM_LEN]);
    Ok(bs58::encode(payload).into_string())
}

/// Decode an address into its network prefix and public key.
pub fn decode(address: &str) -> Result<(u16, PublicKey)> {
    let data = bs58::decode(address)
        .into_vec()
        .map_err(|e| GenspecError::InvalidAddress(format!("bad base58: {e}")))?;
    if data.len() < 2 {
        return Err(GenspecError::InvalidAddress("address too short".into()));
    }

    let (prefix_len, prefix) = match data[0] {
        0..=63 => (1, data[0] as u16),
        64..=127 => {
            let lower = (data[0] << 2) | (data[1] >> 6);
            let upper = data[1] & 0b0011_1111;
            (2, lower as u16 | ((upper as u16) << 8))
        }
        other => {
            return Err(GenspecError::InvalidAddress(format!(
                "invalid prefix byte {other:#04x}"
            )))
        }
    };

    let expected = prefix_len + 32 + SS58_CHECKSUM_LEN;
    if data.len() != expected {
        return Err(GenspecError::InvalidAddress(format!(
            "expected {expected} bytes, got {}",
            data.len()
        )));
    }

    let body_end = prefix_len + 32;
    let hash = checksum(&data[..body_end]);
    if data[body_end..] != hash[..SS58_CHECKSUM_LEN] {
        return Err(GenspecError::InvalidAddress("checksum mismatch".into()));
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&data[prefix_len..body_end]);
    Ok((prefix, PublicKey::from_bytes(key)))
}

fn prefix_bytes(prefix: u16) -> Result<Vec<u8>> {
    match prefix {
        0..=63 => Ok(vec![prefix as u8]),
        64..=MAX_SS58_PREFIX => {
            let first = ((prefix & 0b0000_0000_1111_1100) as u8) >> 2;
            let second = ((prefix >> 8) as u8) | (((prefix & 0b0000_0000_0000_0011) as u8) << 6);
            Ok(vec![first | 0b0100_0000, second])
        }
        _ => Err(GenspecError::InvalidAddress(format!(
            "prefix {prefix} exceeds {MAX_SS58_PREFIX}"
        ))),
    }
}

fn checksum(payload: &[u8]) -> [u8; 64] {
    let mut hasher = Blake2b512::new();
    hasher.update(SS58_CHECKSUM_PREAMBLE);
    hasher.update(payload);
    let mut out = [0u8; 64];
    out.copy_from_slice(&hasher.finalize());
    out
}
