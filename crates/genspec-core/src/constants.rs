/// ─── Genspec Derivation Constants ───────────────────────────────────────────
///
/// Defaults for a freshly derived genesis. Every amount here is in the chain's
/// smallest unit (Planck for Polkadot-family chains) and can be overridden per
/// run through `DerivationParams`.

// ── Allocations ──────────────────────────────────────────────────────────────

/// Balance endowed to the generated sudo account.
pub const DEFAULT_SUDO_BALANCE: u128 = 10_000_000_000_000_000;

/// Balance endowed to each authority's controller account.
pub const DEFAULT_AUTHORITY_BALANCE: u128 = 1_000_000_000_000_000;

/// Amount bonded by each authority in `staking.stakers`.
pub const DEFAULT_AUTHORITY_STAKE: u128 = 100_000_000_000_000;

/// Role tag written as the last element of every `staking.stakers` tuple.
pub const STAKER_STATUS_VALIDATOR: &str = "Validator";

// ── Addresses ────────────────────────────────────────────────────────────────

/// Generic Substrate SS58 network prefix.
pub const DEFAULT_SS58_PREFIX: u16 = 42;

/// Highest prefix representable in the two-byte SS58 form.
pub const MAX_SS58_PREFIX: u16 = 16_383;

/// Context string hashed in front of every SS58 payload before checksumming.
pub const SS58_CHECKSUM_PREAMBLE: &[u8] = b"SS58PRE";

/// Checksum bytes appended to a 32-byte account SS58 payload.
pub const SS58_CHECKSUM_LEN: usize = 2;

// ── Key material ─────────────────────────────────────────────────────────────

/// Words in a generated mnemonic (128 bits of entropy).
pub const MNEMONIC_WORDS: usize = 12;

/// Entropy bytes behind a `MNEMONIC_WORDS`-word phrase.
pub const MNEMONIC_ENTROPY_BYTES: usize = 16;

/// PBKDF2 rounds used to stretch mnemonic entropy into a seed.
pub const SEED_PBKDF2_ROUNDS: u32 = 2048;

/// Salt prefix for the seed derivation; an optional password is appended.
pub const SEED_SALT_PREFIX: &str = "mnemonic";

/// Signing context used by the sr25519 self test.
pub const SR25519_SIGNING_CONTEXT: &[u8] = b"substrate";

// ── Base specs ───────────────────────────────────────────────────────────────

/// Host serving `spec/<name>.json` templates when none is configured.
pub const DEFAULT_SPEC_HOST: &str = "http://127.0.0.1:3000";

/// Path segment under the spec host where templates live.
pub const SPEC_PATH_SEGMENT: &str = "spec";

/// Seconds to wait for a base spec before giving up.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
