//! genspec-genesis
//!
//! Derives a fresh genesis from a base chainspec. Three steps, always run
//! together:
//!
//! 1. `authority_count`  : read how many validators the base spec declares
//! 2. `build_secrets`    : generate a sudo account plus one eight-role key set
//!                         per validator
//! 3. `merge_secrets`    : rewrite `balances`, `staking` and `session` in a
//!                         copy of the base spec
//!
//! Every other part of the base spec carries over unchanged.

pub mod authority;
pub mod merge;
pub mod params;
pub mod spec;

pub use authority::{build_secrets, Authority, Role, SecretsBundle, SudoAccount};
pub use merge::merge_secrets;
pub use params::DerivationParams;
pub use spec::{authority_count, check_shape, GenesisSpec};
