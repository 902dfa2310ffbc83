use std::path::Path;

use genspec_core::constants::{
    DEFAULT_AUTHORITY_BALANCE, DEFAULT_AUTHORITY_STAKE, DEFAULT_SS58_PREFIX,
    DEFAULT_SUDO_BALANCE, MAX_SS58_PREFIX,
};
use genspec_core::{Balance, GenspecError, Result};
use serde::{Deserialize, Serialize};

/// Amounts and address format applied to every derived genesis.
///
/// Fields missing from a params file fall back to the protocol defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DerivationParams {
    /// Endowment of the generated sudo account.
    pub sudo_balance: Balance,
    /// Endowment of each authority's controller account.
    pub authority_balance: Balance,
    /// Bond recorded for each authority in `staking.stakers`.
    pub authority_stake: Balance,
    /// SS58 network prefix for every generated address.
    pub ss58_prefix: u16,
}

impl Default for DerivationParams {
    fn default() -> Self {
        Self {
            sudo_balance: DEFAULT_SUDO_BALANCE,
            authority_balance: DEFAULT_AUTHORITY_BALANCE,
            authority_stake: DEFAULT_AUTHORITY_STAKE,
            ss58_prefix: DEFAULT_SS58_PREFIX,
        }
    }
}

impl DerivationParams {
    /// Read params from a JSON file and validate them.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| GenspecError::Config(format!("reading {}: {e}", path.display())))?;
        let params: Self = serde_json::from_str(&json)
            .map_err(|e| GenspecError::Config(format!("parsing {}: {e}", path.display())))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ss58_prefix > MAX_SS58_PREFIX {
            return Err(GenspecError::Config(format!(
                "ss58Prefix {} exceeds {MAX_SS58_PREFIX}",
                self.ss58_prefix
            )));
        }
        if self.authority_stake > self.authority_balance {
            return Err(GenspecError::Config(format!(
                "authorityStake {} exceeds authorityBalance {}",
                self.authority_stake, self.authority_balance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        DerivationParams::default().validate().unwrap();
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "ss58Prefix": 0, "sudoBalance": 5 }}"#).unwrap();
        let params = DerivationParams::load(file.path()).unwrap();
        assert_eq!(params.ss58_prefix, 0);
        assert_eq!(params.sudo_balance, 5);
        assert_eq!(params.authority_stake, DEFAULT_AUTHORITY_STAKE);
    }

    #[test]
    fn amounts_beyond_u64_load_exactly() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "sudoBalance": 100000000000000000000, "authorityBalance": 340282366920938463463374607431768211455 }}"#
        )
        .unwrap();
        let params = DerivationParams::load(file.path()).unwrap();
        assert_eq!(params.sudo_balance, 100_000_000_000_000_000_000);
        assert_eq!(params.authority_balance, u128::MAX);
    }

    #[test]
    fn stake_above_balance_rejected() {
        let params = DerivationParams {
            authority_balance: 10,
            authority_stake: 11,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(GenspecError::Config(_))));
    }

    #[test]
    fn malformed_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            DerivationParams::load(file.path()),
            Err(GenspecError::Config(_))
        ));
    }
}
