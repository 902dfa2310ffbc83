//! Weave a secrets bundle into a copy of the base spec.

use genspec_core::constants::STAKER_STATUS_VALIDATOR;
use genspec_core::{GenspecError, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::authority::{Authority, SecretsBundle};
use crate::spec::{
    BalanceEntry, BalancesSection, GenesisSpec, SessionKeyEntry, SessionKeys, SessionSection,
    StakerEntry, StakingSection, BALANCES_SECTION, SESSION_SECTION, STAKING_SECTION,
};

/// Produce a new spec whose `balances`, `staking` and `session` sections
/// reflect `secrets`. `base` is left untouched.
///
/// Only the keys of the typed sections are replaced; sibling keys inside those
/// objects and every other part of the tree carry over unchanged.
pub fn merge_secrets(base: &GenesisSpec, secrets: &SecretsBundle) -> Result<GenesisSpec> {
    let mut derived = base.clone();

    write_section(&mut derived, BALANCES_SECTION, &balances_section(secrets))?;
    write_section(&mut derived, STAKING_SECTION, &staking_section(secrets))?;
    write_section(&mut derived, SESSION_SECTION, &session_section(secrets))?;

    info!(
        chain = derived.name().unwrap_or("<unnamed>"),
        authorities = secrets.authorities.len(),
        "merged secrets into genesis"
    );
    Ok(derived)
}

pub fn balances_section(secrets: &SecretsBundle) -> BalancesSection {
    let sudo = BalanceEntry(
        secrets.sudo.account.address_ss58.clone(),
        secrets.sudo.balance,
    );
    let authorities = secrets
        .authorities
        .iter()
        .map(|a| BalanceEntry(a.controller.address_ss58.clone(), a.balance));
    BalancesSection {
        balances: std::iter::once(sudo).chain(authorities).collect(),
    }
}

pub fn staking_section(secrets: &SecretsBundle) -> StakingSection {
    StakingSection {
        invulnerables: secrets
            .authorities
            .iter()
            .map(|a| a.controller.address_ss58.clone())
            .collect(),
        stakers: secrets
            .authorities
            .iter()
            .map(|a| {
                StakerEntry(
                    a.controller.address_ss58.clone(),
                    a.stash.address_ss58.clone(),
                    a.stake,
                    STAKER_STATUS_VALIDATOR.to_string(),
                )
            })
            .collect(),
    }
}

pub fn session_section(secrets: &SecretsBundle) -> SessionSection {
    SessionSection {
        keys: secrets
            .authorities
            .iter()
            .map(|a| {
                SessionKeyEntry(
                    a.controller.address_ss58.clone(),
                    a.controller.address_ss58.clone(),
                    session_keys(a),
                )
            })
            .collect(),
    }
}

fn session_keys(a: &Authority) -> SessionKeys {
    SessionKeys {
        grandpa: a.grandpa.address_ss58.clone(),
        babe: a.babe.address_ss58.clone(),
        im_online: a.im_online.address_ss58.clone(),
        para_validator: a.para_validator.address_ss58.clone(),
        para_assignment: a.para_assignment.address_ss58.clone(),
        authority_discovery: a.authority_discovery.address_ss58.clone(),
    }
}

/// Overwrite the keys of `section` inside `genesis.runtime.<name>`.
fn write_section<T: Serialize>(spec: &mut GenesisSpec, name: &str, section: &T) -> Result<()> {
    let fields = match serde_json::to_value(section)? {
        Value::Object(map) => map,
        _ => {
            return Err(GenspecError::Serialization(format!(
                "{name} section did not serialize to an object"
            )))
        }
    };
    let target = spec.runtime_section_mut(name)?;
    for (key, value) in fields {
        target.insert(key, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::{build_secrets, Role};
    use crate::params::DerivationParams;
    use crate::spec::authority_count;
    use genspec_crypto::CryptoGate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn base_spec(stakers: usize) -> GenesisSpec {
        let stakers: Vec<Value> = (0..stakers)
            .map(|i| json!([format!("ctrl{i}"), format!("stash{i}"), 1000, "Validator"]))
            .collect();
        GenesisSpec::from_value(json!({
            "name": "Westend",
            "id": "westend2",
            "bootNodes": ["/dns/boot.example/tcp/30333/p2p/12D3KooW"],
            "properties": { "ss58Format": 42, "tokenDecimals": 12 },
            "genesis": {
                "runtime": {
                    "system": { "code": "0x0061736d" },
                    "balances": { "balances": [["old", 1]] },
                    "staking": {
                        "validatorCount": 50,
                        "minimumValidatorCount": 1,
                        "invulnerables": ["old"],
                        "stakers": stakers,
                        "forceEra": "NotForcing"
                    },
                    "session": { "keys": [] },
                    "sudo": { "key": "5Fold" }
                }
            }
        }))
        .unwrap()
    }

    async fn secrets_for(spec: &GenesisSpec) -> SecretsBundle {
        let gate = CryptoGate::new();
        gate.ready().await.unwrap();
        let count = authority_count(spec).unwrap();
        build_secrets(&gate, count, &DerivationParams::default())
            .await
            .unwrap()
    }

    fn runtime(spec: &GenesisSpec) -> &Value {
        spec.get_path(&["genesis", "runtime"]).unwrap()
    }

    #[tokio::test]
    async fn single_staker_scenario() {
        let base = base_spec(1);
        let secrets = secrets_for(&base).await;
        let derived = merge_secrets(&base, &secrets).unwrap();
        let rt = runtime(&derived);

        let balances = rt["balances"]["balances"].as_array().unwrap();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0][0], secrets.sudo.account.address_ss58.as_str());
        assert_eq!(balances[1][0], secrets.authorities[0].controller.address_ss58.as_str());

        let stakers = rt["staking"]["stakers"].as_array().unwrap();
        assert_eq!(stakers.len(), 1);
        assert_eq!(stakers[0][3], "Validator");
        assert_eq!(stakers[0][1], secrets.authorities[0].stash.address_ss58.as_str());

        let keys = rt["session"]["keys"].as_array().unwrap();
        assert_eq!(keys.len(), 1);
        let record = keys[0][2].as_object().unwrap();
        assert_eq!(record.len(), Role::SESSION.len());
        for role in Role::SESSION {
            assert_eq!(
                record[role.as_str()],
                secrets.authorities[0].account(role).address_ss58.as_str()
            );
        }
    }

    #[tokio::test]
    async fn empty_staker_scenario() {
        let base = base_spec(0);
        let secrets = secrets_for(&base).await;
        let derived = merge_secrets(&base, &secrets).unwrap();
        let rt = runtime(&derived);

        assert_eq!(rt["balances"]["balances"].as_array().unwrap().len(), 1);
        assert_eq!(rt["staking"]["invulnerables"], json!([]));
        assert_eq!(rt["staking"]["stakers"], json!([]));
        assert_eq!(rt["session"]["keys"], json!([]));
    }

    #[tokio::test]
    async fn cardinalities_follow_staker_count() {
        let base = base_spec(4);
        let secrets = secrets_for(&base).await;
        let derived = merge_secrets(&base, &secrets).unwrap();
        let rt = runtime(&derived);

        assert_eq!(rt["balances"]["balances"].as_array().unwrap().len(), 5);
        assert_eq!(rt["staking"]["invulnerables"].as_array().unwrap().len(), 4);
        assert_eq!(rt["staking"]["stakers"].as_array().unwrap().len(), 4);
        assert_eq!(rt["session"]["keys"].as_array().unwrap().len(), 4);
        assert_eq!(authority_count(&derived).unwrap(), 4);

        for (i, authority) in secrets.authorities.iter().enumerate() {
            let ctrl = authority.controller.address_ss58.as_str();
            assert_eq!(rt["staking"]["invulnerables"][i], ctrl);
            assert_eq!(rt["staking"]["stakers"][i][0], ctrl);
            assert_eq!(rt["session"]["keys"][i][0], ctrl);
            assert_eq!(rt["session"]["keys"][i][1], ctrl);
        }
    }

    #[tokio::test]
    async fn untouched_paths_survive() {
        let base = base_spec(2);
        let snapshot = base.clone();
        let secrets = secrets_for(&base).await;
        let derived = merge_secrets(&base, &secrets).unwrap();

        assert_eq!(base, snapshot);
        for key in ["name", "id", "bootNodes", "properties"] {
            assert_eq!(derived.as_map()[key], base.as_map()[key]);
        }
        let (before, after) = (runtime(&base), runtime(&derived));
        assert_eq!(after["system"], before["system"]);
        assert_eq!(after["sudo"], before["sudo"]);
        assert_eq!(after["staking"]["validatorCount"], json!(50));
        assert_eq!(after["staking"]["forceEra"], json!("NotForcing"));

        let keys: Vec<_> = after["staking"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            ["validatorCount", "minimumValidatorCount", "invulnerables", "stakers", "forceEra"]
        );
    }

    fn wide_base_spec() -> GenesisSpec {
        GenesisSpec::from_slice(
            br#"{
                "name": "Wide",
                "properties": { "tokenDecimals": [12, 18], "existentialDeposit": 0.0001 },
                "genesis": { "runtime": {
                    "treasury": { "pot": 100000000000000000000, "burn": 1e-3 },
                    "balances": { "balances": [["old", 340282366920938463463374607431768211455]], "devAccounts": null },
                    "staking": {
                        "minNominatorBond": 340282366920938463463374607431768211455,
                        "slashRewardFraction": 0.1,
                        "invulnerables": [],
                        "stakers": [["c", "s", 18446744073709551616, "Validator"]],
                        "nested": [[1, [2.5, -3]], { "deep": [18446744073709551615] }]
                    },
                    "session": { "keys": [], "nonAuthorityKeys": [] },
                    "sudo": { "key": "5Fold" }
                } }
            }"#,
        )
        .unwrap()
    }

    // Removes the keys merge_secrets writes, leaving everything it must not touch.
    fn without_rewritten_keys(spec: &GenesisSpec) -> Value {
        let mut tree = spec.clone().into_value();
        let runtime = tree["genesis"]["runtime"].as_object_mut().unwrap();
        runtime["balances"].as_object_mut().unwrap().remove("balances");
        let staking = runtime["staking"].as_object_mut().unwrap();
        staking.remove("invulnerables");
        staking.remove("stakers");
        runtime["session"].as_object_mut().unwrap().remove("keys");
        tree
    }

    #[tokio::test]
    async fn everything_outside_rewritten_keys_is_identical() {
        let base = wide_base_spec();
        let secrets = secrets_for(&base).await;
        let derived = merge_secrets(&base, &secrets).unwrap();

        assert_eq!(without_rewritten_keys(&derived), without_rewritten_keys(&base));

        let out = serde_json::to_string(&derived).unwrap();
        assert!(out.contains(r#""pot":100000000000000000000"#));
        assert!(out.contains(r#""minNominatorBond":340282366920938463463374607431768211455"#));
        assert!(out.contains(r#""burn":1e-3"#));
        assert!(out.contains(r#""existentialDeposit":0.0001"#));
        assert!(out.contains(r#""deep":[18446744073709551615]"#));
    }

    #[tokio::test]
    async fn amounts_beyond_u64_are_written_exactly() {
        let base = base_spec(1);
        let gate = CryptoGate::new();
        gate.ready().await.unwrap();
        let params = DerivationParams {
            sudo_balance: 100_000_000_000_000_000_000,
            authority_balance: u128::MAX,
            authority_stake: u128::MAX / 2,
            ..Default::default()
        };
        params.validate().unwrap();
        let secrets = build_secrets(&gate, 1, &params).await.unwrap();
        let derived = merge_secrets(&base, &secrets).unwrap();
        let rt = runtime(&derived);

        assert_eq!(rt["balances"]["balances"][0][1].to_string(), "100000000000000000000");
        assert_eq!(rt["balances"]["balances"][1][1].to_string(), u128::MAX.to_string());
        assert_eq!(rt["staking"]["stakers"][0][2].to_string(), (u128::MAX / 2).to_string());
    }

    #[tokio::test]
    async fn merge_is_idempotent() {
        let base = base_spec(3);
        let secrets = secrets_for(&base).await;
        let first = serde_json::to_string(&merge_secrets(&base, &secrets).unwrap()).unwrap();
        let second = serde_json::to_string(&merge_secrets(&base, &secrets).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_section_is_shape_error() {
        let base = base_spec(1);
        let secrets = secrets_for(&base).await;
        let mut value = base.into_value();
        value["genesis"]["runtime"]
            .as_object_mut()
            .unwrap()
            .remove("session");
        let broken = GenesisSpec::from_value(value).unwrap();
        assert!(matches!(
            merge_secrets(&broken, &secrets),
            Err(GenspecError::SpecShape(_))
        ));
    }
}
