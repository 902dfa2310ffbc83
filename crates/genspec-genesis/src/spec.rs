//! The chainspec tree and the typed sections derivation rewrites.
//!
//! A `GenesisSpec` is an opaque JSON object whose key order is preserved. Only
//! three objects under `genesis.runtime` are ever touched: `balances`,
//! `staking` and `session`. Those are produced as typed records and written
//! into a copy of the tree; everything else passes through as-is.

use genspec_core::{Balance, GenspecError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Path from the spec root to the runtime genesis config.
pub const RUNTIME_PATH: [&str; 2] = ["genesis", "runtime"];

pub const BALANCES_SECTION: &str = "balances";
pub const STAKING_SECTION: &str = "staking";
pub const SESSION_SECTION: &str = "session";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenesisSpec(Map<String, Value>);

impl GenesisSpec {
    /// Wrap a parsed JSON value. The root must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(GenspecError::SpecShape(format!(
                "spec root must be an object, got {}",
                type_name(&other)
            ))),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::from_value(serde_json::from_slice(bytes)?)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// The chain's display name, if the spec carries one.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Follow `path` from the root through nested objects.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.0.get(*first)?, |node, key| node.as_object()?.get(*key))
    }

    /// The existing `genesis.runtime.staking.stakers` sequence.
    pub fn stakers(&self) -> Result<&Vec<Value>> {
        let path = [RUNTIME_PATH[0], RUNTIME_PATH[1], STAKING_SECTION, "stakers"];
        match self.get_path(&path) {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(GenspecError::SpecShape(format!(
                "{} must be an array, got {}",
                path.join("."),
                type_name(other)
            ))),
            None => Err(GenspecError::SpecShape(format!("missing {}", path.join(".")))),
        }
    }

    /// Mutable access to the object at `genesis.runtime.<section>`.
    pub(crate) fn runtime_section_mut(&mut self, section: &str) -> Result<&mut Map<String, Value>> {
        let mut node = &mut self.0;
        let mut walked = Vec::with_capacity(3);
        for key in RUNTIME_PATH.iter().copied().chain(std::iter::once(section)) {
            walked.push(key);
            node = match node.get_mut(key) {
                Some(Value::Object(map)) => map,
                Some(other) => {
                    return Err(GenspecError::SpecShape(format!(
                        "{} must be an object, got {}",
                        walked.join("."),
                        type_name(other)
                    )))
                }
                None => {
                    return Err(GenspecError::SpecShape(format!(
                        "missing {}",
                        walked.join(".")
                    )))
                }
            };
        }
        Ok(node)
    }
}

/// Number of authorities a base spec asks for: the length of its staker list.
pub fn authority_count(spec: &GenesisSpec) -> Result<usize> {
    spec.stakers().map(Vec::len)
}

/// Check that every object the merger writes into is present, so a broken
/// base spec is rejected before any keys are generated.
pub fn check_shape(spec: &GenesisSpec) -> Result<()> {
    spec.stakers()?;
    for section in [BALANCES_SECTION, STAKING_SECTION, SESSION_SECTION] {
        let path = [RUNTIME_PATH[0], RUNTIME_PATH[1], section];
        match spec.get_path(&path) {
            Some(Value::Object(_)) => {}
            Some(other) => {
                return Err(GenspecError::SpecShape(format!(
                    "{} must be an object, got {}",
                    path.join("."),
                    type_name(other)
                )))
            }
            None => return Err(GenspecError::SpecShape(format!("missing {}", path.join(".")))),
        }
    }
    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Typed sections ───────────────────────────────────────────────────────────

/// `[address, amount]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry(pub String, pub Balance);

/// `[controller, stash, stake, status]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakerEntry(pub String, pub String, pub Balance, pub String);

/// Session key addresses, one per session role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKeys {
    pub grandpa: String,
    pub babe: String,
    pub im_online: String,
    pub para_validator: String,
    pub para_assignment: String,
    pub authority_discovery: String,
}

/// `[controller, controller, keys]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKeyEntry(pub String, pub String, pub SessionKeys);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancesSection {
    pub balances: Vec<BalanceEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingSection {
    pub invulnerables: Vec<String>,
    pub stakers: Vec<StakerEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSection {
    pub keys: Vec<SessionKeyEntry>,
}
