//! Presentation of a derivation: JSON, YAML or a human-readable summary.

use std::fmt::Write as _;
use std::str::FromStr;

use genspec_core::{GenspecError, Result};
use genspec_genesis::spec::RUNTIME_PATH;
use genspec_genesis::{GenesisSpec, Role, SecretsBundle};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Yaml,
    Text,
}

impl FromStr for Format {
    type Err = GenspecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "text" | "txt" => Ok(Format::Text),
            other => Err(GenspecError::Config(format!("unknown format: {other}"))),
        }
    }
}

pub fn render_spec(spec: &GenesisSpec, format: Format) -> Result<String> {
    match format {
        Format::Json => serialize(spec, format),
        Format::Yaml => serialize(&PlainMap(spec.as_map()), format),
        Format::Text => Ok(spec_summary(spec)),
    }
}

pub fn render_secrets(secrets: &SecretsBundle, format: Format) -> Result<String> {
    match format {
        Format::Json | Format::Yaml => serialize(secrets, format),
        Format::Text => Ok(secrets_summary(secrets)),
    }
}

fn serialize<T: Serialize>(value: &T, format: Format) -> Result<String> {
    match format {
        Format::Yaml => {
            serde_yaml::to_string(value).map_err(|e| GenspecError::Serialization(e.to_string()))
        }
        _ => Ok(serde_json::to_string_pretty(value)?),
    }
}

// ── Plain tree ───────────────────────────────────────────────────────────────

// A JSON tree for non-JSON serializers. Numbers are written from their exact
// source text as integers or floats, never as serde_json's internal number
// wrapper.
struct Plain<'a>(&'a Value);

struct PlainMap<'a>(&'a Map<String, Value>);

impl Serialize for Plain<'_> {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Value::Null => s.serialize_unit(),
            Value::Bool(b) => s.serialize_bool(*b),
            Value::Number(n) => plain_number(n, s),
            Value::String(text) => s.serialize_str(text),
            Value::Array(items) => s.collect_seq(items.iter().map(Plain)),
            Value::Object(map) => PlainMap(map).serialize(s),
        }
    }
}

impl Serialize for PlainMap<'_> {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_map(self.0.iter().map(|(k, v)| (k, Plain(v))))
    }
}

fn plain_number<S: Serializer>(n: &Number, s: S) -> std::result::Result<S::Ok, S::Error> {
    let text = n.as_str();
    if let Ok(v) = text.parse::<u128>() {
        return s.serialize_u128(v);
    }
    if let Ok(v) = text.parse::<i128>() {
        return s.serialize_i128(v);
    }
    match n.as_f64() {
        Some(v) => s.serialize_f64(v),
        None => s.serialize_str(text),
    }
}

fn spec_summary(spec: &GenesisSpec) -> String {
    let runtime = spec.get_path(&RUNTIME_PATH);
    let section = |name: &str, key: &str| -> Vec<Value> {
        runtime
            .and_then(|rt| rt.get(name))
            .and_then(|s| s.get(key))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    };

    let mut out = String::new();
    let _ = writeln!(out, "Chain:        {}", spec.name().unwrap_or("<unnamed>"));
    if let Some(id) = spec.as_map().get("id").and_then(Value::as_str) {
        let _ = writeln!(out, "Id:           {id}");
    }

    let balances = section("balances", "balances");
    let _ = writeln!(out, "Balances:     {}", balances.len());
    for entry in &balances {
        let _ = writeln!(out, "  {}  {}", scalar(&entry[0]), scalar(&entry[1]));
    }

    let stakers = section("staking", "stakers");
    let _ = writeln!(out, "Validators:   {}", stakers.len());
    for (i, staker) in stakers.iter().enumerate() {
        let _ = writeln!(out, "  #{i}");
        let _ = writeln!(out, "    controller  {}", scalar(&staker[0]));
        let _ = writeln!(out, "    stash       {}", scalar(&staker[1]));
        let _ = writeln!(out, "    stake       {}", scalar(&staker[2]));
    }

    let keys = section("session", "keys");
    let _ = writeln!(out, "Session keys: {}", keys.len());
    out
}

fn secrets_summary(secrets: &SecretsBundle) -> String {
    let mut out = String::new();
    let sudo = &secrets.sudo;
    let _ = writeln!(out, "Sudo");
    let _ = writeln!(out, "  Address:  {}", sudo.account.address_ss58);
    let _ = writeln!(out, "  Balance:  {}", sudo.balance);
    let _ = writeln!(out, "  Phrase:   {}", sudo.account.mnemonic.as_str());

    for (i, authority) in secrets.authorities.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Authority #{i}  (balance {}, stake {})",
            authority.balance, authority.stake
        );
        for role in Role::ALL {
            let acct = authority.account(role);
            let _ = writeln!(
                out,
                "  {:<20} {:<8} {}",
                role.as_str(),
                acct.scheme().as_str(),
                acct.address_ss58
            );
            let _ = writeln!(out, "  {:<20} {:<8} {}", "", "phrase", acct.mnemonic.as_str());
        }
    }
    out
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".into(),
        other => other.to_string(),
    }
}
