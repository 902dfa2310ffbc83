//! Authority set builder.
//!
//! Every authority gets eight independently generated accounts, one per role.
//! GRANDPA finality keys must be ed25519; every other role uses sr25519.

use futures::future::try_join_all;
use genspec_core::{Balance, GenspecError, Result, Scheme};
use genspec_crypto::{Account, CryptoGate, KeyGenerator};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::params::DerivationParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Controller,
    Stash,
    Grandpa,
    Babe,
    ImOnline,
    ParaValidator,
    ParaAssignment,
    AuthorityDiscovery,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Controller,
        Role::Stash,
        Role::Grandpa,
        Role::Babe,
        Role::ImOnline,
        Role::ParaValidator,
        Role::ParaAssignment,
        Role::AuthorityDiscovery,
    ];

    /// Roles registered in `session.keys`.
    pub const SESSION: [Role; 6] = [
        Role::Grandpa,
        Role::Babe,
        Role::ImOnline,
        Role::ParaValidator,
        Role::ParaAssignment,
        Role::AuthorityDiscovery,
    ];

    pub fn scheme(self) -> Scheme {
        match self {
            Role::Grandpa => Scheme::Ed25519,
            _ => Scheme::Sr25519,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Controller => "controller",
            Role::Stash => "stash",
            Role::Grandpa => "grandpa",
            Role::Babe => "babe",
            Role::ImOnline => "im_online",
            Role::ParaValidator => "para_validator",
            Role::ParaAssignment => "para_assignment",
            Role::AuthorityDiscovery => "authority_discovery",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validator slot: an account per role plus its endowment and bond.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authority {
    pub controller: Account,
    pub stash: Account,
    pub grandpa: Account,
    pub babe: Account,
    pub im_online: Account,
    pub para_validator: Account,
    pub para_assignment: Account,
    pub authority_discovery: Account,
    pub balance: Balance,
    pub stake: Balance,
}

impl Authority {
    /// Generate all eight role accounts.
    pub fn generate(generator: &KeyGenerator, balance: Balance, stake: Balance) -> Result<Self> {
        let make = |role: Role| generator.generate_account(role.scheme());
        Ok(Self {
            controller: make(Role::Controller)?,
            stash: make(Role::Stash)?,
            grandpa: make(Role::Grandpa)?,
            babe: make(Role::Babe)?,
            im_online: make(Role::ImOnline)?,
            para_validator: make(Role::ParaValidator)?,
            para_assignment: make(Role::ParaAssignment)?,
            authority_discovery: make(Role::AuthorityDiscovery)?,
            balance,
            stake,
        })
    }

    pub fn account(&self, role: Role) -> &Account {
        match role {
            Role::Controller => &self.controller,
            Role::Stash => &self.stash,
            Role::Grandpa => &self.grandpa,
            Role::Babe => &self.babe,
            Role::ImOnline => &self.im_online,
            Role::ParaValidator => &self.para_validator,
            Role::ParaAssignment => &self.para_assignment,
            Role::AuthorityDiscovery => &self.authority_discovery,
        }
    }

    pub fn accounts(&self) -> impl Iterator<Item = (Role, &Account)> + '_ {
        Role::ALL.into_iter().map(move |role| (role, self.account(role)))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SudoAccount {
    pub account: Account,
    pub balance: Balance,
}

/// Everything secret a derivation produced, in output order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SecretsBundle {
    pub sudo: SudoAccount,
    pub authorities: Vec<Authority>,
}

impl SecretsBundle {
    /// Every account in the bundle: sudo first, then each authority's roles.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> + '_ {
        std::iter::once(&self.sudo.account)
            .chain(self.authorities.iter().flat_map(|a| a.accounts().map(|(_, acct)| acct)))
    }
}

/// Build one sudo account and `authority_count` authorities.
///
/// Authorities are generated on blocking threads and collected in index
/// order. The first failure aborts the build; no partial bundle is returned.
pub async fn build_secrets(
    gate: &CryptoGate,
    authority_count: usize,
    params: &DerivationParams,
) -> Result<SecretsBundle> {
    let generator = gate.generator(params.ss58_prefix)?;
    info!(
        authorities = authority_count,
        ss58_prefix = params.ss58_prefix,
        "building authority set"
    );

    let sudo = SudoAccount {
        account: generator.generate_account(Scheme::Sr25519)?,
        balance: params.sudo_balance,
    };

    let (balance, stake) = (params.authority_balance, params.authority_stake);
    let handles = (0..authority_count).map(|_| {
        tokio::task::spawn_blocking(move || Authority::generate(&generator, balance, stake))
    });
    let authorities = try_join_all(handles)
        .await
        .map_err(|e| GenspecError::KeyGeneration(format!("authority task aborted: {e}")))?
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    for (index, authority) in authorities.iter().enumerate() {
        debug!(index, controller = %authority.controller.address_ss58, "authority generated");
    }
    info!(
        sudo = %sudo.account.address_ss58,
        authorities = authorities.len(),
        "authority set built"
    );

    Ok(SecretsBundle { sudo, authorities })
}
