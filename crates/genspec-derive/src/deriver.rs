//! Fetch → count → generate → merge, with supersession.
//!
//! Each call to `derive*` starts a new generation and cancels whatever was in
//! flight. A result is only published (and only returned as `Ok`) if its
//! generation is still the newest when it finishes; anything older comes back
//! as `Superseded` and is dropped, secrets included.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use genspec_core::{BaseSpecName, GenspecError, Result};
use genspec_crypto::CryptoGate;
use genspec_fetch::SpecSource;
use genspec_genesis::{
    authority_count, build_secrets, check_shape, merge_secrets, DerivationParams, GenesisSpec,
    SecretsBundle,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// The output of one successful derivation.
#[derive(Debug, Clone, Serialize)]
pub struct Derivation {
    /// Base spec name, URL or other label the input came from.
    pub origin: String,
    pub generation: u64,
    pub spec: GenesisSpec,
    pub secrets: SecretsBundle,
}

enum Input {
    Named(BaseSpecName),
    Spec(GenesisSpec),
}

struct Slot {
    generation: u64,
    token: CancellationToken,
    latest: Option<Arc<Derivation>>,
}

pub struct Deriver<S> {
    source: S,
    gate: CryptoGate,
    params: DerivationParams,
    slot: Mutex<Slot>,
}

impl<S: SpecSource> Deriver<S> {
    pub fn new(source: S, params: DerivationParams) -> Self {
        Self {
            source,
            gate: CryptoGate::new(),
            params,
            slot: Mutex::new(Slot {
                generation: 0,
                token: CancellationToken::new(),
                latest: None,
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn gate(&self) -> &CryptoGate {
        &self.gate
    }

    pub fn params(&self) -> &DerivationParams {
        &self.params
    }

    /// Derive from a named base spec, mirroring its validator count.
    pub async fn derive(&self, name: BaseSpecName) -> Result<Arc<Derivation>> {
        self.run(name.to_string(), Input::Named(name), None).await
    }

    /// Derive from a named base spec with an explicit validator count.
    pub async fn derive_with_count(
        &self,
        name: BaseSpecName,
        count: usize,
    ) -> Result<Arc<Derivation>> {
        self.run(name.to_string(), Input::Named(name), Some(count)).await
    }

    /// Derive from a spec the caller already holds.
    pub async fn derive_from_spec(
        &self,
        origin: impl Into<String>,
        spec: GenesisSpec,
        count: Option<usize>,
    ) -> Result<Arc<Derivation>> {
        self.run(origin.into(), Input::Spec(spec), count).await
    }

    /// Abandon whatever is in flight. The last published result stays.
    pub fn cancel(&self) {
        self.begin();
    }

    /// The newest published derivation, if the newest attempt succeeded.
    pub fn latest(&self) -> Option<Arc<Derivation>> {
        self.lock_slot().latest.clone()
    }

    pub fn current_generation(&self) -> u64 {
        self.lock_slot().generation
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new generation, cancelling the previous one.
    fn begin(&self) -> (u64, CancellationToken) {
        let mut slot = self.lock_slot();
        slot.token.cancel();
        slot.generation += 1;
        slot.token = CancellationToken::new();
        (slot.generation, slot.token.clone())
    }

    async fn run(&self, origin: String, input: Input, count: Option<usize>) -> Result<Arc<Derivation>> {
        let (generation, token) = self.begin();
        info!(generation, origin = %origin, "derivation started");

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(GenspecError::Superseded { generation }),
            result = self.pipeline(origin, input, count, generation) => result,
        };
        self.publish(generation, result)
    }

    async fn pipeline(
        &self,
        origin: String,
        input: Input,
        count: Option<usize>,
        generation: u64,
    ) -> Result<Derivation> {
        let base = match input {
            Input::Named(name) => self.source.fetch(name).await?,
            Input::Spec(spec) => spec,
        };

        check_shape(&base)?;
        let count = match count {
            Some(explicit) => explicit,
            None => authority_count(&base)?,
        };

        self.gate.ready().await?;
        let secrets = build_secrets(&self.gate, count, &self.params).await?;
        let spec = merge_secrets(&base, &secrets)?;

        Ok(Derivation {
            origin,
            generation,
            spec,
            secrets,
        })
    }

    fn publish(&self, generation: u64, result: Result<Derivation>) -> Result<Arc<Derivation>> {
        let mut slot = self.lock_slot();
        if slot.generation != generation {
            warn!(generation, current = slot.generation, "discarding stale derivation");
            return Err(GenspecError::Superseded { generation });
        }
        match result {
            Ok(derivation) => {
                info!(
                    generation,
                    origin = %derivation.origin,
                    authorities = derivation.secrets.authorities.len(),
                    "derivation complete"
                );
                let derivation = Arc::new(derivation);
                slot.latest = Some(Arc::clone(&derivation));
                Ok(derivation)
            }
            Err(e) => {
                warn!(generation, error = %e, "derivation failed");
                slot.latest = None;
                Err(e)
            }
        }
    }
}
