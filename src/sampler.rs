/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The validator-set sampler: a staleness-gated cache of an externally-sourced validator set,
//! intersected at query time with live peer connectivity.
//!
//! The sampler is queried by the gossip layer for peer selection and sits outside the block call
//! path. It is safe for concurrent callers: one mutex covers the refresh-then-read of every
//! public operation, so no caller observes a half-refreshed cache. No background timer is
//! spawned; all refresh is synchronous and lazy, triggered by the first call after staleness
//! expires.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub use ed25519_dalek::VerifyingKey;

use crate::config::Configuration;
use crate::types::basic::{BlockHeight, ChainId, Power};

/// The externally-sourced authority on who is currently staking.
///
/// Implementations own their timeouts: a fetch that a deadline cancels surfaces as `Err`, which
/// the sampler treats like any other fetch failure (the stale cache is retained).
pub trait ValidatorSource: Send + 'static {
    type Error: Display;

    /// Get the height of the most recently accepted block known to this source.
    fn current_height(&self) -> Result<BlockHeight, Self::Error>;

    /// Get the validator set of `chain_id` at `height`, as a mapping from node identity to stake
    /// weight. Only the key set is used by the sampler; the weights are ignored at this layer.
    fn validator_set(
        &self,
        height: BlockHeight,
        chain_id: ChainId,
    ) -> Result<HashMap<VerifyingKey, Power>, Self::Error>;
}

/// Reports whether a given node identity is currently connected. A point-in-time check with no
/// ordering guarantee relative to network events.
pub trait PeerSet: Send + 'static {
    fn has(&self, peer: &VerifyingKey) -> bool;
}

/// Contains a cached set of nodes that are currently staking, and answers membership and sampling
/// queries about the subset of them that is also currently connected.
pub struct ValidatorSampler<S: ValidatorSource, P: PeerSet> {
    source: S,
    peers: P,
    chain_id: ChainId,
    max_staleness: Duration,
    cache: Mutex<ValidatorCache>,
}

struct ValidatorCache {
    validators: SampleableSet,
    last_refreshed: Option<Instant>,
}

impl<S: ValidatorSource, P: PeerSet> ValidatorSampler<S, P> {
    pub fn new(config: &Configuration, source: S, peers: P) -> ValidatorSampler<S, P> {
        ValidatorSampler {
            source,
            peers,
            chain_id: config.chain_id,
            max_staleness: config.max_validator_set_staleness,
            cache: Mutex::new(ValidatorCache {
                validators: SampleableSet::new(),
                last_refreshed: None,
            }),
        }
    }

    /// Re-fetch the validator set if the cache has gone stale.
    ///
    /// If either fetch fails the refresh is abandoned: the failure is logged, the previous cached
    /// set (however stale) remains authoritative, and the staleness clock is not advanced, so the
    /// next call retries immediately.
    fn refresh(&self, cache: &mut ValidatorCache) {
        if let Some(last_refreshed) = cache.last_refreshed {
            if last_refreshed.elapsed() < self.max_staleness {
                return;
            }
        }

        let height = match self.source.current_height() {
            Ok(height) => height,
            Err(err) => {
                log::warn!("failed to get current height: {}", err);
                return;
            }
        };
        let validator_set = match self.source.validator_set(height, self.chain_id) {
            Ok(validator_set) => validator_set,
            Err(err) => {
                log::warn!("failed to get validator set: {}", err);
                return;
            }
        };

        cache.validators.clear();
        for validator in validator_set.keys() {
            cache.validators.insert(*validator);
        }

        cache.last_refreshed = Some(Instant::now());
    }

    /// Get a uniform random sample, without replacement, of up to `limit` *connected* validators.
    ///
    /// The returned sequence may be shorter than `limit` even when the cached set has `limit` or
    /// more members: connectivity is filtered after sampling, trading exactness of the output
    /// size for O(limit) sampling cost.
    pub fn sample(&self, limit: usize) -> Vec<VerifyingKey> {
        let mut cache = self.cache.lock().unwrap();

        self.refresh(&mut cache);

        cache
            .validators
            .sample(limit)
            .into_iter()
            .filter(|validator| self.peers.has(validator))
            .collect()
    }

    /// Whether `peer` is a *connected* validator: currently connected and present in the cached
    /// validator set.
    pub fn has(&self, peer: &VerifyingKey) -> bool {
        let mut cache = self.cache.lock().unwrap();

        self.refresh(&mut cache);

        self.peers.has(peer) && cache.validators.contains(peer)
    }
}

/// A set of node identities supporting O(1) membership tests and O(limit) uniform sampling
/// without replacement.
struct SampleableSet {
    elements: Vec<VerifyingKey>,
    members: HashSet<VerifyingKey>,
}

impl SampleableSet {
    fn new() -> SampleableSet {
        SampleableSet {
            elements: Vec::new(),
            members: HashSet::new(),
        }
    }

    fn insert(&mut self, element: VerifyingKey) {
        if self.members.insert(element) {
            self.elements.push(element);
        }
    }

    fn contains(&self, element: &VerifyingKey) -> bool {
        self.members.contains(element)
    }

    fn clear(&mut self) {
        self.elements.clear();
        self.members.clear();
    }

    fn sample(&self, limit: usize) -> Vec<VerifyingKey> {
        let amount = limit.min(self.elements.len());
        rand::seq::index::sample(&mut rand::thread_rng(), self.elements.len(), amount)
            .iter()
            .map(|index| self.elements[index])
            .collect()
    }
}
