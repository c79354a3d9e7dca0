//! Mock implementations of the collaborator traits: a recording mempool, a scripted validator
//! source, and a static peer set.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use chainexec::{
    mempool::Mempool,
    sampler::{PeerSet, ValidatorSource, VerifyingKey},
    types::basic::{BlockHeight, ChainId, Power, Transaction},
};

/// A [`Mempool`] that records which transactions were included in accepted blocks and refuses to
/// re-admit them, the way a real pool's re-admission checks would.
#[derive(Clone)]
pub(crate) struct RecordingMempool(Arc<Mutex<RecordingMempoolInner>>);

struct RecordingMempoolInner {
    pool: Vec<Transaction>,
    included: HashSet<Transaction>,
}

impl RecordingMempool {
    pub(crate) fn new() -> RecordingMempool {
        RecordingMempool(Arc::new(Mutex::new(RecordingMempoolInner {
            pool: Vec::new(),
            included: HashSet::new(),
        })))
    }

    pub(crate) fn contains(&self, transaction: &Transaction) -> bool {
        self.0.lock().unwrap().pool.contains(transaction)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.lock().unwrap().pool.len()
    }
}

impl Mempool for RecordingMempool {
    type Error = String;

    fn remove(&mut self, transactions: &[Transaction]) {
        let mut inner = self.0.lock().unwrap();
        inner.pool.retain(|tx| !transactions.contains(tx));
        for transaction in transactions {
            inner.included.insert(transaction.clone());
        }
    }

    fn reinsert(&mut self, transaction: Transaction) -> Result<(), Self::Error> {
        let mut inner = self.0.lock().unwrap();
        if inner.included.contains(&transaction) {
            return Err("transaction was included in an accepted block".to_string());
        }
        if !inner.pool.contains(&transaction) {
            inner.pool.push(transaction);
        }
        Ok(())
    }
}

/// A [`ValidatorSource`] backed by a scripted validator set. Records how many height fetches were
/// attempted, and can be made to fail on demand.
#[derive(Clone)]
pub(crate) struct ScriptedValidatorSource(Arc<Mutex<ScriptedValidatorSourceInner>>);

struct ScriptedValidatorSourceInner {
    height: BlockHeight,
    validators: HashMap<VerifyingKey, Power>,
    failing: bool,
    height_fetches: u64,
}

impl ScriptedValidatorSource {
    pub(crate) fn new(validators: Vec<VerifyingKey>) -> ScriptedValidatorSource {
        let validators = validators
            .into_iter()
            .map(|validator| (validator, Power::new(1)))
            .collect();
        ScriptedValidatorSource(Arc::new(Mutex::new(ScriptedValidatorSourceInner {
            height: BlockHeight::new(0),
            validators,
            failing: false,
            height_fetches: 0,
        })))
    }

    /// Make every subsequent fetch fail (or succeed again).
    pub(crate) fn set_failing(&self, failing: bool) {
        self.0.lock().unwrap().failing = failing;
    }

    /// Replace the scripted validator set.
    pub(crate) fn set_validators(&self, validators: Vec<VerifyingKey>) {
        let mut inner = self.0.lock().unwrap();
        inner.validators = validators
            .into_iter()
            .map(|validator| (validator, Power::new(1)))
            .collect();
        inner.height += 1;
    }

    /// How many times `current_height` was called, i.e., how many refreshes were attempted.
    pub(crate) fn height_fetches(&self) -> u64 {
        self.0.lock().unwrap().height_fetches
    }
}

impl ValidatorSource for ScriptedValidatorSource {
    type Error = String;

    fn current_height(&self) -> Result<BlockHeight, Self::Error> {
        let mut inner = self.0.lock().unwrap();
        inner.height_fetches += 1;
        if inner.failing {
            return Err("validator source unavailable".to_string());
        }
        Ok(inner.height)
    }

    fn validator_set(
        &self,
        _height: BlockHeight,
        _chain_id: ChainId,
    ) -> Result<HashMap<VerifyingKey, Power>, Self::Error> {
        let inner = self.0.lock().unwrap();
        if inner.failing {
            return Err("validator source unavailable".to_string());
        }
        Ok(inner.validators.clone())
    }
}

/// A [`PeerSet`] over a mutable set of connected peers.
#[derive(Clone)]
pub(crate) struct StaticPeerSet(Arc<Mutex<HashSet<VerifyingKey>>>);

impl StaticPeerSet {
    pub(crate) fn new(connected: Vec<VerifyingKey>) -> StaticPeerSet {
        StaticPeerSet(Arc::new(Mutex::new(connected.into_iter().collect())))
    }

    pub(crate) fn connect(&self, peer: VerifyingKey) {
        self.0.lock().unwrap().insert(peer);
    }

    pub(crate) fn disconnect(&self, peer: &VerifyingKey) {
        self.0.lock().unwrap().remove(peer);
    }
}

impl PeerSet for StaticPeerSet {
    fn has(&self, peer: &VerifyingKey) -> bool {
        self.0.lock().unwrap().contains(peer)
    }
}
