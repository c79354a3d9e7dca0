/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The block lifecycle manager: a state machine over candidate blocks backed by a chain of
//! speculative state overlays.
//!
//! # Lifecycle of a block
//!
//! ```text
//! Unverified ─verify─> Verified ─accept─> Accepted
//!                         │
//!                         └──────reject─> Rejected
//! ```
//!
//! [Verification](Manager::verify_block) requires the block's parent to either head a live overlay
//! or be the last accepted block, and registers a new overlay on success. Exactly one overlay is
//! promoted to durable storage per [accepted](Manager::accept_block) block;
//! [rejection](Manager::reject_block) discards the overlay without promoting anything. `Accepted`
//! and `Rejected` are terminal.
//!
//! The three transitions are implemented in separate role files (`verifier.rs`, `acceptor.rs`,
//! `rejector.rs`) that share one backend instance through the manager.
//!
//! # Concurrency
//!
//! The manager is designed for single-writer access: the consensus layer is expected to serialize
//! all verify/accept/reject/preference calls. No internal locking is performed over the overlay
//! map or the preference field.

pub(crate) mod backend;

pub mod block;

mod verifier;

mod acceptor;

mod rejector;

use std::fmt::Display;
use std::sync::mpsc::Sender;
use std::time::SystemTime;

use crate::app::{App, TransactionError};
use crate::bootstrap::BootstrapFlag;
use crate::config::Configuration;
use crate::events::{Event, UpdatePreferenceEvent};
use crate::mempool::Mempool;
use crate::state::kv_store::{KVGetError, KVStore};
use crate::state::write_batch::{KVSetError, StateWriteBatch};
use crate::types::basic::{AppStateUpdates, CryptoHash, Transaction};
use crate::types::block::{Block, BlockStatus};

use backend::StateBackend;
use block::BlockHandle;

pub struct Manager<K: KVStore, M: Mempool, A: App<K>> {
    pub(crate) backend: StateBackend<K, M>,
    pub(crate) app: A,
    pub(crate) bootstrap: BootstrapFlag,
    pub(crate) preferred: CryptoHash,
    pub(crate) refill_mempool_on_reject: bool,
    pub(crate) log_events: bool,
    pub(crate) event_publisher: Option<Sender<Event>>,
    pub(crate) blocks_accepted: u64,
    pub(crate) transactions_accepted: u64,
}

impl<K: KVStore, M: Mempool, A: App<K>> Manager<K, M, A> {
    /// Create a manager over `kv_store`, which must previously have been seeded with
    /// [`initialize`](Manager::initialize). The preference starts out at the last accepted block.
    pub fn new(
        config: Configuration,
        kv_store: K,
        mempool: M,
        app: A,
        bootstrap: BootstrapFlag,
        event_publisher: Option<Sender<Event>>,
    ) -> Result<Manager<K, M, A>, LifecycleError> {
        let backend = StateBackend::new(kv_store, mempool)?;
        let preferred = backend.last_accepted;
        Ok(Manager {
            backend,
            app,
            bootstrap,
            preferred,
            refill_mempool_on_reject: config.refill_mempool_on_reject,
            log_events: config.log_events,
            event_publisher,
            blocks_accepted: 0,
            transactions_accepted: 0,
        })
    }

    /// Seed an empty `kv_store` with the genesis block (recorded as accepted), the last accepted
    /// pointer, and the initial committed app state.
    ///
    /// This function must be called exactly once on an empty store, before any manager is
    /// constructed over it.
    pub fn initialize(
        kv_store: &mut K,
        genesis: &Block,
        initial_app_state: &AppStateUpdates,
    ) -> Result<(), LifecycleError> {
        let mut wb = StateWriteBatch::new();

        wb.set_block(genesis)?;
        wb.set_block_status(&genesis.hash, BlockStatus::Accepted)?;
        wb.set_last_accepted(&genesis.hash)?;
        wb.apply_app_state_updates(initial_app_state);

        kv_store.write(wb.0);

        Ok(())
    }

    /// Check that `transaction` could be issued against the *preferred* block's state. Used for
    /// mempool admission, never for verifying the transactions inside a block.
    ///
    /// Fails with `ChainNotSynced` until the [bootstrap flag](BootstrapFlag) reports completion.
    /// Side-effect-free whether it succeeds or fails.
    pub fn verify_tx(&mut self, transaction: &Transaction) -> Result<(), LifecycleError> {
        if !self.bootstrap.completed() {
            return Err(LifecycleError::ChainNotSynced);
        }

        let view = self.backend.view(&self.preferred)?;
        self.app
            .check_transaction(transaction, &view)
            .map_err(|source| LifecycleError::VerificationFailed { source })
    }

    /// Wrap a stateless `block` so that its lifecycle transitions route through this manager.
    pub fn new_block(&mut self, block: Block) -> BlockHandle<K, M, A> {
        BlockHandle::new(self, block)
    }

    /// Get a [`BlockHandle`] for the block identified by `block`.
    pub fn get_block(&mut self, block: &CryptoHash) -> Result<BlockHandle<K, M, A>, LifecycleError> {
        let (stateless, _) = self.backend.get_block(block)?;
        Ok(BlockHandle::new(self, stateless))
    }

    /// Get the block identified by `block` together with its current status, without wrapping it
    /// in a handle.
    pub fn block(&self, block: &CryptoHash) -> Result<(Block, BlockStatus), LifecycleError> {
        self.backend.get_block(block)
    }

    /// Whether a speculative overlay currently exists for `block`, i.e., whether the block has
    /// been verified but not yet decided.
    pub fn has_overlay(&self, block: &CryptoHash) -> bool {
        self.backend.overlays.contains_key(block)
    }

    /// The identity of the most recently accepted block.
    pub fn last_accepted(&self) -> CryptoHash {
        self.backend.last_accepted
    }

    /// Set the preferred tip: the block this node will attempt to extend next.
    ///
    /// Returns whether the call actually changed the stored preference. No validation that
    /// `block` names a known block is performed; callers are responsible for only proposing
    /// reachable identities.
    pub fn set_preference(&mut self, block: CryptoHash) -> bool {
        let updated = self.preferred != block;
        self.preferred = block;

        if updated {
            Event::UpdatePreference(UpdatePreferenceEvent {
                timestamp: SystemTime::now(),
                preferred: block,
            })
            .publish(self.log_events, &self.event_publisher);
        }

        updated
    }

    /// The current preferred tip.
    pub fn preferred(&self) -> CryptoHash {
        self.preferred
    }

    /// Number of blocks accepted by this manager since construction.
    pub fn blocks_accepted(&self) -> u64 {
        self.blocks_accepted
    }

    /// Number of transactions carried in blocks accepted by this manager since construction.
    pub fn transactions_accepted(&self) -> u64 {
        self.transactions_accepted
    }
}

/// Errors surfaced by the block lifecycle manager.
///
/// Structural errors (a missing parent, a storage failure) and verification-content failures are
/// all surfaced to the caller without local retry and without mutating state; retry policy belongs
/// to the consensus layer above. None of these errors is fatal to the node process.
#[derive(Debug)]
pub enum LifecycleError {
    /// The requested block has neither a live overlay nor a durable storage entry.
    NotFound { block: CryptoHash },

    /// Verification was attempted against a parent with no resolvable state view.
    MissingParent { block: CryptoHash },

    /// A transaction is inadmissible against the state view it was checked against.
    VerificationFailed { source: TransactionError },

    /// Transaction admissibility was requested before bootstrapping completed.
    ChainNotSynced,

    KVGetError { source: KVGetError },

    KVSetError { source: KVSetError },
}

impl Display for LifecycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleError::NotFound { block } => write!(f, "block not found: {}", block),
            LifecycleError::MissingParent { block } => {
                write!(f, "no resolvable state view for parent block: {}", block)
            }
            LifecycleError::VerificationFailed { source } => {
                write!(f, "verification failed: {}", source)
            }
            LifecycleError::ChainNotSynced => write!(f, "chain not synced"),
            LifecycleError::KVGetError { source } => write!(f, "{}", source),
            LifecycleError::KVSetError { source } => write!(f, "{}", source),
        }
    }
}

impl From<KVGetError> for LifecycleError {
    fn from(source: KVGetError) -> Self {
        LifecycleError::KVGetError { source }
    }
}

impl From<KVSetError> for LifecycleError {
    fn from(source: KVSetError) -> Self {
        LifecycleError::KVSetError { source }
    }
}
