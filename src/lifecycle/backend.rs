/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The state shared by the three lifecycle roles: the overlay map, the last accepted pointer, the
//! durable store, and the mempool handle.

use std::collections::HashMap;

use crate::mempool::Mempool;
use crate::state::kv_store::{KVGet, KVGetError, KVStore, Key};
use crate::state::view::StateView;
use crate::state::write_batch::StateWriteBatch;
use crate::types::basic::{AppStateUpdates, CryptoHash};
use crate::types::block::{Block, BlockStatus};

use super::LifecycleError;

/// A verified block together with the speculative state updates produced by executing it.
///
/// An overlay for a block exists exactly between its successful verification and its terminal
/// decision. Accept promotes the updates into durable storage; reject discards them.
pub(crate) struct Overlay {
    pub(crate) block: Block,
    pub(crate) updates: AppStateUpdates,
}

pub(crate) struct StateBackend<K: KVStore, M: Mempool> {
    pub(crate) store: K,
    pub(crate) mempool: M,
    pub(crate) overlays: HashMap<CryptoHash, Overlay>,
    pub(crate) last_accepted: CryptoHash,
}

impl<K: KVStore, M: Mempool> StateBackend<K, M> {
    /// Create a backend over `store`, which must previously have been seeded with
    /// [`initialize`](super::Manager::initialize).
    pub(crate) fn new(store: K, mempool: M) -> Result<StateBackend<K, M>, LifecycleError> {
        let last_accepted = store.last_accepted()?;
        Ok(StateBackend {
            store,
            mempool,
            overlays: HashMap::new(),
            last_accepted,
        })
    }

    /// Get a block and its current status: from its live overlay if one exists, else from durable
    /// storage.
    pub(crate) fn get_block(
        &self,
        block: &CryptoHash,
    ) -> Result<(Block, BlockStatus), LifecycleError> {
        if let Some(overlay) = self.overlays.get(block) {
            return Ok((overlay.block.clone(), BlockStatus::Processing));
        }

        match self.store.block(block)? {
            Some(stored) => {
                let status =
                    self.store
                        .block_status(block)?
                        .ok_or(KVGetError::ValueNotFound {
                            key: Key::BlockStatus { block: *block },
                        })?;
                Ok((stored, status))
            }
            None => Err(LifecycleError::NotFound { block: *block }),
        }
    }

    /// The pending state updates of the overlay chain from `parent` (inclusive) down to the last
    /// accepted block (exclusive), ordered newest first.
    ///
    /// Fails with `MissingParent` if the chain from `parent` does not reach the last accepted
    /// block through live overlays. This is what enforces that verification only ever extends
    /// previously verified state.
    pub(crate) fn ancestor_updates(
        &self,
        parent: &CryptoHash,
    ) -> Result<Vec<&AppStateUpdates>, LifecycleError> {
        let mut pending = Vec::new();
        let mut cursor = *parent;
        while cursor != self.last_accepted {
            let overlay = self
                .overlays
                .get(&cursor)
                .ok_or(LifecycleError::MissingParent { block: cursor })?;
            pending.push(&overlay.updates);
            cursor = overlay.block.parent;
        }
        Ok(pending)
    }

    /// A read-through state view as of `parent`'s overlay (or the committed state, if `parent` is
    /// the last accepted block).
    pub(crate) fn view(&self, parent: &CryptoHash) -> Result<StateView<K>, LifecycleError> {
        Ok(StateView::new(&self.store, self.ancestor_updates(parent)?))
    }

    /// Atomically write `wb` into the durable store.
    pub(crate) fn write(&mut self, wb: StateWriteBatch<K::WriteBatch>) {
        self.store.write(wb.0)
    }
}
