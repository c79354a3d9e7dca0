/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The accept role: promotes a verified block's overlay into durable storage.

use std::time::SystemTime;

use crate::app::App;
use crate::events::{AcceptBlockEvent, Event};
use crate::mempool::Mempool;
use crate::state::kv_store::KVStore;
use crate::state::write_batch::StateWriteBatch;
use crate::types::basic::CryptoHash;
use crate::types::block::BlockStatus;

use super::{LifecycleError, Manager};

impl<K: KVStore, M: Mempool, A: App<K>> Manager<K, M, A> {
    /// Accept the block identified by `block`: its overlay's state updates are promoted to
    /// durable storage, the last accepted pointer advances to it, its overlay is removed, and its
    /// transactions are removed from the mempool. All durable effects land in one atomic write
    /// batch.
    ///
    /// Fails with `NotFound` if no overlay exists for `block`, in particular on a second accept
    /// of the same block. An error return leaves the overlay map untouched.
    ///
    /// Accepting a block whose parent is not the current last accepted block indicates a bug in
    /// the consensus layer; the manager does not re-validate this invariant. Callers must only
    /// finalize blocks in causal, chain-respecting order.
    pub fn accept_block(&mut self, block: &CryptoHash) -> Result<(), LifecycleError> {
        let wb = {
            let overlay = self
                .backend
                .overlays
                .get(block)
                .ok_or(LifecycleError::NotFound { block: *block })?;

            let mut wb = StateWriteBatch::new();
            wb.apply_app_state_updates(&overlay.updates);
            wb.set_block(&overlay.block)?;
            wb.set_block_status(block, BlockStatus::Accepted)?;
            wb.set_last_accepted(block)?;
            wb
        };

        let overlay = self
            .backend
            .overlays
            .remove(block)
            .ok_or(LifecycleError::NotFound { block: *block })?;
        self.backend.write(wb);

        self.backend.last_accepted = *block;
        self.backend.mempool.remove(&overlay.block.transactions);

        self.blocks_accepted += 1;
        self.transactions_accepted += overlay.block.transactions.len() as u64;

        Event::AcceptBlock(AcceptBlockEvent {
            timestamp: SystemTime::now(),
            block: *block,
            height: overlay.block.height,
            transaction_count: overlay.block.transactions.len() as u64,
        })
        .publish(self.log_events, &self.event_publisher);

        Ok(())
    }
}
