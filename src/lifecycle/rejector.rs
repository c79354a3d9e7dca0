/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The reject role: discards a verified block's overlay without promoting any state change.

use std::time::SystemTime;

use crate::app::App;
use crate::events::{Event, RejectBlockEvent};
use crate::mempool::Mempool;
use crate::state::kv_store::KVStore;
use crate::state::write_batch::StateWriteBatch;
use crate::types::basic::CryptoHash;
use crate::types::block::BlockStatus;

use super::{LifecycleError, Manager};

impl<K: KVStore, M: Mempool, A: App<K>> Manager<K, M, A> {
    /// Reject the block identified by `block`: its overlay is discarded, nothing is promoted, and
    /// the block's content is recorded in durable storage with status `Rejected` so that it stays
    /// retrievable. The last accepted pointer is unaffected.
    ///
    /// If the manager is configured to refill the mempool, the block's transactions are re-offered
    /// to it; the mempool's own re-admission checks decide their fate, and refusals are logged and
    /// swallowed.
    ///
    /// Fails with `NotFound` if no overlay exists for `block`. Rejection does not walk the block's
    /// verified descendants: the consensus layer is responsible for issuing a reject for every
    /// block it abandons, never rejecting a child before its parent's decision is known.
    pub fn reject_block(&mut self, block: &CryptoHash) -> Result<(), LifecycleError> {
        let wb = {
            let overlay = self
                .backend
                .overlays
                .get(block)
                .ok_or(LifecycleError::NotFound { block: *block })?;

            let mut wb = StateWriteBatch::new();
            wb.set_block(&overlay.block)?;
            wb.set_block_status(block, BlockStatus::Rejected)?;
            wb
        };

        let overlay = self
            .backend
            .overlays
            .remove(block)
            .ok_or(LifecycleError::NotFound { block: *block })?;
        self.backend.write(wb);

        if self.refill_mempool_on_reject {
            for transaction in overlay.block.transactions {
                if let Err(err) = self.backend.mempool.reinsert(transaction) {
                    log::debug!("transaction refused by the mempool on reinsertion: {}", err);
                }
            }
        }

        Event::RejectBlock(RejectBlockEvent {
            timestamp: SystemTime::now(),
            block: *block,
        })
        .publish(self.log_events, &self.event_publisher);

        Ok(())
    }
}
