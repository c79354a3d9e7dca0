/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The verify role: builds a new speculative overlay by executing a candidate block's
//! transactions against its parent's state view.

use std::time::SystemTime;

use crate::app::App;
use crate::events::{Event, VerifyBlockEvent};
use crate::mempool::Mempool;
use crate::state::kv_store::KVStore;
use crate::state::view::StateView;
use crate::types::basic::AppStateUpdates;
use crate::types::block::Block;

use super::backend::Overlay;
use super::{LifecycleError, Manager};

impl<K: KVStore, M: Mempool, A: App<K>> Manager<K, M, A> {
    /// Verify `block` against its parent's state view and register a speculative overlay for it.
    ///
    /// The parent must either head a live overlay or be the last accepted block; otherwise this
    /// fails with `MissingParent`. Transactions are executed in payload order, each observing the
    /// updates of the transactions before it. The first inadmissible transaction fails the whole
    /// block with `VerificationFailed`, and no overlay is registered.
    ///
    /// Verifying a block that already has a live overlay is a no-op `Ok`: the block stays pending
    /// its consensus decision and no transaction is re-executed.
    pub fn verify_block(&mut self, block: &Block) -> Result<(), LifecycleError> {
        if self.backend.overlays.contains_key(&block.hash) {
            return Ok(());
        }

        let ancestor_updates = self.backend.ancestor_updates(&block.parent)?;

        let mut updates = AppStateUpdates::new();
        for transaction in block.transactions.iter() {
            let mut pending = Vec::with_capacity(ancestor_updates.len() + 1);
            pending.push(&updates);
            pending.extend(ancestor_updates.iter().copied());

            let view = StateView::new(&self.backend.store, pending);
            let tx_updates = self
                .app
                .execute_transaction(transaction, &view)
                .map_err(|source| LifecycleError::VerificationFailed { source })?;

            updates.extend(tx_updates);
        }

        self.backend.overlays.insert(
            block.hash,
            Overlay {
                block: block.clone(),
                updates,
            },
        );

        Event::VerifyBlock(VerifyBlockEvent {
            timestamp: SystemTime::now(),
            block: block.hash,
            height: block.height,
        })
        .publish(self.log_events, &self.event_publisher);

        Ok(())
    }
}
