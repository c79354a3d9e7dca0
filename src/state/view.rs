/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines [`StateView`], a read-through view of the app state as it will be once some branch of
//! pending blocks becomes accepted.
//!
//! # 'Speculative' state vs committed state
//!
//! Blocks that have been verified but not yet decided by the consensus layer are not guaranteed to
//! become part of the chain. The state updates of such blocks live in in-memory overlays rather
//! than in durable storage. A `StateView` layers the overlays of an ancestor chain (newest first)
//! over the committed app state, so that reads observe the chain as if every pending ancestor had
//! already been accepted.

use crate::types::basic::AppStateUpdates;

use super::kv_store::{KVGet, KVStore};

pub struct StateView<'a, K: KVStore> {
    store: &'a K,
    pending: Vec<&'a AppStateUpdates>,
}

impl<'a, K: KVStore> StateView<'a, K> {
    /// Create a view over `store` with `pending` overlay layers, ordered newest first.
    pub(crate) fn new(store: &'a K, pending: Vec<&'a AppStateUpdates>) -> StateView<'a, K> {
        StateView { store, pending }
    }

    /// Get the value at `key`, as observed through the pending layers and then the committed app
    /// state.
    pub fn app_state(&self, key: &[u8]) -> Option<Vec<u8>> {
        for updates in &self.pending {
            if updates.contains_delete(&key.to_vec()) {
                return None;
            } else if let Some(value) = updates.get_insert(&key.to_vec()) {
                return Some(value.clone());
            }
        }

        self.store.committed_app_state(key)
    }
}
