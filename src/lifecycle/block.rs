/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines [`BlockHandle`], a convenience wrapper around a stateless
//! [`Block`](crate::types::block::Block) which routes the block's lifecycle transitions through
//! the [`Manager`] that created it.

use std::ops::Deref;

use crate::app::App;
use crate::mempool::Mempool;
use crate::state::kv_store::{KVGet, KVStore};
use crate::types::block::{Block, BlockStatus};

use super::{LifecycleError, Manager};

pub struct BlockHandle<'a, K: KVStore, M: Mempool, A: App<K>> {
    manager: &'a mut Manager<K, M, A>,
    block: Block,
}

impl<'a, K: KVStore, M: Mempool, A: App<K>> BlockHandle<'a, K, M, A> {
    pub(crate) fn new(manager: &'a mut Manager<K, M, A>, block: Block) -> BlockHandle<'a, K, M, A> {
        BlockHandle { manager, block }
    }

    /// The block's current status: `Processing` while it is undecided (whether or not it has been
    /// verified yet), or the terminal status recorded in durable storage.
    pub fn status(&self) -> Result<BlockStatus, LifecycleError> {
        if self.manager.has_overlay(&self.block.hash) {
            return Ok(BlockStatus::Processing);
        }

        match self.manager.backend.store.block_status(&self.block.hash)? {
            Some(status) => Ok(status),
            None => Ok(BlockStatus::Processing),
        }
    }

    /// Verify the wrapped block. See [`Manager::verify_block`].
    pub fn verify(&mut self) -> Result<(), LifecycleError> {
        self.manager.verify_block(&self.block)
    }

    /// Accept the wrapped block. See [`Manager::accept_block`].
    pub fn accept(&mut self) -> Result<(), LifecycleError> {
        self.manager.accept_block(&self.block.hash)
    }

    /// Reject the wrapped block. See [`Manager::reject_block`].
    pub fn reject(&mut self) -> Result<(), LifecycleError> {
        self.manager.reject_block(&self.block.hash)
    }
}

impl<'a, K: KVStore, M: Mempool, A: App<K>> Deref for BlockHandle<'a, K, M, A> {
    type Target = Block;

    fn deref(&self) -> &Self::Target {
        &self.block
    }
}
