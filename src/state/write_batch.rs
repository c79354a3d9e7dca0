/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/
//! Typed write batch over the [`WriteBatch`] primitive provided by the user's key-value store.
//!
//! Every durable mutation performed by this crate goes through a [`StateWriteBatch`], so that the
//! promotion of an overlay, the recording of the block it belongs to, and the advancement of the
//! last accepted pointer land in storage atomically.

use borsh::BorshSerialize;

use crate::types::basic::{AppStateUpdates, CryptoHash};
use crate::types::block::{Block, BlockStatus};

use super::kv_store::Key;
use super::paths;
use super::paths::combine;

pub trait WriteBatch {
    fn new() -> Self;
    fn set(&mut self, key: &[u8], value: &[u8]);
    fn delete(&mut self, key: &[u8]);
}

pub struct StateWriteBatch<W: WriteBatch>(pub(crate) W);

impl<W: WriteBatch> StateWriteBatch<W> {
    pub(crate) fn new() -> StateWriteBatch<W> {
        StateWriteBatch(W::new())
    }

    /* ↓↓↓ Block ↓↓↓ */

    pub fn set_block(&mut self, block: &Block) -> Result<(), KVSetError> {
        let block_prefix = combine(&paths::BLOCKS, &block.hash.bytes());

        self.0.set(
            &combine(&block_prefix, &paths::BLOCK_HEIGHT),
            &block.height.try_to_vec().map_err(|err| {
                KVSetError::SerializeValueError {
                    key: Key::BlockHeight { block: block.hash },
                    source: err,
                }
            })?,
        );
        self.0.set(
            &combine(&block_prefix, &paths::BLOCK_PARENT),
            &block.parent.try_to_vec().map_err(|err| {
                KVSetError::SerializeValueError {
                    key: Key::BlockParent { block: block.hash },
                    source: err,
                }
            })?,
        );
        self.0.set(
            &combine(&block_prefix, &paths::BLOCK_TX_COUNT),
            &(block.transactions.len() as u32).try_to_vec().map_err(|err| {
                KVSetError::SerializeValueError {
                    key: Key::BlockTransactionsCount { block: block.hash },
                    source: err,
                }
            })?,
        );

        // Insert transactions.
        let block_txs_prefix = combine(&block_prefix, &paths::BLOCK_TRANSACTIONS);
        for (i, transaction) in block.transactions.iter().enumerate() {
            let tx_key = combine(
                &block_txs_prefix,
                &(i as u32).try_to_vec().map_err(|err| {
                    KVSetError::SerializeValueError {
                        key: Key::BlockTransactions { block: block.hash },
                        source: err,
                    }
                })?,
            );
            self.0.set(&tx_key, transaction.bytes());
        }

        Ok(())
    }

    pub fn set_block_status(
        &mut self,
        block: &CryptoHash,
        status: BlockStatus,
    ) -> Result<(), KVSetError> {
        let block_prefix = combine(&paths::BLOCKS, &block.bytes());
        Ok(self.0.set(
            &combine(&block_prefix, &paths::BLOCK_STATUS),
            &status.try_to_vec().map_err(|err| {
                KVSetError::SerializeValueError {
                    key: Key::BlockStatus { block: *block },
                    source: err,
                }
            })?,
        ))
    }

    /* ↓↓↓ Committed App State ↓↓↓ */

    pub fn set_committed_app_state(&mut self, key: &[u8], value: &[u8]) {
        self.0.set(&combine(&paths::COMMITTED_APP_STATE, key), value);
    }

    pub fn delete_committed_app_state(&mut self, key: &[u8]) {
        self.0.delete(&combine(&paths::COMMITTED_APP_STATE, key));
    }

    pub fn apply_app_state_updates(&mut self, app_state_updates: &AppStateUpdates) {
        for (key, value) in app_state_updates.inserts() {
            self.set_committed_app_state(key, value);
        }

        for key in app_state_updates.deletions() {
            self.delete_committed_app_state(key);
        }
    }

    /* ↓↓↓ Last Accepted ↓↓↓ */

    pub fn set_last_accepted(&mut self, block: &CryptoHash) -> Result<(), KVSetError> {
        Ok(self.0.set(
            &paths::LAST_ACCEPTED,
            &block.try_to_vec().map_err(|err| {
                KVSetError::SerializeValueError {
                    key: Key::LastAccepted,
                    source: err,
                }
            })?,
        ))
    }
}

#[derive(Debug)]
pub enum KVSetError {
    SerializeValueError { key: Key, source: std::io::Error },
}

impl std::fmt::Display for KVSetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KVSetError::SerializeValueError { key, source } => {
                write!(f, "failed to serialize value for {}: {}", key, source)
            }
        }
    }
}
