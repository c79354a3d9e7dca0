/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/
//! Defines the [`KVStore`] trait, which specifies the required interface for the key-value store
//! provided by the user.
//!
//! Given a method to obtain the value for a given key in bytes, this module also provides methods
//! to obtain the variables stored in the key-value store, as described in
//! [`crate::state::paths`].

use std::fmt::Display;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::types::{
    basic::{BlockHeight, CryptoHash, Transaction, TxCount},
    block::{Block, BlockStatus},
};

use super::paths;
use super::paths::combine;
use super::write_batch::WriteBatch;

pub trait KVStore: KVGet + Clone + Send + 'static {
    type WriteBatch: WriteBatch;
    type Snapshot<'a>: 'a + KVGet;

    fn write(&mut self, wb: Self::WriteBatch);
    fn clear(&mut self);
    fn snapshot<'b>(&'b self) -> Self::Snapshot<'_>;
}

pub trait KVGet {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /* ↓↓↓ Block ↓↓↓ */

    fn block(&self, block: &CryptoHash) -> Result<Option<Block>, KVGetError> {
        let height = self.block_height(block)?; // Safety: if block height is Some, then all of the following fields are Some too.
        if height.is_none() {
            return Ok(None);
        }
        let parent = self.block_parent(block)?;
        let transactions = self.block_transactions(block)?;

        if parent.is_none() {
            return Err(KVGetError::ValueNotFound {
                key: Key::BlockParent { block: *block },
            });
        }

        if transactions.is_none() {
            return Err(KVGetError::ValueNotFound {
                key: Key::BlockTransactions { block: *block },
            });
        }

        Ok(Some(Block {
            height: height.unwrap(),
            hash: *block,
            parent: parent.unwrap(),
            transactions: transactions.unwrap(),
        }))
    }

    fn block_height(&self, block: &CryptoHash) -> Result<Option<BlockHeight>, KVGetError> {
        let block_key = combine(&paths::BLOCKS, &block.bytes());
        let block_height_key = combine(&block_key, &paths::BLOCK_HEIGHT);
        if let Some(bytes) = self.get(&block_height_key) {
            Ok(Some(
                BlockHeight::deserialize(&mut bytes.as_slice()).map_err(|err| {
                    KVGetError::DeserializeValueError {
                        key: Key::BlockHeight { block: *block },
                        source: err,
                    }
                })?,
            ))
        } else {
            Ok(None)
        }
    }

    fn block_parent(&self, block: &CryptoHash) -> Result<Option<CryptoHash>, KVGetError> {
        if let Some(bytes) = self.get(&combine(
            &paths::BLOCKS,
            &combine(&block.bytes(), &paths::BLOCK_PARENT),
        )) {
            Ok(Some(CryptoHash::deserialize(&mut &*bytes).map_err(
                |err| KVGetError::DeserializeValueError {
                    key: Key::BlockParent { block: *block },
                    source: err,
                },
            )?))
        } else {
            Ok(None)
        }
    }

    fn block_status(&self, block: &CryptoHash) -> Result<Option<BlockStatus>, KVGetError> {
        if let Some(bytes) = self.get(&combine(
            &paths::BLOCKS,
            &combine(&block.bytes(), &paths::BLOCK_STATUS),
        )) {
            Ok(Some(BlockStatus::deserialize(&mut &*bytes).map_err(
                |err| KVGetError::DeserializeValueError {
                    key: Key::BlockStatus { block: *block },
                    source: err,
                },
            )?))
        } else {
            Ok(None)
        }
    }

    fn block_tx_count(&self, block: &CryptoHash) -> Result<Option<TxCount>, KVGetError> {
        if let Some(bytes) = self.get(&combine(
            &paths::BLOCKS,
            &combine(&block.bytes(), &paths::BLOCK_TX_COUNT),
        )) {
            Ok(Some(TxCount::deserialize(&mut &*bytes).map_err(|err| {
                KVGetError::DeserializeValueError {
                    key: Key::BlockTransactionsCount { block: *block },
                    source: err,
                }
            })?))
        } else {
            Ok(None)
        }
    }

    fn block_transactions(
        &self,
        block: &CryptoHash,
    ) -> Result<Option<Vec<Transaction>>, KVGetError> {
        let tx_count = self.block_tx_count(block)?;
        match tx_count {
            None => Ok(None),
            Some(count) => {
                let transactions = (0..count.int())
                    .map(|i| self.block_transaction(block, i))
                    .collect::<Option<Vec<Transaction>>>();
                match transactions {
                    Some(transactions) => Ok(Some(transactions)),
                    None => Err(KVGetError::ValueNotFound {
                        key: Key::BlockTransactions { block: *block },
                    }),
                }
            }
        }
    }

    fn block_transaction(&self, block: &CryptoHash, tx_index: u32) -> Option<Transaction> {
        let block_txs_prefix = combine(
            &paths::BLOCKS,
            &combine(&block.bytes(), &paths::BLOCK_TRANSACTIONS),
        );
        self.get(&combine(
            &block_txs_prefix,
            &tx_index.try_to_vec().unwrap(),
        ))
        .map(Transaction::new)
    }

    /* ↓↓↓ Committed App State ↓↓↓ */

    fn committed_app_state(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.get(&combine(&paths::COMMITTED_APP_STATE, key))
    }

    /* ↓↓↓ Last Accepted ↓↓↓ */

    fn last_accepted(&self) -> Result<CryptoHash, KVGetError> {
        CryptoHash::deserialize(
            &mut &*self
                .get(&paths::LAST_ACCEPTED)
                .ok_or(KVGetError::ValueNotFound {
                    key: Key::LastAccepted,
                })?,
        )
        .map_err(|err| KVGetError::DeserializeValueError {
            key: Key::LastAccepted,
            source: err,
        })
    }
}

/// Error when trying to read a value corresponding to a given key from the
/// [key value store][KVStore]. The error may arise in the following circumstances:
/// 1. The value corresponding to a given key cannot be deserialized into its expected type,
/// 2. The value corresponding to a given key cannot be found.
#[derive(Debug)]
pub enum KVGetError {
    DeserializeValueError { key: Key, source: std::io::Error },
    ValueNotFound { key: Key },
}

impl Display for KVGetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KVGetError::DeserializeValueError { key, source } => {
                write!(f, "failed to deserialize value at {}: {}", key, source)
            }
            KVGetError::ValueNotFound { key } => write!(f, "value not found at {}", key),
        }
    }
}

#[derive(Debug)]
pub enum Key {
    BlockHeight { block: CryptoHash },
    BlockParent { block: CryptoHash },
    BlockStatus { block: CryptoHash },
    BlockTransactionsCount { block: CryptoHash },
    BlockTransactions { block: CryptoHash },
    CommittedAppState { key: Vec<u8> },
    LastAccepted,
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            &Key::BlockHeight { block } => write!(f, "Block Height for block {}", block),
            &Key::BlockParent { block } => write!(f, "Block Parent for block {}", block),
            &Key::BlockStatus { block } => write!(f, "Block Status for block {}", block),
            &Key::BlockTransactionsCount { block } => {
                write!(f, "Block Transactions count for block {}", block)
            }
            &Key::BlockTransactions { block } => {
                write!(f, "Block Transactions for block {}", block)
            }
            &Key::CommittedAppState { key } => {
                write!(f, "Committed App State for key {:#?}", key)
            }
            &Key::LastAccepted => write!(f, "Last Accepted"),
        }
    }
}
