/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions for the 'block' type and its associated methods.

use borsh::{BorshDeserialize, BorshSerialize};
pub use sha2::Sha256 as CryptoHasher;
use sha2::Digest;

use crate::types::basic::*;

/// A candidate unit of chain extension: a batch of transactions proposed on top of a parent
/// block. Immutable once built; its `hash` commits to every other field.
#[derive(Clone, Debug, BorshSerialize, BorshDeserialize)]
pub struct Block {
    pub height: BlockHeight,
    pub hash: CryptoHash,
    pub parent: CryptoHash,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(
        height: BlockHeight,
        parent: CryptoHash,
        transactions: Vec<Transaction>,
    ) -> Block {
        Block {
            height,
            hash: Block::hash(height, &parent, &transactions),
            parent,
            transactions,
        }
    }

    pub fn hash(
        height: BlockHeight,
        parent: &CryptoHash,
        transactions: &Vec<Transaction>,
    ) -> CryptoHash {
        let mut hasher = CryptoHasher::new();
        hasher.update(&height.try_to_vec().unwrap());
        hasher.update(&parent.try_to_vec().unwrap());
        hasher.update(&transactions.try_to_vec().unwrap());
        CryptoHash::new(hasher.finalize().into())
    }

    /// Checks if `hash` actually commits to the other fields.
    pub fn is_correct(&self) -> bool {
        self.hash == Block::hash(self.height, &self.parent, &self.transactions)
    }
}

/// Where a block currently sits in its lifecycle.
///
/// A block is `Processing` while a speculative state overlay for it is alive, and moves to one of
/// the two terminal statuses when the consensus layer finalizes a decision on it. No transition
/// ever leaves a terminal status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum BlockStatus {
    Processing,
    Accepted,
    Rejected,
}
