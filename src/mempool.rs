/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines the [`Mempool`] trait, the interface through which the
//! [lifecycle manager](crate::lifecycle::Manager) applies the mempool side effects of block
//! acceptance and rejection.
//!
//! This crate does not define the mempool's internal eviction or re-admission policy; it only
//! specifies the two entry points it drives.

use std::fmt::Display;

use crate::types::basic::Transaction;

pub trait Mempool: Send + 'static {
    type Error: Display;

    /// Remove `transactions` from the pool. Called with the payload of every accepted block, so
    /// that a transaction included in the chain is never proposed again.
    fn remove(&mut self, transactions: &[Transaction]);

    /// Offer `transaction` back to the pool after the block carrying it was rejected. The pool's
    /// own re-admission checks apply; a transaction that was meanwhile included in an accepted
    /// block must be refused.
    fn reinsert(&mut self, transaction: Transaction) -> Result<(), Self::Error>;
}
