/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines the [`App`] trait: the deterministic transaction executor that the library user plugs
//! into the [lifecycle manager](crate::lifecycle::Manager).
//!
//! The manager decides *when* a transaction is executed and what happens to the outcome; the `App`
//! decides whether the transaction is admissible against a given state view and what it writes.

use crate::state::kv_store::KVStore;
use crate::state::view::StateView;
use crate::types::basic::{AppStateUpdates, Transaction};

/// Methods that a type needs to implement to serve as the chain's deterministic transaction
/// executor.
///
/// Besides implementing the functions specified in the trait, implementors of `App` are
/// additionally expected to be *deterministic*: every function should evaluate to the same value
/// every time it is called with the same arguments and the same observable state view.
pub trait App<K: KVStore>: Send + 'static {
    /// Execute `transaction` against `view` and return the app state updates it produces.
    ///
    /// Called by the lifecycle manager for each transaction of a block being verified, with the
    /// block's own earlier updates already layered into `view`. An `Err` return marks the whole
    /// block unverifiable.
    fn execute_transaction(
        &mut self,
        transaction: &Transaction,
        view: &StateView<K>,
    ) -> Result<AppStateUpdates, TransactionError>;

    /// Check whether `transaction` could be issued against `view`, without keeping any of its
    /// effects. Used by the lifecycle manager for mempool admission.
    fn check_transaction(
        &mut self,
        transaction: &Transaction,
        view: &StateView<K>,
    ) -> Result<(), TransactionError> {
        self.execute_transaction(transaction, view).map(|_| ())
    }
}

/// Enumerates the circumstances in which an [`App`] could fail to execute a transaction.
#[derive(Debug)]
pub enum TransactionError {
    /// The transaction's bytes could not be interpreted by the app.
    Malformed,

    /// The transaction is well-formed but inadmissible against the provided state view.
    Inadmissible { reason: String },
}

impl std::fmt::Display for TransactionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionError::Malformed => write!(f, "malformed transaction"),
            TransactionError::Inadmissible { reason } => {
                write!(f, "inadmissible transaction: {}", reason)
            }
        }
    }
}
