//! [`CounterApp`], a simple implementation of [`App`] used in the lifecycle integration tests.

use std::sync::{Arc, Mutex};

use borsh::{BorshDeserialize, BorshSerialize};
use chainexec::{
    app::{App, TransactionError},
    state::kv_store::KVGet,
    state::view::StateView,
    types::basic::{AppStateUpdates, Transaction},
};

use crate::common::mem_db::MemDB;

// The key in the app state where the counter is stored.
pub(crate) const COUNTER_KEY: [u8; 1] = [0];

/// A deterministic [`App`] whose state is a single `u32` counter.
///
/// [`Add`](CounterTransaction::Add) transactions increase the counter,
/// [`Sub`](CounterTransaction::Sub) transactions decrease it and are inadmissible when the counter
/// would go below zero. The number of transactions actually executed is recorded, so tests can
/// assert that a code path executed nothing.
pub(crate) struct CounterApp {
    executions: Arc<Mutex<u64>>,
}

#[derive(Clone, BorshSerialize, BorshDeserialize)]
pub(crate) enum CounterTransaction {
    Add(u32),
    Sub(u32),
}

impl CounterApp {
    pub(crate) fn new() -> CounterApp {
        CounterApp {
            executions: Arc::new(Mutex::new(0)),
        }
    }

    /// Clone a handle to the execution counter before moving the app into a manager.
    pub(crate) fn execution_counter(&self) -> Arc<Mutex<u64>> {
        self.executions.clone()
    }

    /// An `AppStateUpdates` that, applied on an empty app state, produces a good initial app
    /// state for a counter app: one containing the number 0.
    pub(crate) fn initial_app_state() -> AppStateUpdates {
        let mut state = AppStateUpdates::new();
        state.insert(COUNTER_KEY.to_vec(), u32::to_le_bytes(0).to_vec());
        state
    }

    /// Serialize a [`CounterTransaction`] into an opaque [`Transaction`].
    pub(crate) fn transaction(tx: CounterTransaction) -> Transaction {
        Transaction::new(tx.try_to_vec().unwrap())
    }

    /// Read the committed counter value directly from the store.
    pub(crate) fn committed_counter(store: &MemDB) -> u32 {
        u32::from_le_bytes(
            store
                .committed_app_state(&COUNTER_KEY)
                .unwrap()
                .try_into()
                .unwrap(),
        )
    }
}

impl App<MemDB> for CounterApp {
    fn execute_transaction(
        &mut self,
        transaction: &Transaction,
        view: &StateView<MemDB>,
    ) -> Result<AppStateUpdates, TransactionError> {
        *self.executions.lock().unwrap() += 1;

        let tx = CounterTransaction::deserialize(&mut transaction.bytes().as_slice())
            .map_err(|_| TransactionError::Malformed)?;

        let current = view
            .app_state(&COUNTER_KEY)
            .map(|bytes| u32::from_le_bytes(bytes.try_into().unwrap()))
            .unwrap_or(0);

        let new = match tx {
            CounterTransaction::Add(n) => current.wrapping_add(n),
            CounterTransaction::Sub(n) => {
                if current < n {
                    return Err(TransactionError::Inadmissible {
                        reason: format!("counter {} cannot be decreased by {}", current, n),
                    });
                }
                current - n
            }
        };

        let mut updates = AppStateUpdates::new();
        updates.insert(COUNTER_KEY.to_vec(), new.to_le_bytes().to_vec());
        Ok(updates)
    }
}
