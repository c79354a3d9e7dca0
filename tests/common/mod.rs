//! Helpers shared between the integration tests: an in-memory key-value store, a counter app,
//! mock collaborators, and manager construction.

pub(crate) mod counter_app;
pub(crate) mod logging;
pub(crate) mod mem_db;
pub(crate) mod mocks;

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chainexec::{
    bootstrap::BootstrapFlag,
    config::Configuration,
    events::Event,
    lifecycle::Manager,
    types::basic::{BlockHeight, ChainId, CryptoHash},
    types::block::Block,
};

use counter_app::CounterApp;
use mem_db::MemDB;
use mocks::RecordingMempool;

pub(crate) const GENESIS_PARENT: CryptoHash = CryptoHash::new([0; 32]);

/// Build a genesis block with an empty payload.
pub(crate) fn genesis_block() -> Block {
    Block::new(BlockHeight::new(0), GENESIS_PARENT, Vec::new())
}

/// A manager over a fresh `MemDB`, seeded with the genesis block and the counter app's initial
/// state, along with handles to everything a test might want to inspect afterwards.
pub(crate) struct TestChain {
    pub(crate) manager: Manager<MemDB, RecordingMempool, CounterApp>,
    pub(crate) store: MemDB,
    pub(crate) mempool: RecordingMempool,
    pub(crate) bootstrap: BootstrapFlag,
    pub(crate) genesis: Block,
    pub(crate) executions: Arc<Mutex<u64>>,
}

impl TestChain {
    pub(crate) fn new(
        refill_mempool_on_reject: bool,
        event_publisher: Option<Sender<Event>>,
    ) -> TestChain {
        let config = Configuration::builder()
            .chain_id(ChainId::new(0))
            .max_validator_set_staleness(Duration::from_millis(100))
            .refill_mempool_on_reject(refill_mempool_on_reject)
            .log_events(true)
            .build();

        let mut kv_store = MemDB::new();
        let genesis = genesis_block();
        Manager::<MemDB, RecordingMempool, CounterApp>::initialize(
            &mut kv_store,
            &genesis,
            &CounterApp::initial_app_state(),
        )
        .unwrap();

        let mempool = RecordingMempool::new();
        let app = CounterApp::new();
        let executions = app.execution_counter();
        let bootstrap = BootstrapFlag::new();

        let manager = Manager::new(
            config,
            kv_store.clone(),
            mempool.clone(),
            app,
            bootstrap.clone(),
            event_publisher,
        )
        .unwrap();

        TestChain {
            manager,
            store: kv_store,
            mempool,
            bootstrap,
            genesis,
            executions,
        }
    }
}
