//! Configuration as specified by the operator.

use std::time::Duration;
use typed_builder::TypedBuilder;

use crate::types::basic::ChainId;

/// Stores the user-defined parameters that tune the lifecycle manager and the validator sampler,
/// that is:
/// 1. The [chain ID](crate::types::basic::ChainId) of the target blockchain, which the sampler
///    passes to its validator source.
/// 2. The maximum validator set staleness: how old the sampler's cached validator set may grow
///    before the next query triggers a refresh attempt.
/// 3. The "refill mempool on reject" flag. Nodes that only partially participate in the network
///    may set this to `false` to skip re-offering a rejected block's transactions to the mempool.
/// 4. The "log events" flag, if set to `true` then logs are printed for every completed lifecycle
///    transition.
///
/// ## Log events
///
/// This crate logs using the [log](https://docs.rs/log/latest/log/) crate. To get these messages
/// printed onto a terminal or to a file, set up a [logging
/// implementation](https://docs.rs/log/latest/log/#available-logging-implementations).
#[derive(Clone, TypedBuilder)]
#[builder(builder_method(doc = "
    Create a builder for building a [Configuration]. On the builder call the following methods to construct a valid [Configuration].

    Required:
    - `.chain_id(...)`
    - `.max_validator_set_staleness(...)`
    - `.refill_mempool_on_reject(...)`
    - `.log_events(...)`
"))]
pub struct Configuration {
    #[builder(setter(doc = "Set the chain ID of the blockchain. Required."))]
    pub chain_id: ChainId,
    #[builder(setter(doc = "Set how stale the cached validator set may grow before a refresh. Required."))]
    pub max_validator_set_staleness: Duration,
    #[builder(setter(doc = "Set whether a rejected block's transactions are re-offered to the mempool. Required."))]
    pub refill_mempool_on_reject: bool,
    #[builder(setter(doc = "Set whether logs should be printed. Required."))]
    pub log_events: bool,
}
