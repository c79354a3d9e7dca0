/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The durable-state layer: pluggable key-value storage, the byte paths state variables live at,
//! typed write batches, and read-through speculative state views.
//!
//! The chain's state may be stored in any key-value store of the library user's own choosing, as
//! long as that store can provide a type that implements [`KVStore`](kv_store::KVStore). All
//! durable mutations performed by this crate are expressed as a single atomic
//! [`StateWriteBatch`](write_batch::StateWriteBatch) per lifecycle transition.

pub mod kv_store;

pub mod paths;

pub mod view;

pub mod write_batch;
