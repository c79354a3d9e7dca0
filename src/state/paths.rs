/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/
//! Byte-prefixes that specify where each state variable is stored in the user-provided key-value
//! store.
//!
//! # Storage of state variables
//!
//! Each variable is stored as **Borsh-serialized values** in one or more **keys** in the key-value
//! store. These keys are formed by combining the constants defined in this module:
//!
//! ## Single values
//!
//! "Single values" (currently only the last accepted block) are stored in one-byte, constant keys
//! defined in constants sharing the variable's name.
//!
//! ## Mappings
//!
//! Mappings of the form "`A` -> `B`" (e.g., committed app state) are stored in multiple keys, each
//! key being the concatenation of a constant one-byte prefix sharing the variable's name, and then
//! the serialization of an instance of the `A` type.
//!
//! ## Blocks
//!
//! Blocks are stored field-per-key so that callers can read a subset of a block's fields without
//! loading the entire block from storage. The non-`transactions` fields (`height`, `parent`, and
//! the block's decided status) are stored like separate single values at keys formed by
//! concatenating [`BLOCKS`], the block's hash, and a constant byte sharing the field's name. The
//! `transactions` field is stored in one key holding `transactions.len() as u32`
//! ([`BLOCK_TX_COUNT`]) and one key per transaction ([`BLOCK_TRANSACTIONS`] + the transaction's
//! index as a Borsh-serialized `u32`).

// State variables
pub const BLOCKS: [u8; 1] = [0];
pub const COMMITTED_APP_STATE: [u8; 1] = [1];
pub const LAST_ACCEPTED: [u8; 1] = [2];

// Fields of Block
pub const BLOCK_HEIGHT: [u8; 1] = [0];
pub const BLOCK_PARENT: [u8; 1] = [1];
pub const BLOCK_STATUS: [u8; 1] = [2];
pub const BLOCK_TX_COUNT: [u8; 1] = [3];
pub const BLOCK_TRANSACTIONS: [u8; 1] = [4];

/// Concatenate two byteslices into one vector.
pub fn combine(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut res = Vec::with_capacity(a.len() + b.len());
    res.extend_from_slice(a);
    res.extend_from_slice(b);
    res
}
