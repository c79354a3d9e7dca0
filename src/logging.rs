/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Functions that log out events.
//!
//! The logs defined in this module are printed if the user enabled them via the manager's
//! [config](crate::config::Configuration).
//!
//! This crate logs using the [log](https://docs.rs/log/latest/log/) crate. To get these messages
//! printed onto a terminal or to a file, set up a
//! [logging implementation](https://docs.rs/log/latest/log/#available-logging-implementations).
//!
//! ## Log message format
//!
//! Log messages are CSVs (Comma Separated Values) with at least two values. The first two values
//! are always:
//! 1. The name of the [event](crate::events) in PascalCase (defined in this module as constants).
//! 2. The time the event was emitted (as number of seconds since the Unix Epoch).
//!
//! The rest of the values differ depending on the kind of event. Block identities are printed as
//! the first seven characters of the Base64 encoding of the block's hash.

use crate::events::*;
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use std::time::SystemTime;

// Names of each event in PascalCase for printing:
pub const VERIFY_BLOCK: &str = "VerifyBlock";
pub const ACCEPT_BLOCK: &str = "AcceptBlock";
pub const REJECT_BLOCK: &str = "RejectBlock";
pub const UPDATE_PREFERENCE: &str = "UpdatePreference";

/// Implemented by event types. Used to log out the event at the site it is published.
pub(crate) trait Logger {
    fn log(&self);
}

impl Logger for VerifyBlockEvent {
    fn log(&self) {
        log::info!(
            "{}, {}, {}, {}",
            VERIFY_BLOCK,
            secs_since_unix_epoch(self.timestamp),
            first_seven_base64_chars(&self.block.bytes()),
            self.height
        )
    }
}

impl Logger for AcceptBlockEvent {
    fn log(&self) {
        log::info!(
            "{}, {}, {}, {}, {}",
            ACCEPT_BLOCK,
            secs_since_unix_epoch(self.timestamp),
            first_seven_base64_chars(&self.block.bytes()),
            self.height,
            self.transaction_count
        )
    }
}

impl Logger for RejectBlockEvent {
    fn log(&self) {
        log::info!(
            "{}, {}, {}",
            REJECT_BLOCK,
            secs_since_unix_epoch(self.timestamp),
            first_seven_base64_chars(&self.block.bytes())
        )
    }
}

impl Logger for UpdatePreferenceEvent {
    fn log(&self) {
        log::info!(
            "{}, {}, {}",
            UPDATE_PREFERENCE,
            secs_since_unix_epoch(self.timestamp),
            first_seven_base64_chars(&self.preferred.bytes())
        )
    }
}

/// Get a more readable representation of a bytesequence by base64-encoding it and taking the first
/// 7 characters.
fn first_seven_base64_chars(bytes: &[u8]) -> String {
    let encoded = STANDARD_NO_PAD.encode(bytes);
    if encoded.len() > 7 {
        encoded[0..7].to_string()
    } else {
        encoded
    }
}

fn secs_since_unix_epoch(timestamp: SystemTime) -> u64 {
    timestamp
        .duration_since(SystemTime::UNIX_EPOCH)
        .expect("Event occured before the Unix Epoch.")
        .as_secs()
}
