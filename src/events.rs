//! Definitions of lifecycle events for event handling and logging.
//! Note: an event for a given action indicates that the action has been completed.

use crate::types::basic::{BlockHeight, CryptoHash};
use std::sync::mpsc::Sender;
use std::time::SystemTime;

use crate::logging::Logger;

pub enum Event {
    VerifyBlock(VerifyBlockEvent),
    AcceptBlock(AcceptBlockEvent),
    RejectBlock(RejectBlockEvent),
    UpdatePreference(UpdatePreferenceEvent),
}

impl Event {
    /// Log the event (if `log_events` is set) and forward it to the user-supplied publisher, if
    /// any. A disconnected publisher is ignored.
    pub(crate) fn publish(self, log_events: bool, event_publisher: &Option<Sender<Event>>) {
        if log_events {
            match &self {
                Event::VerifyBlock(verify_block_event) => verify_block_event.log(),
                Event::AcceptBlock(accept_block_event) => accept_block_event.log(),
                Event::RejectBlock(reject_block_event) => reject_block_event.log(),
                Event::UpdatePreference(update_preference_event) => update_preference_event.log(),
            }
        }

        if let Some(event_publisher) = event_publisher {
            let _ = event_publisher.send(self);
        }
    }
}

pub struct VerifyBlockEvent {
    pub timestamp: SystemTime,
    pub block: CryptoHash,
    pub height: BlockHeight,
}

pub struct AcceptBlockEvent {
    pub timestamp: SystemTime,
    pub block: CryptoHash,
    pub height: BlockHeight,
    pub transaction_count: u64,
}

pub struct RejectBlockEvent {
    pub timestamp: SystemTime,
    pub block: CryptoHash,
}

pub struct UpdatePreferenceEvent {
    pub timestamp: SystemTime,
    pub preferred: CryptoHash,
}
