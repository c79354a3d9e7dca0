/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines [`BootstrapFlag`], the shared gate that reports whether this node has finished
//! bootstrapping.
//!
//! The flag is a cloneable handle to one shared cell: the node process flips it once bootstrapping
//! completes, and every component holding a clone observes the change. Passing the handle in
//! explicitly (rather than consulting process-wide state) lets tests construct independent
//! instances per case.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct BootstrapFlag(Arc<AtomicBool>);

impl BootstrapFlag {
    /// Create a flag that initially reports bootstrapping as not completed.
    pub fn new() -> BootstrapFlag {
        BootstrapFlag(Arc::new(AtomicBool::new(false)))
    }

    /// Whether bootstrapping has completed.
    pub fn completed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Mark bootstrapping as completed. Observed by every clone of this flag.
    pub fn mark_completed(&self) {
        self.0.store(true, Ordering::SeqCst)
    }
}

impl Default for BootstrapFlag {
    fn default() -> Self {
        BootstrapFlag::new()
    }
}
