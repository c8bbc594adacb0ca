//! Instrumented element types for strand test suites.
//!
//! Sequences own element destruction, so most interesting failures are
//! destruction failures: a drop that never runs, or runs twice after a
//! shift or a buffer move. [`DropLedger`] hands out [`DropProbe`]
//! elements and counts every drop that reaches them. [`Nothing`] is a
//! zero-sized element for allocation-free paths.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::fmt;
use std::marker::PhantomPinned;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared drop counter for a family of [`DropProbe`] elements.
///
/// Every probe handed out by [`probe`](DropLedger::probe) increments
/// the ledger once when it is dropped, wherever that happens: scope
/// exit, `clear`, a rejected push, or the container's own drop.
pub struct DropLedger {
    drops: Arc<AtomicUsize>,
}

impl DropLedger {
    pub fn new() -> Self {
        Self {
            drops: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mints a probe tied to this ledger.
    pub fn probe(&self, tag: usize) -> DropProbe {
        DropProbe {
            tag,
            drops: Arc::clone(&self.drops),
        }
    }

    /// Total drops observed so far, clones included.
    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::Relaxed)
    }
}

impl Default for DropLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// An element that reports its own destruction to a [`DropLedger`].
///
/// Cloning mints an independent probe on the same ledger, so a clone's
/// drop counts too.
pub struct DropProbe {
    tag: usize,
    drops: Arc<AtomicUsize>,
}

impl DropProbe {
    pub fn tag(&self) -> usize {
        self.tag
    }
}

impl Clone for DropProbe {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag,
            drops: Arc::clone(&self.drops),
        }
    }
}

impl fmt::Debug for DropProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DropProbe").field(&self.tag).finish()
    }
}

impl PartialEq for DropProbe {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

impl Eq for DropProbe {}

impl Drop for DropProbe {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::Relaxed);
    }
}

/// An element type that opts out of `Unpin`.
///
/// Container configurations that relocate constructed elements refuse
/// this type at compile time; tests use it to pin down which
/// configurations still accept it.
#[derive(Debug)]
pub struct Immovable {
    pub id: u32,
    _pin: PhantomPinned,
}

impl Immovable {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            _pin: PhantomPinned,
        }
    }
}

/// A zero-sized element. Sequences of these never allocate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nothing;
