//! Core traits for testability and abstraction.

use crate::error::Result;
use chrono::{DateTime, Utc};

/// Trait for the persistent location the task list is mirrored to.
///
/// The slot holds one serialized snapshot of the whole list. The production
/// implementation is a JSON file, while tests use in-memory slots.
pub trait StorageSlot {
    /// Read the slot's contents.
    ///
    /// Returns `None` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the slot's contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (e.g. disk full or permissions).
    fn save(&mut self, data: &str) -> Result<()>;
}

/// Trait for reading the current time.
///
/// This trait abstracts the system clock so timestamps are testable.
/// Clocks are `Send` so a store can move between threads.
pub trait Clock: Send {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
