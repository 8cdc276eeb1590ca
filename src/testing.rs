//! Testing utilities and mock implementations.
//!
//! These types are provided for use in tests. They may appear unused in
//! the library itself but are consumed by unit tests.

#![allow(dead_code)]

use crate::error::{Error, Result};
use crate::tasks::{Priority, Task};
use crate::traits::{Clock, StorageSlot};
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, PoisonError};

/// A storage slot whose writes can be made to fail.
///
/// Writes that succeed are kept, so a test can check what was persisted.
#[derive(Debug, Default)]
pub struct MockStorageSlot {
    initial: Option<String>,
    written: Option<String>,
    fail_saves: bool,
    save_attempts: usize,
}

impl MockStorageSlot {
    /// Create an empty slot that accepts writes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that loads `data`.
    #[must_use]
    pub fn with_data(data: &str) -> Self {
        Self { initial: Some(data.to_string()), ..Self::default() }
    }

    /// Make every following save fail (or succeed again).
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Number of times `save` was called, failed calls included.
    #[must_use]
    pub const fn save_attempts(&self) -> usize {
        self.save_attempts
    }

    /// The last successfully written data.
    #[must_use]
    pub fn written(&self) -> Option<&str> {
        self.written.as_deref()
    }
}

impl StorageSlot for MockStorageSlot {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.written.clone().or_else(|| self.initial.clone()))
    }

    fn save(&mut self, data: &str) -> Result<()> {
        self.save_attempts += 1;
        if self.fail_saves {
            return Err(Error::Io(std::io::Error::other("quota exceeded")));
        }
        self.written = Some(data.to_string());
        Ok(())
    }
}

/// A manually advanced clock.
///
/// Clones share the same time, so a test can keep a handle after giving
/// the clock to a store.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Create a clock fixed at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(start)) }
    }

    /// Create a clock fixed at 2024-01-01T00:00:00Z.
    #[must_use]
    pub fn at_epoch() -> Self {
        Self::new(fixed_time("2024-01-01T00:00:00Z"))
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Parse an RFC 3339 timestamp.
///
/// # Panics
///
/// Panics if `s` is not a valid timestamp.
#[must_use]
pub fn fixed_time(s: &str) -> DateTime<Utc> {
    s.parse().expect("test timestamp should be valid RFC 3339")
}

/// Build a pending task with the given fields.
#[must_use]
pub fn task(id: &str, text: &str, priority: Priority, created_at: &str) -> Task {
    Task {
        id: id.to_string(),
        text: text.to_string(),
        priority,
        completed: false,
        created_at: fixed_time(created_at),
        completed_at: None,
        updated_at: None,
    }
}

/// Build a completed task with the given fields, completed one hour after creation.
#[must_use]
pub fn completed_task(id: &str, text: &str, priority: Priority, created_at: &str) -> Task {
    let mut t = task(id, text, priority, created_at);
    t.completed = true;
    t.completed_at = Some(t.created_at + Duration::hours(1));
    t
}
