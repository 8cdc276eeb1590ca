//! Task ID generation utilities.
//!
//! Task IDs are generated from the task text by:
//! 1. Converting to lowercase
//! 2. Replacing non-alphanumeric characters with hyphens
//! 3. Collapsing multiple hyphens
//! 4. Trimming leading/trailing hyphens
//! 5. Appending 8 random hex characters

use std::cell::Cell;

thread_local! {
    /// Counter for deterministic ID generation in tests; `None` means random IDs.
    ///
    /// Thread-local so parallel tests cannot observe each other's counters.
    static TEST_COUNTER: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Maximum slug length before the suffix is appended.
const MAX_SLUG_LEN: usize = 40;

/// Enable deterministic ID generation for testing.
///
/// When enabled, IDs generated on the current thread use a counter
/// starting at 0 instead of random hex.
pub fn enable_deterministic_ids() {
    TEST_COUNTER.with(|c| c.set(Some(0)));
}

/// Disable deterministic ID generation on the current thread.
pub fn disable_deterministic_ids() {
    TEST_COUNTER.with(|c| c.set(None));
}

/// Convert task text to a slug of at most `max_len` bytes.
#[must_use]
pub fn slugify(text: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(text.len().min(max_len + 1));
    let mut last_was_hyphen = true; // Start true to avoid leading hyphen

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    if slug.len() > max_len {
        slug.truncate(max_len);
    }
    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Generate a random 8-character hex suffix.
#[allow(clippy::cast_possible_truncation)]
fn random_suffix() -> String {
    if let Some(count) = TEST_COUNTER.with(|c| {
        let count = c.get()?;
        c.set(Some(count + 1));
        Some(count)
    }) {
        format!("{count:08x}")
    } else {
        use std::collections::hash_map::RandomState;
        use std::hash::{BuildHasher, Hasher};

        // RandomState is seeded per instance, the clock only adds entropy
        let mut hasher = RandomState::new().build_hasher();
        hasher.write_u64(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |d| d.as_nanos() as u64),
        );
        format!("{:08x}", hasher.finish() & 0xFFFF_FFFF)
    }
}

/// Generate a task ID from the task text.
///
/// The ID is the slugified text plus an 8-character hex suffix. Uniqueness
/// against the live list is the caller's job, see [`generate_unique_id`].
#[must_use]
pub fn generate_task_id(text: &str) -> String {
    let slug = slugify(text, MAX_SLUG_LEN);
    let suffix = random_suffix();

    if slug.is_empty() {
        format!("task-{suffix}")
    } else {
        format!("{slug}-{suffix}")
    }
}

/// Generate a task ID for which `is_taken` returns false.
#[must_use]
pub fn generate_unique_id(text: &str, is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = generate_task_id(text);
        if !is_taken(&id) {
            return id;
        }
    }
}
