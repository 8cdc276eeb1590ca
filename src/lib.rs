//! # `tasklist`
//!
//! A personal task list: add, edit, complete, filter, sort, delete, import
//! and export tasks, with the whole list persisted to a JSON file.
//!
//! The core is [`tasks::TaskStore`], which owns the list and mirrors every
//! change to a [`traits::StorageSlot`]. [`view`] turns its output into a
//! presentation model, and the `cli` module (feature `cli`) renders that
//! model from the command line.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod event_log;
pub mod paths;
pub mod storage;
pub mod tasks;
pub mod templates;
pub mod testing;
pub mod traits;
pub mod view;

pub use error::{Error, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
