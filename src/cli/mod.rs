//! Command-line front end for the task list.
//!
//! Every command opens the task list, performs at most one store operation
//! and prints the result. Text output is rendered through the templates in
//! [`crate::templates`]; `--json` prints the raw data instead.

mod run;


pub use run::{run, CliOutput};

use crate::tasks::{FilterMode, Priority, SortMode};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Personal task list.
///
/// Tasks are kept in `~/.tasklist/tasks.json` unless `--data-file` or the
/// `data_file` setting in `~/.tasklist/config.yaml` says otherwise.
#[derive(Parser, Debug)]
#[command(name = "tasklist")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding config, templates and the default task file
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Task file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a task.
    Add {
        /// Task text
        text: String,

        /// Priority: high, medium or low
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
    },

    /// Mark a task completed, or pending again if it already is.
    Toggle {
        /// Task ID
        id: String,
    },

    /// Change the text and optionally the priority of a task.
    Edit {
        /// Task ID
        id: String,

        /// New task text
        text: String,

        /// New priority (keeps the current one if omitted)
        #[arg(short, long)]
        priority: Option<Priority>,
    },

    /// Delete a task.
    Delete {
        /// Task ID
        id: String,
    },

    /// Delete every completed task.
    #[command(name = "clear-completed")]
    ClearCompleted,

    /// List tasks.
    List {
        /// Which tasks to show: all, pending or completed
        #[arg(short, long)]
        filter: Option<FilterMode>,

        /// Order: newest, oldest, priority or alphabetical
        #[arg(short, long)]
        sort: Option<SortMode>,

        /// Print the tasks as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show completion and priority statistics.
    Stats {
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write all tasks to a JSON file.
    ///
    /// Defaults to `tasks-YYYY-MM-DD.json` in the current directory. Use
    /// `-o -` to print to stdout.
    Export {
        /// Output file, or `-` for stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Replace all tasks with the contents of a JSON export.
    ///
    /// The current list is discarded. Use `-` to read from stdin.
    Import {
        /// Export file, or `-` for stdin
        path: PathBuf,
    },

    /// Show version information.
    Version,

    /// Ensure config file exists (create with defaults if not).
    #[command(name = "ensure-config")]
    EnsureConfig,
}

impl Command {
    /// Returns true if this command requires stdin input.
    #[must_use]
    pub fn needs_stdin(&self) -> bool {
        matches!(self, Self::Import { path } if is_std_stream(path))
    }

    /// Returns true if this command changes the task list.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Add { .. }
                | Self::Toggle { .. }
                | Self::Edit { .. }
                | Self::Delete { .. }
                | Self::ClearCompleted
                | Self::Import { .. }
        )
    }
}

/// Whether `path` is the conventional `-` for stdin/stdout.
pub(crate) fn is_std_stream(path: &std::path::Path) -> bool {
    path.as_os_str() == "-"
}
