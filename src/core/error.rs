//! Errors raised while loading the time-loop config and level layouts.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{path} does not exist")]
    Missing { path: String },

    #[error("could not read {path}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// RON syntax or shape error, with the position ron reported.
    #[error("{path}:{line}:{column}: {message}")]
    Syntax {
        path: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// A tuning value the simulation cannot run with.
    #[error("config value `{field}` {details}")]
    Invalid { field: &'static str, details: String },

    /// A level layout entry with degenerate geometry.
    #[error("level '{level}': {entry} {details}")]
    BadLevelEntry {
        level: String,
        /// Which entry, e.g. `platforms[2]`
        entry: String,
        details: String,
    },
}
