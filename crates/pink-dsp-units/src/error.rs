// SPDX-License-Identifier: LGPL-3.0-or-later

//! Error type for generator and meter configuration.
//!
//! Only configuration can fail. Once a processor is set up, every
//! `process_*` call is total and never returns an error, so nothing in an
//! audio callback has to handle one.

use std::fmt;

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A configuration value is zero, negative, or too large.
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: i64,
        /// What the value must satisfy.
        reason: &'static str,
    },
}

impl Error {
    /// Create an [`Error::InvalidArgument`].
    pub fn invalid_argument(name: &'static str, value: i64, reason: &'static str) -> Self {
        Self::InvalidArgument {
            name,
            value,
            reason,
        }
    }

    /// Name of the parameter that was rejected.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidArgument { name, .. } => name,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument {
                name,
                value,
                reason,
            } => write!(f, "invalid argument: {name} = {value} ({reason})"),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias for fallible configuration calls.
pub type Result<T> = std::result::Result<T, Error>;
