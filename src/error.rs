// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for index construction and loading.
//!
//! Builders validate eagerly and fail before emitting partial output.
//! Query-time code paths never construct these: an inconsistency detected
//! mid-query on a well-formed index is a bug, not a user error.

use std::fmt;
use std::io;

/// All the ways building or loading an index can fail.
#[derive(Debug)]
pub enum Error {
    /// A codec name was requested that no known codec implements.
    InvalidEncoding(String),
    /// A decoded length, gap sum, or endpoint contradicts the list header.
    CorruptIndex(String),
    /// A term id or docid lookup outside declared bounds.
    OutOfRange(String),
    /// Bad caller input: non-monotone docids, empty posting list,
    /// quantizer input outside its range, and the like.
    InvalidArgument(String),
    /// File open/read/write failure while loading or persisting.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidEncoding(name) => write!(f, "unknown encoding: {}", name),
            Error::CorruptIndex(msg) => write!(f, "corrupt index: {}", msg),
            Error::OutOfRange(msg) => write!(f, "out of range: {}", msg),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
