//! Shared utilities.
//!
//! Filesystem identity checks, lexical path normalization, and test helpers.

pub mod fsid;

#[cfg(test)]
pub mod testutil;
