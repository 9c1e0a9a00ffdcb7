//! Searoute CLI library.
//!
//! Log initialization, terminal styling and report rendering for the
//! `searoute-cli` binary, kept in a library so they can be unit tested.

pub mod logging;
pub mod output;
pub mod terminal;
