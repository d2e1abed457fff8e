//! Subcommands of the phonrec CLI.

pub mod cli;
pub mod labels;
pub mod prune;
pub mod timings;
