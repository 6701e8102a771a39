//! # pjournal-vault
//!
//! Filesystem and version-control side of pjournal.
//!
//! The journal and thinking-log directories are the inputs; `git` supplies
//! commit history through [`GitCli`]. The aggregate file is derived output
//! that [`extract::run`] rebuilds wholesale on every run.

pub mod config;
pub mod extract;
pub mod git;
pub mod store;

pub use git::GitCli;
pub use store::JournalStore;
