//! Binary-side plumbing around the crawl engine.

pub(crate) mod exit_handler;
pub(crate) mod progress_manager;
pub(crate) mod prompt;
pub(crate) mod runtime;
pub(crate) mod summary;
pub(crate) mod terminal;
