#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Command-line surface for the copydir engine.
//!
//! Layout:
//! - `cli.rs`: argument grammar and dispatch
//! - `config.rs`: environment-driven settings
//! - `output.rs`: result and usage renderers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod config;
pub(crate) mod output;

pub use cli::run;
