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

//! Interactive front-end that collects an operation from the terminal and runs
//! the `copydir` executable with the matching arguments.
//!
//! Layout:
//! - `launcher.rs`: process launching seam and its `std::process` implementation
//! - `session.rs`: question/answer loop over any reader and writer
//! - `config.rs`: environment-driven settings
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod config;
pub mod launcher;
pub(crate) mod session;

pub use launcher::{CommandLauncher, LaunchOutput, ProcessLauncher};
pub use session::run;
