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
#![allow(clippy::module_name_repetitions)]

//! Recursive copy/move engine for files and directory trees.
//!
//! Layout: `model/` (operation requests), `outcome.rs` (closed result codes and
//! their messages), `error.rs` (internal failure context), `service.rs` (the
//! engine itself).

pub mod error;
pub mod model;
pub mod outcome;
pub mod service;

pub use error::{EntryKind, FsOpsError, FsOpsResult};
pub use model::{Action, OperationRequest};
pub use outcome::{Outcome, UNEXPECTED_ERROR_MESSAGE, describe};
pub use service::{copy_directory, copy_file, execute, move_directory, move_file};
