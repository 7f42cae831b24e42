//! C boundary over `aathoos_core` for native hosts.
//!
//! # Invariants
//! - Exported functions never unwind into the host.
//! - Every `char*` result is owned by this library until passed back to
//!   `aathoos_free_string`.
//!
//! The matching declarations live in `include/aathoos_core.h`.

pub mod api;
mod handles;

pub use handles::AathoosDb;
