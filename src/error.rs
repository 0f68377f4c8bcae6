//! Error types and result aliases for edpfmt.
//!
//! The core pipeline is total and never fails; fallible operations
//! (I/O, configuration parsing) use:
//! - [`Result<T>`]: Type alias for `anyhow::Result<T>` used throughout the crate

use anyhow::Result as AnyhowResult;

pub type Result<T> = AnyhowResult<T>;
