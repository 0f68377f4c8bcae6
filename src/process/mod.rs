//! Document processing pipeline.
//!
//! Orchestrates the three core stages over one in-memory document:
//!
//! **Parse** — tokenize the text into its ownership tree.
//! **Format** — sibling linking, spacing/line breaks, indentation.
//! **Serialize** — concatenate the decorated tree back to text.
//!
//! The pipeline is synchronous, reentrant (all state lives in per-run
//! contexts) and never fails on its own; [`format_file`] only surfaces
//! I/O errors from its reader and writer.

pub mod pipeline;

pub use pipeline::{format_document, format_file};
