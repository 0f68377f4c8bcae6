//! edpfmt - Auto-formatter for FreeFEM source code
//!
//! Formats FreeFEM scripts, including files interleaved with EJS
//! templating regions, through a three-stage pipeline: tokenize into an
//! ownership tree, decorate the tree with whitespace and indentation,
//! serialize it back to text.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::struct_excessive_bools)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod directive;
pub mod error;
pub mod format;
pub mod parser;
pub mod process;
pub mod stringify;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use directive::{find_directive, parse_directive, DirectiveOverrides};
pub use error::Result;
pub use parser::parse;
pub use process::format_document;
pub use stringify::stringify;
