//! Command-line interface for edpfmt.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to format
    pub inputs: Vec<PathBuf>,

    /// Number of spaces per indent level
    pub indent: Option<usize>,

    /// Disable indentation
    pub no_indent: bool,

    /// Disable spacing/line-break formatting
    pub no_spacing: bool,

    /// Keep comments as written
    pub no_comment_normalization: bool,

    /// Keep blank-line runs as written
    pub keep_blank_lines: bool,

    /// Output to stdout instead of in-place
    pub stdout: bool,

    /// Show formatted output without modifying files
    pub diff: bool,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Recursive directory processing
    pub recursive: bool,

    /// Silent mode (no output)
    pub silent: bool,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: Option<usize>,

    /// Exclude patterns for files/directories (glob patterns)
    pub exclude: Vec<String>,

    /// Custom file extensions (in addition to defaults)
    pub extensions: Vec<String>,

    /// Enable debug output
    pub debug: bool,
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("edpfmt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Auto-formatter for FreeFEM scripts with embedded EJS templating")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to format")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("indent")
                .short('i')
                .long("indent")
                .help("Number of spaces per indent level [default: 4]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("no-indent")
                .long("no-indent")
                .help("Disable indentation")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-spacing")
                .long("no-spacing")
                .help("Disable spacing and line-break formatting")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-comment-normalization")
                .long("no-comment-normalization")
                .help("Keep comments exactly as written")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("keep-blank-lines")
                .long("keep-blank-lines")
                .help("Keep runs of blank lines as written")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stdout")
                .short('s')
                .long("stdout")
                .help("Output to stdout instead of formatting in place")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("diff")
                .short('d')
                .long("diff")
                .help("Print formatted output without modifying files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Config file path (overrides auto-discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Process directories recursively")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Parallel jobs (0=auto, 1=sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files/dirs matching pattern (repeatable)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("extension")
                .short('x')
                .long("extension")
                .help("Additional file extension to process (repeatable)")
                .value_name("EXT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from the process environment
#[must_use]
pub fn parse_args() -> CliArgs {
    let matches = build_cli().get_matches();
    args_from_matches(&matches)
}

/// Parse CLI arguments from an explicit iterator (used by tests)
#[must_use]
pub fn parse_args_from<I, T>(iter: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = build_cli().get_matches_from(iter);
    args_from_matches(&matches)
}

fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|v| v.cloned().collect())
            .unwrap_or_default(),
        indent: matches.get_one::<usize>("indent").copied(),
        no_indent: matches.get_flag("no-indent"),
        no_spacing: matches.get_flag("no-spacing"),
        no_comment_normalization: matches.get_flag("no-comment-normalization"),
        keep_blank_lines: matches.get_flag("keep-blank-lines"),
        stdout: matches.get_flag("stdout"),
        diff: matches.get_flag("diff"),
        config: matches.get_one::<PathBuf>("config").cloned(),
        recursive: matches.get_flag("recursive"),
        silent: matches.get_flag("silent"),
        jobs: matches.get_one::<usize>("jobs").copied(),
        exclude: matches
            .get_many::<String>("exclude")
            .map(|v| v.cloned().collect())
            .unwrap_or_default(),
        extensions: matches
            .get_many::<String>("extension")
            .map(|v| v.cloned().collect())
            .unwrap_or_default(),
        debug: matches.get_flag("debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_args() {
        let args = parse_args_from(["edpfmt", "file.edp", "-i", "2"]);
        assert_eq!(args.inputs, vec![PathBuf::from("file.edp")]);
        assert_eq!(args.indent, Some(2));
        assert!(!args.recursive);
    }

    #[test]
    fn test_parse_flags() {
        let args = parse_args_from(["edpfmt", "-r", "-S", "--no-indent", "dir"]);
        assert!(args.recursive);
        assert!(args.silent);
        assert!(args.no_indent);
        assert!(!args.no_spacing);
    }

    #[test]
    fn test_parse_repeatable_excludes() {
        let args = parse_args_from(["edpfmt", "-e", "build/*", "-e", "vendor", "."]);
        assert_eq!(args.exclude, vec!["build/*", "vendor"]);
    }

    #[test]
    fn test_parse_no_inputs() {
        let args = parse_args_from(["edpfmt"]);
        assert!(args.inputs.is_empty());
    }
}
