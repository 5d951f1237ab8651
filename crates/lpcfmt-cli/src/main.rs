use clap::Parser;

mod commands;

/// Source code formatter for LPC.
///
/// Formats LPC files in place, checks formatting in CI, or filters
/// stdin to stdout. Configuration is read from lpcfmt.toml (found by
/// walking up from the current directory) and ~/.lpcfmt/config.toml,
/// with environment variables and CLI flags taking precedence.
///
/// EXAMPLES:
///     lpcfmt lib/                   Format all LPC files under lib/
///     lpcfmt foo.c bar.c            Format specific files
///     lpcfmt lib/ --check           Fail if anything needs reformatting
///     cat foo.c | lpcfmt --stdin    Format stdin to stdout
///
/// ENVIRONMENT VARIABLES:
///     LPCFMT_INDENT_SIZE          Override indentation size
///     LPCFMT_MAX_BLANK_LINES      Override blank line cap
///     LPCFMT_BRACES_ON_NEW_LINE   Override brace placement
///     NO_COLOR                    Disable colored output
#[derive(Parser)]
#[command(name = "lpcfmt")]
#[command(version)]
#[command(after_help = "For more information, see: https://github.com/lpcfmt/lpcfmt")]
struct Cli {
    /// Files or directories to format (.c, .h, .lpc)
    #[arg(required_unless_present = "stdin")]
    files: Vec<String>,

    /// Check formatting without modifying files; exit 1 if changes are needed
    #[arg(long)]
    check: bool,

    /// Read source from stdin and write the result to stdout
    #[arg(long, conflicts_with = "files")]
    stdin: bool,

    /// Path to a configuration file (instead of discovering lpcfmt.toml)
    #[arg(long, short = 'c')]
    config: Option<std::path::PathBuf>,

    /// Indentation size in spaces (default: 4)
    #[arg(long)]
    indent_size: Option<usize>,

    /// Maximum run of consecutive blank lines to keep (default: 2)
    #[arg(long)]
    max_blank_lines: Option<usize>,

    /// Put opening braces on their own line
    #[arg(long)]
    braces_on_new_line: Option<bool>,

    /// Verbose output with timing information
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Suppress non-error output
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let verbosity = if cli.quiet {
        commands::fmt::Verbosity::Quiet
    } else if cli.verbose {
        commands::fmt::Verbosity::Verbose
    } else {
        commands::fmt::Verbosity::Normal
    };

    let args = commands::fmt::FmtArgs {
        files: cli.files,
        check: cli.check,
        stdin: cli.stdin,
        config_path: cli.config,
        indent_size: cli.indent_size,
        max_blank_lines: cli.max_blank_lines,
        braces_on_new_line: cli.braces_on_new_line,
        verbosity,
    };

    commands::fmt::run(args)
}
