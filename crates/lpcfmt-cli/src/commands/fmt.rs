//! The formatting command

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use lpcfmt::{format_source_with_options, FormatOptions};
use lpcfmt_config::{ConfigLoader, FormattingConfig};

/// File extensions treated as LPC source when walking directories
const LPC_EXTENSIONS: &[&str] = &["c", "h", "lpc"];

/// Verbosity level for formatter output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Suppress all non-error output
    Quiet,
    /// Normal output (default)
    #[default]
    Normal,
    /// Detailed output with timing and file info
    Verbose,
}

/// Arguments for the fmt command
pub struct FmtArgs {
    pub files: Vec<String>,
    pub check: bool,
    pub stdin: bool,
    pub config_path: Option<PathBuf>,
    pub indent_size: Option<usize>,
    pub max_blank_lines: Option<usize>,
    pub braces_on_new_line: Option<bool>,
    pub verbosity: Verbosity,
}

/// Run the fmt command
pub fn run(args: FmtArgs) -> Result<()> {
    let start_time = std::time::Instant::now();
    let options = resolve_options(&args)?;

    if args.stdin {
        return run_stdin(&args, &options);
    }

    let files = collect_files(&args.files)?;
    if files.is_empty() {
        if args.verbosity != Verbosity::Quiet {
            eprintln!("No LPC files found");
        }
        return Ok(());
    }

    if args.verbosity == Verbosity::Verbose {
        eprintln!("Configuration:");
        eprintln!("  indent_size: {}", options.indent_size);
        eprintln!("  max_blank_lines: {}", options.max_blank_lines);
        eprintln!("  braces_on_new_line: {}", options.braces_on_new_line);
        if let Some(ref path) = args.config_path {
            eprintln!("  config_file: {}", path.display());
        }
        eprintln!("Processing {} file(s)...", files.len());
        eprintln!();
    }

    let mut unformatted_count = 0usize;
    let mut formatted_count = 0usize;
    let mut unchanged_count = 0usize;
    let total_files = files.len();

    for (index, file) in files.iter().enumerate() {
        let file_start = std::time::Instant::now();

        if args.verbosity == Verbosity::Verbose && total_files > 1 {
            eprint!("[{}/{}] {} ... ", index + 1, total_files, file.display());
        }

        let source = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let formatted = format_source_with_options(&source, &options);
        let changed = formatted != source;

        if args.check {
            if changed {
                if args.verbosity == Verbosity::Verbose {
                    eprintln!("{}", "would reformat".yellow());
                } else if args.verbosity == Verbosity::Normal {
                    eprintln!("{} {}", "Would reformat:".yellow(), file.display());
                }
                unformatted_count += 1;
            } else {
                unchanged_count += 1;
                if args.verbosity == Verbosity::Verbose {
                    eprintln!("{}", "ok".green());
                }
            }
        } else if changed {
            std::fs::write(file, &formatted)
                .with_context(|| format!("Failed to write {}", file.display()))?;

            if args.verbosity == Verbosity::Verbose {
                let elapsed = file_start.elapsed();
                eprintln!("formatted ({:.2}ms)", elapsed.as_secs_f64() * 1000.0);
            } else if args.verbosity == Verbosity::Normal {
                eprintln!("{} {}", "Formatted:".green(), file.display());
            }
            formatted_count += 1;
        } else {
            unchanged_count += 1;
            if args.verbosity == Verbosity::Verbose {
                eprintln!("unchanged");
            }
        }
    }

    let total_elapsed = start_time.elapsed();

    if args.check {
        if unformatted_count > 0 {
            if args.verbosity != Verbosity::Quiet {
                eprintln!();
                eprintln!("{} file(s) would be reformatted", unformatted_count);
            }
            std::process::exit(1);
        } else if args.verbosity != Verbosity::Quiet {
            eprintln!("All {} file(s) are formatted correctly", files.len());
        }
    } else if args.verbosity != Verbosity::Quiet
        && (formatted_count > 0 || args.verbosity == Verbosity::Verbose)
    {
        eprintln!();
        if formatted_count > 0 {
            eprintln!("Formatted {} file(s)", formatted_count);
        }
        if args.verbosity == Verbosity::Verbose {
            eprintln!(
                "Summary: {} formatted, {} unchanged",
                formatted_count, unchanged_count
            );
            eprintln!("Total time: {:.2}ms", total_elapsed.as_secs_f64() * 1000.0);
        }
    }

    Ok(())
}

/// Format stdin to stdout. Under --check, exit 1 without output when the
/// input is not already formatted.
fn run_stdin(args: &FmtArgs, options: &FormatOptions) -> Result<()> {
    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .context("Failed to read stdin")?;

    let formatted = format_source_with_options(&source, options);

    if args.check {
        if formatted != source {
            if args.verbosity != Verbosity::Quiet {
                eprintln!("stdin would be reformatted");
            }
            std::process::exit(1);
        }
        return Ok(());
    }

    print!("{formatted}");
    Ok(())
}

/// Resolve effective options: config files, then environment, then CLI flags
fn resolve_options(args: &FmtArgs) -> Result<FormatOptions> {
    let mut loader = ConfigLoader::new();
    let config = match &args.config_path {
        Some(path) => loader
            .load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
            loader
                .load_from_directory(&cwd)
                .context("Failed to load configuration")?
        }
    };

    let mut options = config.format_options().context("Invalid configuration")?;
    // CLI flags go through the same range checks as every other source
    let overrides = FormattingConfig {
        indent_size: args.indent_size,
        max_blank_lines: args.max_blank_lines,
        braces_on_new_line: args.braces_on_new_line,
        ..Default::default()
    };
    overrides.validate().context("Invalid command-line option")?;
    overrides.apply(&mut options);
    Ok(options)
}

/// Collect LPC source files from paths (directories are walked recursively)
fn collect_files(paths: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path_str in paths {
        let path = Path::new(path_str);
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("Failed to read directory {}", path.display()))?;
                if entry.file_type().is_file() && is_lpc_file(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            // Accept any file explicitly passed
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

fn is_lpc_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| LPC_EXTENSIONS.contains(&ext))
}
