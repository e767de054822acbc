use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use glob::glob;
use log::{LevelFilter, debug, info};
use wialon_core::{DecodeReport, InputFormat};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("WIALON_BUILD_COMMIT"),
    ", built ",
    env!("WIALON_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "wialon")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for Wialon Combine tracker packets.",
    long_about = None,
    after_help = "Examples:\n  wialon decode packet.hex -o report.json\n  wialon decode capture.bin --stdout --pretty\n  wialon ack 0 17\n  wialon crc \"24 24 02 00 05 00 00\""
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode one packet and write a JSON report.
    #[command(alias = "parse")]
    #[command(
        after_help = "Examples:\n  wialon decode packet.hex -o report.json\n  wialon parse 'captures/login*.hex' --stdout"
    )]
    Decode {
        /// Path to a hex dump or binary capture (a glob matching one file is accepted)
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Input encoding
        #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
        format: FormatArg,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Emit only the flattened records array
        #[arg(long)]
        records_only: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if the CRC check failed
        #[arg(long)]
        strict: bool,
    },
    /// Print the acknowledgment bytes for a response code and sequence.
    Ack {
        /// Response code (0 registered, 1 auth error, 2 bad password, 3 not registered, 4 CRC error, 255 device command)
        code: u8,
        /// Packet sequence number being acknowledged
        sequence: u16,
    },
    /// Print the CRC-16/ARC of a hex string.
    Crc {
        /// Hex bytes; separators are ignored
        hex: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Auto,
    Hex,
    Bin,
}

impl From<FormatArg> for InputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Auto => InputFormat::Auto,
            FormatArg::Hex => InputFormat::Hex,
            FormatArg::Bin => InputFormat::Binary,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Decode {
            input,
            report,
            stdout,
            format,
            pretty,
            compact,
            records_only,
            quiet,
            strict,
        } => cmd_decode(DecodeArgs {
            input,
            report,
            stdout,
            format: format.into(),
            pretty,
            compact,
            records_only,
            quiet,
            strict,
        }),
        Commands::Ack { code, sequence } => cmd_ack(code, sequence),
        Commands::Crc { hex } => cmd_crc(&hex),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

struct DecodeArgs {
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    format: InputFormat,
    pretty: bool,
    compact: bool,
    records_only: bool,
    quiet: bool,
    strict: bool,
}

fn cmd_decode(args: DecodeArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;

    let report_path = if args.stdout {
        None
    } else {
        let path = args.report.clone().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        ensure_distinct_paths(&resolved_input, &path)?;
        Some(path)
    };

    debug!("decoding {}", resolved_input.display());
    let rep = wialon_core::decode_file(&resolved_input, args.format)
        .context("packet decoding failed")?;
    info!(
        "decoded packet seq {} with {} records",
        rep.packet.sequence, rep.summary.records_total
    );
    let json = serialize_report(&rep, args.pretty, args.compact, args.records_only)?;

    match report_path {
        None => print!("{}", json),
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&path, json)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            if !args.quiet {
                eprintln!("OK: report written -> {}", path.display());
            }
        }
    }

    if !args.quiet && !rep.summary.crc_valid {
        if let Some(crc) = rep.packet.crc {
            eprintln!(
                "warning: CRC mismatch (received 0x{:04x}, calculated 0x{:04x})",
                crc.received, crc.calculated
            );
        }
    }
    if args.strict && !rep.summary.crc_valid {
        return Err(CliError::new(
            "CRC check failed",
            Some(format!(
                "acknowledgment would be code {} ({})",
                rep.packet.response.code, rep.packet.response.description
            )),
        ));
    }
    Ok(())
}

fn cmd_ack(code: u8, sequence: u16) -> Result<(), CliError> {
    let response = wialon_core::build_response(code, sequence);
    println!(
        "{} {}",
        hex::encode(response.raw_bytes),
        response.description
    );
    Ok(())
}

fn cmd_crc(input: &str) -> Result<(), CliError> {
    let bytes = wialon_core::parse_hex_dump(input).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("pass an even number of hex digits".to_string()),
        )
    })?;
    println!("0x{:04X}", wialon_core::crc16(&bytes));
    Ok(())
}

fn serialize_report(
    rep: &DecodeReport,
    pretty: bool,
    compact: bool,
    records_only: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    let value = if records_only {
        serde_json::to_value(&rep.packet.records)
    } else {
        serde_json::to_value(rep)
    }
    .context("JSON serialization failed")?;
    let json = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    json.context("JSON serialization failed").map_err(Into::into)
}

fn ensure_distinct_paths(input: &Path, report: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let report_dir = match report.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // The output directory may not exist yet; then it cannot hold the input.
    let Ok(report_dir) = fs::canonicalize(report_dir) else {
        return Ok(());
    };
    let file_name = report
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("report path must differ from input: {}", report.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a hex dump (.hex, .dat, .txt) or binary capture (.bin)".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a single capture file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single packet file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
