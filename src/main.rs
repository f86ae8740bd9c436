#![deny(clippy::all)]
#![forbid(unsafe_code)]

use std::fs::File;
use std::io::prelude::*;
use std::path::PathBuf;
use std::str::FromStr;

use log::{info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use structopt::StructOpt;

use atis_runways::error::{Error, Result};
use atis_runways::parse_atis_detailed;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Summary,
    Records,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "summary" => Ok(OutputFormat::Summary),
            "records" => Ok(OutputFormat::Records),
            other => Err(format!("unknown format {:?}", other)),
        }
    }
}

/// Extract active runways and approach types from an ATIS broadcast.
#[derive(StructOpt)]
struct Args {
    /// File holding the ATIS text; read from stdin when omitted
    #[structopt(name = "input", parse(from_os_str))]
    input: Option<PathBuf>,
    /// Output format: json, summary or records
    #[structopt(
        short = "f",
        long = "format",
        default_value = "json",
        possible_values = &["json", "summary", "records"],
        case_insensitive = true
    )]
    format: OutputFormat,
    /// Refuse ATIS text longer than this many bytes
    #[structopt(long = "max-bytes", default_value = "8192")]
    max_bytes: usize,
    /// Include confidence, match sources and warnings in JSON output
    #[structopt(short = "d", long = "diagnostics")]
    diagnostics: bool,
    /// More log output (-v, -vv, -vvv)
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: u8,
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    let mut buf = Vec::new();
    match input {
        Some(path) => {
            File::open(path)?.read_to_end(&mut buf)?;
        }
        None => {
            std::io::stdin().read_to_end(&mut buf)?;
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn main() -> Result<()> {
    let args = Args::from_args();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // Only fails if a logger is already installed.
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);

    let text = read_input(args.input.as_ref())?;
    if text.len() > args.max_bytes {
        return Err(Error::InputTooLarge {
            len: text.len(),
            max: args.max_bytes,
        });
    }
    info!("Parsing {} bytes of ATIS text...", text.len());

    let detailed = parse_atis_detailed(&text);
    for warning in &detailed.diagnostics.warnings {
        warn!("{}", warning);
    }
    info!("Confidence {}%", detailed.diagnostics.confidence);

    let result = &detailed.result;
    let out = match args.format {
        OutputFormat::Json if args.diagnostics => serde_json::to_string_pretty(&detailed)?,
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Summary => result.summary(),
        OutputFormat::Records => result.records_json()?,
    };

    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    writeln!(stdout, "{}", out)?;
    Ok(())
}
