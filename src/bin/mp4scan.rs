use anyhow::Context;
use clap::{ArgAction, Parser};
use mp4scan::{ScanOptions, TextReport, Walker, analyze};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about = "Print the box tree of an MP4/ISOBMFF file")]
struct Args {
    /// MP4/ISOBMFF file path
    path: String,

    /// Limit container nesting; deeper boxes are reported as a warning
    #[arg(long, default_value_t = mp4scan::walker::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Emit JSON instead of human-readable tree
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Exit with status 2 if any structural warning was reported
    #[arg(long, action = ArgAction::SetTrue)]
    strict: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let f = File::open(&args.path).with_context(|| format!("failed to open {}", args.path))?;
    let options = ScanOptions::default().with_max_depth(args.max_depth);

    let warnings = if args.json {
        let analysis = analyze(BufReader::new(f), options)?;
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        analysis.summary.warnings
    } else {
        let stdout = io::stdout();
        let mut report = TextReport::new(BufWriter::new(stdout.lock()));
        let summary = Walker::new()
            .with_options(options)
            .scan(BufReader::new(f), &mut report)?;
        summary.warnings
    };

    if args.strict && warnings > 0 {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}
