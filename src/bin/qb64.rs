/// qb64 - command-line front end for the quartile-offset codec.
///
///   qb64 file.bin             → encode to stdout
///   qb64 -d file.txt          → decode to stdout
///   qb64 -p -t 8 file.bin     → encode on up to 8 (+1) workers
///   cat file | qb64 | qb64 -d → round trip through stdin
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use qb64::parallel::{self, ParallelOptions};

#[derive(Parser, Debug)]
#[command(
    name = "qb64",
    version,
    about = "Quartile-offset binary-to-text encoder/decoder"
)]
struct Cli {
    /// Decode instead of encode
    #[arg(short = 'd', long = "decode")]
    decode: bool,

    /// Split the input into chunks and code them on worker threads
    #[arg(short = 'p', long = "parallel")]
    parallel: bool,

    /// Concurrency budget for --parallel (0 = auto)
    #[arg(short = 't', long = "threads", default_value_t = 0)]
    threads: usize,

    /// Multiple of available cores used as the budget when --threads is 0
    #[arg(long = "scale", default_value_t = parallel::DEFAULT_SCALE)]
    scale: usize,

    /// Deadline for --parallel, in milliseconds
    #[arg(long = "timeout-ms", default_value_t = 1000)]
    timeout_ms: u64,

    /// Write to FILE instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Input file (stdin if omitted)
    file: Option<PathBuf>,
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(p) => fs::read(p).with_context(|| format!("read {}", p.display())),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("read stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(p) => fs::write(p, data).with_context(|| format!("write {}", p.display())),
        None => {
            let mut out = io::stdout().lock();
            out.write_all(data).context("write stdout")?;
            out.flush().context("flush stdout")
        }
    }
}

fn encode(cli: &Cli, input: &[u8]) -> Result<Vec<u8>> {
    let mut text = if cli.parallel {
        let options = options(cli);
        let deadline = Duration::from_millis(cli.timeout_ms);
        let chunks = parallel::encode_parallel_with_options(input, deadline, &options)
            .context("parallel encode")?;
        parallel::flatten_text(&chunks)
    } else {
        qb64::encode(input)
    };
    text.push('\n');
    Ok(text.into_bytes())
}

fn decode(cli: &Cli, input: &[u8]) -> Result<Vec<u8>> {
    let text =
        std::str::from_utf8(input.trim_ascii_end()).context("encoded input is not UTF-8")?;
    if cli.parallel {
        let options = options(cli);
        let deadline = Duration::from_millis(cli.timeout_ms);
        let chunks = parallel::decode_parallel_with_options(text, deadline, &options)
            .context("parallel decode")?;
        Ok(parallel::flatten(&chunks))
    } else {
        qb64::decode(text).context("decode")
    }
}

fn options(cli: &Cli) -> ParallelOptions {
    ParallelOptions {
        threads: cli.threads,
        scale: cli.scale,
    }
}

fn run(cli: &Cli) -> Result<()> {
    let input = read_input(cli.file.as_ref())?;
    let started = Instant::now();

    let output = if cli.decode {
        decode(cli, &input)?
    } else {
        encode(cli, &input)?
    };

    let mode = if cli.decode { "decode" } else { "encode" };
    debug!(
        mode,
        parallel = cli.parallel,
        input_len = input.len(),
        output_len = output.len(),
        elapsed = ?started.elapsed(),
        "done"
    );

    write_output(cli.output.as_ref(), &output)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("qb64: {e:#}");
            ExitCode::FAILURE
        }
    }
}
