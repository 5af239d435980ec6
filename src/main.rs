//! divider-calc - pick voltage divider resistors from the parts you have.
//!
//! # Usage
//!
//! ```bash
//! divider-calc --config resistors.ini --vin 5 --vout 3
//! divider-calc --series e12 --vin 12 --vout 3.3 --max-current 1
//! ```
//!
//! Voltages that are not given as flags are asked for interactively.

extern crate divider_calc;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use tracing::Level;

use divider_calc::config::{load_resistors, DEFAULT_CONFIG_FILE};
use divider_calc::report::Report;
use divider_calc::*;

/// Voltage divider calculator for the resistors you own
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// INI file with a [Resistors] section listing values in kΩ
    #[arg(short, long, value_name = "FILE", conflicts_with = "series")]
    config: Option<PathBuf>,

    /// Use every value of a standard series instead of a configuration file
    #[arg(short, long, value_enum)]
    series: Option<Series>,

    /// Input voltage in volts
    #[arg(long)]
    vin: Option<f64>,

    /// Desired output voltage in volts
    #[arg(long)]
    vout: Option<f64>,

    /// Maximum current through the divider in mA
    #[arg(long, value_name = "MA")]
    max_current: Option<f64>,

    /// Relative tolerance in percent for treating a suggested value as owned
    #[arg(long, value_name = "PERCENT", default_value_t = DEFAULT_OWNED_TOLERANCE * 100.0)]
    tolerance: f64,

    /// Standard series to pick purchase hints for suggested values from
    #[arg(long, value_enum)]
    buy_series: Option<Series>,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Series {
    E3,
    E6,
    E12,
    E24,
}

impl Series {
    fn values(self) -> &'static RSeries {
        match self {
            Series::E3 => &E3,
            Series::E6 => &E6,
            Series::E12 => &E12,
            Series::E24 => &E24,
        }
    }
}

/// The voltages of one query, collected from flags or prompts.
struct Query {
    vin: f64,
    vout: f64,
    max_current: Option<f64>,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(&args) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let resistors = match args.series {
        Some(series) => ResistorSet::from_series(series.values()),
        None => load_resistors(
            args.config
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        )?,
    };
    if resistors.is_empty() {
        return Err(DividerError::NoResistorsAvailable);
    }

    let interactive = args.vin.is_none() || args.vout.is_none();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut retry = false;

    loop {
        let query = if interactive {
            ask_query(&mut input, args, retry)?
        } else {
            Query {
                vin: args.vin.unwrap_or_default(),
                vout: args.vout.unwrap_or_default(),
                max_current: args.max_current,
            }
        };

        if query.vin > ADC_SAFE_VOLTAGE {
            println!(
                "Warning: Input voltage exceeds {}V, which is unsafe for a typical ADC input.",
                ADC_SAFE_VOLTAGE
            );
        }

        let mut calc = DividerCalc::new(&resistors).with_tolerance(args.tolerance / 100.0);
        if let Some(max_ma) = query.max_current {
            calc = calc.with_max_current(max_ma);
        }

        match calc.solve(query.vin, query.vout) {
            Ok(solution) => {
                let report = Report::new(&solution);
                let report = match args.buy_series {
                    Some(series) => report.with_buy_series(series.values()),
                    None => report,
                };
                println!();
                print!("{}", report);
                return Ok(());
            }
            Err(err) if interactive && err.is_query_input() => {
                println!("Error: {}", err);
                retry = true;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Asks for whatever the flags left out. After a rejected query every value is asked for again,
/// since a flag may have been the bad one.
fn ask_query(input: &mut impl BufRead, args: &Args, retry: bool) -> Result<Query> {
    let flag = |value: Option<f64>| if retry { None } else { value };
    let vin = match flag(args.vin) {
        Some(vin) => vin,
        None => ask(input, "Enter input voltage (V): ")?,
    };
    let vout = match flag(args.vout) {
        Some(vout) => vout,
        None => ask(input, "Enter desired output voltage (V): ")?,
    };
    let max_current = match flag(args.max_current) {
        Some(max) => Some(max),
        None => ask_optional(input, "Enter maximum allowed current in mA (blank for none): ")?,
    };
    Ok(Query {
        vin,
        vout,
        max_current,
    })
}

fn ask<T: FromStr>(input: &mut impl BufRead, prompt: &str) -> Result<T> {
    loop {
        if let Some(value) = ask_optional(input, prompt)? {
            return Ok(value);
        }
    }
}

/// Prompts until the answer parses or is blank.
fn ask_optional<T: FromStr>(input: &mut impl BufRead, prompt: &str) -> Result<Option<T>> {
    loop {
        print!("{}", prompt);
        io::stdout()
            .flush()
            .map_err(|source| DividerError::Prompt { source })?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|source| DividerError::Prompt { source })?;
        if read == 0 {
            return Err(DividerError::Prompt {
                source: io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"),
            });
        }

        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        match line.parse::<T>() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => println!("Please enter a valid number."),
        }
    }
}
