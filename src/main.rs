use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Parser;

mod error;
mod loader;
mod logging;
mod models;
mod pipeline;
mod report;
mod validate;
mod window;
mod writer;

use pipeline::RunConfig;

#[derive(Parser)]
#[command(name = "recent-customers")]
#[command(
    about = "Keep customers who signed up within the last year and write them to proc__<input>",
    long_about = None
)]
struct Cli {
    /// Input CSV file. Prompted for on stdin when omitted.
    input: Option<PathBuf>,
    /// Directory the output file is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
    /// Reference date for the one-year window (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init_logging(&cli.log_dir)?;

    let input = match cli.input {
        Some(path) => path,
        None => prompt_for_input(io::stdin().lock(), io::stdout())?,
    };
    let config = RunConfig {
        input,
        output_dir: cli.output_dir,
        reference_date: cli.as_of.unwrap_or_else(window::today),
    };

    let summary = match pipeline::run(&config) {
        Ok(summary) => summary,
        Err(err) => {
            tracing::error!(error = %err, "failed to process the CSV file");
            return Err(err)
                .with_context(|| format!("failed to process {}", config.input.display()));
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report::summary_json(&summary))?);
    } else {
        print!("{}", report::build_summary(&summary));
    }

    Ok(())
}

fn prompt_for_input(mut reader: impl BufRead, mut out: impl Write) -> anyhow::Result<PathBuf> {
    write!(out, "Enter the path to the input CSV file: ")?;
    out.flush()?;

    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("failed to read input path from stdin")?;

    let path = line.trim();
    if path.is_empty() {
        bail!("no input file given");
    }
    Ok(PathBuf::from(path))
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, validate::SIGNUP_DATE_FORMAT)
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "recent-customers",
            "customers.csv",
            "--as-of",
            "2026-02-28",
            "--output-dir",
            "out",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.input, Some(PathBuf::from("customers.csv")));
        assert_eq!(cli.as_of, NaiveDate::from_ymd_opt(2026, 2, 28));
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert!(cli.json);
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["recent-customers"]).unwrap();
        assert!(cli.input.is_none());
        assert!(cli.as_of.is_none());
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(cli.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn cli_rejects_bad_reference_date() {
        assert!(Cli::try_parse_from(["recent-customers", "--as-of", "19/10/2026"]).is_err());
    }

    #[test]
    fn prompt_reads_the_answered_path() {
        let mut out = Vec::new();
        let path = prompt_for_input(&b"  data/customers.csv \n"[..], &mut out).unwrap();

        assert_eq!(path, PathBuf::from("data/customers.csv"));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Enter the path to the input CSV file: "
        );
    }

    #[test]
    fn prompt_rejects_empty_answer() {
        let err = prompt_for_input(&b"\n"[..], Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "no input file given");
        assert!(prompt_for_input(&b""[..], Vec::new()).is_err());
    }

    #[test]
    fn prompt_rejects_whitespace_only_answer() {
        assert!(prompt_for_input(&b" \t \n"[..], Vec::new()).is_err());
    }
}
