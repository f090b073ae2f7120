use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser as CliParser, Subcommand};
use serde::Serialize;
use tracing::info;

use zipode::config::Settings;
use zipode::parser::legacy::Transcript;
use zipode::parser::Parser;
use zipode::prompt::{self, CustomPoemSettings, ProcessingMode};
use zipode::record::StructuredRecord;
use zipode::{batch, derive_filename, validate, NameParts};

#[derive(CliParser)]
#[command(name = "zipode", about = "Parse and validate zip ode transcription reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one model report and print it as JSON
    Parse {
        /// Report file (stdin when omitted or "-")
        file: Option<PathBuf>,
        /// How the report was requested (default: ZIPODE_MODE or zip-ode)
        #[arg(short, long, value_enum)]
        mode: Option<ProcessingMode>,
        /// Name to use when the report has no usable fields
        #[arg(long)]
        fallback: Option<String>,
    },
    /// Check poem lines (one per line) against a postal code
    Validate {
        zip: String,
        /// Poem file (stdin when omitted or "-")
        file: Option<PathBuf>,
    },
    /// Derive a filename from report fields
    Name {
        #[arg(long, default_value = "")]
        school: String,
        #[arg(long, default_value = "")]
        student: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        theme: String,
        #[arg(long, default_value = "")]
        zip: String,
        #[arg(long)]
        fallback: Option<String>,
    },
    /// Parse every .txt/.md report in a directory
    Batch {
        dir: PathBuf,
        /// Print the full JSON report instead of a summary table
        #[arg(long)]
        json: bool,
    },
    /// Print the instruction text given to the transcription model
    Prompt {
        #[arg(short, long, value_enum)]
        mode: Option<ProcessingMode>,
        /// JSON file with custom poem settings
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct ParsedReport {
    filename: String,
    #[serde(flatten)]
    record: StructuredRecord,
}

#[derive(Serialize)]
struct ParsedTranscript {
    filename: String,
    #[serde(flatten)]
    transcript: Transcript,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::from_env().context("loading ZIPODE_* settings")?;
    let parser = Parser::new();

    match cli.command {
        Commands::Parse {
            file,
            mode,
            fallback,
        } => {
            let raw = read_input(file.as_deref())?;
            let fallback = fallback.unwrap_or_else(|| settings.fallback_name.clone());
            match mode.unwrap_or(settings.mode) {
                ProcessingMode::ZipOde => {
                    let record = parser.parse(&raw);
                    let filename = derive_filename(&record.name_parts(), &fallback);
                    print_json(&ParsedReport { filename, record })?;
                }
                ProcessingMode::Poem | ProcessingMode::Custom => {
                    let transcript = Transcript::from_raw(parser.extractor(), &raw);
                    let filename = derive_filename(&transcript.header.name_parts(), &fallback);
                    print_json(&ParsedTranscript {
                        filename,
                        transcript,
                    })?;
                }
            }
        }
        Commands::Validate { zip, file } => {
            let raw = read_input(file.as_deref())?;
            let lines: Vec<&str> = raw
                .lines()
                .map(str::trim_end)
                .filter(|l| !l.trim().is_empty())
                .collect();
            let result = validate(&zip, lines.as_slice());

            println!(
                "{:>4} | {:>8} | {:>6} | {:<5} | {}",
                "Line", "Expected", "Actual", "OK", "Text"
            );
            println!("{}", "-".repeat(60));
            for row in &result.rows {
                println!(
                    "{:>4} | {:>8} | {:>6} | {:<5} | {}",
                    row.line_number,
                    row.expected_word_count,
                    row.actual_word_count,
                    row.ok,
                    truncate(&row.text, 40)
                );
            }
            println!("\nOverall: {}", result.overall.as_str());
        }
        Commands::Name {
            school,
            student,
            title,
            theme,
            zip,
            fallback,
        } => {
            let parts = NameParts {
                school: &school,
                student: &student,
                title: &title,
                theme: &theme,
                postal_code: &zip,
            };
            let fallback = fallback.unwrap_or_else(|| settings.fallback_name.clone());
            println!("{}", derive_filename(&parts, &fallback));
        }
        Commands::Batch { dir, json } => {
            let report = batch::process_dir(&parser, &dir, &settings.fallback_name)?;
            if json {
                print_json(&report)?;
            } else {
                println!(
                    "{:>3} | {:<28} | {:<8} | {:<8} | {}",
                    "#", "File", "Zip", "Valid", "Saved as"
                );
                println!("{}", "-".repeat(90));
                for (i, e) in report.entries.iter().enumerate() {
                    println!(
                        "{:>3} | {:<28} | {:<8} | {:<8} | {}",
                        i + 1,
                        truncate(&e.filename, 28),
                        e.record.postal_code.or_unknown(),
                        e.record.overall_valid.as_str(),
                        e.saved_as
                    );
                }
                let c = &report.counts;
                println!(
                    "\n{} reports | {} valid, {} invalid, {} unknown | {} disagree with the model",
                    c.total, c.valid, c.invalid, c.unknown, c.mismatched
                );
            }
        }
        Commands::Prompt {
            mode,
            settings: path,
        } => {
            let path = path.or_else(|| settings.custom_settings.clone());
            let custom = match path {
                Some(p) => CustomPoemSettings::load(&p)?,
                None => CustomPoemSettings::default(),
            };
            println!("{}", prompt::prompt_for(mode.unwrap_or(settings.mode), &custom));
        }
    }

    info!("Done in {:.2}s", t0.elapsed().as_secs_f64());
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
