use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Deserialize;

use accolade_core::{Engine, PersonIdentity, PersonRecord};

#[derive(Parser)]
#[command(
    name = "accolade-admin",
    about = "Admin helpers for accolade country and position rules"
)]
struct Cli {
    /// Directory holding accolade.toml and the rules/ folder
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the canonical country for each value, one per line
    Normalize {
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Country picker rows for a newline-separated file of raw values
    Countries {
        #[arg(long)]
        input: PathBuf,
    },
    /// Forward/reverse normalization report for a newline-separated file
    Report {
        #[arg(long)]
        input: PathBuf,
        /// Also append the report to the configured logbook
        #[arg(long)]
        log: bool,
    },
    /// Top countries from a JSON array of {"country", "count"} rows
    Tally {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Position for one award category
    Classify {
        #[arg(long)]
        category: String,
        #[arg(long = "known")]
        known: Vec<String>,
        #[arg(long, requires = "last")]
        first: Option<String>,
        #[arg(long, requires = "first")]
        last: Option<String>,
    },
    /// Categories a position may be nominated in (file: one category per line)
    Eligible {
        #[arg(long)]
        position: String,
        #[arg(long)]
        categories: PathBuf,
    },
    /// Per-position rows from a person JSON object, or winner rows from an array
    Stats {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        position: Option<String>,
    },
    /// Write accolade.toml, the rule tables and the logbook folder under --root
    Init,
    /// Seed the default rule tables into a directory
    InitRules {
        #[arg(long)]
        dir: PathBuf,
    },
}

#[derive(Deserialize)]
struct TallyRow {
    country: String,
    count: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatsInput {
    One(PersonRecord),
    Many(Vec<PersonRecord>),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = cli.root;
    let open = || {
        Engine::open(&root).with_context(|| format!("open engine at {}", root.display()))
    };

    match cli.cmd {
        Cmd::Normalize { values } => {
            let engine = open()?;
            for v in values {
                println!("{}", engine.normalize_country(&v));
            }
            Ok(())
        }
        Cmd::Countries { input } => {
            let raws = read_lines(&input)?;
            print_json(&open()?.catalog(&raws))
        }
        Cmd::Report { input, log } => {
            let engine = open()?;
            let raws = read_lines(&input)?;
            let report = engine.normalization_report(&raws);
            if log {
                let id = engine.log_report(&report)?;
                eprintln!("logged {id} to {}", engine.config().logbook.path.display());
            }
            print_json(&report)
        }
        Cmd::Tally { input, limit } => {
            let rows: Vec<TallyRow> = read_json(&input)?;
            let tally = open()?.country_tally(rows.into_iter().map(|r| (r.country, r.count)), limit);
            print_json(&tally)
        }
        Cmd::Classify {
            category,
            known,
            first,
            last,
        } => {
            let person = match (first, last) {
                (Some(f), Some(l)) => Some(PersonIdentity::new(f, l)),
                _ => None,
            };
            print_json(&open()?.classify_traced(&category, &known, person.as_ref()))
        }
        Cmd::Eligible {
            position,
            categories,
        } => {
            let all = read_lines(&categories)?;
            print_json(&open()?.eligible_categories(&position, &all))
        }
        Cmd::Stats { input, position } => {
            let engine = open()?;
            match read_json::<StatsInput>(&input)? {
                StatsInput::One(person) => {
                    print_json(&engine.person_stats(&person, position.as_deref()))
                }
                StatsInput::Many(people) => {
                    anyhow::ensure!(
                        position.is_none(),
                        "--position applies to a single person, not an array"
                    );
                    print_json(&engine.winner_rows(&people))
                }
            }
        }
        Cmd::Init => init(&root),
        Cmd::InitRules { dir } => init_rules(&dir),
    }
}

fn init(root: &Path) -> Result<()> {
    let report = accolade_core::ensure_initialized(root)?;
    print_json(&serde_json::json!({
        "t": Utc::now().to_rfc3339(),
        "op": "INIT",
        "root": report.root.display().to_string(),
        "created": report.created,
        "existed": report.existed,
    }))
}

fn init_rules(dir: &Path) -> Result<()> {
    let created = rulebook::write_default_rules(dir)
        .with_context(|| format!("seed rules into {}", dir.display()))?;
    print_json(&serde_json::json!({
        "t": Utc::now().to_rfc3339(),
        "op": "SEED",
        "dir": dir.display().to_string(),
        "created": created,
    }))
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(text.lines().map(str::to_string).collect())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse JSON {}", path.display()))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
