use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::build_report;
use crate::domain::{format_cents, parse_cents, Ledger};
use crate::io::import::parse_date;
use crate::io::{load_fixture, Exporter, ImportOptions};

/// custledger - in-memory customer ledger demo
#[derive(Parser)]
#[command(name = "custledger")]
#[command(about = "Load customers from a JSON fixture and inspect the resulting ledger")]
#[command(version)]
pub struct Cli {
    /// Fixture file used to seed the ledger
    #[arg(short, long, default_value = "fixtures/demo.json", global = true)]
    pub fixture: String,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `report`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print customer summaries with purchases from the last year
    Report {
        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        as_of: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// List customers and balances
    List,

    /// Show one customer in detail
    Show {
        /// Customer ID
        id: String,
    },

    /// Apply a balance adjustment and print the new balance (not persisted)
    Adjust {
        /// Customer ID
        id: String,

        /// Signed amount, e.g. "-30" or "12.50"
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Remove a customer and list who is left (not persisted)
    Remove {
        /// Customer ID
        id: String,
    },

    /// Export the ledger
    Export {
        /// What to export
        #[arg(value_enum)]
        export_type: ExportType,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate the fixture without building a ledger
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportType {
    /// CSV with one row per customer
    Balances,
    /// JSON snapshot of every record
    Full,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.execute(&mut out)
    }

    /// Run the selected command, writing its output to `out`.
    pub fn execute<W: Write>(self, out: &mut W) -> Result<()> {
        let command = self.command.unwrap_or(Commands::Report {
            as_of: None,
            format: ReportFormat::Text,
        });

        let fixture = self.fixture.as_str();

        match command {
            Commands::Report { as_of, format } => {
                let as_of = match as_of {
                    Some(date_str) => parse_date(&date_str).with_context(|| {
                        format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str)
                    })?,
                    None => Local::now().date_naive(),
                };
                let ledger = load_ledger(fixture)?;
                let report = build_report(&ledger, as_of);
                match format {
                    ReportFormat::Text => write!(out, "{}", report.render())?,
                    ReportFormat::Json => {
                        serde_json::to_writer_pretty(&mut *out, &report)?;
                        writeln!(out)?;
                    }
                }
            }

            Commands::List => run_list_command(&load_ledger(fixture)?, out)?,

            Commands::Show { id } => run_show_command(&load_ledger(fixture)?, &id, out)?,

            Commands::Adjust { id, amount } => {
                let delta =
                    parse_cents(&amount).context("Invalid amount format. Use '-30' or '12.50'")?;
                let mut ledger = load_ledger(fixture)?;
                let balance = ledger.adjust_balance(&id, delta)?;
                writeln!(
                    out,
                    "{}: {} -> balance {}",
                    id,
                    format_cents(delta),
                    format_cents(balance)
                )?;
            }

            Commands::Remove { id } => {
                let mut ledger = load_ledger(fixture)?;
                let removed = ledger.remove(&id)?;
                writeln!(out, "Removed {} ({})", removed.name, removed.id)?;
                run_list_command(&ledger, out)?;
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let ledger = load_ledger(fixture)?;
                match output {
                    Some(path) => {
                        let file = File::create(&path)
                            .with_context(|| format!("Cannot create output file '{}'", path))?;
                        let mut writer = BufWriter::new(file);
                        let count = export(&ledger, export_type, &mut writer)?;
                        writeln!(out, "Exported {} customer(s) to {}", count, path)?;
                    }
                    None => {
                        export(&ledger, export_type, &mut *out)?;
                    }
                }
            }

            Commands::Check => run_check_command(fixture, out)?,
        }

        Ok(())
    }
}

fn load_ledger(fixture: &str) -> Result<Ledger> {
    let (ledger, result) = load_fixture(fixture, &ImportOptions::default())
        .with_context(|| format!("Cannot load fixture '{}'", fixture))?;

    for error in &result.errors {
        eprintln!(
            "Skipping entry #{} ({}): {}",
            error.index,
            error.customer.as_deref().unwrap_or("?"),
            error.error
        );
    }

    Ok(ledger)
}

fn export<W: Write>(ledger: &Ledger, export_type: ExportType, writer: W) -> Result<usize> {
    let exporter = Exporter::new(ledger);
    let count = match export_type {
        ExportType::Balances => exporter.export_balances_csv(writer)?,
        ExportType::Full => exporter.export_full_json(writer)?.customers.len(),
    };
    Ok(count)
}

fn run_list_command<W: Write>(ledger: &Ledger, out: &mut W) -> Result<()> {
    if ledger.is_empty() {
        writeln!(out, "No customers found.")?;
        return Ok(());
    }

    writeln!(out, "{:<16} {:<24} {:<4} {:>12}", "ID", "NAME", "TYPE", "BALANCE")?;
    writeln!(out, "{}", "-".repeat(59))?;
    for record in ledger.list() {
        writeln!(
            out,
            "{:<16} {:<24} {:<4} {:>12}",
            record.id,
            record.name,
            record.kind.code(),
            format_cents(record.balance)
        )?;
    }
    writeln!(out, "{}", "-".repeat(59))?;
    writeln!(
        out,
        "{:<16} {:<24} {:<4} {:>12}",
        "TOTAL",
        "",
        "",
        format_cents(ledger.total_balance())
    )?;
    Ok(())
}

fn run_show_command<W: Write>(ledger: &Ledger, id: &str, out: &mut W) -> Result<()> {
    let record = ledger.get(id)?;

    writeln!(out, "ID:       {}", record.id)?;
    writeln!(out, "Name:     {}", record.name)?;
    writeln!(out, "Type:     {:?} ({})", record.kind, record.kind.code())?;
    writeln!(out, "Balance:  {}", format_cents(record.balance))?;
    match record.acquired_on {
        Some(date) => writeln!(out, "Acquired: {}", date)?,
        None => writeln!(out, "Acquired: -")?,
    }

    if record.sales.is_empty() {
        writeln!(out, "Sales:    (none)")?;
    } else {
        writeln!(out, "Sales:")?;
        for sale in &record.sales {
            writeln!(
                out,
                "  {}  {:<40} {:>12}",
                sale.date,
                sale.summary(),
                format_cents(sale.total())
            )?;
        }
    }
    Ok(())
}

fn run_check_command<W: Write>(fixture: &str, out: &mut W) -> Result<()> {
    let options = ImportOptions {
        validate_only: true,
        ..Default::default()
    };
    let (_, result) = load_fixture(fixture, &options)
        .with_context(|| format!("Cannot load fixture '{}'", fixture))?;

    if result.is_clean() {
        writeln!(out, "Fixture OK: {} customer(s)", result.imported)?;
        return Ok(());
    }

    for error in &result.errors {
        writeln!(
            out,
            "  entry #{} ({}): {}",
            error.index,
            error.customer.as_deref().unwrap_or("?"),
            error.error
        )?;
    }
    bail!(
        "Fixture has {} invalid entr{} ({} valid)",
        result.errors.len(),
        if result.errors.len() == 1 { "y" } else { "ies" },
        result.imported
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_report() {
        let cli = Cli::try_parse_from(["custledger"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.fixture, "fixtures/demo.json");
    }

    #[test]
    fn test_adjust_accepts_negative_amount() {
        let cli = Cli::try_parse_from(["custledger", "adjust", "c1", "-30"]).unwrap();
        match cli.command {
            Some(Commands::Adjust { id, amount }) => {
                assert_eq!(id, "c1");
                assert_eq!(amount, "-30");
            }
            _ => panic!("expected adjust"),
        }
    }

    #[test]
    fn test_global_fixture_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["custledger", "list", "--fixture", "other.json"]).unwrap();
        assert_eq!(cli.fixture, "other.json");
    }

    #[test]
    fn test_check_runs_without_loading_ledger() {
        let cli = Cli::try_parse_from(["custledger", "check", "--fixture", "/no/such/fixture.json"])
            .unwrap();
        let mut out = Vec::new();
        let err = cli.execute(&mut out).unwrap_err();
        assert!(err.to_string().contains("Cannot load fixture '/no/such/fixture.json'"));
    }
}
