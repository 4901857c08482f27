//! # Tramo CLI
//!
//! Command-line front end for the metalwork BOM calculator.
//!
//! ## Usage
//!
//! ```bash
//! # List the job types
//! tramo types
//!
//! # Bill of materials for a 1.2 m × 1.0 m window
//! tramo calc ventana --width 1.2 --height 1.0
//!
//! # Priced quote, saved to a folder
//! tramo quote porton --width 3 --height 2 --name "Portón Bodega" --store ~/cotizaciones
//!
//! # Saved quotes, newest first
//! tramo history --store ~/cotizaciones
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tramo_core::calculations::CalculationResult;
use tramo_core::quote::{CalculationRequest, PricedQuote, Quote, QuoteSummary};
use tramo_core::store::{DirectoryStore, QuoteStore, DEFAULT_USER};
use tramo_core::work_types::catalog_by_family;
use tramo_core::{calculate, default_config, CalculationConfig, WorkType};

/// Tramo - bill of materials and quotes for metalwork jobs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List job types grouped by family
    Types,

    /// Calculate the bill of materials for one job
    Calc {
        #[command(flatten)]
        job: JobArgs,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a priced quote with auto-assigned catalog materials
    Quote {
        #[command(flatten)]
        job: JobArgs,

        /// Project name shown on the quote
        #[arg(long)]
        name: String,

        /// Client name
        #[arg(long, default_value = "")]
        client: String,

        /// Save the quote into this directory
        #[arg(long)]
        store: Option<PathBuf>,

        /// Name recorded in the lock file while saving
        #[arg(long, default_value = DEFAULT_USER)]
        user: String,

        /// Print the priced quote as JSON
        #[arg(long)]
        json: bool,
    },

    /// List saved quotes, newest first
    History {
        /// Directory the quotes were saved in
        #[arg(long)]
        store: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct JobArgs {
    /// Job type id (e.g. ventana, cerca, escalera_recta)
    work_type: WorkType,

    /// Width, or run length for fences and railings (m)
    #[arg(long)]
    width: f64,

    /// Height, or total rise for stairs (m)
    #[arg(long)]
    height: f64,

    /// Configuration overrides as JSON (defaults for the job type otherwise)
    #[arg(long)]
    config: Option<String>,
}

impl JobArgs {
    fn request(&self) -> anyhow::Result<CalculationRequest> {
        let config = match &self.config {
            Some(json) => serde_json::from_str::<CalculationConfig>(json)
                .context("Failed to parse --config as JSON")?,
            None => default_config(self.work_type),
        };
        Ok(CalculationRequest::new(self.work_type, self.width, self.height, config))
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let stdout = std::io::stdout();
    run(args.command, &mut stdout.lock())
}

fn run(command: Command, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::Types => print_types(out)?,
        Command::Calc { job, json } => {
            let request = job.request()?;
            let result = calculate(request.work_type, request.width_m, request.height_m, &request.config);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
            } else {
                print_result(out, &result)?;
            }
        }
        Command::Quote {
            job,
            name,
            client,
            store,
            user,
            json,
        } => {
            let (quote, priced) = build_quote(job.request()?, name, client)?;

            if let Some(dir) = store {
                let store = DirectoryStore::open(&dir)
                    .with_context(|| format!("Failed to open quote store {}", dir.display()))?
                    .with_user(user);
                store.save(&quote).context("Failed to save quote")?;
                debug!(path = %store.path_for(&quote.id).display(), "quote stored");
            }

            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&priced)?)?;
            } else {
                print_quote(out, &quote, &priced)?;
            }
        }
        Command::History { store } => {
            let store = DirectoryStore::open(&store)
                .with_context(|| format!("Failed to open quote store {}", store.display()))?;
            let summaries = store.list().context("Failed to list quotes")?;
            print_history(out, &summaries)?;
        }
    }

    Ok(())
}

/// Calculate, auto-assign and price a new quote.
fn build_quote(request: CalculationRequest, name: String, client: String) -> anyhow::Result<(Quote, PricedQuote)> {
    let mut quote = Quote::new(name, client, request);
    let result = quote.calculate();
    if !result.is_usable() {
        bail!("{}", result.description);
    }
    quote.auto_assign(&result);
    let priced = quote.price();
    Ok((quote, priced))
}

fn print_types(out: &mut impl Write) -> std::io::Result<()> {
    for (family, types) in catalog_by_family() {
        writeln!(out, "{}", family.label())?;
        for meta in types {
            writeln!(out, "  {:<22} {:<24} {}", meta.id.id(), meta.label, meta.description)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn print_result(out: &mut impl Write, result: &CalculationResult) -> std::io::Result<()> {
    writeln!(out, "{}", result.description)?;
    writeln!(out, "{}", "─".repeat(78))?;
    if !result.is_usable() {
        return Ok(());
    }
    writeln!(
        out,
        "{:<36} {:>9} {:>7} {:>9}  {}",
        "Concepto", "Metros", "Tramos", "Sobrante", "Material"
    )?;
    for line in &result.lines {
        if line.is_piece {
            writeln!(
                out,
                "{:<36} {:>9} {:>7} {:>9}  {}",
                line.concept,
                format!("{} pza", line.pieces),
                "",
                "",
                line.suggested_material
            )?;
        } else {
            writeln!(
                out,
                "{:<36} {:>9.3} {:>7} {:>9.3}  {}",
                line.concept, line.length_m, line.stock_lengths, line.leftover_m, line.suggested_material
            )?;
        }
    }
    writeln!(out, "{}", "─".repeat(78))?;
    writeln!(
        out,
        "Total: {:.3} m en {} tramos de 6 m (desperdicio {}%)",
        result.total_length_m, result.total_stock_lengths, result.waste_pct
    )
}

fn print_quote(out: &mut impl Write, quote: &Quote, priced: &PricedQuote) -> std::io::Result<()> {
    writeln!(out, "Cotización {}  {}", quote.meta.folio, quote.meta.project_name)?;
    if !quote.meta.client.is_empty() {
        writeln!(out, "Cliente: {}", quote.meta.client)?;
    }
    writeln!(out, "{}", priced.result.description)?;
    writeln!(out, "{}", "─".repeat(78))?;
    for line in &priced.lines {
        let material = line.material_name.as_deref().unwrap_or("(sin asignar)");
        writeln!(
            out,
            "{:<32} {:<26} {:>5} × {:>9.2} = {:>10.2}",
            line.concept, material, line.quantity, line.unit_price, line.total
        )?;
    }
    for extra in &priced.extras {
        writeln!(
            out,
            "{:<32} {:<26} {:>5} × {:>9.2} = {:>10.2}",
            "Extra", extra.material_name, extra.quantity, extra.unit_price, extra.total
        )?;
    }
    writeln!(out, "{}", "─".repeat(78))?;
    let rows = [
        ("Materiales", priced.materials_subtotal),
        ("Mano de obra", priced.labor),
        ("Total (antes de IVA)", priced.grand_total),
    ];
    for (label, amount) in rows {
        writeln!(out, "{:>66} {:>10.2} {}", label, amount, priced.currency)?;
    }
    Ok(())
}

fn print_history(out: &mut impl Write, summaries: &[QuoteSummary]) -> std::io::Result<()> {
    if summaries.is_empty() {
        writeln!(out, "Sin cotizaciones guardadas.")?;
    }
    for summary in summaries {
        writeln!(
            out,
            "{}  {:<16} {:<28} {:<22} {:>12.2}",
            summary.modified.format("%Y-%m-%d %H:%M"),
            summary.folio,
            summary.project_name,
            summary.work_type.label(),
            summary.grand_total
        )?;
    }
    Ok(())
}
