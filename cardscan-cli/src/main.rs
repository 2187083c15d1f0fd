use anyhow::{Context, Result, bail};
use cardscan_core::{ScanConfig, StatementAnalysisResult, format_grouped, today_in};
use cardscan_ingest::{
    DocumentAnalysis, DocumentAnalyzer, PageAnalyzer, PageImage, RowClustering, rows_to_text, usable_elements,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod recognizer;
mod state;

use recognizer::{JsonDumpRecognizer, read_dump};

#[derive(Parser, Debug)]
#[command(name = "cardscan", version, about = "Extract card statement transactions from OCR output")]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: $CARDSCAN_HOME/config.toml, else ~/.cardscan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a statement: one OCR JSON dump per page, in page order
    Analyze {
        #[arg(required = true)]
        pages: Vec<PathBuf>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Statement date (YYYY-MM-DD) when the pages don't show it
        #[arg(long)]
        reference_date: Option<NaiveDate>,

        /// Override the configured billing currency
        #[arg(long)]
        home_currency: Option<String>,
    },

    /// Print the reconstructed rows of one page dump
    Rows {
        page: PathBuf,
    },

    /// Config file management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config to ~/.cardscan/config.toml
    Init,

    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();

    match cli.command {
        Command::Analyze {
            pages,
            json,
            reference_date,
            home_currency,
        } => {
            let mut cfg = config::load_config(cli.config.as_deref())?;
            if let Some(code) = home_currency {
                cfg.home_currency = code.to_uppercase();
                cfg.validate()?;
            }
            let doc = analyze(&cfg, pages, reference_date).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&doc).context("serialize result")?);
            } else {
                print_document(&doc);
            }
        }

        Command::Rows { page } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let observations = read_dump(&page)
                .await
                .with_context(|| format!("reading {}", page.display()))?;
            let elements = usable_elements(0, &observations);
            let rows = RowClustering::new(cfg.row_threshold_factor).reconstruct(&elements);
            println!("{}", rows_to_text(&rows));
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config(cli.config.as_deref())?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

async fn analyze(cfg: &ScanConfig, pages: Vec<PathBuf>, reference: Option<NaiveDate>) -> Result<DocumentAnalysis> {
    for p in &pages {
        if !p.exists() {
            bail!("page dump not found: {}", p.display());
        }
    }

    let today = today_in(&cfg.timezone)?;
    let analyzer = PageAnalyzer::new(cfg, today).with_reference(reference);
    let images: Vec<PageImage> = pages
        .into_iter()
        .enumerate()
        .map(|(index, path)| PageImage {
            index,
            path,
            languages: cfg.languages.clone(),
        })
        .collect();

    debug!(pages = images.len(), %today, reference = ?reference, "starting analysis");
    let doc = DocumentAnalyzer::new(JsonDumpRecognizer, analyzer)
        .analyze(&images)
        .await
        .context("analyzing statement")?;
    Ok(doc)
}

fn print_document(doc: &DocumentAnalysis) {
    let combined = &doc.combined;
    println!(
        "Card: {} {}",
        if combined.card_name.is_empty() { "(unknown)" } else { combined.card_name.as_str() },
        if combined.card_last_four.is_empty() {
            String::new()
        } else {
            format!("ending {}", combined.card_last_four)
        }
    );
    match doc.reference_date {
        Some(d) => println!("Statement date: {d}"),
        None => println!("Statement date: (not found; years assume today)"),
    }

    for (i, count) in doc.page_transaction_counts().iter().enumerate() {
        println!("Page {}: {} transactions", i + 1, count);
    }
    println!();

    print_transactions(combined);

    println!("\nTotals by billing currency:");
    for (currency, total) in combined.totals_by_billing_currency() {
        let sign = if total < 0.0 { "-" } else { "" };
        println!("  {currency} {sign}{}", format_grouped(total, 2));
    }
    let fees = combined.total_cbf_fees();
    if fees > 0.0 {
        println!("  cross-border fees {}", format_grouped(fees, 2));
    }
}

fn print_transactions(result: &StatementAnalysisResult) {
    for t in &result.transactions {
        let date = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
        let foreign = match (&t.spending_currency, t.spending_amount) {
            (Some(c), Some(a)) => format!(" [{c} {}]", format_grouped(a, 2)),
            _ => String::new(),
        };
        let fee = t
            .cbf_fee
            .map(|f| format!(" +cbf {}", format_grouped(f, 2)))
            .unwrap_or_default();
        let method = t.payment_method.map(|m| m.as_str()).unwrap_or("-");
        println!(
            "{} {} | {:<32} | {:>12} {}{}{} | {}",
            date(t.post_date),
            date(t.trans_date),
            t.description,
            format!("{}{}", if t.is_credit() { "-" } else { "" }, format_grouped(t.billing_amount, 2)),
            t.billing_currency,
            foreign,
            fee,
            method
        );
    }
}
