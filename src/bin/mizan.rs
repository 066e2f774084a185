// ─────────────────────────────────────────────────────────────────────────────
//  Mizan: Net-Flow Explorer
//
//  Mizan (ميزان): "The Balance". Weighs what an address received against
//  what it sent, one counterparty at a time.
// ─────────────────────────────────────────────────────────────────────────────
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use mizan::Explorer;
use mizan::NetFlowEngine;
use mizan::config::Config;
use mizan::config::load_config;
use mizan::engine::export::export_graph;
use mizan::error::Context;
use mizan::error::Result;
use mizan::model::DecodedBatch;
use mizan::model::GraphExport;
use mizan::model::batch::decode_transaction_records;
use mizan::setup_tracing;
use mizan::source::EsploraClient;
use mizan::source::StaticSource;
use mizan::source::TransactionSource;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "mizan", version, about = "Net-flow graph explorer for a single address")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "Config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch recent transactions from the block explorer and print the graph
    Explore {
        address: String,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Build the graph from a JSON array of transaction records
    Analyze {
        #[arg(long)]
        address: String,
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
}

#[derive(Debug, Args)]
struct Overrides {
    /// Maximum number of transactions to consider
    #[arg(long)]
    limit: Option<usize>,
    /// Dust threshold in satoshis
    #[arg(long)]
    dust: Option<u64>,
    /// Only consider transactions confirmed within this many days
    #[arg(long)]
    days: Option<u32>,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl Overrides {
    fn apply(
        &self,
        config: &mut Config,
    ) -> Result<()> {
        if let Some(limit) = self.limit {
            config.source.max_transactions_per_query = limit;
        }
        if let Some(dust) = self.dust {
            config.engine.dust_threshold_satoshis = dust;
        }
        if self.days.is_some() {
            config.engine.time_window_days = self.days;
        }
        config.validate()?;
        Ok(())
    }
}

fn print_export(
    export: &GraphExport,
    pretty: bool,
) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(export)?
    } else {
        serde_json::to_string(export)?
    };
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    let _log_guards = setup_tracing("mizan", &config.logging)?;

    match cli.command {
        Command::Explore { address, overrides } => {
            overrides.apply(&mut config)?;
            info!("mizan::explore::address::{}", address);

            let client = EsploraClient::new(config.source.clone())?;
            let explorer = Explorer::new(
                Arc::new(client),
                NetFlowEngine::new(config.engine.clone()),
                config.source.max_transactions_per_query,
            );
            let export = explorer.explore(&address).await?;
            print_export(&export, overrides.pretty)?;
        },
        Command::Analyze {
            address,
            input,
            overrides,
        } => {
            overrides.apply(&mut config)?;
            info!("mizan::analyze::address::{}::input::{}", address, input.display());

            let raw = std::fs::read_to_string(&input).with_context(|| format!("reading {}", input.display()))?;
            let decoded = decode_transaction_records(&raw).with_context(|| format!("parsing {}", input.display()))?;

            let source = StaticSource::new(decoded.records);
            let transactions = source
                .fetch_transactions(&address, config.source.max_transactions_per_query)
                .await?;
            let summary = source.fetch_address_summary(&address).await?;
            let batch = DecodedBatch::new(transactions, decoded.rejected);
            let analysis = NetFlowEngine::new(config.engine.clone()).analyze_decoded(&address, &batch, Utc::now());
            for skip in &analysis.skipped {
                info!("mizan::analyze::skipped::txid::{}::reason::{:?}", skip.transaction_id, skip.reason);
            }

            print_export(&export_graph(&analysis.graph, Some(summary)), overrides.pretty)?;
        },
    }

    Ok(())
}
