//! Scenario replay for the ordering engine
//!
//! Replays a JSON scenario against an in-memory store and prints the final
//! order, keys and gap statistics as JSON.
//!
//! Usage: `shelf-replay [--keep-going] <scenario.json> [config.json]`
//!
//! A failed step aborts the replay with a non-zero exit. With `--keep-going`
//! failures are logged and the report is still printed.
//!
//! ```json
//! {
//!   "name": "Reading list",
//!   "items": [{ "id": "a", "content": "Dune" }, { "id": "b", "content": "Emma" }],
//!   "steps": [
//!     { "op": "insert", "item": { "id": "c", "content": "Ulysses" }, "referenceItemId": "a", "before": false },
//!     { "op": "move", "itemId": "b", "before": true },
//!     { "op": "remove", "itemId": "a" },
//!     { "op": "rebalance" }
//!   ]
//! }
//! ```
//!
//! Set `RUST_LOG=shelfspace_core=debug` to see allocation and rebalance
//! decisions.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use shelfspace_core::config::ShelfConfig;
use shelfspace_core::db::GapStats;
use shelfspace_core::models::{Item, PositionKey, ReorderIntent};
use shelfspace_core::services::ShelfService;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shelf-replay")]
#[command(about = "Replay a shelf scenario against the in-memory store")]
struct Cli {
    /// Scenario JSON file
    scenario: PathBuf,

    /// Optional ShelfConfig JSON file
    config: Option<PathBuf>,

    /// Log failed steps and print the report anyway
    #[arg(long)]
    keep_going: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioItem {
    id: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    properties: serde_json::Value,
}

impl ScenarioItem {
    fn into_item(self) -> Item {
        Item::new_with_id(self.id, self.content, self.properties)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
enum Step {
    #[serde(rename_all = "camelCase")]
    Insert {
        item: ScenarioItem,
        #[serde(default)]
        reference_item_id: Option<String>,
        #[serde(default)]
        before: bool,
    },
    Move(ReorderIntent),
    #[serde(rename_all = "camelCase")]
    Remove { item_id: String },
    Rebalance,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    items: Vec<ScenarioItem>,
    #[serde(default)]
    steps: Vec<Step>,
}

fn default_name() -> String {
    "Scenario".to_string()
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    shelf_id: String,
    version: u64,
    order: Vec<String>,
    keys: BTreeMap<String, PositionKey>,
    stats: GapStats,
    failed_steps: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ShelfConfig::load(path)?,
        None => ShelfConfig::default(),
    };

    let contents = std::fs::read_to_string(&cli.scenario)
        .with_context(|| format!("Failed to read scenario {}", cli.scenario.display()))?;
    let scenario: Scenario = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse scenario {}", cli.scenario.display()))?;

    let report = replay(scenario, &config, cli.keep_going).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.failed_steps > 0 {
        anyhow::bail!("{} step(s) failed", report.failed_steps);
    }
    Ok(())
}

async fn replay(scenario: Scenario, config: &ShelfConfig, keep_going: bool) -> Result<Report> {
    let service = ShelfService::in_memory(config)?;
    let store = service.store();
    let shelf = store.create_shelf(None, scenario.name).await?;
    tracing::info!("Replaying into shelf '{}'", shelf.id);

    for item in scenario.items {
        store
            .insert_item(&shelf.id, item.into_item(), None, false)
            .await?;
    }

    let mut failed_steps = 0;
    for (index, step) in scenario.steps.into_iter().enumerate() {
        let result = match step {
            Step::Insert {
                item,
                reference_item_id,
                before,
            } => store
                .insert_item(
                    &shelf.id,
                    item.into_item(),
                    reference_item_id.as_deref(),
                    before,
                )
                .await
                .map(|outcome| outcome.rebalanced)
                .map_err(anyhow::Error::from),
            Step::Move(intent) => service
                .reorder(&shelf.id, &intent)
                .await
                .map(|outcome| outcome.rebalanced)
                .map_err(anyhow::Error::from),
            Step::Remove { item_id } => store
                .remove_item(&shelf.id, &item_id)
                .await
                .map(|_| false)
                .map_err(anyhow::Error::from),
            Step::Rebalance => store
                .rebalance_shelf(&shelf.id)
                .await
                .map(|_| true)
                .map_err(anyhow::Error::from),
        };

        match result {
            Ok(true) => tracing::info!("Step {} rebalanced the shelf", index + 1),
            Ok(false) => {}
            Err(e) if keep_going => {
                tracing::warn!("Step {} failed: {:#}", index + 1, e);
                failed_steps += 1;
            }
            Err(e) => return Err(e.context(format!("Step {} failed", index + 1))),
        }
    }

    let snapshot = store.get_shelf(&shelf.id).await?;
    let stats = service.get_position_metrics(&shelf.id).await?;
    let view = snapshot.ordered_view();

    Ok(Report {
        shelf_id: snapshot.id.clone(),
        version: snapshot.version,
        order: view.item_ids().map(str::to_string).collect(),
        keys: view
            .iter()
            .map(|entry| (entry.item_id.clone(), entry.key))
            .collect(),
        stats,
        failed_steps,
    })
}
