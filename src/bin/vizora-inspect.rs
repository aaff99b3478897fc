//! Load one data file and print what vizora makes of it.
//!
//! ```text
//! vizora-inspect sales.csv
//! vizora-inspect sales.csv bar month revenue
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use vizora::config::VizoraConfig;
use vizora::data::DatasetRegistry;
use vizora::logging::init_logging;
use vizora::viz::{VisualizationConfig, VisualizationEngine, VisualizationKind};

#[derive(Parser)]
#[command(name = "vizora-inspect")]
#[command(about = "Print dataset metadata, column statistics and an optional render payload")]
struct Args {
    /// Data file (csv, json, parquet, xlsx, xls or delimited text)
    file: PathBuf,

    /// Visualization kind to render, e.g. bar or map
    kind: Option<VisualizationKind>,

    /// Column bound to the x axis
    x: Option<String>,

    /// Column bound to the y axis
    y: Option<String>,

    /// Config file (defaults to vizora.config.json or the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = VizoraConfig::load_or_default(args.config.as_deref());
    init_logging(&config.log_level, config.log_format).context("Failed to initialize logging")?;

    let registry = DatasetRegistry::new(&config);
    let name = registry
        .load(&args.file, None)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let info = registry.info(&name)?;

    let mut stats = serde_json::Map::new();
    for column in &info.columns {
        let column_stats = registry.column_stats(&name, column)?;
        stats.insert(column.clone(), serde_json::to_value(column_stats)?);
    }

    let mut report = json!({ "dataset": &*info, "columns": stats });

    if let Some(kind) = args.kind {
        let mut viz = VisualizationConfig::new(kind, &name).with_title(&name);
        viz.x_column = args.x;
        viz.y_column = args.y;

        let rows = registry.get(&name)?;
        let spec = VisualizationEngine::new()
            .create_visualization(&viz, &rows)
            .context("Failed to render visualization")?;
        report["render"] = spec.payload;
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
