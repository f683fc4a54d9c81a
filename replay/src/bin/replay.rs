use camino::Utf8PathBuf as PathBuf;
use clap::Parser;
use color_eyre::eyre::{Context, Result};
use daygroup::{
    config::{read_config, StoreConfig},
    model::IndexPath,
    DailyDataSource,
};
use daygroup_replay::{new_client, parse_entries, parse_index_path, Entry};
use tracing_error::ErrorLayer;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Groups a JSON file of timestamped entries into day sections and prints them
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// JSON array of {"id", "timestamp", "title"} objects
    #[arg(short, long)]
    records: PathBuf,
    /// Report incremental changes instead of reloads
    #[arg(long)]
    animated: bool,
    /// Rows to delete after loading, as section:row
    #[arg(long, value_parser = parse_index_arg)]
    delete: Vec<IndexPath>,
    /// Switch to oldest-first after loading
    #[arg(long)]
    ascending: bool,
}

fn parse_index_arg(s: &str) -> Result<IndexPath, String> {
    parse_index_path(s).map_err(|err| err.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    if std::env::var("RUST_SPANTRACE").is_err() {
        std::env::set_var("RUST_SPANTRACE", "1");
    }
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(EnvFilter::from_env("DAYGROUP_LOG"))
        .with(ErrorLayer::default())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => read_config(path).await?,
        None => StoreConfig::default(),
    };
    let json = tokio::fs::read_to_string(&args.records)
        .await
        .wrap_err(format!("Error reading records file {}", args.records))?;
    let entries = parse_entries(&json)?;
    tracing::info!(count = entries.len(), "loaded records");

    let store: DailyDataSource<Entry> = DailyDataSource::new(&config);
    let client = new_client();
    store.set_client(&client);

    store.insert_models(entries, args.animated, None)?;
    if !args.delete.is_empty() {
        store.delete_models(args.delete.clone(), args.animated, None)?;
    }
    if args.ascending {
        store.set_order_ascending(true)?;
    }
    store.flush().await?;
    tracing::info!(notifications = client.received(), "done");

    for (idx, section) in store.sections().iter().enumerate() {
        println!(
            "{} {} ({} rows)",
            idx,
            section.day().format("%Y-%m-%d"),
            section.len()
        );
        for entry in section.rows() {
            println!(
                "    {} {} {}",
                entry.timestamp.with_timezone(&config.time_zone).format("%H:%M:%S %:z"),
                entry.id,
                entry.title.as_deref().unwrap_or("")
            );
        }
    }
    store.shutdown().await?;
    Ok(())
}
