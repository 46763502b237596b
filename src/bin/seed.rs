use engagerec::config::SeedConfig;
use engagerec::services::store::seed::{generate_dataset, rng_from_seed};
use engagerec::{init_tracing, InMemoryStore};
use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Writes a synthetic engagement dataset for the server's in-memory store.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "data/dataset.json")]
    output: String,

    #[arg(short, long, default_value_t = 15)]
    users: usize,

    #[arg(short, long, default_value_t = 20)]
    items: usize,

    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    std::env::set_var("RUST_LOG", &args.log_level);
    init_tracing();

    let config = SeedConfig {
        users: args.users,
        items: args.items,
        rng_seed: args.seed,
    };
    let mut rng = rng_from_seed(config.rng_seed);
    let dataset = generate_dataset(&config, &mut rng);
    let with_signal = dataset.interactions.iter().filter(|i| i.has_signal()).count();

    let store = InMemoryStore::from_dataset(dataset)?;

    if let Some(parent) = std::path::Path::new(&args.output).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    store.save_json(&args.output)?;

    info!(
        "Wrote {} items and {} interactions ({} with a non-zero score) to {}",
        store.item_count(),
        store.interaction_count(),
        with_signal,
        args.output
    );
    Ok(())
}
