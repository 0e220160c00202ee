use clap::Parser;
use scanledger::cli::Cli;
use scanledger::{Config, init_tracing, run};
use tracing::info;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config_path = Config::find_path();
    let config = Config::load_or_default(config_path.as_deref())?;
    init_tracing(&config.general);

    match &config_path {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    let worker_threads = config.general.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(run(cli, config))
}
