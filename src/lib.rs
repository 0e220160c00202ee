pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{CheckpointCommands, Cli, Commands, ReportCommands, UserCommands};
pub use config::Config;
use db::{ReportScores, Store};
use models::Checkpoint;
pub use state::SharedState;

/// Install the global tracing subscriber. `RUST_LOG` wins over `log_level`.
pub fn init_tracing(general: &config::GeneralConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&general.log_level));

    let json_layer = general
        .log_json
        .then(|| tracing_subscriber::fmt::layer().json());
    let text_layer = (!general.log_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Created config.toml");
            } else {
                println!("config.toml already exists, leaving it untouched.");
            }
            Ok(())
        }

        Commands::Migrate => {
            let store = Store::with_pool_options(
                &config.general.database_path,
                config.general.max_db_connections,
                config.general.min_db_connections,
            )
            .await?;
            store.ping().await.context("Database did not answer after migrating")?;
            println!("✓ Database is up to date");
            Ok(())
        }

        Commands::User { command } => {
            let state = SharedState::new(config).await?;
            run_user_command(&state, command).await
        }

        Commands::Checkpoint { command } => {
            let state = SharedState::new(config).await?;
            run_checkpoint_command(&state, command).await
        }

        Commands::Report { command } => {
            let state = SharedState::new(config).await?;
            run_report_command(&state, command).await
        }
    }
}

async fn run_user_command(state: &SharedState, command: UserCommands) -> anyhow::Result<()> {
    match command {
        UserCommands::Create { name, email } => cli::cmd_user_create(state, &name, &email).await,
        UserCommands::Show { email } => cli::cmd_user_show(state, &email).await,
        UserCommands::Delete { email, yes } => cli::cmd_user_delete(state, &email, yes).await,
        UserCommands::Token { email, expires_in } => {
            cli::cmd_user_token(state, &email, expires_in).await
        }
        UserCommands::Logout { email } => cli::cmd_user_logout(state, &email).await,
        UserCommands::Admin { email, revoke } => cli::cmd_user_admin(state, &email, revoke).await,
    }
}

async fn run_checkpoint_command(
    state: &SharedState,
    command: CheckpointCommands,
) -> anyhow::Result<()> {
    match command {
        CheckpointCommands::Add {
            id,
            name,
            wcaglevels,
            benefits,
            regex,
        } => {
            let checkpoint = Checkpoint {
                id,
                name,
                wcaglevels,
                benefits,
                regex,
            };
            cli::cmd_checkpoint_add(state, checkpoint).await
        }
        CheckpointCommands::List => cli::cmd_checkpoint_list(state).await,
        CheckpointCommands::Show { id } => cli::cmd_checkpoint_show(state, id).await,
        CheckpointCommands::Seed { path } => cli::cmd_checkpoint_seed(state, &path).await,
    }
}

async fn run_report_command(state: &SharedState, command: ReportCommands) -> anyhow::Result<()> {
    match command {
        ReportCommands::Start { email, url, alias } => {
            cli::cmd_report_start(state, &email, &url, alias.as_deref()).await
        }
        ReportCommands::Show { hashid } => cli::cmd_report_show(state, &hashid).await,
        ReportCommands::List { email } => cli::cmd_report_list(state, &email).await,
        ReportCommands::Record {
            hashid,
            results,
            seo,
            accessibility,
            usability,
        } => {
            let scores = ReportScores {
                seo,
                accessibility,
                usability,
            };
            info!(%hashid, "Recording results from the command line");
            cli::cmd_report_record(state, &hashid, &results, scores).await
        }
    }
}
