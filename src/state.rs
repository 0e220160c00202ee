use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountService, ReportService, SeaOrmAccountService, SeaOrmReportService, SessionSigner,
};

/// Everything a request handler needs, built once at startup.
///
/// The config (and with it the signing secret) is immutable for the life of
/// the process.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub accounts: Arc<dyn AccountService>,

    pub reports: Arc<dyn ReportService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let signer = SessionSigner::from_config(&config.security)?;

        let accounts = Arc::new(SeaOrmAccountService::new(
            store.clone(),
            signer,
            config.security.clone(),
            config.accounts.clone(),
        )) as Arc<dyn AccountService>;

        let reports = Arc::new(SeaOrmReportService::new(store.clone()))
            as Arc<dyn ReportService>;

        Ok(Self {
            config: Arc::new(config),
            store,
            accounts,
            reports,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
