//! Shared application context handed to every command.

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::storage::Database;

pub struct AppContext {
    pub config: Config,
    pub db: Database,
    pub robot_mode: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        let db_path = match cli.db {
            Some(ref path) => path.clone(),
            None => config.db_path()?,
        };
        let db = Database::open(&db_path)?;

        Ok(Self {
            config,
            db,
            robot_mode: cli.robot,
        })
    }
}
