//! agro-cli - Command line tool for agrometeorological analysis on Earth Engine.
//!
//! Settings come from the environment (a `.env` file is loaded first);
//! the global flags below override them.

use agro_ee::settings::{Environment, Settings};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agro-cli",
    version,
    about = "Precipitation, temperature and water balance of Brazilian municipalities"
)]
struct Cli {
    /// Cloud project billed for Earth Engine calls
    #[arg(long, global = true, env = "EE_PROJECT")]
    project: Option<String>,

    /// Service-account key JSON file
    #[arg(long, global = true, env = "EE_SERVICE_ACCOUNT_KEY_FILE")]
    key_file: Option<PathBuf>,

    /// Allow local user credentials from `earthengine authenticate`
    #[arg(long, global = true)]
    development: bool,

    #[command(subcommand)]
    command: agro_cmd::Command,
}

impl Cli {
    fn settings(&self) -> Settings {
        let mut settings = Settings::from_env();
        if let Some(project) = &self.project {
            settings.project = project.clone();
        }
        if let Some(path) = &self.key_file {
            settings.service_account_key_file = Some(path.clone());
        }
        if self.development {
            settings.environment = Environment::Development;
        }
        settings
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();
    let settings = cli.settings();
    log::debug!("Earth Engine project {:?} at {}", settings.project, settings.api_url);
    agro_cmd::run(cli.command, settings).await
}
