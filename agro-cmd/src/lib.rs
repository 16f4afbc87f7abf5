//! Command implementations for the agro CLI.
//!
//! Every subcommand resolves credentials from the settings, talks to Earth
//! Engine through one client and prints or exports the result. Runs are
//! sequential: one round trip per period, no retries.

use agro_ee::auth::{Credentials, TokenProvider};
use agro_ee::client::EarthEngineClient;
use agro_ee::dataset::Variable;
use agro_ee::settings::Settings;
use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

pub mod analyze;
pub mod catalog;

/// Variables with a single-dataset analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariableArg {
    Precipitation,
    Temperature,
    Evapotranspiration,
}

impl From<VariableArg> for Variable {
    fn from(arg: VariableArg) -> Self {
        match arg {
            VariableArg::Precipitation => Variable::Precipitation,
            VariableArg::Temperature => Variable::Temperature,
            VariableArg::Evapotranspiration => Variable::Evapotranspiration,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List the state names of the region catalog
    States,

    /// List the municipalities of one state
    Municipalities {
        /// State name, exactly as listed by `states`
        state: String,
    },

    /// Annual and monthly series of one variable with statistics
    Analyze {
        #[arg(value_enum)]
        variable: VariableArg,

        #[arg(short, long)]
        state: String,

        #[arg(short, long)]
        municipality: String,

        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// Last day, YYYY-MM-DD
        #[arg(long)]
        end: String,

        /// Write the series as CSV (gzip when the path ends in .gz)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Monthly precipitation minus evapotranspiration
    WaterBalance {
        #[arg(short, long)]
        state: String,

        #[arg(short, long)]
        municipality: String,

        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Tile URL, stretch and legend of one year's map
    Map {
        #[arg(value_enum)]
        variable: VariableArg,

        #[arg(short, long)]
        state: String,

        #[arg(short, long)]
        municipality: String,

        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,

        /// Calendar year to map; defaults to the first year of the range
        #[arg(short, long)]
        year: Option<i32>,
    },
}

/// Client authenticated with whatever credentials the settings allow.
pub fn connect(settings: &Settings) -> anyhow::Result<EarthEngineClient> {
    anyhow::ensure!(
        !settings.project.is_empty(),
        "nenhum projeto do Earth Engine configurado (defina EE_PROJECT ou use --project)"
    );
    let credentials = Credentials::discover(settings)?;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()?;
    let tokens = TokenProvider::new(credentials, http.clone());
    Ok(EarthEngineClient::new(settings, tokens, http))
}

pub async fn run(command: Command, settings: Settings) -> anyhow::Result<()> {
    let client = connect(&settings)?;
    match command {
        Command::States => catalog::run_states(&client).await,
        Command::Municipalities { state } => catalog::run_municipalities(&client, &state).await,
        Command::Analyze {
            variable,
            state,
            municipality,
            start,
            end,
            output,
        } => {
            let request = analyze::parse_request(&state, &municipality, &start, &end)?;
            analyze::run_analyze(&client, variable.into(), &request, output.as_deref()).await
        }
        Command::WaterBalance {
            state,
            municipality,
            start,
            end,
            output,
        } => {
            let request = analyze::parse_request(&state, &municipality, &start, &end)?;
            analyze::run_water_balance(&client, &request, output.as_deref()).await
        }
        Command::Map {
            variable,
            state,
            municipality,
            start,
            end,
            year,
        } => {
            let request = analyze::parse_request(&state, &municipality, &start, &end)?;
            analyze::run_map(&client, variable.into(), &request, year).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_requires_a_project() {
        let err = connect(&Settings::default()).unwrap_err();
        assert!(err.to_string().contains("EE_PROJECT"));
    }

    #[test]
    fn variable_arguments_map_to_variables() {
        assert_eq!(Variable::from(VariableArg::Temperature), Variable::Temperature);
        assert_eq!(
            Variable::from(VariableArg::Evapotranspiration),
            Variable::Evapotranspiration
        );
    }
}
