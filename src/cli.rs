use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;
use utility_portals::{globalomnium, ideenergy};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    /// i-DE electricity portal
    Ideenergy,
    /// Global Omnium water portal
    Globalomnium,
}

impl Provider {
    /// Prefix of the environment variables holding this provider's settings.
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Provider::Ideenergy => ideenergy::ENV_PREFIX,
            Provider::Globalomnium => globalomnium::ENV_PREFIX,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    ListContracts,
    GetMeasure,
    GetHistoricalConsumption,
    GetHistoricalGeneration,
    GetHistoricalPowerDemand,
}

/// Query a utility customer portal and print the result as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(group(ArgGroup::new("action").required(true).multiple(false)))]
pub struct Args {
    #[clap(long, value_enum, default_value = "ideenergy")]
    pub provider: Provider,

    /// Portal username; falls back to the credentials file, then to
    /// `<PREFIX>_USERNAME`.
    #[clap(short, long)]
    pub username: Option<String>,

    #[clap(short, long, requires = "username")]
    pub password: Option<String>,

    /// JSON file with `username` and `password`.
    #[clap(long = "credentials")]
    pub credentials: Option<PathBuf>,

    /// Attempts before giving up.
    #[clap(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub retries: u32,

    /// Contract to select right after logging in.
    #[clap(long)]
    pub contract: Option<String>,

    #[clap(long, group = "action")]
    pub list_contracts: bool,

    #[clap(long, group = "action")]
    pub get_measure: bool,

    /// Hourly consumption of the last 7 days.
    #[clap(long, group = "action")]
    pub get_historical_consumption: bool,

    /// Hourly generation of the last 7 days.
    #[clap(long, group = "action")]
    pub get_historical_generation: bool,

    #[clap(long, group = "action")]
    pub get_historical_power_demand: bool,
}

impl Args {
    pub fn action(&self) -> Action {
        if self.list_contracts {
            Action::ListContracts
        } else if self.get_measure {
            Action::GetMeasure
        } else if self.get_historical_consumption {
            Action::GetHistoricalConsumption
        } else if self.get_historical_generation {
            Action::GetHistoricalGeneration
        } else {
            Action::GetHistoricalPowerDemand
        }
    }
}
