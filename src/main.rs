//! Utility portals command line client
//!
//! Logs into the selected provider's customer portal, runs one query and
//! prints the result as pretty JSON on stdout. Logs go to stderr.
//!
//! Credentials come from `-u/-p`, a `--credentials` file, or the
//! `I_DE_ENERGY_*` / `GLOBALOMNIUM_*` environment variables, in that order.

mod cli;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, TimeDelta};
use clap::Parser;
use cli::{Action, Args, Provider};
use serde_json::Value;
use std::collections::BTreeMap;
use std::process::ExitCode;
use utility_portals::config;
use utility_portals::helper::{day_of_beginning, sanitize_address};
use utility_portals::model::Contract;
use utility_portals::{globalomnium, ideenergy, MeterClient};

/// Days covered by the historical queries.
const HISTORY_DAYS: i64 = 7;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let app_config = match config::load_app_config() {
        Ok(app_config) => app_config,
        Err(e) => {
            eprintln!("Failed to load AppConfig: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(app_config.log_level())
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let mut client = build_client(&args)?;
    let action = args.action();
    let (start, end) = last_days_range(Local::now().naive_local(), HISTORY_DAYS);

    let mut attempt = 1;
    let output = loop {
        match execute(client.as_mut(), action, start, end).await {
            Ok(output) => break output,
            Err(e) if attempt < args.retries => {
                tracing::warn!(attempt, retries = args.retries, "{:?} failed: {:#}", action, e);
                attempt += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("{:?} failed after {} attempts", action, attempt))
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn build_client(args: &Args) -> Result<Box<dyn MeterClient>> {
    let prefix = args.provider.env_prefix();
    let credentials = config::resolve_credentials(
        args.username.clone(),
        args.password.clone(),
        args.credentials.as_deref(),
        prefix,
    )
    .context("Failed to load credentials")?;

    let mut client_config =
        config::load_client_config(prefix).context("Failed to load ClientConfig")?;
    if let Some(contract) = &args.contract {
        client_config.contract = Some(contract.clone());
    }

    let client: Box<dyn MeterClient> = match args.provider {
        Provider::Ideenergy => Box::new(ideenergy::Client::new(credentials, &client_config)?),
        Provider::Globalomnium => {
            Box::new(globalomnium::Client::new(credentials, &client_config)?)
        }
    };
    Ok(client)
}

async fn execute(
    client: &mut dyn MeterClient,
    action: Action,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Value> {
    let output = match action {
        Action::ListContracts => {
            serde_json::to_value(summarize_contracts(client.get_contracts().await?))?
        }
        Action::GetMeasure => serde_json::to_value(client.get_measure().await?)?,
        Action::GetHistoricalConsumption => {
            serde_json::to_value(client.get_historical_consumption(start, end).await?)?
        }
        Action::GetHistoricalGeneration => {
            serde_json::to_value(client.get_historical_generation(start, end).await?)?
        }
        Action::GetHistoricalPowerDemand => {
            serde_json::to_value(client.get_historical_power_demand().await?)?
        }
    };
    Ok(output)
}

/// `[today 00:00 - days, today 00:00)`
fn last_days_range(now: NaiveDateTime, days: i64) -> (NaiveDateTime, NaiveDateTime) {
    let end = day_of_beginning(now);
    (end - TimeDelta::days(days), end)
}

/// Keys contracts by their code and tidies up their address.
fn summarize_contracts(contracts: Vec<Contract>) -> BTreeMap<String, Contract> {
    contracts
        .into_iter()
        .enumerate()
        .map(|(idx, mut contract)| {
            let code = ["codContrato", "referencia"]
                .iter()
                .find_map(|key| contract.get(*key))
                .map(|code| match code {
                    Value::String(code) => code.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| format!("#{}", idx));

            if let Some(Value::String(address)) = contract.get("direccion") {
                let address = sanitize_address(address);
                contract.insert("direccion".to_string(), Value::String(address));
            }
            (code, contract)
        })
        .collect()
}
