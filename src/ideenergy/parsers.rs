//! Parsers for i-DE responses.
//!
//! All of them fail on the first malformed field; see
//! [`crate::parsers::parse_generic_historical_data`] for the one series format
//! that tolerates gaps.

use crate::error::ParseError;
use crate::helper::{
    coerce_f64, get_array, get_key, get_str, parse_date_at_midnight, parse_datetime,
    parse_f64_field, parse_i64_field,
};
use crate::model::{
    ConsumptionForPeriod, Contract, DemandAtInstant, HistoricalConsumption,
    HistoricalGeneration, HistoricalPowerDemand, Measure, PeriodValue, SessionLimits,
    TariffBreakdown, PERIOD_LENGTH,
};
use crate::parsers::parse_generic_historical_data;
use serde_json::Value;

/// Format of `fechaDesde` in consumption responses.
pub const CONSUMPTION_DATE_FORMAT: &str = "%d-%m-%Y";
/// Format of `fechaPeriodo` in generation responses and of the power demand limits.
pub const PERIOD_DATE_FORMAT: &str = "%d-%m-%Y%H:%M:%S";
/// Format of the `name` of a power demand sample.
pub const DEMAND_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

const ICP_READY: &str = "trueConectado";

/// Range for which the portal keeps power demand samples.
///
/// Both bounds are kept verbatim since they are sent back in the demand URL.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerDemandLimits {
    pub min: String,
    pub max: String,
}

pub fn parse_measure(data: &Value) -> Result<Measure, ParseError> {
    Ok(Measure {
        accumulate: parse_i64_field(data, "valLecturaContador")?,
        instant: parse_f64_field(data, "valMagnitud")?,
    })
}

pub fn parse_icp_status(data: &Value) -> Result<bool, ParseError> {
    Ok(get_str(data, "icp")? == ICP_READY)
}

/// Validates a contract details payload.
///
/// The payload is only accepted when `codContrato` holds something truthy.
pub fn parse_contract_details(data: &Value) -> Result<Contract, ParseError> {
    let details = data
        .as_object()
        .ok_or_else(|| ParseError::unexpected_type("contract details", "object"))?;

    match details.get("codContrato") {
        Some(code) if is_truthy(code) => Ok(details.clone()),
        _ => Err(ParseError::missing_key("codContrato")),
    }
}

/// Parses the hourly consumption of `obtenerDatosConsumoDH`.
///
/// The payload is a list whose first element carries:
/// - `fechaDesde`: first day, `dd-mm-YYYY`
/// - `periodos`: tariff period names
/// - `total` and `totalesPeriodosTarifarios`: totals for the whole range
/// - `valores` and `valoresPeriodosTarifarios`: one entry per hour
///
/// Every breakdown must have one value per tariff period, and there must be
/// one breakdown per hourly value.
pub fn parse_historical_consumption(data: &Value) -> Result<HistoricalConsumption, ParseError> {
    let entry = data
        .as_array()
        .and_then(|items| items.first())
        .ok_or_else(|| {
            ParseError::UnexpectedStructure("expected a non-empty list".to_string())
        })?;

    let base = parse_date_at_midnight(get_str(entry, "fechaDesde")?, CONSUMPTION_DATE_FORMAT)?;
    let names = get_array(entry, "periodos")?
        .iter()
        .map(|name| {
            name.as_str()
                .map(str::to_string)
                .ok_or_else(|| ParseError::unexpected_type("periodos", "array of strings"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total = parse_f64_field(entry, "total")?;
    let desglosed = zip_breakdown(
        "totalesPeriodosTarifarios",
        get_array(entry, "totalesPeriodosTarifarios")?,
        &names,
    )?;

    let values = get_array(entry, "valores")?;
    let breakdowns = get_array(entry, "valoresPeriodosTarifarios")?;
    if breakdowns.len() != values.len() {
        return Err(ParseError::length_mismatch(
            "valoresPeriodosTarifarios",
            values.len(),
            breakdowns.len(),
        ));
    }

    let mut periods = Vec::with_capacity(values.len());
    let mut start = base;
    for (idx, (value, breakdown)) in values.iter().zip(breakdowns).enumerate() {
        let what = format!("valoresPeriodosTarifarios[{}]", idx);
        let breakdown = breakdown
            .as_array()
            .ok_or_else(|| ParseError::unexpected_type(what.as_str(), "array"))?;

        periods.push(ConsumptionForPeriod {
            period: PeriodValue::hourly(start, coerce_f64("valores", value)?),
            desglosed: zip_breakdown(&what, breakdown, &names)?,
        });
        start += PERIOD_LENGTH;
    }

    Ok(HistoricalConsumption {
        periods,
        total,
        desglosed,
    })
}

/// Parses `obtenerDatosGeneracionPeriodo`; hours count from the day in `fechaPeriodo`.
pub fn parse_historical_generation(data: &Value) -> Result<HistoricalGeneration, ParseError> {
    let base = parse_datetime(get_str(data, "fechaPeriodo")?, PERIOD_DATE_FORMAT)?;
    let generic = parse_generic_historical_data(data, crate::helper::day_of_beginning(base))?;

    Ok(HistoricalGeneration {
        periods: generic.periods,
        accumulated: generic.accumulated,
        accumulated_co2: generic.accumulated_co2,
    })
}

pub fn parse_power_demand_limits(data: &Value) -> Result<PowerDemandLimits, ParseError> {
    let min = get_str(data, "fecMin")?;
    let max = get_str(data, "fecMax")?;
    parse_datetime(min, PERIOD_DATE_FORMAT)?;
    parse_datetime(max, PERIOD_DATE_FORMAT)?;

    Ok(PowerDemandLimits {
        min: min.to_string(),
        max: max.to_string(),
    })
}

/// Flattens the monthly lists under `potMaxMens` and sorts the samples by time.
pub fn parse_historical_power_demand(data: &Value) -> Result<HistoricalPowerDemand, ParseError> {
    let mut demands = Vec::new();
    for month in get_array(data, "potMaxMens")? {
        let samples = month
            .as_array()
            .ok_or_else(|| ParseError::unexpected_type("potMaxMens[]", "array"))?;
        for sample in samples {
            demands.push(DemandAtInstant {
                dt: parse_datetime(get_str(sample, "name")?, DEMAND_DATE_FORMAT)?,
                value: coerce_f64("y", get_key(sample, "y")?)?,
            });
        }
    }
    // stable, samples sharing a timestamp keep the portal's order
    demands.sort_by_key(|demand| demand.dt);

    Ok(HistoricalPowerDemand { demands })
}

/// Reads the keep-alive answer; `None` when the portal did not renew the session.
pub fn parse_session_limits(data: &Value) -> Result<Option<SessionLimits>, ParseError> {
    let renewed = data
        .get("usSes")
        .and_then(Value::as_str)
        .is_some_and(|user| !user.is_empty());
    if !renewed {
        return Ok(None);
    }

    Ok(Some(SessionLimits {
        total: parse_i64_field(data, "total")?,
        warning: parse_i64_field(data, "aviso")?,
    }))
}

fn zip_breakdown(
    what: &str,
    values: &[Value],
    names: &[String],
) -> Result<TariffBreakdown, ParseError> {
    if values.len() != names.len() {
        return Err(ParseError::length_mismatch(what, names.len(), values.len()));
    }

    names
        .iter()
        .zip(values)
        .map(|(name, value)| Ok::<_, ParseError>((name.clone(), coerce_f64(what, value)?)))
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
