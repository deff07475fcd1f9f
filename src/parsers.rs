//! Parsers shared by both portals.

use crate::error::ParseError;
use crate::helper::{coerce_f64, get_array, get_key};
use crate::model::{Contract, PeriodValue, PERIOD_LENGTH};
use chrono::NaiveDateTime;
use serde_json::Value;

/// Result of [`parse_generic_historical_data`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenericHistoricalData {
    pub periods: Vec<PeriodValue>,
    pub accumulated: Option<f64>,
    pub accumulated_co2: Option<f64>,
}

/// Whether a success sentinel reports success.
///
/// The portals use `true`, `"true"`, or leave the key out on failure.
pub fn is_success(sentinel: Option<&Value>) -> bool {
    match sentinel {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text == "true",
        _ => false,
    }
}

/// Reads the list of contract objects stored under `key`.
pub fn parse_contracts(data: &Value, key: &str) -> Result<Vec<Contract>, ParseError> {
    get_array(data, key)?
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            item.as_object()
                .cloned()
                .ok_or_else(|| ParseError::unexpected_type(format!("{}[{}]", key, idx), "object"))
        })
        .collect()
}

/// Parses an hourly series stored under `y.data[0]`.
///
/// Entry `i` covers `[base + i h, base + (i + 1) h)`. Entries that are `null`,
/// or whose `valor` is missing or not a number, are gaps: they are left out of
/// the result and do not shift the entries that follow.
///
/// `acumulado` and `acumuladoCO2` are optional, but when present they must be
/// numeric.
pub fn parse_generic_historical_data(
    data: &Value,
    base: NaiveDateTime,
) -> Result<GenericHistoricalData, ParseError> {
    let series = get_array(get_key(data, "y")?, "data")?
        .first()
        .ok_or_else(|| ParseError::UnexpectedStructure("y.data is empty".to_string()))?
        .as_array()
        .ok_or_else(|| ParseError::unexpected_type("y.data[0]", "array"))?;

    let mut periods = Vec::with_capacity(series.len());
    let mut start = base;
    for item in series {
        if let Some(value) = item.get("valor").and_then(|v| coerce_f64("valor", v).ok()) {
            periods.push(PeriodValue::hourly(start, value));
        }
        start += PERIOD_LENGTH;
    }

    Ok(GenericHistoricalData {
        periods,
        accumulated: optional_f64(data, "acumulado")?,
        accumulated_co2: optional_f64(data, "acumuladoCO2")?,
    })
}

fn optional_f64(data: &Value, key: &str) -> Result<Option<f64>, ParseError> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => coerce_f64(key, value).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;
    use chrono::TimeDelta;
    use serde_json::json;

    mod succeeds {
        use super::*;

        #[test]
        fn test_is_success() {
            assert!(is_success(Some(&json!(true))));
            assert!(is_success(Some(&json!("true"))));
            assert!(!is_success(Some(&json!("false"))));
            assert!(!is_success(Some(&json!(false))));
            assert!(!is_success(Some(&json!(1))));
            assert!(!is_success(None));
        }

        #[test]
        fn test_parse_contracts() {
            let data = json!({"data": [{"id": "1"}, {"id": "2", "alias": "Casa"}]});
            let contracts = parse_contracts(&data, "data").unwrap();
            assert_eq!(contracts.len(), 2);
            assert_eq!(contracts[1].get("alias"), Some(&json!("Casa")));
        }

        #[test]
        fn test_week_of_hourly_entries() {
            let base = fixtures::dates::week_start();
            let data = fixtures::historical_generation(base, 168);

            let parsed = parse_generic_historical_data(&data, base).unwrap();

            assert_eq!(parsed.periods.len(), 168);
            assert_eq!(parsed.periods[25].start, base + TimeDelta::hours(25));
            assert_eq!(parsed.periods[25].value, 0.0);
            for window in parsed.periods.windows(2) {
                assert!(window[0].start <= window[1].start);
            }
            for period in &parsed.periods {
                assert_eq!(period.end, period.start + PERIOD_LENGTH);
            }
        }

        #[test]
        fn test_gaps_are_dropped_without_shifting() {
            let base = fixtures::dates::week_start();
            let data = json!({
                "y": {"data": [[
                    {"valor": "1.5"},
                    null,
                    {"valor": "n/a"},
                    {"otro": 3},
                    {"valor": 4.0}
                ]]}
            });

            let parsed = parse_generic_historical_data(&data, base).unwrap();

            assert_eq!(parsed.periods.len(), 2);
            assert_eq!(parsed.periods[0], PeriodValue::hourly(base, 1.5));
            assert_eq!(
                parsed.periods[1],
                PeriodValue::hourly(base + TimeDelta::hours(4), 4.0)
            );
        }

        #[test]
        fn test_accumulated_totals() {
            let base = fixtures::dates::week_start();
            let data = json!({
                "y": {"data": [[]]},
                "acumulado": "1234.5",
                "acumuladoCO2": 10.25
            });

            let parsed = parse_generic_historical_data(&data, base).unwrap();

            assert!(parsed.periods.is_empty());
            assert_eq!(parsed.accumulated, Some(1234.5));
            assert_eq!(parsed.accumulated_co2, Some(10.25));
        }

        #[test]
        fn test_accumulated_totals_absent() {
            let base = fixtures::dates::week_start();
            let data = json!({"y": {"data": [[]]}, "acumulado": null});

            let parsed = parse_generic_historical_data(&data, base).unwrap();

            assert_eq!(parsed.accumulated, None);
            assert_eq!(parsed.accumulated_co2, None);
        }
    }

    mod fails {
        use super::*;

        #[test]
        fn test_parse_contracts_rejects_non_objects() {
            let err = parse_contracts(&json!({"contratos": [{"a": 1}, "b"]}), "contratos").unwrap_err();
            assert_eq!(err, ParseError::unexpected_type("contratos[1]", "object"));
        }

        #[test]
        fn test_parse_contracts_without_list() {
            let err = parse_contracts(&json!({"success": true}), "contratos").unwrap_err();
            assert_eq!(err, ParseError::missing_key("contratos"));
        }

        #[test]
        fn test_missing_series() {
            let base = fixtures::dates::week_start();
            let err = parse_generic_historical_data(&json!({"x": 1}), base).unwrap_err();
            assert_eq!(err, ParseError::missing_key("y"));
        }

        #[test]
        fn test_empty_series_list() {
            let base = fixtures::dates::week_start();
            let err = parse_generic_historical_data(&json!({"y": {"data": []}}), base).unwrap_err();
            assert!(matches!(err, ParseError::UnexpectedStructure(_)));
        }

        #[test]
        fn test_malformed_accumulated() {
            let base = fixtures::dates::week_start();
            let data = json!({"y": {"data": [[]]}, "acumulado": "mucho"});
            let err = parse_generic_historical_data(&data, base).unwrap_err();
            assert!(matches!(err, ParseError::NumberParse { .. }));
        }
    }
}
