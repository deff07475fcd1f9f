use crate::error::ParseError;
use crate::helper::{get_array, get_key, get_str, parse_decimal_comma};
use crate::model::{ConsumptionForPeriod, HistoricalConsumption, Measure, TariffBreakdown};
use crate::parsers::parse_generic_historical_data;
use chrono::NaiveDateTime;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::collections::BTreeMap;

/// Supply details keyed by the label shown in the virtual office.
pub type ContractDetails = BTreeMap<String, String>;

const LITRES_PER_CUBIC_METRE: f64 = 1000.0;

/// Reads the most recent row of the hourly readings table.
///
/// `Lectura` is the meter reading in m³ with a decimal comma. The returned
/// `accumulate` converts it to litres, rounded to the nearest litre, so
/// `"160,684"` becomes `160684`. `instant` is `Consumo`, the litres consumed
/// in the last hour, taken as is.
pub fn parse_measure(data: &Value) -> Result<Measure, ParseError> {
    let row = get_array(data, "table")?
        .last()
        .ok_or_else(|| ParseError::UnexpectedStructure("readings table is empty".to_string()))?;

    let reading = parse_decimal_comma(get_str(row, "Lectura")?)?;
    Ok(Measure {
        accumulate: (reading * LITRES_PER_CUBIC_METRE).round() as i64,
        instant: decimal_comma_field(row, "Consumo")?,
    })
}

/// Parses hourly consumption counted from `base`, keeping the hours inside `[start, end)`.
///
/// `total` is the portal's `acumulado`, or the sum of the kept hours when it is absent.
pub fn parse_historical_consumption(
    data: &Value,
    base: NaiveDateTime,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<HistoricalConsumption, ParseError> {
    let generic = parse_generic_historical_data(data, base)?;
    let periods: Vec<_> = generic
        .periods
        .into_iter()
        .filter(|p| p.is_within(start, end))
        .collect();
    let total = generic
        .accumulated
        .unwrap_or_else(|| periods.iter().map(|p| p.value).sum());

    Ok(HistoricalConsumption {
        periods: periods.into_iter().map(ConsumptionForPeriod::from).collect(),
        total,
        desglosed: TariffBreakdown::new(),
    })
}

/// Scrapes the supply details form out of the HTML fragment sent under `data`.
///
/// Each `<label>` is paired with the first `<input>` that follows it before
/// the next `<label>`. Labels without an input of their own are skipped.
pub fn parse_contract_details(fragment: &str) -> Result<ContractDetails, ParseError> {
    let document = Html::parse_fragment(fragment);
    let label = html_selector("label")?;

    let mut details = ContractDetails::new();
    for element in document.select(&label) {
        let name = element.text().collect::<String>().trim().to_string();
        let value = element
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take_while(|sibling| sibling.value().name() != "label")
            .find(|sibling| sibling.value().name() == "input")
            .and_then(|input| input.value().attr("value"));

        if let Some(value) = value.filter(|_| !name.is_empty()) {
            details.insert(name, value.trim().to_string());
        }
    }

    if details.is_empty() {
        return Err(ParseError::UnexpectedStructure(
            "no labelled fields in supply details".to_string(),
        ));
    }
    Ok(details)
}

fn decimal_comma_field(data: &Value, key: &str) -> Result<f64, ParseError> {
    match get_key(data, key)? {
        Value::String(text) => parse_decimal_comma(text),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ParseError::number_parse(n.to_string(), "not representable as f64")),
        _ => Err(ParseError::unexpected_type(key, "number or numeric string")),
    }
}

fn html_selector(selector: &str) -> Result<Selector, ParseError> {
    Selector::parse(selector)
        .map_err(|e| ParseError::UnexpectedStructure(format!("invalid selector: {:?}", e)))
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
        fn test_parse_measure_uses_last_row() {
            let measure = parse_measure(&fixtures::globalomnium::hourly_readings()).unwrap();
            assert_eq!(
                measure,
                Measure {
                    accumulate: 160686,
                    instant: 2.0
                }
            );
        }

        #[test]
        fn test_parse_measure_decimal_consumption() {
            let data = json!({"table": [{"Lectura": "1.160,5", "Consumo": "0,5"}]});
            let measure = parse_measure(&data).unwrap();
            assert_eq!(measure.accumulate, 1160500);
            assert_eq!(measure.instant, 0.5);
        }

        #[test]
        fn test_parse_measure_dot_decimal_consumption() {
            let data = json!({"table": [{"Lectura": "160,684", "Consumo": "1.5"}]});
            let measure = parse_measure(&data).unwrap();
            assert_eq!(
                measure,
                Measure {
                    accumulate: 160684,
                    instant: 1.5
                }
            );
        }

        #[test]
        fn test_parse_historical_consumption() {
            let base = fixtures::dates::week_start();
            let data = fixtures::globalomnium::historical_consumption(48);

            let parsed =
                parse_historical_consumption(&data, base, base, base + TimeDelta::days(2)).unwrap();

            assert_eq!(parsed.periods.len(), 48);
            assert_eq!(parsed.periods[1].period.start, base + TimeDelta::hours(1));
            assert!(parsed.periods.iter().all(|p| p.desglosed.is_empty()));
            assert_eq!(parsed.total, 96.0);
        }

        #[test]
        fn test_parse_historical_consumption_total_from_periods() {
            let base = fixtures::dates::week_start();
            let data = json!({"y": {"data": [[{"valor": "1.5"}, null, {"valor": 2.5}]]}});

            let parsed =
                parse_historical_consumption(&data, base, base, base + TimeDelta::days(1)).unwrap();

            assert_eq!(parsed.periods.len(), 2);
            assert_eq!(parsed.total, 4.0);
        }

        #[test]
        fn test_parse_historical_consumption_total_counts_kept_hours_only() {
            let base = fixtures::dates::week_start();
            let data = json!({"y": {"data": [[{"valor": "1.5"}, {"valor": "2"}, {"valor": 2.5}]]}});

            let parsed =
                parse_historical_consumption(&data, base, base, base + TimeDelta::hours(2)).unwrap();

            assert_eq!(parsed.periods.len(), 2);
            assert_eq!(parsed.total, 3.5);
        }

        #[test]
        fn test_parse_contract_details() {
            let details = parse_contract_details(fixtures::globalomnium::CONTRACT_DETAILS_HTML)
                .unwrap();

            assert_eq!(details.get("Referencia").map(String::as_str), Some("00000000/000"));
            assert_eq!(details.get("Tipo").map(String::as_str), Some("Contador Simple"));
            assert_eq!(details.get("Población").map(String::as_str), Some("VALÈNCIA"));
            assert_eq!(
                details.get("Fecha de contratación").map(String::as_str),
                Some("01/01/2000")
            );
        }

        #[test]
        fn test_parse_contract_details_label_without_input() {
            let fragment = r#"
<div class="col-md-4">
<label>Observaciones</label>
<label>Uso</label>
<input type="text" value="DOMESTICO" disabled="disabled">
</div>
"#;
            let details = parse_contract_details(fragment).unwrap();

            assert_eq!(details.get("Observaciones"), None);
            assert_eq!(details.get("Uso").map(String::as_str), Some("DOMESTICO"));
            assert_eq!(details.len(), 1);
        }
    }

    mod fails {
        use super::*;

        #[test]
        fn test_parse_measure_empty_table() {
            let err = parse_measure(&json!({"table": []})).unwrap_err();
            assert!(matches!(err, ParseError::UnexpectedStructure(_)));
        }

        #[test]
        fn test_parse_measure_bad_reading() {
            let data = json!({"table": [{"Lectura": "sin lectura", "Consumo": "0"}]});
            let err = parse_measure(&data).unwrap_err();
            assert!(matches!(err, ParseError::NumberParse { .. }));
        }

        #[test]
        fn test_parse_measure_null_consumption() {
            let data = json!({"table": [{"Lectura": "160,684", "Consumo": null}]});
            let err = parse_measure(&data).unwrap_err();
            assert_eq!(err, ParseError::unexpected_type("Consumo", "number or numeric string"));
        }

        #[test]
        fn test_parse_contract_details_without_form() {
            let err = parse_contract_details("<div><h2>Datos del suministro</h2></div>").unwrap_err();
            assert!(matches!(err, ParseError::UnexpectedStructure(_)));
        }
    }
}
