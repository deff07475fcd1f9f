//! Test fixtures and common test data.
//!
//! Payload builders mirror the shape of real portal answers with made-up values.

use crate::config::Credentials;
use chrono::NaiveDateTime;
use serde_json::{json, Value};

pub fn credentials() -> Credentials {
    Credentials::new("test_user", "test_password")
}

/// Serializes `value` and encodes it as ISO-8859-1.
///
/// Characters outside Latin-1 are not expected in fixtures and become `?`.
pub fn latin1_json(value: &Value) -> Vec<u8> {
    value
        .to_string()
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Generic hourly series as sent by the generation endpoint.
///
/// Hour 25 reports `0.0`, every other hour a positive string value.
pub fn historical_generation(base: NaiveDateTime, hours: usize) -> Value {
    let series: Vec<Value> = (0..hours)
        .map(|idx| match idx {
            25 => json!({"valor": 0.0}),
            _ => json!({"valor": format!("{:.1}", (idx % 12 + 1) as f64 * 0.5)}),
        })
        .collect();

    json!({
        "fechaPeriodo": base.format("%d-%m-%Y%H:%M:%S").to_string(),
        "y": {"data": [series]},
        "acumulado": "1234.5",
        "acumuladoCO2": "308.6"
    })
}

/// Test date and time generators.
pub mod dates {
    use chrono::{NaiveDate, NaiveDateTime};

    /// Friday 2022-08-19 at midnight.
    pub fn week_start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 8, 19)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }
}

/// i-DE payloads.
pub mod ideenergy {
    use chrono::NaiveDateTime;
    use serde_json::{json, Value};

    pub fn login_ok() -> Value {
        json!({
            "redirect": "/consumidores/es/contratos",
            "success": "true",
            "message": ""
        })
    }

    pub fn measure(accumulate: &str, instant: &str) -> Value {
        json!({
            "codSolicitudTGT": "000000000000",
            "valMagnitud": instant,
            "valInterruptor": "1",
            "valEstado": "09",
            "valLecturaContador": accumulate,
            "codSolicitud": "000000000000"
        })
    }

    pub fn contracts() -> Value {
        json!({
            "success": true,
            "contratos": [
                {
                    "codContrato": "123456789",
                    "direccion": "C/ MAYOR  , 12        VALENCIA   ",
                    "estContrato": "Alta"
                },
                {
                    "codContrato": "987654321",
                    "direccion": "AV. DEL PUERTO , 3  VALENCIA",
                    "estContrato": "Alta"
                }
            ]
        })
    }

    pub fn contract_details() -> Value {
        json!({
            "codContrato": 123456789,
            "cups": "ES0000000000000000XX",
            "potMaxima": 5750,
            "direccion": "C/ MAYOR  , 12        VALENCIA   "
        })
    }

    /// Consumption with three tariff periods, every hour billed in `P1`.
    ///
    /// Hour `i` consumes `(i % 10) / 10` kWh.
    pub fn historical_consumption(base: NaiveDateTime, hours: usize) -> Value {
        let values: Vec<f64> = (0..hours).map(|idx| (idx % 10) as f64 / 10.0).collect();
        let breakdowns: Vec<Value> = values.iter().map(|v| json!([v, 0.0, 0.0])).collect();

        json!([{
            "fechaDesde": base.format("%d-%m-%Y").to_string(),
            "periodos": ["P1", "P2", "P3"],
            "total": hours as f64,
            "totalesPeriodosTarifarios": [hours as f64 - 60.0, 10.0, 50.0],
            "valores": values,
            "valoresPeriodosTarifarios": breakdowns
        }])
    }

    pub fn power_demand_limits() -> Value {
        json!({
            "resultado": "correcto",
            "fecMin": "01-03-202100:00:00",
            "fecMax": "30-11-202300:00:00"
        })
    }

    /// Monthly maxima, deliberately out of order across months.
    pub fn power_demand() -> Value {
        json!({
            "potMaxMens": [
                [
                    {"name": "12/02/2023 09:15", "y": 3.5},
                    {"name": "28/02/2023 21:00", "y": 3.9}
                ],
                [
                    {"name": "05/01/2023 20:30", "y": 4.12},
                    {"name": "17/01/2023 14:45", "y": "2.8"}
                ]
            ]
        })
    }
}

/// Global Omnium payloads.
pub mod globalomnium {
    use serde_json::{json, Value};

    pub fn login_ok() -> Value {
        json!({
            "result": true,
            "error": "",
            "redirectURL": "/VirtualOffice/Secure/action_login"
        })
    }

    pub fn contracts() -> Value {
        json!({
            "result": true,
            "data": [
                {
                    "referencia": "00000000/000",
                    "direccion": "C/AAAAA BBBBBB CCCCC, 0, ABC, 132           ",
                    "poblacion": "VALÈNCIA                                ",
                    "estado": "Activo"
                }
            ]
        })
    }

    /// Last row reads 160,686 m³ after consuming 2 litres.
    pub fn hourly_readings() -> Value {
        json!({
            "result": true,
            "table": [
                {
                    "Fecha": "/Date(1703199600000)/",
                    "FechaDesde": null,
                    "Periodo": null,
                    "Consumo": "0",
                    "Observacion": "22/12 00:00",
                    "Lectura": "160,684"
                },
                {
                    "Fecha": "/Date(1703203200000)/",
                    "FechaDesde": null,
                    "Periodo": null,
                    "Consumo": "2",
                    "Observacion": "22/12 01:00",
                    "Lectura": "160,686"
                }
            ],
            "alarmas": ""
        })
    }

    /// Two litres every hour.
    pub fn historical_consumption(hours: usize) -> Value {
        let series: Vec<Value> = (0..hours).map(|_| json!({"valor": "2"})).collect();
        json!({
            "result": true,
            "y": {"data": [series]},
            "acumulado": (hours * 2) as f64
        })
    }

    pub const CONTRACT_DETAILS_HTML: &str = r#"
<script>
var referencia = "00000000/000";
</script>
<h4 class="modal-title">Datos del suministro: C/AAAAA BBBBBB CCCCC</h4>
<div class="modal-body">
<h2>Datos del suministro</h2>
<form>
<div class="row">
<div class="form-group">
<div class="col-md-4">
<label>Referencia</label>
<input type="text" maxlength="100" class="form-control" value="00000000/000" disabled="disabled">
</div>
<div class="col-md-4">
<label>Fecha de contrataci&#243;n</label>
<input type="text" maxlength="100" class="form-control" value="01/01/2000" disabled="disabled">
</div>
<div class="col-md-4">
<label>Tipo</label>
<input type="text" maxlength="100" class="form-control" value="Contador Simple     " disabled="disabled">
</div>
</div>
<div class="form-group">
<div class="col-md-3">
<label>Calibre contador</label>
<input type="text" maxlength="100" class="form-control" value="015 mm" disabled="disabled">
</div>
<div class="col-md-3">
<label>Uso</label>
<input type="text" maxlength="100" class="form-control" value="DOMESTICO                " disabled="disabled">
</div>
<div class="col-md-6">
<label>Poblaci&#243;n</label>
<input type="text" maxlength="100" class="form-control" value="VAL&#200;NCIA                                " disabled="disabled">
</div>
</div>
</div>
</form>
</div>
"#;
}
