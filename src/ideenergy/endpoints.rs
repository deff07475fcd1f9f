//! Endpoint paths of the i-DE consumer portal, relative to [`BASE_URL`].
//!
//! Login, contracts, contract details, contract selection, generation, ICP
//! status and measure have been in use since the first client version without
//! ever being documented by the provider. Consumption and power demand were
//! last reviewed on 2023-06-22.

use chrono::NaiveDateTime;

pub const BASE_URL: &str = "https://www.i-de.es/consumidores/rest";

pub const LOGIN: &str = "/loginNew/login";
pub const KEEP_SESSION: &str = "/loginNew/mantenerSesion/";
pub const CONTRACTS: &str = "/cto/listaCtos/";
pub const CONTRACT_DETAILS: &str = "/detalleCto/detalle/";
pub const CONTRACT_SELECTION: &str = "/cto/seleccion/";
pub const ICP_STATUS: &str = "/rearmeICP/consultarEstado";
pub const MEASURE: &str = "/escenarioNew/obtenerMedicionOnline/24";
pub const POWER_DEMAND_LIMITS: &str = "/consumoNew/obtenerLimitesFechasPotencia/";

pub fn contract_selection(id: &str) -> String {
    format!("{}{}", CONTRACT_SELECTION, id)
}

pub fn consumption_period(start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!(
        "/consumoNew/obtenerDatosConsumoDH/{}/{}/horas/USU/",
        start.format("%d-%m-%Y"),
        end.format("%d-%m-%Y"),
    )
}

pub fn generation_period(start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!(
        "/consumoNew/obtenerDatosGeneracionPeriodo/fechaInicio/{}00:00:00/fechaFinal/{}00:00:00/",
        start.format("%d-%m-%Y"),
        end.format("%d-%m-%Y"),
    )
}

/// `fec_min` and `fec_max` are passed through exactly as [`POWER_DEMAND_LIMITS`] returned them.
pub fn power_demand_period(fec_min: &str, fec_max: &str) -> String {
    format!(
        "/consumoNew/obtenerPotenciasMaximasRangoV2/{}/{}",
        fec_min, fec_max
    )
}
