//! Models for the Ecobee consumer web API (subset used by the voice commands).
//!
//! Scope: wire payloads and the decoded domain state — no API client code.
//! Field names mirror the vendor's camelCase JSON via serde renames.

use serde::Deserialize;

/// The device's operating mode. The service reports other values (e.g.
/// "auto"); those are treated as an error condition by the client rather
/// than modeled here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HvacMode {
    Heat,
    Cool,
    Off,
}

impl HvacMode {
    /// Parse the wire string; `None` for anything outside heat/cool/off.
    pub fn parse(raw: &str) -> Option<HvacMode> {
        match raw {
            "heat" => Some(HvacMode::Heat),
            "cool" => Some(HvacMode::Cool),
            "off" => Some(HvacMode::Off),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HvacMode::Heat => "heat",
            HvacMode::Cool => "cool",
            HvacMode::Off => "off",
        }
    }
}

impl core::fmt::Display for HvacMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded thermostat snapshot, all temperatures in degrees Fahrenheit.
/// Produced per query and never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermostatState {
    pub hvac_mode: HvacMode,
    pub cool_hold_temp_f: f64,
    pub heat_hold_temp_f: f64,
    pub room_temp_f: f64,
    pub humidity_percent: i64,
    /// Active hold target, derived from the mode: the heat hold when
    /// heating, the cool hold when cooling, absent when off.
    pub hold_temp_f: Option<f64>,
}

// =====================
// Wire payloads
// =====================

/// Body of a successful `/ecobee/register` response.
#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Body of `/ecobee/summary`: one descriptor per thermostat on the account.
#[derive(Debug, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub descriptors: Vec<ThermostatDescriptor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatDescriptor {
    #[serde(default)]
    pub thermostat_identifier: Option<String>,
}

/// Body of `/ecobee/thermostat` for a csv-criteria selection.
#[derive(Debug, Deserialize)]
pub struct ThermostatResponse {
    #[serde(default)]
    pub thermostats: Vec<ThermostatRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatRecord {
    /// Raw mode string; values outside heat/cool/off are possible here.
    pub hvac_mode: String,
    pub auxiliary: AuxiliaryReadings,
}

/// Sensor block nested in each thermostat record. Temperatures are in the
/// service's tenths-of-a-degree integers, humidity is a whole percentage.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuxiliaryReadings {
    pub cool_hold_temp: i64,
    pub heat_hold_temp: i64,
    pub current_temp: i64,
    pub current_humidity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_modes_only() {
        assert_eq!(HvacMode::parse("heat"), Some(HvacMode::Heat));
        assert_eq!(HvacMode::parse("cool"), Some(HvacMode::Cool));
        assert_eq!(HvacMode::parse("off"), Some(HvacMode::Off));
        assert_eq!(HvacMode::parse("auto"), None);
        assert_eq!(HvacMode::parse("Heat"), None);
        assert_eq!(HvacMode::parse(""), None);
    }

    #[test]
    fn decodes_thermostat_record() {
        let json = r#"{
            "thermostats": [{
                "hvacMode": "heat",
                "auxiliary": {
                    "coolHoldTemp": 760,
                    "heatHoldTemp": 680,
                    "currentTemp": 702,
                    "currentHumidity": 41
                }
            }]
        }"#;
        let decoded: ThermostatResponse = serde_json::from_str(json).expect("decode");
        let record = &decoded.thermostats[0];
        assert_eq!(record.hvac_mode, "heat");
        assert_eq!(record.auxiliary.heat_hold_temp, 680);
        assert_eq!(record.auxiliary.current_temp, 702);
        assert_eq!(record.auxiliary.current_humidity, 41);
    }

    #[test]
    fn decodes_summary_with_missing_identifier() {
        let decoded: SummaryResponse = serde_json::from_str(r#"{"descriptors": [{}]}"#).expect("decode");
        assert_eq!(decoded.descriptors.len(), 1);
        assert!(decoded.descriptors[0].thermostat_identifier.is_none());
    }
}
