//! METAR ground-report data model: physical units, the property catalogue
//! of decodable METAR fields, and observation records.

use crate::utils::error::{ApiError, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitDistance {
    #[serde(rename = "SM")]
    StatuteMiles,
    #[serde(rename = "MI")]
    Miles,
    #[serde(rename = "M")]
    Meters,
    #[serde(rename = "KM")]
    Kilometers,
    #[serde(rename = "FT")]
    Feet,
    #[serde(rename = "IN")]
    Inches,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitPrecipitation {
    #[serde(rename = "IN")]
    Inches,
    #[serde(rename = "CM")]
    Centimeters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitPressure {
    #[serde(rename = "MB")]
    Millibar,
    #[serde(rename = "HPA")]
    Hectopascal,
    #[serde(rename = "IN")]
    Inches,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSpeed {
    #[serde(rename = "KT")]
    Knots,
    #[serde(rename = "MPS")]
    MetersPerSecond,
    #[serde(rename = "KMH")]
    KilometersPerHour,
    #[serde(rename = "MPH")]
    MilesPerHour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitTemperature {
    #[serde(rename = "F")]
    Fahrenheit,
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "K")]
    Kelvin,
}

/// The unit classes a METAR property can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitClass {
    Distance,
    Precipitation,
    Pressure,
    Speed,
    Temperature,
}

impl UnitClass {
    /// Fallback applied when a property arrives without an explicit unit.
    pub fn default_unit(&self) -> Unit {
        match self {
            UnitClass::Distance => Unit::Distance(UnitDistance::Meters),
            UnitClass::Precipitation => Unit::Precipitation(UnitPrecipitation::Centimeters),
            UnitClass::Pressure => Unit::Pressure(UnitPressure::Hectopascal),
            UnitClass::Speed => Unit::Speed(UnitSpeed::KilometersPerHour),
            UnitClass::Temperature => Unit::Temperature(UnitTemperature::Celsius),
        }
    }

    pub fn parse_code(&self, code: &str) -> Option<Unit> {
        let quoted = serde_json::Value::String(code.to_string());
        match self {
            UnitClass::Distance => serde_json::from_value(quoted).ok().map(Unit::Distance),
            UnitClass::Precipitation => serde_json::from_value(quoted)
                .ok()
                .map(Unit::Precipitation),
            UnitClass::Pressure => serde_json::from_value(quoted).ok().map(Unit::Pressure),
            UnitClass::Speed => serde_json::from_value(quoted).ok().map(Unit::Speed),
            UnitClass::Temperature => serde_json::from_value(quoted).ok().map(Unit::Temperature),
        }
    }
}

impl fmt::Display for UnitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitClass::Distance => "distance",
            UnitClass::Precipitation => "precipitation",
            UnitClass::Pressure => "pressure",
            UnitClass::Speed => "speed",
            UnitClass::Temperature => "temperature",
        };
        write!(f, "{}", name)
    }
}

/// A concrete unit of any class.
///
/// Deserialization goes through [`UnitClass::parse_code`], since unit codes
/// are only unambiguous within their class (`IN` names three units).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Unit {
    Distance(UnitDistance),
    Precipitation(UnitPrecipitation),
    Pressure(UnitPressure),
    Speed(UnitSpeed),
    Temperature(UnitTemperature),
}

impl Unit {
    pub fn class(&self) -> UnitClass {
        match self {
            Unit::Distance(_) => UnitClass::Distance,
            Unit::Precipitation(_) => UnitClass::Precipitation,
            Unit::Pressure(_) => UnitClass::Pressure,
            Unit::Speed(_) => UnitClass::Speed,
            Unit::Temperature(_) => UnitClass::Temperature,
        }
    }

    /// The wire code, e.g. `KT` or `HPA`.
    pub fn code(&self) -> String {
        // The serde rename of every variant is a plain string
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(code)) => code,
            _ => unreachable!("unit variants serialize to strings"),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Sub-values delivered by multi-entry METAR properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayVisibility {
    pub runway: Option<String>,
    pub lowest_value: Option<f64>,
    pub highest_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPhenomenon {
    pub intensity: Option<String>,
    pub description: Option<String>,
    pub precipitation: Option<String>,
    pub obscuration: Option<String>,
    pub other: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyCondition {
    pub cover: Option<String>,
    pub height: Option<f64>,
    pub cloud: Option<String>,
}

macro_rules! metar_properties {
    ($( $variant:ident => ($name:literal, $unit:expr, $multi:literal) ),+ $(,)?) => {
        /// Catalogue of the METAR fields the ground data source can decode.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum MetarPropertyType {
            $( $variant, )+
        }

        impl MetarPropertyType {
            pub const ALL: &'static [MetarPropertyType] = &[
                $( MetarPropertyType::$variant, )+
            ];

            /// The snake_case name used in wire payloads and column headers.
            pub fn name(&self) -> &'static str {
                match self {
                    $( MetarPropertyType::$variant => $name, )+
                }
            }

            /// The unit class this property is measured in, if any.
            pub fn unit_class(&self) -> Option<UnitClass> {
                match self {
                    $( MetarPropertyType::$variant => $unit, )+
                }
            }

            /// Whether the property delivers a list of entries per report.
            pub fn has_multiple_entries(&self) -> bool {
                match self {
                    $( MetarPropertyType::$variant => $multi, )+
                }
            }

            pub fn from_name(name: &str) -> Result<Self> {
                let lowered = name.to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .find(|p| p.name() == lowered)
                    .copied()
                    .ok_or_else(|| ApiError::UnknownProperty {
                        name: name.to_string(),
                    })
            }
        }
    };
}

metar_properties! {
    MetarCode => ("metar_code", None, false),
    ReportType => ("report_type", None, false),
    ReportCorrection => ("report_correction", None, false),
    ReportMode => ("report_mode", None, false),
    StationId => ("station_id", None, false),
    Time => ("time", None, false),
    ObservationCycle => ("observation_cycle", None, false),
    WindDirection => ("wind_direction", None, false),
    WindSpeed => ("wind_speed", Some(UnitClass::Speed), false),
    WindGustSpeed => ("wind_gust_speed", Some(UnitClass::Speed), false),
    WindDirectionFrom => ("wind_direction_from", None, false),
    WindDirectionTo => ("wind_direction_to", None, false),
    Visibility => ("visibility", Some(UnitClass::Distance), false),
    VisibilityDirection => ("visibility_direction", None, false),
    MaxVisibility => ("max_visibility", Some(UnitClass::Distance), false),
    MaxVisibilityDirection => ("max_visibility_direction", None, false),
    Temperature => ("temperature", Some(UnitClass::Temperature), false),
    DewPoint => ("dew_point", Some(UnitClass::Temperature), false),
    Pressure => ("pressure", Some(UnitClass::Pressure), false),
    RunwayVisibility => ("runway_visibility", Some(UnitClass::Distance), true),
    CurrentWeather => ("current_weather", None, true),
    RecentWeather => ("recent_weather", None, true),
    SkyConditions => ("sky_conditions", Some(UnitClass::Distance), true),
    RunwayWindshear => ("runway_windshear", None, true),
    WindSpeedPeak => ("wind_speed_peak", Some(UnitClass::Speed), false),
    WindDirectionPeak => ("wind_direction_peak", None, false),
    PeakWindTime => ("peak_wind_time", None, false),
    WindShiftTime => ("wind_shift_time", None, false),
    MaxTemperature6h => ("max_temperature_6h", Some(UnitClass::Temperature), false),
    MinTemperature6h => ("min_temperature_6h", Some(UnitClass::Temperature), false),
    MaxTemperature24h => ("max_temperature_24h", Some(UnitClass::Temperature), false),
    MinTemperature24h => ("min_temperature_24h", Some(UnitClass::Temperature), false),
    PressureAtSeaLevel => ("pressure_at_sea_level", Some(UnitClass::Pressure), false),
    Precipitation1h => ("precipitation_1h", Some(UnitClass::Precipitation), false),
    Precipitation3h => ("precipitation_3h", Some(UnitClass::Precipitation), false),
    Precipitation6h => ("precipitation_6h", Some(UnitClass::Precipitation), false),
    Precipitation24h => ("precipitation_24h", Some(UnitClass::Precipitation), false),
    SnowDepth => ("snow_depth", Some(UnitClass::Distance), false),
    IceAccretion1h => ("ice_accretion_1h", Some(UnitClass::Distance), false),
    IceAccretion3h => ("ice_accretion_3h", Some(UnitClass::Distance), false),
    IceAccretion6h => ("ice_accretion_6h", Some(UnitClass::Distance), false),
}

impl Serialize for MetarPropertyType {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for MetarPropertyType {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name).map_err(serde::de::Error::custom)
    }
}

/// A METAR property together with the unit it is requested or reported in.
///
/// Renders as `wind_speed [KT]` and parses back from that form; the same
/// string form is used in serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetarProperty {
    pub property_type: MetarPropertyType,
    pub unit: Option<Unit>,
}

impl MetarProperty {
    pub fn new(property_type: MetarPropertyType, unit: Option<Unit>) -> Result<Self> {
        let expected = property_type.unit_class();
        match (unit, expected) {
            (Some(unit), Some(class)) if unit.class() == class => Ok(Self {
                property_type,
                unit: Some(unit),
            }),
            (Some(unit), expected) => Err(ApiError::InvalidUnit {
                property: property_type.name().to_string(),
                unit: unit.code(),
                expected: expected
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "no unit".to_string()),
            }),
            (None, Some(class)) => {
                let fallback = class.default_unit();
                tracing::warn!(
                    "Property {} was not supplied with a unit although {} was expected, \
                     defaulting to {}",
                    property_type.name(),
                    class,
                    fallback.code()
                );
                Ok(Self {
                    property_type,
                    unit: Some(fallback),
                })
            }
            (None, None) => Ok(Self {
                property_type,
                unit: None,
            }),
        }
    }

    /// The column name this property appears under in record payloads.
    pub fn column_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MetarProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Some(unit) => write!(f, "{} [{}]", self.property_type.name(), unit.code()),
            None => write!(f, "{}", self.property_type.name()),
        }
    }
}

impl Serialize for MetarProperty {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MetarProperty {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let specification = String::deserialize(deserializer)?;
        specification.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for MetarProperty {
    type Err = ApiError;

    fn from_str(specification: &str) -> Result<Self> {
        let mut parts = specification.split_whitespace();
        let name = parts.next().ok_or_else(|| ApiError::UnknownProperty {
            name: specification.to_string(),
        })?;
        let property_type = MetarPropertyType::from_name(name)?;

        let unit = match parts.next() {
            Some(bracketed) => {
                let code = bracketed
                    .strip_prefix('[')
                    .and_then(|s| s.strip_suffix(']'))
                    .ok_or_else(|| ApiError::Validation {
                        message: format!("Malformed unit specification: {}", bracketed),
                    })?;
                let class =
                    property_type
                        .unit_class()
                        .ok_or_else(|| ApiError::InvalidUnit {
                            property: property_type.name().to_string(),
                            unit: code.to_string(),
                            expected: "no unit".to_string(),
                        })?;
                Some(
                    class
                        .parse_code(code)
                        .ok_or_else(|| ApiError::InvalidUnit {
                            property: property_type.name().to_string(),
                            unit: code.to_string(),
                            expected: class.to_string(),
                        })?,
                )
            }
            None => None,
        };

        MetarProperty::new(property_type, unit)
    }
}

/// One decoded METAR observation for a station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetarRecord {
    pub station: String,
    pub datetime: DateTime<Utc>,
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

impl MetarRecord {
    pub fn new(station: impl Into<String>, datetime: DateTime<Utc>) -> Self {
        Self {
            station: station.into(),
            datetime,
            properties: HashMap::new(),
        }
    }

    pub fn value(&self, property: &MetarProperty) -> Option<&serde_json::Value> {
        self.properties.get(&property.column_name())
    }

    /// Decodes a multi-entry property into its typed entries, e.g.
    /// `sky_conditions` into [`SkyCondition`] or `current_weather` into
    /// [`WeatherPhenomenon`].
    ///
    /// Missing values decode as an empty list; scalar properties are
    /// rejected.
    pub fn entries<T: DeserializeOwned>(&self, property: &MetarProperty) -> Result<Vec<T>> {
        if !property.property_type.has_multiple_entries() {
            return Err(ApiError::Validation {
                message: format!(
                    "Property {} does not carry multiple entries",
                    property.property_type.name()
                ),
            });
        }
        match self.value(property) {
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value.clone()).map_err(ApiError::Serialization),
        }
    }
}

/// Renders a record batch as CSV, one column per requested property.
///
/// Scalar values render bare, multi-entry values as compact JSON.
pub fn records_to_csv(records: &[MetarRecord], properties: &[MetarProperty]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["station".to_string(), "datetime".to_string()];
    header.extend(properties.iter().map(|p| p.column_name()));
    writer.write_record(&header)?;

    for record in records {
        let mut row = vec![record.station.clone(), record.datetime.to_rfc3339()];
        for property in properties {
            let cell = match record.value(property) {
                None | Some(serde_json::Value::Null) => String::new(),
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(value) => serde_json::to_string(value)?,
            };
            row.push(cell);
        }
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .map_err(ApiError::Io)?;
    String::from_utf8(bytes).map_err(|e| ApiError::Validation {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}
