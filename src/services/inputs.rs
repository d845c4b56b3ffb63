//! Operator input definitions and collection.
//!
//! The eleven weather measurements an operator can enter, with the bounds
//! the page sliders enforce. The same table drives server-side validation
//! of JSON submissions, so a value the page can't produce is rejected here
//! too.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Errors raised while turning a submission into a [`RawWeatherRecord`].
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Field '{field}' out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Definition of a single bounded input control.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InputField {
    /// Record field name (e.g. "dewpoint")
    pub name: &'static str,
    /// Label shown next to the slider
    pub label: &'static str,
    /// Inclusive lower bound
    pub min: f64,
    /// Inclusive upper bound
    pub max: f64,
    /// Initial slider position
    pub default: f64,
    /// Slider increment
    pub step: f64,
    /// Whether the field only takes whole numbers
    pub integer: bool,
}

const fn int_field(
    name: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    default: f64,
) -> InputField {
    InputField {
        name,
        label,
        min,
        max,
        default,
        step: 1.0,
        integer: true,
    }
}

const fn float_field(
    name: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    default: f64,
) -> InputField {
    InputField {
        name,
        label,
        min,
        max,
        default,
        step: 0.1,
        integer: false,
    }
}

/// All operator inputs, in record order.
pub static INPUT_FIELDS: [InputField; 11] = [
    int_field("cloud", "Cloud (%)", 0.0, 100.0, 50.0),
    int_field("day", "Day of the Year", 1.0, 365.0, 1.0),
    float_field("dewpoint", "Dew Point (°C)", -10.0, 30.0, 10.0),
    int_field("humidity", "Humidity (%)", 0.0, 100.0, 60.0),
    float_field("maxtemp", "Max Temp (°C)", -10.0, 40.0, 30.0),
    float_field("mintemp", "Min Temp (°C)", -10.0, 35.0, 15.0),
    float_field("pressure", "Pressure (hPa)", 990.0, 1050.0, 1010.0),
    float_field("sunshine", "Sunshine Hours", 0.0, 15.0, 7.5),
    float_field("temperature", "Temperature (°C)", -10.0, 45.0, 22.0),
    int_field("winddirection", "Wind Direction (°)", 0.0, 360.0, 180.0),
    float_field("windspeed", "Wind Speed (km/h)", 0.0, 80.0, 15.0),
];

/// Look up an input definition by record field name.
pub fn input_field(name: &str) -> Option<&'static InputField> {
    INPUT_FIELDS.iter().find(|f| f.name == name)
}

/// One complete weather observation entered by the operator.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RawWeatherRecord {
    /// Cloud cover (%)
    pub cloud: i64,
    /// Day of the year (1-365)
    pub day: i64,
    /// Dew point (°C)
    pub dewpoint: f64,
    /// Relative humidity (%)
    pub humidity: i64,
    /// Daily maximum temperature (°C)
    pub maxtemp: f64,
    /// Daily minimum temperature (°C)
    pub mintemp: f64,
    /// Air pressure (hPa)
    pub pressure: f64,
    /// Sunshine duration (hours)
    pub sunshine: f64,
    /// Mean temperature (°C)
    pub temperature: f64,
    /// Wind direction (degrees)
    pub winddirection: i64,
    /// Wind speed (km/h)
    pub windspeed: f64,
}

impl Default for RawWeatherRecord {
    /// The initial slider positions.
    fn default() -> Self {
        Self {
            cloud: 50,
            day: 1,
            dewpoint: 10.0,
            humidity: 60,
            maxtemp: 30.0,
            mintemp: 15.0,
            pressure: 1010.0,
            sunshine: 7.5,
            temperature: 22.0,
            winddirection: 180,
            windspeed: 15.0,
        }
    }
}

/// A submission as received on the wire. Every field may be absent; absent
/// fields are reported, never defaulted.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RawWeatherInput {
    pub cloud: Option<i64>,
    pub day: Option<i64>,
    pub dewpoint: Option<f64>,
    pub humidity: Option<i64>,
    pub maxtemp: Option<f64>,
    pub mintemp: Option<f64>,
    pub pressure: Option<f64>,
    pub sunshine: Option<f64>,
    pub temperature: Option<f64>,
    pub winddirection: Option<i64>,
    pub windspeed: Option<f64>,
}

impl From<&RawWeatherRecord> for RawWeatherInput {
    fn from(r: &RawWeatherRecord) -> Self {
        Self {
            cloud: Some(r.cloud),
            day: Some(r.day),
            dewpoint: Some(r.dewpoint),
            humidity: Some(r.humidity),
            maxtemp: Some(r.maxtemp),
            mintemp: Some(r.mintemp),
            pressure: Some(r.pressure),
            sunshine: Some(r.sunshine),
            temperature: Some(r.temperature),
            winddirection: Some(r.winddirection),
            windspeed: Some(r.windspeed),
        }
    }
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, InputError> {
    value.ok_or(InputError::MissingField(field))
}

/// Check a value against its field's inclusive bounds.
///
/// NaN never satisfies a range comparison, so it is rejected as well.
fn check_range(field: &'static str, value: f64) -> Result<(), InputError> {
    let Some(def) = input_field(field) else {
        return Ok(());
    };
    if value.is_finite() && value >= def.min && value <= def.max {
        Ok(())
    } else {
        Err(InputError::OutOfRange {
            field,
            value,
            min: def.min,
            max: def.max,
        })
    }
}

/// Turn a submission into a complete, in-range record.
///
/// Fields are checked in record order; the first problem found is returned.
pub fn collect(input: RawWeatherInput) -> Result<RawWeatherRecord, InputError> {
    let record = RawWeatherRecord {
        cloud: require(input.cloud, "cloud")?,
        day: require(input.day, "day")?,
        dewpoint: require(input.dewpoint, "dewpoint")?,
        humidity: require(input.humidity, "humidity")?,
        maxtemp: require(input.maxtemp, "maxtemp")?,
        mintemp: require(input.mintemp, "mintemp")?,
        pressure: require(input.pressure, "pressure")?,
        sunshine: require(input.sunshine, "sunshine")?,
        temperature: require(input.temperature, "temperature")?,
        winddirection: require(input.winddirection, "winddirection")?,
        windspeed: require(input.windspeed, "windspeed")?,
    };

    check_range("cloud", record.cloud as f64)?;
    check_range("day", record.day as f64)?;
    check_range("dewpoint", record.dewpoint)?;
    check_range("humidity", record.humidity as f64)?;
    check_range("maxtemp", record.maxtemp)?;
    check_range("mintemp", record.mintemp)?;
    check_range("pressure", record.pressure)?;
    check_range("sunshine", record.sunshine)?;
    check_range("temperature", record.temperature)?;
    check_range("winddirection", record.winddirection as f64)?;
    check_range("windspeed", record.windspeed)?;

    Ok(record)
}
