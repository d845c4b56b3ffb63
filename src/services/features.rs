//! Feature derivation for the rainfall classifier.
//!
//! Turns an operator's [`RawWeatherRecord`] into the 18-field vector the
//! classifier was trained on. The classifier consumes columns by position,
//! so the order in [`FEATURE_SCHEMA`] is part of the contract: a vector with
//! the right values in the wrong order produces wrong predictions without
//! any error.

use serde::Serialize;
use std::f64::consts::PI;
use utoipa::ToSchema;

use crate::services::inputs::RawWeatherRecord;

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 18;

/// A named, versioned column order shared by the deriver and model artifacts.
#[derive(Debug)]
pub struct FeatureSchema {
    pub version: &'static str,
    pub names: [&'static str; FEATURE_COUNT],
}

impl FeatureSchema {
    /// Describe how `names` differs from this schema, if at all.
    pub fn mismatch<S: AsRef<str>>(&self, names: &[S]) -> Option<String> {
        if names.len() != FEATURE_COUNT {
            return Some(format!(
                "expected {} features, got {}",
                FEATURE_COUNT,
                names.len()
            ));
        }
        for (i, (found, expected)) in names.iter().zip(self.names).enumerate() {
            let found: &str = found.as_ref();
            if found != expected {
                return Some(format!(
                    "column {} is '{}', expected '{}'",
                    i, found, expected
                ));
            }
        }
        None
    }
}

/// Column order the current classifier was trained with.
pub const FEATURE_SCHEMA: FeatureSchema = FeatureSchema {
    version: "rainfall-features/v1",
    names: [
        "cloud",
        "day",
        "dewpoint",
        "dewpoint_maxtemp",
        "dewpoint_temp",
        "dewpoint_week",
        "humidity",
        "maxtemp",
        "mintemp",
        "pressure",
        "sin_day",
        "sunshine",
        "temp_diff",
        "temperature",
        "week",
        "winddirection",
        "winddirection_windspeed",
        "windspeed",
    ],
};

/// Day-of-year offset of the seasonal sine (two cycles per year).
const SIN_DAY_SHIFT: f64 = 50.0;

/// Engineered feature vector.
///
/// Fields are declared in [`FEATURE_SCHEMA`] order so that serialized output
/// lists them in the same order the classifier consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DerivedFeatureVector {
    pub cloud: f64,
    pub day: f64,
    pub dewpoint: f64,
    /// maxtemp - dewpoint
    pub dewpoint_maxtemp: f64,
    /// temperature - dewpoint
    pub dewpoint_temp: f64,
    /// dewpoint * week
    pub dewpoint_week: f64,
    pub humidity: f64,
    pub maxtemp: f64,
    pub mintemp: f64,
    pub pressure: f64,
    /// sin(4π(day - 50) / 365)
    pub sin_day: f64,
    pub sunshine: f64,
    /// maxtemp - mintemp (not clamped)
    pub temp_diff: f64,
    pub temperature: f64,
    /// floor(day / 7)
    pub week: f64,
    pub winddirection: f64,
    /// winddirection * windspeed
    pub winddirection_windspeed: f64,
    pub windspeed: f64,
}

impl DerivedFeatureVector {
    /// Values in [`FEATURE_SCHEMA`] order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.cloud,
            self.day,
            self.dewpoint,
            self.dewpoint_maxtemp,
            self.dewpoint_temp,
            self.dewpoint_week,
            self.humidity,
            self.maxtemp,
            self.mintemp,
            self.pressure,
            self.sin_day,
            self.sunshine,
            self.temp_diff,
            self.temperature,
            self.week,
            self.winddirection,
            self.winddirection_windspeed,
            self.windspeed,
        ]
    }

    /// (name, value) pairs in [`FEATURE_SCHEMA`] order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_SCHEMA.names.into_iter().zip(self.to_array())
    }
}

/// Derive the classifier's feature vector from a raw observation.
///
/// Pure and total over any record; range enforcement happens when the
/// record is collected.
pub fn derive_features(raw: &RawWeatherRecord) -> DerivedFeatureVector {
    let week = raw.day.div_euclid(7);
    let day = raw.day as f64;
    let week = week as f64;
    let winddirection = raw.winddirection as f64;

    DerivedFeatureVector {
        cloud: raw.cloud as f64,
        day,
        dewpoint: raw.dewpoint,
        dewpoint_maxtemp: raw.maxtemp - raw.dewpoint,
        dewpoint_temp: raw.temperature - raw.dewpoint,
        dewpoint_week: raw.dewpoint * week,
        humidity: raw.humidity as f64,
        maxtemp: raw.maxtemp,
        mintemp: raw.mintemp,
        pressure: raw.pressure,
        sin_day: (4.0 * PI * (day - SIN_DAY_SHIFT) / 365.0).sin(),
        sunshine: raw.sunshine,
        temp_diff: raw.maxtemp - raw.mintemp,
        temperature: raw.temperature,
        week,
        winddirection,
        winddirection_windspeed: winddirection * raw.windspeed,
        windspeed: raw.windspeed,
    }
}
