//! Typed sensor readings.

use chrono::NaiveDateTime;

use crate::error::ClassifierError;

/// One decoded message from the sensor node.
///
/// Immutable after decoding except for `anomaly_flag`, which only the
/// dashboard's annotation path may touch (see
/// [`TelemetryLog::mark_anomaly`](super::TelemetryLog::mark_anomaly)).
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    timestamp: NaiveDateTime,
    temperature: f32,
    air_humidity: f32,
    soil_humidity: f32,
    light_level: bool,
    anomaly_flag: bool,
}

impl SensorReading {
    pub fn new(
        timestamp: NaiveDateTime,
        temperature: f32,
        air_humidity: f32,
        soil_humidity: f32,
        light_level: bool,
    ) -> Self {
        Self {
            timestamp,
            temperature,
            air_humidity,
            soil_humidity,
            light_level,
            anomaly_flag: false,
        }
    }

    /// Source-supplied production time (`waktu`), not receipt time.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Temperature in °C.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Relative air humidity in %.
    pub fn air_humidity(&self) -> f32 {
        self.air_humidity
    }

    /// Soil moisture in %.
    pub fn soil_humidity(&self) -> f32 {
        self.soil_humidity
    }

    /// `true` = bright, `false` = dark.
    pub fn light_level(&self) -> bool {
        self.light_level
    }

    pub fn anomaly_flag(&self) -> bool {
        self.anomaly_flag
    }

    pub(crate) fn set_anomaly_flag(&mut self, flagged: bool) {
        self.anomaly_flag = flagged;
    }
}

/// Classifier input, in the column order the model was trained with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub temperature: f32,
    pub air_humidity: f32,
    pub soil_humidity: f32,
    /// 1.0 when bright, 0.0 when dark.
    pub light: f32,
}

impl Features {
    /// Number of model inputs.
    pub const COUNT: usize = 4;

    /// Feature names, indexed like [`Features::as_array`].
    pub const NAMES: [&'static str; Self::COUNT] =
        ["temperature", "air_humidity", "soil_humidity", "light"];

    /// Extract and validate the feature vector for one reading.
    pub fn from_reading(reading: &SensorReading) -> Result<Self, ClassifierError> {
        let features = Self {
            temperature: reading.temperature(),
            air_humidity: reading.air_humidity(),
            soil_humidity: reading.soil_humidity(),
            light: if reading.light_level() { 1.0 } else { 0.0 },
        };
        features.validate()?;
        Ok(features)
    }

    pub fn as_array(&self) -> [f32; Self::COUNT] {
        [
            self.temperature,
            self.air_humidity,
            self.soil_humidity,
            self.light,
        ]
    }

    pub fn validate(&self) -> Result<(), ClassifierError> {
        for (value, name) in self.as_array().iter().zip(Self::NAMES) {
            if !value.is_finite() {
                return Err(ClassifierError::BadFeatures(name));
            }
        }
        Ok(())
    }
}
