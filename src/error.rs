//! Unified error types for the smart garden processes.
//!
//! A single `Error` enum that every subsystem can convert into.  The
//! binaries' startup path and the dashboard's receive loop return
//! [`Result`] and rely on `?` for the conversion.  None of these are fatal
//! on their own: the binaries decide which ones abort the process.

use core::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the library funnels into this type.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A data-topic payload could not be turned into a reading.
    Decode(DecodeError),
    /// The classifier artifact or a prediction failed.
    Classifier(ClassifierError),
    /// A broker operation failed.
    Comms(CommsError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Classifier(e) => write!(f, "classifier: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Why a telemetry payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload bytes are not valid UTF-8.
    Utf8,
    /// Payload is not a JSON object.
    Json(String),
    /// A required wire field is absent.
    MissingField(&'static str),
    /// A wire field has the wrong type or a non-finite value.
    InvalidField(&'static str),
    /// `waktu` is not in any accepted timestamp format.
    InvalidTimestamp(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 => write!(f, "payload is not UTF-8"),
            Self::Json(msg) => write!(f, "malformed JSON: {msg}"),
            Self::MissingField(name) => write!(f, "missing field '{name}'"),
            Self::InvalidField(name) => write!(f, "invalid value for '{name}'"),
            Self::InvalidTimestamp(raw) => write!(f, "unrecognised timestamp '{raw}'"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Classifier errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    /// The model file does not exist or cannot be read.
    ArtifactMissing(PathBuf),
    /// The model file was read but its contents are unusable.
    ArtifactInvalid(String),
    /// The feature vector contains a non-finite value.
    BadFeatures(&'static str),
    /// The model produced a class outside `0..=2`.
    UnknownLabel(u8),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArtifactMissing(path) => {
                write!(f, "model artifact not found: {}", path.display())
            }
            Self::ArtifactInvalid(msg) => write!(f, "model artifact invalid: {msg}"),
            Self::BadFeatures(name) => write!(f, "feature '{name}' is not finite"),
            Self::UnknownLabel(label) => write!(f, "unknown class label {label}"),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<ClassifierError> for Error {
    fn from(e: ClassifierError) -> Self {
        Self::Classifier(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommsError {
    /// The publish request could not be handed to the transport.
    PublishFailed(String),
    /// The broker could not be reached.
    ConnectFailed(String),
    /// A subscribe request was rejected locally.
    SubscribeFailed(String),
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PublishFailed(msg) => write!(f, "MQTT publish failed: {msg}"),
            Self::ConnectFailed(msg) => write!(f, "MQTT connect failed: {msg}"),
            Self::SubscribeFailed(msg) => write!(f, "MQTT subscribe failed: {msg}"),
        }
    }
}

impl std::error::Error for CommsError {}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from [`ConfigPort`](crate::app::ports::ConfigPort) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found (first run); callers fall back to defaults.
    NotFound,
    /// The config source exists but could not be read.
    IoError(String),
    /// The config source failed to deserialize.
    Corrupted(String),
    /// A config field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::IoError(msg) => write!(f, "I/O error: {msg}"),
            Self::Corrupted(msg) => write!(f, "config corrupted: {msg}"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
