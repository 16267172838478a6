//! Error types for trip loading and aggregation.
//!
//! Library code returns [`TripError`]; the CLI wraps it in `anyhow`.

use thiserror::Error;

use crate::trips::Coordinates;

#[derive(Error, Debug)]
pub enum TripError {
    /// The source table is missing a column or holds a value we cannot use.
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    /// No record uses the station as either a start or an end station.
    #[error("Station not found: {station}")]
    NotFound { station: String },

    /// The same station name was reported at two different locations.
    #[error("Station '{station}' has conflicting coordinates: {first} vs {other}")]
    ConflictingCoordinates {
        station: String,
        first: Coordinates,
        other: Coordinates,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl TripError {
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(station: S) -> Self {
        Self::NotFound {
            station: station.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TripError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = TripError::malformed("missing column 'started_at'");
        assert!(matches!(err, TripError::MalformedInput { .. }));
        assert!(err.to_string().contains("started_at"));

        let err = TripError::not_found("Clark St & Elm St");
        assert!(matches!(err, TripError::NotFound { .. }));
        assert_eq!(err.to_string(), "Station not found: Clark St & Elm St");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TripError = io_err.into();
        assert!(matches!(err, TripError::Io(_)));
    }
}
