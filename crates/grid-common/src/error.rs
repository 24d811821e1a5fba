//! Error types for the gridded data services.

use thiserror::Error;

/// Result type alias using GridError.
pub type GridResult<T> = Result<T, GridError>;

/// Primary error type for gridded data operations.
///
/// Transport codes are only derived at the HTTP boundary through
/// [`GridError::http_status_code`]; the core never maps errors itself.
#[derive(Debug, Clone, Error)]
pub enum GridError {
    /// The metadata table could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unknown layer, missing backing file or missing optional artifact.
    #[error("{0}")]
    NotFound(String),

    /// No latitude/longitude axis could be resolved.
    #[error(
        "no {coordinate} coordinate found. Coords: {coordinates:?}, Variables: {variables:?}, Dimensions: {dimensions:?}"
    )]
    Coordinate {
        coordinate: String,
        coordinates: Vec<String>,
        variables: Vec<String>,
        dimensions: Vec<String>,
    },

    /// A request parameter is outside its valid range.
    #[error("{message}")]
    Range { parameter: String, message: String },

    /// An artifact exists but could not be read or parsed.
    #[error("load error: {0}")]
    Load(String),
}

impl GridError {
    /// Create a range error for a floating point parameter.
    ///
    /// The message states the requested value and the valid range with two
    /// decimals, e.g. `Latitude 75 out of bounds. Valid range: [-70.00, 70.00]`.
    pub fn out_of_range(parameter: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        let parameter = parameter.into();
        let message = format!(
            "{} {} out of bounds. Valid range: [{:.2}, {:.2}]",
            parameter, value, min, max
        );
        Self::Range { parameter, message }
    }

    /// Create a range error for an integer parameter.
    pub fn out_of_range_int(parameter: impl Into<String>, value: i64, min: i64, max: i64) -> Self {
        let parameter = parameter.into();
        let message = format!(
            "{} {} out of bounds. Valid range: [{}, {}]",
            parameter, value, min, max
        );
        Self::Range { parameter, message }
    }

    /// Create a NotFound error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a Load error.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            GridError::Config(_) => "ConfigError",
            GridError::NotFound(_) => "NotFound",
            GridError::Coordinate { .. } => "CoordinateError",
            GridError::Range { .. } => "RangeError",
            GridError::Load(_) => "LoadError",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            GridError::Range { .. } => 400,
            GridError::NotFound(_) => 404,
            GridError::Config(_) | GridError::Coordinate { .. } | GridError::Load(_) => 500,
        }
    }

    /// Whether the caller supplied a bad request.
    pub fn is_client_error(&self) -> bool {
        self.http_status_code() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GridError::config("bad json").http_status_code(), 500);
        assert_eq!(GridError::not_found("x").http_status_code(), 404);
        assert_eq!(GridError::load("truncated").http_status_code(), 500);
        assert_eq!(
            GridError::out_of_range("Latitude", 95.0, -90.0, 90.0).http_status_code(),
            400
        );
        let coord = GridError::Coordinate {
            coordinate: "latitude".to_string(),
            coordinates: vec![],
            variables: vec![],
            dimensions: vec![],
        };
        assert_eq!(coord.http_status_code(), 500);
        assert!(!coord.is_client_error());
    }

    #[test]
    fn test_range_message_states_bounds() {
        let err = GridError::out_of_range("Latitude", 75.0, -70.0, 70.0);
        assert_eq!(
            err.to_string(),
            "Latitude 75 out of bounds. Valid range: [-70.00, 70.00]"
        );
        assert_eq!(err.error_code(), "RangeError");
    }

    #[test]
    fn test_integer_range_message() {
        let err = GridError::out_of_range_int("max_features", 0, 1, 50000);
        assert_eq!(
            err.to_string(),
            "max_features 0 out of bounds. Valid range: [1, 50000]"
        );
    }

    #[test]
    fn test_coordinate_error_lists_inspected_names() {
        let err = GridError::Coordinate {
            coordinate: "latitude".to_string(),
            coordinates: vec!["y".to_string()],
            variables: vec!["y".to_string(), "sst".to_string()],
            dimensions: vec!["y".to_string(), "x".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("latitude"));
        assert!(msg.contains("\"sst\""));
        assert!(msg.contains("\"x\""));
    }
}
