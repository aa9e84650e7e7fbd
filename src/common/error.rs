//! Error types for lazy_roadmap

use thiserror::Error;

/// Boxed error returned by a feasibility oracle
pub type OracleError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for roadmap construction, effort ordering and search
#[derive(Debug, Error)]
pub enum PlanningError {
    /// Unsupported setup detected at construction (dimension, bases, cyclic inclusions)
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// The domain handed to a builder is not a bounded real vector space
    #[error("Precondition violation: {0}")]
    PreconditionViolation(String),
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// A subset name that was never registered with the family
    #[error("Unknown subset: {0}")]
    UnknownSubset(String),
    /// Attempt to overwrite a cached evaluation result with the opposite value
    #[error("Inconsistent evaluation: {0}")]
    InconsistentEvaluation(String),
    /// Predecessor walk failed to reach the start vertex
    #[error("Path reconstruction error: {0}")]
    PathReconstruction(String),
    /// The feasibility oracle itself failed; the evaluation stays unknown
    #[error("Oracle failure evaluating {element} at subset {subset}: {source}")]
    OracleFailure {
        subset: String,
        element: String,
        #[source]
        source: OracleError,
    },
}

/// Result type alias for planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = PlanningError::Configuration("cyclic inclusion".to_string());
        assert_eq!(format!("{}", err), "Configuration error: cyclic inclusion");
    }

    #[test]
    fn test_oracle_failure_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "checker crashed");
        let err = PlanningError::OracleFailure {
            subset: "collision".to_string(),
            element: "edge 3".to_string(),
            source: Box::new(io_err),
        };
        assert!(err.source().is_some());
        assert!(format!("{}", err).contains("checker crashed"));
    }
}
