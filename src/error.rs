//! Crate-wide error type.

/// Errors surfaced by evaluation, reference-direction generation, and
/// Pareto-front lookup.
///
/// None of these are retried internally: every computation in this crate is
/// deterministic for a given input, so a second attempt cannot succeed where
/// the first failed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the width of a design matrix (or the length of a single
    /// design vector) differs from the problem's `n_var`.
    #[error("input dimension mismatch: got {got} variables, expected n_var = {expected}")]
    DimensionMismatch {
        /// The problem's number of variables.
        expected: usize,
        /// The number of columns actually supplied.
        got: usize,
    },

    /// Returned for arguments or configurations that make no sense, such as
    /// a zero-dimensional simplex or lower bounds above upper bounds.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Returned when no lattice size under the configured ceiling yields
    /// enough reference directions.
    #[error(
        "no simplex lattice with at most {max_sections} sections yields {n_points} points in {n_dim} dimensions"
    )]
    SizingOutOfRange {
        /// Requested number of points.
        n_points: usize,
        /// Requested simplex dimension.
        n_dim: usize,
        /// The sizing-search ceiling that was exhausted.
        max_sections: usize,
    },

    /// Returned when a problem has neither a closed-form front nor a
    /// tabulated one.
    #[error("pareto front unavailable for problem '{problem}'")]
    ParetoFrontUnavailable {
        /// Name of the problem.
        problem: String,
    },

    /// Returned when an evaluation requests an output other than `F`, `G`,
    /// or `CV`.
    #[error("unknown return key '{0}': expected one of F, G, CV")]
    UnknownReturnKey(String),

    /// Returned when a registry lookup does not match any known problem.
    #[error("unknown problem '{0}'")]
    UnknownProblem(String),

    /// Returned when a tabulated front exists but cannot be parsed.
    #[error("malformed front resource '{key}': {reason}")]
    Resource {
        /// The resource key (usually the problem name).
        key: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Returned when reading a tabulated front fails for a reason other
    /// than the file being absent.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_names_both_sizes() {
        let err = Error::DimensionMismatch {
            expected: 2,
            got: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('2'), "{msg}");
        assert!(msg.contains('3'), "{msg}");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
