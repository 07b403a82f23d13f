//! Reference-direction configuration.
//!
//! [`RefDirConfig`] controls the sizing search, zero substitution, and the
//! random fill used when an exact point count is required.

/// How the generator reconciles the lattice size with the requested count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SamplingMode {
    /// Return the full lattice for the smallest section count whose size is
    /// at least `n_points`. The result usually overshoots.
    #[default]
    Lattice,

    /// Return exactly `n_points` directions: the largest lattice that does
    /// not overshoot, padded with uniformly random simplex points.
    Exact,
}

/// Configuration for reference-direction generation.
///
/// # Defaults
///
/// ```
/// use u_mop::ref_dirs::{RefDirConfig, SamplingMode};
///
/// let config = RefDirConfig::default();
/// assert_eq!(config.max_sections, 300);
/// assert_eq!(config.zero_substitute, Some(1e-6));
/// assert_eq!(config.mode, SamplingMode::Lattice);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_mop::ref_dirs::RefDirConfig;
///
/// let config = RefDirConfig::exact()
///     .with_seed(7)
///     .with_max_sections(50)
///     .without_zero_substitute();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefDirConfig {
    /// Upper bound on the number of sections tried by the sizing search.
    ///
    /// When no section count up to this ceiling produces enough points, the
    /// lattice mode fails with [`Error::SizingOutOfRange`](crate::Error::SizingOutOfRange).
    pub max_sections: usize,

    /// Value written over coordinates that are exactly zero.
    ///
    /// Consumers frequently divide by reference-direction coordinates
    /// (e.g. Tchebycheff decomposition). `None` keeps exact zeros.
    /// Must lie in `(0, 1e-5]`. The other coordinates of the row are scaled
    /// down by the added mass, so rows still sum to one. Above
    /// `1 / (2 eps)` dimensions the substitute is capped at `1 / (2 n_dim)`.
    pub zero_substitute: Option<f64>,

    /// Lattice-only or exact-count output.
    pub mode: SamplingMode,

    /// In [`SamplingMode::Exact`], start the random fill with the simplex
    /// corners when the lattice contributes no points.
    pub seed_corners: bool,

    /// Random seed for the fill. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl Default for RefDirConfig {
    fn default() -> Self {
        Self {
            max_sections: 300,
            zero_substitute: Some(1e-6),
            mode: SamplingMode::Lattice,
            seed_corners: true,
            seed: None,
        }
    }
}

impl RefDirConfig {
    /// Exact-count preset.
    pub fn exact() -> Self {
        Self {
            mode: SamplingMode::Exact,
            ..Self::default()
        }
    }

    /// Sets the sizing-search ceiling.
    pub fn with_max_sections(mut self, n: usize) -> Self {
        self.max_sections = n;
        self
    }

    /// Sets the value substituted for exact zeros.
    pub fn with_zero_substitute(mut self, eps: f64) -> Self {
        self.zero_substitute = Some(eps);
        self
    }

    /// Keeps exact zeros in the output.
    pub fn without_zero_substitute(mut self) -> Self {
        self.zero_substitute = None;
        self
    }

    /// Sets the sampling mode.
    pub fn with_mode(mut self, mode: SamplingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables or disables corner seeding of the random fill.
    pub fn with_seed_corners(mut self, seed_corners: bool) -> Self {
        self.seed_corners = seed_corners;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_sections == 0 {
            return Err("max_sections must be at least 1".into());
        }
        if let Some(eps) = self.zero_substitute {
            // rows are rebalanced after substitution; the ceiling keeps eps
            // far below every nonzero lattice coordinate
            if !(eps > 0.0 && eps <= 1e-5) {
                return Err(format!("zero_substitute must be in (0, 1e-5], got {eps}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RefDirConfig::default();
        assert_eq!(config.max_sections, 300);
        assert!(config.seed.is_none());
        assert!(config.seed_corners);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_exact_preset() {
        assert_eq!(RefDirConfig::exact().mode, SamplingMode::Exact);
    }

    #[test]
    fn test_validate_zero_sections() {
        let config = RefDirConfig::default().with_max_sections(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_substitute() {
        assert!(RefDirConfig::default()
            .with_zero_substitute(0.0)
            .validate()
            .is_err());
        assert!(RefDirConfig::default()
            .with_zero_substitute(0.01)
            .validate()
            .is_err());
        assert!(RefDirConfig::default()
            .with_zero_substitute(f64::NAN)
            .validate()
            .is_err());
        assert!(RefDirConfig::default()
            .with_zero_substitute(1e-30)
            .validate()
            .is_ok());
    }
}
