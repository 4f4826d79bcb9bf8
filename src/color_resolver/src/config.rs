use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How much compute the resolver may spend on the exhaustive search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeProfile {
    /// A desktop or server machine
    Server,
    /// The robot's own controller
    Embedded,
}

impl Default for ComputeProfile {
    #[cfg(embedded)]
    fn default() -> Self {
        ComputeProfile::Embedded
    }

    #[cfg(not(embedded))]
    fn default() -> Self {
        ComputeProfile::Server
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown compute profile `{0}`, expected `server` or `embedded`")]
pub struct ProfileParseError(String);

impl FromStr for ComputeProfile {
    type Err = ProfileParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server" => Ok(ComputeProfile::Server),
            "embedded" => Ok(ComputeProfile::Embedded),
            _ => Err(ProfileParseError(s.to_owned())),
        }
    }
}

impl Display for ComputeProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ComputeProfile::Server => "server",
            ComputeProfile::Embedded => "embedded",
        })
    }
}

/// Which color difference formula to compare samples with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    #[default]
    Ciede2000,
    Cmc,
    Cie76,
}

/// Resolver configuration. Every field has a default, so an empty TOML table
/// is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    pub profile: ComputeProfile,
    /// Largest number of permutations searched exhaustively on a server
    pub server_permutation_limit: u64,
    /// Largest number of permutations searched exhaustively on the robot
    pub embedded_permutation_limit: u64,
    pub metric: MetricKind,
    /// Two side centers closer than this are treated as the same color
    pub min_center_distance: f64,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("The {0} permutation limit must be at least one")]
    ZeroPermutationLimit(ComputeProfile),
    #[error("The minimum center distance must be a finite, non-negative number; got {0}")]
    InvalidCenterDistance(f64),
}

impl Default for ResolverConfig {
    fn default() -> Self {
        // 7! = 5040 and 6! = 720
        ResolverConfig {
            profile: ComputeProfile::default(),
            server_permutation_limit: 5040,
            embedded_permutation_limit: 720,
            metric: MetricKind::default(),
            min_center_distance: 5.0,
        }
    }
}

impl ResolverConfig {
    #[must_use]
    pub fn with_profile(mut self, profile: ComputeProfile) -> Self {
        self.profile = profile;
        self
    }

    /// The permutation limit for the active profile.
    #[must_use]
    pub fn permutation_limit(&self) -> u64 {
        match self.profile {
            ComputeProfile::Server => self.server_permutation_limit,
            ComputeProfile::Embedded => self.embedded_permutation_limit,
        }
    }

    /// # Errors
    ///
    /// Fails if a permutation limit is zero or the center distance is
    /// negative or not finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_permutation_limit == 0 {
            return Err(ConfigError::ZeroPermutationLimit(ComputeProfile::Server));
        }
        if self.embedded_permutation_limit == 0 {
            return Err(ConfigError::ZeroPermutationLimit(ComputeProfile::Embedded));
        }
        if !self.min_center_distance.is_finite() || self.min_center_distance < 0.0 {
            return Err(ConfigError::InvalidCenterDistance(self.min_center_distance));
        }
        Ok(())
    }
}
