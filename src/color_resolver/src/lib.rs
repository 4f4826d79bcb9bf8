#![warn(clippy::pedantic)]
#![allow(clippy::similar_names, clippy::too_many_lines)]

//! Recovers a legal, solvable cube state from 54 noisy RGB samples taken by
//! the robot's color sensor.
//!
//! The pipeline is: build a six color reference palette from the side
//! centers, classify every facet against it, then resolve the 12 edge and 8
//! corner cubelets so that every legal color combination is used exactly once
//! and the whole state passes a parity check. The final state is encoded for
//! the external move solvers.

pub mod classify;
pub mod color;
pub mod config;
pub mod crayon;
pub(crate) mod cubelet;
pub mod encode;
pub mod geometry;
pub mod parity;
pub(crate) mod permutator;
pub mod resolver;
pub mod scan;

pub use classify::{Palette, PaletteError};
pub use color::{ColorMetric, DistanceCache, PerceptualColor, Rgb};
pub use config::{ComputeProfile, ConfigError, MetricKind, ProfileParseError, ResolverConfig};
pub use cubelet::{CubeletStats, needs_reduction};
pub use encode::{FaceletParseError, Facelets};
pub use geometry::Side;
pub use parity::{ParityError, ParityOracle};
pub use resolver::{ColorResolver, Defect, Resolution, ResolveError, ResolveStats, ResolvedCube};
pub use scan::{Scan, ScanError};

#[macro_export]
macro_rules! start {
    ($msg:expr) => {
        concat!("⏳ ", $msg)
    };
}

#[macro_export]
macro_rules! working {
    ($msg:expr) => {
        concat!("🛠  ", $msg)
    };
}

#[macro_export]
macro_rules! success {
    ($msg:expr) => {
        concat!("✅ ", $msg)
    };
}
