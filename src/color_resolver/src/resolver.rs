use std::{sync::atomic::AtomicBool, time::Instant};

use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    classify::{Palette, PaletteError},
    color::{DistanceCache, PerceptualColor},
    config::{ConfigError, ResolverConfig},
    crayon,
    cubelet::{CubeletResolver, CubeletStats, Costing, Outcome},
    encode::Facelets,
    geometry::{CORNER_PIECES, EDGE_PIECES, Side},
    parity::{ParityError, ParityOracle},
    scan::{Scan, ScanError},
    start, success,
};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
}

/// A category of cubelets that could not be made legal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Defect {
    #[error("Edges: {0}")]
    Edges(ParityError),
    #[error("Corners: {0}")]
    Corners(ParityError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolveStats {
    pub edges: CubeletStats,
    pub corners: CubeletStats,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

impl ResolveStats {
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.edges.total_cost() + self.corners.total_cost()
    }
}

/// The final coloring together with what led to it.
#[derive(Debug, Clone)]
pub struct ResolvedCube {
    facelets: Facelets,
    classified: Facelets,
    palette: Palette,
    names: [&'static str; 6],
    stats: ResolveStats,
}

impl ResolvedCube {
    #[must_use]
    pub fn facelets(&self) -> &Facelets {
        &self.facelets
    }

    /// Every facet's nearest palette color, before cubelets were resolved.
    #[must_use]
    pub fn classified(&self) -> &Facelets {
        &self.classified
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The crayon name of each side's center color.
    #[must_use]
    pub fn names(&self) -> &[&'static str; 6] {
        &self.names
    }

    #[must_use]
    pub fn stats(&self) -> &ResolveStats {
        &self.stats
    }

    /// Positions whose color changed during cubelet resolution.
    pub fn corrections(&self) -> impl Iterator<Item = (usize, Side, Side)> + '_ {
        self.classified
            .sides()
            .iter()
            .zip(self.facelets.sides())
            .enumerate()
            .filter(|(_, (before, after))| before != after)
            .map(|(i, (&before, &after))| (i + 1, before, after))
    }

    #[must_use]
    pub fn render(&self) -> String {
        self.facelets.render_net(&self.names)
    }
}

#[derive(Debug, Clone)]
pub enum Resolution {
    /// Every cubelet is legal and the cube is solvable.
    Resolved(ResolvedCube),
    /// The cheapest coloring was kept although it is not solvable. Usually a
    /// rescan is in order.
    Degraded {
        cube: ResolvedCube,
        defects: Vec<Defect>,
    },
    /// The run was cancelled before it could finish.
    Cancelled,
}

impl Resolution {
    #[must_use]
    pub fn cube(&self) -> Option<&ResolvedCube> {
        match self {
            Resolution::Resolved(cube) | Resolution::Degraded { cube, .. } => Some(cube),
            Resolution::Cancelled => None,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

/// Turns a scan into a legal cube coloring.
#[derive(Debug, Clone, Default)]
pub struct ColorResolver {
    config: ResolverConfig,
    oracle: ParityOracle,
}

impl ColorResolver {
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        ColorResolver {
            config,
            oracle: ParityOracle,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Parse a JSON scan and resolve it.
    ///
    /// # Errors
    ///
    /// See [`Scan::from_json`] and [`ColorResolver::resolve`].
    pub fn resolve_json(&self, json: &str, cancel: &AtomicBool) -> Result<Resolution, ResolveError> {
        self.resolve(&Scan::from_json(json)?, cancel)
    }

    /// Build the palette, classify every facet, then resolve the edges and
    /// the corners. `cancel` is polled throughout; once it is set the run
    /// stops and returns [`Resolution::Cancelled`].
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or when the side centers do not
    /// give six usable reference colors.
    pub fn resolve(&self, scan: &Scan, cancel: &AtomicBool) -> Result<Resolution, ResolveError> {
        self.config.validate()?;
        info!(
            target: "resolve",
            start!("Resolving scan ({} profile, limit {})"),
            self.config.profile,
            self.config.permutation_limit()
        );
        let start = Instant::now();

        let mut cache = DistanceCache::new(self.config.metric);
        let samples: [PerceptualColor; 54] =
            std::array::from_fn(|i| PerceptualColor::from_rgb(scan.at(i + 1)));

        let palette = Palette::from_centers(scan, &mut cache, self.config.min_center_distance)?;
        let names = crayon::name_sides(palette.centers(), &mut cache);
        for side in Side::ALL {
            info!(
                target: "classify",
                "Side {side} center is {} {}",
                names[side.index()],
                palette.color(side).rgb()
            );
        }
        let classified = palette.classify(scan, &mut cache)?;

        let limit = self.config.permutation_limit();
        let mut facelets = classified;
        let mut defects = vec![];
        let mut costing = Costing {
            samples: &samples,
            palette: &palette,
            cache: &mut cache,
        };

        let edges = CubeletResolver {
            target: "resolve_edges",
            pieces: &EDGE_PIECES,
            limit,
        };
        let edge_stats = match edges.run(
            &mut costing,
            &mut facelets,
            |candidate| self.oracle.check_edges(candidate),
            cancel,
        ) {
            Outcome::Resolved(stats) => stats,
            Outcome::Degraded(stats, err) => {
                defects.push(Defect::Edges(err));
                stats
            }
            Outcome::Cancelled => return Ok(Resolution::Cancelled),
        };

        let corners = CubeletResolver {
            target: "resolve_corners",
            pieces: &CORNER_PIECES,
            limit,
        };
        let corner_stats = match corners.run(
            &mut costing,
            &mut facelets,
            |candidate| self.oracle.verify(candidate),
            cancel,
        ) {
            Outcome::Resolved(stats) => stats,
            Outcome::Degraded(stats, err) => {
                defects.push(Defect::Corners(err));
                stats
            }
            Outcome::Cancelled => return Ok(Resolution::Cancelled),
        };

        let (cache_hits, cache_misses) = cache.stats();
        let cube = ResolvedCube {
            facelets,
            classified,
            palette,
            names,
            stats: ResolveStats {
                edges: edge_stats,
                corners: corner_stats,
                cache_hits,
                cache_misses,
            },
        };
        for (position, before, after) in cube.corrections() {
            debug!(target: "resolve", "Facet {position} corrected from {before} to {after}");
        }
        debug!(target: "resolve", "Resolved cube:\n{}", cube.render());

        if defects.is_empty() {
            info!(
                target: "resolve",
                success!("Resolved {} in {:.3}s"),
                cube.facelets,
                start.elapsed().as_secs_f64()
            );
            Ok(Resolution::Resolved(cube))
        } else {
            for defect in &defects {
                warn!(target: "resolve", "Unsolvable coloring kept: {defect}");
            }
            Ok(Resolution::Degraded { cube, defects })
        }
    }
}
