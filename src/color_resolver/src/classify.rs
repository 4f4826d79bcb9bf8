use itertools::Itertools;
use log::{debug, info};
use thiserror::Error;

use crate::{
    color::{ColorMetric, DistanceCache, PerceptualColor},
    encode::Facelets,
    geometry::{FacetKind, Side, facet_kind},
    scan::Scan,
    start, success,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaletteError {
    #[error(
        "The {first} and {second} centers are only {distance:.2} apart and cannot be told apart"
    )]
    IndistinctCenters {
        first: Side,
        second: Side,
        distance: f64,
    },
    #[error("No facet outside the center matched the {0} side's color")]
    UnmatchedSide(Side),
}

/// The six reference colors, one per side, taken from the side centers.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    centers: [PerceptualColor; 6],
}

impl Palette {
    /// # Errors
    ///
    /// Fails if two centers are closer than `min_distance`.
    pub fn from_centers<M: ColorMetric>(
        scan: &Scan,
        cache: &mut DistanceCache<M>,
        min_distance: f64,
    ) -> Result<Self, PaletteError> {
        let centers = Side::ALL.map(|side| PerceptualColor::from_rgb(scan.at(side.center())));

        for (first, second) in Side::ALL.into_iter().tuple_combinations() {
            let distance = cache.distance(&centers[first.index()], &centers[second.index()]);
            if distance < min_distance {
                return Err(PaletteError::IndistinctCenters {
                    first,
                    second,
                    distance,
                });
            }
        }

        Ok(Palette { centers })
    }

    #[must_use]
    pub fn color(&self, side: Side) -> &PerceptualColor {
        &self.centers[side.index()]
    }

    #[must_use]
    pub fn centers(&self) -> &[PerceptualColor; 6] {
        &self.centers
    }

    /// The side whose reference color is closest to `color`, and how close it
    /// is. Ties go to the side that comes first.
    pub fn nearest<M: ColorMetric>(
        &self,
        color: &PerceptualColor,
        cache: &mut DistanceCache<M>,
    ) -> (Side, f64) {
        let mut best = (Side::U, f64::INFINITY);
        for side in Side::ALL {
            let distance = cache.distance(color, self.color(side));
            if distance < best.1 {
                best = (side, distance);
            }
        }
        best
    }

    /// Give every facet the side of its nearest reference color. Centers are
    /// their own side.
    ///
    /// # Errors
    ///
    /// Fails if some side's color was not picked by any other facet, which
    /// means its center does not look like anything else on the cube.
    pub fn classify<M: ColorMetric>(
        &self,
        scan: &Scan,
        cache: &mut DistanceCache<M>,
    ) -> Result<Facelets, PaletteError> {
        info!(target: "classify", start!("Classifying facets"));

        let mut sides = Facelets::solved();
        let mut matched = [0usize; 6];
        for (position, rgb) in scan.iter() {
            if facet_kind(position) == Some(FacetKind::Center) {
                continue;
            }
            let (side, distance) = self.nearest(&PerceptualColor::from_rgb(rgb), cache);
            debug!(target: "classify", "Facet {position:>2} {rgb} matches {side} ({distance:.2})");
            sides.set(position, side);
            matched[side.index()] += 1;
        }

        if let Some(side) = Side::ALL.into_iter().find(|side| matched[side.index()] == 0) {
            return Err(PaletteError::UnmatchedSide(side));
        }

        info!(target: "classify", success!("Classified facets"));
        Ok(sides)
    }
}
