use std::collections::BTreeMap;

use thiserror::Error;

use crate::{
    color::Rgb,
    geometry::{FACET_COUNT, Side},
};

/// One raw sensor sample for each of the 54 facets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    samples: [Rgb; FACET_COUNT],
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("No sample for facet {0}")]
    MissingFacet(usize),
    #[error("Facet {0} does not exist; facets are numbered 1 to 54")]
    UnexpectedFacet(usize),
    #[error("Malformed scan: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl Scan {
    /// # Errors
    ///
    /// Fails unless `samples` has exactly one entry for every position
    /// `1..=54`.
    pub fn new(samples: BTreeMap<usize, Rgb>) -> Result<Self, ScanError> {
        if let Some(&position) = samples
            .keys()
            .find(|&&position| Side::of(position).is_none())
        {
            return Err(ScanError::UnexpectedFacet(position));
        }
        let mut out = [Rgb::new(0, 0, 0); FACET_COUNT];
        for (position, slot) in (1..=FACET_COUNT).zip(&mut out) {
            *slot = *samples
                .get(&position)
                .ok_or(ScanError::MissingFacet(position))?;
        }
        Ok(Scan { samples: out })
    }

    /// Parse a JSON object mapping `"1"`..`"54"` to `[r, g, b]` or `"#rrggbb"`.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or color values and on a missing or
    /// out-of-range facet.
    pub fn from_json(json: &str) -> Result<Self, ScanError> {
        Scan::new(serde_json::from_str(json)?)
    }

    /// Build a scan by sampling every position.
    #[must_use]
    pub fn from_fn(mut sample: impl FnMut(usize) -> Rgb) -> Self {
        Scan {
            samples: std::array::from_fn(|i| sample(i + 1)),
        }
    }

    #[must_use]
    pub fn rgb(&self, position: usize) -> Option<Rgb> {
        Side::of(position).map(|_| self.samples[position - 1])
    }

    /// Only called with positions from the geometry tables.
    pub(crate) fn at(&self, position: usize) -> Rgb {
        self.samples[position - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Rgb)> + '_ {
        self.samples.iter().enumerate().map(|(i, &rgb)| (i + 1, rgb))
    }

    /// # Errors
    ///
    /// Only fails if serialization itself fails.
    pub fn to_json(&self) -> Result<String, ScanError> {
        let map: BTreeMap<String, Rgb> = self
            .iter()
            .map(|(position, rgb)| (position.to_string(), rgb))
            .collect();
        Ok(serde_json::to_string_pretty(&map)?)
    }
}
