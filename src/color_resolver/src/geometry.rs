use std::{fmt::Display, ops::RangeInclusive};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const FACET_COUNT: usize = 54;
pub const FACETS_PER_SIDE: usize = 9;

/// One side of the cube, in scan order. The discriminant is the side's index
/// in that order.
///
/// ```text
///   U
/// L F R B
///   D
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    U,
    L,
    F,
    R,
    B,
    D,
}

impl Side {
    pub const ALL: [Self; 6] = {
        use Side::*;
        let v = [U, L, F, R, B, D];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Side::U => 'U',
            Side::L => 'L',
            Side::F => 'F',
            Side::R => 'R',
            Side::B => 'B',
            Side::D => 'D',
        }
    }

    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        Self::ALL.into_iter().find(|side| side.letter() == letter)
    }

    /// The side containing `position`, or `None` if it is not in `1..=54`.
    #[must_use]
    pub fn of(position: usize) -> Option<Self> {
        if (1..=FACET_COUNT).contains(&position) {
            Some(Self::ALL[(position - 1) / FACETS_PER_SIDE])
        } else {
            None
        }
    }

    #[must_use]
    pub fn min_pos(self) -> usize {
        self.index() * FACETS_PER_SIDE + 1
    }

    #[must_use]
    pub fn max_pos(self) -> usize {
        self.min_pos() + FACETS_PER_SIDE - 1
    }

    #[must_use]
    pub fn positions(self) -> RangeInclusive<usize> {
        self.min_pos()..=self.max_pos()
    }

    #[must_use]
    pub fn center(self) -> usize {
        self.min_pos() + 4
    }

    #[must_use]
    pub fn edge_positions(self) -> [usize; 4] {
        let min = self.min_pos();
        [min + 1, min + 3, min + 5, min + 7]
    }

    #[must_use]
    pub fn corner_positions(self) -> [usize; 4] {
        let min = self.min_pos();
        [min, min + 2, min + 6, min + 8]
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Side::U => Side::D,
            Side::D => Side::U,
            Side::L => Side::R,
            Side::R => Side::L,
            Side::F => Side::B,
            Side::B => Side::F,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// What kind of cubelet a facet belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    Center,
    Edge,
    Corner,
}

#[must_use]
pub fn facet_kind(position: usize) -> Option<FacetKind> {
    let side = Side::of(position)?;
    Some(match position - side.min_pos() {
        4 => FacetKind::Center,
        1 | 3 | 5 | 7 => FacetKind::Edge,
        _ => FacetKind::Corner,
    })
}

/// The facet pairs of the 12 edge cubelets.
pub const EDGE_PIECES: [[usize; 2]; 12] = [
    [2, 38],
    [4, 11],
    [6, 29],
    [8, 20],
    [15, 22],
    [24, 31],
    [26, 47],
    [13, 42],
    [17, 49],
    [35, 51],
    [33, 40],
    [44, 53],
];

/// The facet triples of the 8 corner cubelets. Each triple lists its facets
/// clockwise, starting from the U or D facet.
pub const CORNER_PIECES: [[usize; 3]; 8] = [
    [1, 10, 39],
    [3, 37, 30],
    [7, 19, 12],
    [9, 28, 21],
    [46, 18, 25],
    [48, 27, 34],
    [52, 45, 16],
    [54, 36, 43],
];

/// The sides a cubelet's facets belong to on a solved cube. Only called with
/// the fixed piece tables above.
pub(crate) fn home_sides<const N: usize>(piece: [usize; N]) -> [Side; N] {
    piece.map(|position| Side::ALL[(position - 1) / FACETS_PER_SIDE])
}

/// Rotate `combo` left by `by` places, keeping its cyclic order.
#[must_use]
pub fn rotate<const N: usize>(combo: [Side; N], by: usize) -> [Side; N] {
    std::array::from_fn(|i| combo[(i + by) % N])
}

/// The lexicographically smallest rotation of `combo`. Two facet colorings
/// describe the same cubelet exactly when their canonical rotations agree.
#[must_use]
pub fn canonical_rotation<const N: usize>(combo: [Side; N]) -> [Side; N] {
    (0..N)
        .map(|by| rotate(combo, by))
        .min()
        .unwrap_or(combo)
}

/// The canonical color combinations of `pieces` on a solved cube, sorted.
pub(crate) fn valid_combinations<const N: usize>(pieces: &[[usize; N]]) -> Vec<[Side; N]> {
    pieces
        .iter()
        .map(|&piece| canonical_rotation(home_sides(piece)))
        .sorted()
        .collect()
}

/// The 12 two-color combinations a legal cube has on its edges, sorted.
#[must_use]
pub fn valid_edge_combinations() -> Vec<[Side; 2]> {
    valid_combinations(&EDGE_PIECES)
}

/// The 8 three-color combinations a legal cube has on its corners, sorted.
/// Each keeps the clockwise order of its colors.
#[must_use]
pub fn valid_corner_combinations() -> Vec<[Side; 3]> {
    valid_combinations(&CORNER_PIECES)
}

/// The facet numbering of the cube laid out as a net.
#[must_use]
pub fn render_layout() -> String {
    render_net(|position| format!("{position:02}"))
}

/// Lay out one label per facet in the shape of an unfolded cube. Every label
/// is padded to the width of the widest one.
pub(crate) fn render_net(label: impl Fn(usize) -> String) -> String {
    let labels = (1..=FACET_COUNT).map(&label).collect_vec();
    let width = labels.iter().map(String::len).max().unwrap_or(0);
    let row = |side: Side, row: usize| {
        (0..3)
            .map(|col| format!("{:>width$}", labels[side.min_pos() - 1 + row * 3 + col]))
            .join(" ")
    };
    let indent = " ".repeat(3 * width + 4);

    let mut lines = Vec::new();
    for r in 0..3 {
        lines.push(format!("{indent}{}", row(Side::U, r)));
    }
    for r in 0..3 {
        lines.push(
            [Side::L, Side::F, Side::R, Side::B]
                .into_iter()
                .map(|side| row(side, r))
                .join("  "),
        );
    }
    for r in 0..3 {
        lines.push(format!("{indent}{}", row(Side::D, r)));
    }
    lines.join("\n")
}
