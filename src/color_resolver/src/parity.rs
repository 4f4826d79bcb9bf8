//! Decides whether a full coloring can be reached by turning a real cube.
//!
//! The coloring is first read as cubelets: which home cubelet sits in each
//! slot and how it is flipped or twisted there. A legal cube then has every
//! cubelet exactly once, an even number of flipped edges, a corner twist
//! divisible by three, and matching edge and corner permutation parities.

use log::trace;
use thiserror::Error;

use crate::{
    encode::{FaceletParseError, Facelets},
    geometry::{CORNER_PIECES, EDGE_PIECES, FACETS_PER_SIDE, Side, home_sides},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParityError {
    #[error("Side {side} shows up on {count} facets instead of 9")]
    WrongColorCount { side: Side, count: usize },
    #[error("The {}{} edge is missing or duplicated", .0[0], .0[1])]
    EdgeMissing([Side; 2]),
    #[error("An edge needs flipping")]
    EdgeFlip,
    #[error("The {}{}{} corner is missing or duplicated", .0[0], .0[1], .0[2])]
    CornerMissing([Side; 3]),
    #[error("A corner needs twisting")]
    CornerTwist,
    #[error("Two pieces need exchanging")]
    PiecesNeedExchanging,
    #[error(transparent)]
    Unreadable(#[from] FaceletParseError),
}

/// The cubelet reading of a coloring. `None` marks a slot whose colors match
/// no home cubelet.
struct Cubies {
    edge_perm: [Option<usize>; 12],
    edge_flip: [usize; 12],
    corner_perm: [Option<usize>; 8],
    corner_twist: [usize; 8],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParityOracle;

impl ParityOracle {
    /// # Errors
    ///
    /// Returns the first defect found, checked in the order the variants of
    /// [`ParityError`] are declared.
    pub fn verify(&self, facelets: &Facelets) -> Result<(), ParityError> {
        let result = check(facelets, true);
        trace!(target: "parity", "{facelets}: {result:?}");
        result
    }

    /// Check a 54 letter coloring in U, L, F, R, B, D facet order.
    ///
    /// # Errors
    ///
    /// As [`ParityOracle::verify`], plus [`ParityError::Unreadable`] when
    /// the string is not a coloring.
    pub fn verify_str(&self, facelets: &str) -> Result<(), ParityError> {
        self.verify(&facelets.parse()?)
    }

    /// Check only the edges: every corner is repainted as solved, and a
    /// permutation parity mismatch is ignored since the solved corners may
    /// be what causes it.
    ///
    /// # Errors
    ///
    /// Returns any defect other than [`ParityError::PiecesNeedExchanging`].
    pub fn check_edges(&self, facelets: &Facelets) -> Result<(), ParityError> {
        let mut faked = *facelets;
        for piece in CORNER_PIECES {
            faked.paint(piece, home_sides(piece));
        }
        let result = check(&faked, false);
        trace!(target: "parity", "{faked} (edges only): {result:?}");
        result
    }
}

fn check(facelets: &Facelets, check_exchange: bool) -> Result<(), ParityError> {
    for side in Side::ALL {
        let count = facelets.count(side);
        if count != FACETS_PER_SIDE {
            return Err(ParityError::WrongColorCount { side, count });
        }
    }

    let cubies = Cubies::read(facelets);

    if let Some(missing) = first_missing(&cubies.edge_perm) {
        return Err(ParityError::EdgeMissing(home_sides(EDGE_PIECES[missing])));
    }
    if cubies.edge_flip.iter().sum::<usize>() % 2 != 0 {
        return Err(ParityError::EdgeFlip);
    }

    if let Some(missing) = first_missing(&cubies.corner_perm) {
        return Err(ParityError::CornerMissing(home_sides(CORNER_PIECES[missing])));
    }
    if cubies.corner_twist.iter().sum::<usize>() % 3 != 0 {
        return Err(ParityError::CornerTwist);
    }

    if check_exchange && odd(&cubies.edge_perm) != odd(&cubies.corner_perm) {
        return Err(ParityError::PiecesNeedExchanging);
    }
    Ok(())
}

impl Cubies {
    fn read(facelets: &Facelets) -> Self {
        let mut cubies = Cubies {
            edge_perm: [None; 12],
            edge_flip: [0; 12],
            corner_perm: [None; 8],
            corner_twist: [0; 8],
        };

        for (slot, piece) in EDGE_PIECES.into_iter().enumerate() {
            let [a, b] = facelets.piece(piece);
            for (home, home_piece) in EDGE_PIECES.into_iter().enumerate() {
                let colors = home_sides(home_piece);
                if colors == [a, b] {
                    cubies.edge_perm[slot] = Some(home);
                    break;
                }
                if colors == [b, a] {
                    cubies.edge_perm[slot] = Some(home);
                    cubies.edge_flip[slot] = 1;
                    break;
                }
            }
        }

        for (slot, piece) in CORNER_PIECES.into_iter().enumerate() {
            let colors = facelets.piece(piece);
            // The twist is how far the U or D color has moved from the first facet
            let Some(twist) = colors.iter().position(|side| matches!(side, Side::U | Side::D))
            else {
                continue;
            };
            let turned = [colors[twist], colors[(twist + 1) % 3], colors[(twist + 2) % 3]];
            if let Some(home) = CORNER_PIECES
                .into_iter()
                .position(|home_piece| home_sides(home_piece) == turned)
            {
                cubies.corner_perm[slot] = Some(home);
                cubies.corner_twist[slot] = twist;
            }
        }

        cubies
    }
}

/// The first home cubelet that does not appear exactly once.
fn first_missing<const N: usize>(perm: &[Option<usize>; N]) -> Option<usize> {
    (0..N).find(|&home| perm.iter().filter(|&&p| p == Some(home)).count() != 1)
}

/// Whether a complete permutation is odd, by counting inversions.
fn odd<const N: usize>(perm: &[Option<usize>; N]) -> bool {
    let mut inversions = 0;
    for i in 0..N {
        for j in i + 1..N {
            if perm[i] > perm[j] {
                inversions += 1;
            }
        }
    }
    inversions % 2 == 1
}
