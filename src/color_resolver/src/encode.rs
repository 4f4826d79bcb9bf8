use std::{fmt::Display, str::FromStr};

use itertools::Itertools;
use thiserror::Error;

use crate::geometry::{FACET_COUNT, FACETS_PER_SIDE, Side, render_net};

/// A complete cube coloring: for every facet, the side whose center carries
/// that facet's color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Facelets([Side; FACET_COUNT]);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FaceletParseError {
    #[error("Expected 54 facet letters, found {0}")]
    WrongLength(usize),
    #[error("Invalid letter `{letter}` at facet {position}, expected one of ULFRBD")]
    InvalidLetter { position: usize, letter: char },
}

/// The side order two-phase engines read their input in.
const TWOPHASE_ORDER: [Side; 6] = [Side::U, Side::R, Side::F, Side::D, Side::L, Side::B];

impl Facelets {
    #[must_use]
    pub fn solved() -> Self {
        Facelets(std::array::from_fn(|i| Side::ALL[i / FACETS_PER_SIDE]))
    }

    #[must_use]
    pub fn sides(&self) -> &[Side; FACET_COUNT] {
        &self.0
    }

    #[must_use]
    pub fn side(&self, position: usize) -> Option<Side> {
        Side::of(position).map(|_| self.0[position - 1])
    }

    /// Only called with positions from the geometry tables.
    pub(crate) fn at(&self, position: usize) -> Side {
        self.0[position - 1]
    }

    pub(crate) fn set(&mut self, position: usize, side: Side) {
        self.0[position - 1] = side;
    }

    /// The colors on a cubelet, in the order its facets are listed.
    #[must_use]
    pub fn piece<const N: usize>(&self, piece: [usize; N]) -> [Side; N] {
        piece.map(|position| self.at(position))
    }

    pub(crate) fn paint<const N: usize>(&mut self, piece: [usize; N], colors: [Side; N]) {
        for (position, side) in piece.into_iter().zip(colors) {
            self.set(position, side);
        }
    }

    #[must_use]
    pub fn count(&self, side: Side) -> usize {
        self.0.iter().filter(|&&s| s == side).count()
    }

    /// One letter per facet in U, L, F, R, B, D side order.
    #[must_use]
    pub fn kociemba(&self) -> String {
        self.0.iter().map(|side| side.letter()).collect()
    }

    /// One digit 1 to 6 per facet, numbering the sides in U, L, F, R, B, D
    /// order.
    #[must_use]
    pub fn cubex(&self) -> [u8; FACET_COUNT] {
        self.0.map(|side| side as u8 + 1)
    }

    #[must_use]
    pub fn cubex_string(&self) -> String {
        self.cubex().iter().join("")
    }

    /// The facet letters regrouped in U, R, F, D, L, B side order.
    #[must_use]
    pub fn twophase_input(&self) -> String {
        TWOPHASE_ORDER
            .iter()
            .flat_map(|side| side.positions())
            .map(|position| self.at(position).letter())
            .collect()
    }

    /// Draw the cube as an unfolded net, labelling each facet with the name
    /// of the side its color belongs to.
    #[must_use]
    pub fn render_net(&self, names: &[&str; 6]) -> String {
        render_net(|position| names[self.at(position).index()].to_owned())
    }
}

impl Default for Facelets {
    fn default() -> Self {
        Facelets::solved()
    }
}

impl FromStr for Facelets {
    type Err = FaceletParseError;

    /// Parse the 54 letter form produced by [`Facelets::kociemba`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters = s.trim().chars().collect_vec();
        if letters.len() != FACET_COUNT {
            return Err(FaceletParseError::WrongLength(letters.len()));
        }
        let mut sides = [Side::U; FACET_COUNT];
        for (i, (&letter, slot)) in letters.iter().zip(&mut sides).enumerate() {
            *slot = Side::from_letter(letter).ok_or(FaceletParseError::InvalidLetter {
                position: i + 1,
                letter,
            })?;
        }
        Ok(Facelets(sides))
    }
}

impl Display for Facelets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.kociemba())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_encodings() {
        let solved = Facelets::solved();
        assert_eq!(
            solved.kociemba(),
            "UUUUUUUUULLLLLLLLLFFFFFFFFFRRRRRRRRRBBBBBBBBBDDDDDDDDD"
        );
        assert_eq!(
            solved.cubex_string(),
            "111111111222222222333333333444444444555555555666666666"
        );
        assert_eq!(
            solved.twophase_input(),
            "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB"
        );
        for side in Side::ALL {
            assert_eq!(solved.count(side), 9);
        }
    }

    #[test]
    fn twophase_regroups_sides() {
        let facelets: Facelets = "FLLLULFRFUFUFLDLBRLDDFFUBRURUURRRBBBBDRBBULBDDFRDDUFLD"
            .parse()
            .unwrap();
        assert_eq!(
            facelets.twophase_input(),
            "FLLLULFRFRUURRRBBBLDDFFUBRUDFRDDUFLDUFUFLDLBRBDRBBULBD"
        );
        assert_eq!(facelets.to_string().parse(), Ok(facelets));
    }

    #[test]
    fn cubex_digits() {
        let facelets: Facelets = "BULRUDFDDRDURLLBURLFRUFFFBLFLDRRRBFBFBUBBUDBDULUFDLLDR"
            .parse()
            .unwrap();
        let cubex = facelets.cubex();
        assert_eq!(cubex[0], 5);
        assert_eq!(cubex[1], 1);
        assert_eq!(cubex[2], 2);
        assert_eq!(cubex[5], 6);
        assert!(cubex.iter().all(|digit| (1..=6).contains(digit)));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "UUU".parse::<Facelets>(),
            Err(FaceletParseError::WrongLength(3))
        );
        let mut letters = Facelets::solved().kociemba();
        letters.replace_range(9..10, "X");
        assert_eq!(
            letters.parse::<Facelets>(),
            Err(FaceletParseError::InvalidLetter {
                position: 10,
                letter: 'X'
            })
        );
    }

    #[test]
    fn net_uses_side_names() {
        let names = ["Wh", "OR", "Gr", "Rd", "Bu", "Ye"];
        let net = Facelets::solved().render_net(&names);
        let lines = net.lines().collect_vec();
        assert_eq!(lines[0].trim(), "Wh Wh Wh");
        assert_eq!(lines[4], "OR OR OR  Gr Gr Gr  Rd Rd Rd  Bu Bu Bu");
        assert_eq!(lines[8].trim(), "Ye Ye Ye");
    }
}
