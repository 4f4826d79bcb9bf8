//! Assigns the legal color combinations to the edge or corner cubelets.
//!
//! Every legal combination is given to exactly one cubelet. While there are
//! too many combinations left to try every assignment, the single cheapest
//! (cubelet, combination) pair is fixed greedily. The remaining assignments
//! are then all scored, and the cheapest one the parity oracle accepts wins.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Instant,
};

use log::{debug, info, trace, warn};

use crate::{
    classify::Palette,
    color::{ColorMetric, DistanceCache, PerceptualColor},
    encode::Facelets,
    geometry::{FACET_COUNT, Side, rotate, valid_combinations},
    parity::ParityError,
    permutator::{factorial, next_permutation},
    start, success, working,
};

/// Whether `len` remaining combinations have more permutations than `limit`,
/// which is when the greedy phase has to fix another cubelet first.
#[must_use]
pub fn needs_reduction(len: usize, limit: u64) -> bool {
    factorial(len) > limit
}

/// What one resolution run did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CubeletStats {
    /// Cubelets fixed by the greedy phase
    pub greedy_assignments: usize,
    /// Assignments scored by the exhaustive phase
    pub permutations_scored: usize,
    /// Assignments handed to the parity oracle
    pub candidates_tried: usize,
    pub greedy_cost: f64,
    pub selected_cost: f64,
}

impl CubeletStats {
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.greedy_cost + self.selected_cost
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outcome {
    Resolved(CubeletStats),
    /// No assignment passed the oracle. The cheapest one was committed and
    /// this is what the oracle had to say about it.
    Degraded(CubeletStats, ParityError),
    Cancelled,
}

/// The per-facet samples and the means to compare them with the palette.
pub(crate) struct Costing<'a, M: ColorMetric> {
    pub samples: &'a [PerceptualColor; FACET_COUNT],
    pub palette: &'a Palette,
    pub cache: &'a mut DistanceCache<M>,
}

impl<M: ColorMetric> Costing<'_, M> {
    /// The cheapest way to lay `combo` on `piece` without breaking its cyclic
    /// order, and what it costs. Ties go to the smallest rotation.
    fn orient<const N: usize>(&mut self, piece: [usize; N], combo: [Side; N]) -> (f64, [Side; N]) {
        let mut best = (f64::INFINITY, combo);
        for by in 0..N {
            let oriented = rotate(combo, by);
            let cost = piece
                .iter()
                .zip(oriented)
                .map(|(&position, side)| {
                    self.cache
                        .distance(&self.samples[position - 1], self.palette.color(side))
                })
                .sum::<f64>();
            if cost < best.0 {
                best = (cost, oriented);
            }
        }
        best
    }
}

/// Resolves one category of cubelets.
pub(crate) struct CubeletResolver<'a, const N: usize> {
    /// Log target
    pub target: &'static str,
    pub pieces: &'a [[usize; N]],
    pub limit: u64,
}

fn cancelled(cancel: &AtomicBool) -> bool {
    cancel.load(Ordering::Relaxed)
}

impl<const N: usize> CubeletResolver<'_, N> {
    /// Recolor every cubelet in `facelets`. Nothing is written to `facelets`
    /// if the run is cancelled.
    pub fn run<M: ColorMetric>(
        &self,
        costing: &mut Costing<'_, M>,
        facelets: &mut Facelets,
        check: impl Fn(&Facelets) -> Result<(), ParityError>,
        cancel: &AtomicBool,
    ) -> Outcome {
        let target = self.target;
        info!(target: target, start!("Resolving {} cubelets"), self.pieces.len());
        let start = Instant::now();

        let mut stats = CubeletStats::default();
        let mut scratch = *facelets;
        let mut unresolved = (0..self.pieces.len()).collect::<Vec<_>>();
        let mut needed = valid_combinations(self.pieces);

        while !needed.is_empty() && needs_reduction(needed.len(), self.limit) {
            if cancelled(cancel) {
                info!(target: target, "Cancelled during the greedy phase");
                return Outcome::Cancelled;
            }

            let mut best: Option<(f64, usize, usize, [Side; N])> = None;
            for (u, &piece) in unresolved.iter().enumerate() {
                for (c, &combo) in needed.iter().enumerate() {
                    let (cost, oriented) = costing.orient(self.pieces[piece], combo);
                    if best.is_none_or(|(best_cost, ..)| cost < best_cost) {
                        best = Some((cost, u, c, oriented));
                    }
                }
            }
            let Some((cost, u, c, oriented)) = best else {
                break;
            };

            let piece = unresolved.remove(u);
            needed.remove(c);
            scratch.paint(self.pieces[piece], oriented);
            stats.greedy_assignments += 1;
            stats.greedy_cost += cost;
            debug!(
                target: target,
                working!("Greedily gave {:?} to cubelet {:?} ({:.2})"),
                oriented,
                self.pieces[piece],
                cost
            );
        }

        // costs[u][c]: the cheapest orientation of `needed[c]` on `unresolved[u]`
        let costs = unresolved
            .iter()
            .map(|&piece| {
                needed
                    .iter()
                    .map(|&combo| costing.orient(self.pieces[piece], combo))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        // Unresolved cubelet `perm[c]` receives `needed[c]`
        let mut scored = Vec::new();
        let mut perm = (0u8..).take(needed.len()).collect::<Vec<_>>();
        loop {
            if cancelled(cancel) {
                info!(target: target, "Cancelled while scoring assignments");
                return Outcome::Cancelled;
            }
            let cost = perm
                .iter()
                .enumerate()
                .map(|(c, &u)| costs[usize::from(u)][c].0)
                .sum::<f64>();
            scored.push((cost, perm.clone()));
            if !next_permutation(&mut perm) {
                break;
            }
        }
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        stats.permutations_scored = scored.len();
        debug!(
            target: target,
            working!("Scored {} assignments of {} cubelets"),
            scored.len(),
            needed.len()
        );

        let mut cheapest_rejected: Option<(Facelets, f64, ParityError)> = None;
        for (cost, perm) in scored {
            if cancelled(cancel) {
                info!(target: target, "Cancelled while checking parity");
                return Outcome::Cancelled;
            }

            let mut candidate = scratch;
            for (c, &u) in perm.iter().enumerate() {
                let u = usize::from(u);
                candidate.paint(self.pieces[unresolved[u]], costs[u][c].1);
            }
            stats.candidates_tried += 1;

            match check(&candidate) {
                Ok(()) => {
                    stats.selected_cost = cost;
                    *facelets = candidate;
                    info!(
                        target: target,
                        success!("Resolved after {} candidates in {:.3}s, cost {:.2}"),
                        stats.candidates_tried,
                        start.elapsed().as_secs_f64(),
                        stats.total_cost()
                    );
                    return Outcome::Resolved(stats);
                }
                Err(err) => {
                    trace!(target: target, "Candidate {candidate} ({cost:.2}) rejected: {err}");
                    if cheapest_rejected.is_none() {
                        cheapest_rejected = Some((candidate, cost, err));
                    }
                }
            }
        }

        match cheapest_rejected {
            Some((candidate, cost, err)) => {
                stats.selected_cost = cost;
                *facelets = candidate;
                warn!(
                    target: target,
                    "No assignment passed the parity check, keeping the cheapest one: {err}"
                );
                Outcome::Degraded(stats, err)
            }
            // The loop above always sees at least the identity permutation
            None => Outcome::Resolved(stats),
        }
    }
}
