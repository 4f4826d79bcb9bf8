mod common;

use std::sync::atomic::AtomicBool;

use color_resolver::{
    ColorResolver, ComputeProfile, Defect, Facelets, MetricKind, PaletteError, ParityError,
    ParityOracle, Resolution, ResolveError, ResolvedCube, ResolverConfig, Rgb, Scan, ScanError,
    Side,
    geometry::{
        CORNER_PIECES, EDGE_PIECES, canonical_rotation, valid_corner_combinations,
        valid_edge_combinations,
    },
};
use common::{CANONICAL, SCRAMBLES, facelets, noisy, paint};
use itertools::Itertools;
use log::info;

fn resolve(config: ResolverConfig, scan: &Scan) -> Resolution {
    ColorResolver::new(config)
        .resolve(scan, &AtomicBool::new(false))
        .unwrap()
}

fn resolved(resolution: Resolution) -> ResolvedCube {
    match resolution {
        Resolution::Resolved(cube) => cube,
        other => panic!("expected a resolved cube, got {other:?}"),
    }
}

fn server() -> ResolverConfig {
    ResolverConfig::default().with_profile(ComputeProfile::Server)
}

fn embedded() -> ResolverConfig {
    ResolverConfig::default().with_profile(ComputeProfile::Embedded)
}

fn assert_combinations_used_once(facelets: &Facelets) {
    let edges = EDGE_PIECES
        .iter()
        .map(|&piece| canonical_rotation(facelets.piece(piece)))
        .sorted()
        .collect_vec();
    assert_eq!(edges, valid_edge_combinations());

    let corners = CORNER_PIECES
        .iter()
        .map(|&piece| canonical_rotation(facelets.piece(piece)))
        .sorted()
        .collect_vec();
    assert_eq!(corners, valid_corner_combinations());
}

#[test_log::test]
fn test_solved_cube() {
    let cube = resolved(resolve(server(), &paint(&Facelets::solved())));

    assert_eq!(cube.facelets(), &Facelets::solved());
    assert_eq!(cube.classified(), &Facelets::solved());
    assert_eq!(
        cube.facelets().kociemba(),
        "UUUUUUUUULLLLLLLLLFFFFFFFFFRRRRRRRRRBBBBBBBBBDDDDDDDDD"
    );
    assert_eq!(
        cube.facelets().cubex_string(),
        "111111111222222222333333333444444444555555555666666666"
    );
    assert_eq!(cube.names(), &["Wh", "OR", "Gr", "Rd", "Bu", "Ye"]);
    assert_eq!(cube.corrections().count(), 0);
    assert_eq!(cube.stats().total_cost(), 0.0);
}

#[test_log::test]
fn test_scrambled_fixtures_are_reproduced() {
    for scramble in SCRAMBLES {
        let expected = facelets(scramble);
        for config in [server(), embedded()] {
            let cube = resolved(resolve(config, &paint(&expected)));
            assert_eq!(cube.facelets(), &expected);
            assert_eq!(cube.facelets().kociemba(), scramble);

            let stats = cube.stats();
            assert_eq!(stats.edges.candidates_tried, 1);
            assert_eq!(stats.corners.candidates_tried, 1);
            assert_eq!(stats.total_cost(), 0.0);
            assert_eq!(ParityOracle.verify(cube.facelets()), Ok(()));
        }
    }
}

#[test_log::test]
fn test_light_noise_is_resolved_exactly() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for scramble in SCRAMBLES {
        let expected = facelets(scramble);
        for metric in [MetricKind::Ciede2000, MetricKind::Cmc, MetricKind::Cie76] {
            let config = ResolverConfig {
                metric,
                ..embedded()
            };
            let cube = resolved(resolve(config, &noisy(&expected, &mut rng, 12)));
            assert_eq!(cube.facelets(), &expected, "{metric:?}");
            assert!(cube.stats().total_cost() > 0.0);
        }
    }
}

#[test_log::test]
fn test_every_combination_is_used_once_under_heavy_noise() {
    let mut rng = fastrand::Rng::with_seed(7);
    for seed in 0..6 {
        let expected = facelets(SCRAMBLES[seed % SCRAMBLES.len()]);
        let scan = noisy(&expected, &mut rng, 30);
        // Keep the centers clean so the palette stays usable
        let scan = Scan::from_fn(|position| {
            let side = Side::of(position).unwrap();
            if position == side.center() {
                CANONICAL[side.index()]
            } else {
                scan.rgb(position).unwrap()
            }
        });

        let resolution = resolve(embedded(), &scan);
        let cube = resolution.cube().unwrap();
        info!("Seed {seed}: {}", cube.facelets());
        assert_combinations_used_once(cube.facelets());
        for side in Side::ALL {
            assert_eq!(cube.facelets().side(side.center()), Some(side));
        }
        if let Resolution::Degraded { defects, .. } = &resolution {
            assert!(!defects.is_empty());
        }
    }
}

#[test_log::test]
fn test_resolving_a_resolved_cube_changes_nothing() {
    let mut rng = fastrand::Rng::with_seed(42);
    for scramble in SCRAMBLES {
        let first = resolve(server(), &noisy(&facelets(scramble), &mut rng, 25));
        let first = first.cube().unwrap().facelets();
        let second = resolve(server(), &paint(first));
        assert_eq!(second.cube().unwrap().facelets(), first);
    }
}

#[test_log::test]
fn test_greedy_phase_boundary() {
    let scan = paint(&facelets(SCRAMBLES[0]));
    // (limit, greedy edges, greedy corners)
    for (limit, edges, corners) in [(5040, 5, 1), (5039, 6, 2), (720, 6, 2), (719, 7, 3)] {
        let config = ResolverConfig {
            server_permutation_limit: limit,
            ..server()
        };
        let cube = resolved(resolve(config, &scan));
        let stats = cube.stats();
        assert_eq!(stats.edges.greedy_assignments, edges, "limit {limit}");
        assert_eq!(stats.corners.greedy_assignments, corners, "limit {limit}");
        assert!(stats.edges.permutations_scored as u64 <= limit);
        assert!(stats.corners.permutations_scored as u64 <= limit);
    }

    let cube = resolved(resolve(server(), &scan));
    assert_eq!(cube.stats().edges.permutations_scored, 5040);
    assert_eq!(cube.stats().corners.permutations_scored, 5040);
    let cube = resolved(resolve(embedded(), &scan));
    assert_eq!(cube.stats().edges.permutations_scored, 720);
    assert_eq!(cube.stats().corners.permutations_scored, 720);
}

#[test_log::test]
fn test_cancelled_run_has_no_result() {
    let cancel = AtomicBool::new(true);
    for config in [server(), embedded()] {
        let resolution = ColorResolver::new(config)
            .resolve(&paint(&facelets(SCRAMBLES[1])), &cancel)
            .unwrap();
        assert!(matches!(resolution, Resolution::Cancelled));
        assert!(resolution.cube().is_none());
    }

    // Nothing left for the greedy phase, so the exhaustive phase notices
    let config = ResolverConfig {
        server_permutation_limit: u64::MAX,
        ..server()
    };
    let resolution = ColorResolver::new(config)
        .resolve(&paint(&facelets(SCRAMBLES[1])), &cancel)
        .unwrap();
    assert!(matches!(resolution, Resolution::Cancelled));
}

#[test_log::test]
fn test_unsolvable_scan_is_degraded() {
    // A solved cube with the UB edge flipped
    let mut flipped = Facelets::solved().kociemba();
    flipped.replace_range(1..2, "B");
    flipped.replace_range(37..38, "U");
    let flipped = facelets(&flipped);

    // With a limit of one every cubelet but the last is fixed greedily
    let config = ResolverConfig {
        server_permutation_limit: 1,
        ..server()
    };
    let Resolution::Degraded { cube, defects } = resolve(config, &paint(&flipped)) else {
        panic!("a flipped edge cannot be resolved with zero cost");
    };
    assert_eq!(cube.facelets(), &flipped);
    assert_eq!(
        defects,
        vec![
            Defect::Edges(ParityError::EdgeFlip),
            Defect::Corners(ParityError::EdgeFlip)
        ]
    );
    assert_eq!(cube.stats().edges.greedy_assignments, 11);
    assert_eq!(cube.stats().edges.candidates_tried, 1);
    assert_eq!(cube.stats().total_cost(), 0.0);
}

#[test_log::test]
fn test_indistinct_centers() {
    let scan = Scan::from_fn(|position| {
        if position == Side::R.center() {
            Rgb::new(0xca, 0x12, 0x10)
        } else {
            CANONICAL[Side::of(position).unwrap().index()]
        }
    });
    let scan = Scan::from_fn(|position| {
        if position == Side::L.center() {
            Rgb::new(0xc9, 0x11, 0x11)
        } else {
            scan.rgb(position).unwrap()
        }
    });
    let err = ColorResolver::default()
        .resolve(&scan, &AtomicBool::new(false))
        .unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Palette(PaletteError::IndistinctCenters {
            first: Side::L,
            second: Side::R,
            ..
        })
    ));
}

#[test_log::test]
fn test_bad_input() {
    let resolver = ColorResolver::default();
    let cancel = AtomicBool::new(false);

    let json = (1..=53)
        .map(|position| format!("\"{position}\": [0, 0, 0]"))
        .join(",");
    let err = resolver
        .resolve_json(&format!("{{{json}}}"), &cancel)
        .unwrap_err();
    assert!(matches!(err, ResolveError::Scan(ScanError::MissingFacet(54))));

    let err = resolver.resolve_json("{\"1\": \"red\"}", &cancel).unwrap_err();
    assert!(matches!(err, ResolveError::Scan(ScanError::Malformed(_))));

    let config = ResolverConfig {
        embedded_permutation_limit: 0,
        ..embedded()
    };
    let err = ColorResolver::new(config)
        .resolve(&paint(&Facelets::solved()), &cancel)
        .unwrap_err();
    assert!(matches!(err, ResolveError::Config(_)));
}

#[test_log::test]
fn test_scan_json_round_trip_through_resolver() {
    let expected = facelets(SCRAMBLES[2]);
    let json = paint(&expected).to_json().unwrap();
    let resolution = ColorResolver::new(embedded())
        .resolve_json(&json, &AtomicBool::new(false))
        .unwrap();
    assert!(resolution.is_resolved());
    assert_eq!(resolution.cube().unwrap().facelets(), &expected);
}

#[test_log::test]
fn test_twisted_corner_walks_past_illegal_candidates() {
    // A solved cube with the ULB corner twisted in place
    let mut twisted = Facelets::solved().kociemba();
    twisted.replace_range(0..1, "B");
    twisted.replace_range(9..10, "U");
    twisted.replace_range(38..39, "L");
    let twisted = facelets(&twisted);
    assert_eq!(ParityOracle.verify(&twisted), Err(ParityError::CornerTwist));

    let config = ResolverConfig {
        server_permutation_limit: 40320,
        ..server()
    };
    let cube = resolved(resolve(config, &paint(&twisted)));
    assert_eq!(ParityOracle.verify(cube.facelets()), Ok(()));
    assert_combinations_used_once(cube.facelets());

    let stats = cube.stats();
    assert_eq!(stats.edges.greedy_assignments, 4);
    assert_eq!(stats.edges.candidates_tried, 1);
    assert_eq!(stats.corners.greedy_assignments, 0);
    assert_eq!(stats.corners.permutations_scored, 40320);
    // The zero cost assignment keeps the twist, so it cannot be the answer
    assert!(stats.corners.candidates_tried > 1);
    assert!(stats.total_cost() > 0.0);
}
