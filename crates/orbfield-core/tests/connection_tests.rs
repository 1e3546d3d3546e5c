mod common;

use orbfield_core::connections::{all_pairs, distance, grid_pairs, Connection, LinkParams};
use orbfield_core::spatial::PairGrid;
use orbfield_core::{Bounds, FieldConfig, Particle};

fn population(seed: u64, count: usize, depth: bool) -> Vec<Particle> {
    let config = if depth { FieldConfig::orb() } else { FieldConfig::neural() };
    let bounds = Bounds { width: 1200.0, height: 800.0, margin: 40.0 };
    let mut rng = common::rng(seed);
    (0..count).map(|_| Particle::spawn(&mut rng, &config, &bounds)).collect()
}

fn flat(radius: f32) -> LinkParams {
    LinkParams { radius, max_depth: None, line_opacity: 1.0 }
}

#[test]
fn test_three_particle_scenario() {
    let particles = vec![
        common::particle_at(0.0, 0.0),
        common::particle_at(10.0, 0.0),
        common::particle_at(1000.0, 1000.0),
    ];
    let mut out = Vec::new();
    all_pairs(&particles, &flat(50.0), &mut out);

    assert_eq!(out.len(), 1);
    assert_eq!((out[0].a, out[0].b), (0, 1));
    assert_eq!(out[0].distance, 10.0);
    assert!((out[0].opacity - 0.8).abs() < 1e-6);
    assert!(distance(&particles[0], &particles[2], false) > 1400.0);
}

#[test]
fn test_connections_are_symmetric() {
    let particles = population(3, 40, true);
    let params = LinkParams { radius: 200.0, max_depth: Some(600.0), line_opacity: 1.0 };
    let mut out = Vec::new();
    all_pairs(&particles, &params, &mut out);

    for i in 0..particles.len() {
        for j in 0..particles.len() {
            if i == j {
                continue;
            }
            let dij = distance(&particles[i], &particles[j], true);
            let dji = distance(&particles[j], &particles[i], true);
            assert_eq!(dij, dji);
            let listed = out
                .iter()
                .any(|c| (c.a, c.b) == (i.min(j), i.max(j)));
            assert_eq!(listed, dij < 200.0, "pair ({i},{j}) at {dij}");
        }
    }
}

#[test]
fn test_zero_radius_yields_no_connections() {
    let particles = population(4, 30, false);
    let mut out = Vec::new();
    all_pairs(&particles, &flat(0.0), &mut out);
    assert!(out.is_empty());
}

#[test]
fn test_infinite_radius_yields_complete_graph() {
    let n = 30;
    let particles = population(5, n, true);
    let params = LinkParams { radius: f32::INFINITY, max_depth: Some(600.0), line_opacity: 0.5 };
    let mut out = Vec::new();
    all_pairs(&particles, &params, &mut out);
    assert_eq!(out.len(), n * (n - 1) / 2);
    assert!(out.iter().all(|c| c.a < c.b && c.opacity <= 0.5));
}

#[test]
fn test_connection_count_grows_with_radius() {
    let particles = population(6, 50, false);
    let mut previous = 0;
    for radius in [0.0, 50.0, 100.0, 200.0, 400.0, 2000.0] {
        let mut out = Vec::new();
        all_pairs(&particles, &flat(radius), &mut out);
        assert!(out.len() >= previous, "radius {radius} lost links");
        previous = out.len();
    }
}

#[test]
fn test_closer_pairs_draw_brighter() {
    let particles = vec![
        common::particle_at(0.0, 0.0),
        common::particle_at(10.0, 0.0),
        common::particle_at(0.0, 40.0),
    ];
    let mut out = Vec::new();
    all_pairs(&particles, &flat(50.0), &mut out);
    let find = |a, b| out.iter().find(|c: &&Connection| (c.a, c.b) == (a, b)).unwrap();
    assert!(find(0, 1).opacity > find(0, 2).opacity);
}

#[test]
fn test_grid_pass_matches_all_pairs() {
    for (seed, depth) in [(7, false), (8, true), (9, true)] {
        let particles = population(seed, 300, depth);
        let params = LinkParams {
            radius: 90.0,
            max_depth: depth.then_some(600.0),
            line_opacity: 0.6,
        };

        let mut brute = Vec::new();
        all_pairs(&particles, &params, &mut brute);

        // A tiny table forces bucket collisions; output must still match.
        for table_size in [16, 1024] {
            let mut grid = PairGrid::new(params.radius, table_size, particles.len());
            let mut positions = Vec::new();
            let mut fast = Vec::new();
            grid_pairs(&particles, &params, &mut grid, &mut positions, &mut fast);
            assert_eq!(brute, fast, "seed {seed} table {table_size}");
        }
    }
}
