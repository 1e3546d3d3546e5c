mod common;

use std::f32::consts::TAU;

use glam::Vec2;
use orbfield_core::{Bounds, FieldConfig, Particle};

fn bounds() -> Bounds {
    Bounds { width: 800.0, height: 600.0, margin: 20.0 }
}

#[test]
fn test_spawn_draws_within_configured_ranges() {
    let config = FieldConfig::orb();
    let mut rng = common::rng(1);
    for _ in 0..500 {
        let p = Particle::spawn(&mut rng, &config, &bounds());
        assert!(p.position.x >= 0.0 && p.position.x <= 800.0);
        assert!(p.position.y >= 0.0 && p.position.y <= 600.0);
        assert!(p.depth >= 0.0 && p.depth <= config.max_depth);
        assert!(p.depth_velocity.abs() <= config.depth_speed);
        let speed = p.velocity.length();
        assert!(
            speed >= config.speed_min - 1e-4 && speed <= config.speed_max + 1e-4,
            "speed {speed} outside band"
        );
        assert!(p.base_size >= config.size_min && p.base_size <= config.size_max);
        assert!(p.pulse_phase >= 0.0 && p.pulse_phase < TAU);
        assert!(config.color_palette.contains(&p.color));
    }
}

#[test]
fn test_spawn_without_depth_stays_flat() {
    let config = FieldConfig::neural();
    let mut rng = common::rng(2);
    for _ in 0..100 {
        let p = Particle::spawn(&mut rng, &config, &bounds());
        assert_eq!(p.depth, 0.0);
        assert_eq!(p.depth_velocity, 0.0);
    }
}

#[test]
fn test_advance_is_pure_drift() {
    let mut p = common::particle_at(10.0, 20.0);
    p.velocity = Vec2::new(1.5, -0.5);
    p.depth_velocity = 2.0;
    p.pulse_speed = 0.1;

    p.advance();
    p.advance();

    assert_eq!(p.position, Vec2::new(13.0, 19.0));
    assert_eq!(p.depth, 4.0);
    assert!((p.pulse_phase - 0.2).abs() < 1e-6);
    assert_eq!(p.velocity, Vec2::new(1.5, -0.5));
}

#[test]
fn test_wrap_moves_to_opposite_edge() {
    let b = bounds();
    let mut p = common::particle_at(-20.5, 620.5);
    p.wrap(&b, None);
    assert_eq!(p.position, Vec2::new(820.0, -20.0));

    let mut p = common::particle_at(820.5, -20.5);
    p.wrap(&b, None);
    assert_eq!(p.position, Vec2::new(-20.0, 620.0));
}

#[test]
fn test_wrap_depth_over_zero_to_max() {
    let b = bounds();
    let mut p = common::particle_at(0.0, 0.0);
    p.depth = -0.1;
    p.wrap(&b, Some(600.0));
    assert_eq!(p.depth, 600.0);

    p.depth = 600.1;
    p.wrap(&b, Some(600.0));
    assert_eq!(p.depth, 0.0);
}

#[test]
fn test_render_size_and_opacity_follow_depth() {
    let mut p = common::particle_at(0.0, 0.0);
    p.base_size = 10.0;
    p.pulse_phase = std::f32::consts::FRAC_PI_2; // sin = 1
    p.depth = 150.0;

    let size = p.render_size(0.5, Some(600.0));
    assert!((size - 10.0 * 1.5 * 0.75).abs() < 1e-4, "size {size}");
    assert!((p.opacity(0.8, Some(600.0)) - 0.6).abs() < 1e-6);

    // Nearer renders larger and more opaque.
    let mut near = p.clone();
    near.depth = 10.0;
    assert!(near.render_size(0.5, Some(600.0)) > size);
    assert!(near.opacity(0.8, Some(600.0)) > p.opacity(0.8, Some(600.0)));

    // Without depth only the pulse scales the size.
    assert!((p.render_size(0.5, None) - 15.0).abs() < 1e-4);
    assert_eq!(p.opacity(0.8, None), 0.8);
}
