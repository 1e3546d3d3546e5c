//! Proximity links between particles, recomputed every frame.

use glam::Vec2;

use crate::particle::Particle;
use crate::spatial::PairGrid;

/// An unordered pair `a < b` closer than the link radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    /// Line opacity in [0, 1]: linear falloff with distance, scaled by
    /// the nearer endpoint's depth factor when depth is modelled.
    pub opacity: f32,
}

/// Inputs shared by both search strategies.
#[derive(Clone, Copy, Debug)]
pub struct LinkParams {
    pub radius: f32,
    /// `Some(max_depth)` when depth takes part in distance and opacity.
    pub max_depth: Option<f32>,
    pub line_opacity: f32,
}

/// Euclidean distance, including the depth axis when it is modelled.
#[inline]
pub fn distance(a: &Particle, b: &Particle, with_depth: bool) -> f32 {
    let d = a.position - b.position;
    let dz = if with_depth { a.depth - b.depth } else { 0.0 };
    (d.x * d.x + d.y * d.y + dz * dz).sqrt()
}

#[inline]
fn link(a: usize, b: usize, pa: &Particle, pb: &Particle, params: &LinkParams) -> Option<Connection> {
    let d = distance(pa, pb, params.max_depth.is_some());
    if d >= params.radius {
        return None;
    }
    let nearness = pa.nearness(params.max_depth).max(pb.nearness(params.max_depth));
    Some(Connection {
        a,
        b,
        distance: d,
        opacity: (1.0 - d / params.radius) * params.line_opacity * nearness,
    })
}

/// O(N²) pass over every unordered pair. Output is ordered by `(a, b)`.
pub fn all_pairs(particles: &[Particle], params: &LinkParams, out: &mut Vec<Connection>) {
    out.clear();
    for i in 0..particles.len() {
        for j in (i + 1)..particles.len() {
            if let Some(c) = link(i, j, &particles[i], &particles[j], params) {
                out.push(c);
            }
        }
    }
}

/// Grid-accelerated pass producing exactly what [`all_pairs`] produces.
///
/// Requires `grid.cell_size() >= params.radius`. Pairs within the depth-aware
/// distance are also within the planar distance, so the 3x3 block query sees
/// all of them.
pub fn grid_pairs(
    particles: &[Particle],
    params: &LinkParams,
    grid: &mut PairGrid,
    positions: &mut Vec<Vec2>,
    out: &mut Vec<Connection>,
) {
    debug_assert!(grid.cell_size() >= params.radius);
    out.clear();
    positions.clear();
    positions.extend(particles.iter().map(|p| p.position));
    grid.build(positions);

    for (i, pi) in particles.iter().enumerate() {
        grid.query_neighbors(pi.position, |j| {
            if j > i {
                if let Some(c) = link(i, j, pi, &particles[j], params) {
                    out.push(c);
                }
            }
        });
    }

    out.sort_unstable_by_key(|c| (c.a, c.b));
    out.dedup_by_key(|c| (c.a, c.b));
}
