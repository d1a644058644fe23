//! Random placement helpers used by spawners
//!
//! Everything takes the caller's RNG so a seeded session stays reproducible.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

/// Arena edge an entity enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Top, Edge::Right, Edge::Bottom];
}

/// Pick one of the four arena edges uniformly
pub fn next_edge(rng: &mut impl Rng) -> Edge {
    Edge::ALL[rng.random_range(0..Edge::ALL.len())]
}

/// Uniform float in `[min, max]`, tolerating `min == max` and swapped bounds
pub fn next_range(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    if lo == hi {
        return lo;
    }
    rng.random_range(lo..=hi)
}

/// Uniform integer in `[min, max]`
pub fn next_count(rng: &mut impl Rng, min: u32, max: u32) -> u32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.random_range(lo..=hi)
}

/// Unit vector with a uniformly random heading
pub fn next_unit_vector(rng: &mut impl Rng) -> Vec2 {
    Vec2::from_angle(rng.random_range(0.0..TAU))
}

/// Random heading with a length in `[min_len, max_len]`
pub fn next_vector(rng: &mut impl Rng, min_len: f32, max_len: f32) -> Vec2 {
    next_unit_vector(rng) * next_range(rng, min_len, max_len)
}

/// Position just outside a random arena edge, offset by half the object's size
/// so it slides in without popping
pub fn next_position_outside(rng: &mut impl Rng, arena_size: Vec2, object_size: Vec2) -> Vec2 {
    let half = object_size * 0.5;
    match next_edge(rng) {
        Edge::Left => Vec2::new(-half.x, arena_size.y * rng.random::<f32>()),
        Edge::Top => Vec2::new(arena_size.x * rng.random::<f32>(), -half.y),
        Edge::Right => Vec2::new(arena_size.x + half.x, arena_size.y * rng.random::<f32>()),
        Edge::Bottom => Vec2::new(arena_size.x * rng.random::<f32>(), arena_size.y + half.y),
    }
}
