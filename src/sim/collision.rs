//! Overlap tests between collider shapes
//!
//! Circles and rotated rectangles are all the arena needs: asteroids, UFOs and
//! the ship are circles, projectiles are thin rectangles. Contacts carry no
//! response, so the tests only answer whether two shapes overlap.

use glam::Vec2;

use super::entity::Shape;

/// A shape placed in the world
#[derive(Debug, Clone, Copy)]
pub struct Placed {
    pub shape: Shape,
    pub position: Vec2,
    pub rotation: f32,
}

/// Check whether two placed shapes overlap. Touching edges don't count.
pub fn shapes_overlap(a: &Placed, b: &Placed) -> bool {
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circles_overlap(a.position, ra, b.position, rb)
        }
        (Shape::Circle { radius }, Shape::Rect { half_extents }) => {
            circle_rect_overlap(a.position, radius, b.position, half_extents, b.rotation)
        }
        (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
            circle_rect_overlap(b.position, radius, a.position, half_extents, a.rotation)
        }
        (Shape::Rect { half_extents: ha }, Shape::Rect { half_extents: hb }) => {
            rects_overlap(a.position, ha, a.rotation, b.position, hb, b.rotation)
        }
    }
}

pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_pos.distance_squared(b_pos) < reach * reach
}

/// Circle against a rectangle rotated by `rect_rotation`
///
/// Works in the rectangle's local frame: clamp the circle center onto the box
/// to find the closest point.
pub fn circle_rect_overlap(circle_pos: Vec2, radius: f32, rect_pos: Vec2, half_extents: Vec2, rect_rotation: f32) -> bool {
    let local = Vec2::from_angle(-rect_rotation).rotate(circle_pos - rect_pos);
    let closest = local.clamp(-half_extents, half_extents);
    // A center inside the box clamps onto itself
    local.distance_squared(closest) < radius * radius
}

/// Separating-axis test for two rotated rectangles
pub fn rects_overlap(a_pos: Vec2, a_half: Vec2, a_rotation: f32, b_pos: Vec2, b_half: Vec2, b_rotation: f32) -> bool {
    let a_x = Vec2::from_angle(a_rotation);
    let b_x = Vec2::from_angle(b_rotation);
    let a_axes = [a_x, a_x.perp()];
    let b_axes = [b_x, b_x.perp()];
    let delta = b_pos - a_pos;

    a_axes.iter().chain(b_axes.iter()).all(|axis| {
        let ra = a_half.x * a_axes[0].dot(*axis).abs() + a_half.y * a_axes[1].dot(*axis).abs();
        let rb = b_half.x * b_axes[0].dot(*axis).abs() + b_half.y * b_axes[1].dot(*axis).abs();
        ra + rb > delta.dot(*axis).abs()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::new(0.08, 0.0), 0.05, Vec2::ZERO, 0.05));
        assert!(!circles_overlap(Vec2::new(0.11, 0.0), 0.05, Vec2::ZERO, 0.05));
        assert!(circles_overlap(Vec2::ONE, 0.01, Vec2::ONE, 0.02), "concentric");
    }

    #[test]
    fn test_touching_circles_do_not_overlap() {
        assert!(!circles_overlap(Vec2::new(0.5, 0.0), 0.25, Vec2::ZERO, 0.25));
    }

    #[test]
    fn test_circle_rect_edge() {
        // Rect 0.02 wide x 0.1 tall at origin; circle just right of it
        let half = Vec2::new(0.01, 0.05);
        assert!(circle_rect_overlap(Vec2::new(0.05, 0.0), 0.045, Vec2::ZERO, half, 0.0));
        assert!(!circle_rect_overlap(Vec2::new(0.05, 0.0), 0.035, Vec2::ZERO, half, 0.0));
    }

    #[test]
    fn test_circle_rect_respects_rotation() {
        // Long thin rect along Y; rotated 90° it lies along X and reaches the circle
        let half = Vec2::new(0.005, 0.1);
        let circle = Vec2::new(0.12, 0.0);
        assert!(!circle_rect_overlap(circle, 0.03, Vec2::ZERO, half, 0.0));
        assert!(circle_rect_overlap(circle, 0.03, Vec2::ZERO, half, FRAC_PI_2));
    }

    #[test]
    fn test_circle_center_inside_rect() {
        assert!(circle_rect_overlap(Vec2::new(0.0, 0.04), 0.01, Vec2::ZERO, Vec2::new(0.1, 0.05), 0.0));
    }

    #[test]
    fn test_rect_rect_separating_axis() {
        let half = Vec2::splat(0.05);
        assert!(rects_overlap(Vec2::ZERO, half, 0.0, Vec2::new(0.09, 0.0), half, 0.0));
        assert!(!rects_overlap(Vec2::ZERO, half, 0.0, Vec2::new(0.11, 0.0), half, 0.0));

        // Diamond corner reaches further than the box edge would
        assert!(rects_overlap(Vec2::ZERO, half, 0.0, Vec2::new(0.115, 0.0), half, FRAC_PI_4));
    }

    #[test]
    fn test_shape_order_does_not_matter() {
        let rect = Placed {
            shape: Shape::Rect {
                half_extents: Vec2::splat(0.01),
            },
            position: Vec2::ZERO,
            rotation: 0.0,
        };
        let circle = Placed {
            shape: Shape::Circle { radius: 0.05 },
            position: Vec2::new(0.05, 0.0),
            rotation: 0.0,
        };
        assert!(shapes_overlap(&rect, &circle));
        assert!(shapes_overlap(&circle, &rect));

        let far = Placed {
            position: Vec2::new(0.07, 0.0),
            ..circle
        };
        assert!(!shapes_overlap(&rect, &far));
        assert!(!shapes_overlap(&far, &rect));
    }
}
