//! Distance-threshold collision checks
//!
//! Every footprint is a circle. Two entities touch when the distance between
//! centers is below the hit distance. No spatial partitioning: callers loop
//! over every pair.

use glam::Vec2;

/// Whether two circles overlap
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    within(a, b, a_radius + b_radius)
}

/// Whether two points are closer than `distance`
#[inline]
pub fn within(a: Vec2, b: Vec2, distance: f32) -> bool {
    a.distance_squared(b) < distance * distance
}

/// Hit distance: the fixed override when set, otherwise the sum of radii
#[inline]
pub fn hit_distance(fixed: Option<f32>, a_radius: f32, b_radius: f32) -> f32 {
    fixed.unwrap_or(a_radius + b_radius)
}

/// Index of the last point within `distance` of `center`. Lists are kept in
/// spawn order, so this is the newest one in range.
pub fn newest_within<'a, I>(center: Vec2, distance: f32, points: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Vec2>,
    I::IntoIter: DoubleEndedIterator + ExactSizeIterator,
{
    points
        .into_iter()
        .rposition(|p| within(center, *p, distance))
}

/// Whether a point lies outside the viewport grown by `margin` on every side
#[inline]
pub fn out_of_bounds(pos: Vec2, viewport: Vec2, margin: f32) -> bool {
    pos.x < -margin || pos.y < -margin || pos.x > viewport.x + margin || pos.y > viewport.y + margin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Vec2::ZERO;
        assert!(circles_overlap(a, 5.0, Vec2::new(9.9, 0.0), 5.0));
        assert!(!circles_overlap(a, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_hit_distance_prefers_fixed() {
        assert_eq!(hit_distance(Some(25.0), 4.0, 60.0), 25.0);
        assert_eq!(hit_distance(None, 4.0, 60.0), 64.0);
    }

    #[test]
    fn test_newest_within_returns_latest() {
        let points = [
            Vec2::new(1.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(100.0, 0.0),
        ];
        assert_eq!(newest_within(Vec2::ZERO, 5.0, &points), Some(1));
        assert_eq!(newest_within(Vec2::ZERO, 2.0, &points), Some(0));
        assert_eq!(newest_within(Vec2::ZERO, 0.5, &points), None);
    }

    #[test]
    fn test_out_of_bounds_margin() {
        let viewport = Vec2::new(800.0, 600.0);
        assert!(!out_of_bounds(Vec2::new(-49.0, 10.0), viewport, 50.0));
        assert!(out_of_bounds(Vec2::new(-51.0, 10.0), viewport, 50.0));
        assert!(out_of_bounds(Vec2::new(10.0, 651.0), viewport, 50.0));
        assert!(!out_of_bounds(Vec2::new(850.0, 650.0), viewport, 50.0));
    }
}
