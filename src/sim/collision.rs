//! Overlap tests between the player circle and falling entities
//!
//! Entities are either circles (stars, clouds, pickups) or axis-aligned
//! rectangles (word bubbles). Both tests report a contact so effects can
//! spray from the touching point.

use glam::Vec2;

use super::state::Shape;

/// Contact between the player circle and an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Closest point on the entity to the player centre
    pub point: Vec2,
    /// Unit vector from the contact point toward the player centre
    pub normal: Vec2,
    /// Overlap depth
    pub penetration: f32,
}

/// Circle vs circle. Touching counts as overlap.
pub fn circle_circle(a: Vec2, ra: f32, b: Vec2, rb: f32) -> Option<Contact> {
    let delta = a - b;
    let dist_sq = delta.length_squared();
    let reach = ra + rb;
    if dist_sq > reach * reach {
        return None;
    }
    let dist = dist_sq.sqrt();
    // Concentric circles have no direction; push straight up
    let normal = if dist > 1e-4 { delta / dist } else { Vec2::NEG_Y };
    Some(Contact {
        point: b + normal * rb.min(dist),
        normal,
        penetration: reach - dist,
    })
}

/// Circle vs axis-aligned rectangle given by centre and half extents
pub fn circle_rect(center: Vec2, radius: f32, rect_center: Vec2, half: Vec2) -> Option<Contact> {
    let min = rect_center - half;
    let max = rect_center + half;
    let closest = center.clamp(min, max);
    let delta = center - closest;
    let dist_sq = delta.length_squared();
    if dist_sq > radius * radius {
        return None;
    }
    let dist = dist_sq.sqrt();
    let normal = if dist > 1e-4 {
        delta / dist
    } else {
        // Centre inside the box: leave through the nearest face
        let to_min = center - min;
        let to_max = max - center;
        let faces = [
            (to_min.x, Vec2::NEG_X),
            (to_max.x, Vec2::X),
            (to_min.y, Vec2::NEG_Y),
            (to_max.y, Vec2::Y),
        ];
        faces
            .into_iter()
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, n)| n)
            .unwrap_or(Vec2::NEG_Y)
    };
    Some(Contact {
        point: closest,
        normal,
        penetration: radius - dist,
    })
}

/// Player circle vs an entity of either shape
pub fn player_overlap(player_pos: Vec2, catch_radius: f32, entity_pos: Vec2, shape: Shape) -> Option<Contact> {
    match shape {
        Shape::Circle { radius } => circle_circle(player_pos, catch_radius, entity_pos, radius),
        Shape::Rect { half } => circle_rect(player_pos, catch_radius, entity_pos, half),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_circle_overlap() {
        let hit = circle_circle(Vec2::new(0.0, 0.0), 10.0, Vec2::new(15.0, 0.0), 8.0);
        let contact = hit.expect("circles overlap");
        assert!((contact.penetration - 3.0).abs() < 1e-4);
        // Normal points from the entity toward the player
        assert!(contact.normal.x < 0.0);
    }

    #[test]
    fn test_circle_circle_touching_counts() {
        assert!(circle_circle(Vec2::ZERO, 10.0, Vec2::new(18.0, 0.0), 8.0).is_some());
        assert!(circle_circle(Vec2::ZERO, 10.0, Vec2::new(18.1, 0.0), 8.0).is_none());
    }

    #[test]
    fn test_circle_circle_concentric() {
        let contact = circle_circle(Vec2::ONE, 5.0, Vec2::ONE, 5.0).unwrap();
        assert_eq!(contact.normal, Vec2::NEG_Y);
        assert!((contact.penetration - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_circle_rect_corner_miss() {
        // Circle near the corner but outside the rounded reach
        let rect_center = Vec2::new(0.0, 0.0);
        let half = Vec2::new(10.0, 10.0);
        assert!(circle_rect(Vec2::new(18.0, 18.0), 10.0, rect_center, half).is_none());
        assert!(circle_rect(Vec2::new(16.0, 16.0), 10.0, rect_center, half).is_some());
    }

    #[test]
    fn test_circle_rect_side_hit() {
        let contact = circle_rect(Vec2::new(0.0, 25.0), 10.0, Vec2::ZERO, Vec2::new(30.0, 19.0))
            .expect("touches the bottom face");
        assert_eq!(contact.point, Vec2::new(0.0, 19.0));
        assert!(contact.normal.y > 0.99);
    }

    #[test]
    fn test_circle_rect_centre_inside() {
        let contact = circle_rect(Vec2::new(0.0, -15.0), 5.0, Vec2::ZERO, Vec2::new(30.0, 19.0))
            .expect("centre inside");
        // Nearest face is the top one
        assert_eq!(contact.normal, Vec2::NEG_Y);
    }

    #[test]
    fn test_player_overlap_dispatch() {
        let rect = Shape::Rect { half: Vec2::new(40.0, 19.0) };
        let circle = Shape::Circle { radius: 16.0 };
        let player = Vec2::new(100.0, 100.0);
        assert!(player_overlap(player, 46.0, Vec2::new(100.0, 40.0), rect).is_some());
        assert!(player_overlap(player, 46.0, Vec2::new(100.0, 30.0), circle).is_none());
        assert!(player_overlap(player, 46.0 + 95.0, Vec2::new(100.0, 30.0), circle).is_some());
    }
}
