use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;
use smallvec::SmallVec;

/// Axis-aligned collision box, offset from the entity's [`MapPosition`].
///
/// [`MapPosition`]: crate::components::mapposition::MapPosition
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct BoxCollider {
    pub size: Vector2,
    pub offset: Vector2,
}

impl BoxCollider {
    /// Create a BoxCollider with given size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vector2::new(width, height),
            offset: Vector2::zero(),
        }
    }

    /// Collider spanning `x, y, width, height` relative to its owner.
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(width, height).with_offset(Vector2::new(x, y))
    }

    /// Modify BoxCollider with given offset
    pub fn with_offset(mut self, offset: Vector2) -> Self {
        self.offset = offset;
        self
    }

    /// Returns (min, max) of the collider AABB for a given entity position.
    /// Handles negative size by normalizing to proper min/max.
    pub fn aabb(&self, position: Vector2) -> (Vector2, Vector2) {
        let p0 = position + self.offset;
        let p1 = p0 + self.size;
        let min = Vector2::new(p0.x.min(p1.x), p0.y.min(p1.y));
        let max = Vector2::new(p0.x.max(p1.x), p0.y.max(p1.y));
        (min, max)
    }

    /// (x, y, width, height) of the AABB in world space.
    pub fn get_aabb(&self, position: Vector2) -> (f32, f32, f32, f32) {
        let (min, max) = self.aabb(position);
        (min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// AABB vs AABB overlap test against another BoxCollider at a different entity position.
    pub fn overlaps(&self, position: Vector2, other: &Self, other_position: Vector2) -> bool {
        let (min_a, max_a) = self.aabb(position);
        let (min_b, max_b) = other.aabb(other_position);
        min_a.x < max_b.x && max_a.x > min_b.x && min_a.y < max_b.y && max_a.y > min_b.y
    }
}

/// Several collision boxes sharing one owner, e.g. a tree's trunk and crown.
#[derive(Debug, Clone, Default, PartialEq, Component)]
pub struct ColliderSet(pub SmallVec<[BoxCollider; 4]>);

impl ColliderSet {
    pub fn new(colliders: impl IntoIterator<Item = BoxCollider>) -> Self {
        ColliderSet(colliders.into_iter().collect())
    }

    /// Whether `collider` at `position` touches any box of this set at `own_position`.
    pub fn overlaps(&self, own_position: Vector2, collider: &BoxCollider, position: Vector2) -> bool {
        self.0
            .iter()
            .any(|c| c.overlaps(own_position, collider, position))
    }

    /// Smallest y covered by any box, relative to the owner.
    pub fn top(&self) -> Option<f32> {
        self.0
            .iter()
            .map(|c| c.offset.y.min(c.offset.y + c.size.y))
            .reduce(f32::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_respects_offsets() {
        let a = BoxCollider::new(10.0, 10.0);
        let b = BoxCollider::from_rect(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(Vector2::new(0.0, 0.0), &b, Vector2::new(0.0, 0.0)));
        assert!(!a.overlaps(Vector2::new(0.0, 0.0), &b, Vector2::new(10.0, 0.0)));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = BoxCollider::new(10.0, 10.0);
        let b = BoxCollider::new(10.0, 10.0);
        assert!(!a.overlaps(Vector2::new(0.0, 0.0), &b, Vector2::new(10.0, 0.0)));
    }

    #[test]
    fn negative_size_is_normalized() {
        let c = BoxCollider::new(-4.0, -2.0);
        let (x, y, w, h) = c.get_aabb(Vector2::new(10.0, 10.0));
        assert_eq!((x, y, w, h), (6.0, 8.0, 4.0, 2.0));
    }

    #[test]
    fn collider_set_top_and_overlap() {
        let set = ColliderSet::new([
            BoxCollider::from_rect(40.0, 120.0, 20.0, 200.0),
            BoxCollider::from_rect(0.0, 30.0, 100.0, 90.0),
        ]);
        assert_eq!(set.top(), Some(30.0));
        let bird = BoxCollider::new(8.0, 8.0);
        assert!(set.overlaps(Vector2::new(100.0, 0.0), &bird, Vector2::new(145.0, 200.0)));
        assert!(!set.overlaps(Vector2::new(100.0, 0.0), &bird, Vector2::new(145.0, 0.0)));
        assert_eq!(ColliderSet::default().top(), None);
    }
}
