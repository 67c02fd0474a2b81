use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its bottom-left corner.
///
/// Rectangles occupy whole world units: a rectangle of width `w` at `left`
/// covers `left..=left + w - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub position: [f64; 2],
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(position: [f64; 2], width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.position[0]
    }

    pub fn right(&self) -> f64 {
        self.position[0] + self.width - 1.0
    }

    pub fn bottom(&self) -> f64 {
        self.position[1]
    }

    pub fn top(&self) -> f64 {
        self.position[1] + self.height - 1.0
    }

    /// AABB overlap: true unless the two are separated on some axis.
    /// Sharing a boundary unit counts as a collision.
    pub fn collides(&self, other: &Rectangle) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.top() < other.bottom()
            || self.bottom() > other.top())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square(x: f64, y: f64, size: f64) -> Rectangle {
        Rectangle::new([x, y], size, size)
    }

    #[test]
    fn extents_are_unit_inclusive() {
        let r = Rectangle::new([100.0, 0.0], 50.0, 20.0);
        assert_eq!(r.left(), 100.0);
        assert_eq!(r.right(), 149.0);
        assert_eq!(r.bottom(), 0.0);
        assert_eq!(r.top(), 19.0);
    }

    #[test]
    fn overlapping_rectangles_collide() {
        assert!(square(0.0, 0.0, 10.0).collides(&square(5.0, 5.0, 10.0)));
        assert!(square(0.0, 0.0, 10.0).collides(&square(2.0, 2.0, 3.0)));
    }

    #[test]
    fn shared_edge_unit_collides_but_adjacent_does_not() {
        let a = square(0.0, 0.0, 10.0);
        assert!(a.collides(&square(9.0, 0.0, 10.0)));
        assert!(!a.collides(&square(10.0, 0.0, 10.0)));
        assert!(a.collides(&square(0.0, 9.0, 10.0)));
        assert!(!a.collides(&square(0.0, 10.0, 10.0)));
    }

    #[test]
    fn overlap_on_one_axis_only_is_not_a_collision() {
        let a = square(0.0, 0.0, 10.0);
        assert!(!a.collides(&square(5.0, 50.0, 10.0)));
        assert!(!a.collides(&square(50.0, 5.0, 10.0)));
    }

    proptest! {
        #[test]
        fn proptest_collision_is_symmetric(
            ax in -100.0f64..100.0, ay in -100.0f64..100.0, aw in 1.0f64..60.0, ah in 1.0f64..60.0,
            bx in -100.0f64..100.0, by in -100.0f64..100.0, bw in 1.0f64..60.0, bh in 1.0f64..60.0,
        ) {
            let a = Rectangle::new([ax, ay], aw, ah);
            let b = Rectangle::new([bx, by], bw, bh);
            prop_assert_eq!(a.collides(&b), b.collides(&a));
        }
    }
}
