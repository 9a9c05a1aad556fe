use glam::Vec2;

/// Axis-aligned rectangle in container-local pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Overlap test. Touching edges count as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.x + self.w < other.x
            || self.x > other.x + other.w
            || self.y + self.h < other.y
            || self.y > other.y + other.h)
    }

    /// Shrink each side independently.
    pub fn inset(&self, left: f32, top: f32, right: f32, bottom: f32) -> Rect {
        Rect {
            x: self.x + left,
            y: self.y + top,
            w: (self.w - left - right).max(0.0),
            h: (self.h - top - bottom).max(0.0),
        }
    }

    /// Squared distance between the two centers.
    pub fn center_distance_sq(&self, other: &Rect) -> f32 {
        self.center().distance_squared(other.center())
    }
}

/// Pixel size of the scene container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    pub width: f32,
    pub height: f32,
}

impl Container {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A zero (or negative, or NaN) dimension means nothing can be placed yet.
    pub fn is_measurable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Legal horizontal range for a sprite's left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalBounds {
    pub left: f32,
    pub right: f32,
    pub sprite_width: f32,
}

impl HorizontalBounds {
    /// Largest legal x. Never below `left`, so narrow containers pin sprites
    /// to the left edge instead of inverting the range.
    pub fn max_x(&self) -> f32 {
        (self.right - self.sprite_width).max(self.left)
    }

    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.left, self.max_x())
    }

    pub fn contains(&self, x: f32) -> bool {
        x >= self.left && x <= self.max_x()
    }
}

/// Uniform sample between `min` and `max`. Collapses to `min` when the range is empty.
pub fn rand_range(rng: &mut fastrand::Rng, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    min + rng.f32() * (max - min)
}

/// Random sign, +1 or -1 with equal odds.
pub fn rand_sign(rng: &mut fastrand::Rng) -> f32 {
    if rng.bool() {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn touching_edges_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn contained_rect_intersects() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn inset_never_goes_negative() {
        let r = Rect::new(10.0, 10.0, 12.0, 12.0).inset(8.0, 18.0, 8.0, 0.0);
        assert_eq!(r.x, 18.0);
        assert_eq!(r.y, 28.0);
        assert_eq!(r.w, 0.0);
        assert_eq!(r.h, 0.0);
    }

    #[test]
    fn bounds_clamp_and_narrow_container() {
        let b = HorizontalBounds { left: 8.0, right: 790.0, sprite_width: 120.0 };
        assert_eq!(b.max_x(), 670.0);
        assert_eq!(b.clamp(-5.0), 8.0);
        assert_eq!(b.clamp(900.0), 670.0);

        let narrow = HorizontalBounds { left: 8.0, right: 90.0, sprite_width: 120.0 };
        assert_eq!(narrow.max_x(), 8.0);
        assert!(narrow.contains(narrow.clamp(50.0)));
    }

    #[test]
    fn unmeasurable_container() {
        assert!(!Container::new(0.0, 600.0).is_measurable());
        assert!(!Container::new(800.0, 0.0).is_measurable());
        assert!(!Container::new(f32::NAN, 10.0).is_measurable());
        assert!(Container::new(1.0, 1.0).is_measurable());
    }

    #[test]
    fn rand_range_stays_in_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..1000 {
            let v = rand_range(&mut rng, 16.0, 700.0);
            assert!((16.0..=700.0).contains(&v));
        }
        assert_eq!(rand_range(&mut rng, 5.0, 5.0), 5.0);
    }
}
