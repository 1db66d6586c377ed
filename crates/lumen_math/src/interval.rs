/// Closed range of ray parameters or coordinates along one axis.
///
/// Intersection routines take an `Interval` as the window of accepted `t`
/// values and narrow it as closer hits are found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Accepts every `t`; used where a primitive must report hits behind the origin.
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// `min <= x <= max`. Axis-aligned rectangles accept hits on the window ends.
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// `min < x < max`. NaN is never surrounded.
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Same lower bound, new upper bound. Used to shrink the window to the closest hit so far.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }

    /// Widen by `delta` in total, split evenly between both ends.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Shift both ends by `displacement`.
    pub fn add_scalar(&self, displacement: f32) -> Interval {
        Interval::new(self.min + displacement, self.max + displacement)
    }

    /// Smallest interval covering both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size() {
        assert_eq!(Interval::new(2.0, 7.0).size(), 5.0);
        assert_eq!(Interval::new(-5.0, 5.0).size(), 10.0);
    }

    #[test]
    fn test_interval_contains_is_inclusive() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));
        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_surrounds_is_exclusive() {
        let interval = Interval::new(0.0, 10.0);

        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(0.1));
        assert!(!interval.surrounds(f32::NAN));
    }

    #[test]
    fn test_with_max_narrows_window() {
        let window = Interval::new(0.001, f32::INFINITY).with_max(3.0);

        assert_eq!(window, Interval::new(0.001, 3.0));
        assert!(!window.surrounds(3.5));
    }

    #[test]
    fn test_interval_expand_and_shift() {
        let expanded = Interval::new(0.0, 10.0).expand(4.0);
        assert_eq!(expanded, Interval::new(-2.0, 12.0));

        let shifted = expanded.add_scalar(-1.0);
        assert_eq!(shifted, Interval::new(-3.0, 11.0));
    }

    #[test]
    fn test_interval_surrounding() {
        let a = Interval::new(1.0, 5.0);
        let b = Interval::new(-2.0, 3.0);
        let s = Interval::surrounding(&a, &b);

        assert_eq!(s, Interval::new(-2.0, 5.0));
        assert_eq!(Interval::surrounding(&b, &a), s);
    }

    #[test]
    fn test_universe_accepts_everything() {
        assert!(Interval::UNIVERSE.surrounds(1e10));
        assert!(Interval::UNIVERSE.surrounds(-1e10));
    }
}
