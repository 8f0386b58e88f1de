//! Range-clamped values
//!
//! [`Clamped`] keeps a value inside an inclusive range on construction and on
//! every write. [`Progress`] is the `0.0..=1.0` specialization the refresh
//! control reports to its indicator.

use std::fmt;
use std::ops::RangeInclusive;

/// A value that is clamped into an inclusive range on every write
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clamped<T: PartialOrd + Copy> {
    value: T,
    lower: T,
    upper: T,
}

impl<T: PartialOrd + Copy> Clamped<T> {
    /// Create a clamped value, clamping `value` into `range` immediately
    pub fn new(value: T, range: RangeInclusive<T>) -> Self {
        let (lower, upper) = range.into_inner();
        Self {
            value: clamp(value, lower, upper),
            lower,
            upper,
        }
    }

    pub fn get(&self) -> T {
        self.value
    }

    /// Store `value`, clamped into the range
    pub fn set(&mut self, value: T) {
        self.value = clamp(value, self.lower, self.upper);
    }

    pub fn lower(&self) -> T {
        self.lower
    }

    pub fn upper(&self) -> T {
        self.upper
    }
}

// Works for any PartialOrd. NaN compares false both ways and is kept as-is
// by this helper, so floating-point callers sanitize it first.
fn clamp<T: PartialOrd + Copy>(value: T, lower: T, upper: T) -> T {
    if value < lower {
        lower
    } else if value > upper {
        upper
    } else {
        value
    }
}

/// Refresh progress in `[0, 1]`
///
/// `0.0` means the control is at rest, `1.0` means the pull reached the
/// trigger height (or the control is refreshing).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress(Clamped<f32>);

impl Progress {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 1.0;

    pub fn new(value: f32) -> Self {
        let mut progress = Self::default();
        progress.set(value);
        progress
    }

    pub fn value(&self) -> f32 {
        self.0.get()
    }

    /// Store `value` clamped to `[0, 1]`. NaN is stored as `0.0`.
    pub fn set(&mut self, value: f32) {
        self.0.set(if value.is_nan() { Self::MIN } else { value });
    }

    /// Whether the pull reached the trigger height
    pub fn is_complete(&self) -> bool {
        self.value() >= Self::MAX
    }

    /// Fraction of the trigger height covered by a pull of `distance`
    ///
    /// A non-positive trigger height yields `0.0` instead of dividing by zero.
    pub fn from_pull(distance: f32, trigger_height: f32) -> Self {
        if trigger_height <= 0.0 || !trigger_height.is_finite() {
            return Self::default();
        }
        Self::new(distance.abs() / trigger_height)
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self(Clamped::new(Self::MIN, Self::MIN..=Self::MAX))
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.value() * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_construction() {
        let c = Clamped::new(12, 0..=10);
        assert_eq!(c.get(), 10);

        let c = Clamped::new(-3, 0..=10);
        assert_eq!(c.get(), 0);
    }

    #[test]
    fn test_clamped_set() {
        let mut c = Clamped::new(0.5_f32, 0.0..=1.0);
        c.set(0.25);
        assert_eq!(c.get(), 0.25);
        c.set(7.0);
        assert_eq!(c.get(), 1.0);
        c.set(-7.0);
        assert_eq!(c.get(), 0.0);
        assert_eq!((c.lower(), c.upper()), (0.0, 1.0));
    }

    #[test]
    fn test_progress_clamps_every_write() {
        for v in [-1000.0, -1.0, -0.001, 0.0, 0.3, 0.999, 1.0, 1.001, 42.0, f32::INFINITY] {
            let p = Progress::new(v);
            assert!((0.0..=1.0).contains(&p.value()), "{} escaped range", v);
            if (0.0..=1.0).contains(&v) {
                assert_eq!(p.value(), v);
            }
        }
        assert_eq!(Progress::new(f32::NAN).value(), 0.0);
        assert_eq!(Progress::new(f32::NEG_INFINITY).value(), 0.0);
    }

    #[test]
    fn test_progress_from_pull() {
        assert_eq!(Progress::from_pull(-40.0, 80.0).value(), 0.5);
        assert_eq!(Progress::from_pull(-80.0, 80.0).value(), 1.0);
        assert_eq!(Progress::from_pull(-200.0, 80.0).value(), 1.0);
        assert!(Progress::from_pull(-200.0, 80.0).is_complete());

        // Degenerate trigger heights never divide by zero
        assert_eq!(Progress::from_pull(-50.0, 0.0).value(), 0.0);
        assert_eq!(Progress::from_pull(-50.0, -10.0).value(), 0.0);
        assert_eq!(Progress::from_pull(-50.0, f32::NAN).value(), 0.0);
    }

    #[test]
    fn test_progress_monotonic_under_linear_pull() {
        let h = 80.0;
        let mut last = -1.0;
        for step in 0..=160 {
            let offset = -(step as f32) * h / 160.0;
            let p = Progress::from_pull(offset, h).value();
            assert!(p >= last);
            last = p;
        }
        assert_eq!(last, 1.0);
        assert_eq!(Progress::from_pull(0.0, h).value(), 0.0);
    }

    #[test]
    fn test_progress_display() {
        assert_eq!(Progress::new(0.5).to_string(), "50%");
    }
}
