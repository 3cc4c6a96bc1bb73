//! Exact rates for frame timing and audio.

use std::fmt;

/// A rate expressed as `num / den`.
///
/// Frame and sample rates are declared to the host as exact fractions
/// (e.g. `60/1` fps, `12000/1` Hz) so nothing drifts through float rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: u32,
    pub den: u32,
}

impl Rational {
    #[must_use]
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Whole-number rate (`n/1`).
    #[must_use]
    pub const fn whole(num: u32) -> Self {
        Self { num, den: 1 }
    }

    /// The rate as a float. A zero denominator yields 0.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        if self.den == 0 {
            0.0
        } else {
            f64::from(self.num) / f64::from(self.den)
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_rate_converts() {
        let fps = Rational::whole(60);
        assert_eq!(fps.den, 1);
        assert!((fps.as_f64() - 60.0).abs() < f64::EPSILON);
        assert_eq!(fps.to_string(), "60/1");
    }

    #[test]
    fn zero_denominator_is_zero() {
        assert!(Rational::new(5, 0).as_f64().abs() < f64::EPSILON);
    }
}
