use anyhow::anyhow;
use derive_more::Display;

/// A range between two `f64` values, inclusive on both ends. Used both for
/// fixed bounds (e.g. the [0,1] range every scalar field must land in) and for
/// bounds observed while sampling a layer.
#[derive(Copy, Clone, Debug, Display, PartialEq)]
#[display(fmt = "[{}, {}]", min, max)]
pub struct NumRange {
    pub min: f64,
    pub max: f64,
}

impl NumRange {
    /// Span used when a range has collapsed to a single value. Normalizing
    /// against a zero span would divide by zero, so we fall back to this.
    const FALLBACK_SPAN: f64 = 1.0;

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Get the [0,1] range
    pub const fn normal_range() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Find the smallest range containing every value in the iterator. Returns
    /// `None` if the iterator is empty.
    pub fn observe(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |range, value| match range {
            None => Some(Self::new(value, value)),
            Some(range) => Some(range.extend(value)),
        })
    }

    /// Grow this range (if necessary) so that it includes the given value
    pub fn extend(self, value: f64) -> Self {
        Self::new(self.min.min(value), self.max.max(value))
    }

    /// Max minus min
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check if a value is in this range. Ranges are inclusive on both ends.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Checks if the value is in this range. If it isn't, return an error.
    pub fn ensure_contains(&self, value: f64) -> anyhow::Result<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(anyhow!("value {} is not in range {}", value, self))
        }
    }

    /// Map a value from this range onto [0,1]. Values outside the range will
    /// land outside [0,1]. If the range has no span, we divide by
    /// [Self::FALLBACK_SPAN] instead, which just shifts the value down by the
    /// min.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        let span = if span > 0.0 { span } else { Self::FALLBACK_SPAN };
        (value - self.min) / span
    }

    /// Force a value into this range. If it's outside the range, return the
    /// bound (lower or upper) that's closest to the value.
    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Create a [RangeValue] in this range, which is convenient for chaining
    /// operations on a single value.
    pub fn value(self, value: f64) -> RangeValue {
        RangeValue { value, range: self }
    }
}

/// An alternative interface for [NumRange] that makes it easy to chain
/// operations on a single value.
///
/// ```
/// use hexgen::NumRange;
///
/// let range = NumRange::new(10.0, 20.0);
/// let value = range.value(15.0).normalize().apply(|x| x + 1.0).inner();
/// assert_eq!(value, 1.5);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct RangeValue {
    value: f64,
    range: NumRange,
}

impl RangeValue {
    /// Get the value from this struct
    pub fn inner(self) -> f64 {
        self.value
    }

    /// Map this value onto [0,1]. The new range is [0,1] as well.
    pub fn normalize(self) -> Self {
        Self {
            value: self.range.normalize(self.value),
            range: NumRange::normal_range(),
        }
    }

    /// Force the value into the current range
    pub fn clamp(self) -> Self {
        Self {
            value: self.range.clamp(self.value),
            range: self.range,
        }
    }

    /// Replace the value with the output of the given function. The range is
    /// unchanged, so this is usually followed by [Self::clamp].
    pub fn apply(self, f: impl FnOnce(f64) -> f64) -> Self {
        Self {
            value: f(self.value),
            range: self.range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_observe() {
        assert_eq!(NumRange::observe(vec![]), None);
        assert_eq!(
            NumRange::observe(vec![0.4, -0.2, 0.9, 0.1]),
            Some(NumRange::new(-0.2, 0.9))
        );
        assert_eq!(
            NumRange::observe(vec![0.5]),
            Some(NumRange::new(0.5, 0.5))
        );
    }

    #[test]
    fn test_contains() {
        let range = NumRange::new(1.0, 3.0);
        assert!(!range.contains(0.9));
        assert!(range.contains(1.0));
        assert!(range.contains(3.0));
        assert!(!range.contains(3.1));
        assert!(range.ensure_contains(2.0).is_ok());
        assert!(range.ensure_contains(f64::NAN).is_err());
    }

    #[test]
    fn test_normalize() {
        let range = NumRange::new(1.0, 3.0);
        assert_approx_eq!(range.normalize(0.0), -0.5);
        assert_approx_eq!(range.normalize(2.0), 0.5);
        assert_approx_eq!(range.normalize(3.0), 1.0);

        // Zero span falls back to dividing by 1
        let range = NumRange::new(0.4, 0.4);
        assert_approx_eq!(range.normalize(0.4), 0.0);
        assert_approx_eq!(range.normalize(0.9), 0.5);
    }

    #[test]
    fn test_chain() {
        let value = NumRange::new(0.2, 0.6)
            .value(0.8)
            .normalize()
            .clamp()
            .apply(|v| v * 0.5)
            .inner();
        assert_approx_eq!(value, 0.5);
    }
}
