pub mod range;

use std::cmp::Ordering;

/// A macro to measure the evaluation time of an expression. Wraps an
/// expression, logs how long it took to evaluate, then returns its value.
#[macro_export]
macro_rules! timed {
    ($label:expr, $ex:expr) => {
        $crate::timed!($label, log::Level::Debug, $ex)
    };
    ($label:expr, $log_level:expr, $ex:expr) => {{
        let now = std::time::Instant::now();
        let value = $ex;
        let elapsed = now.elapsed();
        log::log!($log_level, "{} took {} ms", $label, elapsed.as_millis());
        value
    }};
}

/// Compare two `PartialOrd` values dangerously. If the partial comparison
/// fails (returns `None`), this will panic. This is useful if you have floats
/// that you know for a fact will not be `NaN`.
pub fn cmp_unwrap<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap()
}

/// Force a value into [0,1]. Nearly every step of layer synthesis ends with
/// this.
pub fn clamp_unit(value: f64) -> f64 {
    value.max(0.0).min(1.0)
}
