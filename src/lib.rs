//! A voltage divider calculator for the resistors you actually have.
//!
//! Given an input voltage, a desired output voltage and the resistor values in your parts drawer,
//! it finds the pair R1, R2 whose output is closest to the target, lists the partner value you
//! would need to buy to hit the target exactly with each resistor you own, and enumerates the
//! voltages you can already reach at or below the target.
//!
//! The divider is the usual two resistor series chain with the output taken across R2:
//!
//! ```text
//! Vin ──[ R1 ]──┬──[ R2 ]── GND
//!               │
//!              Vout = Vin · R2 / (R1 + R2)
//! ```
//!
//! All resistor values are in kilo-ohms, so divider currents come out in milliamps.
//!
//! # Example
//! ```rust
//! extern crate divider_calc;
//!
//! use divider_calc::*;
//!
//! fn main() {
//!     let resistors = ResistorSet::new(vec![470.0, 0.220, 1.0, 2.2, 5.6]).unwrap();
//!     let calc = DividerCalc::new(&resistors);
//!
//!     let best = calc.best_pair(5.0, 3.0).unwrap();
//!     println!("{}", best);
//!     assert_eq!((best.r1, best.r2), (1.0, 2.2));
//! }
//! ```
//! Running this example prints:
//! ```text
//! R1: 1K, R2: 2K2, Vout: 3.438 V, Error: 0.438 V
//! ```

extern crate itertools;
#[macro_use]
extern crate lazy_static;

use itertools::Itertools;
use tracing::debug;

pub mod config;
mod divider;
pub mod error;
pub mod report;

pub use divider::{
    output_voltage, Achievable, Candidate, DividerCalc, Role, Solution, Suggestion,
};
pub use error::{DividerError, Result};

/// Decades spanned by the standard series, as multipliers of a kΩ base value (1R .. 9M1).
const POWERS: &[f64] = &[1e-3, 1e-2, 1e-1, 1e0, 1e1, 1e2, 1e3];

/// Input voltage above which a typical microcontroller ADC pin is no longer safe.
pub const ADC_SAFE_VOLTAGE: f64 = 3.3;

/// Default relative tolerance used to decide that a computed partner is already owned (0.1%).
pub const DEFAULT_OWNED_TOLERANCE: f64 = 1e-3;

/// Maximum number of entries kept by the achievable voltage listing.
pub const ACHIEVABLE_LIMIT: usize = 15;

lazy_static! {
    /// RSeries constant for the E3 standard series
    pub static ref E3: RSeries = RSeries::new(&[1.0, 2.2, 4.7]);
    /// RSeries constant for the E6 standard series
    pub static ref E6: RSeries = RSeries::extend(&E3, &[1.5, 3.3, 6.8]);
    /// RSeries constant for the E12 standard series
    pub static ref E12: RSeries = RSeries::extend(&E6, &[1.2, 1.8, 2.7, 3.9, 5.6, 8.2]);
    /// RSeries constant for the E24 standard series
    pub static ref E24: RSeries = RSeries::extend(
        &E12,
        &[1.1, 1.3, 1.6, 2.0, 2.4, 3.0, 3.6, 4.3, 5.1, 6.2, 7.5, 9.1]
    );
}

/// A standard series of resistor values in kΩ, constants are provided for the E3 to E24 series.
#[derive(Debug)]
pub struct RSeries {
    values: Box<[f64]>,
}

impl RSeries {
    fn new(series: &[f64]) -> Self {
        RSeries {
            values: series
                .iter()
                .cartesian_product(POWERS.iter())
                .map(|(val, pow)| val * pow)
                .collect::<Vec<f64>>()
                .into_boxed_slice(),
        }
    }

    fn extend(base: &RSeries, add: &[f64]) -> Self {
        RSeries {
            values: base
                .iter()
                .cloned()
                .chain(
                    add.iter()
                        .cartesian_product(POWERS.iter())
                        .map(|(val, pow)| val * pow),
                )
                .collect::<Vec<f64>>()
                .into_boxed_slice(),
        }
    }

    fn iter(&self) -> impl Iterator<Item = &f64> + Clone {
        self.values.iter()
    }

    /// Number of values in the series across all decades.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns the series value closest to `kohm` on a logarithmic scale, which is how the
    /// series are spaced. Suitable as a "what to buy" hint for a computed partner value.
    /// # Examples
    /// ```
    ///     # use divider_calc::*;
    ///     assert_eq!(E12.nearest(3.4), 3.3);
    ///     assert_eq!(E3.nearest(5.0), 4.7);
    /// ```
    pub fn nearest(&self, kohm: f64) -> f64 {
        self.iter()
            .cloned()
            .min_by(|a, b| {
                (a / kohm).ln().abs().total_cmp(&(b / kohm).ln().abs())
            })
            .unwrap_or(kohm)
    }
}

/// The resistor values available for building a divider, in kΩ.
///
/// Values keep the order they were first given in, which decides between otherwise equal
/// results. Exact duplicates add nothing to the search and are collapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResistorSet {
    values: Box<[f64]>,
}

impl ResistorSet {
    /// Builds a set from raw values, rejecting anything that is not a positive, finite number.
    /// # Examples
    /// ```
    ///     # use divider_calc::*;
    ///     let set = ResistorSet::new(vec![2.2, 1.0, 2.2]).unwrap();
    ///     assert_eq!(set.len(), 2);
    ///     assert!(ResistorSet::new(vec![1.0, -4.7]).is_err());
    /// ```
    pub fn new(values: impl IntoIterator<Item = f64>) -> Result<Self> {
        let values = values.into_iter().collect::<Vec<f64>>();
        if let Some(bad) = values.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
            return Err(DividerError::invalid_value(
                bad.to_string(),
                "resistor values must be positive",
            ));
        }
        let given = values.len();
        let values = values
            .into_iter()
            .unique_by(|v| v.to_bits())
            .collect::<Vec<f64>>()
            .into_boxed_slice();
        if values.len() < given {
            debug!(
                "Collapsed {} duplicate resistor values",
                given - values.len()
            );
        }
        Ok(ResistorSet { values })
    }

    /// Builds a set holding every value of a standard series.
    pub fn from_series(series: &RSeries) -> Self {
        ResistorSet {
            values: series
                .iter()
                .cloned()
                .unique_by(|v| v.to_bits())
                .collect::<Vec<f64>>()
                .into_boxed_slice(),
        }
    }

    /// Iterates the values in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &f64> + Clone {
        self.values.iter()
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there is nothing to build a divider from.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the first owned value within `tolerance` (relative) of `kohm`, if any.
    pub fn find_within(&self, kohm: f64, tolerance: f64) -> Option<f64> {
        self.iter()
            .cloned()
            .find(|v| (v - kohm).abs() <= tolerance * v.abs().max(kohm.abs()))
    }

    /// All ordered (R1, R2) pairs, drawn with replacement, R1 varying slowest.
    pub(crate) fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + Clone + '_ {
        self.iter()
            .cloned()
            .cartesian_product(self.iter().cloned())
    }
}

fn _format_rval(r: f64, unit: &str) -> String {
    let mut val = format!("{}", (r * 1000.0).round() / 1000.0);
    if val.contains('.') {
        val.replace(".", unit)
    } else {
        val.push_str(unit);
        val
    }
}

/// Formats a kΩ value in the R/K/M notation printed on schematics, e.g. `220R`, `2K2`, `470K`.
/// # Examples
/// ```
///     # use divider_calc::format_resistance;
///     assert_eq!(format_resistance(0.22), "220R");
///     assert_eq!(format_resistance(2.2), "2K2");
///     assert_eq!(format_resistance(4700.0), "4M7");
/// ```
pub fn format_resistance(kohm: f64) -> String {
    let r = kohm * 1000.0;
    if r < 1000.0 {
        _format_rval(r, "R")
    } else if r < 1_000_000.0 {
        _format_rval(r / 1000.0, "K")
    } else {
        _format_rval(r / 1_000_000.0, "M")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_series_sizes() {
        assert_eq!(E3.len(), 3 * POWERS.len());
        assert_eq!(E6.len(), 6 * POWERS.len());
        assert_eq!(E12.len(), 12 * POWERS.len());
        assert_eq!(E24.len(), 24 * POWERS.len());
    }

    #[test]
    fn test_series_nearest() {
        assert_relative_eq!(E24.nearest(8.4), 8.2, max_relative = 1e-9);
        assert_relative_eq!(E12.nearest(705.0), 680.0, max_relative = 1e-9);
        assert_relative_eq!(E6.nearest(0.14667), 0.15, max_relative = 1e-9);
    }

    #[test]
    fn test_set_keeps_first_seen_order() {
        let set = ResistorSet::new(vec![5.6, 1.0, 5.6, 0.22, 1.0]).unwrap();
        assert_eq!(set.iter().cloned().collect::<Vec<_>>(), vec![5.6, 1.0, 0.22]);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        assert!(ResistorSet::new(vec![0.0]).is_err());
        assert!(ResistorSet::new(vec![f64::NAN]).is_err());
        assert!(ResistorSet::new(vec![f64::INFINITY]).is_err());
        assert!(ResistorSet::new(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_set_from_series() {
        let set = ResistorSet::from_series(&E3);
        assert_eq!(set.len(), E3.len());
        assert!(set.find_within(4.7, 0.0).is_some());
    }

    #[test]
    fn test_find_within_tolerance() {
        let set = ResistorSet::new(vec![1.0, 3.3]).unwrap();
        assert_eq!(set.find_within(3.302, 1e-3), Some(3.3));
        assert_eq!(set.find_within(3.31, 1e-3), None);
        assert_eq!(set.find_within(1.0, 0.0), Some(1.0));
    }

    #[test]
    fn test_pairs_cover_square() {
        let set = ResistorSet::new(vec![1.0, 2.0, 3.0]).unwrap();
        let pairs = set.pairs().collect::<Vec<_>>();
        assert_eq!(pairs.len(), 9);
        assert_eq!(pairs[0], (1.0, 1.0));
        assert_eq!(pairs[1], (1.0, 2.0));
        assert_eq!(pairs[8], (3.0, 3.0));
    }

    #[test]
    fn test_format_resistance() {
        assert_eq!(format_resistance(1.0), "1K");
        assert_eq!(format_resistance(470.0), "470K");
        assert_eq!(format_resistance(5.6), "5K6");
        assert_eq!(format_resistance(8.4), "8K4");
        assert_eq!(format_resistance(0.001), "1R");
        assert_eq!(format_resistance(313.333_333), "313K333");
    }
}
