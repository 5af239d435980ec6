use std::fmt;

use itertools::Itertools;
use tracing::{debug, info};

use crate::error::{DividerError, Result};
use crate::{format_resistance, ResistorSet, ACHIEVABLE_LIMIT, DEFAULT_OWNED_TOLERANCE};

/// Output voltage of an unloaded divider with the output taken across `r2`.
/// # Examples
/// ```
///     # use divider_calc::output_voltage;
///     assert_eq!(output_voltage(5.0, 1.0, 1.0), 2.5);
/// ```
pub fn output_voltage(vin: f64, r1: f64, r2: f64) -> f64 {
    vin * (r2 / (r1 + r2))
}

/// Current through the divider in mA, with resistances in kΩ.
fn current_ma(vin: f64, r1: f64, r2: f64) -> f64 {
    vin / (r1 + r2)
}

/// The position a resistor takes in the divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The upper resistor, between Vin and the output
    R1,
    /// The lower resistor, between the output and ground
    R2,
}

impl Role {
    pub const BOTH: [Role; 2] = [Role::R1, Role::R2];

    /// Computes the partner needed for an exact `vout` when `existing` sits in this role.
    ///
    /// Fails with [`DividerError::NoFiniteSolution`] when no finite positive partner exists:
    /// an upper resistor cannot reach `vout == vin`, a lower one cannot reach `vout == 0`.
    pub fn partner_for(self, vin: f64, vout: f64, existing: f64) -> Result<f64> {
        let partner = match self {
            Role::R1 if vin > vout => existing * vout / (vin - vout),
            Role::R2 if vout > 0.0 => existing * (vin - vout) / vout,
            _ => 0.0,
        };
        if partner.is_finite() && partner > 0.0 {
            Ok(partner)
        } else {
            Err(DividerError::NoFiniteSolution {
                role: self,
                existing,
            })
        }
    }

    /// Orders `existing` and `partner` into (R1, R2) for this role of `existing`.
    pub fn arrange(self, existing: f64, partner: f64) -> (f64, f64) {
        match self {
            Role::R1 => (existing, partner),
            Role::R2 => (partner, existing),
        }
    }

    /// The role the partner plays.
    pub fn other(self) -> Role {
        match self {
            Role::R1 => Role::R2,
            Role::R2 => Role::R1,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Role::R1 => write!(f, "R1"),
            Role::R2 => write!(f, "R2"),
        }
    }
}

/// One evaluated (R1, R2) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub r1: f64,
    pub r2: f64,
    /// Output voltage this pair actually produces
    pub vout: f64,
    /// Absolute distance from the desired output voltage
    pub error: f64,
    pub current_ma: f64,
    pub power_mw: f64,
}

impl Candidate {
    fn evaluate(vin: f64, desired: f64, r1: f64, r2: f64) -> Self {
        let vout = output_voltage(vin, r1, r2);
        let current_ma = current_ma(vin, r1, r2);
        Candidate {
            r1,
            r2,
            vout,
            error: (vout - desired).abs(),
            current_ma,
            power_mw: vin * current_ma,
        }
    }

    /// Total series resistance, lower wastes less power in the divider.
    pub fn total(&self) -> f64 {
        self.r1 + self.r2
    }

}

/// `volts` in parts per billion of `vin`, so that float noise does not split ties at any scale.
fn ppb(volts: f64, vin: f64) -> u64 {
    (volts / vin * 1e9).round() as u64
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "R1: {}, R2: {}, Vout: {:.3} V, Error: {:.3} V",
            format_resistance(self.r1),
            format_resistance(self.r2),
            self.vout,
            self.error
        )
    }
}

/// A partner value that would hit the target exactly together with one owned resistor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Suggestion {
    /// The resistor already owned
    pub existing: f64,
    /// Where the owned resistor goes
    pub role: Role,
    /// The value needed in the other position
    pub partner: f64,
    /// Whether the set already holds `partner`, within the calculator's tolerance
    pub owned: bool,
    pub current_ma: f64,
}

impl Suggestion {
    /// The suggested upper resistor.
    pub fn r1(&self) -> f64 {
        self.role.arrange(self.existing, self.partner).0
    }

    /// The suggested lower resistor.
    pub fn r2(&self) -> f64 {
        self.role.arrange(self.existing, self.partner).1
    }
}

/// Voltages reachable at or below the target, highest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Achievable {
    vout: f64,
    entries: Vec<Candidate>,
    total: usize,
}

impl Achievable {
    /// Provides an iterator over the kept entries, from the highest voltage down.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter()
    }

    /// Number of kept entries, at most [`ACHIEVABLE_LIMIT`].
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no pair reaches the target or below.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of qualifying pairs before truncation.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of qualifying pairs dropped by truncation.
    pub fn remaining(&self) -> usize {
        self.total - self.entries.len()
    }

    /// The informational error describing an empty listing, if it is empty.
    pub fn shortfall(&self) -> Option<DividerError> {
        if self.is_empty() {
            Some(DividerError::NoAchievableVoltage { vout: self.vout })
        } else {
            None
        }
    }
}

/// All three results for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub vin: f64,
    pub vout: f64,
    pub best: Candidate,
    pub suggestions: Vec<Suggestion>,
    pub achievable: Achievable,
}

/// Main calculator struct, borrowing the set of resistors to search.
#[derive(Debug, Clone)]
pub struct DividerCalc<'a> {
    resistors: &'a ResistorSet,
    max_current_ma: Option<f64>,
    tolerance: f64,
}

impl<'a> DividerCalc<'a> {
    /// Creates a calculator over `resistors`, with no current limit and the default 0.1%
    /// tolerance for recognising owned values.
    pub fn new(resistors: &'a ResistorSet) -> Self {
        DividerCalc {
            resistors,
            max_current_ma: None,
            tolerance: DEFAULT_OWNED_TOLERANCE,
        }
    }

    /// Excludes every pair drawing more than `max_ma` milliamps from Vin.
    pub fn with_max_current(mut self, max_ma: f64) -> Self {
        self.max_current_ma = Some(max_ma);
        self
    }

    /// Sets the relative tolerance used to decide a suggested partner is already owned.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns the number of ordered pairs the calculator examines.
    pub fn combinations(&self) -> usize {
        self.resistors.len() * self.resistors.len()
    }

    fn check(&self, vin: f64, vout: f64) -> Result<()> {
        if self.resistors.is_empty() {
            return Err(DividerError::NoResistorsAvailable);
        }
        if !(vin.is_finite() && vin > 0.0) {
            return Err(DividerError::InvalidInputVoltage { vin });
        }
        if !(vout >= 0.0 && vout <= vin) {
            return Err(DividerError::InvalidOutputVoltage { vin, vout });
        }
        if let Some(max_ma) = self.max_current_ma {
            if !(max_ma.is_finite() && max_ma > 0.0) {
                return Err(DividerError::InvalidCurrentLimit { max_ma });
            }
        }
        if !(self.tolerance >= 0.0) {
            return Err(DividerError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }
        Ok(())
    }

    fn within_limit(&self, current_ma: f64) -> bool {
        self.max_current_ma.map_or(true, |max| current_ma <= max)
    }

    /// Every pair that respects the current limit, in enumeration order.
    fn candidates(&self, vin: f64, vout: f64) -> impl Iterator<Item = Candidate> + '_ {
        self.resistors
            .pairs()
            .map(move |(r1, r2)| Candidate::evaluate(vin, vout, r1, r2))
            .filter(move |c| self.within_limit(c.current_ma))
    }

    /// Finds the pair whose output is closest to `vout`. Among equally close pairs the one with
    /// the lowest total resistance wins, then the one found first.
    /// # Examples
    /// ```
    ///     # use divider_calc::*;
    ///     let set = ResistorSet::new(vec![1.0, 2.0, 3.0]).unwrap();
    ///     let best = DividerCalc::new(&set).best_pair(9.0, 6.0).unwrap();
    ///     assert_eq!((best.r1, best.r2), (1.0, 2.0));
    /// ```
    pub fn best_pair(&self, vin: f64, vout: f64) -> Result<Candidate> {
        self.check(vin, vout)?;
        let best = self
            .candidates(vin, vout)
            .min_by(|a, b| {
                ppb(a.error, vin)
                    .cmp(&ppb(b.error, vin))
                    .then(a.total().total_cmp(&b.total()))
            })
            .ok_or(DividerError::NoPairWithinCurrentLimit {
                max_ma: self.max_current_ma.unwrap_or(0.0),
            })?;
        debug!("Best of {} pairs: {}", self.combinations(), best);
        Ok(best)
    }

    /// Lists, for every owned resistor in each role, the partner that would give exactly `vout`.
    /// Roles without a finite partner, and pairs over the current limit, are left out.
    pub fn suggest(&self, vin: f64, vout: f64) -> Result<Vec<Suggestion>> {
        self.check(vin, vout)?;
        Ok(self
            .resistors
            .iter()
            .cartesian_product(Role::BOTH.iter())
            .filter_map(|(&existing, &role)| {
                let partner = match role.partner_for(vin, vout, existing) {
                    Ok(partner) => partner,
                    Err(err) => {
                        debug!("Skipping suggestion: {}", err);
                        return None;
                    }
                };
                let (r1, r2) = role.arrange(existing, partner);
                let current_ma = current_ma(vin, r1, r2);
                if !self.within_limit(current_ma) {
                    debug!(
                        "Skipping suggestion R1: {}, R2: {}: {:.3} mA over limit",
                        r1, r2, current_ma
                    );
                    return None;
                }
                Some(Suggestion {
                    existing,
                    role,
                    partner,
                    owned: self.resistors.find_within(partner, self.tolerance).is_some(),
                    current_ma,
                })
            })
            .collect())
    }

    /// Enumerates pairs producing at most `vout`, highest voltage first, lowest total resistance
    /// first among equal voltages, keeping the top [`ACHIEVABLE_LIMIT`].
    pub fn achievable(&self, vin: f64, vout: f64) -> Result<Achievable> {
        self.check(vin, vout)?;
        let mut entries = self
            .candidates(vin, vout)
            .filter(|c| c.vout <= vout)
            .sorted_by(|a, b| {
                ppb(b.vout, vin)
                    .cmp(&ppb(a.vout, vin))
                    .then(a.total().total_cmp(&b.total()))
            })
            .collect::<Vec<Candidate>>();
        let total = entries.len();
        entries.truncate(ACHIEVABLE_LIMIT);
        Ok(Achievable {
            vout,
            entries,
            total,
        })
    }

    /// Runs all three queries for one (Vin, Vout).
    pub fn solve(&self, vin: f64, vout: f64) -> Result<Solution> {
        let best = self.best_pair(vin, vout)?;
        let suggestions = self.suggest(vin, vout)?;
        let achievable = self.achievable(vin, vout)?;
        info!(
            "Solved {} V -> {} V over {} resistors: {} suggestions, {} achievable",
            vin,
            vout,
            self.resistors.len(),
            suggestions.len(),
            achievable.total()
        );
        Ok(Solution {
            vin,
            vout,
            best,
            suggestions,
            achievable,
        })
    }
}
