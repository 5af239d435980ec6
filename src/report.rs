//! Text rendering of a [`Solution`].

use std::fmt;

use crate::{format_resistance, RSeries, Solution, Suggestion};

/// Renders the three result sections of a solution. When a buy series is set, every suggestion
/// for a partner you do not own also names the nearest standard value to order.
pub struct Report<'a> {
    solution: &'a Solution,
    buy_series: Option<&'a RSeries>,
}

impl<'a> Report<'a> {
    pub fn new(solution: &'a Solution) -> Self {
        Report {
            solution,
            buy_series: None,
        }
    }

    pub fn with_buy_series(mut self, series: &'a RSeries) -> Self {
        self.buy_series = Some(series);
        self
    }

    fn fmt_best(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let best = &self.solution.best;
        writeln!(f, "=== Best Resistor Combination ===")?;
        writeln!(f, "R1: {}", format_resistance(best.r1))?;
        writeln!(f, "R2: {}", format_resistance(best.r2))?;
        writeln!(f, "Actual output voltage: {:.3} V", best.vout)?;
        writeln!(f, "Error from desired voltage: {:.3} V", best.error)?;
        writeln!(f, "Current consumption: {:.3} mA", best.current_ma)?;
        writeln!(f, "Power consumption: {:.3} mW", best.power_mw)
    }

    fn fmt_suggestion(&self, f: &mut fmt::Formatter, s: &Suggestion) -> fmt::Result {
        let needed = s.role.other();
        write!(
            f,
            "Use R1 = {} with R2 = {} (you have {} = {}",
            format_resistance(s.r1()),
            format_resistance(s.r2()),
            s.role,
            format_resistance(s.existing)
        )?;
        if s.owned {
            write!(f, ", {} also in stock", needed)?;
        } else if let Some(series) = self.buy_series {
            write!(
                f,
                ", nearest standard {}: {}",
                needed,
                format_resistance(series.nearest(s.partner))
            )?;
        }
        writeln!(f, ", current: {:.3} mA)", s.current_ma)
    }

    fn fmt_suggestions(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "=== Suggested Resistors for Exact Output ===")?;
        if self.solution.suggestions.is_empty() {
            return writeln!(f, "No exact-match suggestions for these voltages.");
        }
        for s in &self.solution.suggestions {
            self.fmt_suggestion(f, s)?;
        }
        Ok(())
    }

    fn fmt_achievable(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let achievable = &self.solution.achievable;
        writeln!(f, "=== Achievable Output Voltages with Current Resistors ===")?;
        if let Some(err) = achievable.shortfall() {
            return writeln!(f, "{}", err);
        }
        for c in achievable.iter() {
            writeln!(
                f,
                "Vout: {:.3} V (R1: {}, R2: {}, Current: {:.3} mA)",
                c.vout,
                format_resistance(c.r1),
                format_resistance(c.r2),
                c.current_ma
            )?;
        }
        if achievable.remaining() > 0 {
            writeln!(f, "... and {} more combinations.", achievable.remaining())?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for Report<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_best(f)?;
        writeln!(f)?;
        self.fmt_suggestions(f)?;
        writeln!(f)?;
        self.fmt_achievable(f)
    }
}
