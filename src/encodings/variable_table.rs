use crate::line::Mode;
use crate::sat::Literal;

/// The mapping between the assignment variables of a UALBP instance and the SAT variables.
///
/// For `n` tasks and `m` stations, the forward variable of task `i` at station `k` is `i*2m + k + 1`
/// and the backward one is `i*2m + m + k + 1`, so the primary variables fill `[1, 2nm]`.
/// When indicators are requested, the "assigned here" variable of task `i` at station `k`
/// is `2nm + i*m + k + 1`.
///
/// The table also tracks the watermark, the lowest variable not handed out yet.
/// Encoders that need auxiliary variables take them from the watermark and push it forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableTable {
    n_tasks: usize,
    n_stations: usize,
    with_indicators: bool,
    watermark: usize,
}

impl VariableTable {
    /// Builds a table with the primary variables only.
    pub fn new(n_tasks: usize, n_stations: usize) -> Self {
        Self {
            n_tasks,
            n_stations,
            with_indicators: false,
            watermark: 2 * n_tasks * n_stations + 1,
        }
    }

    /// Builds a table with both the primary variables and the indicator ones.
    pub fn with_indicators(n_tasks: usize, n_stations: usize) -> Self {
        Self {
            n_tasks,
            n_stations,
            with_indicators: true,
            watermark: 3 * n_tasks * n_stations + 1,
        }
    }

    /// Returns the number of tasks.
    pub fn n_tasks(&self) -> usize {
        self.n_tasks
    }

    /// Returns the number of stations.
    pub fn n_stations(&self) -> usize {
        self.n_stations
    }

    /// Returns `true` iff this table allocates indicator variables.
    pub fn has_indicators(&self) -> bool {
        self.with_indicators
    }

    /// Returns the variable asserting a task is processed forward at a station.
    pub fn forward_var(&self, task: usize, station: usize) -> usize {
        debug_assert!(task < self.n_tasks && station < self.n_stations);
        task * 2 * self.n_stations + station + 1
    }

    /// Returns the variable asserting a task is processed backward at a station.
    pub fn backward_var(&self, task: usize, station: usize) -> usize {
        debug_assert!(task < self.n_tasks && station < self.n_stations);
        task * 2 * self.n_stations + self.n_stations + station + 1
    }

    /// Returns the variable asserting a task is processed at a station with the given mode.
    pub fn mode_var(&self, task: usize, station: usize, mode: Mode) -> usize {
        match mode {
            Mode::Forward => self.forward_var(task, station),
            Mode::Backward => self.backward_var(task, station),
        }
    }

    /// Returns the positive literal of [`mode_var`](Self::mode_var).
    pub fn mode_lit(&self, task: usize, station: usize, mode: Mode) -> Literal {
        Literal::positive(self.mode_var(task, station, mode))
    }

    /// Returns the variable asserting a task is processed at a station, whatever its mode.
    ///
    /// # Panics
    ///
    /// Panics if this table was built without indicators.
    pub fn indicator_var(&self, task: usize, station: usize) -> usize {
        assert!(self.with_indicators, "no indicator variables in this table");
        debug_assert!(task < self.n_tasks && station < self.n_stations);
        self.max_primary_var() + task * self.n_stations + station + 1
    }

    /// Returns the highest primary (task, station, mode) variable.
    pub fn max_primary_var(&self) -> usize {
        2 * self.n_tasks * self.n_stations
    }

    /// Returns the lowest variable not handed out yet.
    pub fn watermark(&self) -> usize {
        self.watermark
    }

    /// Returns the highest variable handed out so far.
    pub fn max_var(&self) -> usize {
        self.watermark - 1
    }

    /// Moves the watermark after auxiliary variables were taken from it.
    ///
    /// # Panics
    ///
    /// Panics if the new watermark is lower than the current one.
    pub fn advance_watermark(&mut self, next_free_var: usize) {
        assert!(
            next_free_var >= self.watermark,
            "watermark cannot go back from {} to {}",
            self.watermark,
            next_free_var
        );
        self.watermark = next_free_var;
    }

    /// Translates a variable back into a (task, station, mode) assignment, if it is a primary one.
    pub fn decode_var(&self, var: usize) -> Option<(usize, usize, Mode)> {
        if var == 0 || var > self.max_primary_var() {
            return None;
        }
        let offset = var - 1;
        let task = offset / (2 * self.n_stations);
        let rem = offset % (2 * self.n_stations);
        if rem < self.n_stations {
            Some((task, rem, Mode::Forward))
        } else {
            Some((task, rem - self.n_stations, Mode::Backward))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_primary_vars_are_dense_and_injective() {
        let table = VariableTable::new(3, 4);
        let mut seen = HashSet::new();
        for t in 0..3 {
            for s in 0..4 {
                assert!(seen.insert(table.forward_var(t, s)));
                assert!(seen.insert(table.backward_var(t, s)));
            }
        }
        assert_eq!((1..=24).collect::<HashSet<usize>>(), seen);
        assert_eq!(24, table.max_primary_var());
        assert_eq!(25, table.watermark());
    }

    #[test]
    fn test_known_numbering() {
        let table = VariableTable::new(2, 3);
        assert_eq!(1, table.forward_var(0, 0));
        assert_eq!(4, table.backward_var(0, 0));
        assert_eq!(9, table.forward_var(1, 2));
        assert_eq!(12, table.backward_var(1, 2));
    }

    #[test]
    fn test_indicators_follow_primary_vars() {
        let table = VariableTable::with_indicators(2, 3);
        assert_eq!(13, table.indicator_var(0, 0));
        assert_eq!(18, table.indicator_var(1, 2));
        assert_eq!(19, table.watermark());
        assert_eq!(18, table.max_var());
    }

    #[test]
    #[should_panic(expected = "no indicator variables")]
    fn test_no_indicators() {
        VariableTable::new(2, 3).indicator_var(0, 0);
    }

    #[test]
    fn test_advance_watermark() {
        let mut table = VariableTable::new(2, 3);
        table.advance_watermark(20);
        assert_eq!(20, table.watermark());
        assert_eq!(19, table.max_var());
    }

    #[test]
    #[should_panic(expected = "watermark cannot go back")]
    fn test_watermark_cannot_decrease() {
        let mut table = VariableTable::new(2, 3);
        table.advance_watermark(5);
    }

    #[test]
    fn test_decode_var() {
        let table = VariableTable::with_indicators(2, 3);
        for t in 0..2 {
            for s in 0..3 {
                for mode in [Mode::Forward, Mode::Backward] {
                    assert_eq!(Some((t, s, mode)), table.decode_var(table.mode_var(t, s, mode)));
                }
            }
        }
        assert_eq!(None, table.decode_var(0));
        assert_eq!(None, table.decode_var(table.indicator_var(0, 0)));
    }
}
