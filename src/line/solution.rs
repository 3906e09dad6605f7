use super::Instance;
use anyhow::{anyhow, Result};
use std::fmt::Display;

/// The side of the U-line a task is processed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    /// The task is processed on the entrance side; stations are visited in increasing order.
    Forward,
    /// The task is processed on the exit side; stations are visited in decreasing order.
    Backward,
}

impl Mode {
    /// Returns the one-character code of this mode (`F` or `B`).
    pub fn as_char(&self) -> char {
        match self {
            Mode::Forward => 'F',
            Mode::Backward => 'B',
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Mode {
    type Error = anyhow::Error;

    fn try_from(value: char) -> Result<Self> {
        match value {
            'F' => Ok(Mode::Forward),
            'B' => Ok(Mode::Backward),
            _ => Err(anyhow!(r#"unknown mode "{}" (expected "F" or "B")"#, value)),
        }
    }
}

/// A station assignment: for each station, the tasks it holds together with their mode.
///
/// Tasks are kept sorted by index inside each station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    stations: Vec<Vec<(usize, Mode)>>,
}

impl Solution {
    /// Builds a solution with the given number of empty stations.
    pub fn new(n_stations: usize) -> Self {
        Self {
            stations: vec![vec![]; n_stations],
        }
    }

    /// Assigns a task to a station with the given mode.
    ///
    /// # Panics
    ///
    /// Panics if the station index is out of bounds.
    pub fn assign(&mut self, task: usize, station: usize, mode: Mode) {
        let tasks = &mut self.stations[station];
        let position = tasks.partition_point(|(t, _)| *t < task);
        tasks.insert(position, (task, mode));
    }

    /// Returns the number of stations, including the empty ones.
    pub fn n_stations(&self) -> usize {
        self.stations.len()
    }

    /// Returns the tasks assigned to a station.
    pub fn station(&self, station: usize) -> &[(usize, Mode)] {
        &self.stations[station]
    }

    /// Iterates over the stations, in station order.
    pub fn iter_stations(&self) -> impl Iterator<Item = &[(usize, Mode)]> + '_ {
        self.stations.iter().map(|s| s.as_slice())
    }

    /// Returns the station and the mode of a task, if it is assigned.
    pub fn assignment_of(&self, task: usize) -> Option<(usize, Mode)> {
        self.stations.iter().enumerate().find_map(|(k, tasks)| {
            tasks
                .iter()
                .find(|(t, _)| *t == task)
                .map(|(_, mode)| (k, *mode))
        })
    }

    /// Returns the sum of the durations of the tasks assigned to a station.
    pub fn load(&self, station: usize, instance: &Instance) -> usize {
        self.stations[station]
            .iter()
            .map(|(t, _)| instance.duration(*t))
            .sum()
    }

    /// Returns the stations whose load exceeds the cycle time, together with their load.
    pub fn overloaded_stations(&self, instance: &Instance, cycle_time: usize) -> Vec<(usize, usize)> {
        (0..self.n_stations())
            .map(|k| (k, self.load(k, instance)))
            .filter(|(_, load)| *load > cycle_time)
            .collect()
    }

    /// Checks this solution is valid for an instance and a cycle time.
    ///
    /// Each task must be assigned exactly once, each precedence edge must hold
    /// and no station may exceed the cycle time.
    pub fn check(&self, instance: &Instance, cycle_time: usize) -> Result<()> {
        let mut assignments = vec![None; instance.n_tasks()];
        for (k, tasks) in self.stations.iter().enumerate() {
            for (t, mode) in tasks {
                if *t >= instance.n_tasks() {
                    return Err(anyhow!("unknown task {} in station {}", t + 1, k + 1));
                }
                if assignments[*t].replace((k, *mode)).is_some() {
                    return Err(anyhow!("task {} is assigned more than once", t + 1));
                }
            }
        }
        let assignments = assignments
            .into_iter()
            .enumerate()
            .map(|(t, a)| a.ok_or_else(|| anyhow!("task {} is not assigned", t + 1)))
            .collect::<Result<Vec<_>>>()?;
        for p in instance.iter_precedences() {
            let before = assignments[p.before()];
            let after = assignments[p.after()];
            if !p.is_respected_by(before, after) {
                return Err(anyhow!(
                    "precedence ({},{}) is violated: {}@{} then {}@{}",
                    p.before() + 1,
                    p.after() + 1,
                    before.1,
                    before.0 + 1,
                    after.1,
                    after.0 + 1
                ));
            }
        }
        if let Some((k, load)) = self.overloaded_stations(instance, cycle_time).first() {
            return Err(anyhow!(
                "station {} has load {} which exceeds the cycle time {}",
                k + 1,
                load,
                cycle_time
            ));
        }
        Ok(())
    }
}
