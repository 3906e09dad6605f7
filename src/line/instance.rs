use super::Mode;
use anyhow::{anyhow, Result};

/// A precedence edge between two tasks, given by their 0-based indices.
///
/// The `before` task must be handled "earlier" than the `after` one,
/// where the meaning of "earlier" depends on the traversal modes of both tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Precedence {
    before: usize,
    after: usize,
}

impl Precedence {
    /// Builds a new precedence edge.
    pub fn new(before: usize, after: usize) -> Self {
        Self { before, after }
    }

    /// Returns the index of the task that comes first.
    pub fn before(&self) -> usize {
        self.before
    }

    /// Returns the index of the task that comes last.
    pub fn after(&self) -> usize {
        self.after
    }

    /// Checks whether this edge holds for the given (station, mode) assignments of its tasks.
    ///
    /// Forward tasks must follow the station order, backward tasks the reverse order;
    /// a backward predecessor is incompatible with a forward successor.
    pub fn is_respected_by(&self, before: (usize, Mode), after: (usize, Mode)) -> bool {
        match (before.1, after.1) {
            (Mode::Forward, Mode::Forward) => before.0 < after.0,
            (Mode::Backward, Mode::Backward) => before.0 > after.0,
            (Mode::Backward, Mode::Forward) => false,
            (Mode::Forward, Mode::Backward) => true,
        }
    }
}

/// A UALBP instance: a list of task durations and a list of precedence edges.
///
/// Tasks are identified by their 0-based index in the list of durations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    durations: Vec<usize>,
    precedences: Vec<Precedence>,
}

impl Instance {
    /// Builds a new instance.
    ///
    /// An error is returned if a duration is null, if an edge refers to an unknown task or if a task precedes itself.
    pub fn new(durations: Vec<usize>, precedences: Vec<Precedence>) -> Result<Self> {
        if let Some(i) = durations.iter().position(|d| *d == 0) {
            return Err(anyhow!("task {} has a null duration", i + 1));
        }
        for p in &precedences {
            if p.before() >= durations.len() || p.after() >= durations.len() {
                return Err(anyhow!(
                    "precedence ({},{}) refers to an unknown task",
                    p.before() + 1,
                    p.after() + 1
                ));
            }
            if p.before() == p.after() {
                return Err(anyhow!("task {} cannot precede itself", p.before() + 1));
            }
        }
        Ok(Self {
            durations,
            precedences,
        })
    }

    /// Returns the number of tasks.
    pub fn n_tasks(&self) -> usize {
        self.durations.len()
    }

    /// Returns the duration of a task.
    ///
    /// # Panics
    ///
    /// Panics if the task index is out of bounds.
    pub fn duration(&self, task: usize) -> usize {
        self.durations[task]
    }

    /// Returns the durations of the tasks, in task order.
    pub fn durations(&self) -> &[usize] {
        &self.durations
    }

    /// Returns the number of precedence edges.
    pub fn n_precedences(&self) -> usize {
        self.precedences.len()
    }

    /// Iterates over the precedence edges.
    pub fn iter_precedences(&self) -> impl Iterator<Item = &Precedence> + '_ {
        self.precedences.iter()
    }

    /// Returns the sum of the task durations.
    pub fn total_duration(&self) -> usize {
        self.durations.iter().sum()
    }

    /// Returns the index and the duration of the longest task, if any.
    pub fn longest_task(&self) -> Option<(usize, usize)> {
        self.durations
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(i, d)| (*d, std::cmp::Reverse(*i)))
    }

    /// Returns the trivial lower bound on the number of stations for a cycle time,
    /// that is the total duration divided by the cycle time, rounded up (and at least one).
    pub fn trivial_station_lower_bound(&self, cycle_time: usize) -> usize {
        if cycle_time == 0 {
            return 1;
        }
        usize::max(1, self.total_duration().div_ceil(cycle_time))
    }

    /// Checks whether the precedence graph contains a cycle.
    ///
    /// An instance with such a cycle has no solution in forward mode, whatever the number of stations.
    pub fn has_precedence_cycle(&self) -> bool {
        let mut successors = vec![vec![]; self.n_tasks()];
        self.precedences
            .iter()
            .for_each(|p| successors[p.before()].push(p.after()));
        // 0: unvisited, 1: on the current path, 2: done
        let mut status = vec![0u8; self.n_tasks()];
        for root in 0..self.n_tasks() {
            if status[root] != 0 {
                continue;
            }
            let mut stack = vec![(root, 0)];
            status[root] = 1;
            while let Some((task, next_succ)) = stack.pop() {
                if next_succ == successors[task].len() {
                    status[task] = 2;
                    continue;
                }
                stack.push((task, next_succ + 1));
                let succ = successors[task][next_succ];
                match status[succ] {
                    0 => {
                        status[succ] = 1;
                        stack.push((succ, 0));
                    }
                    1 => return true,
                    _ => {}
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ok() {
        let instance = Instance::new(vec![3, 5, 2], vec![Precedence::new(0, 2)]).unwrap();
        assert_eq!(3, instance.n_tasks());
        assert_eq!(5, instance.duration(1));
        assert_eq!(1, instance.n_precedences());
        assert_eq!(10, instance.total_duration());
        assert_eq!(Some((1, 5)), instance.longest_task());
    }

    #[test]
    fn test_new_null_duration() {
        assert!(Instance::new(vec![3, 0], vec![]).is_err());
    }

    #[test]
    fn test_new_unknown_task() {
        assert!(Instance::new(vec![3, 1], vec![Precedence::new(0, 2)]).is_err());
    }

    #[test]
    fn test_new_self_loop() {
        assert!(Instance::new(vec![3, 1], vec![Precedence::new(1, 1)]).is_err());
    }

    #[test]
    fn test_longest_task_first_on_ties() {
        let instance = Instance::new(vec![4, 7, 7], vec![]).unwrap();
        assert_eq!(Some((1, 7)), instance.longest_task());
        assert_eq!(None, Instance::new(vec![], vec![]).unwrap().longest_task());
    }

    #[test]
    fn test_trivial_lower_bound() {
        let instance = Instance::new(vec![3, 3, 3, 3], vec![]).unwrap();
        assert_eq!(2, instance.trivial_station_lower_bound(6));
        assert_eq!(3, instance.trivial_station_lower_bound(5));
        assert_eq!(1, instance.trivial_station_lower_bound(100));
        assert_eq!(1, Instance::new(vec![], vec![]).unwrap().trivial_station_lower_bound(5));
    }

    #[test]
    fn test_precedence_cycle() {
        let acyclic = Instance::new(
            vec![1, 1, 1, 1],
            vec![
                Precedence::new(0, 1),
                Precedence::new(0, 2),
                Precedence::new(1, 3),
                Precedence::new(2, 3),
            ],
        )
        .unwrap();
        assert!(!acyclic.has_precedence_cycle());
        let cyclic = Instance::new(
            vec![1, 1, 1],
            vec![
                Precedence::new(0, 1),
                Precedence::new(1, 2),
                Precedence::new(2, 1),
            ],
        )
        .unwrap();
        assert!(cyclic.has_precedence_cycle());
    }

    #[test]
    fn test_precedence_respected() {
        let p = Precedence::new(0, 1);
        assert!(p.is_respected_by((0, Mode::Forward), (1, Mode::Forward)));
        assert!(!p.is_respected_by((1, Mode::Forward), (1, Mode::Forward)));
        assert!(p.is_respected_by((2, Mode::Backward), (1, Mode::Backward)));
        assert!(!p.is_respected_by((1, Mode::Backward), (1, Mode::Backward)));
        assert!(!p.is_respected_by((0, Mode::Backward), (3, Mode::Forward)));
        assert!(p.is_respected_by((3, Mode::Forward), (0, Mode::Backward)));
    }
}
