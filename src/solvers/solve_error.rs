use thiserror::Error;

/// The failures of the station search that are not I/O or oracle errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// A single task does not fit in a station; no station count can solve the instance.
    #[error("task {} has duration {duration} which exceeds the cycle time {cycle_time}", .task + 1)]
    TaskExceedsCycleTime {
        /// The 0-based index of the task.
        task: usize,
        /// The duration of the task.
        duration: usize,
        /// The cycle time.
        cycle_time: usize,
    },

    /// No solution was found with one station per task, which should always be feasible.
    #[error("no solution with {n_stations} stations, which is the maximal station count")]
    UnsatisfiableAtMaximum {
        /// The station count that failed.
        n_stations: usize,
    },

    /// A model does not give exactly one (station, mode) pair to a task.
    #[error("the model assigns task {} {n_true} times", .task + 1)]
    DecodingInconsistency {
        /// The 0-based index of the task.
        task: usize,
        /// The number of true assignment literals for this task.
        n_true: usize,
    },

    /// The SAT solver gave up.
    #[error("the SAT solver returned an unknown result with {n_stations} stations")]
    OracleUnknown {
        /// The station count under consideration.
        n_stations: usize,
    },

    /// A complete capacity encoding let an overloaded station through.
    #[error("station {} has load {load} which exceeds the cycle time {cycle_time}", .station + 1)]
    CapacityViolated {
        /// The 0-based index of the station.
        station: usize,
        /// The load of the station.
        load: usize,
        /// The cycle time.
        cycle_time: usize,
    },

    /// The exhaustive capacity encoding would enumerate too many subsets.
    #[error("the exhaustive capacity encoding would enumerate about {estimate} subsets per station (limit is {limit}); use another strategy")]
    ExhaustiveEncodingTooLarge {
        /// The estimated number of subsets.
        estimate: usize,
        /// The configured limit.
        limit: usize,
    },
}
