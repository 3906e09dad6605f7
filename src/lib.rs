//! ualbp-sat solves the U-shaped Assembly Line Balancing Problem (UALBP-1) through SAT.
//!
//! Given tasks with durations, precedences and a cycle time, it computes the smallest number of stations
//! such that every task is placed on a station (from the front or the back of the line) while honoring
//! the precedences and the station capacities.

#![warn(missing_docs)]

pub mod batch;

pub mod encodings;

pub mod io;

pub mod line;

pub mod sat;

pub mod solvers;
