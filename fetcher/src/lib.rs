//! One fetch → transform → persist cycle for the test dashboard.
//!
//! The binary (`testwatch-fetch`) is meant to be run on a fixed schedule;
//! each invocation performs exactly one cycle and exits.

pub mod cli;
pub mod cycle;
pub mod logging;
pub mod source;
pub mod storage;
