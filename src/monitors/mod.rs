//! Per-tick computations of the monitor loop
//!
//! Both pieces are free of I/O so they can be driven directly from tests:
//!
//! - [`synthesizer`]: produces the next metric value (bounded random walk)
//! - [`evaluator`]: turns a value above the alert threshold into an [`Alert`](crate::Alert)

pub mod evaluator;
pub mod synthesizer;
