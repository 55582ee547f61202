//! Model fitting.
//!
//! Responsibilities:
//!
//! - starting values (regression + autocorrelation)
//! - conditional least squares via damped Gauss–Newton steps
//! - convergence bookkeeping and innovation variance

pub mod fitter;

pub use fitter::*;
