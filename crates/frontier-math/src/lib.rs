//! # Frontier Math
//!
//! Numerical routines for the Frontier portfolio construction library:
//!
//! - [`solvers`]: bracketing root finding (bisection), used for
//!   yield-to-maturity solves
//! - [`qp`]: a small active-set quadratic program for mean-variance
//!   portfolio weights
//!
//! Everything in this crate is pure: no I/O, no global state, `f64` in and
//! `f64` out. Callers own the translation between money types and solver
//! space.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::unreadable_literal)]

pub mod error;
pub mod qp;
pub mod solvers;

pub use error::{MathError, MathResult};
pub use qp::{QpConfig, QpSolution, TargetReturnQp};
pub use solvers::{bisection, SolverConfig, SolverResult};
