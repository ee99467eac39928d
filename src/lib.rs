//! Marginal abatement cost curve (MACC) modelling.
//!
//! This crate is a thin facade over [`macc_core`], which contains the
//! measure projector, curve assembly and target/budget algorithms.

pub use macc_core::*;
