//! Core engine for building marginal abatement cost curves (MACCs).
//!
//! A MACC maps cumulative abatement (tCO₂, or intensity-reduction %) to the
//! marginal cost of the next unit of abatement, ordered cheapest-first. The
//! engine turns per-measure driver inputs (fuel, raw material, transport,
//! waste and electricity usage deltas, an adoption ramp and a financing
//! stack) into yearly abatement/cost projections, promotes a representative
//! year per measure, and assembles the sorted step curve together with
//! optional smoothed fits and a greedy least-cost target allocation.
//!
//! Every computation is a pure function of its inputs: carbon price, the
//! modelled horizon and catalogs are always passed explicitly, never read
//! from ambient state.

pub mod baseline;
pub mod catalog;
pub mod curve;
pub mod curve_model;
pub mod driver;
pub mod finance;
pub mod horizon;
pub mod measure;
pub mod projector;
pub mod regression;
pub mod series;
pub mod solver;

pub mod errors;
