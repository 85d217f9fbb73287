#![deny(clippy::complexity, clippy::style, clippy::perf)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_panics_doc)]

//! Zero-pole-gain transfer functions for control-systems coursework.
//!
//! The core is [`zpk`], which expands zero and pole lists into the numerator
//! and denominator polynomials of a [`TransferFunction`]. Around it sit the
//! block-diagram algebra on transfer functions, the scalar phase helpers, an
//! Aberth root finder for recovering poles and zeros, and a root-locus sweep.

pub mod error;
pub mod phase;
pub mod polynomials;
pub mod scalar;
pub mod transfer_functions;

pub use error::{Error, Result};
pub use phase::{evals, phase, phased, phases, phases_deg};
pub use polynomials::{
    root_locus::{LocusOptions, RootLocus},
    Polynomial,
};
pub use scalar::Coefficient;
pub use transfer_functions::{
    zpk::{parse_root, parse_roots, zpk},
    FeedbackSign, TransferFunction,
};
