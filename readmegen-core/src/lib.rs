#![doc = "readmegen-core: core logic library for readmegen."]

//! This crate contains the collection and selection pipeline behind readmegen:
//! walking a project tree into a bounded, sanitized document set, rating each
//! document through a scoring service and reducing the ratings to the subset
//! handed to README synthesis.
//!
//! Networked model clients are not part of this crate. They plug in through the
//! [`contract::Scorer`] and [`contract::Synthesizer`] traits.
//!
//! # Usage
//! Add this as a dependency for the collection, assessment, selection and pipeline code.

pub mod assess;
pub mod collect;
pub mod config;
pub mod contract;
pub mod filter;
pub mod pipeline;
pub mod sanitize;
pub mod select;
pub mod synthesize;
