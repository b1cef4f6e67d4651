//! # Interactome Core Library
//!
//! A library for inferring pairwise molecular-interaction records from a
//! hierarchical model of biological entities: complexes, entity sets,
//! polymers, and reaction-like events with catalysis.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains the stateless data model
//!   (`Entity`, `ParticipantSet`, `Interaction`), the [`core::graph`] access
//!   boundary to the external entity store, and the output encoders
//!   (PSI-MITAB and tab-delimited).
//!
//! - **[`engine`]: The Logic Core.** This stateful layer turns containers
//!   into interactions: one-level participant extraction, simple-entity
//!   filtering, size-capped pairwise inference with depth-first recursion,
//!   deduplication, and the lazy [`engine::stream::InteractionStream`].
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer.
//!   It resolves traversal roots from objects or species, drives the stream
//!   once, and fans every unique interaction out to the registered writers.

pub mod core;
pub mod engine;
pub mod workflows;
