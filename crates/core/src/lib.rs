//! Core library for the Setlist Builder.
//!
//! Arranges a catalog of tracks into a five-section concert setlist
//! (Opener, Early Set, Mid-Set Dip, Build, Closer). The catalog is split into
//! energy tiers, the requested length is divided across the sections, and a
//! greedy pass fills each slot with the candidate that transitions most
//! smoothly from the previous pick. Everything here is synchronous and free
//! of I/O apart from the catalog and config loaders.

pub mod assembler;
pub mod catalog;
pub mod config;
pub mod energy;
pub mod error;
pub mod planner;
pub mod setlist;
pub mod transition;

pub use assembler::SetlistAssembler;
pub use catalog::{Catalog, Mode, Track, TrackId};
pub use config::{AppConfig, AssemblyConfig};
pub use energy::{estimate_energy, EnergyTiers, Tier, TierPolicy};
pub use error::{Result, SetlistError};
pub use planner::{target_length, Section, SectionPlan};
pub use setlist::Setlist;
pub use transition::{pitch_class_distance, score, TransitionScore};
