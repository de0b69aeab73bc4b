//! vdr-engine library interface
//!
//! Turns a VIN or a partial manual selection into a normalized [`VehicleDescriptor`]:
//! - VIN path: [`vin::normalize_vin`] → [`adapters::VinDecoder`] → [`normalizer`]
//! - Manual path: [`coordinator::SelectionCoordinator`] drives [`adapters::CatalogSource`]
//!   through the per-session [`cache::ResultCache`]
//!
//! [`resolver::VehicleResolver`] wires both paths from an [`config::EngineConfig`].

pub mod adapters;
pub mod cache;
pub mod collation;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod normalizer;
pub mod resolver;
pub mod types;
pub mod vin;

pub use crate::config::EngineConfig;
pub use crate::coordinator::SelectionCoordinator;
pub use crate::error::{ResolveError, ResolveResult};
pub use crate::resolver::VehicleResolver;
pub use crate::types::{
    CatalogEntry, PickerItems, PickerKind, SelectionState, TrimRow, VehicleDescriptor,
};
