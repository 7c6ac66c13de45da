//! Synthetic data generator for the food-delivery domain.
//!
//! Factories run in dependency order and bind every foreign key to an
//! identifier produced by an earlier stage. All randomness flows from one
//! run seed, so a seed plus an anchor time reproduces a dataset exactly.

pub mod catalog;
pub mod engine;
pub mod errors;
pub mod factories;
pub mod faker;
pub mod foreign;
pub mod model;
pub mod rng;
pub mod scenario;

pub use engine::{GenerationEngine, GenerationResult};
pub use errors::GenerationError;
pub use faker::LocaleKey;
pub use foreign::{LookupEntry, MenuLookup};
pub use model::{CountRange, GenerateOptions, GenerationReport};
pub use scenario::{PlannedOrder, ScenarioComposer, ScenarioKind};
