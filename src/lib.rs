//! DadderUp admin core
//!
//! Validated data layer behind the DadderUp admin console: daily challenges,
//! badge definitions, plan card configuration and the reaction catalogs they
//! reference.
//!
//! ## Layers
//!
//! 1. **Domain** (`domain`): typed records and the action trigger catalog.
//! 2. **Editor** (`editor`, `ordering`): commands over immutable working sets
//!    that validate input and keep display order contiguous.
//! 3. **Adapter** (`adapter`): admin editing shape to canonical storage row and back.
//! 4. **Store** (`store`): SQLite repositories with transactional batch writes.

pub mod adapter;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod editor;
pub mod ordering;
pub mod store;

pub use domain::*;
