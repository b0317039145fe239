//! Domain building blocks
//!
//! Shared abstractions every domain crate builds its aggregates on.
//!
//! # Layers
//!
//! ```text
//! ┌──────────────────────┐
//! │ Pagination / Search  │  ← paged envelopes for gateway queries
//! └──────────┬───────────┘
//!            │
//! ┌──────────▼───────────┐
//! │ Either / DomainError │  ← use-case results, raised conditions
//! └──────────┬───────────┘
//!            │
//! ┌──────────▼───────────┐
//! │ ValidationHandler    │  ← Notification (collect) / FailFastHandler
//! └──────────┬───────────┘
//!            │
//! ┌──────────▼───────────┐
//! │ Entity / Aggregate   │  ← identity, validation entry point, events
//! └──────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use core_domain::{Error, Notification, ValidationHandler};
//!
//! let mut notification = Notification::create();
//! notification.append(Error::new("'name' should not be null or blank")).unwrap();
//!
//! assert!(notification.has_error());
//! ```

pub mod either;
pub mod entity;
pub mod error;
pub mod identifier;
pub mod pagination;
pub mod validation;

pub use either::{Either, NoSuchElement};
pub use entity::{AggregateRoot, Entity, Recorded};
pub use error::{DomainError, DomainResult, NotFound};
pub use identifier::Identifier;
pub use pagination::{Direction, Pagination, SearchQuery};
pub use validation::{
    constraints, Error, FailFastHandler, Notification, ValidationHandler, Validator,
};
