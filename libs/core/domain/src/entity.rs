//! Entity and aggregate root abstractions.

use std::fmt;

use crate::error::DomainResult;
use crate::identifier::Identifier;
use crate::validation::ValidationHandler;

/// Something with a stable identity and its own validation entry point.
///
/// Implementors compare and hash by [`Entity::id`] only.
pub trait Entity {
    /// Identifier kind owned by this entity.
    type Id: Identifier;

    /// The identifier, fixed at construction.
    fn id(&self) -> &Self::Id;

    /// Run this entity's constraint checks against `handler`.
    ///
    /// Returns `Err` only when the handler refuses to record a violation
    /// (fail-fast); a collecting handler always yields `Ok`.
    fn validate<H: ValidationHandler>(&self, handler: &mut H) -> DomainResult<()>;
}

/// An entity that is the consistency boundary of a cluster of state.
///
/// State-changing operations do not buffer events internally; they return a
/// [`Recorded`] value so the caller decides when (and whether) to publish.
pub trait AggregateRoot: Entity {
    /// Domain events this aggregate can raise.
    type Event: fmt::Debug + Clone;
}

/// An aggregate snapshot together with the events raised while producing it.
#[derive(Debug, Clone)]
pub struct Recorded<A: AggregateRoot> {
    aggregate: A,
    events: Vec<A::Event>,
}

impl<A: AggregateRoot> Recorded<A> {
    pub fn new(aggregate: A, events: Vec<A::Event>) -> Self {
        Self { aggregate, events }
    }

    /// Snapshot that raised no events.
    pub fn unchanged(aggregate: A) -> Self {
        Self::new(aggregate, Vec::new())
    }

    /// Snapshot that raised exactly one event.
    pub fn with_event(aggregate: A, event: A::Event) -> Self {
        Self::new(aggregate, vec![event])
    }

    pub fn aggregate(&self) -> &A {
        &self.aggregate
    }

    pub fn events(&self) -> &[A::Event] {
        &self.events
    }

    pub fn into_aggregate(self) -> A {
        self.aggregate
    }

    pub fn into_parts(self) -> (A, Vec<A::Event>) {
        (self.aggregate, self.events)
    }
}
