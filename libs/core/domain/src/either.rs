//! Two-branch result of a use case.
//!
//! `Left` conventionally holds the accumulated failure, `Right` the success
//! value. Only construction and inspection are offered; use cases branch on
//! the variant instead of chaining.

use thiserror::Error;

/// The requested side of an [`Either`] is not populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No value present")]
pub struct NoSuchElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<L, R> Either<L, R> {
    pub const fn left(value: L) -> Self {
        Either::Left(value)
    }

    pub const fn right(value: R) -> Self {
        Either::Right(value)
    }

    pub const fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    pub const fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    /// The left value, or [`NoSuchElement`] when this is a `Right`.
    pub fn get_left(&self) -> Result<&L, NoSuchElement> {
        match self {
            Either::Left(value) => Ok(value),
            Either::Right(_) => Err(NoSuchElement),
        }
    }

    /// The right value, or [`NoSuchElement`] when this is a `Left`.
    pub fn get_right(&self) -> Result<&R, NoSuchElement> {
        match self {
            Either::Left(_) => Err(NoSuchElement),
            Either::Right(value) => Ok(value),
        }
    }

    pub fn into_left(self) -> Result<L, NoSuchElement> {
        match self {
            Either::Left(value) => Ok(value),
            Either::Right(_) => Err(NoSuchElement),
        }
    }

    pub fn into_right(self) -> Result<R, NoSuchElement> {
        match self {
            Either::Left(_) => Err(NoSuchElement),
            Either::Right(value) => Ok(value),
        }
    }

    /// `Right` becomes `Ok`, `Left` becomes `Err`.
    pub fn into_result(self) -> Result<R, L> {
        match self {
            Either::Left(value) => Err(value),
            Either::Right(value) => Ok(value),
        }
    }
}

impl<L, R> From<Result<R, L>> for Either<L, R> {
    fn from(result: Result<R, L>) -> Self {
        match result {
            Ok(value) => Either::Right(value),
            Err(value) => Either::Left(value),
        }
    }
}
