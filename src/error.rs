//! Crate error types.

use crate::roster::StudentId;
use thiserror::Error;

/// Errors raised while constructing a [`Roster`](crate::roster::Roster).
///
/// The engine never repairs bad input; every violation is rejected before
/// resolution can start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// Two students share the same number.
    #[error("duplicate student number {0}")]
    DuplicateId(StudentId),

    /// A relation or preference names a number that is not in the roster.
    #[error("student {id} references unknown student {other} in {field}")]
    UnknownReference {
        /// Student holding the dangling reference.
        id: StudentId,
        /// The number that does not exist.
        other: StudentId,
        /// Which field held it (`together`, `not_together` or `preferences`).
        field: &'static str,
    },

    /// A `together`/`not_together` relation is not mirrored by the partner.
    #[error("student {id} lists {other} in {field} but {other} does not list {id}")]
    NotReciprocal {
        /// Student holding the one-sided relation.
        id: StudentId,
        /// The partner missing the mirror entry.
        other: StudentId,
        /// Which relation (`together` or `not_together`).
        field: &'static str,
    },

    /// A preference tuple has a length other than 0 or 3.
    #[error("student {id} has {len} preferences; expected exactly 3 or none")]
    PreferenceCount {
        /// Offending student.
        id: StudentId,
        /// Observed tuple length.
        len: usize,
    },

    /// A student lacks a property that other students carry.
    #[error("student {id} is missing property {property:?}")]
    MissingProperty {
        /// Offending student.
        id: StudentId,
        /// Name of the absent property column.
        property: String,
    },
}

/// Errors raised while building or re-resolving a [`Plan`](crate::plan::Plan).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Constraint propagation emptied a student's option set on every
    /// attempted dna. With a caller-pinned dna a single attempt is made.
    #[error("no constraint-valid assignment found after {attempts} attempt(s)")]
    NoSolutionFound {
        /// Number of dna vectors tried before giving up.
        attempts: usize,
    },

    /// The supplied dna vector does not cover the roster.
    #[error("dna length {got} does not match roster size {expected}")]
    DnaLength {
        /// Roster size.
        expected: usize,
        /// Supplied dna length.
        got: usize,
    },

    /// `n_classes` was zero.
    #[error("a plan needs at least one class")]
    NoClasses,

    /// A `not_together` pair ended up sharing a class.
    #[error("students {a} and {b} must not share a class but both are in class {class}")]
    NotTogetherViolated {
        /// First student of the pair.
        a: StudentId,
        /// Second student of the pair.
        b: StudentId,
        /// The shared class index.
        class: usize,
    },

    /// A `together` pair ended up in different classes.
    #[error("students {a} and {b} must share a class but are in classes {left} and {right}")]
    TogetherViolated {
        /// First student of the pair.
        a: StudentId,
        /// Second student of the pair.
        b: StudentId,
        /// Class of the first student.
        left: usize,
        /// Class of the second student.
        right: usize,
    },

    /// A student with real preferences has none of them satisfied.
    #[error("student {id} has no satisfied preference")]
    PreferenceUnsatisfied {
        /// Offending student.
        id: StudentId,
    },

    /// Roster validation failure surfaced through plan construction.
    #[error(transparent)]
    Roster(#[from] RosterError),
}
