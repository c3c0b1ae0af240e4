//! Constraint-aware student-to-class assignment engine.
//!
//! Assigns a fixed roster of students to a fixed number of classes so that
//! hard relational constraints hold, as many classmate preferences as
//! possible are satisfied, and numeric properties stay balanced across
//! classes:
//!
//! - **Roster** ([`roster`]): validated, ascending-ordered student records
//!   with `together`/`not_together` relations, preference tuples, and named
//!   balancing properties.
//! - **Plan** ([`plan`]): deterministic resolution of an abstract per-student
//!   class code ("dna") into a constraint-valid assignment, followed by a
//!   best-effort local search that raises preference satisfaction, followed
//!   by goal evaluation (per-class means and their spread).
//! - **Partition estimation** ([`partition`]): greedy multiway splitting of
//!   a flat value list, used to compute the best balance any assignment
//!   could achieve — the targets an external optimizer steers toward.
//!
//! # Architecture
//!
//! The crate is the assignment *engine* only. Dataset loading, spreadsheet
//! export, UI, and the evolutionary optimizer that mutates many candidate
//! plans all live with consumers; they drive the engine through the
//! [`plan::Plan`] surface (`dna` read/write, named goal reads, and the
//! `assignment_check` condition). Everything here is single-threaded and
//! synchronous; each plan owns its data, so whole plans can be evaluated in
//! parallel by the caller.
//!
//! # Example
//!
//! ```
//! use classplan::plan::{Plan, PlanConfig};
//! use classplan::roster::{Roster, Student};
//!
//! let roster = Roster::new(vec![
//!     Student::new(1, "An").with_not_together(&[2]).with_property("score", 4.0),
//!     Student::new(2, "Bea").with_not_together(&[1]).with_property("score", 6.0),
//!     Student::new(3, "Cas").with_property("score", 5.0),
//! ])?;
//!
//! let plan = Plan::new(roster, 2, PlanConfig::default().with_seed(1))?;
//! assert_ne!(plan.class_of(1), plan.class_of(2));
//! println!("balance: {:?}", plan.goals());
//! # Ok::<(), classplan::error::PlanError>(())
//! ```

pub mod error;
pub mod partition;
pub mod plan;
pub mod roster;

pub use error::{PlanError, RosterError};
pub use plan::{ClassView, Plan, PlanConfig};
pub use roster::{Roster, Student, StudentId};
