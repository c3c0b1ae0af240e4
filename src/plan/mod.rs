//! The assignment plan pipeline.
//!
//! A [`Plan`] is one concrete assignment of a roster over a fixed number of
//! classes. Construction runs the full pipeline:
//!
//! 1. **Resolution**: the dna vector is turned into a constraint-valid
//!    final assignment, pruning per-student option sets as students commit
//!    in ascending-number order.
//! 2. **Improvement**: best-effort local search raises the number of
//!    students with a satisfied preference, moving students only within
//!    their pruned option sets.
//! 3. **Evaluation**: per-class means, their spreads, feasibility.
//!
//! The same pipeline re-runs on every dna replacement. A plan is the unit
//! an external optimizer mutates (by writing dna) and scores (by reading
//! goals); each plan owns an independent copy of its roster and state, so
//! separate plans can be evaluated in parallel.
//!
//! # Key Types
//!
//! - [`PlanConfig`]: pipeline parameters (improvement passes, retry budget,
//!   preference-priority resolution, seed)
//! - [`Plan`]: a resolved, improved, scoreable assignment
//! - [`ClassView`]: read-only membership of one class

mod config;
mod goals;
mod improver;
mod resolver;

pub use config::PlanConfig;

use crate::error::PlanError;
use crate::roster::{Roster, StudentId};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use resolver::ResolveState;
use std::collections::BTreeMap;
use tracing::debug;

/// Read-only view of one class: its index and its members in ascending
/// student-number order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClassView {
    /// Class index in `[0, n_classes)`.
    pub index: usize,

    /// Student numbers assigned to this class.
    pub members: Vec<StudentId>,
}

impl ClassView {
    /// Number of students in the class.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the class received no students.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A constraint-resolved assignment of students over classes.
///
/// # Usage
///
/// ```
/// use classplan::plan::{Plan, PlanConfig};
/// use classplan::roster::{Roster, Student};
///
/// let roster = Roster::new(vec![
///     Student::new(1, "An").with_property("score", 4.0),
///     Student::new(2, "Bea").with_property("score", 6.0),
///     Student::new(3, "Cas").with_property("score", 5.0),
/// ]).unwrap();
///
/// let plan = Plan::new(roster, 2, PlanConfig::default().with_seed(7)).unwrap();
/// assert!(plan.final_assignment().iter().all(|&c| c < 2));
/// assert!(plan.assignment_check());
/// let spread = plan.goal("spread_score").unwrap();
/// assert!(spread >= 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Plan {
    roster: Roster,
    n_classes: usize,
    config: PlanConfig,
    dna: Vec<usize>,
    state: ResolveState,
    goal_names: Vec<String>,
}

impl Plan {
    /// Builds a plan from a randomly drawn dna.
    ///
    /// When resolution dead-ends, a fresh dna is drawn, up to
    /// [`PlanConfig::max_resolve_attempts`] times; exhausting the budget
    /// yields [`PlanError::NoSolutionFound`].
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid (call
    /// [`PlanConfig::validate`] first to get a descriptive error).
    pub fn new(roster: Roster, n_classes: usize, config: PlanConfig) -> Result<Self, PlanError> {
        config.validate().expect("invalid PlanConfig");
        if n_classes == 0 {
            return Err(PlanError::NoClasses);
        }
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        for attempt in 1..=config.max_resolve_attempts {
            let dna: Vec<usize> = (0..roster.len())
                .map(|_| rng.random_range(0..n_classes))
                .collect();
            match resolver::resolve(&roster, n_classes, &dna, config.prioritize_preferences) {
                Ok(mut state) => {
                    improver::improve(&roster, &mut state, config.max_tries);
                    let goal_names = goals::goal_names(&roster);
                    return Ok(Self {
                        roster,
                        n_classes,
                        config,
                        dna,
                        state,
                        goal_names,
                    });
                }
                Err(dead_end) => {
                    debug!(attempt, blocked = dead_end.id, "redrawing dna after dead end");
                }
            }
        }
        Err(PlanError::NoSolutionFound {
            attempts: config.max_resolve_attempts,
        })
    }

    /// Builds a plan from a caller-pinned dna.
    ///
    /// Exactly one resolution attempt is made; a dead end is fatal and
    /// surfaces as [`PlanError::NoSolutionFound`].
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid.
    pub fn with_dna(
        roster: Roster,
        n_classes: usize,
        dna: Vec<usize>,
        config: PlanConfig,
    ) -> Result<Self, PlanError> {
        config.validate().expect("invalid PlanConfig");
        if n_classes == 0 {
            return Err(PlanError::NoClasses);
        }
        if dna.len() != roster.len() {
            return Err(PlanError::DnaLength {
                expected: roster.len(),
                got: dna.len(),
            });
        }
        let mut state = resolver::resolve(&roster, n_classes, &dna, config.prioritize_preferences)
            .map_err(|_| PlanError::NoSolutionFound { attempts: 1 })?;
        improver::improve(&roster, &mut state, config.max_tries);
        let goal_names = goals::goal_names(&roster);
        Ok(Self {
            roster,
            n_classes,
            config,
            dna,
            state,
            goal_names,
        })
    }

    /// The current dna vector, indexed by ascending-number roster position.
    pub fn dna(&self) -> &[usize] {
        &self.dna
    }

    /// Replaces the dna and re-runs resolution and improvement.
    ///
    /// This is the optimizer write boundary. The dna counts as pinned: a
    /// dead end returns [`PlanError::NoSolutionFound`] and leaves the plan
    /// in its previous, still-valid state.
    pub fn set_dna(&mut self, dna: Vec<usize>) -> Result<(), PlanError> {
        if dna.len() != self.roster.len() {
            return Err(PlanError::DnaLength {
                expected: self.roster.len(),
                got: dna.len(),
            });
        }
        let mut state = resolver::resolve(
            &self.roster,
            self.n_classes,
            &dna,
            self.config.prioritize_preferences,
        )
        .map_err(|_| PlanError::NoSolutionFound { attempts: 1 })?;
        improver::improve(&self.roster, &mut state, self.config.max_tries);
        self.dna = dna;
        self.state = state;
        Ok(())
    }

    /// The plan's roster copy.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Number of classes.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Final class per student, indexed by roster position.
    pub fn final_assignment(&self) -> &[usize] {
        &self.state.finals
    }

    /// Final class of one student.
    pub fn class_of(&self, id: StudentId) -> Option<usize> {
        self.roster.position(id).map(|pos| self.state.finals[pos])
    }

    /// Satisfied-preference tally per student, indexed by roster position.
    pub fn pref_satisfied(&self) -> &[u8] {
        &self.state.pref_sat
    }

    /// Number of students with at least one satisfied preference.
    pub fn satisfied_count(&self) -> usize {
        self.state.satisfied_count()
    }

    /// Membership of every class, ordered by class index.
    pub fn classes(&self) -> Vec<ClassView> {
        let mut classes: Vec<ClassView> = (0..self.n_classes)
            .map(|index| ClassView {
                index,
                members: Vec::new(),
            })
            .collect();
        for (pos, &class) in self.state.finals.iter().enumerate() {
            classes[class].members.push(self.roster.student_at(pos).id);
        }
        classes
    }

    /// Number of students per class, ordered by class index.
    pub fn class_sizes(&self) -> Vec<usize> {
        goals::class_sizes(&self.state.finals, self.n_classes)
    }

    /// Size of the smallest class.
    pub fn min_class_size(&self) -> usize {
        self.class_sizes()
            .into_iter()
            .min()
            .expect("a plan has at least one class")
    }

    /// Size of the largest class.
    pub fn max_class_size(&self) -> usize {
        self.class_sizes()
            .into_iter()
            .max()
            .expect("a plan has at least one class")
    }

    /// Per-class means of one property, ordered by class index.
    ///
    /// An empty class contributes 0.0. `None` for an unknown property.
    pub fn class_values(&self, property: &str) -> Option<Vec<f64>> {
        goals::class_means(&self.roster, &self.state.finals, self.n_classes, property)
    }

    /// Population standard deviation of one property's per-class means.
    pub fn spread(&self, property: &str) -> Option<f64> {
        self.class_values(property).map(|means| {
            crate::partition::std_pop(&means)
        })
    }

    /// The goal names: `spread_<prop>` per property plus `spread_size`.
    pub fn goal_names(&self) -> &[String] {
        &self.goal_names
    }

    /// Evaluates one goal by name.
    ///
    /// Pure read: repeated calls without a dna change return identical
    /// values.
    pub fn goal(&self, name: &str) -> Option<f64> {
        goals::goal(&self.roster, &self.state.finals, self.n_classes, name)
    }

    /// All goal values keyed by name.
    pub fn goals(&self) -> BTreeMap<String, f64> {
        self.goal_names
            .iter()
            .filter_map(|name| self.goal(name).map(|v| (name.clone(), v)))
            .collect()
    }

    /// Best-achievable value per goal, ignoring relational constraints.
    pub fn goal_targets(&self) -> BTreeMap<String, f64> {
        goals::goal_targets(&self.roster, self.n_classes)
    }

    /// The feasibility condition an optimizer filters on: every hard pair
    /// respected and every student's preference tally positive.
    pub fn assignment_check(&self) -> bool {
        self.verify().is_ok()
    }

    /// Like [`assignment_check`](Plan::assignment_check), but reports the
    /// first violation as a typed error.
    pub fn verify(&self) -> Result<(), PlanError> {
        goals::verify(&self.roster, &self.state)
    }
}

// ============================================================================
// Tests
// ============================================================================
