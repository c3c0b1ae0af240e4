//! Validated student roster.
//!
//! [`Roster`] is the engine's input boundary: an ordered, indexed set of
//! [`Student`] records whose relational data has been checked eagerly.
//! Loading (CSV parsing etc.) is a caller concern; the roster re-checks the
//! structural invariants regardless, so a defective loader fails here with
//! a typed [`RosterError`] instead of corrupting a resolution pass.
//!
//! Students are kept in ascending-number order. That order is semantically
//! significant: the resolver commits students in exactly this order and its
//! outcome depends on it.

use crate::error::RosterError;
use crate::partition::{self, Partition};
use std::collections::{BTreeSet, HashMap};

/// A student's unique number.
pub type StudentId = u32;

/// One student record: identity, relational constraints, an ordered
/// preference tuple, and named numeric properties used for balancing.
///
/// # Builder
///
/// ```
/// use classplan::roster::Student;
///
/// let s = Student::new(1, "An")
///     .with_together(&[2])
///     .with_preferences(&[2, 3, 4])
///     .with_property("score", 7.5);
/// assert_eq!(s.together, vec![2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Student {
    /// Unique student number.
    pub id: StudentId,

    /// Display name.
    pub name: String,

    /// Students that must end up in the same class (symmetric).
    pub together: Vec<StudentId>,

    /// Students that must end up in a different class (symmetric).
    pub not_together: Vec<StudentId>,

    /// Preferred classmates: exactly three, or empty. An empty tuple is
    /// normalized at roster construction to the student's own number,
    /// meaning "trivially satisfied".
    pub preferences: Vec<StudentId>,

    /// Named numeric columns to balance across classes. Every student in a
    /// roster must carry the same set of names.
    pub properties: HashMap<String, f64>,
}

impl Student {
    /// Creates a student with no relations, no preferences and no properties.
    pub fn new(id: StudentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            together: Vec::new(),
            not_together: Vec::new(),
            preferences: Vec::new(),
            properties: HashMap::new(),
        }
    }

    /// Sets the `together` partners.
    pub fn with_together(mut self, ids: &[StudentId]) -> Self {
        self.together = ids.to_vec();
        self
    }

    /// Sets the `not_together` partners.
    pub fn with_not_together(mut self, ids: &[StudentId]) -> Self {
        self.not_together = ids.to_vec();
        self
    }

    /// Sets the preference tuple (three partners, or empty).
    pub fn with_preferences(mut self, ids: &[StudentId]) -> Self {
        self.preferences = ids.to_vec();
        self
    }

    /// Adds one named balancing property.
    pub fn with_property(mut self, name: impl Into<String>, value: f64) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Whether the preference tuple is the normalized self-reference.
    pub fn has_trivial_preferences(&self) -> bool {
        self.preferences == [self.id]
    }
}

/// The full, validated, ascending-ordered set of students.
///
/// Serialization (with the `serde` feature) goes through the student list;
/// rebuild with [`Roster::new`] after deserializing `Vec<Student>`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Roster {
    students: Vec<Student>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: HashMap<StudentId, usize>,
    properties: Vec<String>,
}

impl Roster {
    /// Builds a roster from student records.
    ///
    /// Sorts by student number and validates: unique numbers, existing
    /// references, reciprocal `together`/`not_together` relations,
    /// preference tuples of length 0 or 3, and a uniform property schema.
    /// Empty preference tuples are normalized to the student's own number.
    pub fn new(mut students: Vec<Student>) -> Result<Self, RosterError> {
        students.sort_by_key(|s| s.id);

        let mut index = HashMap::with_capacity(students.len());
        for (pos, s) in students.iter().enumerate() {
            if index.insert(s.id, pos).is_some() {
                return Err(RosterError::DuplicateId(s.id));
            }
        }

        // every relation and preference must point at a known number
        for s in &students {
            for (field, ids) in [
                ("together", &s.together),
                ("not_together", &s.not_together),
                ("preferences", &s.preferences),
            ] {
                for &other in ids {
                    if !index.contains_key(&other) {
                        return Err(RosterError::UnknownReference {
                            id: s.id,
                            other,
                            field,
                        });
                    }
                }
            }
        }

        // together/not_together must be mirrored
        for s in &students {
            for (field, ids) in [("together", &s.together), ("not_together", &s.not_together)] {
                for &other in ids {
                    let partner = &students[index[&other]];
                    let mirror = match field {
                        "together" => &partner.together,
                        _ => &partner.not_together,
                    };
                    if !mirror.contains(&s.id) {
                        return Err(RosterError::NotReciprocal {
                            id: s.id,
                            other,
                            field,
                        });
                    }
                }
            }
        }

        // 0 or exactly 3 preferences; normalize 0 to the self tuple
        for s in &mut students {
            match s.preferences.len() {
                0 => s.preferences = vec![s.id],
                3 => {}
                len => return Err(RosterError::PreferenceCount { id: s.id, len }),
            }
        }

        // uniform property schema
        let names: BTreeSet<String> = students
            .iter()
            .flat_map(|s| s.properties.keys().cloned())
            .collect();
        for s in &students {
            for name in &names {
                if !s.properties.contains_key(name) {
                    return Err(RosterError::MissingProperty {
                        id: s.id,
                        property: name.clone(),
                    });
                }
            }
        }

        Ok(Self {
            students,
            index,
            properties: names.into_iter().collect(),
        })
    }

    /// Number of students.
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Looks a student up by number.
    pub fn get(&self, id: StudentId) -> Option<&Student> {
        self.index.get(&id).map(|&pos| &self.students[pos])
    }

    /// The student at an ascending-order position.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of range.
    pub fn student_at(&self, pos: usize) -> &Student {
        &self.students[pos]
    }

    /// The ascending-order position of a student number.
    pub fn position(&self, id: StudentId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Student numbers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = StudentId> + '_ {
        self.students.iter().map(|s| s.id)
    }

    /// Students in ascending-number order.
    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    /// The balancing property names, sorted.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// One property column in ascending-number order.
    ///
    /// Returns `None` for an unknown property name.
    pub fn property_values(&self, property: &str) -> Option<Vec<f64>> {
        if !self.properties.iter().any(|p| p == property) {
            return None;
        }
        Some(
            self.students
                .iter()
                .map(|s| s.properties[property])
                .collect(),
        )
    }

    /// Best-achievable split of one property column over `n_sets` classes,
    /// ignoring all relational constraints.
    ///
    /// The resulting [`Partition::spread`] is the lower bound an optimizer
    /// steers `spread_<property>` toward.
    pub fn divide_property(&self, property: &str, n_sets: usize) -> Option<Partition> {
        self.property_values(property)
            .map(|values| partition::divide_list(&values, n_sets))
    }
}

// ============================================================================
// Tests
// ============================================================================
