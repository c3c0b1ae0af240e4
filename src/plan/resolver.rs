//! Dna-to-assignment resolution.
//!
//! Turns a per-student desired class ("dna") into a constraint-valid final
//! assignment. Students are committed strictly in ascending-number order;
//! every commit prunes the option sets of its `not_together` partners and
//! collapses the option sets of its `together` partners. Propagation is
//! irrevocable, so the outcome deliberately depends on the processing
//! order — changing the order changes observable results.
//!
//! A commit that empties another student's option set makes the current
//! dna unsatisfiable and aborts the pass; the caller decides whether to
//! redraw the dna or surface the failure.

use crate::roster::{Roster, StudentId};
use tracing::{debug, trace};

/// The dna could not be resolved: propagation emptied a student's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Unsatisfiable {
    /// The student whose option set emptied.
    pub id: StudentId,
}

/// Mutable per-student resolution state.
///
/// Indexed by roster position (ascending student number). `options` holds
/// the class indices still legally reachable by each student and is always
/// sorted ascending; `finals` is meaningful for a student only once the
/// resolver has committed it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolveState {
    pub options: Vec<Vec<usize>>,
    pub finals: Vec<usize>,
    pub pref_sat: Vec<u8>,
}

impl ResolveState {
    fn new(n_students: usize, n_classes: usize) -> Self {
        Self {
            options: vec![(0..n_classes).collect(); n_students],
            finals: vec![0; n_students],
            pref_sat: vec![0; n_students],
        }
    }

    /// Recomputes `pref_sat` for the student at `pos`.
    ///
    /// With `limit = Some(l)` only partners at positions `<= l` count; the
    /// resolver uses this so uncommitted students (whose `finals` entry is
    /// still the placeholder 0) cannot register as matches.
    pub fn update_pref_sat(&mut self, roster: &Roster, pos: usize, limit: Option<usize>) {
        let own_class = self.finals[pos];
        let mut sat = 0u8;
        for &pref in &roster.student_at(pos).preferences {
            let p = roster
                .position(pref)
                .expect("roster validation guarantees preference targets exist");
            if let Some(l) = limit {
                if p > l {
                    continue;
                }
            }
            if self.finals[p] == own_class {
                sat += 1;
            }
        }
        self.pref_sat[pos] = sat;
    }

    /// Recomputes `pref_sat` for every student, all partners counted.
    pub fn update_all_pref_sat(&mut self, roster: &Roster) {
        for pos in 0..roster.len() {
            self.update_pref_sat(roster, pos, None);
        }
    }

    /// Number of students with at least one satisfied preference.
    pub fn satisfied_count(&self) -> usize {
        self.pref_sat.iter().filter(|&&s| s > 0).count()
    }
}

/// Picks `choice` if allowed, else the smallest allowed class `>= choice`,
/// else wraps around to the smallest allowed class.
///
/// `options` must be sorted ascending and non-empty.
pub(crate) fn next_best(options: &[usize], choice: usize) -> usize {
    options
        .iter()
        .copied()
        .find(|&op| op >= choice)
        .unwrap_or_else(|| *options.first().expect("option set must not be empty"))
}

/// Resolves a dna vector into a final assignment.
///
/// `dna` is indexed by roster position; values outside `[0, n_classes)` are
/// tolerated and wrap through [`next_best`]. The running `pref_sat` tally is
/// recomputed over all committed students after every single commit — an
/// intentional O(n²) pass that keeps the preference-priority path honest.
pub(crate) fn resolve(
    roster: &Roster,
    n_classes: usize,
    dna: &[usize],
    prioritize_preferences: bool,
) -> Result<ResolveState, Unsatisfiable> {
    debug_assert_eq!(dna.len(), roster.len());
    let mut state = ResolveState::new(roster.len(), n_classes);

    for i in 0..roster.len() {
        let student = roster.student_at(i);
        let desired = dna[i];
        let fin = if prioritize_preferences {
            preferred_class(roster, &state, i, desired)
                .unwrap_or_else(|| next_best(&state.options[i], desired))
        } else {
            next_best(&state.options[i], desired)
        };
        trace!(
            id = student.id,
            desired,
            class = fin,
            options = ?state.options[i],
            "committing student"
        );
        state.finals[i] = fin;

        // running tally over everything committed so far
        for pos in 0..=i {
            state.update_pref_sat(roster, pos, Some(i));
        }

        for &nt in &student.not_together {
            let j = roster
                .position(nt)
                .expect("roster validation guarantees relation targets exist");
            if let Some(at) = state.options[j].iter().position(|&op| op == fin) {
                state.options[j].remove(at);
                if state.options[j].is_empty() {
                    debug!(
                        id = student.id,
                        partner = nt,
                        class = fin,
                        "option set emptied; dna unsatisfiable"
                    );
                    return Err(Unsatisfiable { id: nt });
                }
            }
        }
        for &tog in &student.together {
            let j = roster
                .position(tog)
                .expect("roster validation guarantees relation targets exist");
            // overrides any earlier pruning; a later not_together removal
            // that empties this singleton aborts the pass above
            state.options[j] = vec![fin];
        }
    }

    Ok(state)
}

/// Preference-priority class choice for the student at position `i`.
///
/// Prefers joining an already-committed preferred partner whose class is
/// still allowed — first one that named this student back and is itself
/// unsatisfied, else any committed preferred partner. Failing that, any
/// earlier student that named this student, is unsatisfied, and sits in an
/// allowed class. The dna class wins when it matches a candidate; otherwise
/// the first candidate's class is taken. `None` means fall back to the dna.
fn preferred_class(roster: &Roster, state: &ResolveState, i: usize, desired: usize) -> Option<usize> {
    let me = roster.student_at(i);
    let options = &state.options[i];

    let committed_partners: Vec<usize> = me
        .preferences
        .iter()
        .filter_map(|&p| roster.position(p))
        .filter(|&p| p < i && options.contains(&state.finals[p]))
        .collect();

    let candidates: Vec<usize> = if committed_partners.is_empty() {
        (0..i)
            .filter(|&q| {
                options.contains(&state.finals[q])
                    && state.pref_sat[q] == 0
                    && roster.student_at(q).preferences.contains(&me.id)
            })
            .collect()
    } else {
        let named_back: Vec<usize> = committed_partners
            .iter()
            .copied()
            .filter(|&p| {
                state.pref_sat[p] == 0 && roster.student_at(p).preferences.contains(&me.id)
            })
            .collect();
        if named_back.is_empty() {
            committed_partners
        } else {
            named_back
        }
    };

    if candidates.is_empty() {
        return None;
    }
    if candidates.iter().any(|&p| state.finals[p] == desired) {
        Some(desired)
    } else {
        Some(state.finals[candidates[0]])
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Student;

    fn roster(students: Vec<Student>) -> Roster {
        Roster::new(students).unwrap()
    }

    #[test]
    fn test_next_best() {
        let options = [0, 1, 2, 4];
        assert_eq!(next_best(&options, 0), 0);
        assert_eq!(next_best(&options, 1), 1);
        assert_eq!(next_best(&options, 2), 2);
        assert_eq!(next_best(&options, 3), 4);
        assert_eq!(next_best(&options, 5), 0);
    }

    #[test]
    fn test_unconstrained_dna_is_taken_verbatim() {
        let r = roster(vec![
            Student::new(1, "a"),
            Student::new(2, "b"),
            Student::new(3, "c"),
        ]);
        let state = resolve(&r, 3, &[2, 0, 1], false).unwrap();
        assert_eq!(state.finals, vec![2, 0, 1]);
        // trivial self-preferences are always satisfied
        assert_eq!(state.pref_sat, vec![1, 1, 1]);
    }

    #[test]
    fn test_not_together_prunes_partner() {
        let r = roster(vec![
            Student::new(1, "a").with_not_together(&[2]),
            Student::new(2, "b").with_not_together(&[1]),
        ]);
        // both want class 0; the second must be pushed to class 1
        let state = resolve(&r, 2, &[0, 0], false).unwrap();
        assert_eq!(state.finals, vec![0, 1]);
        assert_eq!(state.options[1], vec![1]);
    }

    #[test]
    fn test_together_collapses_partner_options() {
        let r = roster(vec![
            Student::new(1, "a").with_together(&[3]),
            Student::new(2, "b"),
            Student::new(3, "c").with_together(&[1]),
        ]);
        let state = resolve(&r, 3, &[2, 0, 0], false).unwrap();
        // student 3's dna says 0 but its options collapsed to {2}
        assert_eq!(state.finals, vec![2, 0, 2]);
    }

    #[test]
    fn test_unsatisfiable_triangle() {
        // three mutually separated students cannot fit in two classes
        let r = roster(vec![
            Student::new(1, "a").with_not_together(&[2, 3]),
            Student::new(2, "b").with_not_together(&[1, 3]),
            Student::new(3, "c").with_not_together(&[1, 2]),
        ]);
        let err = resolve(&r, 2, &[0, 1, 0], false).unwrap_err();
        assert_eq!(err, Unsatisfiable { id: 3 });
    }

    #[test]
    fn test_out_of_range_dna_wraps() {
        let r = roster(vec![Student::new(1, "a")]);
        let state = resolve(&r, 2, &[7], false).unwrap();
        assert_eq!(state.finals, vec![0]);
    }

    #[test]
    fn test_running_tally_ignores_uncommitted_partners() {
        // student 1 prefers 2, 3, 4 — none committed yet when 1 commits,
        // so its tally must be 0 even though everyone still "sits" in the
        // placeholder class 0.
        let r = roster(vec![
            Student::new(1, "a").with_preferences(&[2, 3, 4]),
            Student::new(2, "b"),
            Student::new(3, "c"),
            Student::new(4, "d"),
        ]);
        let state = resolve(&r, 2, &[0, 1, 1, 1], false).unwrap();
        // after the full pass, everyone else ended in class 1
        assert_eq!(state.finals, vec![0, 1, 1, 1]);
        assert_eq!(state.pref_sat[0], 0);
    }

    #[test]
    fn test_preference_priority_joins_committed_partner() {
        // students 1 and 2 commit to class 1; student 3 prefers them but
        // its dna says class 0 — priority resolution overrides the dna.
        let r = roster(vec![
            Student::new(1, "a"),
            Student::new(2, "b"),
            Student::new(3, "c").with_preferences(&[1, 2, 4]),
            Student::new(4, "d"),
        ]);
        let plain = resolve(&r, 2, &[1, 1, 0, 0], false).unwrap();
        assert_eq!(plain.finals[2], 0);
        let prio = resolve(&r, 2, &[1, 1, 0, 0], true).unwrap();
        assert_eq!(prio.finals[2], 1);
        assert!(prio.pref_sat[2] > 0);
    }

    #[test]
    fn test_preference_priority_prefers_mutual_unsatisfied_partner() {
        // both 1 and 2 are committed preferred partners of 3, but only 2
        // named 3 back and is unsatisfied — 3 joins 2's class, not 1's.
        let r = roster(vec![
            Student::new(1, "a"),
            Student::new(2, "b").with_preferences(&[3, 4, 5]),
            Student::new(3, "c").with_preferences(&[1, 2, 4]),
            Student::new(4, "d"),
            Student::new(5, "e"),
        ]);
        let state = resolve(&r, 3, &[0, 1, 2, 2, 2], true).unwrap();
        assert_eq!(state.finals[2], 1);
    }

    #[test]
    fn test_satisfied_count() {
        let r = roster(vec![
            Student::new(1, "a").with_preferences(&[2, 3, 4]),
            Student::new(2, "b"),
            Student::new(3, "c"),
            Student::new(4, "d"),
        ]);
        let state = resolve(&r, 2, &[0, 0, 1, 1], false).unwrap();
        assert_eq!(state.pref_sat[0], 1); // shares class 0 with student 2
        assert_eq!(state.satisfied_count(), 4);
    }
}
