//! Preference-satisfaction local search.
//!
//! Best-effort post-processing of a resolved assignment: raise the number
//! of students with at least one satisfied preference. Candidate moves are
//! bounded by the option sets the resolver left behind, so the hard
//! `together`/`not_together` constraints stay intact by construction — no
//! re-propagation happens here. Never fails; at worst the assignment is
//! left exactly as resolved.

use super::resolver::ResolveState;
use crate::roster::Roster;
use tracing::{debug, trace};

/// Runs up to `max_tries` improvement passes over the roster.
///
/// Each pass visits every student without a satisfied preference and tries,
/// in order:
///
/// 1. **Self-move**: reassign the student to another allowed class,
///    accepting the first class where its own tally exceeds 1 (strictly
///    more than one satisfied partner; kept deliberately stricter than the
///    `> 0` goal), otherwise reverting.
/// 2. **Partner-move**: if the roster-wide satisfied count did not go up,
///    reassign one of the student's preferred partners, accepting the
///    first move that strictly raises that count.
///
/// Stops early once every student is satisfied.
pub(crate) fn improve(roster: &Roster, state: &mut ResolveState, max_tries: usize) {
    let n = roster.len();
    state.update_all_pref_sat(roster);
    let mut count = state.satisfied_count();
    let mut all_satisfied = count == n;

    let mut pass = 0;
    while !all_satisfied && pass < max_tries {
        pass += 1;
        trace!(pass, satisfied = count, "improvement pass");
        for i in 0..n {
            if state.pref_sat[i] > 0 {
                continue;
            }
            try_self_move(roster, state, i);
            state.update_all_pref_sat(roster);
            let previous = count;
            count = state.satisfied_count();
            if count <= previous {
                try_partner_moves(roster, state, i);
            }
            count = state.satisfied_count();
            all_satisfied = count == n;
        }
    }
    debug!(
        passes = pass,
        satisfied = count,
        total = n,
        "preference improvement finished"
    );
}

/// Tries each of the student's other allowed classes, keeping the first one
/// that lifts its own tally above 1; falls back to the original class.
fn try_self_move(roster: &Roster, state: &mut ResolveState, i: usize) {
    let original = state.finals[i];
    let mut candidates: Vec<usize> = state.options[i]
        .iter()
        .copied()
        .filter(|&op| op != original)
        .collect();
    candidates.push(original);

    for class in candidates {
        state.finals[i] = class;
        state.update_pref_sat(roster, i, None);
        if state.pref_sat[i] > 1 {
            trace!(
                id = roster.student_at(i).id,
                from = original,
                to = class,
                "self-move accepted"
            );
            break;
        }
    }
}

/// Tries to move each preferred partner of the student, accepting the first
/// move that strictly raises the roster-wide satisfied count over its value
/// at entry.
fn try_partner_moves(roster: &Roster, state: &mut ResolveState, i: usize) {
    let baseline = state.satisfied_count();
    let partners: Vec<usize> = roster
        .student_at(i)
        .preferences
        .iter()
        .filter_map(|&p| roster.position(p))
        .collect();

    for k in partners {
        let original = state.finals[k];
        let mut candidates: Vec<usize> = state.options[k]
            .iter()
            .copied()
            .filter(|&op| op != original)
            .collect();
        candidates.push(original);

        for class in candidates {
            state.finals[k] = class;
            state.update_all_pref_sat(roster);
            if state.satisfied_count() > baseline {
                trace!(
                    id = roster.student_at(k).id,
                    from = original,
                    to = class,
                    "partner-move accepted"
                );
                break;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
