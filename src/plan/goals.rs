//! Goal evaluation over a resolved assignment.
//!
//! The objective surface an external optimizer reads: per-class property
//! means, their population-standard-deviation spread, the synthetic `size`
//! property, the `assignment_check` feasibility condition, and the
//! best-achievable spread targets computed with the partition estimator.

use super::resolver::ResolveState;
use crate::error::PlanError;
use crate::partition;
use crate::roster::Roster;
use std::collections::BTreeMap;

/// Number of students per class, ordered by class index.
pub(crate) fn class_sizes(finals: &[usize], n_classes: usize) -> Vec<usize> {
    let mut sizes = vec![0usize; n_classes];
    for &class in finals {
        sizes[class] += 1;
    }
    sizes
}

/// Per-class means of one property, ordered by class index.
///
/// An empty class contributes 0.0, matching the partition estimator's
/// placeholder mean. `None` for an unknown property.
pub(crate) fn class_means(
    roster: &Roster,
    finals: &[usize],
    n_classes: usize,
    property: &str,
) -> Option<Vec<f64>> {
    let values = roster.property_values(property)?;
    let mut sums = vec![0.0f64; n_classes];
    let mut counts = vec![0usize; n_classes];
    for (pos, &class) in finals.iter().enumerate() {
        sums[class] += values[pos];
        counts[class] += 1;
    }
    Some(
        sums.iter()
            .zip(&counts)
            .map(|(&sum, &count)| if count == 0 { 0.0 } else { sum / count as f64 })
            .collect(),
    )
}

/// The goal names for a roster: `spread_<prop>` per property plus
/// `spread_size`. Built once at plan construction.
pub(crate) fn goal_names(roster: &Roster) -> Vec<String> {
    roster
        .properties()
        .iter()
        .map(|p| format!("spread_{p}"))
        .chain(std::iter::once("spread_size".to_string()))
        .collect()
}

/// Evaluates one goal by name over a resolved assignment.
pub(crate) fn goal(
    roster: &Roster,
    finals: &[usize],
    n_classes: usize,
    name: &str,
) -> Option<f64> {
    let property = name.strip_prefix("spread_")?;
    if property == "size" {
        let sizes: Vec<f64> = class_sizes(finals, n_classes)
            .into_iter()
            .map(|s| s as f64)
            .collect();
        return Some(partition::std_pop(&sizes));
    }
    class_means(roster, finals, n_classes, property).map(|means| partition::std_pop(&means))
}

/// Best-achievable spread per goal, ignoring relational constraints.
///
/// Property goals come from the greedy list division of the raw column;
/// `spread_size` from the exact integer split of the roster size. These are
/// the floors an optimizer steers the actual spreads toward.
pub(crate) fn goal_targets(roster: &Roster, n_classes: usize) -> BTreeMap<String, f64> {
    let mut targets = BTreeMap::new();
    for prop in roster.properties() {
        if let Some(p) = roster.divide_property(prop, n_classes) {
            targets.insert(format!("spread_{prop}"), p.spread);
        }
    }
    let sizes: Vec<f64> = partition::divide_num(roster.len(), n_classes)
        .into_iter()
        .map(|s| s as f64)
        .collect();
    targets.insert("spread_size".to_string(), partition::std_pop(&sizes));
    targets
}

/// Checks every hard pair and every preference tally, returning the first
/// violation as a typed error.
pub(crate) fn verify(roster: &Roster, state: &ResolveState) -> Result<(), PlanError> {
    for (pos, student) in roster.iter().enumerate() {
        let class = state.finals[pos];
        for &nt in &student.not_together {
            let other = roster
                .position(nt)
                .expect("roster validation guarantees relation targets exist");
            if state.finals[other] == class {
                return Err(PlanError::NotTogetherViolated {
                    a: student.id,
                    b: nt,
                    class,
                });
            }
        }
        for &tog in &student.together {
            let other = roster
                .position(tog)
                .expect("roster validation guarantees relation targets exist");
            if state.finals[other] != class {
                return Err(PlanError::TogetherViolated {
                    a: student.id,
                    b: tog,
                    left: class,
                    right: state.finals[other],
                });
            }
        }
    }
    for (pos, student) in roster.iter().enumerate() {
        if state.pref_sat[pos] == 0 {
            return Err(PlanError::PreferenceUnsatisfied { id: student.id });
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
