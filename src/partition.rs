//! Greedy balanced-partition estimation.
//!
//! Splits a flat list of numbers into `n` sets while keeping the set means
//! as close together as possible. The result is the *theoretical floor* for
//! the spread of a property over classes: the plan resolver works under
//! additional relational constraints and generally cannot do better than
//! this unconstrained split, so [`divide_list`] output is used as an
//! optimization target, never as the assignment itself.
//!
//! # Algorithm
//!
//! Greedy largest-impact-first insertion:
//!
//! 1. For every value still in the pool, compute its worst-case hypothetical
//!    spread over the current sets ([`hypo_spread`]).
//! 2. Pop the value with the largest worst case ([`biggest_impact`]).
//! 3. Seed any still-empty set first; otherwise insert into the set that
//!    minimizes the resulting spread of means.
//!
//! Complexity is O(k² · n) for k values and n sets. No optimality guarantee
//! (balanced multiway partitioning is NP-hard); in practice the heuristic
//! lands on or near the optimum for the small lists a roster produces.

/// Mean of a slice, 0.0 when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation of a slice, 0.0 when empty.
///
/// Population form (divide by `n`, not `n - 1`): the per-class means are the
/// whole population of interest, not a sample from a larger one.
pub fn std_pop(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Result of [`divide_list`]: the split values, per-set means, and the
/// population standard deviation of those means.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Partition {
    /// The input values divided into sets, in insertion order.
    pub sets: Vec<Vec<f64>>,

    /// Mean of each set (0.0 for a set that stayed empty).
    pub means: Vec<f64>,

    /// Population standard deviation of `means` — the achieved balance.
    pub spread: f64,
}

/// Hypothetical spreads from inserting `num` into each set in turn.
///
/// For each set, returns the population standard deviation of the set means
/// that would result if `num` joined that set while the others stayed as
/// they are. A set that is still empty is treated as holding a single
/// placeholder value `0` so that its mean is defined.
pub fn hypo_spread(num: f64, sets: &[Vec<f64>]) -> Vec<f64> {
    let base_means: Vec<f64> = sets
        .iter()
        .map(|s| if s.is_empty() { 0.0 } else { mean(s) })
        .collect();

    (0..sets.len())
        .map(|target| {
            let means: Vec<f64> = (0..sets.len())
                .map(|j| {
                    if j == target {
                        let mut with_num: Vec<f64> =
                            if sets[j].is_empty() { vec![0.0] } else { sets[j].clone() };
                        with_num.push(num);
                        mean(&with_num)
                    } else {
                        base_means[j]
                    }
                })
                .collect();
            std_pop(&means)
        })
        .collect()
}

/// Pops the pool value whose placement could disturb the balance the most.
///
/// "Impact" of a value is the maximum over all sets of its hypothetical
/// spread ([`hypo_spread`]). Ties go to the earliest occurrence.
pub fn biggest_impact(pool: &mut Vec<f64>, sets: &[Vec<f64>]) -> f64 {
    debug_assert!(!pool.is_empty(), "pool must not be empty");
    let mut best_idx = 0;
    let mut best_impact = f64::NEG_INFINITY;
    for (i, &num) in pool.iter().enumerate() {
        let impact = hypo_spread(num, sets)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        if impact > best_impact {
            best_impact = impact;
            best_idx = i;
        }
    }
    pool.remove(best_idx)
}

/// Pops the absolutely-largest value from a list.
///
/// On a magnitude tie between a positive and a negative value, the positive
/// one wins.
pub fn pop_absmax(values: &mut Vec<f64>) -> f64 {
    debug_assert!(!values.is_empty(), "values must not be empty");
    let absmax = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    let target = if values.contains(&absmax) { absmax } else { -absmax };
    let idx = values
        .iter()
        .position(|&v| v == target)
        .expect("target derived from values; always present");
    values.remove(idx)
}

/// Divides a list of numbers into `n_sets` sets, minimizing the spread of
/// the set means.
///
/// Values are placed one at a time, most disruptive first. Every set is
/// seeded with one value before any set receives a second; after seeding,
/// each value goes to the set that minimizes the resulting spread (ties
/// broken by set index).
///
/// # Panics
///
/// Panics if `n_sets` is zero.
///
/// # Example
///
/// ```
/// use classplan::partition::divide_list;
///
/// let p = divide_list(&[-1.0, 1.0, 0.0], 2);
/// assert_eq!(p.sets, vec![vec![-1.0, 0.0], vec![1.0]]);
/// assert_eq!(p.means, vec![-0.5, 1.0]);
/// ```
pub fn divide_list(values: &[f64], n_sets: usize) -> Partition {
    assert!(n_sets > 0, "n_sets must be at least 1");
    let mut pool: Vec<f64> = values.to_vec();
    let mut sets: Vec<Vec<f64>> = vec![Vec::new(); n_sets];

    while !pool.is_empty() {
        let num = biggest_impact(&mut pool, &sets);
        if let Some(empty) = sets.iter().position(|s| s.is_empty()) {
            sets[empty].push(num);
            continue;
        }
        let spreads = hypo_spread(num, &sets);
        let mut best = 0;
        for (i, &s) in spreads.iter().enumerate() {
            if s < spreads[best] {
                best = i;
            }
        }
        sets[best].push(num);
    }

    let means: Vec<f64> = sets
        .iter()
        .map(|s| if s.is_empty() { 0.0 } else { mean(s) })
        .collect();
    let spread = std_pop(&means);
    Partition { sets, means, spread }
}

/// Divides an integer total into `n_sets` nearly-equal integer parts.
///
/// The first `total % n_sets` parts get one extra unit. Used to compute the
/// best-achievable class sizes for a roster.
///
/// # Panics
///
/// Panics if `n_sets` is zero.
///
/// # Example
///
/// ```
/// use classplan::partition::divide_num;
///
/// assert_eq!(divide_num(14, 3), vec![5, 5, 4]);
/// ```
pub fn divide_num(total: usize, n_sets: usize) -> Vec<usize> {
    assert!(n_sets > 0, "n_sets must be at least 1");
    let base = total / n_sets;
    let rem = total % n_sets;
    (0..n_sets)
        .map(|i| if i < rem { base + 1 } else { base })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0]), 3.0);
        assert_eq!(std_pop(&[]), 0.0);
        assert_eq!(std_pop(&[1.0, 1.0, 1.0]), 0.0);
        // [-0.5, 1.0]: mean 0.25, deviations ±0.75
        assert_eq!(std_pop(&[-0.5, 1.0]), 0.75);
    }

    #[test]
    fn test_hypo_spread() {
        let sets = vec![vec![-2.0, -2.0], vec![1.0, 1.0]];
        assert_eq!(hypo_spread(1.0, &sets), vec![1.0, 1.5]);
    }

    #[test]
    fn test_hypo_spread_empty_sets_use_placeholder() {
        // Empty sets count as [0], so inserting 2 into the first of two
        // empty sets yields means [1, 0] -> std 0.5.
        let sets = vec![Vec::new(), Vec::new()];
        assert_eq!(hypo_spread(2.0, &sets), vec![0.5, 0.5]);
    }

    #[test]
    fn test_biggest_impact() {
        let mut pool = vec![10.0, 1.0, 0.0];
        let picked = biggest_impact(&mut pool, &[vec![0.0], vec![0.0]]);
        assert_eq!(picked, 10.0);
        assert_eq!(pool, vec![1.0, 0.0]);

        let mut pool = vec![10.0, 1.0, 0.0];
        let picked = biggest_impact(&mut pool, &[vec![10.0], vec![10.0]]);
        assert_eq!(picked, 0.0);
        assert_eq!(pool, vec![10.0, 1.0]);
    }

    #[test]
    fn test_pop_absmax() {
        let mut values = vec![1.0, -2.0];
        assert_eq!(pop_absmax(&mut values), -2.0);
        assert_eq!(values, vec![1.0]);

        // positive wins a magnitude tie
        let mut values = vec![-3.0, 3.0];
        assert_eq!(pop_absmax(&mut values), 3.0);
    }

    #[test]
    fn test_divide_list_equal_values() {
        let p = divide_list(&[1.0, 1.0, 1.0], 3);
        assert_eq!(p.sets, vec![vec![1.0], vec![1.0], vec![1.0]]);
        assert_eq!(p.means, vec![1.0, 1.0, 1.0]);
        assert_eq!(p.spread, 0.0);
    }

    #[test]
    fn test_divide_list_seeds_empty_sets_first() {
        let p = divide_list(&[-1.0, 1.0, 0.0], 3);
        assert_eq!(p.sets, vec![vec![-1.0], vec![1.0], vec![0.0]]);
        assert_eq!(p.means, vec![-1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_divide_list_two_sets() {
        let p = divide_list(&[-1.0, 1.0, 0.0], 2);
        assert_eq!(p.sets, vec![vec![-1.0, 0.0], vec![1.0]]);
        assert_eq!(p.means, vec![-0.5, 1.0]);
        assert_eq!(p.spread, 0.75);
    }

    #[test]
    fn test_divide_list_fewer_values_than_sets() {
        let p = divide_list(&[2.0], 3);
        assert_eq!(p.sets, vec![vec![2.0], Vec::new(), Vec::new()]);
        assert_eq!(p.means, vec![2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_divide_list_empty_input() {
        let p = divide_list(&[], 2);
        assert_eq!(p.sets, vec![Vec::<f64>::new(), Vec::new()]);
        assert_eq!(p.means, vec![0.0, 0.0]);
        assert_eq!(p.spread, 0.0);
    }

    #[test]
    fn test_divide_num() {
        assert_eq!(divide_num(14, 3), vec![5, 5, 4]);
        assert_eq!(divide_num(6, 3), vec![2, 2, 2]);
        assert_eq!(divide_num(2, 3), vec![1, 1, 0]);
        assert_eq!(divide_num(0, 2), vec![0, 0]);
    }

    #[test]
    #[should_panic(expected = "n_sets must be at least 1")]
    fn test_divide_num_zero_sets_panics() {
        divide_num(5, 0);
    }
}
