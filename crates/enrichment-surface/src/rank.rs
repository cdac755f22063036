//! Rank derivation.
//! Turns a value series into the permutation that sorts it.

use serde::{Deserialize, Serialize};

/// Direction in which a value series is ranked.
///
/// `Ascending` puts the smallest value at position 0, which suits scores
/// where lower is better (docking energies, IC50). `Descending` puts the
/// largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDirection {
    #[default]
    Ascending,
    Descending,
}

impl RankDirection {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            RankDirection::Descending
        } else {
            RankDirection::Ascending
        }
    }
}

/// Permutation of `0..n` ordering `values` in `direction`.
///
/// The sort is stable in both directions: numerically equal values keep
/// their original relative order, `-0.0` and `0.0` included. Every NaN ranks
/// above every number, so NaNs come last ascending and first descending.
pub fn rank_order(values: &[f64], direction: RankDirection) -> Vec<usize> {
    let keys: Vec<f64> = values.iter().copied().map(sort_key).collect();
    let mut order: Vec<usize> = (0..keys.len()).collect();

    match direction {
        RankDirection::Ascending => {
            order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
        }
        RankDirection::Descending => {
            order.sort_by(|&a, &b| keys[b].total_cmp(&keys[a]));
        }
    }

    order
}

/// Folds `-0.0` into `0.0` and every NaN into the positive quiet NaN.
fn sort_key(v: f64) -> f64 {
    if v.is_nan() {
        f64::NAN.copysign(1.0)
    } else {
        v + 0.0
    }
}

/// Inverse permutation: `positions[item]` is where `item` sits in `order`.
pub fn rank_positions(order: &[usize]) -> Vec<usize> {
    let mut positions = vec![0usize; order.len()];
    for (pos, &item) in order.iter().enumerate() {
        positions[item] = pos;
    }
    positions
}
