//! The enrichment metric.
//!
//! For a true cutoff `ct` and predicted cutoff `cp` over `n` ranked items:
//!
//! ```text
//! score = |top(ranked_true, ⌊ct·n⌋) ∩ top(ranked_pred, ⌊cp·n⌋)| / ⌊min(ct, cp)·n⌋
//! ```
//!
//! The denominator is the largest overlap the two truncations could have,
//! not a mean of the two set sizes. Each side is still truncated by its own
//! cutoff in the numerator.

use std::collections::HashSet;

use enrichment_common::{ResError, Result};

use crate::rank::rank_positions;

/// Number of items kept by a top-`cutoff` truncation of `n` items.
#[inline]
pub(crate) fn truncate(cutoff: f64, n: usize) -> usize {
    ((cutoff * n as f64).floor() as usize).min(n)
}

fn check_cutoff(name: &str, cutoff: f64) -> Result<()> {
    if cutoff > 0.0 && cutoff <= 1.0 {
        Ok(())
    } else {
        Err(ResError::InvalidArgument(format!(
            "{name} must lie in (0, 1], got {cutoff}"
        )))
    }
}

/// Denominator of the score, or the degenerate-cutoff error when it is zero.
fn denominator(cutoff_true: f64, cutoff_pred: f64, n: usize) -> Result<usize> {
    match truncate(cutoff_true.min(cutoff_pred), n) {
        0 => Err(ResError::DegenerateCutoff {
            cutoff_true,
            cutoff_pred,
            sample_count: n,
        }),
        d => Ok(d),
    }
}

/// Enrichment of `ranked_pred` against `ranked_true` at one cutoff pair.
///
/// Both arguments are rank permutations (see [`crate::rank::rank_order`]).
/// Fails with [`ResError::DegenerateCutoff`] when the smaller cutoff keeps
/// no items.
pub fn get_enrichment(
    ranked_true: &[usize],
    ranked_pred: &[usize],
    cutoff_true: f64,
    cutoff_pred: f64,
) -> Result<f64> {
    if ranked_true.len() != ranked_pred.len() {
        return Err(ResError::InvalidArgument(format!(
            "ranking lengths differ: {} true vs {} predicted",
            ranked_true.len(),
            ranked_pred.len()
        )));
    }
    check_cutoff("cutoff_true", cutoff_true)?;
    check_cutoff("cutoff_pred", cutoff_pred)?;

    let n = ranked_true.len();
    let denom = denominator(cutoff_true, cutoff_pred, n)?;

    let included_true: HashSet<usize> =
        ranked_true[..truncate(cutoff_true, n)].iter().copied().collect();
    let included_pred: HashSet<usize> =
        ranked_pred[..truncate(cutoff_pred, n)].iter().copied().collect();
    let numerator = included_true.intersection(&included_pred).count();

    Ok(numerator as f64 / denom as f64)
}

/// Precomputed scorer for many cutoff pairs over one pair of rankings.
///
/// Holds the predicted position of every item, so a cell costs one pass
/// over the true top set with no hashing or allocation. Scores are
/// identical to [`get_enrichment`].
#[derive(Debug, Clone)]
pub struct CutoffScorer<'a> {
    ranked_true: &'a [usize],
    pred_positions: Vec<usize>,
}

impl<'a> CutoffScorer<'a> {
    /// Build a scorer. Both rankings must be permutations of `0..n`.
    pub fn new(ranked_true: &'a [usize], ranked_pred: &[usize]) -> Result<Self> {
        let n = ranked_true.len();
        if ranked_pred.len() != n {
            return Err(ResError::InvalidArgument(format!(
                "ranking lengths differ: {} true vs {} predicted",
                n,
                ranked_pred.len()
            )));
        }
        for (name, order) in [("ranked_true", ranked_true), ("ranked_pred", ranked_pred)] {
            if !is_permutation(order) {
                return Err(ResError::InvalidArgument(format!(
                    "{name} is not a permutation of 0..{n}"
                )));
            }
        }

        Ok(Self {
            ranked_true,
            pred_positions: rank_positions(ranked_pred),
        })
    }

    pub fn sample_count(&self) -> usize {
        self.ranked_true.len()
    }

    /// True when `score(cutoff_true, cutoff_pred)` would hit a zero denominator.
    pub fn is_degenerate(&self, cutoff_true: f64, cutoff_pred: f64) -> bool {
        truncate(cutoff_true.min(cutoff_pred), self.sample_count()) == 0
    }

    pub fn score(&self, cutoff_true: f64, cutoff_pred: f64) -> Result<f64> {
        check_cutoff("cutoff_true", cutoff_true)?;
        check_cutoff("cutoff_pred", cutoff_pred)?;

        let n = self.sample_count();
        let denom = denominator(cutoff_true, cutoff_pred, n)?;
        let pred_top = truncate(cutoff_pred, n);

        let numerator = self.ranked_true[..truncate(cutoff_true, n)]
            .iter()
            .filter(|&&item| self.pred_positions[item] < pred_top)
            .count();

        Ok(numerator as f64 / denom as f64)
    }
}

fn is_permutation(order: &[usize]) -> bool {
    let mut seen = vec![false; order.len()];
    for &item in order {
        match seen.get_mut(item) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::{rank_order, RankDirection};

    #[test]
    fn test_identical_rankings_score_one() {
        let values = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let ranked = rank_order(&values, RankDirection::Ascending);
        // Top-2 on both sides is {0, 1}
        let score = get_enrichment(&ranked, &ranked, 0.4, 0.4).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_small_cutoff_is_degenerate() {
        let ranked: Vec<usize> = (0..5).collect();
        // floor(0.1 * 5) = 0
        let err = get_enrichment(&ranked, &ranked, 0.1, 0.1).unwrap_err();
        match err {
            ResError::DegenerateCutoff { sample_count, .. } => assert_eq!(sample_count, 5),
            other => panic!("expected DegenerateCutoff, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_rankings_always_degenerate() {
        assert!(get_enrichment(&[], &[], 1.0, 1.0).unwrap_err().is_degenerate());
    }

    #[test]
    fn test_denominator_uses_min_cutoff() {
        // true top-2 = {0,1}; pred top-4 = {3,2,1,0}; overlap 2, denom floor(0.5*4) = 2
        let ranked_true = vec![0, 1, 2, 3];
        let ranked_pred = vec![3, 2, 1, 0];
        assert_eq!(get_enrichment(&ranked_true, &ranked_pred, 0.5, 1.0).unwrap(), 1.0);
        // Reversed rankings share nothing in their top halves
        assert_eq!(get_enrichment(&ranked_true, &ranked_pred, 0.5, 0.5).unwrap(), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let ranked_true = vec![0, 1, 2, 3];
        let ranked_pred = vec![1, 3, 0, 2];
        // true top-2 {0,1}, pred top-2 {1,3} → 1 / 2
        assert_eq!(get_enrichment(&ranked_true, &ranked_pred, 0.5, 0.5).unwrap(), 0.5);
    }

    #[test]
    fn test_invalid_arguments() {
        let ranked: Vec<usize> = (0..4).collect();
        assert!(matches!(
            get_enrichment(&ranked, &ranked[..3], 0.5, 0.5),
            Err(ResError::InvalidArgument(_))
        ));
        assert!(matches!(
            get_enrichment(&ranked, &ranked, 0.0, 0.5),
            Err(ResError::InvalidArgument(_))
        ));
        assert!(matches!(
            get_enrichment(&ranked, &ranked, 0.5, 1.5),
            Err(ResError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_scorer_matches_set_definition() {
        let ranked_true = vec![4, 0, 3, 1, 2, 7, 6, 5];
        let ranked_pred = vec![0, 4, 1, 5, 3, 2, 6, 7];
        let scorer = CutoffScorer::new(&ranked_true, &ranked_pred).unwrap();
        let cutoffs = [0.125, 0.25, 0.3, 0.5, 0.75, 0.9, 1.0];
        for &ct in &cutoffs {
            for &cp in &cutoffs {
                let expected = get_enrichment(&ranked_true, &ranked_pred, ct, cp).unwrap();
                assert_eq!(scorer.score(ct, cp).unwrap(), expected, "ct={ct} cp={cp}");
            }
        }
    }

    #[test]
    fn test_scorer_rejects_non_permutation() {
        let ranked_true = vec![0, 1, 2];
        assert!(CutoffScorer::new(&ranked_true, &[0, 0, 2]).is_err());
        assert!(CutoffScorer::new(&ranked_true, &[0, 1, 3]).is_err());
        assert!(CutoffScorer::new(&ranked_true, &[0, 1]).is_err());
    }

    #[test]
    fn test_scorer_degenerate_check() {
        let ranked: Vec<usize> = (0..5).collect();
        let scorer = CutoffScorer::new(&ranked, &ranked).unwrap();
        assert!(scorer.is_degenerate(0.1, 1.0));
        assert!(!scorer.is_degenerate(0.2, 1.0));
        assert!(scorer.score(1.0, 0.1).unwrap_err().is_degenerate());
    }
}
