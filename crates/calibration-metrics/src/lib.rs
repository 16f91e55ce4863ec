//! Calibration metrics over resolved bets.
//!
//! The Brier score is the mean squared error between stated probabilities
//! and realized binary outcomes: 0 is perfect calibration, 1 is maximally
//! wrong. All functions here are pure and order-insensitive.

use journal_core::{Bet, BetStatus};
use serde::{Deserialize, Serialize};

/// Counts of bets partitioned by lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub open: usize,
    pub resolved: usize,
}

/// Mean squared error between stated probabilities and realized outcomes.
///
/// Only bets that are resolved *and* carry an outcome contribute. Returns
/// `None` when no such bet exists — a missing score is not a perfect score,
/// so this never collapses to `Some(0.0)` on empty input.
pub fn brier_score(bets: &[Bet]) -> Option<f64> {
    let resolved: Vec<&Bet> = bets
        .iter()
        .filter(|b| b.status == BetStatus::Resolved && b.outcome.is_some())
        .collect();

    if resolved.is_empty() {
        return None;
    }

    let sum: f64 = resolved
        .iter()
        .map(|b| {
            let indicator = if b.outcome == Some(true) { 1.0 } else { 0.0 };
            (b.probability - indicator).powi(2)
        })
        .sum();

    Some(sum / resolved.len() as f64)
}

/// Partition the full input by status.
pub fn count_by_status(bets: &[Bet]) -> StatusCounts {
    bets.iter().fold(StatusCounts::default(), |mut acc, bet| {
        match bet.status {
            BetStatus::Open => acc.open += 1,
            BetStatus::Resolved => acc.resolved += 1,
        }
        acc
    })
}

/// Statistics for one probability bucket of resolved bets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketStats {
    pub bucket_start: f64,
    pub bucket_end: f64,
    pub mid_confidence: f64,
    /// Fraction of bets in this bucket that resolved true.
    pub actual_hit_rate: f64,
    pub sample_count: usize,
    /// mid_confidence - actual_hit_rate; positive means overconfident.
    pub calibration_gap: f64,
}

/// Dashboard-ready calibration aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub brier_score: Option<f64>,
    pub counts: StatusCounts,
    pub resolved_sample_size: usize,
    pub buckets: Vec<BucketStats>,
}

const N_BUCKETS: usize = 10;

/// Build the full calibration aggregate for a user's bets.
pub fn calibration_report(bets: &[Bet]) -> CalibrationReport {
    let counts = count_by_status(bets);

    let resolved: Vec<(f64, bool)> = bets
        .iter()
        .filter(|b| b.status == BetStatus::Resolved)
        .filter_map(|b| b.outcome.map(|o| (b.probability, o)))
        .collect();

    CalibrationReport {
        brier_score: brier_score(bets),
        counts,
        resolved_sample_size: resolved.len(),
        buckets: accuracy_by_bucket(&resolved),
    }
}

/// Bucket resolved (probability, outcome) pairs into tenths of the
/// probability range. Empty buckets are omitted.
fn accuracy_by_bucket(resolved: &[(f64, bool)]) -> Vec<BucketStats> {
    if resolved.is_empty() {
        return Vec::new();
    }

    let mut buckets: Vec<Vec<bool>> = vec![Vec::new(); N_BUCKETS];
    for (prob, outcome) in resolved {
        let idx = ((*prob * N_BUCKETS as f64) as usize).min(N_BUCKETS - 1);
        buckets[idx].push(*outcome);
    }

    buckets
        .into_iter()
        .enumerate()
        .filter(|(_, b)| !b.is_empty())
        .map(|(i, bucket)| {
            let mid = (i as f64 + 0.5) / N_BUCKETS as f64;
            let hits = bucket.iter().filter(|&&o| o).count();
            let hit_rate = hits as f64 / bucket.len() as f64;
            BucketStats {
                bucket_start: i as f64 / N_BUCKETS as f64,
                bucket_end: (i + 1) as f64 / N_BUCKETS as f64,
                mid_confidence: mid,
                actual_hit_rate: hit_rate,
                sample_count: bucket.len(),
                calibration_gap: mid - hit_rate,
            }
        })
        .collect()
}

impl CalibrationReport {
    /// Human-readable assessment of calibration quality.
    pub fn assessment(&self) -> String {
        match self.brier_score {
            None => "No resolved bets yet".to_string(),
            Some(_) if self.resolved_sample_size < 10 => {
                "Too few resolved bets for a reliable read".to_string()
            }
            Some(score) if score < 0.1 => {
                "Excellent calibration - your probabilities track reality closely".to_string()
            }
            Some(score) if score < 0.2 => {
                "Good calibration - probabilities are reasonably reliable".to_string()
            }
            Some(score) if score < 0.3 => {
                "Moderate calibration - consider hedging extreme probabilities".to_string()
            }
            Some(_) => "Poor calibration - stated probabilities diverge from outcomes".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bet(probability: f64, status: BetStatus, outcome: Option<bool>) -> Bet {
        Bet {
            id: None,
            user_id: "user-1".to_string(),
            statement: "test".to_string(),
            probability,
            status,
            outcome,
            created_at: Utc::now(),
            resolved_at: outcome.map(|_| Utc::now()),
        }
    }

    #[test]
    fn test_brier_score_worked_example() {
        // ((0.9 - 1)^2 + (0.2 - 0)^2) / 2 = (0.01 + 0.04) / 2 = 0.025
        let bets = vec![
            bet(0.9, BetStatus::Resolved, Some(true)),
            bet(0.2, BetStatus::Resolved, Some(false)),
        ];
        let score = brier_score(&bets).unwrap();
        assert!((score - 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_brier_score_absent_not_zero() {
        assert_eq!(brier_score(&[]), None);

        // Open bets and outcome-less rows never produce a score
        let bets = vec![
            bet(0.5, BetStatus::Open, None),
            bet(0.8, BetStatus::Resolved, None),
        ];
        assert_eq!(brier_score(&bets), None);
    }

    #[test]
    fn test_brier_score_ignores_open_bets() {
        let bets = vec![
            bet(0.9, BetStatus::Resolved, Some(true)),
            bet(0.01, BetStatus::Open, None),
        ];
        let score = brier_score(&bets).unwrap();
        assert!((score - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_brier_score_order_insensitive() {
        let mut bets = vec![
            bet(0.9, BetStatus::Resolved, Some(true)),
            bet(0.2, BetStatus::Resolved, Some(false)),
            bet(0.7, BetStatus::Resolved, Some(true)),
        ];
        let forward = brier_score(&bets).unwrap();
        bets.reverse();
        let backward = brier_score(&bets).unwrap();
        assert!((forward - backward).abs() < 1e-12);
    }

    #[test]
    fn test_count_by_status() {
        let bets = vec![
            bet(0.5, BetStatus::Open, None),
            bet(0.5, BetStatus::Open, None),
            bet(0.5, BetStatus::Resolved, Some(true)),
        ];
        let counts = count_by_status(&bets);
        assert_eq!(counts, StatusCounts { open: 2, resolved: 1 });
    }

    #[test]
    fn test_calibration_report_empty() {
        let report = calibration_report(&[]);
        assert_eq!(report.brier_score, None);
        assert_eq!(report.resolved_sample_size, 0);
        assert!(report.buckets.is_empty());
        assert!(report.assessment().contains("No resolved"));
    }

    #[test]
    fn test_calibration_report_buckets() {
        let bets = vec![
            bet(0.9, BetStatus::Resolved, Some(true)),
            bet(0.95, BetStatus::Resolved, Some(true)),
            bet(0.1, BetStatus::Resolved, Some(false)),
            bet(0.5, BetStatus::Open, None),
        ];
        let report = calibration_report(&bets);
        assert_eq!(report.resolved_sample_size, 3);
        assert_eq!(report.counts.open, 1);
        assert_eq!(report.buckets.len(), 2); // 0.9 bucket and 0.1 bucket

        let high = report
            .buckets
            .iter()
            .find(|b| b.bucket_start == 0.9)
            .unwrap();
        assert_eq!(high.sample_count, 2);
        assert_eq!(high.actual_hit_rate, 1.0);
    }

    #[test]
    fn test_probability_one_lands_in_top_bucket() {
        let bets = vec![bet(1.0, BetStatus::Resolved, Some(true))];
        let report = calibration_report(&bets);
        assert_eq!(report.buckets[0].bucket_end, 1.0);
    }
}
