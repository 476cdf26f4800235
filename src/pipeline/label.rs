//! Relative popularity labeling.
//!
//! Scores every record, finds the run's 33rd/66th percentile cut points, and
//! tags each record Low/Medium/High. The numeric score is never persisted.

use crate::models::{ChannelRecord, PopularityLabel};

/// Subscriber weight in the popularity score.
const SUBSCRIBER_WEIGHT: f64 = 0.7;

/// Engagement-proxy weight in the popularity score.
const ENGAGEMENT_WEIGHT: f64 = 0.3;

/// Percentile cut points of one labeling pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelThresholds {
    pub p33: f64,
    pub p66: f64,
}

/// Popularity score of one record. Computed on the fly during labeling and
/// never written to the report.
pub fn popularity_score(record: &ChannelRecord) -> f64 {
    record.subscribers as f64 * SUBSCRIBER_WEIGHT + record.engagement_proxy * ENGAGEMENT_WEIGHT
}

/// Label every record relative to this run's score distribution.
///
/// Returns `None` for an empty collection (the caller logs the diagnostic);
/// otherwise the cut points used. Relabeling is idempotent: scores depend
/// only on persisted fields, so a second pass assigns identical labels.
pub fn assign_labels(records: &mut [ChannelRecord]) -> Option<LabelThresholds> {
    if records.is_empty() {
        return None;
    }

    let scores: Vec<f64> = records.iter().map(popularity_score).collect();
    let mut sorted = scores.clone();
    sorted.sort_by(f64::total_cmp);

    let thresholds = LabelThresholds {
        p33: quantile(&sorted, 0.33),
        p66: quantile(&sorted, 0.66),
    };

    for (record, score) in records.iter_mut().zip(scores) {
        record.popularity_label = Some(label_for(score, thresholds));
    }

    Some(thresholds)
}

fn label_for(score: f64, thresholds: LabelThresholds) -> PopularityLabel {
    if score <= thresholds.p33 {
        PopularityLabel::Low
    } else if score <= thresholds.p66 {
        PopularityLabel::Medium
    } else {
        PopularityLabel::High
    }
}

/// Quantile by linear interpolation between closest ranks.
///
/// `sorted` must be ascending and non-empty; `q` in `[0, 1]`.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(subscribers: u64, engagement_proxy: f64) -> ChannelRecord {
        ChannelRecord {
            channel_id: format!("UC{subscribers}"),
            channel_name: "Chan".to_string(),
            subscribers,
            total_views: 0,
            total_videos: 0,
            country: "US".to_string(),
            published_at: String::new(),
            channel_age_years: None,
            views_per_video: 0.0,
            subscribers_per_video: 0.0,
            views_per_subscriber: 0.0,
            average_likes: 0,
            average_comments: 0,
            engagement_proxy,
            videos_per_year: 0.0,
            description_length: 0,
            description_word_count: 0,
            description_richness: 0.0,
            topic_categories: Vec::new(),
            popularity_label: None,
        }
    }

    fn labels(records: &[ChannelRecord]) -> Vec<PopularityLabel> {
        records
            .iter()
            .map(|r| r.popularity_label.unwrap())
            .collect()
    }

    #[test]
    fn quantile_interpolates_between_ranks() {
        let sorted: Vec<f64> = (1..=10).map(|n| n as f64).collect();
        assert!((quantile(&sorted, 0.33) - 3.97).abs() < 1e-9);
        assert!((quantile(&sorted, 0.66) - 6.94).abs() < 1e-9);
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 1.0), 10.0);
        assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0], 0.5), 2.5);
    }

    #[test]
    fn quantile_of_single_value_is_that_value() {
        assert_eq!(quantile(&[42.0], 0.33), 42.0);
        assert_eq!(quantile(&[42.0], 0.66), 42.0);
    }

    #[test]
    fn score_weights_subscribers_and_proxy() {
        let r = record(1000, 0.5);
        assert!((popularity_score(&r) - 700.15).abs() < 1e-9);
    }

    #[test]
    fn labels_split_into_thirds() {
        let mut records: Vec<ChannelRecord> =
            (1u64..=9).map(|n| record(n * 100, 0.0)).collect();
        let thresholds = assign_labels(&mut records).unwrap();

        assert!(thresholds.p33 < thresholds.p66);
        let assigned = labels(&records);
        assert_eq!(
            assigned[..3],
            [PopularityLabel::Low, PopularityLabel::Low, PopularityLabel::Low]
        );
        assert_eq!(
            assigned[3..6],
            [
                PopularityLabel::Medium,
                PopularityLabel::Medium,
                PopularityLabel::Medium
            ]
        );
        assert_eq!(
            assigned[6..],
            [PopularityLabel::High, PopularityLabel::High, PopularityLabel::High]
        );
    }

    #[test]
    fn boundary_scores_take_the_lower_tier() {
        // Identical scores collapse both cut points onto the score itself.
        let mut records = vec![record(500, 0.0), record(500, 0.0), record(500, 0.0)];
        assign_labels(&mut records).unwrap();
        assert!(
            records
                .iter()
                .all(|r| r.popularity_label == Some(PopularityLabel::Low))
        );
    }

    #[test]
    fn single_record_is_low() {
        let mut records = vec![record(1_000_000, 0.9)];
        let thresholds = assign_labels(&mut records).unwrap();
        assert_eq!(thresholds.p33, thresholds.p66);
        assert_eq!(records[0].popularity_label, Some(PopularityLabel::Low));
    }

    #[test]
    fn relabeling_is_idempotent() {
        let mut records: Vec<ChannelRecord> =
            (1u64..=7).map(|n| record(n * 137, 0.25)).collect();
        let first = assign_labels(&mut records).unwrap();
        let first_labels = labels(&records);

        let second = assign_labels(&mut records).unwrap();
        assert_eq!(first, second);
        assert_eq!(first_labels, labels(&records));
    }

    #[test]
    fn empty_collection_skips_labeling() {
        let mut records: Vec<ChannelRecord> = Vec::new();
        assert_eq!(assign_labels(&mut records), None);
    }
}
