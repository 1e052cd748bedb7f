//! Badge aggregation engine.
//!
//! Pure functions over an already-fetched slice of daily records. Callers
//! bound the slice (for example the most recent 30 records) and sort it if
//! stable per-kind ordering matters; per-kind buckets appear in first-occurrence
//! order across the scan.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::badge_kind::BadgeColor;
use crate::models::daily_record::{BadgeOutcome, DailyBadgeRecord};

/// Outcome counters for one badge kind.
#[derive(Debug, Clone, Serialize)]
pub struct KindStats {
    pub name: String,
    pub color: BadgeColor,
    pub earned: u64,
    pub not_earned: u64,
    pub absent: u64,
    pub total: u64,
    /// round(earned / total * 100); 0 when total is 0.
    pub percentage: u32,
}

/// Combined counters across all kinds.
#[derive(Debug, Clone, Serialize)]
pub struct OverallStats {
    pub total_earned: u64,
    pub total_possible: u64,
    pub percentage: u32,
}

/// Aggregated badge statistics for a set of records.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeStatsReport {
    pub per_kind: Vec<KindStats>,
    pub overall: OverallStats,
}

/// Computes the rounded success percentage, defined as 0 when total is 0.
pub fn success_percentage(earned: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    ((earned as f64 / total as f64) * 100.0).round() as u32
}

/// Aggregates per-kind and overall statistics over the supplied records.
pub fn aggregate_badge_stats(records: &[DailyBadgeRecord]) -> BadgeStatsReport {
    let mut per_kind: Vec<KindStats> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();
    let mut total_earned = 0u64;
    let mut total_possible = 0u64;

    for record in records {
        for entry in &record.entries {
            let idx = match index_by_name.get(&entry.name) {
                Some(&idx) => idx,
                None => {
                    index_by_name.insert(entry.name.clone(), per_kind.len());
                    per_kind.push(KindStats {
                        name: entry.name.clone(),
                        color: entry.color,
                        earned: 0,
                        not_earned: 0,
                        absent: 0,
                        total: 0,
                        percentage: 0,
                    });
                    per_kind.len() - 1
                }
            };

            let stats = &mut per_kind[idx];
            match entry.outcome {
                BadgeOutcome::Earned => stats.earned += 1,
                BadgeOutcome::NotEarned => stats.not_earned += 1,
                BadgeOutcome::Absent => stats.absent += 1,
            }
            stats.total += 1;

            total_possible += 1;
            if entry.outcome == BadgeOutcome::Earned {
                total_earned += 1;
            }
        }
    }

    for stats in &mut per_kind {
        stats.percentage = success_percentage(stats.earned, stats.total);
    }

    BadgeStatsReport {
        per_kind,
        overall: OverallStats {
            total_earned,
            total_possible,
            percentage: success_percentage(total_earned, total_possible),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::daily_record::ResolvedBadgeEntry;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn entry(name: &str, outcome: BadgeOutcome) -> ResolvedBadgeEntry {
        ResolvedBadgeEntry {
            badge_kind_id: Uuid::new_v4(),
            name: name.to_string(),
            color: BadgeColor::Green,
            outcome,
        }
    }

    fn record(day: (i32, u32, u32), entries: Vec<ResolvedBadgeEntry>) -> DailyBadgeRecord {
        DailyBadgeRecord {
            id: 1,
            record_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            day: NaiveDate::from_ymd_opt(day.0, day.1, day.2).unwrap(),
            entries,
            notes: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_input_zero_guard() {
        let report = aggregate_badge_stats(&[]);
        assert!(report.per_kind.is_empty());
        assert_eq!(report.overall.total_earned, 0);
        assert_eq!(report.overall.total_possible, 0);
        assert_eq!(report.overall.percentage, 0);
    }

    #[test]
    fn test_percentage_rounding() {
        // 1 earned out of 3 total rounds to 33.
        assert_eq!(success_percentage(1, 3), 33);
        // 2 of 3 rounds to 67.
        assert_eq!(success_percentage(2, 3), 67);
        assert_eq!(success_percentage(0, 0), 0);
        assert_eq!(success_percentage(5, 5), 100);
    }

    #[test]
    fn test_buckets_by_outcome() {
        let records = vec![
            record(
                (2024, 3, 11),
                vec![
                    entry("Homework", BadgeOutcome::Earned),
                    entry("Discipline", BadgeOutcome::NotEarned),
                ],
            ),
            record(
                (2024, 3, 12),
                vec![
                    entry("Homework", BadgeOutcome::Absent),
                    entry("Discipline", BadgeOutcome::Earned),
                ],
            ),
        ];

        let report = aggregate_badge_stats(&records);
        assert_eq!(report.per_kind.len(), 2);

        let homework = &report.per_kind[0];
        assert_eq!(homework.name, "Homework");
        assert_eq!(homework.earned, 1);
        assert_eq!(homework.not_earned, 0);
        assert_eq!(homework.absent, 1);
        assert_eq!(homework.total, 2);
        assert_eq!(homework.percentage, 50);

        assert_eq!(report.overall.total_earned, 2);
        assert_eq!(report.overall.total_possible, 4);
        assert_eq!(report.overall.percentage, 50);
    }

    #[test]
    fn test_absent_counts_toward_total_not_earned() {
        let records = vec![record(
            (2024, 3, 11),
            vec![
                entry("Homework", BadgeOutcome::Absent),
                entry("Homework", BadgeOutcome::Absent),
            ],
        )];

        let report = aggregate_badge_stats(&records);
        let homework = &report.per_kind[0];
        assert_eq!(homework.total, 2);
        assert_eq!(homework.earned, 0);
        assert_eq!(homework.percentage, 0);
        assert_eq!(report.overall.percentage, 0);
    }

    #[test]
    fn test_first_occurrence_order() {
        let records = vec![
            record((2024, 3, 11), vec![entry("Reading", BadgeOutcome::Earned)]),
            record(
                (2024, 3, 12),
                vec![
                    entry("Attendance", BadgeOutcome::Earned),
                    entry("Reading", BadgeOutcome::Earned),
                ],
            ),
        ];

        let report = aggregate_badge_stats(&records);
        let names: Vec<&str> = report.per_kind.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["Reading", "Attendance"]);
    }

    #[test]
    fn test_one_of_three_rounds_to_33() {
        let records = vec![record(
            (2024, 3, 11),
            vec![
                entry("Homework", BadgeOutcome::Earned),
                entry("Homework", BadgeOutcome::NotEarned),
                entry("Homework", BadgeOutcome::NotEarned),
            ],
        )];

        let report = aggregate_badge_stats(&records);
        assert_eq!(report.per_kind[0].percentage, 33);
        assert_eq!(report.overall.percentage, 33);
    }
}
