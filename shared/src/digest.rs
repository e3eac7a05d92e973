use chrono::NaiveDate;
use serde::Serialize;

use crate::contribution::ContributionRecord;
use crate::event::{Event, EventKind};

/// Event counts for a single calendar day, bucketed by category.
/// Categories outside the four displayed ones are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActivitySummary {
    pub pushes: u32,
    pub stars: u32,
    pub prs: u32,
    pub issues: u32,
}

/// Aggregate numbers for the digest panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DigestStats {
    pub total_following: usize,
    pub avg_daily_events: u32,
}

/// Pure projection over the already-fetched merged timeline.
pub fn activity_summary(events: &[Event], day: NaiveDate) -> ActivitySummary {
    let mut summary = ActivitySummary::default();

    for event in events.iter().filter(|e| e.created_at.date_naive() == day) {
        match event.kind {
            EventKind::Push => summary.pushes += 1,
            EventKind::Watch => summary.stars += 1,
            EventKind::PullRequest => summary.prs += 1,
            EventKind::Issue => summary.issues += 1,
            _ => {}
        }
    }

    summary
}

/// The account with the most contributions over the lookback window.
pub fn top_contributor(records: &[ContributionRecord]) -> Option<&ContributionRecord> {
    records.iter().max_by_key(|record| record.total_count)
}

pub fn digest_stats(total_following: usize, timeline_len: usize, window_days: i64) -> DigestStats {
    DigestStats {
        total_following,
        avg_daily_events: (timeline_len as f64 / window_days as f64).round() as u32,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::contribution::{compute_contributions, LOOKBACK_DAYS};
    use crate::event::{Account, AccountKind};

    fn event(id: &str, kind: EventKind, at: chrono::DateTime<Utc>) -> Event {
        Event {
            id: id.to_string(),
            kind,
            actor: Account {
                login: "alice".to_string(),
                avatar_url: String::new(),
                kind: AccountKind::Person,
            },
            repo: "alice/repo".to_string(),
            commits: Vec::new(),
            created_at: at,
        }
    }

    #[test]
    fn counts_only_the_four_displayed_buckets() {
        let at = Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
        let events = vec![
            event("1", EventKind::Push, at),
            event("2", EventKind::Push, at),
            event("3", EventKind::Watch, at),
            event("4", EventKind::Issue, at),
            event("5", EventKind::PullRequest, at),
            event("6", EventKind::Create, at),
        ];

        let summary = activity_summary(&events, at.date_naive());

        assert_eq!(
            summary,
            ActivitySummary {
                pushes: 2,
                stars: 1,
                prs: 1,
                issues: 1,
            }
        );
    }

    #[test]
    fn other_days_are_filtered_out() {
        let today = Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2024, 6, 9, 23, 59, 59).unwrap();
        let events = vec![
            event("1", EventKind::Push, today),
            event("2", EventKind::Push, yesterday),
        ];

        let summary = activity_summary(&events, today.date_naive());

        assert_eq!(summary.pushes, 1);
    }

    #[test]
    fn top_contributor_is_highest_window_total() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
        let light = compute_contributions(
            Account {
                login: "alice".to_string(),
                avatar_url: String::new(),
                kind: AccountKind::Person,
            },
            &[],
            LOOKBACK_DAYS,
            now,
        );
        let mut heavy = light.clone();
        heavy.account.login = "bob".to_string();
        heavy.total_count = 12;

        let records = vec![light, heavy.clone()];
        assert_eq!(top_contributor(&records), Some(&heavy));
    }

    #[test]
    fn no_contributors_means_no_top() {
        assert_eq!(top_contributor(&[]), None);
    }

    #[test]
    fn digest_stats_round_the_daily_average() {
        let stats = digest_stats(7, 95, 30);
        assert_eq!(stats.total_following, 7);
        assert_eq!(stats.avg_daily_events, 3);
    }
}
