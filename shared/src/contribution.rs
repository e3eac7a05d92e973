use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use itertools::Itertools;
use serde::Serialize;

use crate::event::{Account, Event, EventKind};

/// Rolling window, in days, over which contributions are aggregated.
pub const LOOKBACK_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyContribution {
    pub date: NaiveDate,
    pub count: u32,
}

/// Per-account contribution stats, derived entirely from that
/// account's event timeline within the lookback window. Recomputed
/// fresh on every load, never updated incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributionRecord {
    pub account: Account,
    pub total_count: u32,
    pub current_streak: u32,
    /// Most recent day first.
    pub daily_history: Vec<DailyContribution>,
}

/// Builds the daily contribution histogram and streak counter for one
/// account.
///
/// Only push events inside the window qualify; a day's count is the
/// total number of commits carried by that day's pushes. A push with
/// an empty commit payload still creates a zero-count day entry, which
/// in turn terminates any streak crossing that day. That quirk is kept
/// as-is for compatibility with the displayed numbers.
///
/// The streak is anchored at `now`'s calendar day, not at the most
/// recent activity day: an account inactive today has a streak of 0
/// no matter how long yesterday's run was.
pub fn compute_contributions(
    account: Account,
    events: &[Event],
    window_days: i64,
    now: DateTime<Utc>,
) -> ContributionRecord {
    let cutoff = now - Duration::days(window_days);

    let per_day: BTreeMap<NaiveDate, u32> = events
        .iter()
        .filter(|event| event.kind == EventKind::Push && event.created_at >= cutoff)
        .map(|event| (event.created_at.date_naive(), event.commits.len() as u32))
        .into_group_map()
        .into_iter()
        .map(|(date, counts)| (date, counts.into_iter().sum()))
        .collect();

    let total_count = per_day.values().sum();

    let mut current_streak = 0;
    let mut day = now.date_naive();
    while per_day.get(&day).is_some_and(|count| *count > 0) {
        current_streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }

    ContributionRecord {
        account,
        total_count,
        current_streak,
        daily_history: per_day
            .into_iter()
            .rev()
            .map(|(date, count)| DailyContribution { date, count })
            .collect(),
    }
}

/// Leaderboard order: longest streak first, ties broken by 30-day
/// total and then login so the output is deterministic.
pub fn leaderboard(mut records: Vec<ContributionRecord>) -> Vec<ContributionRecord> {
    records.sort_by(|a, b| {
        b.current_streak
            .cmp(&a.current_streak)
            .then(b.total_count.cmp(&a.total_count))
            .then(a.account.login.cmp(&b.account.login))
    });
    records
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::event::{AccountKind, Commit};

    fn account(login: &str) -> Account {
        Account {
            login: login.to_string(),
            avatar_url: String::new(),
            kind: AccountKind::Person,
        }
    }

    fn push_event(id: &str, at: DateTime<Utc>, commit_count: usize) -> Event {
        Event {
            id: id.to_string(),
            kind: EventKind::Push,
            actor: account("alice"),
            repo: "alice/repo".to_string(),
            commits: (0..commit_count)
                .map(|i| Commit {
                    sha: format!("sha-{i}"),
                    message: format!("commit {i}"),
                })
                .collect(),
            created_at: at,
        }
    }

    fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
        now - Duration::days(days)
    }

    #[test]
    fn streak_counts_back_from_today_over_a_gap() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let events = vec![
            push_event("1", days_ago(now, 0), 3),
            push_event("2", days_ago(now, 1), 2),
            push_event("3", days_ago(now, 3), 1),
        ];

        let record = compute_contributions(account("alice"), &events, LOOKBACK_DAYS, now);

        assert_eq!(record.current_streak, 2);
        assert_eq!(record.total_count, 6);
    }

    #[test]
    fn streak_is_zero_without_activity_today() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let events = vec![push_event("1", days_ago(now, 1), 5)];

        let record = compute_contributions(account("alice"), &events, LOOKBACK_DAYS, now);

        assert_eq!(record.current_streak, 0);
        assert_eq!(record.total_count, 5);
    }

    #[test]
    fn stale_history_keeps_totals_but_not_streak() {
        // Pushes on 2024-06-01..03 (3, 2, 1 commits), queried on 06-05.
        let now = Utc.with_ymd_and_hms(2024, 6, 5, 9, 0, 0).unwrap();
        let events = vec![
            push_event("1", Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(), 3),
            push_event("2", Utc.with_ymd_and_hms(2024, 6, 2, 10, 0, 0).unwrap(), 2),
            push_event("3", Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap(), 1),
        ];

        let record = compute_contributions(account("alice"), &events, LOOKBACK_DAYS, now);

        assert_eq!(record.total_count, 6);
        assert_eq!(record.current_streak, 0);
        assert_eq!(record.daily_history.len(), 3);
        // Most recent day first.
        assert_eq!(
            record.daily_history[0].date,
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
        );
    }

    #[test]
    fn empty_commit_payload_creates_a_streak_breaking_zero_day() {
        // Known quirk: a push with no commits still records the day,
        // with count 0, and a zero-count day terminates the streak.
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let events = vec![
            push_event("1", days_ago(now, 0), 1),
            push_event("2", days_ago(now, 1), 2),
            push_event("3", days_ago(now, 2), 0),
            push_event("4", days_ago(now, 3), 4),
        ];

        let record = compute_contributions(account("alice"), &events, LOOKBACK_DAYS, now);

        assert_eq!(record.current_streak, 2);
        assert_eq!(record.daily_history.len(), 4);
        assert_eq!(record.total_count, 7);
    }

    #[test]
    fn events_outside_the_window_are_ignored() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let events = vec![
            push_event("1", days_ago(now, 0), 2),
            push_event("2", days_ago(now, 31), 9),
        ];

        let record = compute_contributions(account("alice"), &events, LOOKBACK_DAYS, now);

        assert_eq!(record.total_count, 2);
        assert_eq!(record.daily_history.len(), 1);
    }

    #[test]
    fn non_push_events_do_not_qualify() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let mut star = push_event("1", days_ago(now, 0), 0);
        star.kind = EventKind::Watch;

        let record = compute_contributions(account("alice"), &[star], LOOKBACK_DAYS, now);

        assert_eq!(record.total_count, 0);
        assert_eq!(record.current_streak, 0);
        assert!(record.daily_history.is_empty());
    }

    #[test]
    fn recomputation_is_idempotent() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let events = vec![
            push_event("1", days_ago(now, 0), 3),
            push_event("2", days_ago(now, 1), 2),
            push_event("3", days_ago(now, 4), 1),
        ];

        let first = compute_contributions(account("alice"), &events, LOOKBACK_DAYS, now);
        let second = compute_contributions(account("alice"), &events, LOOKBACK_DAYS, now);

        assert_eq!(first, second);
    }

    #[test]
    fn leaderboard_orders_by_streak_then_total() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let streak_two = compute_contributions(
            account("bob"),
            &[
                push_event("1", days_ago(now, 0), 1),
                push_event("2", days_ago(now, 1), 1),
            ],
            LOOKBACK_DAYS,
            now,
        );
        let streak_one_heavy = compute_contributions(
            account("carol"),
            &[push_event("3", days_ago(now, 0), 9)],
            LOOKBACK_DAYS,
            now,
        );
        let streak_one_light = compute_contributions(
            account("alice"),
            &[push_event("4", days_ago(now, 0), 1)],
            LOOKBACK_DAYS,
            now,
        );

        let ordered = leaderboard(vec![
            streak_one_light.clone(),
            streak_two.clone(),
            streak_one_heavy.clone(),
        ]);

        assert_eq!(ordered, vec![streak_two, streak_one_heavy, streak_one_light]);
    }
}
