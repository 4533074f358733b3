// Contributor aggregation: org-wide head counts and recent activity rankings
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use gitstats_api::{Commit, Contributor};

use crate::models::ActiveContributor;

/// How far back "active" reaches
pub const ACTIVITY_WINDOW_DAYS: i64 = 30;

/// Label sent back in `time_range`
pub const ACTIVITY_WINDOW_LABEL: &str = "Last 30 days";

/// Start of the activity window ending at `now`
pub fn activity_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(ACTIVITY_WINDOW_DAYS)
}

/// Add every named contributor to the set of distinct logins
pub fn collect_logins(logins: &mut HashSet<String>, contributors: Vec<Contributor>) {
    logins.extend(
        contributors
            .into_iter()
            .map(|c| c.login)
            .filter(|login| !login.is_empty()),
    );
}

/// Running per-login commit counts
///
/// Feed it commits from as many repositories as you like, then call
/// [`ActivityTally::into_ranked`].
#[derive(Debug, Default)]
pub struct ActivityTally {
    stats: HashMap<String, ActiveContributor>,
}

impl ActivityTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count commits by linked login, ignoring members and unlinked authors
    pub fn record_commits(&mut self, commits: &[Commit], members: &HashSet<String>) {
        for commit in commits {
            let Some(login) = commit.author.as_ref().map(|a| a.login.as_str()) else {
                continue;
            };
            if login.is_empty() || members.contains(login) {
                continue;
            }
            let Some(date) = commit.commit.author.as_ref().and_then(|a| a.date) else {
                continue;
            };

            let stats = self
                .stats
                .entry(login.to_string())
                .or_insert_with(|| ActiveContributor {
                    login: login.to_string(),
                    contributions: 0,
                    last_active_date: date,
                });

            stats.contributions += 1;
            if date > stats.last_active_date {
                stats.last_active_date = date;
            }
        }
    }

    pub fn into_ranked(self) -> Vec<ActiveContributor> {
        let mut contributors: Vec<_> = self.stats.into_values().collect();
        rank_contributors(&mut contributors);
        contributors
    }
}

/// Most commits first, then most recently active, then login for a stable order
pub fn rank_contributors(contributors: &mut [ActiveContributor]) {
    contributors.sort_by(|a, b| {
        b.contributions
            .cmp(&a.contributions)
            .then_with(|| b.last_active_date.cmp(&a.last_active_date))
            .then_with(|| a.login.cmp(&b.login))
    });
}
