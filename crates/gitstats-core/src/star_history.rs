// Star history reconstruction
//
// GitHub doesn't expose historical star counts, so we back them out of the
// stargazer listing: position in the list is treated as the order people
// starred in. Unstars are invisible to this, and so is any reordering on
// GitHub's side.
use gitstats_api::{StarredUser, PER_PAGE};

use crate::models::{StarHistory, StarPoint};

/// Turn stargazer pages (page 1 first) into a date-ordered star history.
///
/// Entry `i` of page `p` (1-based) of a page holding `n` entries is assigned
/// `p * PER_PAGE - (n - i - 1)` stars, floored at zero for pages holding
/// more than `PER_PAGE` entries.
pub fn build_star_history(repo_name: impl Into<String>, pages: &[Vec<StarredUser>]) -> StarHistory {
    let per_page = u64::from(PER_PAGE);
    let mut history = Vec::with_capacity(pages.iter().map(Vec::len).sum());

    for (index, page) in pages.iter().enumerate() {
        let star_count = (index as u64 + 1) * per_page;
        let in_page = page.len() as u64;

        for (position, stargazer) in page.iter().enumerate() {
            history.push(StarPoint {
                date: stargazer.starred_at,
                stars: star_count.saturating_sub(in_page - position as u64 - 1),
            });
        }
    }

    history.sort_by(|a, b| a.date.cmp(&b.date));

    StarHistory {
        repo_name: repo_name.into(),
        history,
    }
}
