// Newest-first stargazer paging on top of GitHub's oldest-first listing
use gitstats_api::{StarredUser, User, PER_PAGE};

use crate::models::Stargazer;

/// Map a newest-first page number onto GitHub's oldest-first pages.
///
/// Page 1 is the last upstream page. Anything past the oldest page clamps to
/// upstream page 1.
pub fn reverse_page(total_count: u64, page: u32) -> u32 {
    let total_pages = total_count.div_ceil(u64::from(PER_PAGE));
    let reversed = total_pages as i64 - i64::from(page) + 1;
    reversed.clamp(1, i64::from(u32::MAX)) as u32
}

/// Merge the listing entry with the user's full profile
pub fn to_stargazer(entry: &StarredUser, user: User) -> Stargazer {
    Stargazer {
        login: user.login,
        avatar_url: user.avatar_url,
        html_url: user.html_url,
        name: user.name.filter(|n| !n.is_empty()),
        location: user.location.filter(|l| !l.is_empty()),
        starred_at: entry.starred_at,
    }
}

pub fn sort_newest_first(stargazers: &mut [Stargazer]) {
    stargazers.sort_by(|a, b| b.starred_at.cmp(&a.starred_at));
}
