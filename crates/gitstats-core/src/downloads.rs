// Release download aggregation
use gitstats_api::Release;

use crate::models::{AssetStats, DownloadStats, ReleaseDownloadStats};

/// Fold a release list into per-release and overall download totals.
///
/// Releases come out newest first. The sort is stable, so releases created at
/// the same instant keep their input order.
pub fn calculate_download_stats(repo_name: impl Into<String>, mut releases: Vec<Release>) -> DownloadStats {
    releases.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut stats = DownloadStats {
        repo_name: repo_name.into(),
        total_downloads: 0,
        releases: Vec::with_capacity(releases.len()),
    };

    for release in releases {
        let assets: Vec<AssetStats> = release
            .assets
            .into_iter()
            .map(|asset| AssetStats {
                name: asset.name,
                download_count: asset.download_count,
            })
            .collect();
        let total_downloads = assets.iter().map(|a| a.download_count).sum();

        stats.total_downloads += total_downloads;
        stats.releases.push(ReleaseDownloadStats {
            tag_name: release.tag_name,
            created_at: release.created_at,
            total_downloads,
            assets,
        });
    }

    stats
}
