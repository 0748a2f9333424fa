//! Dashboard auto-refresh

use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use super::AdminContext;
use crate::dashboard::DashboardSummary;

fn print_summary(summary: &DashboardSummary) {
    println!(
        "[{}] challenges {} ({} public) | badges {} ({} challenge, {} action) | plans {}/{} shown | dangling refs {}",
        chrono::Local::now().format("%H:%M:%S"),
        summary.challenges,
        summary.public_challenges,
        summary.badges,
        summary.challenge_badges,
        summary.action_badges,
        summary.visible_plans,
        summary.plans,
        summary.dangling_references,
    );
}

/// Reload and print the summary every interval until Ctrl-C
pub async fn watch_command(ctx: &AdminContext, interval: Option<u64>) -> Result<()> {
    let secs = interval
        .unwrap_or(ctx.config.settings.refresh_interval_secs)
        .max(1);
    info!("Refreshing every {}s, Ctrl-C to stop", secs);

    let mut ticker = tokio::time::interval(Duration::from_secs(secs));
    let mut last: Option<DashboardSummary> = None;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match ctx.store.load() {
                    Ok(snapshot) => {
                        let summary = DashboardSummary::from_snapshot(&snapshot);
                        if last.as_ref() != Some(&summary) {
                            print_summary(&summary);
                            last = Some(summary);
                        }
                    }
                    // keep the last summary on screen
                    Err(e) => warn!("Refresh failed: {:#}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping dashboard refresh");
                break;
            }
        }
    }
    Ok(())
}
