//! Latency statistics over completed idle episodes.
//!
//! These are display-side summaries for the `--summary` output and the
//! written report; they never feed back into the estimator.

use super::episode::CompletedIdleEpisode;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated exit latency for one group of episodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    /// Group label (idle state or wake source)
    pub key: String,

    /// Number of episodes in the group
    pub episodes: u64,

    /// Episodes with a known wake event
    pub with_wake: u64,

    /// Episodes with both wake and exit known
    pub with_latency: u64,

    /// Episodes whose entered state differs from the requested one
    #[serde(default)]
    pub demoted: u64,

    /// Episodes with a known exit
    #[serde(default)]
    pub with_exit: u64,

    /// Mean wake-to-exit latency in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_latency: Option<f64>,

    /// Worst wake-to-exit latency in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_latency: Option<f64>,

    /// Mean enter-to-exit residency in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_residency: Option<f64>,
}

impl LatencyStats {
    fn new(key: String) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    fn add(&mut self, episode: &CompletedIdleEpisode) {
        self.episodes += 1;
        if episode.wake_ts.is_some() {
            self.with_wake += 1;
        }
        if episode.was_demoted() {
            self.demoted += 1;
        }
        if let Some(residency) = episode.residency() {
            let total = self.mean_residency.unwrap_or(0.0) * self.with_exit as f64 + residency;
            self.with_exit += 1;
            self.mean_residency = Some(total / self.with_exit as f64);
        }
        if let Some(latency) = episode.exit_latency() {
            let total = self.mean_latency.unwrap_or(0.0) * self.with_latency as f64 + latency;
            self.with_latency += 1;
            self.mean_latency = Some(total / self.with_latency as f64);
            self.max_latency = Some(self.max_latency.map_or(latency, |max| max.max(latency)));
        }
    }

    /// Get human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "{}: {} episodes | {} woken | {} demoted | mean {} | max {} | residency {}",
            self.key,
            self.episodes,
            self.with_wake,
            self.demoted,
            format_latency(self.mean_latency),
            format_latency(self.max_latency),
            format_latency(self.mean_residency)
        )
    }
}

/// Group episodes by the idle state actually entered
///
/// **Public** - sorted by ascending state
pub fn latency_by_state(episodes: &[CompletedIdleEpisode]) -> Vec<LatencyStats> {
    group_by(episodes, |e| e.state)
}

/// Group episodes by wake source label
///
/// **Public** - episodes without a wake source are grouped under `(none)`
pub fn latency_by_wake_source(episodes: &[CompletedIdleEpisode]) -> Vec<LatencyStats> {
    group_by(episodes, |e| {
        if e.wake_src.is_empty() {
            "(none)".to_string()
        } else {
            e.wake_src.clone()
        }
    })
}

fn group_by<K, F>(episodes: &[CompletedIdleEpisode], key_fn: F) -> Vec<LatencyStats>
where
    K: Ord + ToString,
    F: Fn(&CompletedIdleEpisode) -> K,
{
    let mut groups: BTreeMap<K, LatencyStats> = BTreeMap::new();
    for episode in episodes {
        let key = key_fn(episode);
        groups
            .entry(key)
            .or_insert_with_key(|k| LatencyStats::new(k.to_string()))
            .add(episode);
    }

    debug!("Grouped {} episodes into {} buckets", episodes.len(), groups.len());

    groups.into_values().collect()
}

/// Render a text table of latency statistics
///
/// **Public** - used by the analyze command for `--summary`
pub fn generate_text_summary(episodes: &[CompletedIdleEpisode]) -> String {
    let mut lines = Vec::new();

    lines.push(format!("  IDLE EPISODES: {}", episodes.len()));
    lines.push(String::new());
    push_table(&mut lines, "STATE", &latency_by_state(episodes));
    lines.push(String::new());
    push_table(&mut lines, "WAKE SOURCE", &latency_by_wake_source(episodes));

    lines.join("\n")
}

fn push_table(lines: &mut Vec<String>, title: &str, rows: &[LatencyStats]) {
    lines.push(format!(
        "  {:<28} {:>9} {:>9} {:>9} {:>12} {:>12} {:>12}",
        title, "EPISODES", "WOKEN", "DEMOTED", "MEAN", "MAX", "RESIDENCY"
    ));
    lines.push(format!("  {}", "-".repeat(97)));

    for row in rows {
        // Truncate labels that would break the column layout
        let key = if row.key.chars().count() > 28 {
            format!("{}...", row.key.chars().take(25).collect::<String>())
        } else {
            row.key.clone()
        };
        lines.push(format!(
            "  {:<28} {:>9} {:>9} {:>9} {:>12} {:>12} {:>12}",
            key,
            row.episodes,
            row.with_wake,
            row.demoted,
            format_latency(row.mean_latency),
            format_latency(row.max_latency),
            format_latency(row.mean_residency)
        ));
    }
}

fn format_latency(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) => format!("{:.1}us", s * 1_000_000.0),
        None => "-".to_string(),
    }
}
