//! Background refresh of the channel registry.
//!
//! Runs as a perpetual task spawned at startup: every cycle fetches all
//! configured sources plus the discovered fallback playlists, merges them
//! into a fresh snapshot, and publishes it atomically. Per-source failures
//! are logged and contribute zero channels; they never abort the cycle.

use std::sync::Arc;
use std::time::Duration;
use tokio::time;

use crate::models::{Channel, RegistrySnapshot, SourceSpec};
use crate::services::categorizer::CategoryRules;
use crate::services::discovery::{FallbackDiscoverer, FALLBACK_SOURCE_NAME};
use crate::services::fetcher::SourceFetcher;
use crate::services::parser::{parse_playlist, ParsedChannel};
use crate::services::registry::ChannelRegistry;

/// Append one source's parsed channels to the in-progress merge list,
/// assigning sequential ids continuing from the running counter.
fn merge_batch(
    merged: &mut Vec<Channel>,
    source_name: &str,
    requires_relay: bool,
    parsed: Vec<ParsedChannel>,
    rules: &CategoryRules,
) {
    for entry in parsed {
        let category = rules.categorize(&entry.name);
        let id = merged.len() as u32 + 1;
        merged.push(Channel {
            id,
            display_name: format!("{} | {}", source_name, entry.name),
            original_url: entry.url,
            logo: entry.logo,
            group: format!("{} - {}", source_name, category),
            requires_relay,
        });
    }
}

/// The refresh driver. Owns the fetch/discovery plumbing and the category
/// rules; the registry is the only thing it writes to.
pub struct RefreshScheduler {
    fetcher: SourceFetcher,
    discoverer: FallbackDiscoverer,
    sources: Vec<SourceSpec>,
    rules: CategoryRules,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(
        fetcher: SourceFetcher,
        discoverer: FallbackDiscoverer,
        sources: Vec<SourceSpec>,
        rules: CategoryRules,
        interval_secs: u64,
    ) -> Self {
        Self {
            fetcher,
            discoverer,
            sources,
            rules,
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// Run one full aggregation cycle and return the resulting snapshot.
    ///
    /// The snapshot is built completely before being handed back; the caller
    /// publishes it in one step so readers never see a partial merge.
    pub async fn run_cycle(&self) -> RegistrySnapshot {
        let mut merged: Vec<Channel> = Vec::new();

        for source in &self.sources {
            match self.fetcher.fetch(&source.url).await {
                Ok(body) => {
                    let parsed = parse_playlist(&body);
                    tracing::info!("Source {}: {} channels", source.name, parsed.len());
                    merge_batch(
                        &mut merged,
                        &source.name,
                        source.requires_relay,
                        parsed,
                        &self.rules,
                    );
                }
                Err(e) => {
                    tracing::warn!("Source {} unavailable: {}", source.name, e);
                }
            }
        }

        // Discovered fallback playlists always go through the relay: the free
        // hosts behind them tend to block direct client playback.
        for url in self.discoverer.discover().await {
            match self.fetcher.fetch(&url).await {
                Ok(body) => {
                    let parsed = parse_playlist(&body);
                    tracing::info!("Fallback {}: {} channels", url, parsed.len());
                    merge_batch(&mut merged, FALLBACK_SOURCE_NAME, true, parsed, &self.rules);
                }
                Err(e) => {
                    tracing::warn!("Fallback {} unavailable: {}", url, e);
                }
            }
        }

        RegistrySnapshot::new(merged)
    }

    /// Perpetual refresh loop: one cycle immediately at startup, then one per
    /// interval. Spawn with `tokio::spawn`.
    ///
    /// The new snapshot is published unconditionally, even when empty: source
    /// failures are already contained per source, so an all-sources-down cycle
    /// legitimately yields an empty registry.
    pub async fn run(self, registry: Arc<ChannelRegistry>) {
        tracing::info!(
            "Starting refresh task ({} sources, interval: {}s)",
            self.sources.len(),
            self.interval.as_secs()
        );

        let mut ticker = time::interval(self.interval);

        loop {
            ticker.tick().await;

            let snapshot = self.run_cycle().await;
            tracing::info!("Refresh complete: {} channels", snapshot.len());
            registry.publish(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::parser::ParsedChannel;

    fn parsed(name: &str, url: &str) -> ParsedChannel {
        ParsedChannel {
            name: name.to_string(),
            url: url.to_string(),
            logo: String::new(),
            group_title: String::new(),
        }
    }

    #[test]
    fn test_merge_assigns_dense_ids_across_batches() {
        let rules = CategoryRules::default();
        let mut merged = Vec::new();

        merge_batch(
            &mut merged,
            "SourceA",
            true,
            vec![parsed("One", "http://a/1"), parsed("Two", "http://a/2")],
            &rules,
        );
        merge_batch(
            &mut merged,
            "SourceB",
            false,
            vec![parsed("Three", "http://b/3")],
            &rules,
        );

        let ids: Vec<u32> = merged.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(merged[0].requires_relay);
        assert!(!merged[2].requires_relay);
        assert_eq!(merged[2].display_name, "SourceB | Three");
    }

    #[test]
    fn test_failed_source_contributes_zero_without_gaps() {
        let rules = CategoryRules::default();
        let mut merged = Vec::new();

        merge_batch(
            &mut merged,
            "Healthy1",
            false,
            vec![parsed("A", "http://h1/a")],
            &rules,
        );
        // A failed fetch reaches the merge as no batch at all; ids continue
        // densely from where the previous source left off.
        merge_batch(
            &mut merged,
            "Healthy2",
            false,
            vec![parsed("B", "http://h2/b"), parsed("C", "http://h2/c")],
            &rules,
        );

        let ids: Vec<u32> = merged.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_merge_applies_category_prefix() {
        let rules = CategoryRules::default();
        let mut merged = Vec::new();

        merge_batch(
            &mut merged,
            "DaddyLive",
            true,
            vec![parsed("Sky Sports Main Event", "http://x/1.m3u8")],
            &rules,
        );

        assert_eq!(merged[0].group, "DaddyLive - Sports");
        assert_eq!(merged[0].display_name, "DaddyLive | Sky Sports Main Event");
    }
}
