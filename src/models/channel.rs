use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One aggregated live-TV channel.
///
/// Immutable once created. The `id` is assigned during the merge phase of a
/// refresh cycle and is only meaningful within the snapshot that contains it:
/// ids are the dense range `1..=N` in merge order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: u32,
    /// Display name, prefixed with the source name ("DaddyLive | BBC One").
    pub display_name: String,
    /// Absolute URL of the upstream stream.
    pub original_url: String,
    /// Logo URL, empty string when the source provides none.
    pub logo: String,
    /// Source-prefixed category label ("DaddyLive - Sports").
    pub group: String,
    /// Whether playback must go through the /stream/:id relay.
    pub requires_relay: bool,
}

/// A configured playlist origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub name: String,
    pub url: String,
    /// Fixed per source: true when the origin rejects direct client playback
    /// and streams must be relayed through this server.
    pub requires_relay: bool,
}

impl SourceSpec {
    pub fn new(name: impl Into<String>, url: impl Into<String>, requires_relay: bool) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            requires_relay,
        }
    }
}

/// The complete channel table produced by one refresh cycle.
///
/// Published wholesale by the refresh scheduler and never mutated afterwards;
/// readers hold an `Arc` to it, so a snapshot stays valid for as long as any
/// reader keeps it, even after a newer one has been published.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySnapshot {
    pub channels: Vec<Channel>,
    pub refreshed_at: DateTime<Utc>,
}

impl RegistrySnapshot {
    /// An empty snapshot, used before the first refresh cycle completes.
    pub fn empty() -> Self {
        Self {
            channels: Vec::new(),
            refreshed_at: Utc::now(),
        }
    }

    pub fn new(channels: Vec<Channel>) -> Self {
        Self {
            channels,
            refreshed_at: Utc::now(),
        }
    }

    /// Look up a channel by its snapshot-local id.
    pub fn channel_by_id(&self, id: u32) -> Option<&Channel> {
        // Ids are dense 1..=N in vec order, so this is an index lookup.
        if id == 0 {
            return None;
        }
        self.channels.get((id - 1) as usize).filter(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(id: u32) -> Channel {
        Channel {
            id,
            display_name: format!("Test | Channel {}", id),
            original_url: format!("http://example.com/{}.m3u8", id),
            logo: String::new(),
            group: "Test - Other".to_string(),
            requires_relay: false,
        }
    }

    #[test]
    fn test_channel_by_id() {
        let snapshot = RegistrySnapshot::new(vec![channel(1), channel(2), channel(3)]);

        assert_eq!(snapshot.channel_by_id(2).unwrap().id, 2);
        assert!(snapshot.channel_by_id(0).is_none());
        assert!(snapshot.channel_by_id(4).is_none());
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = RegistrySnapshot::empty();
        assert!(snapshot.is_empty());
        assert!(snapshot.channel_by_id(1).is_none());
    }
}
