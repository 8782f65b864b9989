use std::env;

use crate::models::SourceSpec;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub base_url: String,

    // Refresh
    pub refresh_interval_secs: u64,
    pub fetch_timeout_ms: u64,

    // Sources
    pub sources: Vec<SourceSpec>,
    pub fallback_index_url: String,
    pub fallback_max_sources: usize,

    // Relay
    pub relay_connect_timeout_ms: u64,
    pub relay_read_timeout_ms: u64,

    // Misc
    pub user_agent: String,
}

/// Parse the SOURCES env var: `name|url|relay` entries separated by `;`.
/// Example: `DaddyLive|https://host/playlist.m3u8|relay;FreeTV|https://host/free.m3u8|direct`
fn parse_sources(raw: &str) -> Vec<SourceSpec> {
    raw.split(';')
        .filter_map(|entry| {
            let mut parts = entry.splitn(3, '|');
            let name = parts.next()?.trim();
            let url = parts.next()?.trim();
            if name.is_empty() || url.is_empty() {
                return None;
            }
            let relay = parts
                .next()
                .map(|f| matches!(f.trim(), "relay" | "true" | "1"))
                .unwrap_or(false);
            Some(SourceSpec::new(name, url, relay))
        })
        .collect()
}

fn default_sources() -> Vec<SourceSpec> {
    vec![
        SourceSpec::new("DaddyLive", "https://daddylive.sx/playlist.m3u8", true),
        SourceSpec::new(
            "FreeTV",
            "https://raw.githubusercontent.com/Free-TV/IPTV/master/playlist.m3u8",
            false,
        ),
    ]
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Server
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),

            // Refresh
            refresh_interval_secs: env::var("REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap_or(300), // 5 minutes

            fetch_timeout_ms: env::var("FETCH_TIMEOUT_MS")
                .unwrap_or_else(|_| "15000".to_string())
                .parse()
                .unwrap_or(15_000), // 15 seconds

            // Sources
            sources: env::var("SOURCES")
                .ok()
                .map(|raw| parse_sources(&raw))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(default_sources),

            fallback_index_url: env::var("FALLBACK_INDEX_URL").unwrap_or_else(|_| {
                "https://raw.githubusercontent.com/iptv-org/iptv/master/index.m3u".to_string()
            }),
            fallback_max_sources: env::var("FALLBACK_MAX_SOURCES")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),

            // Relay
            relay_connect_timeout_ms: env::var("RELAY_CONNECT_TIMEOUT_MS")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .unwrap_or(10_000),
            relay_read_timeout_ms: env::var("RELAY_READ_TIMEOUT_MS")
                .unwrap_or_else(|_| "30000".to_string())
                .parse()
                .unwrap_or(30_000),

            // Misc - browser-like user agent; several origins reject plain
            // server-to-server requests.
            user_agent: env::var("USER_AGENT").unwrap_or_else(|_| {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                    .to_string()
            }),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sources() {
        let sources = parse_sources(
            "DaddyLive|https://a.example/list.m3u8|relay;FreeTV|https://b.example/free.m3u8|direct",
        );
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, "DaddyLive");
        assert!(sources[0].requires_relay);
        assert_eq!(sources[1].name, "FreeTV");
        assert!(!sources[1].requires_relay);
    }

    #[test]
    fn test_parse_sources_skips_malformed() {
        let sources = parse_sources("bad-entry;;Good|https://c.example/x.m3u8|relay");
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name, "Good");
    }
}
