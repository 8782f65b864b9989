use crate::services::fetcher::SourceFetcher;

/// Source name assigned to playlists found through the fallback index.
pub const FALLBACK_SOURCE_NAME: &str = "GitHubFree";

/// Keep only lines that are absolute http(s) URLs pointing at a playlist
/// file, truncated to the first `max` matches.
pub fn extract_playlist_urls(index_text: &str, max: usize) -> Vec<String> {
    index_text
        .lines()
        .map(str::trim)
        .filter(|line| {
            (line.starts_with("http://") || line.starts_with("https://"))
                && (line.ends_with(".m3u") || line.ends_with(".m3u8"))
        })
        .take(max)
        .map(str::to_string)
        .collect()
}

/// Discovers extra playlist sources from a well-known index document.
#[derive(Clone)]
pub struct FallbackDiscoverer {
    fetcher: SourceFetcher,
    index_url: String,
    max_sources: usize,
}

impl FallbackDiscoverer {
    pub fn new(fetcher: SourceFetcher, index_url: String, max_sources: usize) -> Self {
        Self {
            fetcher,
            index_url,
            max_sources,
        }
    }

    /// Fetch the index and return up to `max_sources` playlist URLs.
    ///
    /// Any fetch failure yields an empty list; discovery is strictly
    /// best-effort and never fails a refresh cycle.
    pub async fn discover(&self) -> Vec<String> {
        match self.fetcher.fetch(&self.index_url).await {
            Ok(body) => extract_playlist_urls(&body, self.max_sources),
            Err(e) => {
                tracing::warn!("Fallback index fetch failed ({}): {}", self.index_url, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_playlist_urls_in_order() {
        let index = concat!(
            "# free playlists\n",
            "https://a.example/one.m3u8\n",
            "not a url\n",
            "https://a.example/readme.txt\n",
            "http://b.example/two.m3u\n",
        );
        let urls = extract_playlist_urls(index, 5);

        assert_eq!(
            urls,
            vec!["https://a.example/one.m3u8", "http://b.example/two.m3u"]
        );
    }

    #[test]
    fn test_truncates_to_cap() {
        let index = (0..10)
            .map(|i| format!("https://a.example/{}.m3u8", i))
            .collect::<Vec<_>>()
            .join("\n");
        let urls = extract_playlist_urls(&index, 5);

        assert_eq!(urls.len(), 5);
        assert_eq!(urls[0], "https://a.example/0.m3u8");
        assert_eq!(urls[4], "https://a.example/4.m3u8");
    }

    #[test]
    fn test_rejects_relative_and_non_http() {
        let index = "ftp://a.example/x.m3u8\n/local/list.m3u8\nplaylist.m3u\n";
        assert!(extract_playlist_urls(index, 5).is_empty());
    }
}
