use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex to parse EXTINF attributes (tvg-name="...", group-title="...", etc)
    static ref ATTR_REGEX: Regex = Regex::new(r#"(\w+(?:-\w+)*)="([^"]*)""#).unwrap();
}

/// A channel record as produced by the parser, before identity assignment.
///
/// Ids are assigned later, during the merge phase of a refresh cycle, so the
/// same playlist text always parses to the same records regardless of which
/// position the source occupies in the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChannel {
    pub name: String,
    pub url: String,
    /// Empty when the entry carries no tvg-logo attribute.
    pub logo: String,
    /// Raw group-title attribute, empty when absent.
    pub group_title: String,
}

fn is_absolute_http_url(line: &str) -> bool {
    line.starts_with("http://") || line.starts_with("https://")
}

/// Extract a named `key="value"` attribute from an EXTINF line.
fn extract_attr(line: &str, key: &str) -> String {
    ATTR_REGEX
        .captures_iter(line)
        .find(|caps| caps.get(1).map(|m| m.as_str()) == Some(key))
        .and_then(|caps| caps.get(2).map(|m| m.as_str().to_string()))
        .unwrap_or_default()
}

/// Channel name from an EXTINF line: prefer the tvg-name attribute, fall back
/// to the trailing text after the last comma.
fn extract_name(line: &str) -> String {
    let attr_name = extract_attr(line, "tvg-name");
    if !attr_name.trim().is_empty() {
        return attr_name.trim().to_string();
    }

    line.rsplit_once(',')
        .map(|(_, title)| title.trim().to_string())
        .unwrap_or_default()
}

/// Parse raw M3U playlist text into channel records.
///
/// Line-oriented scan: an `#EXTINF:` line describes the channel, and the next
/// non-empty line is taken as its stream URL. Entries whose URL line is
/// missing or not an absolute http(s) URL are dropped. Output preserves input
/// order; parsing is pure and deterministic.
pub fn parse_playlist(raw: &str) -> Vec<ParsedChannel> {
    let mut channels = Vec::new();
    let mut lines = raw.lines().map(str::trim).peekable();

    while let Some(line) = lines.next() {
        if !line.starts_with("#EXTINF:") {
            continue;
        }

        // The URL is the next non-empty line, but another metadata line means
        // this entry has no URL at all.
        let url = loop {
            match lines.peek() {
                Some(&next) if next.is_empty() => {
                    lines.next();
                }
                Some(&next) if !next.starts_with('#') => {
                    lines.next();
                    break Some(next);
                }
                _ => break None,
            }
        };

        let url = match url {
            Some(u) if is_absolute_http_url(u) => u.to_string(),
            _ => continue, // malformed entry, silently dropped
        };

        channels.push(ParsedChannel {
            name: extract_name(line),
            url,
            logo: extract_attr(line, "tvg-logo"),
            group_title: extract_attr(line, "group-title"),
        });
    }

    channels
}
