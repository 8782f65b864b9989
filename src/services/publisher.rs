use std::fmt::Write;

use crate::models::RegistrySnapshot;

/// Render a snapshot as an M3U playlist.
///
/// Pure function of its inputs: one `#EXTINF` metadata line plus one URL line
/// per channel, in snapshot order. Channels flagged for relay get the relay
/// endpoint in place of their origin URL.
pub fn render_playlist(snapshot: &RegistrySnapshot, base_url: &str) -> String {
    let mut out = String::from("#EXTM3U\n");

    for ch in &snapshot.channels {
        let _ = writeln!(
            out,
            "#EXTINF:-1 tvg-id=\"{}\" tvg-logo=\"{}\" group-title=\"{}\",{}",
            ch.id, ch.logo, ch.group, ch.display_name
        );
        if ch.requires_relay {
            let _ = writeln!(out, "{}/stream/{}", base_url, ch.id);
        } else {
            out.push_str(&ch.original_url);
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Channel;

    fn channel(id: u32, url: &str, requires_relay: bool) -> Channel {
        Channel {
            id,
            display_name: format!("Src | Channel {}", id),
            original_url: url.to_string(),
            logo: format!("http://logo/{}.png", id),
            group: "Src - Other".to_string(),
            requires_relay,
        }
    }

    #[test]
    fn test_header_and_line_pairs() {
        let snapshot = RegistrySnapshot::new(vec![channel(1, "http://a/1.m3u8", false)]);
        let out = render_playlist(&snapshot, "http://localhost:8080");
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "#EXTM3U");
        assert_eq!(
            lines[1],
            "#EXTINF:-1 tvg-id=\"1\" tvg-logo=\"http://logo/1.png\" group-title=\"Src - Other\",Src | Channel 1"
        );
        assert_eq!(lines[2], "http://a/1.m3u8");
    }

    #[test]
    fn test_relay_substitution() {
        let snapshot = RegistrySnapshot::new(vec![
            channel(1, "http://a/direct.m3u8", false),
            channel(2, "http://a/guarded.m3u8", true),
        ]);
        let out = render_playlist(&snapshot, "http://localhost:8080");

        assert!(out.contains("http://a/direct.m3u8"));
        assert!(out.contains("http://localhost:8080/stream/2"));
        assert!(!out.contains("http://a/guarded.m3u8"));
    }

    #[test]
    fn test_parse_render_round_trips_urls() {
        use crate::services::parser::parse_playlist;

        let raw = concat!(
            "#EXTM3U\n",
            "#EXTINF:-1 tvg-logo=\"l1\" group-title=\"g\",Alpha\n",
            "http://s/alpha.m3u8\n",
            "#EXTINF:-1,Beta\n",
            "https://s/beta.m3u8\n",
            "#EXTINF:-1,Broken\n",
            "#EXTINF:-1,Gamma\n",
            "http://s/gamma.m3u8\n",
        );

        let channels: Vec<Channel> = parse_playlist(raw)
            .into_iter()
            .enumerate()
            .map(|(i, p)| Channel {
                id: i as u32 + 1,
                display_name: p.name,
                original_url: p.url,
                logo: p.logo,
                group: p.group_title,
                requires_relay: false,
            })
            .collect();
        let snapshot = RegistrySnapshot::new(channels);
        let out = render_playlist(&snapshot, "http://localhost:8080");

        // Every valid original URL appears exactly once.
        for url in ["http://s/alpha.m3u8", "https://s/beta.m3u8", "http://s/gamma.m3u8"] {
            assert_eq!(out.matches(url).count(), 1, "missing or duplicated {}", url);
        }
    }

    #[test]
    fn test_empty_snapshot_renders_header_only() {
        let out = render_playlist(&RegistrySnapshot::empty(), "http://localhost:8080");
        assert_eq!(out, "#EXTM3U\n");
    }
}
