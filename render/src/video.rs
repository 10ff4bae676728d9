//! Video playback selection and embed URL rewriting.

use std::sync::OnceLock;

use folio_model::{VideoBlock, VideoSource};
use regex::Regex;

/// Player base for embeddable videos.
pub const EMBED_BASE: &str = "https://www.youtube.com/embed/";

fn hosting_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"youtube\.com|youtu\.be").ok())
        .as_ref()
}

fn short_link() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"youtu\.be/([^?&/#]+)").ok())
        .as_ref()
}

fn long_link() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"[?&]v=([^&#]+)").ok())
        .as_ref()
}

/// Returns true when the block plays through an embedded player: either its
/// source says so or its URL points at the hosting service.
#[must_use]
pub fn is_embedded(block: &VideoBlock) -> bool {
    block.source == VideoSource::Embed
        || hosting_pattern().is_some_and(|re| re.is_match(&block.url))
}

/// Rewrites a hosted-video page URL into its embeddable form.
///
/// Handles short links (`youtu.be/{id}`) and long links (`watch?v={id}`).
/// URLs already in embed form, or without a recognizable identifier, are
/// returned unchanged.
#[must_use]
pub fn embed_url(url: &str) -> String {
    if url.contains("embed/") {
        return url.to_string();
    }
    let id = [short_link(), long_link()]
        .into_iter()
        .flatten()
        .find_map(|re| re.captures(url).and_then(|c| c.get(1)))
        .map(|m| m.as_str());
    match id {
        Some(id) => format!("{EMBED_BASE}{id}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_links_embed() {
        assert_eq!(
            embed_url("https://youtu.be/dQw4w9WgXcQ?t=42"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=x"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            embed_url("https://www.youtube.com/embed/abc"),
            "https://www.youtube.com/embed/abc"
        );
        assert_eq!(embed_url("https://vimeo.com/1"), "https://vimeo.com/1");
    }

    #[test]
    fn hosting_url_overrides_file_source() {
        let block = VideoBlock {
            url: "https://youtu.be/abc".into(),
            ..VideoBlock::default()
        };
        assert!(is_embedded(&block));
        let file = VideoBlock {
            url: "/uploads/reel.mp4".into(),
            ..VideoBlock::default()
        };
        assert!(!is_embedded(&file));
    }
}
