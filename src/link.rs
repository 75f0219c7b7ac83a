//! Parsing and classification of YouTube links.
//!
//! Links are fully validated here, before any network call is made.

use std::fmt::Display;
use url::Url;

const LONG_HOSTS: &[&str] = &[
    "www.youtube.com",
    "youtube.com",
    "m.youtube.com",
    "music.youtube.com",
];
const SHORT_HOST: &str = "youtu.be";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    Video(VideoId),
    Playlist(PlaylistId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistId(pub String);

#[derive(Debug)]
pub enum LinkError {
    NotAUrl(String),
    UnsupportedHost(String),
    NoId(String),
}

impl Display for LinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkError::NotAUrl(s) => write!(f, "\"{s}\" is not a valid link"),
            LinkError::UnsupportedHost(s) => write!(f, "\"{s}\" is not a YouTube link"),
            LinkError::NoId(s) => {
                write!(f, "Could not find a video or playlist id in \"{s}\"")
            }
        }
    }
}

impl std::error::Error for LinkError {}

impl Link {
    pub fn parse(input: &str) -> Result<Link, LinkError> {
        let trimmed = input.trim();
        let url = Url::parse(trimmed).map_err(|_| LinkError::NotAUrl(trimmed.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LinkError::NotAUrl(trimmed.to_string()));
        }
        let host = url
            .host_str()
            .ok_or_else(|| LinkError::NotAUrl(trimmed.to_string()))?;
        if host == SHORT_HOST {
            let id = url.path().trim_matches('/');
            return parse_id(id, trimmed).map(|id| Link::Video(VideoId(id)));
        }
        if !LONG_HOSTS.contains(&host) {
            return Err(LinkError::UnsupportedHost(trimmed.to_string()));
        }
        // A `list` parameter always wins - watch links that carry one are
        // treated as the whole playlist, matching how the original site
        // presents them.
        if let Some(list) = query_param(&url, "list") {
            return parse_id(&list, trimmed).map(|id| Link::Playlist(PlaylistId(id)));
        }
        if url.path() == "/watch" {
            let v = query_param(&url, "v").unwrap_or_default();
            return parse_id(&v, trimmed).map(|id| Link::Video(VideoId(id)));
        }
        if let Some(id) = url
            .path()
            .strip_prefix("/shorts/")
            .or_else(|| url.path().strip_prefix("/embed/"))
        {
            let id = id.trim_matches('/');
            return parse_id(id, trimmed).map(|id| Link::Video(VideoId(id)));
        }
        Err(LinkError::NoId(trimmed.to_string()))
    }
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn parse_id(id: &str, original_input: &str) -> Result<String, LinkError> {
    if !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Ok(id.to_string())
    } else {
        Err(LinkError::NoId(original_input.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn video(id: &str) -> Link {
        Link::Video(VideoId(id.to_string()))
    }
    fn playlist(id: &str) -> Link {
        Link::Playlist(PlaylistId(id.to_string()))
    }

    #[test]
    fn test_watch_link() {
        assert_eq!(
            Link::parse("https://www.youtube.com/watch?v=dQw4w9WgXcQ").expect("should parse"),
            video("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_short_link() {
        assert_eq!(
            Link::parse("https://youtu.be/dQw4w9WgXcQ").expect("should parse"),
            video("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_shorts_and_embed_links() {
        assert_eq!(
            Link::parse("https://youtube.com/shorts/abc123XYZ_-").expect("should parse"),
            video("abc123XYZ_-")
        );
        assert_eq!(
            Link::parse("https://www.youtube.com/embed/dQw4w9WgXcQ").expect("should parse"),
            video("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_playlist_link() {
        assert_eq!(
            Link::parse("https://www.youtube.com/playlist?list=PL1234abcd").expect("should parse"),
            playlist("PL1234abcd")
        );
    }

    #[test]
    fn test_watch_link_with_list_param_is_a_playlist() {
        assert_eq!(
            Link::parse("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL1234abcd")
                .expect("should parse"),
            playlist("PL1234abcd")
        );
    }

    #[test]
    fn test_music_host() {
        assert_eq!(
            Link::parse("https://music.youtube.com/watch?v=dQw4w9WgXcQ").expect("should parse"),
            video("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(
            Link::parse("  https://youtu.be/dQw4w9WgXcQ \n").expect("should parse"),
            video("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_not_a_url() {
        assert!(matches!(Link::parse("quit"), Err(LinkError::NotAUrl(_))));
        assert!(matches!(Link::parse(""), Err(LinkError::NotAUrl(_))));
        assert!(matches!(
            Link::parse("ftp://youtube.com/watch?v=dQw4w9WgXcQ"),
            Err(LinkError::NotAUrl(_))
        ));
    }

    #[test]
    fn test_unsupported_host() {
        assert!(matches!(
            Link::parse("https://vimeo.com/123456"),
            Err(LinkError::UnsupportedHost(_))
        ));
    }

    #[test]
    fn test_missing_or_malformed_ids() {
        assert!(matches!(
            Link::parse("https://www.youtube.com/watch"),
            Err(LinkError::NoId(_))
        ));
        assert!(matches!(
            Link::parse("https://www.youtube.com/playlist"),
            Err(LinkError::NoId(_))
        ));
        assert!(matches!(
            Link::parse("https://www.youtube.com/watch?v=bad%20id"),
            Err(LinkError::NoId(_))
        ));
        assert!(matches!(
            Link::parse("https://www.youtube.com/feed/library"),
            Err(LinkError::NoId(_))
        ));
    }
}
