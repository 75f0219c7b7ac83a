//! Filename sanitization and output naming for downloaded tracks.

/// Maximum length in characters of the title component of a filename.
pub const TITLE_MAX_CHARS: usize = 20;

/// Strip everything that is not ASCII alphanumeric or a space.
///
/// This is deliberately aggressive. FAT-formatted USB sticks and the text
/// displays on older head units cope badly with punctuation, control
/// characters and non-ASCII text, so the whole lot goes.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Truncate a title to at most [`TITLE_MAX_CHARS`] characters, never cutting
/// mid-codepoint.
pub fn truncate_title(title: &str) -> &str {
    match title.char_indices().nth(TITLE_MAX_CHARS) {
        Some((idx, _)) => title[..idx].trim_end(),
        None => title,
    }
}

/// Compose the on-disk filename for a track.
pub fn track_filename(title: &str, channel: &str, display_name: &str) -> String {
    format!(
        "{} By {} ~ {}.mp3",
        truncate_title(title),
        channel,
        display_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_removes_path_breaking_characters() {
        assert_eq!(sanitize("AC/DC: Back <In> Black?"), "ACDC Back In Black");
        assert_eq!(sanitize("a\\b|c*d\"e"), "abcde");
    }

    #[test]
    fn test_sanitize_removes_punctuation_and_control_characters() {
        assert_eq!(sanitize("Hey, Jude! (Remastered)"), "Hey Jude Remastered");
        assert_eq!(sanitize("tab\there\x07bell"), "tabherebell");
    }

    #[test]
    fn test_sanitize_removes_non_ascii() {
        assert_eq!(sanitize("Füür Elise — ピアノ"), "Fr Elise");
    }

    #[test]
    fn test_sanitize_trims_whitespace() {
        assert_eq!(sanitize("  spaced out  "), "spaced out");
        assert_eq!(sanitize("!!!"), "");
    }

    #[test]
    fn test_truncate_title_respects_max_length() {
        assert_eq!(truncate_title("short title"), "short title");
        assert_eq!(
            truncate_title("this title is much much too long for a display"),
            "this title is much m"
        );
        assert_eq!(truncate_title("exactly twenty chars"), "exactly twenty chars");
    }

    #[test]
    fn test_truncate_title_trims_trailing_space_at_the_cut() {
        assert_eq!(truncate_title("nineteen characters and more"), "nineteen characters");
    }

    #[test]
    fn test_track_filename_format() {
        assert_eq!(
            track_filename("Never Gonna Give You Up", "Rick Astley", "roadtrip"),
            "Never Gonna Give You By Rick Astley ~ roadtrip.mp3"
        );
    }
}
