//! ID3 tagging for finished downloads.
//!
//! Tags are written as ID3v2.3 - the newest version the stereos this tool
//! targets reliably read - rather than the library default of v2.4.

use crate::metadata::Track;
use id3::{Tag, TagLike, Version};
use std::path::Path;
use tracing::debug;

/// Album and genre are fixed so every download lands under one browse node
/// on the head unit.
const ALBUM: &str = "YouTube";
const GENRE: &str = "YouTube";

pub fn write_tags(path: &Path, track: &Track) -> Result<(), id3::Error> {
    let mut tag = Tag::new();
    tag.set_title(track.title.as_str());
    tag.set_artist(track.channel.as_str());
    tag.set_album(ALBUM);
    tag.set_genre(GENRE);
    if let Some(track_number) = track.track_number {
        tag.set_track(track_number);
    }
    tag.write_to_path(path, Version::Id3v23)?;
    debug!("Tagged {}", path.display());
    Ok(())
}
