//! Track metadata resolution via the extraction library.

use crate::filename;
use crate::link::{PlaylistId, VideoId};
use crate::Result;
use rusty_ytdl::search::Playlist;
use rusty_ytdl::Video;
use tracing::debug;

/// Everything needed to download, name and tag one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub video_id: String,
    /// Sanitized full title. Used for the ID3 title and, truncated, for the
    /// filename.
    pub title: String,
    /// Sanitized channel name. Used as the ID3 artist.
    pub channel: String,
    /// 1-based position within the playlist, if any.
    pub track_number: Option<u32>,
}

impl Track {
    pub fn new(
        video_id: String,
        raw_title: &str,
        raw_channel: &str,
        track_number: Option<u32>,
    ) -> Self {
        let mut title = filename::sanitize(raw_title);
        if title.is_empty() {
            // A title made entirely of stripped characters still needs a name.
            title = video_id.clone();
        }
        let channel = filename::sanitize(raw_channel);
        Self {
            video_id,
            title,
            channel,
            track_number,
        }
    }
}

/// Fetch title and channel for a single video.
pub async fn resolve_video(id: &VideoId) -> Result<Track> {
    let video = Video::new(id.0.as_str())?;
    let details = video.get_basic_info().await?.video_details;
    let channel = details
        .author
        .map(|author| author.name)
        .filter(|name| !name.is_empty())
        .unwrap_or(details.owner_channel_name);
    debug!("Resolved video {} - \"{}\"", details.video_id, details.title);
    Ok(Track::new(details.video_id, &details.title, &channel, None))
}

/// Fetch the ordered contents of a playlist. Item order defines the ID3 track
/// numbers.
pub async fn resolve_playlist(id: &PlaylistId) -> Result<(String, Vec<Track>)> {
    let playlist = Playlist::get(id.0.as_str(), None).await?;
    let tracks = playlist
        .videos
        .into_iter()
        .enumerate()
        .map(|(idx, video)| {
            Track::new(
                video.id,
                &video.title,
                &video.channel.name,
                Some(idx as u32 + 1),
            )
        })
        .collect::<Vec<_>>();
    debug!(
        "Resolved playlist \"{}\" with {} videos",
        playlist.name,
        tracks.len()
    );
    Ok((playlist.name, tracks))
}
