//! One download session - dispatches a parsed link to the configured backend
//! and fans playlist items out over the worker pool.

pub mod downloader;
pub mod tags;

use crate::config::{Config, DownloaderBackend};
use crate::error::Error;
use crate::link::Link;
use crate::metadata::{self, Track};
use crate::youtube_downloader::native::NativeYoutubeDownloader;
use crate::youtube_downloader::yt_dlp::YtDlpDownloader;
use crate::youtube_downloader::YoutubeDownloader;
use crate::{config::AudioQuality, Result};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

pub const MIN_WORKERS: usize = 1;
pub const MAX_WORKERS: usize = 10;

/// Everything the interactive session collected for one run.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub link: Link,
    pub out_dir: PathBuf,
    pub display_name: String,
    pub worker_count: usize,
    pub quality: AudioQuality,
}

/// Outcome of a run, for the end-of-session summary.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub downloaded: usize,
    /// Titles of the tracks that failed.
    pub failed: Vec<String>,
}

pub async fn run_request(request: DownloadRequest, config: &Config) -> Result<RunSummary> {
    match config.backend {
        DownloaderBackend::Native => {
            let backend = NativeYoutubeDownloader::new(request.quality);
            run_with_backend(backend, request).await
        }
        DownloaderBackend::YtDlp => {
            let backend = YtDlpDownloader::new(config.yt_dlp_command.clone(), request.quality);
            run_with_backend(backend, request).await
        }
    }
}

async fn run_with_backend<T>(backend: T, request: DownloadRequest) -> Result<RunSummary>
where
    T: YoutubeDownloader + Clone + Send + Sync + 'static,
    T::Error: Display + Send,
{
    match &request.link {
        Link::Video(id) => {
            let track = metadata::resolve_video(id).await?;
            let result =
                downloader::download_and_tag(&backend, &track, &request.out_dir, &request.display_name)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string());
            let mut summary = RunSummary::default();
            record_result(&mut summary, track, result);
            Ok(summary)
        }
        Link::Playlist(id) => {
            let (name, tracks) = metadata::resolve_playlist(id).await?;
            if tracks.is_empty() {
                return Err(Error::EmptyPlaylist(name));
            }
            info!("Downloading playlist \"{name}\" - {} tracks", tracks.len());
            run_pool(
                backend,
                tracks,
                &request.out_dir,
                &request.display_name,
                request.worker_count,
            )
            .await
        }
    }
}

/// Fixed-size worker pool over playlist items. Each worker runs one
/// download-and-tag job; a failing item is recorded and the rest continue.
async fn run_pool<T>(
    backend: T,
    tracks: Vec<Track>,
    out_dir: &Path,
    display_name: &str,
    worker_count: usize,
) -> Result<RunSummary>
where
    T: YoutubeDownloader + Clone + Send + Sync + 'static,
    T::Error: Display + Send,
{
    let worker_count = worker_count.clamp(MIN_WORKERS, MAX_WORKERS);
    let semaphore = Arc::new(Semaphore::new(worker_count));
    let mut join_set = JoinSet::new();
    for track in tracks {
        let backend = backend.clone();
        let semaphore = Arc::clone(&semaphore);
        let out_dir = out_dir.to_path_buf();
        let display_name = display_name.to_string();
        join_set.spawn(async move {
            // Hold a pool slot for the whole download-and-tag job.
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return (track, Err("worker pool closed".to_string()));
            };
            let result = downloader::download_and_tag(&backend, &track, &out_dir, &display_name)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string());
            (track, result)
        });
    }
    let mut summary = RunSummary::default();
    while let Some(joined) = join_set.join_next().await {
        let (track, result) = joined?;
        record_result(&mut summary, track, result);
    }
    Ok(summary)
}

fn record_result(summary: &mut RunSummary, track: Track, result: std::result::Result<(), String>) {
    match result {
        Ok(()) => summary.downloaded += 1,
        Err(e) => {
            error!("Failed to download \"{}\" <{e}>", track.title);
            summary.failed.push(track.title);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube_downloader::DownloadProgress;
    use id3::TagLike;
    use pretty_assertions::assert_eq;
    use std::future::Future;
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    /// Writes a placeholder file for any id except the ones told to fail.
    #[derive(Clone)]
    struct FakeBackend {
        failing_ids: Vec<&'static str>,
    }

    impl YoutubeDownloader for FakeBackend {
        type Error = std::io::Error;

        fn download_audio(
            &self,
            video_id: String,
            dest_dir: PathBuf,
            stem: String,
            _progress: mpsc::Sender<DownloadProgress>,
        ) -> impl Future<Output = std::result::Result<PathBuf, Self::Error>> + Send {
            let fail = self.failing_ids.contains(&video_id.as_str());
            async move {
                if fail {
                    return Err(std::io::Error::other("stream unavailable"));
                }
                let path = dest_dir.join(format!("{stem}.part"));
                fs_err::tokio::write(&path, [0xff, 0xfb, 0x90, 0x00]).await?;
                Ok(path)
            }
        }
    }

    fn test_tracks() -> Vec<Track> {
        vec![
            Track::new("id_one_aaaa".to_string(), "First Song", "Channel A", Some(1)),
            Track::new("id_two_bbbb".to_string(), "Second Song", "Channel B", Some(2)),
            Track::new("id_three_cc".to_string(), "Third Song", "Channel A", Some(3)),
        ]
    }

    #[tokio::test]
    async fn test_pool_downloads_renames_and_tags_every_track() {
        let dir = tempdir().expect("tempdir should create");
        let backend = FakeBackend { failing_ids: vec![] };
        let summary = run_pool(backend, test_tracks(), dir.path(), "roadtrip", 4)
            .await
            .expect("pool should run");
        assert_eq!(
            summary,
            RunSummary {
                downloaded: 3,
                failed: vec![]
            }
        );
        let expected = dir.path().join("First Song By Channel A ~ roadtrip.mp3");
        assert!(expected.exists());
        let tag = id3::Tag::read_from_path(&expected).expect("tag should read back");
        assert_eq!(tag.title(), Some("First Song"));
        assert_eq!(tag.artist(), Some("Channel A"));
        assert_eq!(tag.album(), Some("YouTube"));
        assert_eq!(tag.track(), Some(1));
    }

    #[tokio::test]
    async fn test_pool_isolates_failing_items() {
        let dir = tempdir().expect("tempdir should create");
        let backend = FakeBackend {
            failing_ids: vec!["id_two_bbbb"],
        };
        let mut summary = run_pool(backend, test_tracks(), dir.path(), "roadtrip", 2)
            .await
            .expect("pool should run");
        summary.failed.sort();
        assert_eq!(summary.downloaded, 2);
        assert_eq!(summary.failed, vec!["Second Song".to_string()]);
        assert!(dir.path().join("First Song By Channel A ~ roadtrip.mp3").exists());
        assert!(dir.path().join("Third Song By Channel A ~ roadtrip.mp3").exists());
        assert!(!dir.path().join("Second Song By Channel B ~ roadtrip.mp3").exists());
    }

    #[tokio::test]
    async fn test_pool_clamps_worker_count() {
        // A zero worker count must not deadlock the pool.
        let dir = tempdir().expect("tempdir should create");
        let backend = FakeBackend { failing_ids: vec![] };
        let summary = run_pool(backend, test_tracks(), dir.path(), "roadtrip", 0)
            .await
            .expect("pool should run");
        assert_eq!(summary.downloaded, 3);
    }
}
