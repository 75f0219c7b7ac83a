use crate::config::AudioQuality;
use crate::core::send_or_error;
use crate::youtube_downloader::{DownloadProgress, YoutubeDownloader};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use rusty_ytdl::{
    DownloadOptions, RequestOptions, Video, VideoError, VideoOptions, VideoQuality,
    VideoSearchOptions,
};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

/// How often the download pauses to report progress.
const DL_CHUNK_SIZE: u64 = 100_000;

/// In-process backend. The extraction library hands us the raw audio stream
/// and we write it out chunk by chunk.
#[derive(Clone)]
pub struct NativeYoutubeDownloader {
    options: VideoOptions,
}

#[derive(Debug)]
pub enum NativeDownloadError {
    Extraction(VideoError),
    Io(std::io::Error),
}

impl std::fmt::Display for NativeDownloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NativeDownloadError::Extraction(e) => write!(f, "Extraction error <{e}>"),
            NativeDownloadError::Io(e) => write!(f, "Standard io error <{e}>"),
        }
    }
}

impl std::error::Error for NativeDownloadError {}

impl From<VideoError> for NativeDownloadError {
    fn from(value: VideoError) -> Self {
        NativeDownloadError::Extraction(value)
    }
}
impl From<std::io::Error> for NativeDownloadError {
    fn from(value: std::io::Error) -> Self {
        NativeDownloadError::Io(value)
    }
}

impl NativeYoutubeDownloader {
    pub fn new(quality: AudioQuality) -> Self {
        let quality = match quality {
            AudioQuality::Highest => VideoQuality::HighestAudio,
            AudioQuality::Lowest => VideoQuality::LowestAudio,
        };
        let options = VideoOptions {
            quality,
            filter: VideoSearchOptions::Audio,
            download_options: DownloadOptions {
                dl_chunk_size: Some(DL_CHUNK_SIZE),
            },
            request_options: RequestOptions::default(),
        };
        Self { options }
    }
}

impl YoutubeDownloader for NativeYoutubeDownloader {
    type Error = NativeDownloadError;

    fn download_audio(
        &self,
        video_id: String,
        dest_dir: PathBuf,
        stem: String,
        progress: mpsc::Sender<DownloadProgress>,
    ) -> impl Future<Output = Result<PathBuf, Self::Error>> + Send {
        let options = self.options.clone();
        async move {
            let path = dest_dir.join(format!("{stem}.part"));
            match download_to_file(options, video_id, &path, progress).await {
                Ok(()) => Ok(path),
                Err(e) => {
                    // Don't leave half a track behind.
                    let _ = fs_err::tokio::remove_file(&path).await;
                    Err(e)
                }
            }
        }
    }
}

async fn download_to_file(
    options: VideoOptions,
    video_id: String,
    path: &Path,
    progress: mpsc::Sender<DownloadProgress>,
) -> Result<(), NativeDownloadError> {
    let video = Video::new_with_options(video_id, options)?;
    let stream = video.stream().await?;
    let total_size_bytes = stream.content_length() as u64;
    let mut file = fs_err::tokio::File::create(path).await?;
    let mut stream = std::pin::pin!(into_futures_stream(stream));
    let mut bytes_downloaded = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        bytes_downloaded += chunk.len() as u64;
        send_or_error(
            &progress,
            DownloadProgress {
                bytes_downloaded,
                total_size_bytes: Some(total_size_bytes),
            },
        )
        .await;
    }
    file.flush().await?;
    Ok(())
}

/// Helper function to use rusty_ytdl::stream::Stream as if it were a
/// futures::Stream.
fn into_futures_stream(
    youtube_stream: Box<dyn rusty_ytdl::stream::Stream + Send>,
) -> impl Stream<Item = Result<Bytes, VideoError>> + Send {
    // Second value of initialisation tuple represents if the previous
    // iteration of the stream errored. If so, stream will close, as no future
    // iterations of the stream are expected to return Ok.
    futures::stream::unfold((youtube_stream, false), |(state, errored)| async move {
        if errored {
            return None;
        };
        let chunk = state.chunk().await;
        match chunk {
            // Return error value on this iteration, on the next iteration
            // return None.
            Err(e) => Some((Err(e), (state, true))),
            // Happy path
            Ok(Some(bytes)) => Some((Ok(bytes), (state, false))),
            // Stream has closed.
            Ok(None) => None,
        }
    })
}
