use crate::config::AudioQuality;
use crate::core::send_or_error;
use crate::youtube_downloader::{DownloadProgress, YoutubeDownloader};
use std::ffi::OsString;
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Subprocess backend. yt-dlp (and the ffmpeg it drives) owns extraction and
/// MP3 conversion; we only hand it a destination template and collect the
/// file it reports back.
#[derive(Clone)]
pub struct YtDlpDownloader {
    yt_dlp_command: Arc<OsString>,
    /// yt-dlp's VBR quality scale - 0 is best, 9 is worst.
    audio_quality: &'static str,
}

#[derive(Debug)]
pub enum YtDlpError {
    Spawn(std::io::Error),
    Failed {
        status: Option<i32>,
        stderr: String,
    },
    MissingOutput(PathBuf),
}

impl std::fmt::Display for YtDlpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YtDlpError::Spawn(e) => {
                write!(f, "Unable to run yt-dlp <{e}>. Is it installed and on your PATH?")
            }
            YtDlpError::Failed { status, stderr } => match status {
                Some(code) => write!(f, "yt-dlp exited with status {code}: {}", stderr.trim()),
                None => write!(f, "yt-dlp was killed by a signal: {}", stderr.trim()),
            },
            YtDlpError::MissingOutput(path) => write!(
                f,
                "yt-dlp reported success but {} was not created",
                path.display()
            ),
        }
    }
}

impl std::error::Error for YtDlpError {}

impl YtDlpDownloader {
    pub fn new(yt_dlp_command: String, quality: AudioQuality) -> Self {
        let audio_quality = match quality {
            AudioQuality::Highest => "0",
            AudioQuality::Lowest => "9",
        };
        Self {
            yt_dlp_command: Arc::new(yt_dlp_command.into()),
            audio_quality,
        }
    }
}

impl YoutubeDownloader for YtDlpDownloader {
    type Error = YtDlpError;

    fn download_audio(
        &self,
        video_id: String,
        dest_dir: PathBuf,
        stem: String,
        progress: mpsc::Sender<DownloadProgress>,
    ) -> impl Future<Output = Result<PathBuf, Self::Error>> + Send {
        let command = self.yt_dlp_command.clone();
        let audio_quality = self.audio_quality;
        async move {
            let url = format!("https://www.youtube.com/watch?v={video_id}");
            let template = dest_dir.join(format!("{stem}.%(ext)s"));
            let args = vec![
                "--no-playlist",
                "-q",
                "--no-warnings",
                // Extract the audio track and convert it to MP3
                "-x",
                "--audio-format",
                "mp3",
                "--audio-quality",
                audio_quality,
                // Print the final path of the converted file to stdout
                "--print",
                "after_move:filepath",
                // Force the download even though print mode is used
                "--no-simulate",
                "-o",
            ];
            debug!("Running yt-dlp for {video_id}");
            let output = tokio::process::Command::new(command.as_ref())
                .args(args)
                .arg(&template)
                .arg(&url)
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(YtDlpError::Spawn)?;
            if !output.status.success() {
                return Err(YtDlpError::Failed {
                    status: output.status.code(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                });
            }
            let stdout = String::from_utf8_lossy(&output.stdout);
            let reported = stdout
                .lines()
                .rev()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(PathBuf::from);
            let expected = dest_dir.join(format!("{stem}.mp3"));
            let path = match reported {
                Some(path) if path.exists() => path,
                // Older yt-dlp builds don't know this --print field; fall
                // back to the name the output template implies.
                _ if expected.exists() => expected,
                _ => return Err(YtDlpError::MissingOutput(expected)),
            };
            // No chunk-level progress is available from a quiet subprocess,
            // so report the finished size in one update.
            if let Ok(metadata) = fs_err::tokio::metadata(&path).await {
                send_or_error(
                    &progress,
                    DownloadProgress {
                        bytes_downloaded: metadata.len(),
                        total_size_bytes: Some(metadata.len()),
                    },
                )
                .await;
            }
            Ok(path)
        }
    }
}
