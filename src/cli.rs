//! The interactive prompt session.
//!
//! Every pipeline input is gathered here by prompting; the only command line
//! surface is the flags on [`crate::Arguments`].

use crate::app::{self, DownloadRequest, RunSummary, MAX_WORKERS, MIN_WORKERS};
use crate::config::AudioQuality;
use crate::link::Link;
use crate::RuntimeInfo;
use anyhow::Result;
use itertools::Itertools;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};

const BANNER: &str = r"
  ___ _____ ___ ___ ___  ___  ___  _
 / __|_   _| __| _ \ __|/ _ \|   \| |
 \__ \ | | | _||   / _|| (_) | |) | |__
 |___/ |_| |___|_|_\___|\___/|___/|____|
        youtube audio, car stereo ready
";

pub async fn run_interactive_session(rt: RuntimeInfo) -> Result<()> {
    println!("{BANNER}");
    if rt.debug {
        info!("Using the {:?} backend", rt.config.backend);
    }
    let Some(link) = prompt_link()? else {
        info!("Exiting.");
        return Ok(());
    };
    let out_dir = prompt_out_dir()?;
    let display_name = prompt_display_name(&rt.config.default_display_name)?;
    let worker_count = prompt_worker_count(rt.config.default_worker_count)?;
    let quality = prompt_quality(rt.config.default_quality)?;
    let request = DownloadRequest {
        link,
        out_dir,
        display_name,
        worker_count,
        quality,
    };
    let summary = app::run_request(request, &rt.config).await?;
    print_summary(&summary);
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    std::io::stdout().flush()?;
    let mut buf = String::new();
    std::io::stdin().read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}

/// Returns `None` when the user typed quit/exit.
fn prompt_link() -> Result<Option<Link>> {
    loop {
        let input = prompt("Enter a YouTube video or playlist link (or 'quit' to exit): ")?;
        if is_quit(&input) {
            return Ok(None);
        }
        match Link::parse(&input) {
            Ok(link) => return Ok(Some(link)),
            Err(e) => error!("{e}"),
        }
    }
}

fn prompt_out_dir() -> Result<PathBuf> {
    loop {
        let input = prompt("Enter folder path or press enter for current: ")?;
        if input.is_empty() {
            return Ok(std::env::current_dir()?);
        }
        let path = PathBuf::from(&input);
        if path.is_dir() {
            return Ok(path);
        }
        error!("\"{input}\" is not a directory");
    }
}

fn prompt_display_name(default: &str) -> Result<String> {
    let input = prompt(&format!("Enter your name or press enter for \"{default}\": "))?;
    Ok(if input.is_empty() {
        default.to_string()
    } else {
        input
    })
}

fn prompt_worker_count(default: usize) -> Result<usize> {
    loop {
        let input = prompt(&format!(
            "Download threads for playlists ({MIN_WORKERS}-{MAX_WORKERS}) or press enter for {default}: "
        ))?;
        if input.is_empty() {
            return Ok(default);
        }
        match parse_worker_count(&input) {
            Some(count) => return Ok(count),
            None => error!("Thread count must be a number between {MIN_WORKERS} and {MAX_WORKERS}"),
        }
    }
}

fn prompt_quality(default: AudioQuality) -> Result<AudioQuality> {
    loop {
        let input = prompt(&format!(
            "Audio quality [highest/lowest] or press enter for {default}: "
        ))?;
        if input.is_empty() {
            return Ok(default);
        }
        match parse_quality(&input) {
            Some(quality) => return Ok(quality),
            None => error!("Audio quality must be \"highest\" or \"lowest\""),
        }
    }
}

fn is_quit(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "quit" | "exit")
}

fn parse_worker_count(input: &str) -> Option<usize> {
    input
        .parse()
        .ok()
        .filter(|count| (MIN_WORKERS..=MAX_WORKERS).contains(count))
}

fn parse_quality(input: &str) -> Option<AudioQuality> {
    match input.to_lowercase().as_str() {
        "highest" | "high" | "best" => Some(AudioQuality::Highest),
        "lowest" | "low" | "worst" => Some(AudioQuality::Lowest),
        _ => None,
    }
}

fn print_summary(summary: &RunSummary) {
    let total = summary.downloaded + summary.failed.len();
    info!(
        "Download complete. {}/{total} tracks downloaded successfully.",
        summary.downloaded
    );
    if !summary.failed.is_empty() {
        error!("Failed: {}", summary.failed.iter().join(", "));
    }
    info!("Done! Your downloaded files should now be compatible with older car stereos.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_quit() {
        assert!(is_quit("quit"));
        assert!(is_quit("EXIT"));
        assert!(is_quit("Quit"));
        assert!(!is_quit("quitting"));
        assert!(!is_quit(""));
    }

    #[test]
    fn test_parse_worker_count_bounds() {
        assert_eq!(parse_worker_count("1"), Some(1));
        assert_eq!(parse_worker_count("10"), Some(10));
        assert_eq!(parse_worker_count("4"), Some(4));
        assert_eq!(parse_worker_count("0"), None);
        assert_eq!(parse_worker_count("11"), None);
        assert_eq!(parse_worker_count("four"), None);
        assert_eq!(parse_worker_count("-2"), None);
    }

    #[test]
    fn test_parse_quality() {
        assert_eq!(parse_quality("highest"), Some(AudioQuality::Highest));
        assert_eq!(parse_quality("BEST"), Some(AudioQuality::Highest));
        assert_eq!(parse_quality("low"), Some(AudioQuality::Lowest));
        assert_eq!(parse_quality("medium"), None);
    }
}
