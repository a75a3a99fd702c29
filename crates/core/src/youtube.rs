use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::{fs, process::Command};

use crate::{
    cache::{find_subtitles_in_cache, get_cache_dir},
    error::{Result, ShporaError},
    services::TranscriptSource,
    types::{Segment, Transcript},
};

/// Subtitle track in YouTube's json3 timedtext format.
#[derive(Debug, Deserialize)]
struct SubtitleTrack {
    #[serde(default)]
    events: Vec<SubtitleEvent>,
}

#[derive(Debug, Deserialize)]
struct SubtitleEvent {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,
    #[serde(default)]
    segs: Vec<SubtitleSeg>,
}

#[derive(Debug, Deserialize)]
struct SubtitleSeg {
    #[serde(default)]
    utf8: String,
}

/// Fetches transcripts from a video's subtitle track using yt-dlp.
///
/// Downloaded tracks are kept in the per-reference working directory and
/// reused on later runs without invoking yt-dlp again.
pub struct SubtitleFetcher {
    languages: String,
}

impl SubtitleFetcher {
    pub fn new() -> Self {
        Self {
            languages: "en.*,en".to_string(),
        }
    }

    /// Subtitle language preference list in yt-dlp syntax, e.g. `"de,en.*"`.
    pub fn with_languages(languages: impl Into<String>) -> Self {
        Self {
            languages: languages.into(),
        }
    }

    async fn download_subtitles(&self, video_ref: &str, cache_dir: &Path) -> Result<PathBuf> {
        let output_template = cache_dir.join("subtitles");
        let output = Command::new("yt-dlp")
            .arg(video_ref)
            .arg("--skip-download")
            .arg("--write-subs")
            .arg("--write-auto-subs")
            .arg("--sub-langs")
            .arg(&self.languages)
            .arg("--sub-format")
            .arg("json3")
            .arg("--no-playlist")
            .arg("-o")
            .arg(&output_template)
            .output()
            .await?;

        if !output.status.success() {
            return Err(ShporaError::TranscriptUnavailable {
                video_ref: video_ref.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        find_subtitles_in_cache(cache_dir).ok_or_else(|| ShporaError::TranscriptUnavailable {
            video_ref: video_ref.to_string(),
            reason: "no subtitle track available".to_string(),
        })
    }
}

impl Default for SubtitleFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptSource for SubtitleFetcher {
    async fn fetch_transcript(&self, video_ref: &str) -> Result<Transcript> {
        let cache_dir = get_cache_dir(video_ref);
        fs::create_dir_all(&cache_dir).await?;

        let subtitle_path = match find_subtitles_in_cache(&cache_dir) {
            Some(cached) => {
                tracing::debug!(video_ref, "reusing downloaded subtitle track");
                cached
            }
            None => self.download_subtitles(video_ref, &cache_dir).await?,
        };

        let json = fs::read_to_string(&subtitle_path).await?;
        let mut transcript = parse_subtitle_track(video_ref, &json)?;
        transcript.language = language_from_path(&subtitle_path);
        Ok(transcript)
    }
}

fn parse_subtitle_track(video_ref: &str, json: &str) -> Result<Transcript> {
    let track: SubtitleTrack =
        serde_json::from_str(json).map_err(|e| ShporaError::TranscriptUnavailable {
            video_ref: video_ref.to_string(),
            reason: format!("malformed subtitle track: {e}"),
        })?;

    let mut text = String::new();
    let mut segments = Vec::new();
    for event in track.events {
        let line: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(line);
        segments.push(Segment {
            start: event.start_ms as f64 / 1000.0,
            end: (event.start_ms + event.duration_ms) as f64 / 1000.0,
            text: line.to_string(),
        });
    }

    if text.is_empty() {
        return Err(ShporaError::TranscriptUnavailable {
            video_ref: video_ref.to_string(),
            reason: "subtitle track is empty".to_string(),
        });
    }

    Ok(Transcript {
        text,
        segments,
        language: "unknown".to_string(),
    })
}

// yt-dlp names tracks `<template>.<lang>.json3`
fn language_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| Path::new(stem).extension())
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}
