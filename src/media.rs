use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::config::Config;
use crate::types::BirdRecord;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Failed to run transcoder: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodeJob {
    Image {
        source: String,
        dest: PathBuf,
        quality: u32,
    },
    Audio {
        source: String,
        dest: PathBuf,
        bitrate: String,
        max_seconds: u32,
    },
}

impl TranscodeJob {
    pub fn dest(&self) -> &Path {
        match self {
            TranscodeJob::Image { dest, .. } | TranscodeJob::Audio { dest, .. } => dest,
        }
    }
}

/// Fetches a remote media file and writes a compressed copy to the job's
/// destination.
#[allow(async_fn_in_trait)]
pub trait Transcoder {
    async fn transcode(&self, job: &TranscodeJob) -> Result<(), MediaError>;
}

#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(job: &TranscodeJob) -> Vec<OsString> {
        match job {
            TranscodeJob::Image {
                source,
                dest,
                quality,
            } => vec![
                "-i".into(),
                source.into(),
                "-q:v".into(),
                quality.to_string().into(),
                dest.into(),
            ],
            TranscodeJob::Audio {
                source,
                dest,
                bitrate,
                max_seconds,
            } => vec![
                "-i".into(),
                source.into(),
                "-b:a".into(),
                bitrate.into(),
                "-t".into(),
                max_seconds.to_string().into(),
                dest.into(),
            ],
        }
    }
}

impl Transcoder for Ffmpeg {
    async fn transcode(&self, job: &TranscodeJob) -> Result<(), MediaError> {
        let status = Command::new(&self.program)
            .args(Self::args(job))
            .stdin(Stdio::null())
            .status()
            .await?;
        log::debug!(
            "{} exited with {} for {}",
            self.program.display(),
            status,
            job.dest().display()
        );
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadReport {
    pub submitted: usize,
    pub skipped: usize,
}

/// Downloads each bird's media into the study tool's media folder.
///
/// Files already present in the folder are never fetched again, so running
/// the same record twice only transcodes what the first run failed to write.
pub struct MediaDownloader<T> {
    transcoder: T,
    media_dir: PathBuf,
    max_images: usize,
    image_quality: u32,
    audio_bitrate: String,
    audio_max_seconds: u32,
}

impl<T: Transcoder> MediaDownloader<T> {
    pub fn new(config: &Config, transcoder: T) -> Self {
        Self {
            transcoder,
            media_dir: config.media_dir.clone(),
            max_images: config.max_images,
            image_quality: config.image_quality,
            audio_bitrate: config.audio_bitrate.clone(),
            audio_max_seconds: config.audio_max_seconds,
        }
    }

    pub fn jobs(&self, record: &BirdRecord) -> Vec<TranscodeJob> {
        let mut jobs: Vec<TranscodeJob> = record
            .image_urls
            .iter()
            .take(self.max_images)
            .enumerate()
            .map(|(i, url)| TranscodeJob::Image {
                source: url.clone(),
                dest: self.media_dir.join(record.image_filename(i + 1)),
                quality: self.image_quality,
            })
            .collect();

        if let Some(audio_url) = &record.audio_url {
            jobs.push(TranscodeJob::Audio {
                source: audio_url.clone(),
                dest: self.media_dir.join(record.audio_filename()),
                bitrate: self.audio_bitrate.clone(),
                max_seconds: self.audio_max_seconds,
            });
        }

        jobs
    }

    /// Never fails: a media folder that cannot be created only costs this
    /// record its media, and each job's failure is logged by the transcoder.
    pub async fn download(&self, record: &BirdRecord) -> DownloadReport {
        if let Err(e) = tokio::fs::create_dir_all(&self.media_dir).await {
            log::warn!("Failed to create {}: {}", self.media_dir.display(), e);
        }

        let mut report = DownloadReport::default();
        for job in self.jobs(record) {
            if tokio::fs::try_exists(job.dest()).await.unwrap_or(false) {
                log::info!("Found file {}", job.dest().display());
                report.skipped += 1;
                continue;
            }

            if let Err(e) = self.transcoder.transcode(&job).await {
                log::warn!("Failed to transcode {}: {}", job.dest().display(), e);
            }
            report.submitted += 1;
        }

        report
    }
}
