use std::path::PathBuf;

/// Anki's media folder for the default profile, relative to `$HOME`.
pub const ANKI_MEDIA_DIR: &str = ".local/share/Anki2/User 1/collection.media";

/// Pages known to break extraction.
pub const DEFAULT_SKIP_URLS: &[&str] =
    &["https://www.rspb.org.uk/birds-and-wildlife/slavonian-grebe"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub catalog_path: PathBuf,
    pub media_dir: PathBuf,
    pub output_path: PathBuf,
    pub max_images: usize,
    /// ffmpeg `-q:v` value for JPEG output; higher is smaller.
    pub image_quality: u32,
    pub audio_bitrate: String,
    pub audio_max_seconds: u32,
    pub ffmpeg_path: PathBuf,
    pub skip_urls: Vec<String>,
}

impl Config {
    pub fn default_media_dir() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_default()
            .join(ANKI_MEDIA_DIR)
    }

    pub fn should_skip(&self, url: &str) -> bool {
        self.skip_urls.iter().any(|s| s == url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: crate::BASE_URL.to_string(),
            catalog_path: PathBuf::from("birdurls.txt"),
            media_dir: Self::default_media_dir(),
            output_path: PathBuf::from("birds.csv"),
            max_images: 5,
            image_quality: 20,
            audio_bitrate: "32k".to_string(),
            audio_max_seconds: 10,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            skip_urls: DEFAULT_SKIP_URLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
