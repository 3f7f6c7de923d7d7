pub mod element;
pub mod ffmpeg;
pub mod types;
pub mod video;

pub use element::{MediaBackend, MediaElement};
pub use ffmpeg::FfmpegBackend;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("no source attached")]
    NoSource,
    #[error("ffmpeg/ffprobe not available on PATH")]
    FfmpegUnavailable,
    #[error("probe failed: {0}")]
    Probe(String),
    #[error("no video stream in {0}")]
    NoVideoStream(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
