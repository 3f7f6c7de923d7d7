//! Video decode via ffmpeg subprocess.
//!
//! - `ffprobe` probes metadata (dimensions, fps, duration); for remote sources this is the
//!   first network request
//! - `ffmpeg -f rawvideo -pix_fmt rgba` streams frames through a bounded channel, so a
//!   paused or slow consumer back-pressures the decoder instead of buffering the file
//! - Frames are scaled down to `max_width` to bound per-tile memory

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::Sender;

use super::MediaError;
use super::types::DecodedFrame;

/// Check if ffmpeg/ffprobe are available on the system. Cached per process.
pub fn ffmpeg_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        Command::new("ffprobe")
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}

/// Video metadata from ffprobe.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMeta {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub duration_secs: f64,
}

impl VideoMeta {
    pub fn frame_interval_secs(&self) -> f64 {
        1.0 / self.fps.max(1.0)
    }
}

/// Probe video metadata using ffprobe. `source` may be a path or a URL.
pub fn probe_video(source: &str) -> Result<VideoMeta, MediaError> {
    let output = Command::new("ffprobe")
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()?;

    if !output.status.success() {
        return Err(MediaError::Probe(format!(
            "ffprobe exited with {} for {source}",
            output.status
        )));
    }

    parse_probe_output(&output.stdout, source)
}

fn parse_probe_output(stdout: &[u8], source: &str) -> Result<VideoMeta, MediaError> {
    let json: serde_json::Value = serde_json::from_slice(stdout)
        .map_err(|e| MediaError::Probe(format!("invalid ffprobe JSON: {e}")))?;

    let streams = json["streams"]
        .as_array()
        .ok_or_else(|| MediaError::Probe("no streams in ffprobe output".to_string()))?;

    let video_stream = streams
        .iter()
        .find(|s| s["codec_type"].as_str() == Some("video"))
        .ok_or_else(|| MediaError::NoVideoStream(source.to_string()))?;

    let width = video_stream["width"]
        .as_u64()
        .ok_or_else(|| MediaError::Probe("missing width".to_string()))? as u32;
    let height = video_stream["height"]
        .as_u64()
        .ok_or_else(|| MediaError::Probe("missing height".to_string()))? as u32;

    let fps = parse_frame_rate(
        video_stream["r_frame_rate"]
            .as_str()
            .unwrap_or("30/1"),
    );

    let duration_secs = json["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| {
            video_stream["duration"]
                .as_str()
                .and_then(|s| s.parse::<f64>().ok())
        })
        .unwrap_or(0.0);

    Ok(VideoMeta {
        width,
        height,
        fps,
        duration_secs,
    })
}

fn parse_frame_rate(rate: &str) -> f64 {
    if let Some((num, den)) = rate.split_once('/') {
        let n: f64 = num.parse().unwrap_or(30.0);
        let d: f64 = den.parse().unwrap_or(1.0);
        if d > 0.0 && n > 0.0 { n / d } else { 30.0 }
    } else {
        rate.parse().unwrap_or(30.0)
    }
}

/// Output dimensions: source size capped at `max_width`, aspect preserved, even sides.
pub fn output_size(meta: &VideoMeta, max_width: u32) -> (u32, u32) {
    let width = meta.width.max(2);
    let height = meta.height.max(2);
    let (w, h) = if max_width > 0 && width > max_width {
        let scaled = (height as f64 * max_width as f64 / width as f64).round() as u32;
        (max_width, scaled)
    } else {
        (width, height)
    };
    ((w & !1).max(2), (h & !1).max(2))
}

/// Messages from a decode worker, in order: `Meta`, zero or more `Frame`s, then `Eof`.
/// `Failed` may replace any suffix.
#[derive(Debug)]
pub enum DecodeMsg {
    Meta(VideoMeta),
    Frame(DecodedFrame),
    Eof,
    Failed(String),
}

/// Spawn a worker that probes (unless `known` is given) and streams frames into `tx`.
///
/// The worker exits when `stop` is raised or the receiving side is dropped.
pub fn spawn_decode_worker(
    source: String,
    known: Option<VideoMeta>,
    max_width: u32,
    tx: Sender<DecodeMsg>,
    stop: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("showreel-decode".into())
        .spawn(move || run_decode(&source, known, max_width, &tx, &stop))
}

fn run_decode(
    source: &str,
    known: Option<VideoMeta>,
    max_width: u32,
    tx: &Sender<DecodeMsg>,
    stop: &AtomicBool,
) {
    let meta = match known {
        Some(meta) => meta,
        None => match probe_video(source) {
            Ok(meta) => meta,
            Err(e) => {
                let _ = tx.send(DecodeMsg::Failed(e.to_string()));
                return;
            }
        },
    };
    if stop.load(Ordering::Relaxed) || tx.send(DecodeMsg::Meta(meta.clone())).is_err() {
        return;
    }

    let (width, height) = output_size(&meta, max_width);
    log::debug!(
        "Decoding {source}: {}x{} -> {width}x{height} @ {:.2} fps, {:.1}s",
        meta.width,
        meta.height,
        meta.fps,
        meta.duration_secs
    );

    let mut child = match Command::new("ffmpeg")
        .args(["-i"])
        .arg(source)
        .args([
            "-f", "rawvideo",
            "-pix_fmt", "rgba",
            "-s", &format!("{width}x{height}"),
            "-v", "quiet",
            "pipe:1",
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            let _ = tx.send(DecodeMsg::Failed(format!("failed to spawn ffmpeg: {e}")));
            return;
        }
    };

    let Some(mut stdout) = child.stdout.take() else {
        let _ = tx.send(DecodeMsg::Failed("ffmpeg: no stdout pipe".to_string()));
        let _ = child.kill();
        let _ = child.wait();
        return;
    };

    let frame_size = (width as usize) * (height as usize) * 4;
    let mut buf = vec![0u8; frame_size];
    let mut decoded = 0usize;

    loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        match stdout.read_exact(&mut buf) {
            Ok(()) => {
                decoded += 1;
                let frame = DecodedFrame {
                    data: buf.clone(),
                    width,
                    height,
                };
                if tx.send(DecodeMsg::Frame(frame)).is_err() {
                    break;
                }
            }
            Err(_) => {
                if decoded == 0 {
                    let _ = tx.send(DecodeMsg::Failed("ffmpeg decoded zero frames".to_string()));
                } else {
                    let _ = tx.send(DecodeMsg::Eof);
                }
                break;
            }
        }
    }

    let _ = child.kill();
    let _ = child.wait();
    log::debug!("Decode worker for {source} finished after {decoded} frames");
}
