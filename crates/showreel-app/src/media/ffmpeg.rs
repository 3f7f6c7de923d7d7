use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, TryRecvError};

use super::element::{MediaBackend, MediaElement};
use super::types::{DecodedFrame, MediaEvent, MediaEventSink};
use super::video::{self, DecodeMsg, VideoMeta};
use super::MediaError;

/// Frames buffered ahead of the playhead.
const DECODE_QUEUE_DEPTH: usize = 8;

/// Backend that decodes through an ffmpeg subprocess per element.
pub struct FfmpegBackend {
    max_width: u32,
}

impl FfmpegBackend {
    pub fn new(max_width: u32) -> Self {
        if !video::ffmpeg_available() {
            log::warn!("ffprobe not found on PATH; videos will fail to load");
        }
        Self { max_width }
    }
}

impl MediaBackend for FfmpegBackend {
    fn mount(&self, sink: MediaEventSink) -> Box<dyn MediaElement> {
        Box::new(FfmpegElement::new(sink, self.max_width))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

struct Worker {
    rx: Receiver<DecodeMsg>,
    stop: Arc<AtomicBool>,
    _handle: JoinHandle<()>,
}

impl Worker {
    fn stop(self) {
        self.stop.store(true, Ordering::Relaxed);
        // Dropping `rx` unblocks a worker parked on a full queue.
    }
}

pub struct FfmpegElement {
    sink: MediaEventSink,
    max_width: u32,
    source: Option<String>,
    looping: bool,
    meta: Option<VideoMeta>,
    worker: Option<Worker>,
    load_state: LoadState,
    current: Option<DecodedFrame>,
    generation: u64,
    play_pending: bool,
    playing: bool,
    ended: bool,
    next_frame_at: Option<Instant>,
}

impl FfmpegElement {
    pub fn new(sink: MediaEventSink, max_width: u32) -> Self {
        Self {
            sink,
            max_width,
            source: None,
            looping: false,
            meta: None,
            worker: None,
            load_state: LoadState::Idle,
            current: None,
            generation: 0,
            play_pending: false,
            playing: false,
            ended: false,
            next_frame_at: None,
        }
    }

    fn spawn_worker(&mut self, known: Option<VideoMeta>) -> Result<(), MediaError> {
        let Some(source) = self.source.clone() else {
            return Err(MediaError::NoSource);
        };
        self.stop_worker();
        let (tx, rx) = crossbeam_channel::bounded(DECODE_QUEUE_DEPTH);
        let stop = Arc::new(AtomicBool::new(false));
        let handle = video::spawn_decode_worker(source, known, self.max_width, tx, stop.clone())?;
        self.worker = Some(Worker {
            rx,
            stop,
            _handle: handle,
        });
        Ok(())
    }

    fn stop_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.stop();
        }
    }

    fn start_playing(&mut self) {
        self.play_pending = false;
        self.playing = true;
        self.next_frame_at = None;
        if self.ended {
            self.ended = false;
            let known = self.meta.clone();
            if let Err(e) = self.spawn_worker(known) {
                self.fail_playback(&e.to_string());
                return;
            }
        }
        self.sink.emit(MediaEvent::PlayResolved);
        self.sink.emit(MediaEvent::Played);
    }

    fn fail_load(&mut self, reason: String) {
        log::warn!("Media load failed: {reason}");
        self.stop_worker();
        self.load_state = LoadState::Failed(reason.clone());
        self.sink.emit(MediaEvent::Error(reason.clone()));
        if self.play_pending {
            self.play_pending = false;
            self.sink.emit(MediaEvent::PlayRejected(reason));
        }
    }

    fn fail_playback(&mut self, reason: &str) {
        self.playing = false;
        self.play_pending = false;
        self.sink.emit(MediaEvent::PlayRejected(reason.to_string()));
    }

    fn set_frame(&mut self, frame: DecodedFrame) {
        self.current = Some(frame);
        self.generation = self.generation.wrapping_add(1);
    }

    /// Wait for metadata and the first frame.
    fn poll_loading(&mut self) {
        loop {
            let msg = match self.worker.as_ref().map(|w| w.rx.try_recv()) {
                Some(Ok(msg)) => msg,
                Some(Err(TryRecvError::Empty)) | None => return,
                Some(Err(TryRecvError::Disconnected)) => {
                    self.fail_load("decoder exited before the first frame".to_string());
                    return;
                }
            };
            match msg {
                DecodeMsg::Meta(meta) => self.meta = Some(meta),
                DecodeMsg::Frame(frame) => {
                    self.set_frame(frame);
                    self.load_state = LoadState::Ready;
                    self.sink.emit(MediaEvent::LoadedData);
                    self.sink.emit(MediaEvent::CanPlay);
                    if self.play_pending {
                        self.start_playing();
                    }
                    return;
                }
                DecodeMsg::Eof => {
                    self.fail_load("source contains no frames".to_string());
                    return;
                }
                DecodeMsg::Failed(reason) => {
                    self.fail_load(reason);
                    return;
                }
            }
        }
    }

    fn advance_playhead(&mut self, now: Instant) {
        let interval = Duration::from_secs_f64(
            self.meta
                .as_ref()
                .map_or(1.0 / 30.0, VideoMeta::frame_interval_secs),
        );
        let due = *self.next_frame_at.get_or_insert(now + interval);
        if now < due {
            return;
        }
        // Resync after a stall instead of fast-forwarding through the backlog.
        self.next_frame_at = Some(if now.duration_since(due) > interval * 4 {
            now + interval
        } else {
            due + interval
        });

        let msg = match self.worker.as_ref().map(|w| w.rx.try_recv()) {
            Some(Ok(msg)) => msg,
            Some(Err(TryRecvError::Empty)) => return,
            Some(Err(TryRecvError::Disconnected)) | None => DecodeMsg::Eof,
        };
        match msg {
            DecodeMsg::Frame(frame) => self.set_frame(frame),
            DecodeMsg::Meta(meta) => self.meta = Some(meta),
            DecodeMsg::Eof => {
                if self.looping {
                    let known = self.meta.clone();
                    if let Err(e) = self.spawn_worker(known) {
                        log::warn!("Failed to restart looping decode: {e}");
                        self.playing = false;
                        self.sink.emit(MediaEvent::Error(e.to_string()));
                    }
                } else {
                    self.stop_worker();
                    self.playing = false;
                    self.ended = true;
                    self.sink.emit(MediaEvent::Ended);
                }
            }
            DecodeMsg::Failed(reason) => {
                log::warn!("Decode failed mid-stream: {reason}");
                self.stop_worker();
                self.playing = false;
                // The next play starts over with a fresh load.
                self.load_state = LoadState::Idle;
                self.sink.emit(MediaEvent::Error(reason));
            }
        }
    }
}

impl MediaElement for FfmpegElement {
    fn attach_source(&mut self, source: &str) {
        self.source = Some(source.to_string());
    }

    fn load(&mut self) {
        self.stop_worker();
        self.meta = None;
        self.ended = false;
        if self.source.is_none() {
            self.fail_load(MediaError::NoSource.to_string());
            return;
        }
        self.sink.emit(MediaEvent::LoadStart);
        if !video::ffmpeg_available() {
            self.fail_load(MediaError::FfmpegUnavailable.to_string());
            return;
        }
        match self.spawn_worker(None) {
            Ok(()) => self.load_state = LoadState::Loading,
            Err(e) => self.fail_load(e.to_string()),
        }
    }

    fn play(&mut self) {
        match self.load_state.clone() {
            LoadState::Ready => self.start_playing(),
            LoadState::Loading => self.play_pending = true,
            LoadState::Idle => {
                self.play_pending = true;
                self.load();
            }
            LoadState::Failed(reason) => self.fail_playback(&reason),
        }
    }

    fn pause(&mut self) {
        if self.play_pending {
            self.play_pending = false;
            self.sink
                .emit(MediaEvent::PlayRejected("play interrupted by pause".to_string()));
        }
        self.playing = false;
        self.next_frame_at = None;
        self.sink.emit(MediaEvent::Paused);
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn tick(&mut self, now: Instant) {
        match self.load_state {
            LoadState::Loading => self.poll_loading(),
            LoadState::Ready if self.playing => self.advance_playhead(now),
            _ => {}
        }
    }

    fn current_frame(&self) -> Option<&DecodedFrame> {
        self.current.as_ref()
    }

    fn frame_generation(&self) -> u64 {
        self.generation
    }

    fn shutdown(&mut self) {
        self.stop_worker();
        self.playing = false;
        self.play_pending = false;
    }
}

impl Drop for FfmpegElement {
    fn drop(&mut self) {
        self.stop_worker();
    }
}
