use crossbeam_channel::Sender;

use crate::viewport::ViewportEvent;

/// A decoded frame ready for texture upload.
#[derive(Clone)]
pub struct DecodedFrame {
    pub data: Vec<u8>, // RGBA8
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for DecodedFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Notifications a media element reports back to its owner.
///
/// These mirror the usual media-element lifecycle: `PlayResolved`/`PlayRejected` answer
/// a `play()` request, the rest are state notifications that may arrive at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    LoadStart,
    /// First frame is decoded and presentable.
    LoadedData,
    CanPlay,
    PlayResolved,
    PlayRejected(String),
    Played,
    Paused,
    Ended,
    Error(String),
}

/// Where an element posts its events. Delivery into a dropped inbox is silently discarded.
#[derive(Debug, Clone)]
pub struct MediaEventSink {
    tx: Sender<ViewportEvent>,
}

impl MediaEventSink {
    pub fn new(tx: Sender<ViewportEvent>) -> Self {
        Self { tx }
    }

    pub fn emit(&self, event: MediaEvent) {
        let _ = self.tx.send(ViewportEvent::Media(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoded_frame_constructable() {
        let frame = DecodedFrame {
            data: vec![255, 0, 0, 255],
            width: 1,
            height: 1,
        };
        assert_eq!(frame.data.len(), 4);
        assert_eq!(frame.width, 1);
        assert!(format!("{frame:?}").contains("bytes: 4"));
    }

    #[test]
    fn sink_wraps_events_for_the_viewport_inbox() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let sink = MediaEventSink::new(tx);
        sink.emit(MediaEvent::LoadStart);
        assert_eq!(
            rx.try_recv().unwrap(),
            ViewportEvent::Media(MediaEvent::LoadStart)
        );
    }

    #[test]
    fn sink_tolerates_closed_inbox() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        MediaEventSink::new(tx).emit(MediaEvent::Ended);
    }
}
