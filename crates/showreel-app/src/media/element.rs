use std::time::Instant;

use super::types::{DecodedFrame, MediaEventSink};

/// A playable-media primitive.
///
/// Every request returns immediately; outcomes arrive later through the
/// [`MediaEventSink`] the element was mounted with. A freshly mounted element holds no
/// source and must not touch the network until `load` is called.
pub trait MediaElement {
    fn attach_source(&mut self, source: &str);
    /// Start fetching the attached source. Reports `LoadStart`, then `LoadedData` or `Error`.
    fn load(&mut self);
    /// Answered with exactly one `PlayResolved` or `PlayRejected`.
    fn play(&mut self);
    /// Confirmed with `Paused`.
    fn pause(&mut self);
    fn set_looping(&mut self, looping: bool);

    /// Advance playback clocks and drain worker output. Called once per UI frame.
    fn tick(&mut self, _now: Instant) {}

    fn current_frame(&self) -> Option<&DecodedFrame> {
        None
    }

    /// Bumped whenever `current_frame` changes, so texture uploads can be skipped.
    fn frame_generation(&self) -> u64 {
        0
    }

    /// Stop all background work. Nothing is emitted afterwards.
    fn shutdown(&mut self) {}
}

/// Creates media elements. Mounting is cheap and performs no I/O.
pub trait MediaBackend {
    fn mount(&self, sink: MediaEventSink) -> Box<dyn MediaElement>;
}
