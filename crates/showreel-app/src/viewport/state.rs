//! Playback state record for a single viewport.
//!
//! `ViewportState::apply` is a pure transition function: it folds one event into the
//! flags and returns the platform commands the owner must execute. Nothing here touches
//! the media element or the fullscreen surface directly, which keeps every transition
//! testable without a window.

use crate::media::types::MediaEvent;

use super::ViewportId;

/// Coarse phase derived from the flags, for presentation and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotEntered,
    Entered,
    Loading,
    Playing,
    Paused,
    Errored,
}

/// Everything that can happen to a viewport.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportEvent {
    EnteredProximity,
    Activate,
    ToggleFullscreen,
    /// The platform settled a fullscreen change. `element` is whoever owns it now.
    FullscreenChanged { element: Option<ViewportId> },
    Media(MediaEvent),
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StopObserving,
    MountElement,
    AttachSource,
    Load,
    Play,
    Pause,
    RequestFullscreen,
    ExitFullscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Play,
    Pause,
}

#[derive(Debug, Clone)]
pub struct ViewportState {
    id: ViewportId,
    has_entered_viewport: bool,
    is_source_attached: bool,
    is_loaded: bool,
    is_playing: bool,
    is_loading: bool,
    is_fullscreen: bool,
    last_error: Option<String>,
    /// At most one play/pause request is outstanding.
    in_flight: Option<Request>,
    /// Latest user intent; reconciled when the outstanding request settles.
    wants_playing: bool,
    torn_down: bool,
}

impl ViewportState {
    pub fn new(id: ViewportId) -> Self {
        Self {
            id,
            has_entered_viewport: false,
            is_source_attached: false,
            is_loaded: false,
            is_playing: false,
            is_loading: false,
            is_fullscreen: false,
            last_error: None,
            in_flight: None,
            wants_playing: false,
            torn_down: false,
        }
    }

    pub fn has_entered_viewport(&self) -> bool {
        self.has_entered_viewport
    }

    pub fn is_source_attached(&self) -> bool {
        self.is_source_attached
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True while a play or pause request awaits platform confirmation.
    pub fn has_request_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn phase(&self) -> Phase {
        if !self.has_entered_viewport() {
            Phase::NotEntered
        } else if self.is_loading {
            Phase::Loading
        } else if self.is_playing {
            Phase::Playing
        } else if self.last_error.is_some() {
            Phase::Errored
        } else if self.is_source_attached() {
            Phase::Paused
        } else {
            Phase::Entered
        }
    }

    pub fn apply(&mut self, event: &ViewportEvent) -> Vec<Command> {
        if self.torn_down {
            return Vec::new();
        }
        match event {
            ViewportEvent::EnteredProximity => self.enter_proximity(),
            ViewportEvent::Activate => self.activate(),
            ViewportEvent::ToggleFullscreen => {
                // The request may be denied; the flag only moves on FullscreenChanged.
                if self.is_fullscreen {
                    vec![Command::ExitFullscreen]
                } else {
                    vec![Command::RequestFullscreen]
                }
            }
            ViewportEvent::FullscreenChanged { element } => {
                self.is_fullscreen = *element == Some(self.id);
                Vec::new()
            }
            ViewportEvent::Media(event) => self.media_event(event),
        }
    }

    /// Final transition. Every later event is ignored.
    pub fn teardown(&mut self) -> Vec<Command> {
        if self.torn_down {
            return Vec::new();
        }
        self.torn_down = true;

        let mut commands = Vec::new();
        if !self.has_entered_viewport {
            commands.push(Command::StopObserving);
        }
        if self.is_playing || self.in_flight == Some(Request::Play) {
            commands.push(Command::Pause);
        }
        if self.is_fullscreen {
            commands.push(Command::ExitFullscreen);
        }
        self.in_flight = None;
        self.wants_playing = false;
        commands
    }

    fn enter_proximity(&mut self) -> Vec<Command> {
        if self.has_entered_viewport {
            return Vec::new();
        }
        self.has_entered_viewport = true;
        log::debug!("viewport {} entered proximity", self.id);
        vec![Command::StopObserving, Command::MountElement]
    }

    fn activate(&mut self) -> Vec<Command> {
        if !self.has_entered_viewport {
            log::debug!("viewport {} activated before mounting; ignored", self.id);
            return Vec::new();
        }
        if self.in_flight.is_some() {
            self.wants_playing = !self.wants_playing;
            log::debug!(
                "viewport {} request in flight; intent now {}",
                self.id,
                if self.wants_playing { "play" } else { "pause" }
            );
            return Vec::new();
        }
        if self.is_playing {
            self.wants_playing = false;
            self.in_flight = Some(Request::Pause);
            return vec![Command::Pause];
        }
        self.wants_playing = true;
        self.start_playback()
    }

    fn start_playback(&mut self) -> Vec<Command> {
        let mut commands = Vec::with_capacity(3);
        if !self.is_loaded {
            self.is_loading = true;
            if !self.is_source_attached {
                self.is_source_attached = true;
                commands.push(Command::AttachSource);
            }
            commands.push(Command::Load);
        }
        self.last_error = None;
        self.in_flight = Some(Request::Play);
        commands.push(Command::Play);
        commands
    }

    /// Bring the platform in line with the latest intent once nothing is outstanding.
    fn reconcile(&mut self) -> Vec<Command> {
        if self.in_flight.is_some() {
            return Vec::new();
        }
        match (self.wants_playing, self.is_playing) {
            (true, false) => self.start_playback(),
            (false, true) => {
                self.in_flight = Some(Request::Pause);
                vec![Command::Pause]
            }
            _ => Vec::new(),
        }
    }

    fn media_event(&mut self, event: &MediaEvent) -> Vec<Command> {
        match event {
            MediaEvent::LoadStart => {
                if self.is_source_attached && !self.is_loaded {
                    self.is_loading = true;
                }
                Vec::new()
            }
            MediaEvent::LoadedData => {
                self.is_loaded = true;
                self.is_loading = false;
                Vec::new()
            }
            MediaEvent::CanPlay => {
                self.is_loading = false;
                Vec::new()
            }
            MediaEvent::PlayResolved => {
                if self.in_flight != Some(Request::Play) {
                    log::debug!("viewport {} ignoring stale play resolution", self.id);
                    return Vec::new();
                }
                self.in_flight = None;
                self.is_playing = true;
                self.is_loading = false;
                self.is_loaded = true;
                self.reconcile()
            }
            MediaEvent::PlayRejected(reason) => {
                if self.in_flight == Some(Request::Play) {
                    self.in_flight = None;
                }
                self.fail(reason);
                Vec::new()
            }
            MediaEvent::Played => {
                self.is_playing = true;
                Vec::new()
            }
            MediaEvent::Paused => {
                self.is_playing = false;
                if self.in_flight == Some(Request::Pause) {
                    self.in_flight = None;
                    return self.reconcile();
                }
                Vec::new()
            }
            MediaEvent::Ended => {
                self.is_playing = false;
                self.wants_playing = false;
                // Ended settles whatever request was outstanding.
                self.in_flight = None;
                Vec::new()
            }
            MediaEvent::Error(reason) => {
                self.in_flight = None;
                // Failed elements reload from scratch on the next play.
                self.is_loaded = false;
                self.fail(reason);
                Vec::new()
            }
        }
    }

    fn fail(&mut self, reason: &str) {
        log::warn!("viewport {} playback failed: {reason}", self.id);
        self.is_loading = false;
        self.is_playing = false;
        self.wants_playing = false;
        self.last_error = Some(reason.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entered() -> ViewportState {
        let mut state = ViewportState::new(ViewportId(1));
        state.apply(&ViewportEvent::EnteredProximity);
        state
    }

    fn media(state: &mut ViewportState, event: MediaEvent) -> Vec<Command> {
        state.apply(&ViewportEvent::Media(event))
    }

    #[test]
    fn starts_not_entered() {
        let state = ViewportState::new(ViewportId(1));
        assert_eq!(state.phase(), Phase::NotEntered);
        assert!(!state.has_entered_viewport());
        assert!(!state.is_source_attached());
    }

    #[test]
    fn proximity_mounts_once() {
        let mut state = ViewportState::new(ViewportId(1));
        let first = state.apply(&ViewportEvent::EnteredProximity);
        assert_eq!(first, vec![Command::StopObserving, Command::MountElement]);
        assert!(state.apply(&ViewportEvent::EnteredProximity).is_empty());
        assert!(state.has_entered_viewport());
        assert_eq!(state.phase(), Phase::Entered);
    }

    #[test]
    fn activate_before_entering_is_ignored() {
        let mut state = ViewportState::new(ViewportId(1));
        assert!(state.apply(&ViewportEvent::Activate).is_empty());
        assert!(!state.is_source_attached());
        assert!(!state.is_loading());
    }

    #[test]
    fn first_activate_attaches_loads_and_plays() {
        let mut state = entered();
        let commands = state.apply(&ViewportEvent::Activate);
        assert_eq!(commands, vec![Command::AttachSource, Command::Load, Command::Play]);
        assert!(state.is_loading());
        assert!(state.is_source_attached());
        assert_eq!(state.phase(), Phase::Loading);
    }

    #[test]
    fn first_frame_then_resolution_plays() {
        let mut state = entered();
        state.apply(&ViewportEvent::Activate);
        media(&mut state, MediaEvent::LoadedData);
        assert!(!state.is_loading());
        assert!(state.is_loaded());
        assert!(media(&mut state, MediaEvent::PlayResolved).is_empty());
        assert!(state.is_playing());
        assert_eq!(state.phase(), Phase::Playing);
    }

    #[test]
    fn click_while_loading_queues_intent_without_new_requests() {
        let mut state = entered();
        state.apply(&ViewportEvent::Activate);
        assert!(state.apply(&ViewportEvent::Activate).is_empty());
        assert!(state.apply(&ViewportEvent::Activate).is_empty());
        assert!(state.has_request_in_flight());
        // Two extra clicks cancel out: the original play intent stands.
        assert!(media(&mut state, MediaEvent::PlayResolved).is_empty());
        assert!(state.is_playing());
    }

    #[test]
    fn stale_resolution_does_not_override_pause_intent() {
        let mut state = entered();
        state.apply(&ViewportEvent::Activate);
        state.apply(&ViewportEvent::Activate);
        let follow_up = media(&mut state, MediaEvent::PlayResolved);
        assert_eq!(follow_up, vec![Command::Pause]);
        assert!(state.has_request_in_flight());
        media(&mut state, MediaEvent::Paused);
        assert!(!state.is_playing());
        assert!(!state.has_request_in_flight());
    }

    #[test]
    fn pause_waits_for_confirmation() {
        let mut state = entered();
        state.apply(&ViewportEvent::Activate);
        media(&mut state, MediaEvent::PlayResolved);
        assert_eq!(state.apply(&ViewportEvent::Activate), vec![Command::Pause]);
        assert!(state.is_playing());
        media(&mut state, MediaEvent::Paused);
        assert!(!state.is_playing());
        assert_eq!(state.phase(), Phase::Paused);
    }

    #[test]
    fn replay_after_pause_skips_attach_and_load() {
        let mut state = entered();
        state.apply(&ViewportEvent::Activate);
        media(&mut state, MediaEvent::LoadedData);
        media(&mut state, MediaEvent::PlayResolved);
        state.apply(&ViewportEvent::Activate);
        media(&mut state, MediaEvent::Paused);
        assert_eq!(state.apply(&ViewportEvent::Activate), vec![Command::Play]);
        assert!(!state.is_loading());
    }

    #[test]
    fn rejection_clears_loading_and_allows_retry() {
        let mut state = entered();
        state.apply(&ViewportEvent::Activate);
        media(&mut state, MediaEvent::PlayRejected("autoplay blocked".into()));
        assert!(!state.is_loading());
        assert!(!state.is_playing());
        assert!(!state.has_request_in_flight());
        assert_eq!(state.phase(), Phase::Errored);
        assert_eq!(state.last_error(), Some("autoplay blocked"));

        // Same path as the first click, minus the one-time attachment.
        let retry = state.apply(&ViewportEvent::Activate);
        assert_eq!(retry, vec![Command::Load, Command::Play]);
        assert!(state.is_loading());
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn media_error_degrades_to_paused_not_loading() {
        let mut state = entered();
        state.apply(&ViewportEvent::Activate);
        media(&mut state, MediaEvent::Error("404".into()));
        assert!(!state.is_loading());
        assert!(!state.is_playing());
        assert!(!state.has_request_in_flight());
        // Late rejection for the same failure is harmless.
        media(&mut state, MediaEvent::PlayRejected("404".into()));
        assert!(!state.has_request_in_flight());
    }

    #[test]
    fn mid_stream_error_retries_through_load() {
        let mut state = entered();
        state.apply(&ViewportEvent::Activate);
        media(&mut state, MediaEvent::LoadedData);
        media(&mut state, MediaEvent::PlayResolved);
        media(&mut state, MediaEvent::Error("connection reset".into()));
        assert!(!state.is_loaded());
        assert!(state.is_source_attached());
        assert_eq!(state.phase(), Phase::Errored);

        let retry = state.apply(&ViewportEvent::Activate);
        assert_eq!(retry, vec![Command::Load, Command::Play]);
        assert!(state.is_loading());
        media(&mut state, MediaEvent::LoadStart);
        assert!(state.is_loading());
        assert_eq!(state.phase(), Phase::Loading);

        media(&mut state, MediaEvent::LoadedData);
        media(&mut state, MediaEvent::PlayResolved);
        assert!(state.is_playing());
        assert!(!state.is_loading());
    }

    #[test]
    fn ended_drops_outstanding_play() {
        let mut state = entered();
        state.apply(&ViewportEvent::Activate);
        media(&mut state, MediaEvent::LoadedData);
        media(&mut state, MediaEvent::Ended);
        assert!(!state.has_request_in_flight());

        assert!(media(&mut state, MediaEvent::PlayResolved).is_empty());
        assert!(!state.is_playing());
        assert_eq!(state.phase(), Phase::Paused);
    }

    #[test]
    fn platform_events_drive_playing_flag() {
        let mut state = entered();
        media(&mut state, MediaEvent::Played);
        assert!(state.is_playing());
        media(&mut state, MediaEvent::Ended);
        assert!(!state.is_playing());
    }

    #[test]
    fn fullscreen_flag_follows_platform_only() {
        let mut state = entered();
        assert_eq!(
            state.apply(&ViewportEvent::ToggleFullscreen),
            vec![Command::RequestFullscreen]
        );
        assert!(!state.is_fullscreen());

        state.apply(&ViewportEvent::FullscreenChanged { element: Some(ViewportId(1)) });
        assert!(state.is_fullscreen());
        assert_eq!(
            state.apply(&ViewportEvent::ToggleFullscreen),
            vec![Command::ExitFullscreen]
        );

        state.apply(&ViewportEvent::FullscreenChanged { element: Some(ViewportId(2)) });
        assert!(!state.is_fullscreen());
    }

    #[test]
    fn fullscreen_toggle_is_independent_of_playback() {
        let mut state = entered();
        state.apply(&ViewportEvent::Activate);
        assert_eq!(
            state.apply(&ViewportEvent::ToggleFullscreen),
            vec![Command::RequestFullscreen]
        );
        assert!(state.has_request_in_flight());
        assert!(state.is_loading());
    }

    #[test]
    fn teardown_pauses_and_releases() {
        let mut state = entered();
        state.apply(&ViewportEvent::Activate);
        state.apply(&ViewportEvent::FullscreenChanged { element: Some(ViewportId(1)) });
        let commands = state.teardown();
        assert_eq!(commands, vec![Command::Pause, Command::ExitFullscreen]);
        assert!(state.apply(&ViewportEvent::Activate).is_empty());
        assert!(state.teardown().is_empty());
    }

    #[test]
    fn teardown_before_entering_stops_observing() {
        let mut state = ViewportState::new(ViewportId(3));
        assert_eq!(state.teardown(), vec![Command::StopObserving]);
        assert!(state.apply(&ViewportEvent::EnteredProximity).is_empty());
        assert!(!state.has_entered_viewport());
    }
}
