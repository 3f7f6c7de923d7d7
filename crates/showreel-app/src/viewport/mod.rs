pub mod props;
pub mod state;

use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};

use crate::fullscreen::{FullscreenBus, FullscreenSubscription};
use crate::media::types::{DecodedFrame, MediaEventSink};
use crate::media::{MediaBackend, MediaElement};
use crate::visibility::{Observation, ProximityObserver};

pub use props::{AspectRatio, ViewportProps};
pub use state::{Command, Phase, ViewportEvent, ViewportState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewportId(pub u32);

impl fmt::Display for ViewportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A lazily loaded, click-to-play video region.
///
/// All platform callbacks (proximity, media, fullscreen) arrive through one inbox and are
/// folded into [`ViewportState`] by [`MediaViewport::pump`]. Subscriptions are held as
/// guards, so dropping the viewport releases every one of them.
pub struct MediaViewport {
    id: ViewportId,
    props: ViewportProps,
    state: ViewportState,
    backend: Rc<dyn MediaBackend>,
    element: Option<Box<dyn MediaElement>>,
    fullscreen: FullscreenBus,
    inbox: Receiver<ViewportEvent>,
    outbox: Sender<ViewportEvent>,
    observation: Option<Observation>,
    _fullscreen_sub: FullscreenSubscription,
}

impl MediaViewport {
    pub fn new(
        id: ViewportId,
        props: ViewportProps,
        observer: &ProximityObserver,
        fullscreen: &FullscreenBus,
        backend: Rc<dyn MediaBackend>,
    ) -> Self {
        let (outbox, inbox) = crossbeam_channel::unbounded();
        let observation = observer.observe(id, outbox.clone());
        let fullscreen_sub = fullscreen.subscribe(outbox.clone());
        let mut state = ViewportState::new(id);
        // Late subscribers still need to know who owns the screen.
        if let Some(element) = fullscreen.element() {
            state.apply(&ViewportEvent::FullscreenChanged {
                element: Some(element),
            });
        }

        Self {
            id,
            props,
            state,
            backend,
            element: None,
            fullscreen: fullscreen.clone(),
            inbox,
            outbox,
            observation: Some(observation),
            _fullscreen_sub: fullscreen_sub,
        }
    }

    pub fn id(&self) -> ViewportId {
        self.id
    }

    pub fn props(&self) -> &ViewportProps {
        &self.props
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    /// Whether the media element exists (it only does after entering proximity).
    pub fn is_mounted(&self) -> bool {
        self.element.is_some()
    }

    #[cfg(test)]
    pub fn is_observing(&self) -> bool {
        self.observation.is_some()
    }

    pub fn on_enter_proximity(&mut self) {
        self.dispatch(&ViewportEvent::EnteredProximity);
    }

    pub fn on_activate(&mut self) {
        self.dispatch(&ViewportEvent::Activate);
    }

    pub fn on_toggle_fullscreen(&mut self) {
        self.dispatch(&ViewportEvent::ToggleFullscreen);
    }

    /// Drain and apply every queued platform event. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.inbox.try_recv() {
            match event {
                ViewportEvent::EnteredProximity => self.on_enter_proximity(),
                event => self.dispatch(&event),
            }
            applied += 1;
        }
        applied
    }

    /// Per-frame update: let the element advance, then apply what it reported.
    pub fn tick(&mut self, now: Instant) -> usize {
        if let Some(element) = self.element.as_mut() {
            element.tick(now);
        }
        self.pump()
    }

    pub fn current_frame(&self) -> Option<(&DecodedFrame, u64)> {
        let element = self.element.as_ref()?;
        element
            .current_frame()
            .map(|frame| (frame, element.frame_generation()))
    }

    fn dispatch(&mut self, event: &ViewportEvent) {
        let before = self.state.phase();
        for command in self.state.apply(event) {
            self.execute(command);
        }
        let after = self.state.phase();
        if before != after {
            let pending = if self.state.has_request_in_flight() {
                " (request in flight)"
            } else {
                ""
            };
            log::debug!("viewport {} {:?} -> {:?}{pending}", self.id, before, after);
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::StopObserving => self.observation = None,
            Command::MountElement => {
                let mut element = self.backend.mount(MediaEventSink::new(self.outbox.clone()));
                element.set_looping(self.props.is_showreel);
                self.element = Some(element);
            }
            Command::AttachSource => {
                if let Some(element) = self.element.as_mut() {
                    log::info!("Attaching {} to \"{}\"", self.props.source, self.props.title);
                    element.attach_source(&self.props.source);
                }
            }
            Command::Load => {
                if let Some(element) = self.element.as_mut() {
                    element.load();
                }
            }
            Command::Play => {
                if let Some(element) = self.element.as_mut() {
                    element.play();
                }
            }
            Command::Pause => {
                if let Some(element) = self.element.as_mut() {
                    element.pause();
                }
            }
            Command::RequestFullscreen => self.fullscreen.request(self.id),
            Command::ExitFullscreen => self.fullscreen.release(self.id),
        }
    }
}

impl Drop for MediaViewport {
    fn drop(&mut self) {
        for command in self.state.teardown() {
            self.execute(command);
        }
        if let Some(mut element) = self.element.take() {
            element.shutdown();
        }
        self.observation = None;
    }
}
