//! Process-wide fullscreen ownership.
//!
//! Viewports only *ask*; `settle` applies the queued asks against the real surface and
//! broadcasts whatever actually happened. Subscribers therefore never observe a state the
//! platform refused.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crossbeam_channel::Sender;

use crate::viewport::{ViewportEvent, ViewportId};

#[derive(Debug, thiserror::Error)]
pub enum FullscreenError {
    #[error("fullscreen is disabled in settings")]
    Disabled,
    #[error("no monitor available for fullscreen")]
    NoMonitor,
}

/// The thing that actually goes fullscreen (the window, in the app).
pub trait FullscreenSurface {
    fn enter(&mut self) -> Result<(), FullscreenError>;
    fn exit(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Enter(ViewportId),
    /// `None` leaves fullscreen whoever owns it; `Some(id)` only if `id` still does.
    Exit(Option<ViewportId>),
}

struct BusInner {
    element: Option<ViewportId>,
    allowed: bool,
    pending: VecDeque<Intent>,
    subscribers: Vec<(u64, Sender<ViewportEvent>)>,
    next_token: u64,
}

impl BusInner {
    fn broadcast(&mut self) {
        let element = self.element;
        self.subscribers
            .retain(|(_, tx)| tx.send(ViewportEvent::FullscreenChanged { element }).is_ok());
    }
}

#[derive(Clone)]
pub struct FullscreenBus {
    inner: Rc<RefCell<BusInner>>,
}

impl FullscreenBus {
    pub fn new(allowed: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                element: None,
                allowed,
                pending: VecDeque::new(),
                subscribers: Vec::new(),
                next_token: 0,
            })),
        }
    }

    #[cfg(test)]
    pub fn set_allowed(&self, allowed: bool) {
        self.inner.borrow_mut().allowed = allowed;
    }

    /// Current owner, as last confirmed by the surface.
    pub fn element(&self) -> Option<ViewportId> {
        self.inner.borrow().element
    }

    pub fn subscribe(&self, tx: Sender<ViewportEvent>) -> FullscreenSubscription {
        let mut inner = self.inner.borrow_mut();
        let token = inner.next_token;
        inner.next_token += 1;
        inner.subscribers.push((token, tx));
        FullscreenSubscription {
            token,
            inner: Rc::downgrade(&self.inner),
        }
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    pub fn request(&self, id: ViewportId) {
        self.inner.borrow_mut().pending.push_back(Intent::Enter(id));
    }

    /// Leave fullscreen regardless of owner (Escape).
    pub fn exit(&self) {
        self.inner.borrow_mut().pending.push_back(Intent::Exit(None));
    }

    /// Leave fullscreen only if `id` still owns it when the queue settles.
    pub fn release(&self, id: ViewportId) {
        self.inner
            .borrow_mut()
            .pending
            .push_back(Intent::Exit(Some(id)));
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().pending.is_empty()
    }

    /// Apply queued intents in order. Returns true if ownership changed.
    pub fn settle(&self, surface: &mut dyn FullscreenSurface) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.element;

        while let Some(intent) = inner.pending.pop_front() {
            match intent {
                Intent::Enter(id) => {
                    if inner.element == Some(id) {
                        continue;
                    }
                    if !inner.allowed {
                        log::debug!("Fullscreen request from viewport {id} denied: {}", FullscreenError::Disabled);
                        continue;
                    }
                    if inner.element.is_none() {
                        if let Err(e) = surface.enter() {
                            log::debug!("Fullscreen request from viewport {id} denied: {e}");
                            continue;
                        }
                    }
                    inner.element = Some(id);
                    inner.broadcast();
                }
                Intent::Exit(owner) => {
                    if inner.element.is_none() {
                        continue;
                    }
                    if let Some(id) = owner.filter(|id| inner.element != Some(*id)) {
                        log::debug!("Stale fullscreen exit from viewport {id} ignored");
                        continue;
                    }
                    surface.exit();
                    inner.element = None;
                    inner.broadcast();
                }
            }
        }

        inner.element != before
    }

    /// The platform left fullscreen on its own (Escape, window manager, ...).
    pub fn platform_exited(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.element.take().is_some() {
            log::debug!("Fullscreen exited by platform");
            inner.broadcast();
        }
    }
}

/// Subscription guard. Dropping it stops change notifications.
pub struct FullscreenSubscription {
    token: u64,
    inner: Weak<RefCell<BusInner>>,
}

impl Drop for FullscreenSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .borrow_mut()
                .subscribers
                .retain(|(token, _)| *token != self.token);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crossbeam_channel::Receiver;

    /// Surface that records calls and can be told to refuse.
    #[derive(Default)]
    pub(crate) struct FakeSurface {
        pub refuse: bool,
        pub active: bool,
        pub enters: usize,
        pub exits: usize,
    }

    impl FullscreenSurface for FakeSurface {
        fn enter(&mut self) -> Result<(), FullscreenError> {
            self.enters += 1;
            if self.refuse {
                return Err(FullscreenError::NoMonitor);
            }
            self.active = true;
            Ok(())
        }

        fn exit(&mut self) {
            self.exits += 1;
            self.active = false;
        }
    }

    fn changes(rx: &Receiver<ViewportEvent>) -> Vec<Option<ViewportId>> {
        rx.try_iter()
            .filter_map(|e| match e {
                ViewportEvent::FullscreenChanged { element } => Some(element),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn request_only_applies_on_settle() {
        let bus = FullscreenBus::new(true);
        let (tx, rx) = crossbeam_channel::unbounded();
        let _sub = bus.subscribe(tx);
        let mut surface = FakeSurface::default();

        bus.request(ViewportId(1));
        assert_eq!(bus.element(), None);
        assert!(bus.has_pending());
        assert!(changes(&rx).is_empty());

        assert!(bus.settle(&mut surface));
        assert_eq!(bus.element(), Some(ViewportId(1)));
        assert!(surface.active);
        assert_eq!(changes(&rx), vec![Some(ViewportId(1))]);
    }

    #[test]
    fn refused_request_changes_nothing() {
        let bus = FullscreenBus::new(true);
        let (tx, rx) = crossbeam_channel::unbounded();
        let _sub = bus.subscribe(tx);
        let mut surface = FakeSurface {
            refuse: true,
            ..Default::default()
        };

        bus.request(ViewportId(1));
        assert!(!bus.settle(&mut surface));
        assert_eq!(bus.element(), None);
        assert_eq!(surface.enters, 1);
        assert!(changes(&rx).is_empty());
    }

    #[test]
    fn disabled_bus_never_touches_surface() {
        let bus = FullscreenBus::new(false);
        let mut surface = FakeSurface::default();
        bus.request(ViewportId(1));
        assert!(!bus.settle(&mut surface));
        assert_eq!(surface.enters, 0);

        bus.set_allowed(true);
        bus.request(ViewportId(1));
        assert!(bus.settle(&mut surface));
    }

    #[test]
    fn enter_then_exit_in_one_turn() {
        let bus = FullscreenBus::new(true);
        let (tx, rx) = crossbeam_channel::unbounded();
        let _sub = bus.subscribe(tx);
        let mut surface = FakeSurface::default();

        bus.request(ViewportId(4));
        bus.exit();
        assert!(!bus.settle(&mut surface));
        assert_eq!(bus.element(), None);
        assert!(!surface.active);
        assert_eq!(changes(&rx), vec![Some(ViewportId(4)), None]);
    }

    #[test]
    fn second_request_transfers_ownership() {
        let bus = FullscreenBus::new(true);
        let (tx, rx) = crossbeam_channel::unbounded();
        let _sub = bus.subscribe(tx);
        let mut surface = FakeSurface::default();

        bus.request(ViewportId(1));
        bus.request(ViewportId(2));
        bus.settle(&mut surface);
        assert_eq!(bus.element(), Some(ViewportId(2)));
        assert_eq!(surface.enters, 1);
        assert_eq!(changes(&rx), vec![Some(ViewportId(1)), Some(ViewportId(2))]);
    }

    #[test]
    fn release_from_former_owner_is_ignored() {
        let bus = FullscreenBus::new(true);
        let (tx, rx) = crossbeam_channel::unbounded();
        let _sub = bus.subscribe(tx);
        let mut surface = FakeSurface::default();
        bus.request(ViewportId(1));
        bus.settle(&mut surface);
        changes(&rx);

        bus.request(ViewportId(2));
        bus.release(ViewportId(1));
        bus.settle(&mut surface);
        assert_eq!(bus.element(), Some(ViewportId(2)));
        assert!(surface.active);
        assert_eq!(surface.exits, 0);
        assert_eq!(changes(&rx), vec![Some(ViewportId(2))]);

        bus.release(ViewportId(2));
        bus.settle(&mut surface);
        assert_eq!(bus.element(), None);
        assert_eq!(changes(&rx), vec![None]);
    }

    #[test]
    fn platform_exit_is_broadcast() {
        let bus = FullscreenBus::new(true);
        let (tx, rx) = crossbeam_channel::unbounded();
        let _sub = bus.subscribe(tx);
        let mut surface = FakeSurface::default();
        bus.request(ViewportId(1));
        bus.settle(&mut surface);
        changes(&rx);

        bus.platform_exited();
        assert_eq!(bus.element(), None);
        assert_eq!(changes(&rx), vec![None]);

        bus.platform_exited();
        assert!(changes(&rx).is_empty());
    }

    #[test]
    fn dropped_subscription_is_removed() {
        let bus = FullscreenBus::new(true);
        let (tx, _rx) = crossbeam_channel::unbounded();
        let sub = bus.subscribe(tx);
        assert_eq!(bus.subscriber_count(), 1);
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn closed_receivers_are_pruned_on_broadcast() {
        let bus = FullscreenBus::new(true);
        let (tx, rx) = crossbeam_channel::unbounded();
        let _sub = bus.subscribe(tx);
        drop(rx);
        bus.request(ViewportId(1));
        bus.settle(&mut FakeSurface::default());
        assert_eq!(bus.subscriber_count(), 0);
    }
}
