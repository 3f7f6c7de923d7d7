//! Proximity observation for lazily mounted tiles.
//!
//! Tiles report their on-screen rect every frame; `evaluate` compares each against the
//! visible root grown by a margin and fires `EnteredProximity` once per registration.
//! A registration removes itself after firing, or when its [`Observation`] is dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crossbeam_channel::Sender;
use egui::Rect;

use crate::viewport::{ViewportEvent, ViewportId};

pub const DEFAULT_MARGIN: f32 = 100.0;
pub const DEFAULT_THRESHOLD: f32 = 0.1;

struct Target {
    tx: Sender<ViewportEvent>,
    rect: Option<Rect>,
}

struct ObserverInner {
    margin: f32,
    threshold: f32,
    targets: HashMap<ViewportId, Target>,
}

/// Shared handle; clones observe the same registrations.
#[derive(Clone)]
pub struct ProximityObserver {
    inner: Rc<RefCell<ObserverInner>>,
}

impl ProximityObserver {
    pub fn new(margin: f32, threshold: f32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObserverInner {
                margin: margin.max(0.0),
                threshold: threshold.clamp(0.0, 1.0),
                targets: HashMap::new(),
            })),
        }
    }

    pub fn observe(&self, id: ViewportId, tx: Sender<ViewportEvent>) -> Observation {
        self.inner
            .borrow_mut()
            .targets
            .insert(id, Target { tx, rect: None });
        Observation {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Record where a target was laid out this frame. Unknown ids are ignored.
    pub fn track(&self, id: ViewportId, rect: Rect) {
        if let Some(target) = self.inner.borrow_mut().targets.get_mut(&id) {
            target.rect = Some(rect);
        }
    }

    /// Fire for every target near `root`. Returns how many fired.
    pub fn evaluate(&self, root: Rect) -> usize {
        let mut inner = self.inner.borrow_mut();
        let (margin, threshold) = (inner.margin, inner.threshold);
        let entered: Vec<ViewportId> = inner
            .targets
            .iter()
            .filter(|(_, t)| {
                t.rect
                    .is_some_and(|rect| is_within_proximity(rect, root, margin, threshold))
            })
            .map(|(id, _)| *id)
            .collect();

        for id in &entered {
            if let Some(target) = inner.targets.remove(id) {
                let _ = target.tx.send(ViewportEvent::EnteredProximity);
            }
        }
        entered.len()
    }

    #[cfg(test)]
    pub fn observed_count(&self) -> usize {
        self.inner.borrow().targets.len()
    }
}

/// Registration guard. Dropping it stops observation.
pub struct Observation {
    id: ViewportId,
    inner: Weak<RefCell<ObserverInner>>,
}

impl Drop for Observation {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().targets.remove(&self.id);
        }
    }
}

/// Fraction of `target` covered by `root`. A degenerate target touching root counts as 1.
pub fn intersection_ratio(target: Rect, root: Rect) -> f32 {
    let overlap = target.intersect(root);
    if overlap.width() < 0.0 || overlap.height() < 0.0 {
        return 0.0;
    }
    let area = target.width() * target.height();
    if area <= 0.0 {
        return 1.0;
    }
    (overlap.width() * overlap.height()) / area
}

pub fn is_within_proximity(target: Rect, root: Rect, margin: f32, threshold: f32) -> bool {
    let expanded = root.expand(margin);
    if !target.intersects(expanded) {
        return false;
    }
    intersection_ratio(target, expanded) >= threshold
}
