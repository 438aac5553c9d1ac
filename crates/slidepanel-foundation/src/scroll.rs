//! Nested scrollable collaborator contracts.
//!
//! The panel only needs to read a scrollable's offset and lower extent and to
//! command a jump. [`ScrollState`] is a plain in-memory scroll model that
//! satisfies [`ScrollBinding`] for hosts without their own.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Read/jump access to the scrollable nested inside the panel.
pub trait ScrollBinding {
    fn offset(&self) -> f64;

    /// Lowest scroll offset the content can rest at.
    fn min_extent(&self) -> f64;

    fn jump_to(&self, offset: f64);
}

/// Policy consulted by the scrollable when a drag ends with momentum.
pub trait ScrollPhysics {
    /// Velocity the scrollable should continue with after release.
    fn ballistic_velocity(&self, velocity: f64) -> f64;
}

/// Default physics: momentum passes through untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlatformScrollPhysics;

impl ScrollPhysics for PlatformScrollPhysics {
    fn ballistic_velocity(&self, velocity: f64) -> f64 {
        velocity
    }
}

type OffsetListener = Rc<dyn Fn(f64)>;

/// Scroll position model.
///
/// Offsets are clamped to `[min_extent, max_extent]`. Listeners fire after
/// every change with the new offset.
#[derive(Clone)]
pub struct ScrollState {
    inner: Rc<ScrollStateInner>,
}

struct ScrollStateInner {
    offset: Cell<f64>,
    min_extent: Cell<f64>,
    max_extent: Cell<f64>,
    next_listener_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, OffsetListener)>>,
}

impl ScrollState {
    pub fn new(initial: f64) -> Self {
        Self {
            inner: Rc::new(ScrollStateInner {
                offset: Cell::new(initial.max(0.0)),
                min_extent: Cell::new(0.0),
                max_extent: Cell::new(f64::INFINITY),
                next_listener_id: Cell::new(1),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn value(&self) -> f64 {
        self.inner.offset.get()
    }

    pub fn max_extent(&self) -> f64 {
        self.inner.max_extent.get()
    }

    /// Sets the scrollable range; the current offset is re-clamped.
    pub fn set_extents(&self, min: f64, max: f64) {
        if max < min {
            log::warn!("scroll extents inverted ({min} > {max}); collapsing to {min}");
        }
        let max = max.max(min);
        self.inner.min_extent.set(min);
        self.inner.max_extent.set(max);
        self.set_offset(self.value());
    }

    /// Scrolls by the given delta, clamping to the valid range.
    /// Returns the actual amount scrolled.
    pub fn dispatch_raw_delta(&self, delta: f64) -> f64 {
        let current = self.value();
        self.set_offset(current + delta);
        self.value() - current
    }

    pub fn scroll_to(&self, offset: f64) {
        self.set_offset(offset);
    }

    pub fn add_offset_listener(&self, listener: impl Fn(f64) + 'static) -> u64 {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn remove_offset_listener(&self, id: u64) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }

    fn set_offset(&self, offset: f64) {
        let clamped = offset.clamp(self.inner.min_extent.get(), self.inner.max_extent.get());
        if clamped == self.inner.offset.get() {
            return;
        }
        self.inner.offset.set(clamped);
        // Listeners may scroll again, so dispatch from a snapshot.
        let listeners: Vec<OffsetListener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(clamped);
        }
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl std::fmt::Debug for ScrollState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollState")
            .field("offset", &self.value())
            .field("min_extent", &self.inner.min_extent.get())
            .field("max_extent", &self.max_extent())
            .finish()
    }
}

impl ScrollBinding for ScrollState {
    fn offset(&self) -> f64 {
        self.value()
    }

    fn min_extent(&self) -> f64 {
        self.inner.min_extent.get()
    }

    fn jump_to(&self, offset: f64) {
        self.set_offset(offset);
    }
}
