use crate::runtime::{FrameCallbackId, RuntimeHandle};
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Clone, Debug)]
pub struct FrameClock {
    runtime: RuntimeHandle,
}

impl FrameClock {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self { runtime }
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    /// Runs `callback` once, on the next drained frame.
    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let runtime = self.runtime.clone();
        match runtime.register_frame_callback(callback) {
            Some(id) => FrameCallbackRegistration::new(runtime, id),
            None => FrameCallbackRegistration::inactive(runtime),
        }
    }

    pub fn with_frame_millis(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        self.with_frame_nanos(move |nanos| {
            let millis = nanos / 1_000_000;
            callback(millis);
        })
    }

    pub fn next_frame(&self) -> NextFrame {
        NextFrame::new(self.clone())
    }
}

/// Keeps a frame callback queued; dropping or cancelling it dequeues the callback.
pub struct FrameCallbackRegistration {
    runtime: RuntimeHandle,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    fn new(runtime: RuntimeHandle, id: FrameCallbackId) -> Self {
        Self {
            runtime,
            id: Some(id),
        }
    }

    fn inactive(runtime: RuntimeHandle) -> Self {
        Self { runtime, id: None }
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_frame_callback(id);
        }
    }
}

impl std::fmt::Debug for FrameCallbackRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCallbackRegistration")
            .field("id", &self.id)
            .finish()
    }
}

struct NextFrameState {
    registration: Option<FrameCallbackRegistration>,
    time: Option<u64>,
    waker: Option<Waker>,
}

/// Future resolving to the timestamp of the next drained frame.
pub struct NextFrame {
    clock: FrameClock,
    state: Rc<RefCell<NextFrameState>>,
}

impl NextFrame {
    fn new(clock: FrameClock) -> Self {
        Self {
            clock,
            state: Rc::new(RefCell::new(NextFrameState {
                registration: None,
                time: None,
                waker: None,
            })),
        }
    }
}

impl Future for NextFrame {
    type Output = u64;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(time) = self.state.borrow().time {
            return Poll::Ready(time);
        }

        let needs_registration = {
            let mut state = self.state.borrow_mut();
            state.waker = Some(cx.waker().clone());
            state.registration.is_none()
        };

        if needs_registration {
            let weak = Rc::downgrade(&self.state);
            let registration = self.clock.with_frame_nanos(move |time| {
                if let Some(state) = weak.upgrade() {
                    let waker = {
                        let mut state = state.borrow_mut();
                        state.time = Some(time);
                        state.registration.take();
                        state.waker.take()
                    };
                    if let Some(waker) = waker {
                        waker.wake();
                    }
                }
            });
            self.state.borrow_mut().registration = Some(registration);
        }

        Poll::Pending
    }
}

impl Drop for NextFrame {
    fn drop(&mut self) {
        let registration = self.state.borrow_mut().registration.take();
        drop(registration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Runtime;
    use std::cell::Cell;

    #[test]
    fn dropped_registration_never_fires() {
        let runtime = Runtime::default();
        let clock = runtime.frame_clock();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);

        let registration = clock.with_frame_nanos(move |_| flag.set(true));
        assert!(registration.is_active());
        drop(registration);

        runtime.drain_frame_callbacks(16_000_000);
        assert!(!fired.get());
        assert!(!runtime.needs_frame());
    }

    #[test]
    fn with_frame_millis_converts_timestamp() {
        let runtime = Runtime::default();
        let clock = runtime.frame_clock();
        let seen = Rc::new(Cell::new(0u64));
        let slot = Rc::clone(&seen);

        let _registration = clock.with_frame_millis(move |millis| slot.set(millis));
        runtime.drain_frame_callbacks(48_000_000);

        assert_eq!(seen.get(), 48);
    }

    #[test]
    fn next_frame_resolves_after_drain() {
        let runtime = Runtime::default();
        let mut next = Box::pin(runtime.frame_clock().next_frame());
        let mut cx = Context::from_waker(futures_task::noop_waker_ref());

        assert!(next.as_mut().poll(&mut cx).is_pending());
        runtime.drain_frame_callbacks(7);
        assert_eq!(next.as_mut().poll(&mut cx), Poll::Ready(7));
    }

    #[test]
    fn registration_on_dropped_runtime_is_inactive() {
        let runtime = Runtime::default();
        let clock = runtime.frame_clock();
        drop(runtime);

        let registration = clock.with_frame_nanos(|_| {});
        assert!(!registration.is_active());
    }
}
