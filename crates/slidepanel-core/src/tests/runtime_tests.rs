use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

struct CountingScheduler {
    requests: AtomicUsize,
}

impl RuntimeScheduler for CountingScheduler {
    fn schedule_frame(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn registering_a_callback_requests_a_frame() {
    let scheduler = Arc::new(CountingScheduler {
        requests: AtomicUsize::new(0),
    });
    let runtime = Runtime::new(scheduler.clone());
    let handle = runtime.handle();

    assert!(!runtime.needs_frame());
    handle.register_frame_callback(|_| {});

    assert!(runtime.needs_frame());
    assert_eq!(scheduler.requests.load(Ordering::SeqCst), 1);
}

#[test]
fn drain_runs_callbacks_in_registration_order() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    let order = Rc::new(RefCell::new(Vec::new()));

    for index in 0..3 {
        let order = Rc::clone(&order);
        handle.register_frame_callback(move |time| order.borrow_mut().push((index, time)));
    }
    runtime.drain_frame_callbacks(16);

    assert_eq!(order.borrow().as_slice(), &[(0, 16), (1, 16), (2, 16)]);
    assert!(!runtime.needs_frame());
    assert_eq!(handle.last_frame_nanos(), Some(16));
}

#[test]
fn callbacks_registered_during_drain_wait_for_next_frame() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    let frames = Rc::new(RefCell::new(Vec::new()));

    {
        let frames = Rc::clone(&frames);
        let nested_handle = handle.clone();
        handle.register_frame_callback(move |time| {
            frames.borrow_mut().push(time);
            let frames = Rc::clone(&frames);
            nested_handle.register_frame_callback(move |time| frames.borrow_mut().push(time));
        });
    }

    runtime.drain_frame_callbacks(1);
    assert_eq!(frames.borrow().as_slice(), &[1]);
    assert!(runtime.needs_frame());

    runtime.drain_frame_callbacks(2);
    assert_eq!(frames.borrow().as_slice(), &[1, 2]);
}

#[test]
fn cancelled_callback_is_skipped() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);

    let id = handle
        .register_frame_callback(move |_| flag.set(true))
        .expect("runtime alive");
    handle.cancel_frame_callback(id);
    runtime.drain_frame_callbacks(1);

    assert!(!fired.get());
}

#[test]
fn handle_is_inert_after_runtime_drop() {
    let runtime = Runtime::default();
    let handle = runtime.handle();
    drop(runtime);

    assert!(!handle.is_alive());
    assert!(handle.register_frame_callback(|_| {}).is_none());
    assert_eq!(handle.last_frame_nanos(), None);
}
