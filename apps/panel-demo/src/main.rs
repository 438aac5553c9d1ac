use std::error::Error;
use std::thread;
use std::time::Duration;

use slidepanel::prelude::*;
use slidepanel_core::Rect;
use web_time::Instant;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const MAX_SETTLE_FRAMES: usize = 240;

/// Drives the runtime off the wall clock, one frame every [`FRAME_INTERVAL`].
struct FrameLoop {
    runtime: Runtime,
    started: Instant,
}

impl FrameLoop {
    fn new(runtime: Runtime) -> Self {
        Self {
            runtime,
            started: Instant::now(),
        }
    }

    fn now_nanos(&self) -> u64 {
        self.started.elapsed().as_nanos() as u64
    }

    fn now_millis(&self) -> i64 {
        self.started.elapsed().as_millis() as i64
    }

    fn tick(&self) {
        thread::sleep(FRAME_INTERVAL);
        self.runtime.drain_frame_callbacks(self.now_nanos());
    }

    fn settle(&self, panel: &Panel, label: &str) {
        let mut frames = 0;
        while panel.is_animating() && frames < MAX_SETTLE_FRAMES {
            self.tick();
            frames += 1;
        }
        let frame = panel.frame();
        log::info!(
            "{label}: settled at {:.3} after {frames} frames (height {:.1}, backdrop {:.2})",
            frame.position,
            frame.height,
            frame.backdrop_opacity
        );
    }

    fn drag(&self, panel: &Panel, scroll: &ScrollState, from: Point, dy: f64, steps: usize) {
        panel.dispatch_pointer(&PointerEvent::down(from, self.now_millis()));
        let step = dy / steps as f64;
        let mut y = from.y;
        for _ in 0..steps {
            thread::sleep(Duration::from_millis(8));
            y += step;
            let disposition =
                panel.dispatch_pointer(&PointerEvent::moved(Point::new(from.x, y), self.now_millis()));
            if matches!(disposition, PointerDisposition::Panel | PointerDisposition::Scroll) {
                scroll.dispatch_raw_delta(-step);
            }
        }
        panel.dispatch_pointer(&PointerEvent::up(Point::new(from.x, y), self.now_millis()));
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== slidepanel headless demo ===");
    println!("Run with RUST_LOG=debug to see gesture routing decisions.");
    println!();

    let runtime = Runtime::default();
    let frames = FrameLoop::new(runtime.clone());

    let config = PanelConfig::new(96.0, 640.0)
        .with_snap_point(0.5)
        .with_backdrop(0.6, true)
        .with_parallax(0.1);
    let panel = Panel::new(config, runtime.frame_clock())?;
    let controller = PanelController::new();
    panel.attach_controller(&controller);

    panel.set_hit_tester(
        RegionMap::new()
            .with_region(Rect::new(0.0, 0.0, 360.0, 640.0), 0, RegionTag::Plain)
            .with_region(Rect::new(0.0, 0.0, 360.0, 56.0), 1, RegionTag::ForceDraggable),
    );
    let scroll = ScrollState::new(0.0);
    scroll.set_extents(0.0, 1_200.0);
    panel.attach_scroll_state(&scroll);

    panel.on_opened(|| log::info!("panel opened"));
    panel.on_closed(|| log::info!("panel closed"));

    controller.open()?;
    frames.settle(&panel, "open");

    controller.animate_to_snap_point(None, None)?;
    frames.settle(&panel, "snap point");

    log::info!("dragging the handle downward");
    frames.drag(&panel, &scroll, Point::new(180.0, 20.0), 160.0, 10);
    frames.settle(&panel, "drag release");

    controller.open()?;
    frames.settle(&panel, "reopen");
    log::info!("scrolling content while open");
    frames.drag(&panel, &scroll, Point::new(180.0, 400.0), -120.0, 6);
    frames.settle(&panel, "content scroll");
    log::info!("content offset {:.1}", scroll.value());

    {
        let _section = panel.scroll_coordinator().enter_force_scroll();
        scroll.scroll_to(0.0);
    }
    log::info!("content reset, floor now {:.1}", panel.scroll_coordinator().floor_offset());
    if let Some(completion) = panel.on_backdrop_tap() {
        log::debug!("backdrop tap started {completion:?}");
    }
    frames.settle(&panel, "backdrop tap");

    controller.hide()?;
    frames.settle(&panel, "hide");
    log::info!("visible after hide: {}", controller.is_shown()?);
    controller.show()?;
    frames.settle(&panel, "show");

    panel.dispose();
    Ok(())
}
