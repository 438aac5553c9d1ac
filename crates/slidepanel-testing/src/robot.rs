use slidepanel::{
    ConfigError, Panel, PanelConfig, PanelController, PanelScrollPhysics, PointerDisposition,
};
use slidepanel_core::{Point, Runtime};
use slidepanel_foundation::{HitTester, PointerEvent, ScrollPhysics, ScrollState};

/// One frame at 60 fps.
pub const FRAME_NANOS: u64 = 16_666_667;

/// Default spacing between synthetic pointer samples.
const POINTER_STEP_MS: i64 = 8;

/// Headless harness around a [`Panel`].
///
/// The robot owns the runtime, an attached [`PanelController`] and, when
/// requested, a nested [`ScrollState`]. Like a real nested scrollable, that
/// scroll state consumes every vertical drag the panel does not ignore; the
/// panel's offset listener pins it back while the panel owns the gesture.
pub struct PanelRobot {
    runtime: Runtime,
    panel: Panel,
    controller: PanelController,
    physics: PanelScrollPhysics,
    scroll: Option<ScrollState>,
    frame: u64,
    clock_ms: i64,
    pointer: Point,
}

impl PanelRobot {
    /// Launch a robot-driven panel, panicking on an invalid configuration.
    pub fn launch(config: PanelConfig) -> Self {
        match Self::try_launch(config) {
            Ok(robot) => robot,
            Err(err) => panic!("PanelRobot::launch: {err}"),
        }
    }

    pub fn try_launch(config: PanelConfig) -> Result<Self, ConfigError> {
        let runtime = Runtime::default();
        let panel = Panel::new(config, runtime.frame_clock())?;
        let controller = PanelController::new();
        panel.attach_controller(&controller);
        let physics = panel.scroll_physics();
        Ok(Self {
            runtime,
            panel,
            controller,
            physics,
            scroll: None,
            frame: 0,
            clock_ms: 0,
            pointer: Point::ZERO,
        })
    }

    /// Nest a scrollable with `max_offset` pixels of overflow inside the panel.
    pub fn with_scroll_content(mut self, max_offset: f64) -> Self {
        let scroll = ScrollState::new(0.0);
        scroll.set_extents(0.0, max_offset);
        self.panel.attach_scroll_state(&scroll);
        self.scroll = Some(scroll);
        self
    }

    pub fn with_hit_tester(self, hit_tester: impl HitTester + 'static) -> Self {
        self.panel.set_hit_tester(hit_tester);
        self
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn controller(&self) -> &PanelController {
        &self.controller
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn position(&self) -> f64 {
        self.panel.position()
    }

    pub fn scroll_state(&self) -> Option<&ScrollState> {
        self.scroll.as_ref()
    }

    /// Current nested scroll offset, zero without scroll content.
    pub fn scroll_offset(&self) -> f64 {
        self.scroll.as_ref().map_or(0.0, ScrollState::value)
    }

    /// Scroll the nested content programmatically inside a force-scroll section.
    ///
    /// The scroll floor moves to `offset` until the next pointer-down on an
    /// open panel.
    pub fn scroll_to(&self, offset: f64) {
        if let Some(scroll) = self.scroll.as_ref() {
            let _section = self.panel.scroll_coordinator().enter_force_scroll();
            scroll.scroll_to(offset);
        }
    }

    /// Momentum the nested scrollable would keep after a release at `velocity`.
    pub fn ballistic_velocity(&self, velocity: f64) -> f64 {
        self.physics.ballistic_velocity(velocity)
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.frame * FRAME_NANOS / 1_000_000
    }

    /// Drain one frame of callbacks; the pointer clock moves with it.
    pub fn step(&mut self) {
        self.frame += 1;
        self.clock_ms = self.clock_ms.max(self.elapsed_millis() as i64);
        self.runtime.drain_frame_callbacks(self.frame * FRAME_NANOS);
    }

    pub fn step_frames(&mut self, frames: usize) {
        for _ in 0..frames {
            self.step();
        }
    }

    /// Step until the panel stops animating. Returns the number of frames taken.
    pub fn settle(&mut self, max_frames: usize) -> usize {
        for frame in 0..max_frames {
            if !self.panel.is_animating() {
                return frame;
            }
            self.step();
        }
        panic!("panel still animating after {max_frames} frames");
    }

    /// Let `millis` pass on the pointer clock without sending events.
    pub fn wait(&mut self, millis: i64) {
        self.clock_ms += millis;
    }

    pub fn press(&mut self, x: f64, y: f64) -> PointerDisposition {
        self.pointer = Point::new(x, y);
        self.panel
            .dispatch_pointer(&PointerEvent::down(self.pointer, self.clock_ms))
    }

    /// Move the pointer to `(x, y)` after `delay_ms`.
    pub fn move_to(&mut self, x: f64, y: f64, delay_ms: i64) -> PointerDisposition {
        self.clock_ms += delay_ms;
        let target = Point::new(x, y);
        let dy = target.y - self.pointer.y;
        self.pointer = target;
        let disposition = self
            .panel
            .dispatch_pointer(&PointerEvent::moved(target, self.clock_ms));
        if matches!(
            disposition,
            PointerDisposition::Panel | PointerDisposition::Scroll
        ) {
            if let Some(scroll) = self.scroll.as_ref() {
                scroll.dispatch_raw_delta(-dy);
            }
        }
        disposition
    }

    /// Drag by `(dx, dy)` in `steps` evenly spaced moves, `step_ms` apart.
    pub fn drag_by(&mut self, dx: f64, dy: f64, steps: usize, step_ms: i64) -> Vec<PointerDisposition> {
        let steps = steps.max(1);
        let start = self.pointer;
        (1..=steps)
            .map(|step| {
                let fraction = step as f64 / steps as f64;
                self.move_to(start.x + dx * fraction, start.y + dy * fraction, step_ms)
            })
            .collect()
    }

    pub fn release(&mut self) -> PointerDisposition {
        self.panel
            .dispatch_pointer(&PointerEvent::up(self.pointer, self.clock_ms))
    }

    pub fn cancel(&mut self) -> PointerDisposition {
        self.panel
            .dispatch_pointer(&PointerEvent::cancel(self.pointer, self.clock_ms))
    }

    /// Press at `(x, y)`, drag vertically by `dy` at roughly `velocity` px/s, release.
    pub fn fling(&mut self, x: f64, y: f64, dy: f64, velocity: f64) -> PointerDisposition {
        let steps = 6;
        let step_ms = if velocity.abs() > 0.0 {
            ((dy.abs() / velocity.abs()) * 1000.0 / steps as f64).round().max(1.0) as i64
        } else {
            POINTER_STEP_MS * 8
        };
        self.press(x, y);
        self.drag_by(0.0, dy, steps, step_ms);
        self.release()
    }

    /// Press, drag slowly by `dy`, pause until the pointer counts as stopped, release.
    pub fn drag_and_hold(&mut self, x: f64, y: f64, dy: f64) -> PointerDisposition {
        self.press(x, y);
        self.drag_by(0.0, dy, 8, POINTER_STEP_MS);
        self.wait(60);
        self.release()
    }
}
