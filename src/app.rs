// ============================================================================
// app.rs — KeyIntent
// Viewer window and winit event-loop handler hosting the intent tracker.
// ============================================================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use keyintent::config::ViewerConfig;
use keyintent::input;
use keyintent::intent::IntentState;
use keyintent::motion::MotionState;
use keyintent::session::SessionRecorder;
use keyintent::{Handle, InputIntentTracker, KeyBinding, KeyboardSurface};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

// ======================== Application ========================

pub struct App {
    config: ViewerConfig,
    window: Option<Arc<Window>>,

    // Input
    surface: KeyboardSurface,
    tracker: InputIntentTracker,
    handle: Handle,
    recorder: Option<SessionRecorder>,

    // Frame loop
    motion: MotionState,
    shown: Option<IntentState>,
    last_frame: Instant,
    frame: u64,
}

impl App {
    /// Starts observing `binding` before the event loop runs, so a bad
    /// table fails here rather than inside a window callback.
    pub fn new(config: ViewerConfig, binding: &KeyBinding) -> Result<Self> {
        let surface = KeyboardSurface::new();
        let mut tracker = InputIntentTracker::new(surface.clone());
        let handle = tracker
            .start(binding)
            .context("cannot observe the configured key binding")?;
        let recorder = config.record_path.as_ref().map(|_| SessionRecorder::default());

        Ok(Self {
            config,
            window: None,
            surface,
            tracker,
            handle,
            recorder,
            motion: MotionState::default(),
            shown: None,
            last_frame: Instant::now(),
            frame: 0,
        })
    }

    /// Stops observation and writes the session transcript, if recording.
    pub fn finish(mut self) -> Result<()> {
        self.tracker.stop(&mut self.handle);
        if let (Some(recorder), Some(path)) = (&self.recorder, &self.config.record_path) {
            recorder.save(path)?;
        }
        Ok(())
    }

    fn tick(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame += 1;

        let state = self.tracker.current_state();
        self.motion.apply_intents(&state, dt);

        if self.frame % u64::from(self.config.status_interval.max(1)) == 0 {
            log::info!(
                "frame={} pos=({:.2}, {:.2}) active=[{}]",
                self.frame,
                self.motion.position[0],
                self.motion.position[1],
                state.active().collect::<Vec<_>>().join(", ")
            );
        }

        if self.shown.as_ref() != Some(&state) {
            if let Some(window) = &self.window {
                window.set_title(&title_for(&self.config.title, &state));
            }
            self.shown = Some(state);
        }
    }
}

fn title_for(base: &str, state: &IntentState) -> String {
    let active: Vec<_> = state.active().collect();
    if active.is_empty() {
        base.to_owned()
    } else {
        format!("{} — {}", base, active.join(" + "))
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width,
                self.config.height,
            ));

        match event_loop.create_window(window_attrs) {
            Ok(window) => {
                log::info!(
                    "Viewer window opened: {}x{}",
                    self.config.width,
                    self.config.height
                );
                self.window = Some(Arc::new(window));
                self.last_frame = Instant::now();
            }
            Err(err) => {
                log::error!("Failed to create window: {}", err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            return;
        }
        self.tick();
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + FRAME_INTERVAL));
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                    && event.state.is_pressed()
                {
                    event_loop.exit();
                    return;
                }
                let Some(key_event) = input::translate(&event) else {
                    return;
                };
                if let Some(recorder) = &mut self.recorder {
                    recorder.record(&key_event);
                }
                self.surface.dispatch(&key_event);
            }

            WindowEvent::Focused(focused) => {
                log::debug!("Window focus: {}", focused);
            }

            _ => {}
        }
    }
}
