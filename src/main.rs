//! Arclight - an audio-reactive HUD visualizer
//!
//! A particle shell ripples with the live spectrum, twelve rings pulse one
//! frequency band each, a marker group springs in and out with the
//! operating mode, and transient response text fades through its lifecycle.

mod audio;
mod cli;
mod deploy;
mod params;
mod particles;
mod rendering;
mod response;
mod rings;
mod spectrum;
mod spring;

use clap::Parser;
use glam::{Mat4, Vec3};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use audio::{AudioSystem, CaptureSource};
use deploy::DeploymentController;
use params::*;
use particles::ParticleField;
use rendering::{FrameUniforms, RenderSystem};
use response::ResponsePhaseMachine;
use rings::RingSet;
use spectrum::{SpectrumSampler, SpectrumSource};
use spring::SpringState;

/// Scripted event for `--demo` mode
enum DemoEvent {
    SetMode(Mode),
    Say(&'static str),
}

/// Looping timeline exercising every subsystem without user input
struct DemoScript {
    events: Vec<(f32, DemoEvent)>,
    next: usize,
    cycle_start: f32,
}

impl DemoScript {
    fn new() -> Self {
        Self {
            events: vec![
                (1.0, DemoEvent::SetMode(Mode::Listening)),
                (3.5, DemoEvent::SetMode(Mode::Transmitting)),
                (4.0, DemoEvent::Say("Understood, Commander.")),
                (9.5, DemoEvent::SetMode(Mode::Idle)),
                (
                    11.0,
                    DemoEvent::Say(
                        "Diagnostics complete: all twelve spectral rings nominal, \
                         particle shell coherence at ninety-eight percent and holding.",
                    ),
                ),
                (21.0, DemoEvent::SetMode(Mode::Listening)),
                (24.0, DemoEvent::Say("hm")), // too short on purpose: ignored
                (26.0, DemoEvent::SetMode(Mode::Idle)),
            ],
            next: 0,
            cycle_start: 0.0,
        }
    }

    /// Pop events due at `now`; restarts the timeline when exhausted
    fn due(&mut self, now: f32) -> Vec<&DemoEvent> {
        const CYCLE_GAP_SECS: f32 = 12.0;
        let mut fired = Vec::new();
        while self.next < self.events.len() {
            let (at, ref event) = self.events[self.next];
            if now - self.cycle_start < at {
                break;
            }
            fired.push(event);
            self.next += 1;
        }
        if self.next == self.events.len() {
            if let Some(&(last_at, _)) = self.events.last() {
                if now - self.cycle_start >= last_at + CYCLE_GAP_SECS {
                    self.next = 0;
                    self.cycle_start = now;
                }
            }
        }
        fired
    }
}

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Animation systems
    sampler: SpectrumSampler,
    field: ParticleField,
    rings: RingSet,
    spring: SpringState,
    deploy: DeploymentController,
    response: ResponsePhaseMachine,
    mode: Mode,

    // External collaborators
    /// Audio system (kept alive for its capture stream)
    _audio: Option<AudioSystem>,
    source: Option<CaptureSource>,

    // Configuration
    args: cli::Args,
    render_config: RenderConfig,
    demo: Option<DemoScript>,

    // Time tracking
    start_time: Instant,
    last_frame: Instant,
}

impl App {
    fn new(args: cli::Args) -> Self {
        let render_config = args.render_config();
        let demo = args.demo.then(DemoScript::new);
        Self {
            window: None,
            render_system: None,
            sampler: SpectrumSampler::new(),
            field: ParticleField::new(FieldShell::default()),
            rings: RingSet::new(RingLayout::default(), RingPulse::default()),
            spring: SpringState::new(SpringParams::default()),
            deploy: DeploymentController::new(RetractHysteresis::default()),
            response: ResponsePhaseMachine::new(FadeTiming::default(), OverlaySway::default()),
            mode: Mode::Idle,
            _audio: None,
            source: None,
            args,
            render_config,
            demo,
            start_time: Instant::now(),
            last_frame: Instant::now(),
        }
    }

    fn set_mode(&mut self, mode: Mode, now: f32) {
        if mode == self.mode {
            return;
        }
        info!(?mode, "mode change");
        self.mode = mode;
        self.deploy.set_mode(mode, now);
    }

    /// Submit response text. The overlay renders a backdrop panel driven
    /// by the fade phase; the text itself is logged rather than drawn as
    /// glyphs.
    fn submit_text(&mut self, text: &str, now: f32) {
        if self.response.submit(text, now) {
            info!(text = self.response.text(), "response text");
        }
    }

    fn elapsed(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Arclight")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));
        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.field,
            self.rings.instances(),
            self.render_config.marker_radius,
        ))
        .unwrap();

        // Audio is optional: without it the spectrum stays absent and the
        // visuals degrade to their ambient state
        if !self.args.no_audio {
            match AudioSystem::new(self.args.fft_config()) {
                Ok(audio) => {
                    self.source = Some(audio.source());
                    self._audio = Some(audio);
                }
                Err(e) => warn!("audio unavailable, running silent: {e:#}"),
            }
        }

        info!("arclight running; keys: 1 idle, 2 listening, 3 transmitting, T text, Esc quit");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.start_time = Instant::now();
        self.last_frame = self.start_time;
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => {
                let now = self.elapsed();
                match code {
                    KeyCode::Escape => event_loop.exit(),
                    KeyCode::Digit1 => self.set_mode(Mode::Idle, now),
                    KeyCode::Digit2 => self.set_mode(Mode::Listening, now),
                    KeyCode::Digit3 => self.set_mode(Mode::Transmitting, now),
                    KeyCode::KeyT => self.submit_text("Understood, Commander.", now),
                    _ => {}
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

impl App {
    /// Apply any scripted demo events due at `now`
    fn run_demo_events(&mut self, now: f32) {
        enum Pending {
            Mode(Mode),
            Text(&'static str),
        }
        let mut pending = Vec::new();
        if let Some(demo) = &mut self.demo {
            for event in demo.due(now) {
                match event {
                    DemoEvent::SetMode(mode) => pending.push(Pending::Mode(*mode)),
                    DemoEvent::Say(text) => pending.push(Pending::Text(*text)),
                }
            }
        }
        for p in pending {
            match p {
                Pending::Mode(mode) => self.set_mode(mode, now),
                Pending::Text(text) => self.submit_text(text, now),
            }
        }
    }

    /// Run one synchronous tick: sample, animate, upload, render
    fn render_frame(&mut self) {
        if self.render_system.is_none() {
            return;
        }

        let frame_start = Instant::now();
        let delta = (frame_start - self.last_frame).as_secs_f32();
        self.last_frame = frame_start;
        let now = self.elapsed();

        self.run_demo_events(now);

        let Some(ref render_system) = self.render_system else {
            return;
        };

        // Spectrum in, visual state out
        let volume = self
            .sampler
            .sample(self.source.as_ref().map(|s| s as &dyn SpectrumSource));
        self.rings.update(&self.sampler);

        let (width, height) = render_system.surface_size();
        let scale_factor = self
            .window
            .as_ref()
            .map(|w| w.scale_factor())
            .unwrap_or(1.0);
        let motion = self
            .field
            .animate(now, volume, &self.mode.style(), height, scale_factor);

        let deployed = self.deploy.update(now);
        self.spring.set_deployed(deployed);
        let deploy_scale = self.spring.step(delta);

        self.response.tick(delta, now);
        let sway = self.response.sway_offsets(now);

        // Camera: fixed on +Z looking at the origin
        let eye = Vec3::new(0.0, 0.0, self.render_config.camera_distance);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(
            self.render_config.fov_degrees.to_radians(),
            width as f32 / height.max(1) as f32,
            self.render_config.near_plane,
            self.render_config.far_plane,
        );

        let uniforms = FrameUniforms {
            view_proj: (proj * view).to_cols_array_2d(),
            resolution: [width as f32, height as f32],
            time: motion.time,
            volume: motion.volume,
            point_size: motion.point_size,
            viewport_scale: motion.viewport_scale,
            yaw: motion.yaw,
            pitch: motion.pitch,
            deploy_scale,
            overlay_opacity: self.response.opacity(),
            overlay_y: sway.y,
            overlay_yaw: sway.yaw_rad,
            accent: self.mode.style().accent,
            ..FrameUniforms::default()
        };
        render_system.update_uniforms(&uniforms);
        render_system.update_rings(self.rings.instances());

        let markers_visible = deploy_scale > 0.001;
        let overlay_visible = self.response.is_visible();
        if let Err(e) = render_system.render(markers_visible, overlay_visible) {
            warn!("render error: {e:?}");
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = cli::Args::parse();
    let mut app = App::new(args);
    let event_loop = EventLoop::new().unwrap();
    let _ = event_loop.run_app(&mut app);
}
