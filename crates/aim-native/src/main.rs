use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Context;
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use aim_core::{
    Camera, ControllerHandle, ControllerId, ControllerRegistry, Frame, FrameSchedule,
    InputSampler, InputSnapshot, MidpointFollower, TargetingConfig, TargetingController, Tracked,
    TrackedPoint, Viewport,
};
use glam::{Vec2, Vec3};

// One wheel notch in trigger units; with the default sensitivity a notch is 1.2 zoom units
const WHEEL_LINE_MAGNITUDE: f32 = 120.0;
const TICK_INTERVAL: Duration = Duration::from_millis(16);
const POINTER_MODE_VAR: &str = "AIM_POINTER_MODE";

const PRIMARY: ControllerId = ControllerId::new(1);
const SECONDARY: ControllerId = ControllerId::new(2);

type Controller = Rc<RefCell<TargetingController<Camera>>>;
type Follower = Rc<RefCell<MidpointFollower<Tracked, Tracked>>>;

/// Reads `AIM_POINTER_MODE`; unset means direct pointer mapping.
fn pointer_mode_from_env() -> anyhow::Result<bool> {
    match std::env::var(POINTER_MODE_VAR) {
        Err(std::env::VarError::NotPresent) => Ok(false),
        Err(err) => Err(anyhow::Error::new(err).context(format!("reading {POINTER_MODE_VAR}"))),
        Ok(mode) => match mode.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(false),
            "delta" => Ok(true),
            other => anyhow::bail!("{POINTER_MODE_VAR} must be 'direct' or 'delta', got '{other}'"),
        },
    }
}

fn overhead_camera(size: PhysicalSize<u32>) -> Camera {
    Camera::orthographic(
        Vec3::new(0.0, 50.0, 0.0),
        Vec3::ZERO,
        10.0,
        Viewport::new(size.width as f32, size.height as f32),
    )
    .with_up(Vec3::NEG_Z)
}

fn spawn_controller(
    id: ControllerId,
    config: TargetingConfig,
    size: PhysicalSize<u32>,
    registry: &ControllerRegistry,
) -> anyhow::Result<Controller> {
    let controller = TargetingController::builder(id)
        .config(config)
        .camera(overhead_camera(size))
        .activate(registry)
        .with_context(|| format!("activating {id}"))?;
    controller.subscribe(move |ev| {
        log::info!(
            "[click] {} target #{} at ({:.2}, {:.2}, {:.2})",
            ev.controller,
            ev.sequence,
            ev.position.x,
            ev.position.y,
            ev.position.z
        );
    });
    Ok(Rc::new(RefCell::new(controller)))
}

/// Converts a wheel event to a zoom trigger magnitude; scrolling up zooms in.
fn wheel_magnitude(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * WHEEL_LINE_MAGNITUDE,
        MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32),
    }
}

fn fmt_point(p: Option<Vec3>) -> String {
    match p {
        Some(p) => format!("({:.1}, {:.1})", p.x, p.z),
        None => "-".to_string(),
    }
}

fn status_title(a: &ControllerHandle, b: &ControllerHandle, midpoint: Vec3) -> String {
    let target = |h: &ControllerHandle| {
        fmt_point(h.target().and_then(|t| t.active.then_some(t.position)))
    };
    format!(
        "aim | crosshair {} | L {} | R {} | mid ({:.1}, {:.1}) | zoom {:.2}",
        fmt_point(a.crosshair_position()),
        target(a),
        target(b),
        midpoint.x,
        midpoint.z,
        a.zoom().unwrap_or_default()
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let maintain_cam = pointer_mode_from_env()?;

    let event_loop = EventLoop::new().context("creating event loop")?;
    let window = WindowBuilder::new()
        .with_title("aim")
        .with_inner_size(LogicalSize::new(1024.0, 768.0))
        .build(&event_loop)
        .context("creating window")?;
    window.set_cursor_visible(false);
    let size = window.inner_size();

    let registry = ControllerRegistry::new();
    let base = TargetingConfig::default().with_maintain_cam(maintain_cam);
    let left = spawn_controller(PRIMARY, base.clone(), size, &registry)?;
    let right = spawn_controller(SECONDARY, base.with_claim_primary(false), size, &registry)?;
    let left_handle = left.borrow().handle();
    let right_handle = right.borrow().handle();

    let follower: Follower = Rc::new(RefCell::new(MidpointFollower::new(
        left_handle.track(TrackedPoint::Target),
        right_handle.track(TrackedPoint::Target),
        Vec3::ZERO,
    )));

    let mut schedule = FrameSchedule::new();
    schedule.add(Rc::clone(&left));
    schedule.add(Rc::clone(&right));
    schedule.add(Rc::clone(&follower));
    log::info!(
        "[host] {} controller(s) registered, {} scheduled item(s), {} pointer mode",
        registry.len(),
        schedule.len(),
        if maintain_cam { "delta" } else { "direct" }
    );

    // One sampler per controller: pointer and wheel are shared, buttons are not
    let mut left_input = InputSampler::new();
    let mut right_input = InputSampler::new();
    let mut frame_index = 0u64;
    let mut last_tick = Instant::now();
    let mut title = String::new();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(size) => {
                    if size.width == 0 || size.height == 0 {
                        return;
                    }
                    let viewport = Viewport::new(size.width as f32, size.height as f32);
                    for controller in [&left, &right] {
                        controller.borrow_mut().camera_mut().set_viewport(viewport);
                    }
                    log::info!("[host] viewport {}x{}", size.width, size.height);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let p = Vec2::new(position.x as f32, position.y as f32);
                    left_input.pointer_moved(p);
                    right_input.pointer_moved(p);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    let sampler = match button {
                        MouseButton::Left => &mut left_input,
                        MouseButton::Right => &mut right_input,
                        _ => return,
                    };
                    match state {
                        ElementState::Pressed => sampler.select_pressed(),
                        ElementState::Released => sampler.select_released(),
                    }
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let magnitude = wheel_magnitude(delta);
                    left_input.zoom(magnitude);
                    right_input.zoom(magnitude);
                }
                WindowEvent::Focused(focused) => {
                    for controller in [&left, &right] {
                        controller.borrow_mut().set_input_enabled(focused);
                    }
                }
                _ => {}
            },
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => {
                let d = Vec2::new(delta.0 as f32, delta.1 as f32);
                left_input.pointer_motion(d);
                right_input.pointer_motion(d);
            }
            Event::AboutToWait => {
                let now = Instant::now();
                let dt = now - last_tick;
                if dt >= TICK_INTERVAL {
                    last_tick = now;
                    frame_index += 1;
                    let frame = Frame::new(frame_index, dt, InputSnapshot::default())
                        .route(PRIMARY, left_input.snapshot())
                        .route(SECONDARY, right_input.snapshot());
                    schedule.run(&frame);

                    let midpoint = follower.borrow().position();
                    let next = status_title(&left_handle, &right_handle, midpoint);
                    if next != title {
                        window.set_title(&next);
                        title = next;
                    }
                }
                elwt.set_control_flow(ControlFlow::WaitUntil(last_tick + TICK_INTERVAL));
            }
            Event::LoopExiting => {
                for controller in [&left, &right] {
                    controller.borrow_mut().deactivate();
                }
            }
            _ => {}
        })
        .context("running event loop")?;
    Ok(())
}
