use anyhow::Result;
use log::{info, warn};
use rusted_input::engine::input::{
    ActionValue, BindingProfile, DeviceBackends, DeviceEvent, DeviceKind, InputManager, Trigger,
    WinitRouter,
};
use rusted_input::game::{self, FIRE, MENU, MOVE};
use std::time::{Duration, Instant};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

/// Time between input ticks
const FRAME_TIME: Duration = Duration::from_millis(16);

#[cfg(feature = "gilrs")]
fn attach_gamepad(backends: DeviceBackends) -> (DeviceBackends, bool) {
    use rusted_input::engine::input::GilrsBackend;

    match GilrsBackend::new() {
        Ok(gamepad) => (backends.with_gamepad(gamepad), true),
        Err(e) => {
            warn!("Gamepad support disabled: {}", e);
            (backends, false)
        }
    }
}

#[cfg(not(feature = "gilrs"))]
fn attach_gamepad(backends: DeviceBackends) -> (DeviceBackends, bool) {
    (backends, false)
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting Rusted Input demo...");

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Rusted Input")
        .with_inner_size(winit::dpi::LogicalSize::new(800, 600))
        .build(&event_loop)?;

    // Wire devices
    let (router, keyboard, mouse) = WinitRouter::new();
    let backends = DeviceBackends::new().with_keyboard(keyboard).with_mouse(mouse);
    let (backends, with_gamepad) = attach_gamepad(backends);

    let mut input = match std::env::args().nth(1) {
        Some(path) => {
            let (catalog, table) = BindingProfile::load(&path)?.build()?;
            InputManager::new(&catalog, table, backends)?
        }
        None => InputManager::from_table(game::default_bindings(with_gamepad), backends)?,
    };

    // Demo reactions; a custom profile may not declare every action
    let hooks = [
        input.on_performed(FIRE, Trigger::JustPressed, || info!("Fire!")),
        input.on_performed(FIRE, Trigger::JustReleased, || info!("Fire released")),
        input.subscribe(MOVE, |state| {
            if let ActionValue::Vector(direction) = state.value {
                info!("Move: ({:.2}, {:.2})", direction.x, direction.y);
            }
        }),
    ];
    for hook in hooks {
        if let Err(e) = hook {
            warn!("Demo hook not installed: {}", e);
        }
    }
    if input.device(DeviceKind::Gamepad).is_some() {
        input.add_device_listener(DeviceKind::Gamepad, |event| {
            if let DeviceEvent::Gamepad(gamepad) = event {
                info!("Gamepad event: {:?}", gamepad);
            }
        })?;
    }

    info!("Ready: Space/click to fire, WASD/arrows to move, Escape to quit");

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => {
                if router.handle_window_event(&event) {
                    return;
                }
                if let WindowEvent::CloseRequested = event {
                    info!("Close requested, shutting down...");
                    elwt.exit();
                }
            }
            Event::AboutToWait => {
                input.tick();
                if input.just_pressed(MENU) {
                    info!("Menu pressed, shutting down...");
                    elwt.exit();
                }
                window.request_redraw();
                elwt.set_control_flow(ControlFlow::WaitUntil(Instant::now() + FRAME_TIME));
            }
            Event::LoopExiting => {
                info!("Processed {} input tick(s)", input.tick_count());
                input.dispose();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
