//! glfw window presenter
//!
//! Owns a window with a current GL context so buffer swaps wait for vsync.
//! The title bar doubles as the status line.

use super::{FrameView, PresentError, Presenter};
use crate::application::AppEvent;
use crate::core::PresentationConfig;
use crate::input::KeyCode;
use glfw::{Action, Context, Key, WindowEvent};

/// Presenter backed by a glfw window
pub struct WindowPresenter {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
    title: String,
}

impl WindowPresenter {
    /// Open a window
    pub fn new(config: &PresentationConfig) -> Result<Self, PresentError> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| PresentError::InitializationFailed(format!("{:?}", e)))?;
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or(PresentError::CreationFailed)?;

        window.make_current();
        glfw.set_swap_interval(glfw::SwapInterval::Sync(1));
        window.set_key_polling(true);
        window.set_close_polling(true);

        log::info!("Opened {}x{} window", config.width, config.height);
        Ok(Self {
            glfw,
            window,
            events,
            title: config.title.clone(),
        })
    }
}

impl Presenter for WindowPresenter {
    fn poll_events(&mut self) -> Vec<AppEvent> {
        self.glfw.poll_events();
        let mut events = Vec::new();
        for (_, event) in glfw::flush_messages(&self.events) {
            match event {
                WindowEvent::Key(key, _, Action::Press, _) => {
                    if let Some(key) = map_key(key) {
                        events.push(AppEvent::KeyPressed(key));
                    }
                }
                WindowEvent::Close => events.push(AppEvent::CloseRequested),
                _ => {}
            }
        }
        if self.window.should_close() && !events.contains(&AppEvent::CloseRequested) {
            events.push(AppEvent::CloseRequested);
        }
        events
    }

    fn present(&mut self, _frame: &FrameView<'_>) -> Result<(), PresentError> {
        self.window.swap_buffers();
        Ok(())
    }

    fn show_message(&mut self, message: &str) {
        self.window.set_title(&format!("{} - {}", self.title, message));
        eprintln!("{}", message);
    }

    fn set_status(&mut self, status: &str) {
        self.window.set_title(&format!("{} - {}", self.title, status));
    }
}

fn map_key(key: Key) -> Option<KeyCode> {
    let mapped = match key {
        Key::A => KeyCode::A,
        Key::B => KeyCode::B,
        Key::C => KeyCode::C,
        Key::D => KeyCode::D,
        Key::E => KeyCode::E,
        Key::F => KeyCode::F,
        Key::G => KeyCode::G,
        Key::H => KeyCode::H,
        Key::I => KeyCode::I,
        Key::J => KeyCode::J,
        Key::K => KeyCode::K,
        Key::L => KeyCode::L,
        Key::M => KeyCode::M,
        Key::N => KeyCode::N,
        Key::O => KeyCode::O,
        Key::P => KeyCode::P,
        Key::Q => KeyCode::Q,
        Key::R => KeyCode::R,
        Key::S => KeyCode::S,
        Key::T => KeyCode::T,
        Key::U => KeyCode::U,
        Key::V => KeyCode::V,
        Key::W => KeyCode::W,
        Key::X => KeyCode::X,
        Key::Y => KeyCode::Y,
        Key::Z => KeyCode::Z,
        Key::Num0 => KeyCode::Num0,
        Key::Num1 => KeyCode::Num1,
        Key::Num2 => KeyCode::Num2,
        Key::Num3 => KeyCode::Num3,
        Key::Num4 => KeyCode::Num4,
        Key::Num5 => KeyCode::Num5,
        Key::Num6 => KeyCode::Num6,
        Key::Num7 => KeyCode::Num7,
        Key::Num8 => KeyCode::Num8,
        Key::Num9 => KeyCode::Num9,
        Key::Space => KeyCode::Space,
        Key::Enter => KeyCode::Enter,
        Key::Escape => KeyCode::Escape,
        Key::Up => KeyCode::Up,
        Key::Down => KeyCode::Down,
        Key::Left => KeyCode::Left,
        Key::Right => KeyCode::Right,
        _ => return None,
    };
    Some(mapped)
}
