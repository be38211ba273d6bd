//! Window management using GLFW
//!
//! Opens an OpenGL-capable window with vsync disabled so presentation never
//! caps the frame rate. Closing the window ends the run; Escape has to be
//! pressed twice in a row.

use std::collections::VecDeque;

use glfw::{Action, Context, Key, WindowEvent};

use crate::platform::{Platform, PlatformError, PlatformEvent};

const QUIT_PROMPT: &str = "Press Escape again to quit";

/// Tracks whether the next Escape press confirms quitting
#[derive(Debug, Default)]
struct QuitConfirmation {
    armed: bool,
}

impl QuitConfirmation {
    fn translate(&mut self, event: &WindowEvent) -> PlatformEvent {
        match event {
            WindowEvent::Close => PlatformEvent::Quit,
            WindowEvent::Key(Key::Escape, _, Action::Press, _) if self.armed => PlatformEvent::Quit,
            WindowEvent::Key(Key::Escape, _, Action::Press, _) => {
                self.armed = true;
                PlatformEvent::Input
            }
            WindowEvent::Key(_, _, Action::Press, _) => {
                self.armed = false;
                PlatformEvent::Input
            }
            WindowEvent::FramebufferSize(width, height) => PlatformEvent::Resized {
                width: u32::try_from(*width).unwrap_or(0),
                height: u32::try_from(*height).unwrap_or(0),
            },
            _ => PlatformEvent::Input,
        }
    }

    const fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Events that close the error report
fn dismisses_error(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::Close | WindowEvent::Key(Key::Escape | Key::Enter, _, Action::Press, _)
    )
}

/// GLFW window wrapper; dropping it destroys the window and terminates GLFW
pub struct GlfwPlatform {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
    pending: VecDeque<PlatformEvent>,
    confirmation: QuitConfirmation,
    quit_sent: bool,
}

impl GlfwPlatform {
    /// Create a fixed-size window with a current OpenGL context
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, PlatformError> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| PlatformError::InitializationFailed(format!("{:?}", e)))?;

        glfw.window_hint(glfw::WindowHint::ContextVersion(3, 3));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        glfw.window_hint(glfw::WindowHint::Resizable(false));

        let (mut window, events) = glfw
            .create_window(width, height, title, glfw::WindowMode::Windowed)
            .ok_or_else(|| PlatformError::CreationFailed(format!("{}x{} \"{}\"", width, height, title)))?;

        window.make_current();
        glfw.set_swap_interval(glfw::SwapInterval::None);

        window.set_key_polling(true);
        window.set_close_polling(true);
        window.set_framebuffer_size_polling(true);

        log::info!("Created {}x{} window \"{}\"", width, height, title);

        Ok(Self {
            glfw,
            window,
            events,
            pending: VecDeque::new(),
            confirmation: QuitConfirmation::default(),
            quit_sent: false,
        })
    }
}

impl Platform for GlfwPlatform {
    fn poll_event(&mut self) -> Option<PlatformEvent> {
        if self.pending.is_empty() {
            self.glfw.poll_events();
            for (_, event) in glfw::flush_messages(&self.events) {
                let was_armed = self.confirmation.is_armed();
                let translated = self.confirmation.translate(&event);
                if !was_armed && self.confirmation.is_armed() {
                    log::info!("{}", QUIT_PROMPT);
                    self.window.set_title(QUIT_PROMPT);
                }
                self.pending.push_back(translated);
            }

            if self.window.should_close() && !self.quit_sent {
                self.pending.push_back(PlatformEvent::Quit);
            }
        }

        let event = self.pending.pop_front();
        if event == Some(PlatformEvent::Quit) {
            self.quit_sent = true;
            self.window.set_should_close(true);
        }
        event
    }

    fn set_title(&mut self, title: &str) {
        log::debug!("{}", title);
        self.window.set_title(title);
    }

    fn width(&self) -> u32 {
        u32::try_from(self.window.get_framebuffer_size().0).unwrap_or(0)
    }

    fn height(&self) -> u32 {
        u32::try_from(self.window.get_framebuffer_size().1).unwrap_or(0)
    }

    fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    /// Shows the message in the title and blocks until the user closes the
    /// window or presses Escape or Enter
    fn show_error(&mut self, title: &str, message: &str) {
        log::error!("{}: {}", title, message);
        self.window.set_title(&format!("{}: {}", title, message));
        self.window.set_should_close(false);

        while !self.window.should_close() {
            self.glfw.wait_events();
            for (_, event) in glfw::flush_messages(&self.events) {
                if dismisses_error(&event) {
                    self.window.set_should_close(true);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glfw::Modifiers;

    fn press(key: Key) -> WindowEvent {
        WindowEvent::Key(key, 0, Action::Press, Modifiers::empty())
    }

    #[test]
    fn test_escape_needs_confirmation() {
        let mut confirmation = QuitConfirmation::default();

        assert_eq!(confirmation.translate(&press(Key::Escape)), PlatformEvent::Input);
        assert!(confirmation.is_armed());
        assert_eq!(confirmation.translate(&press(Key::Escape)), PlatformEvent::Quit);
    }

    #[test]
    fn test_other_key_cancels_pending_quit() {
        let mut confirmation = QuitConfirmation::default();

        confirmation.translate(&press(Key::Escape));
        confirmation.translate(&press(Key::Space));
        assert!(!confirmation.is_armed());
        assert_eq!(confirmation.translate(&press(Key::Escape)), PlatformEvent::Input);
    }

    #[test]
    fn test_close_quits_immediately() {
        let mut confirmation = QuitConfirmation::default();
        assert_eq!(confirmation.translate(&WindowEvent::Close), PlatformEvent::Quit);
    }

    #[test]
    fn test_framebuffer_size_becomes_resize() {
        let mut confirmation = QuitConfirmation::default();
        assert_eq!(
            confirmation.translate(&WindowEvent::FramebufferSize(1024, 768)),
            PlatformEvent::Resized {
                width: 1024,
                height: 768
            }
        );
    }

    #[test]
    fn test_error_report_dismissal_keys() {
        assert!(dismisses_error(&WindowEvent::Close));
        assert!(dismisses_error(&press(Key::Escape)));
        assert!(dismisses_error(&press(Key::Enter)));
        assert!(!dismisses_error(&press(Key::A)));
        assert!(!dismisses_error(&WindowEvent::Key(Key::Enter, 0, Action::Release, Modifiers::empty())));
    }
}
