//! FormApp: runs a built form in the terminal until it is submitted,
//! cancelled or quit.
//!
//! [`FormApp::new_headless`] skips the terminal entirely so the same input
//! handling can be driven from tests.

use std::io;
use std::time::Duration;

use crossterm::event;
use tracing::{info, warn};

use crate::backend::terminal::FormAction;
use crate::backend::{ButtonRole, TerminalBackend};
use crate::codec::FormData;
use crate::config::FormConfig;
use crate::controller::FormController;
use crate::error::FormError;
use crate::event::input::InputEvent;
use crate::render::compositor::Compositor;
use crate::render::driver::Driver;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Stop after a successful submit.
    pub exit_on_submit: bool,
    /// Stop after cancel.
    pub exit_on_cancel: bool,
    /// How long to wait for input before redrawing.
    pub poll_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            exit_on_submit: true,
            exit_on_cancel: true,
            poll_interval: Duration::from_millis(250),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exit_on_submit(mut self, exit: bool) -> Self {
        self.exit_on_submit = exit;
        self
    }

    pub fn with_exit_on_cancel(mut self, exit: bool) -> Self {
        self.exit_on_cancel = exit;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

// ---------------------------------------------------------------------------
// FormApp
// ---------------------------------------------------------------------------

/// How an interactive session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum FormResult {
    Submitted(FormData),
    Cancelled,
    /// Closed with Ctrl+C, or Esc on a form without a cancel button.
    Quit,
}

pub struct FormApp {
    controller: FormController<TerminalBackend>,
    driver: Option<Driver>,
    config: AppConfig,
    size: (u16, u16),
    running: bool,
    result: Option<FormResult>,
}

impl FormApp {
    /// Build `form` on a terminal backend, sized to the current terminal.
    pub fn new(form: FormConfig, config: AppConfig) -> Result<Self, FormError> {
        let size = Driver::terminal_size()?;
        let controller = FormController::with_config(TerminalBackend::new(), form)?;
        Ok(Self::from_controller(controller, config, size, Some(Driver::new())))
    }

    /// Build `form` without touching the terminal.
    pub fn new_headless(form: FormConfig, width: u16, height: u16) -> Result<Self, FormError> {
        let controller = FormController::with_config(TerminalBackend::new(), form)?;
        Ok(Self::from_controller(
            controller,
            AppConfig::default(),
            (width, height),
            None,
        ))
    }

    fn from_controller(
        controller: FormController<TerminalBackend>,
        config: AppConfig,
        size: (u16, u16),
        driver: Option<Driver>,
    ) -> Self {
        Self {
            controller,
            driver,
            config,
            size,
            running: true,
            result: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn controller(&self) -> &FormController<TerminalBackend> {
        &self.controller
    }

    /// Register callbacks or pre-fill values before running.
    pub fn controller_mut(&mut self) -> &mut FormController<TerminalBackend> {
        &mut self.controller
    }

    pub fn has_driver(&self) -> bool {
        self.driver.is_some()
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn should_quit(&self) -> bool {
        !self.running
    }

    /// How the session ended, once it has.
    pub fn result(&self) -> Option<&FormResult> {
        self.result.as_ref()
    }

    fn finish(&mut self, result: FormResult) {
        self.result = Some(result);
        self.running = false;
    }

    /// Apply one input event.
    ///
    /// Validation and callback failures are shown in the footer and keep the
    /// form open; anything else is returned.
    pub fn handle_input(&mut self, input: InputEvent) -> Result<(), FormError> {
        let action = match input {
            InputEvent::Key(key) => self.controller.factory_mut().handle_key(key),
            InputEvent::Paste(text) => self.controller.factory_mut().paste(&text),
            InputEvent::Resize { width, height } => {
                self.size = (width, height);
                None
            }
        };
        match action {
            Some(action) => self.dispatch(action),
            None => Ok(()),
        }
    }

    fn dispatch(&mut self, action: FormAction) -> Result<(), FormError> {
        let outcome = match action {
            FormAction::Changed(handle) => self.controller.notify_changed(handle),
            FormAction::Quit => {
                self.finish(FormResult::Quit);
                Ok(())
            }
            FormAction::Press(ButtonRole::Submit) => match self.controller.submit() {
                Ok(data) if self.config.exit_on_submit => {
                    self.finish(FormResult::Submitted(data));
                    Ok(())
                }
                Ok(_) => {
                    self.controller.factory_mut().set_status("Submitted");
                    Ok(())
                }
                Err(err) => Err(err),
            },
            FormAction::Press(ButtonRole::Cancel) => self.controller.cancel().map(|()| {
                if self.config.exit_on_cancel {
                    self.finish(FormResult::Cancelled);
                }
            }),
            FormAction::Press(ButtonRole::Custom(name)) => self.controller.press(&name),
        };

        match outcome {
            Err(FormError::Validation(err)) => {
                if let Some(handle) = err.missing.first().and_then(|n| self.controller.handle(n)) {
                    self.controller.factory_mut().focus_widget(handle);
                }
                self.controller
                    .factory_mut()
                    .set_error(format!("Required: {}", err.missing.join(", ")));
                Ok(())
            }
            Err(FormError::Callback { action, source }) => {
                warn!(%action, error = %source, "callback failed");
                self.controller
                    .factory_mut()
                    .set_error(format!("{action} failed: {source}"));
                Ok(())
            }
            other => other,
        }
    }

    /// Draw the current frame.
    pub fn render(&mut self) -> Option<&Compositor> {
        let (width, height) = self.size;
        self.controller.factory_mut().render(width, height)
    }

    /// Take over the terminal until the form is submitted, cancelled or quit.
    pub fn run(mut self) -> Result<FormResult, FormError> {
        let mut driver = self.driver.take().unwrap_or_default();
        let result = take_over(&mut driver, Driver::enter, Driver::leave, |driver| {
            if let Some(form) = self.controller.config() {
                driver.set_title(&form.window.title)?;
            }
            self.event_loop(driver)
        })?;
        info!(?result, "form closed");
        Ok(result)
    }

    fn event_loop(&mut self, driver: &mut Driver) -> Result<FormResult, FormError> {
        self.size = Driver::terminal_size()?;
        let mut previous = Compositor::new(0, 0);
        while self.running {
            if let Some(frame) = self.render() {
                driver.apply_updates(&frame.diff(&previous))?;
                driver.flush()?;
                previous = frame.clone();
            }
            if event::poll(self.config.poll_interval)? {
                if let Some(input) = InputEvent::from_crossterm(event::read()?) {
                    self.handle_input(input)?;
                }
            }
        }
        Ok(self.result.take().unwrap_or(FormResult::Quit))
    }
}

/// Run `body` between `enter` and `leave`. Once `enter` succeeds, `leave`
/// runs whatever `body` returns; the body's error wins over the restore error.
fn take_over<D, T>(
    driver: &mut D,
    enter: impl FnOnce(&mut D) -> io::Result<()>,
    leave: impl FnOnce(&mut D) -> io::Result<()>,
    body: impl FnOnce(&mut D) -> Result<T, FormError>,
) -> Result<T, FormError> {
    enter(driver)?;
    let outcome = body(driver);
    let restored = leave(driver);
    let value = outcome?;
    restored?;
    Ok(value)
}

/// Show `form` in the terminal with default settings and return how it ended.
pub fn run_form(form: FormConfig) -> Result<FormResult, FormError> {
    FormApp::new(form, AppConfig::default())?.run()
}

// ===========================================================================
// Tests
// ===========================================================================
