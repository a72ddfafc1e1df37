//! Winit application handler
//!
//! One thread runs everything. The loop sleeps until either the next
//! position poll or the next terminal refresh is due, whichever is first.

use crate::ui::{MainWindow, TerminalUi};
use crate::window::{EventHandler, WinitSurface};
use log::{error, info};
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::WindowId;

/// How often terminal input is polled and the controls redrawn
const UI_TICK: Duration = Duration::from_millis(33);

pub struct PlayerApp {
    window: MainWindow<WinitSurface>,
    terminal: TerminalUi,
    events: EventHandler,

    /// Location to open once the video window exists
    pending: Option<String>,
}

impl PlayerApp {
    pub fn new(window: MainWindow<WinitSurface>, terminal: TerminalUi, location: Option<String>) -> Self {
        Self {
            window,
            terminal,
            events: EventHandler::new(),
            pending: location,
        }
    }

    /// Tear down the window and hand the terminal back
    pub fn shutdown(&mut self) {
        self.window.close();
        self.terminal.leave();
    }

    pub fn main_window(&self) -> &MainWindow<WinitSurface> {
        &self.window
    }

    fn quit(&mut self, event_loop: &ActiveEventLoop) {
        info!("Quit requested");
        self.window.close();
        event_loop.exit();
    }
}

impl ApplicationHandler for PlayerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.surface().is_created() {
            return;
        }

        if let Err(e) = self.window.surface_mut().create(event_loop) {
            self.window.show_error(e.to_string());
        }

        if let Some(location) = self.pending.take() {
            self.window.open(&location);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.window.surface().id() != Some(window_id) {
            return;
        }

        if let Some(action) = self.events.handle_event(&event, Instant::now()) {
            if self.terminal.apply(action, &mut self.window) {
                self.quit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_closed() {
            return;
        }

        match self.terminal.poll(&mut self.window) {
            Ok(false) => {}
            Ok(true) => {
                self.quit(event_loop);
                return;
            }
            Err(e) => {
                error!("Terminal input error: {}", e);
                self.quit(event_loop);
                return;
            }
        }

        let now = Instant::now();
        if let Some(action) = self.events.expire_click(now) {
            if self.terminal.apply(action, &mut self.window) {
                self.quit(event_loop);
                return;
            }
        }
        self.window.tick(now);

        if let Err(e) = self.terminal.draw(&self.window) {
            error!("Terminal draw error: {}", e);
            self.quit(event_loop);
            return;
        }

        let wake = [self.window.next_tick(), self.events.click_deadline()]
            .into_iter()
            .flatten()
            .fold(now + UI_TICK, Instant::min);
        event_loop.set_control_flow(ControlFlow::WaitUntil(wake));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.window.close();
    }
}
