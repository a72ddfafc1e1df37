//! Terminal front end: ratatui drawing and crossterm input.

use crate::ui::input::{self, Action, Focus};
use crate::ui::MainWindow;
use crate::utils::error::Result;
use crate::window::VideoSurface;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

/// Screen regions that react to the mouse, as of the last draw
#[derive(Debug, Default, Clone, Copy)]
struct HitAreas {
    list: Rect,
    play: Rect,
    stop: Rect,
    position: Rect,
    volume: Rect,
}

/// Leave raw mode and the alternate screen. Safe to call at any time.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

pub struct TerminalUi {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    focus: Focus,
    list_state: ListState,
    areas: HitAreas,
    active: bool,
}

impl TerminalUi {
    /// Take over the terminal
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(e) => {
                restore_terminal();
                return Err(e.into());
            }
        };

        Ok(Self {
            terminal,
            focus: Focus::List,
            list_state: ListState::default(),
            areas: HitAreas::default(),
            active: true,
        })
    }

    /// Give the terminal back to the shell
    pub fn leave(&mut self) {
        if self.active {
            restore_terminal();
            let _ = self.terminal.show_cursor();
            self.active = false;
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Handle every pending terminal event without blocking. Returns true
    /// when the user asked to quit.
    pub fn poll<S: VideoSurface>(&mut self, window: &mut MainWindow<S>) -> Result<bool> {
        while event::poll(Duration::ZERO)? {
            if self.handle_event(event::read()?, window) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Run an action coming from outside the terminal
    pub fn apply<S: VideoSurface>(&mut self, action: Action, window: &mut MainWindow<S>) -> bool {
        input::apply(action, window, &mut self.focus)
    }

    fn handle_event<S: VideoSurface>(&mut self, event: Event, window: &mut MainWindow<S>) -> bool {
        match event {
            Event::Key(key) => {
                match input::map_key(self.focus, &key, window.error_message().is_some()) {
                    Some(action) => self.apply(action, window),
                    None => false,
                }
            }
            Event::Mouse(mouse) if window.error_message().is_none() => {
                self.handle_mouse(mouse, window);
                false
            }
            Event::Mouse(mouse) => {
                if matches!(mouse.kind, MouseEventKind::Down(_)) {
                    window.dismiss_error();
                }
                false
            }
            _ => false,
        }
    }

    fn handle_mouse<S: VideoSurface>(&mut self, mouse: MouseEvent, window: &mut MainWindow<S>) {
        let at = Position::new(mouse.column, mouse.row);
        let areas = self.areas;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if areas.position.contains(at) {
                    let range = window.controls().range();
                    window.begin_seek();
                    window.drag_seek(slider_value(areas.position, mouse.column, range));
                } else if areas.volume.contains(at) {
                    window.set_volume(slider_value(areas.volume, mouse.column, 100));
                } else if areas.play.contains(at) {
                    window.toggle_play_pause();
                } else if areas.stop.contains(at) {
                    window.stop_video();
                } else if areas.list.contains(at) {
                    self.focus = Focus::List;
                    let row = mouse.row.saturating_sub(areas.list.y + 1) as usize;
                    window.list_mut().select(self.list_state.offset() + row);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if window.controls().is_position_slider_pressed() => {
                let range = window.controls().range();
                window.drag_seek(slider_value(areas.position, mouse.column, range));
            }
            MouseEventKind::Up(MouseButton::Left) if window.controls().is_position_slider_pressed() => {
                window.end_seek();
            }
            MouseEventKind::ScrollDown if areas.list.contains(at) => window.list_mut().select_next(),
            MouseEventKind::ScrollUp if areas.list.contains(at) => window.list_mut().select_previous(),
            _ => {}
        }
    }

    pub fn draw<S: VideoSurface>(&mut self, window: &MainWindow<S>) -> Result<()> {
        let Self {
            terminal,
            focus,
            list_state,
            areas,
            ..
        } = self;

        list_state.select(window.list().selected_index());
        terminal.draw(|frame| *areas = render(frame, window, *focus, list_state))?;
        Ok(())
    }
}

impl Drop for TerminalUi {
    fn drop(&mut self) {
        self.leave();
    }
}

/// Slider value under terminal column `column` of a bordered gauge
fn slider_value(area: Rect, column: u16, max: i32) -> i32 {
    let inner_width = area.width.saturating_sub(2);
    if inner_width <= 1 {
        return 0;
    }

    let offset = column.saturating_sub(area.x + 1).min(inner_width - 1);
    (offset as i64 * max as i64 / (inner_width - 1) as i64) as i32
}

fn pane(title: String, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default().borders(Borders::ALL).title(title).border_style(style)
}

fn render<S: VideoSurface>(
    frame: &mut Frame,
    window: &MainWindow<S>,
    focus: Focus,
    list_state: &mut ListState,
) -> HitAreas {
    let [location_area, body, transport, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());
    let [list_area, console_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(body);
    let [play_area, stop_area, position_area, volume_area] = Layout::horizontal([
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Min(20),
        Constraint::Length(24),
    ])
    .areas(transport);

    // location input
    let input = window.location();
    frame.render_widget(
        Paragraph::new(input.text()).block(pane(
            " Location (Enter: open, Ctrl+S: scan page) ".to_string(),
            focus == Focus::Location,
        )),
        location_area,
    );
    if focus == Focus::Location && window.error_message().is_none() {
        let column = location_area.x + 1 + input.cursor() as u16;
        frame.set_cursor_position(Position::new(
            column.min(location_area.right().saturating_sub(2)),
            location_area.y + 1,
        ));
    }

    // discovered videos
    let items: Vec<ListItem> = window
        .list()
        .records()
        .iter()
        .map(|record| {
            ListItem::new(format!(
                "{:<40} {:>10} {:>6}",
                record.name, record.size_display, record.type_tag
            ))
        })
        .collect();
    let title = format!(" Videos: {} ", window.list().title());
    let list = List::new(items)
        .block(pane(title, focus == Focus::List))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, list_area, list_state);

    // debug console
    let visible = console_area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = window
        .console()
        .tail(visible)
        .into_iter()
        .map(|line| {
            if line.starts_with("ERROR: ") {
                Line::styled(line, Style::default().fg(Color::Red))
            } else {
                Line::raw(line)
            }
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(pane(" Debug console ".to_string(), false)),
        console_area,
    );

    // transport
    let controls = window.controls();
    let button = |label: &str| {
        let style = if controls.is_enabled() {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Paragraph::new(label.to_string())
            .style(style)
            .block(Block::default().borders(Borders::ALL))
    };
    frame.render_widget(button(controls.play_label()), play_area);
    frame.render_widget(button("Stop"), stop_area);
    frame.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Position "))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(controls.position_ratio().clamp(0.0, 1.0))
            .label(controls.time_label().to_string()),
        position_area,
    );
    frame.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Volume "))
            .gauge_style(Style::default().fg(Color::Yellow))
            .percent(controls.volume().clamp(0, 100) as u16),
        volume_area,
    );

    frame.render_widget(
        Paragraph::new(format!(
            " {} | Tab: focus  Space: play/pause  s: stop  \u{2190}/\u{2192}: seek  +/-: volume  f: fullscreen  t: sample  q: quit",
            window.status()
        )),
        status_area,
    );

    if let Some(message) = window.error_message() {
        let popup = centered(frame.area(), 60, 7);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(vec![Line::raw(message.to_string()), Line::raw(""), Line::raw("Press any key")])
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Error ")
                        .border_style(Style::default().fg(Color::Red)),
                ),
            popup,
        );
    }

    HitAreas {
        list: list_area,
        play: play_area,
        stop: stop_area,
        position: position_area,
        volume: volume_area,
    }
}

/// A `width` x `height` box in the middle of `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
