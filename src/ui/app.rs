//! Main application UI
//!
//! The main menu and the running game session.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::input::{is_modifier_only, InputEvent};
use crate::data::DataManager;
use crate::ecs::Position;
use crate::game::{Engine, LoopControl, Session};
use crate::render::to_color;
use crate::save;
use crate::world::RoomsGenerator;

/// Screen cell where map tile (0, 0) is drawn
pub const MAP_ORIGIN: Position = Position { x: 0, y: 0 };

/// Main application state
pub struct App {
    data: Arc<DataManager>,
    save_path: PathBuf,
    /// The game being played, if we are past the main menu
    session: Option<Session>,
    /// Popup over the main menu
    menu_message: Option<String>,
}

impl App {
    pub fn new(data: Arc<DataManager>) -> Self {
        Self::with_save_path(data, save::save_path())
    }

    pub fn with_save_path(data: Arc<DataManager>, save_path: PathBuf) -> Self {
        Self {
            data,
            save_path,
            session: None,
            menu_message: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Handle one terminal event. Returns true when the app should exit.
    pub fn handle_event(&mut self, event: &Event) -> Result<bool> {
        let Some(mut input) = InputEvent::from_terminal(event, MAP_ORIGIN) else {
            return Ok(false);
        };
        // Global quit shortcut
        if let InputEvent::Key(key) = input {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                input = InputEvent::Quit;
            }
        }

        match self.session.as_mut() {
            Some(session) => {
                let control = session.handle_event(&input);
                self.handle_loop_control(control)
            }
            None => match input {
                InputEvent::Key(key) => self.handle_main_menu_input(key),
                InputEvent::Quit => Ok(true),
                _ => Ok(false),
            },
        }
    }

    fn handle_loop_control(&mut self, control: LoopControl) -> Result<bool> {
        match control {
            LoopControl::Continue => Ok(false),
            LoopControl::Quit { save } => {
                self.quit_session(save)?;
                Ok(true)
            }
        }
    }

    /// Save the running game, or remove a stale save after death
    fn quit_session(&mut self, save: bool) -> Result<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        if save {
            save::save_to_path(&session, &self.save_path)?;
            log::info!("Game saved to {}", self.save_path.display());
        } else {
            save::delete_save(&self.save_path)?;
        }
        Ok(())
    }

    fn handle_main_menu_input(&mut self, key: KeyEvent) -> Result<bool> {
        if is_modifier_only(&key) {
            return Ok(false);
        }
        if self.menu_message.take().is_some() {
            return Ok(false);
        }

        match key.code {
            KeyCode::Char('n') | KeyCode::Char('N') => {
                let engine = Engine::new_game(self.data.clone(), Box::new(RoomsGenerator), None)?;
                self.session = Some(Session::new(engine));
            }
            KeyCode::Char('c') | KeyCode::Char('C') => self.continue_game(),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(true),
            _ => {}
        }
        Ok(false)
    }

    fn continue_game(&mut self) {
        if !save::save_exists(&self.save_path) {
            self.menu_message = Some("No saved game to load.".to_string());
            return;
        }
        match save::load_from_path(&self.save_path, self.data.clone(), Box::new(RoomsGenerator)) {
            Ok(session) => self.session = Some(session),
            Err(e) => {
                log::warn!("Failed to load save: {}", e);
                self.menu_message = Some(format!("Failed to load save: {}", e));
            }
        }
    }

    /// Save on the way out if a game is still running
    pub fn shutdown(&mut self) -> Result<()> {
        let save = self.session.as_ref().is_some_and(|s| !s.engine().player_is_dead());
        self.quit_session(save)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn render(&self, frame: &mut Frame) {
        frame.render_widget(Clear, frame.area());

        match &self.session {
            Some(session) => session.render(frame.buffer_mut()),
            None => self.render_main_menu(frame),
        }
    }

    fn render_main_menu(&self, frame: &mut Frame) {
        let area = frame.area();
        let palette = &self.data.config.palette;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ])
            .split(area);

        let title = vec![
            Line::from(""),
            Line::from(Span::styled(
                "TOMBS OF THE FORGOTTEN KINGS",
                Style::default().fg(to_color(palette.menu_title)).add_modifier(Modifier::BOLD),
            )),
        ];
        let title_para = Paragraph::new(title).alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(title_para, chunks[0]);

        let menu_style = Style::default().fg(to_color(palette.menu_text));
        let menu = vec![
            Line::from(Span::styled("[N] Play a new game", menu_style)),
            Line::from(Span::styled("[C] Continue last game", menu_style)),
            Line::from(Span::styled("[Q] Quit", menu_style)),
        ];
        let menu_para = Paragraph::new(menu).alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(menu_para, chunks[1]);

        let version = Paragraph::new(format!("v{}", env!("CARGO_PKG_VERSION")))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(version, chunks[2]);

        if let Some(message) = &self.menu_message {
            let popup = centered_rect(50, 20, area);
            frame.render_widget(Clear, popup);
            let text = Paragraph::new(message.as_str())
                .alignment(ratatui::layout::Alignment::Center)
                .block(Block::default().borders(Borders::ALL))
                .style(Style::default().fg(to_color(palette.white)));
            frame.render_widget(text, popup);
        }
    }
}

/// Create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
