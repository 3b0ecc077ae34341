use color_eyre::Result;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{action::Action, state::State};

use super::Page;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Placeholder shown while persisted state is inspected. The spinner
/// advances on application ticks.
pub struct LoadingPage {
    frame: usize,
}

impl LoadingPage {
    pub fn new() -> Self {
        Self { frame: 0 }
    }
}

impl Page for LoadingPage {
    fn name(&self) -> &str {
        "loading"
    }

    fn update(&mut self, action: Action, _state: &mut State) -> Result<Option<Action>> {
        if action == Action::Tick {
            self.frame = self.frame.wrapping_add(1);
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _state: &State) -> Result<()> {
        let vertical = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);

        let spinner = SPINNER[self.frame % SPINNER.len()];
        let line = Line::from(vec![
            Span::styled(spinner, Style::default().bold()),
            Span::raw(" Loading form"),
        ]);
        frame.render_widget(Paragraph::new(line).centered(), vertical[1]);
        Ok(())
    }
}
