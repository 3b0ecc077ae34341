use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Style, Stylize},
    widgets::Paragraph,
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::{action::Action, state::State, tui::EventResponse};

use super::Page;

/// Terminal screen of a completed enrollment. AGAIN starts a fresh one.
pub struct SuccessPage;

impl SuccessPage {
    pub fn new() -> Self {
        Self
    }
}

impl Page for SuccessPage {
    fn name(&self) -> &str {
        "success"
    }

    fn handle_key_events(
        &mut self,
        key: KeyEvent,
        _state: &mut State,
    ) -> Result<Option<EventResponse<Action>>> {
        let response = match key.code {
            KeyCode::Enter => Some(EventResponse::Stop(Action::Again)),
            _ => None,
        };
        Ok(response)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _state: &State) -> Result<()> {
        let vertical = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(4),
            Constraint::Length(2),
            Constraint::Fill(1),
        ])
        .split(area);

        let banner = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .style(Style::default().bold())
            .lines(vec!["Success".into()])
            .alignment(Alignment::Center)
            .build();
        frame.render_widget(banner, vertical[1]);

        frame.render_widget(
            Paragraph::new("Enrollment submitted. Press Enter to enroll another.")
                .centered()
                .dim(),
            vertical[2],
        );
        Ok(())
    }
}
