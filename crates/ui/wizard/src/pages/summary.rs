use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::Action,
    record::{contact_schema, personal_schema, FieldSchema},
    state::State,
    tui::EventResponse,
};

use super::Page;

const SUMMARY_WIDTH: u16 = 48;

/// Read-only listing of everything collected so far, one section per
/// data-entry screen, labels left and values right.
pub struct SummaryPage;

impl SummaryPage {
    pub fn new() -> Self {
        Self
    }

    fn section(lines: &mut Vec<Line<'static>>, schema: &FieldSchema, state: &State) {
        lines.push(Line::from(Span::styled(
            schema.title,
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        for field in &schema.fields {
            let value = state.record.value(field.key).to_string();
            lines.push(Line::from(vec![
                Span::styled(format!("{:<12}", field.label), Style::default().dim()),
                Span::raw(value),
            ]));
        }
        lines.push(Line::raw(""));
    }
}

impl Page for SummaryPage {
    fn name(&self) -> &str {
        "summary"
    }

    fn handle_key_events(
        &mut self,
        key: KeyEvent,
        _state: &mut State,
    ) -> Result<Option<EventResponse<Action>>> {
        let response = match key.code {
            KeyCode::Enter => Some(EventResponse::Stop(Action::Submit)),
            KeyCode::Esc => Some(EventResponse::Stop(Action::Back)),
            _ => None,
        };
        Ok(response)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &State) -> Result<()> {
        let mut lines = vec![
            Line::from(Span::styled(
                "Summary",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
        ];
        Self::section(&mut lines, &contact_schema(), state);
        Self::section(&mut lines, &personal_schema(), state);

        let height = lines.len() as u16;
        let vertical = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
        let horizontal = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(SUMMARY_WIDTH),
            Constraint::Fill(1),
        ])
        .split(vertical[1]);

        frame.render_widget(Paragraph::new(lines), horizontal[1]);
        Ok(())
    }
}
