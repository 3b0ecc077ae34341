use color_eyre::Result;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    components::Component,
    machine::{self, WizardEvent},
    state::State,
};

/// Bottom bar listing the wizard actions with their keys. Actions whose
/// guard currently rejects the record (or which don't apply to the current
/// screen) are dimmed, mirroring disabled buttons.
pub struct FooterComponent;

impl FooterComponent {
    pub fn new() -> Self {
        Self
    }

    fn hint(label: &'static str, key: &'static str, enabled: bool) -> Vec<Span<'static>> {
        let (key_style, label_style) = if enabled {
            (
                Style::default().add_modifier(Modifier::BOLD),
                Style::default(),
            )
        } else {
            (Style::default().dim(), Style::default().dim())
        };
        vec![
            Span::styled(key, key_style),
            Span::raw(" "),
            Span::styled(label, label_style),
        ]
    }
}

impl Component for FooterComponent {
    fn height_constraint(&self) -> Constraint {
        Constraint::Max(1)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect, state: &State) -> Result<()> {
        let record = &state.record;
        let screen = state.screen;

        let mut spans: Vec<Span<'static>> = Vec::new();
        let actions = [
            ("Back", "Esc", WizardEvent::Back),
            ("Next", "Enter", WizardEvent::Next),
            ("Submit", "Enter", WizardEvent::Submit),
            ("Again", "Enter", WizardEvent::Again),
        ];
        for (label, key, event) in actions {
            spans.extend(Self::hint(label, key, machine::can(screen, event, record)));
            spans.push(Span::raw("  "));
        }
        spans.extend(Self::hint("Quit", "Ctrl-C", true));

        f.render_widget(Paragraph::new(Line::from(spans)).centered(), area);
        Ok(())
    }
}
