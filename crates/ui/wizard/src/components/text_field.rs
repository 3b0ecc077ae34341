use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::backend::crossterm::EventHandler as _;
use tui_input::Input;

use crate::state::State;

/// A single-line labeled text editor with an inline validation message.
///
/// Not a [`crate::components::Component`]: pages own a group of fields and
/// route focus and key events themselves. Edits are written straight into
/// the shared record; validation messages only show once a field was
/// touched.
pub struct TextField {
    key: &'static str,
    label: &'static str,
    max_len: Option<usize>,
    input: Input,
    focused: bool,
    touched: bool,
}

/// Rows a field occupies when drawn: label, value, message.
pub const FIELD_HEIGHT: u16 = 3;

impl TextField {
    pub fn new(key: &'static str, label: &'static str, max_len: Option<usize>) -> Self {
        Self {
            key,
            label,
            max_len,
            input: Input::default(),
            focused: false,
            touched: false,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn touched(&self) -> bool {
        self.touched
    }

    /// Adopt the record's current value, e.g. when the screen is (re)entered
    /// or the record was reset. An untouched editor also forgets its
    /// touched flag on reset to a blank value.
    pub fn sync(&mut self, value: &str) {
        if self.input.value() != value {
            self.input = Input::new(value.to_string());
            if value.is_empty() {
                self.touched = false;
            }
        }
    }

    /// Feed a key into the editor. Returns true when the value changed;
    /// the new value is already written into `state.record`.
    pub fn handle_key(&mut self, key: KeyEvent, state: &mut State) -> bool {
        if let Some(max) = self.max_len {
            // Enforce the cap before the editor sees the keystroke.
            let at_cap = self.input.value().chars().count() >= max;
            let inserts = matches!(key.code, KeyCode::Char(_))
                && !key.modifiers.contains(KeyModifiers::CONTROL);
            if at_cap && inserts {
                return false;
            }
        }

        let changed = self
            .input
            .handle_event(&crossterm::event::Event::Key(key))
            .map(|change| change.value)
            .unwrap_or(false);
        if changed {
            self.touched = true;
            state.record.set_value(self.key, self.input.value());
        }
        changed
    }

    pub fn draw(&self, f: &mut Frame<'_>, area: Rect, error: Option<&str>) {
        let label_style = if self.focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(self.label, label_style))),
            Rect { height: 1, ..area },
        );

        let input_area = Rect {
            y: area.y + 1,
            height: 1,
            ..area
        };
        let width = input_area.width.max(3) - 3;
        let scroll = self.input.visual_scroll(width as usize);
        let prompt = Paragraph::new(format!("> {}", self.input.value())).scroll((0, scroll as u16));
        f.render_widget(prompt, input_area);
        if self.focused {
            let cursor = (self.input.visual_cursor().max(scroll) - scroll) as u16;
            f.set_cursor_position(Position::new(input_area.x + 2 + cursor, input_area.y));
        }

        if let (true, Some(message)) = (self.touched, error) {
            let message_area = Rect {
                y: area.y + 2,
                height: 1,
                ..area
            };
            f.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    message,
                    Style::default().fg(Color::Red),
                ))),
                message_area,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::Screen;
    use crate::record::EnrollmentRecord;

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn edits_are_written_into_the_record() {
        let mut state = State::new(EnrollmentRecord::default(), Screen::Contact);
        let mut field = TextField::new("phone", "Phone", Some(9));

        assert!(field.handle_key(press('1'), &mut state));
        assert!(field.handle_key(press('2'), &mut state));
        assert_eq!(state.record.phone, "12");
        assert!(field.touched());
    }

    #[test]
    fn max_len_caps_inserts() {
        let mut state = State::new(EnrollmentRecord::default(), Screen::Contact);
        let mut field = TextField::new("phone", "Phone", Some(3));

        for c in ['1', '2', '3', '4', '5'] {
            field.handle_key(press(c), &mut state);
        }
        assert_eq!(state.record.phone, "123");

        // Deletion still works at the cap.
        assert!(field.handle_key(
            KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE),
            &mut state
        ));
        assert_eq!(state.record.phone, "12");
    }

    #[test]
    fn sync_adopts_record_values() {
        let mut state = State::new(EnrollmentRecord::default(), Screen::Contact);
        let mut field = TextField::new("email", "Email", None);

        field.handle_key(press('x'), &mut state);
        field.sync("jane@example.com");
        assert!(field.touched());

        field.sync("");
        assert!(!field.touched());
    }
}
