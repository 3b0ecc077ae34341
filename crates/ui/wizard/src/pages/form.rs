use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::Action,
    components::text_field::{TextField, FIELD_HEIGHT},
    record::FieldSchema,
    state::State,
    tui::EventResponse,
};

use super::Page;

const FORM_WIDTH: u16 = 48;
/// One blank row between stacked fields.
const FIELD_STRIDE: u16 = FIELD_HEIGHT + 1;

/// A data-entry screen: a titled stack of labeled text fields driven by one
/// of the record's field schemas. Both the contact and the personal screen
/// are instances of this page.
pub struct FormPage {
    name: &'static str,
    schema: fn() -> FieldSchema,
    fields: Vec<TextField>,
    focus: usize,
}

impl FormPage {
    pub fn contact() -> Self {
        Self::from_schema("contact", crate::record::contact_schema)
    }

    pub fn personal() -> Self {
        Self::from_schema("personal", crate::record::personal_schema)
    }

    fn from_schema(name: &'static str, schema: fn() -> FieldSchema) -> Self {
        let fields = schema()
            .fields
            .iter()
            .map(|field| TextField::new(field.key, field.label, field.max_len))
            .collect();
        let mut page = Self {
            name,
            schema,
            fields,
            focus: 0,
        };
        page.apply_focus();
        page
    }

    fn apply_focus(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.set_focused(i == self.focus);
        }
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
        self.apply_focus();
    }

    fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        self.apply_focus();
    }
}

impl Page for FormPage {
    fn name(&self) -> &str {
        self.name
    }

    fn on_enter(&mut self, state: &State) -> Result<()> {
        for field in self.fields.iter_mut() {
            field.sync(state.record.value(field.key()));
        }
        self.focus = 0;
        self.apply_focus();
        Ok(())
    }

    fn handle_key_events(
        &mut self,
        key: KeyEvent,
        state: &mut State,
    ) -> Result<Option<EventResponse<Action>>> {
        let response = match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus_prev();
                None
            }
            KeyCode::Enter => Some(EventResponse::Stop(Action::Next)),
            KeyCode::Esc => Some(EventResponse::Stop(Action::Back)),
            _ => {
                let changed = self.fields[self.focus].handle_key(key, state);
                changed.then_some(EventResponse::Continue(Action::Update))
            }
        };
        Ok(response)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &State) -> Result<()> {
        let schema = (self.schema)();
        let errors = schema.validate(&state.record);

        let height = 2 + FIELD_STRIDE * self.fields.len() as u16;
        let vertical = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
        let horizontal = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(FORM_WIDTH),
            Constraint::Fill(1),
        ])
        .split(vertical[1]);
        let body = horizontal[1];
        if body.height == 0 {
            return Ok(());
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                schema.title,
                Style::default().add_modifier(Modifier::BOLD),
            ))),
            Rect { height: 1, ..body },
        );

        for (i, field) in self.fields.iter().enumerate() {
            let field_area = Rect {
                y: body.y + 2 + FIELD_STRIDE * i as u16,
                height: FIELD_HEIGHT,
                ..body
            };
            // The layout may hand us less than the requested height.
            if field_area.bottom() > body.bottom() {
                break;
            }
            field.draw(frame, field_area, errors.get(field.key()).map(String::as_str));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::Screen;
    use crate::record::EnrollmentRecord;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_requests_next_and_esc_requests_back() {
        let mut page = FormPage::contact();
        let mut state = State::new(EnrollmentRecord::default(), Screen::Contact);

        assert_eq!(
            page.handle_key_events(key(KeyCode::Enter), &mut state).unwrap(),
            Some(EventResponse::Stop(Action::Next))
        );
        assert_eq!(
            page.handle_key_events(key(KeyCode::Esc), &mut state).unwrap(),
            Some(EventResponse::Stop(Action::Back))
        );
    }

    #[test]
    fn typing_edits_the_focused_field_and_requests_persistence() {
        let mut page = FormPage::personal();
        let mut state = State::new(EnrollmentRecord::default(), Screen::Personal);

        let response = page
            .handle_key_events(key(KeyCode::Char('J')), &mut state)
            .unwrap();
        assert_eq!(response, Some(EventResponse::Continue(Action::Update)));
        assert_eq!(state.record.first_name, "J");

        page.handle_key_events(key(KeyCode::Tab), &mut state).unwrap();
        page.handle_key_events(key(KeyCode::Char('D')), &mut state).unwrap();
        assert_eq!(state.record.last_name, "D");
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        let mut page = FormPage::contact();
        let mut state = State::new(EnrollmentRecord::default(), Screen::Contact);

        assert!(page.fields[0].is_focused());
        page.handle_key_events(key(KeyCode::Tab), &mut state).unwrap();
        assert!(page.fields[1].is_focused());
        page.handle_key_events(key(KeyCode::Tab), &mut state).unwrap();
        assert!(page.fields[0].is_focused());
        page.handle_key_events(key(KeyCode::BackTab), &mut state).unwrap();
        assert!(page.fields[1].is_focused());
    }

    #[test]
    fn on_enter_adopts_the_record() {
        let mut page = FormPage::contact();
        let mut record = EnrollmentRecord::default();
        record.phone = "123456789".into();
        let state = State::new(record, Screen::Contact);

        page.on_enter(&state).unwrap();
        // A later reset must clear the editors as well.
        let cleared = State::new(EnrollmentRecord::default(), Screen::Contact);
        page.on_enter(&cleared).unwrap();
        let mut state = cleared;
        page.handle_key_events(key(KeyCode::Char('9')), &mut state).unwrap();
        assert_eq!(state.record.phone, "9");
    }
}
