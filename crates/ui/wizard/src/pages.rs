use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::{action::Action, state::State, tui::Event, tui::EventResponse};

mod form;
mod loading;
mod success;
mod summary;

pub use form::FormPage;
pub use loading::LoadingPage;
pub use success::SuccessPage;
pub use summary::SummaryPage;

/// A `Page` is one wizard screen. Pages receive events while active,
/// react to actions, and draw into the body area above the footer.
pub trait Page {
    #[allow(dead_code)]
    fn name(&self) -> &str;

    fn init(&mut self, _state: &State) -> Result<()> {
        Ok(())
    }

    /// Called when the page becomes active.
    fn on_enter(&mut self, _state: &State) -> Result<()> {
        Ok(())
    }

    fn handle_events(
        &mut self,
        event: Event,
        state: &mut State,
    ) -> Result<Option<EventResponse<Action>>> {
        let r = match event {
            Event::Key(key_event) => self.handle_key_events(key_event, state)?,
            _ => None,
        };
        Ok(r)
    }

    fn handle_key_events(
        &mut self,
        _key: KeyEvent,
        _state: &mut State,
    ) -> Result<Option<EventResponse<Action>>> {
        Ok(None)
    }

    fn update(&mut self, _action: Action, _state: &mut State) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Draw the page using the provided `Frame` and `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &State) -> Result<()>;
}
