use std::time::{Duration, Instant};

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info};

use crate::{
    action::Action,
    components::{footer::FooterComponent, Component},
    config::Config,
    machine::{self, Effect, Machine, Screen, WizardEvent},
    pages::{FormPage, LoadingPage, Page, SuccessPage, SummaryPage},
    state::State,
    store::{self, StateStore},
    tui::{Event, EventResponse, Tui},
};

/// How long the loading screen is shown before persisted state is resumed.
const LOADING_RESUME_DELAY: Duration = Duration::from_millis(500);

pub struct App {
    config: Config,
    store: Box<dyn StateStore>,
    machine: Machine,
    state: State,
    pages: Vec<Box<dyn Page>>,
    footer: FooterComponent,
    started_at: Instant,
    should_quit: bool,
    should_suspend: bool,
}

impl App {
    pub fn new(config: Config, store: Box<dyn StateStore>) -> Result<Self> {
        let record = store::load_record(store.as_ref());
        let machine = Machine::new();
        let state = State::new(record, machine.screen());
        let pages: Vec<Box<dyn Page>> = vec![
            Box::new(LoadingPage::new()),
            Box::new(FormPage::contact()),
            Box::new(FormPage::personal()),
            Box::new(SummaryPage::new()),
            Box::new(SuccessPage::new()),
        ];

        Ok(Self {
            config,
            store,
            machine,
            state,
            pages,
            footer: FooterComponent::new(),
            started_at: Instant::now(),
            should_quit: false,
            should_suspend: false,
        })
    }

    fn page_index(screen: Screen) -> usize {
        match screen {
            Screen::Loading => 0,
            Screen::Contact => 1,
            Screen::Personal => 2,
            Screen::Summary => 3,
            Screen::Success => 4,
        }
    }

    fn is_quit_key(key: KeyEvent) -> bool {
        matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
            && key.modifiers.contains(KeyModifiers::CONTROL)
    }

    fn is_suspend_key(key: KeyEvent) -> bool {
        matches!(key.code, KeyCode::Char('z')) && key.modifiers.contains(KeyModifiers::CONTROL)
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

        let mut tui = Tui::new()?
            .tick_rate(self.config.config.tick_rate)
            .frame_rate(self.config.config.frame_rate);
        tui.enter()?;

        for page in self.pages.iter_mut() {
            page.init(&self.state)?;
        }
        self.footer.init(&self.state)?;
        self.started_at = Instant::now();
        let index = Self::page_index(self.machine.screen());
        self.pages[index].on_enter(&self.state)?;

        loop {
            if let Some(e) = tui.next().await {
                match e {
                    Event::Quit => action_tx.send(Action::Quit)?,
                    Event::Tick => action_tx.send(Action::Tick)?,
                    Event::Render => action_tx.send(Action::Render)?,
                    Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
                    Event::Key(key) if Self::is_quit_key(key) => action_tx.send(Action::Quit)?,
                    Event::Key(key) if Self::is_suspend_key(key) => {
                        action_tx.send(Action::Suspend)?
                    }
                    e => {
                        let state = &mut self.state;
                        let index = Self::page_index(self.machine.screen());
                        if let Some(response) = self.pages[index].handle_events(e, state)? {
                            match response {
                                EventResponse::Continue(action)
                                | EventResponse::Stop(action) => action_tx.send(action)?,
                            }
                        }
                    }
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                if action != Action::Tick && action != Action::Render {
                    debug!("{action:?}");
                }
                match action {
                    Action::Tick => self.on_tick()?,
                    Action::Quit => self.should_quit = true,
                    Action::Suspend => self.should_suspend = true,
                    Action::Resume => self.should_suspend = false,
                    Action::Resize(_, _) => self.draw(&mut tui, &action_tx)?,
                    Action::Render => self.draw(&mut tui, &action_tx)?,
                    Action::Update => {
                        store::save_record(self.store.as_mut(), &self.state.record)?
                    }
                    Action::Next => self.dispatch(WizardEvent::Next)?,
                    Action::Back => self.dispatch(WizardEvent::Back)?,
                    Action::Submit => self.dispatch(WizardEvent::Submit)?,
                    Action::Again => self.dispatch(WizardEvent::Again)?,
                    Action::Error(ref message) => tracing::error!("{message}"),
                }
                let index = Self::page_index(self.machine.screen());
                if let Some(follow_up) = self.pages[index].update(action, &mut self.state)? {
                    action_tx.send(follow_up)?;
                }
            }

            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume)?;
                tui = Tui::new()?
                    .tick_rate(self.config.config.tick_rate)
                    .frame_rate(self.config.config.frame_rate);
                tui.enter()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    fn on_tick(&mut self) -> Result<()> {
        if self.machine.screen() == Screen::Loading
            && self.started_at.elapsed() >= LOADING_RESUME_DELAY
        {
            self.resume()?;
        }
        Ok(())
    }

    /// Jump from the loading screen to wherever the previous session left
    /// off. A persisted success screen restarts the cycle immediately.
    fn resume(&mut self) -> Result<()> {
        let persisted = self.store.get(store::CURRENT_SCREEN_KEY);
        let target = machine::resume_screen(persisted.as_deref());
        debug!("resuming at {target} (persisted: {persisted:?})");
        self.dispatch(WizardEvent::Load(target))?;
        if target == Screen::Success {
            self.dispatch(WizardEvent::Again)?;
        }
        Ok(())
    }

    /// Feed one event into the machine and carry out whatever it asks for.
    fn dispatch(&mut self, event: WizardEvent) -> Result<()> {
        let Some(transition) = self.machine.apply(event, &self.state.record) else {
            return Ok(());
        };
        info!("screen {} -> {}", transition.from, transition.to);

        match transition.effect {
            Some(Effect::Submit) => self.submit(),
            Some(Effect::Reset) => self.reset()?,
            None => {}
        }

        self.state.screen = self.machine.screen();
        store::save_screen(self.store.as_mut(), self.state.screen)?;
        let index = Self::page_index(self.state.screen);
        self.pages[index].on_enter(&self.state)?;
        Ok(())
    }

    fn submit(&self) {
        let record = &self.state.record;
        info!(
            phone = %record.phone,
            email = %record.email,
            first_name = %record.first_name,
            last_name = %record.last_name,
            "enrollment submitted"
        );
    }

    fn reset(&mut self) -> Result<()> {
        self.state.record.reset();
        self.store.remove(store::FORM_DATA_KEY)?;
        Ok(())
    }

    fn draw(&mut self, tui: &mut Tui, action_tx: &UnboundedSender<Action>) -> Result<()> {
        let index = Self::page_index(self.machine.screen());
        let page = &mut self.pages[index];
        let footer = &mut self.footer;
        let state = &self.state;
        tui.draw(|f| {
            let chunks =
                Layout::vertical([Constraint::Fill(1), footer.height_constraint()]).split(f.area());
            if let Err(err) = page.draw(f, chunks[0], state) {
                action_tx
                    .send(Action::Error(format!("Failed to draw page: {err:?}")))
                    .ok();
            }
            if let Err(err) = footer.draw(f, chunks[1], state) {
                action_tx
                    .send(Action::Error(format!("Failed to draw footer: {err:?}")))
                    .ok();
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EnrollmentRecord;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn app_with_store(store: MemoryStore) -> App {
        App::new(Config::default(), Box::new(store)).unwrap()
    }

    fn filled_store() -> MemoryStore {
        let mut store = MemoryStore::default();
        let record = EnrollmentRecord {
            phone: "123456789".into(),
            email: "jane@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        };
        store::save_record(&mut store, &record).unwrap();
        store
    }

    #[test]
    fn resume_defaults_to_contact() {
        let mut app = app_with_store(MemoryStore::default());
        app.resume().unwrap();
        assert_eq!(app.machine.screen(), Screen::Contact);
        assert_eq!(app.store.get(store::CURRENT_SCREEN_KEY).as_deref(), Some("contact"));
    }

    #[test]
    fn resume_jumps_straight_to_the_persisted_screen() {
        let mut store = filled_store();
        store::save_screen(&mut store, Screen::Summary).unwrap();

        let mut app = app_with_store(store);
        app.resume().unwrap();
        assert_eq!(app.machine.screen(), Screen::Summary);
        // The record survived the restart.
        assert_eq!(app.state.record.first_name, "Jane");
    }

    #[test]
    fn resume_from_success_restarts_the_cycle() {
        let mut store = filled_store();
        store::save_screen(&mut store, Screen::Success).unwrap();

        let mut app = app_with_store(store);
        app.resume().unwrap();
        assert_eq!(app.machine.screen(), Screen::Contact);
        assert_eq!(app.state.record, EnrollmentRecord::default());
        assert_eq!(app.store.get(store::FORM_DATA_KEY), None);
    }

    #[test]
    fn full_walkthrough_submits_and_again_clears() {
        let mut app = app_with_store(MemoryStore::default());
        app.resume().unwrap();

        // NEXT is refused until contact data validates.
        app.dispatch(WizardEvent::Next).unwrap();
        assert_eq!(app.machine.screen(), Screen::Contact);

        app.state.record.phone = "123456789".into();
        app.state.record.email = "jane@example.com".into();
        app.dispatch(WizardEvent::Next).unwrap();
        assert_eq!(app.machine.screen(), Screen::Personal);

        app.state.record.first_name = "Jane".into();
        app.state.record.last_name = "Doe".into();
        app.dispatch(WizardEvent::Next).unwrap();
        assert_eq!(app.machine.screen(), Screen::Summary);
        assert_eq!(app.store.get(store::CURRENT_SCREEN_KEY).as_deref(), Some("summary"));

        app.dispatch(WizardEvent::Submit).unwrap();
        assert_eq!(app.machine.screen(), Screen::Success);

        app.dispatch(WizardEvent::Again).unwrap();
        assert_eq!(app.machine.screen(), Screen::Contact);
        assert_eq!(app.state.record, EnrollmentRecord::default());
        assert_eq!(app.store.get(store::FORM_DATA_KEY), None);
        assert_eq!(app.store.get(store::CURRENT_SCREEN_KEY).as_deref(), Some("contact"));
    }
}
