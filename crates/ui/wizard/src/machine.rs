//! Screen state machine for the enrollment wizard.
//!
//! The wizard is a fixed sequence of screens navigated by a handful of
//! events. Forward navigation is gated by validation of the live record;
//! backward navigation is unconditional. The whole table lives in
//! [`transition`], a pure function over `(screen, event, record)`, so the
//! machine can be exercised in tests without a terminal.

use strum::{Display, EnumString};

use crate::record::{self, EnrollmentRecord};

/// One step of the wizard. `Loading` is only ever the initial screen; it is
/// left through a [`WizardEvent::Load`] once persisted state was inspected.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Screen {
    #[default]
    Loading,
    Contact,
    Personal,
    Summary,
    Success,
}

/// Events the machine reacts to. Anything not listed for the current screen
/// is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    Next,
    Back,
    Submit,
    Again,
    Load(Screen),
}

/// Side effect requested by a transition. The machine itself stays pure;
/// the application loop executes these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Hand the completed record to the submit sink.
    Submit,
    /// Clear the record, in memory and in the store.
    Reset,
}

/// A transition that actually took place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Screen,
    pub to: Screen,
    pub effect: Option<Effect>,
}

/// The transition table. Returns `None` when the event does not apply to the
/// screen or its guard rejects the current record.
///
/// Guards re-validate the live record on every call; nothing is cached.
pub fn transition(
    screen: Screen,
    event: WizardEvent,
    record: &EnrollmentRecord,
) -> Option<(Screen, Option<Effect>)> {
    use Screen::*;
    use WizardEvent::*;

    match (screen, event) {
        (Loading, Load(target)) if target != Loading => Some((target, None)),
        (Contact, Next) if record::contact_schema().is_valid(record) => Some((Personal, None)),
        (Personal, Back) => Some((Contact, None)),
        (Personal, Next) if record::personal_schema().is_valid(record) => Some((Summary, None)),
        (Summary, Back) => Some((Personal, None)),
        (Summary, Submit) if record::full_schema().is_valid(record) => {
            Some((Success, Some(Effect::Submit)))
        }
        (Success, Again) => Some((Contact, Some(Effect::Reset))),
        _ => None,
    }
}

/// True if `event` would currently cause a transition. Drives the
/// enabled/disabled rendering of the footer actions.
pub fn can(screen: Screen, event: WizardEvent, record: &EnrollmentRecord) -> bool {
    transition(screen, event, record).is_some()
}

/// Map a persisted screen name onto the screen to resume at. Unknown,
/// missing or nonsensical values fall back to the first data-entry screen.
pub fn resume_screen(persisted: Option<&str>) -> Screen {
    persisted
        .and_then(|raw| raw.parse::<Screen>().ok())
        .filter(|screen| *screen != Screen::Loading)
        .unwrap_or(Screen::Contact)
}

/// The wizard machine: the current screen plus the transition function.
#[derive(Debug, Default)]
pub struct Machine {
    screen: Screen,
}

impl Machine {
    pub fn new() -> Self {
        Self {
            screen: Screen::Loading,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn can(&self, event: WizardEvent, record: &EnrollmentRecord) -> bool {
        can(self.screen, event, record)
    }

    /// Apply `event`, returning the transition if one happened.
    pub fn apply(&mut self, event: WizardEvent, record: &EnrollmentRecord) -> Option<Transition> {
        let (to, effect) = transition(self.screen, event, record)?;
        let from = self.screen;
        self.screen = to;
        Some(Transition { from, to, effect })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_record() -> EnrollmentRecord {
        EnrollmentRecord {
            phone: "123456789".into(),
            email: "jane@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        }
    }

    #[test]
    fn next_from_contact_is_gated_by_contact_fields() {
        let mut machine = Machine::new();
        let _ = machine.apply(WizardEvent::Load(Screen::Contact), &EnrollmentRecord::default());

        let mut record = EnrollmentRecord::default();
        assert!(!machine.can(WizardEvent::Next, &record));
        assert_eq!(machine.apply(WizardEvent::Next, &record), None);
        assert_eq!(machine.screen(), Screen::Contact);

        record.phone = "123456789".into();
        record.email = "jane@example.com".into();
        assert!(machine.can(WizardEvent::Next, &record));
        let transition = machine.apply(WizardEvent::Next, &record).unwrap();
        assert_eq!(transition.to, Screen::Personal);
        assert_eq!(transition.effect, None);
    }

    #[test]
    fn next_from_personal_reaches_summary() {
        let mut machine = Machine::new();
        let record = valid_record();
        let _ = machine.apply(WizardEvent::Load(Screen::Personal), &record);

        let transition = machine.apply(WizardEvent::Next, &record).unwrap();
        assert_eq!(transition.to, Screen::Summary);
    }

    #[test]
    fn back_is_unconditional() {
        let mut machine = Machine::new();
        let record = EnrollmentRecord::default();
        let _ = machine.apply(WizardEvent::Load(Screen::Summary), &record);

        assert!(machine.can(WizardEvent::Back, &record));
        assert_eq!(machine.apply(WizardEvent::Back, &record).unwrap().to, Screen::Personal);
        assert_eq!(machine.apply(WizardEvent::Back, &record).unwrap().to, Screen::Contact);
        // Contact is the first data screen; BACK stops there.
        assert_eq!(machine.apply(WizardEvent::Back, &record), None);
    }

    #[test]
    fn submit_requires_the_full_record() {
        let mut machine = Machine::new();
        let mut record = valid_record();
        let _ = machine.apply(WizardEvent::Load(Screen::Summary), &record);

        record.last_name = "D".into();
        assert!(!machine.can(WizardEvent::Submit, &record));

        record.last_name = "Doe".into();
        let transition = machine.apply(WizardEvent::Submit, &record).unwrap();
        assert_eq!(transition.to, Screen::Success);
        assert_eq!(transition.effect, Some(Effect::Submit));
    }

    #[test]
    fn again_resets_and_returns_to_contact() {
        let mut machine = Machine::new();
        let record = valid_record();
        let _ = machine.apply(WizardEvent::Load(Screen::Success), &record);

        let transition = machine.apply(WizardEvent::Again, &record).unwrap();
        assert_eq!(transition.to, Screen::Contact);
        assert_eq!(transition.effect, Some(Effect::Reset));
    }

    #[test]
    fn loading_only_reacts_to_load() {
        let mut machine = Machine::new();
        let record = valid_record();

        assert_eq!(machine.apply(WizardEvent::Next, &record), None);
        assert_eq!(machine.apply(WizardEvent::Submit, &record), None);
        assert_eq!(machine.apply(WizardEvent::Load(Screen::Loading), &record), None);

        let transition = machine.apply(WizardEvent::Load(Screen::Summary), &record).unwrap();
        assert_eq!(transition.to, Screen::Summary);
        // Load is a one-shot; it does not apply to data screens.
        assert_eq!(machine.apply(WizardEvent::Load(Screen::Contact), &record), None);
    }

    #[test]
    fn resume_maps_persisted_names() {
        assert_eq!(resume_screen(Some("summary")), Screen::Summary);
        assert_eq!(resume_screen(Some("personal")), Screen::Personal);
        assert_eq!(resume_screen(Some("success")), Screen::Success);
        assert_eq!(resume_screen(Some("loading")), Screen::Contact);
        assert_eq!(resume_screen(Some("garbage")), Screen::Contact);
        assert_eq!(resume_screen(None), Screen::Contact);
    }

    #[test]
    fn screen_names_round_trip() {
        for screen in [
            Screen::Loading,
            Screen::Contact,
            Screen::Personal,
            Screen::Summary,
            Screen::Success,
        ] {
            assert_eq!(screen.to_string().parse::<Screen>().unwrap(), screen);
        }
    }
}
