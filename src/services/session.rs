//! Cleaning session - single-writer container for one bus cleaning run
//!
//! Owns the selection registry, the countdown controller, the outcome
//! generator and the random source. Every user action arrives as a
//! [`Command`]; timer ticks arrive through [`CleaningSession::tick`].

use crate::domain::command::Command;
use crate::domain::registry::{Selection, SelectionRegistry};
use crate::domain::types::{Focus, MethodSet};
use crate::infra::config::Config;
use crate::services::countdown::{CountdownController, Phase, TickOutcome};
use crate::services::outcome::OutcomeGenerator;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Generate a new UUIDv7 (time-sortable) session id
pub fn new_session_id() -> String {
    Uuid::now_v7().to_string()
}

/// Read-only view of a session for presentation layers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub bus_id: String,
    /// Commands received so far, accepted or not
    pub command_count: u64,
    pub phase: Phase,
    pub focus: Option<Focus>,
    pub whole_bus: bool,
    pub whole_bus_methods: MethodSet,
    /// Methods checked for the focused area
    pub focused_methods: MethodSet,
    pub selections: Vec<Selection>,
    /// Live registry total while selecting, the confirmed total afterwards
    pub total_minutes: u32,
    pub remaining_seconds: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_items: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

pub struct CleaningSession {
    session_id: String,
    bus_id: String,
    registry: SelectionRegistry,
    countdown: CountdownController,
    outcome: OutcomeGenerator,
    rng: StdRng,
    found_items: Option<Vec<&'static str>>,
    completed_at: Option<String>,
    command_count: u64,
}

impl CleaningSession {
    /// Create a session from configuration; seeds the RNG if a seed is configured
    pub fn new(config: &Config) -> Self {
        let rng = match config.outcome_seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config.bus_id(), rng)
    }

    pub fn with_rng(bus_id: &str, rng: StdRng) -> Self {
        let session = Self {
            session_id: new_session_id(),
            bus_id: bus_id.to_string(),
            registry: SelectionRegistry::new(),
            countdown: CountdownController::new(),
            outcome: OutcomeGenerator::new(),
            rng,
            found_items: None,
            completed_at: None,
            command_count: 0,
        };
        info!(session_id = %session.session_id, bus_id = %session.bus_id, "session_created");
        session
    }

    /// Apply one user command
    ///
    /// Returns false when the command was ignored: registry edits outside
    /// `Selecting`, confirming an empty selection, or a lifecycle command in
    /// the wrong phase. Ignored commands never change state.
    pub fn apply(&mut self, command: Command) -> bool {
        self.command_count += 1;
        debug!(session_id = %self.session_id, command = %command.name(), "command_received");
        match command {
            Command::Confirm => self.confirm(),
            Command::Skip => self.skip(),
            Command::Reset => {
                self.reset();
                true
            }
            edit => self.edit_selection(edit),
        }
    }

    fn edit_selection(&mut self, command: Command) -> bool {
        if self.countdown.phase() != Phase::Selecting {
            warn!(
                session_id = %self.session_id,
                command = %command.name(),
                phase = %self.countdown.phase(),
                "selection_frozen"
            );
            return false;
        }

        match command {
            Command::SelectArea(area) => {
                self.registry.select_area(Focus::Area(area));
                true
            }
            Command::SelectWholeBus => {
                self.registry.select_whole_bus();
                true
            }
            Command::ToggleMethod(method) => self.registry.toggle_method(method),
            Command::UpdateMethods(methods) => self.registry.update_methods(methods),
            Command::Clear(area) => {
                self.registry.clear(area);
                true
            }
            Command::ClearAll => {
                self.registry.clear_all();
                true
            }
            Command::Confirm | Command::Skip | Command::Reset => false,
        }
    }

    fn confirm(&mut self) -> bool {
        if self.registry.is_empty() {
            warn!(session_id = %self.session_id, "confirm_without_selection");
            return false;
        }

        let total_minutes = self.registry.total_duration_minutes();
        match self.countdown.confirm(total_minutes) {
            Ok(phase) => {
                info!(
                    session_id = %self.session_id,
                    areas = %self.registry.len(),
                    total_minutes = %total_minutes,
                    "cleaning_started"
                );
                if phase == Phase::Complete {
                    self.finish();
                }
                true
            }
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, "confirm_rejected");
                false
            }
        }
    }

    fn skip(&mut self) -> bool {
        match self.countdown.skip() {
            Ok(()) => {
                info!(
                    session_id = %self.session_id,
                    remaining_seconds = %self.countdown.remaining_seconds(),
                    "cleaning_skipped"
                );
                self.finish();
                true
            }
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, "skip_rejected");
                false
            }
        }
    }

    /// Deliver one timer tick to the countdown
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.countdown.tick();
        if outcome == TickOutcome::Finished {
            self.finish();
        }
        outcome
    }

    /// Discard everything and start a fresh run
    pub fn reset(&mut self) {
        self.countdown.reset();
        self.registry.clear_all();
        self.found_items = None;
        self.completed_at = None;
        let previous = std::mem::replace(&mut self.session_id, new_session_id());
        info!(previous_session_id = %previous, session_id = %self.session_id, "session_reset");
    }

    fn finish(&mut self) {
        let items = self.outcome.generate(&mut self.rng);
        self.completed_at = OffsetDateTime::now_utc().format(&Rfc3339).ok();
        info!(
            session_id = %self.session_id,
            total_minutes = %self.countdown.total_minutes(),
            found_count = %items.len(),
            found_items = ?items,
            "cleaning_complete"
        );
        self.found_items = Some(items);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let phase = self.countdown.phase();
        let focus = self.registry.focus();
        let total_minutes = match phase {
            Phase::Selecting => self.registry.total_duration_minutes(),
            Phase::Cleaning | Phase::Complete => self.countdown.total_minutes(),
        };
        SessionSnapshot {
            session_id: self.session_id.clone(),
            bus_id: self.bus_id.clone(),
            command_count: self.command_count,
            phase,
            focus,
            whole_bus: self.registry.whole_bus_active(),
            whole_bus_methods: self.registry.whole_bus_methods().clone(),
            focused_methods: focus.map(|f| self.registry.selected_methods(f)).unwrap_or_default(),
            selections: self.registry.selections(),
            total_minutes,
            remaining_seconds: self.countdown.remaining_seconds(),
            found_items: self.found_items.clone(),
            completed_at: self.completed_at.clone(),
        }
    }

    #[inline]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.countdown.phase()
    }

    pub fn registry(&self) -> &SelectionRegistry {
        &self.registry
    }

    pub fn countdown(&self) -> &CountdownController {
        &self.countdown
    }

    pub fn found_items(&self) -> Option<&[&'static str]> {
        self.found_items.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{AreaId, CleaningMethod};

    fn seeded_session() -> CleaningSession {
        CleaningSession::with_rng("test-bus", StdRng::seed_from_u64(1))
    }

    fn cmd(text: &str) -> Command {
        text.parse().unwrap()
    }

    fn apply_all(session: &mut CleaningSession, commands: &[&str]) {
        for text in commands {
            session.apply(cmd(text));
        }
    }

    #[test]
    fn test_confirm_starts_countdown() {
        let mut session = seeded_session();
        apply_all(&mut session, &["select:windshield", "toggle:basic-wash", "toggle:polish"]);
        assert!(session.apply(Command::Confirm));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, Phase::Cleaning);
        assert_eq!(snapshot.total_minutes, 11);
        assert_eq!(snapshot.remaining_seconds, 660);
        assert!(snapshot.found_items.is_none());
    }

    #[test]
    fn test_confirm_requires_selection() {
        let mut session = seeded_session();
        assert!(!session.apply(Command::Confirm));
        assert_eq!(session.phase(), Phase::Selecting);

        // focusing alone selects nothing
        session.apply(cmd("select:aisle"));
        assert!(!session.apply(Command::Confirm));
        assert_eq!(session.phase(), Phase::Selecting);
    }

    #[test]
    fn test_selection_frozen_while_cleaning() {
        let mut session = seeded_session();
        apply_all(&mut session, &["select:aisle", "toggle:sanitize", "confirm"]);

        assert!(!session.apply(cmd("toggle:polish")));
        assert!(!session.apply(Command::ClearAll));
        assert!(!session.apply(Command::Confirm));

        let aisle = AreaId::parse("aisle").unwrap();
        assert_eq!(session.registry().get(aisle), Some(&MethodSet::from([CleaningMethod::Sanitize])));
        assert_eq!(session.countdown().remaining_seconds(), 480);
    }

    #[test]
    fn test_last_tick_generates_outcome_once() {
        let mut session = seeded_session();
        apply_all(&mut session, &["select:steps", "toggle:basic-wash", "confirm"]);

        for _ in 0..59 {
            assert_eq!(session.tick(), TickOutcome::Running);
        }
        assert_eq!(session.tick(), TickOutcome::Finished);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, Phase::Complete);
        assert_eq!(snapshot.remaining_seconds, 0);
        assert!(snapshot.found_items.is_some());
        assert!(snapshot.completed_at.is_some());

        let report = snapshot.found_items.clone();
        assert_eq!(session.tick(), TickOutcome::Ignored);
        assert_eq!(session.snapshot().found_items, report);
    }

    #[test]
    fn test_skip_keeps_remaining_and_reports() {
        let mut session = seeded_session();
        apply_all(&mut session, &["select:dashboard", "toggle:detail", "confirm"]);
        for _ in 0..60 {
            session.tick();
        }
        assert!(session.apply(Command::Skip));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, Phase::Complete);
        assert_eq!(snapshot.remaining_seconds, 300);
        assert_eq!(snapshot.total_minutes, 6);
        assert!(session.found_items().is_some());
        assert!(!session.apply(Command::Skip));
    }

    #[test]
    fn test_reset_from_any_phase() {
        let setups: [&[&str]; 3] = [
            &["select:aisle", "toggle:polish"],
            &["select:aisle", "toggle:polish", "confirm"],
            &["select:whole-bus", "toggle:polish", "confirm", "skip"],
        ];
        for setup in setups {
            let mut session = seeded_session();
            apply_all(&mut session, setup);
            let before = session.session_id().to_string();

            assert!(session.apply(Command::Reset));
            let snapshot = session.snapshot();
            assert_eq!(snapshot.phase, Phase::Selecting);
            assert!(snapshot.selections.is_empty());
            assert_eq!(snapshot.focus, None);
            assert!(!snapshot.whole_bus);
            assert_eq!(snapshot.total_minutes, 0);
            assert_eq!(snapshot.remaining_seconds, 0);
            assert!(snapshot.found_items.is_none());
            assert_ne!(snapshot.session_id, before);
        }
    }

    #[test]
    fn test_whole_bus_total() {
        let mut session = seeded_session();
        apply_all(&mut session, &["select:whole-bus", "toggle:sanitize"]);
        let snapshot = session.snapshot();
        assert!(snapshot.whole_bus);
        assert_eq!(snapshot.focus, Some(Focus::WholeBus));
        assert_eq!(snapshot.selections.len(), 28);
        assert_eq!(snapshot.total_minutes, 8 * 28);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut session = seeded_session();
        apply_all(&mut session, &["select:aisle", "methods:basic-wash,polish"]);
        let json = serde_json::to_value(session.snapshot()).unwrap();

        assert_eq!(json["phase"], "selecting");
        assert_eq!(json["focus"], "aisle");
        assert_eq!(json["bus_id"], "test-bus");
        assert_eq!(json["selections"][0]["area"], "aisle");
        assert_eq!(json["selections"][0]["methods"], serde_json::json!(["basic-wash", "polish"]));
        assert_eq!(json["total_minutes"], 11);
        assert!(json.get("found_items").is_none());
    }
}
