use patsim_core::models::case::Case;
use patsim_core::models::mode::Mode;
use uuid::Uuid;

use crate::conversation::ConversationState;

/// One student's consultation with one virtual patient.
///
/// The case is bound at construction and cannot be swapped afterwards.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    case: Case,
    pub(crate) conversation: ConversationState,
    pub(crate) mode: Mode,
    started_at: jiff::Timestamp,
    last_active: jiff::Timestamp,
}

impl Session {
    pub fn new(case: Case) -> Self {
        let now = jiff::Timestamp::now();
        Self {
            id: Uuid::new_v4(),
            case,
            conversation: ConversationState::default(),
            mode: Mode::Chat,
            started_at: now,
            last_active: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn case(&self) -> &Case {
        &self.case
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn started_at(&self) -> jiff::Timestamp {
        self.started_at
    }

    /// When the session was last looked up or completed a turn.
    pub fn last_active(&self) -> jiff::Timestamp {
        self.last_active
    }

    pub(crate) fn touch(&mut self) {
        self.last_active = jiff::Timestamp::now();
    }
}
