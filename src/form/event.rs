//! Form events: every state change of a session arrives as one of these.
//!
//! UI input and timer callbacks share one queue, so the session applies
//! them strictly one at a time.

use uuid::Uuid;

use crate::catalog::Role;
use crate::generation::{GeneratedArtifact, GenerationError};
use crate::notify::{NotificationId, TimerStage};

/// Where a submit request came from. All of them validate identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// Activation key pressed in the prompt field.
    PromptEnter,
    /// The search icon beside the prompt.
    SearchIcon,
    /// The dedicated enter button.
    EnterButton,
    /// Parameterless global trigger.
    Global,
}

#[derive(Debug)]
pub enum FormEvent {
    /// Dropdown value changed (empty string = unselected).
    DropdownChanged { role: Role, value: String },
    /// Icon with this label clicked.
    IconClicked { role: Role, label: String },
    /// Prompt field content replaced.
    PromptEdited(String),
    Submit(SubmitTrigger),
    /// Microphone icon clicked.
    VoiceInput,
    /// User closed a notification.
    CloseNotification(NotificationId),
    /// A notification timer fired.
    NotificationTimer { id: NotificationId, stage: TimerStage },
    /// A generation request finished.
    GenerationFinished {
        submission: Uuid,
        result: Result<GeneratedArtifact, GenerationError>,
    },
}
