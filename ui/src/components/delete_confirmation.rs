use crate::validation::{ConfirmationPhraseValidator, Validator};
use server::model::Workspace;

/// Text the user has to type before a batch delete may proceed.
pub const CONFIRMATION_PHRASE: &str = "DELETE";

pub const DESCRIPTION: &str = "Deleting these workspaces is irreversible! Are you sure you want to proceed? Type `DELETE` to confirm.";

pub const PLACEHOLDER: &str = "Type DELETE to confirm";

const VALIDATOR: ConfirmationPhraseValidator = ConfirmationPhraseValidator::new(CONFIRMATION_PHRASE);

/// `Delete 1 workspace`, `Delete 3 workspaces`.
pub fn dialog_title(count: usize) -> String {
    let noun = if count == 1 { "workspace" } else { "workspaces" };
    format!("Delete {count} {noun}")
}

/// Observable phase of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    Closed,
    /// Open with nothing typed yet.
    Empty,
    /// Open with text typed since the last submit.
    Editing,
    /// The last submit did not match the phrase.
    Invalid,
    /// The phrase matched and the confirm handler has been invoked.
    Confirming,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The gate was closed; nothing happened.
    Ignored,
    Rejected,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq)]
struct OpenDialog {
    selection: Vec<Workspace>,
    entered_text: String,
    has_error: bool,
    confirming: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
enum ConfirmationState {
    #[default]
    Closed,
    Open(OpenDialog),
}

/// Typed-phrase confirmation in front of a batch delete.
///
/// The gate owns only the dialog state. Whether the confirm button is usable
/// also depends on the coordinator being idle, which callers pass to
/// [`confirm_enabled`](Self::confirm_enabled).
#[derive(Debug, Clone, Default)]
pub struct DeleteConfirmationGate {
    state: ConfirmationState,
}

impl DeleteConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the dialog for `selection` with an empty text field.
    pub fn open(&mut self, selection: Vec<Workspace>) {
        log::debug!(
            "Opening delete confirmation for {} workspaces",
            selection.len()
        );
        self.state = ConfirmationState::Open(OpenDialog {
            selection,
            entered_text: String::new(),
            has_error: false,
            confirming: false,
        });
    }

    /// Dismiss the dialog from any state, discarding typed text and errors.
    pub fn close(&mut self) {
        if self.is_open() {
            log::debug!("Closing delete confirmation");
        }
        self.state = ConfirmationState::Closed;
    }

    /// Replace the typed text. Any edit clears a previous mismatch error.
    pub fn change_text(&mut self, text: impl Into<String>) {
        match &mut self.state {
            ConfirmationState::Open(dialog) => {
                dialog.entered_text = text.into();
                dialog.has_error = false;
                dialog.confirming = false;
            }
            ConfirmationState::Closed => {
                log::debug!("Ignoring text edit on closed delete confirmation");
            }
        }
    }

    /// Validate the typed text and, on an exact match, hand the selection to
    /// `on_confirm`.
    pub fn submit<F>(&mut self, on_confirm: F) -> SubmitOutcome
    where
        F: FnOnce(&[Workspace]),
    {
        let ConfirmationState::Open(dialog) = &mut self.state else {
            return SubmitOutcome::Ignored;
        };

        dialog.has_error = false;

        if let Err(mismatch) = VALIDATOR.validate(&dialog.entered_text) {
            log::debug!("Delete confirmation rejected: {mismatch}");
            dialog.has_error = true;
            dialog.confirming = false;
            return SubmitOutcome::Rejected;
        }

        dialog.confirming = true;
        on_confirm(dialog.selection.as_slice());
        SubmitOutcome::Confirmed
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ConfirmationState::Open(_))
    }

    pub fn phase(&self) -> GatePhase {
        match &self.state {
            ConfirmationState::Closed => GatePhase::Closed,
            ConfirmationState::Open(dialog) if dialog.confirming => GatePhase::Confirming,
            ConfirmationState::Open(dialog) if dialog.has_error => GatePhase::Invalid,
            ConfirmationState::Open(dialog) if dialog.entered_text.is_empty() => GatePhase::Empty,
            ConfirmationState::Open(_) => GatePhase::Editing,
        }
    }

    /// Typed text; empty while closed.
    pub fn entered_text(&self) -> &str {
        match &self.state {
            ConfirmationState::Open(dialog) => &dialog.entered_text,
            ConfirmationState::Closed => "",
        }
    }

    pub fn has_error(&self) -> bool {
        match &self.state {
            ConfirmationState::Open(dialog) => dialog.has_error,
            ConfirmationState::Closed => false,
        }
    }

    pub fn selection(&self) -> &[Workspace] {
        match &self.state {
            ConfirmationState::Open(dialog) => &dialog.selection,
            ConfirmationState::Closed => &[],
        }
    }

    pub fn title(&self) -> Option<String> {
        match &self.state {
            ConfirmationState::Open(dialog) => Some(dialog_title(dialog.selection.len())),
            ConfirmationState::Closed => None,
        }
    }

    /// Error text under the input, present only after a rejected submit.
    pub fn helper_text(&self) -> Option<String> {
        self.has_error().then(|| {
            crate::validation::PhraseMismatch {
                expected: CONFIRMATION_PHRASE,
            }
            .to_string()
        })
    }

    /// Whether the confirm action is usable: open and no batch in flight.
    pub fn confirm_enabled(&self, busy: bool) -> bool {
        self.is_open() && !busy
    }
}
