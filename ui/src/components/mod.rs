pub mod delete_confirmation;

pub use delete_confirmation::{DeleteConfirmationGate, GatePhase, SubmitOutcome};
