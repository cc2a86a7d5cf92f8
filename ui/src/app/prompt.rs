use crate::components::delete_confirmation::{
    DESCRIPTION, DeleteConfirmationGate, PLACEHOLDER, SubmitOutcome,
};
use crate::error::AppResult;
use server::model::Workspace;
use std::io::{BufRead, Write};

/// How a delete confirmation prompt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptOutcome {
    /// The phrase matched; carries the selection to delete.
    Confirmed(Vec<Workspace>),
    /// Input ended before a match. The gate has been closed.
    Cancelled,
}

/// Line-oriented front end for [`DeleteConfirmationGate`].
///
/// Every line read replaces the typed text and is then submitted. End of
/// input dismisses the dialog.
pub struct DeletePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> DeletePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print a status line between prompts.
    pub fn say(&mut self, line: &str) -> AppResult<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Print the dialog: title, the workspaces about to go, and the warning.
    pub fn render(&mut self, gate: &DeleteConfirmationGate) -> AppResult<()> {
        let Some(title) = gate.title() else {
            return Ok(());
        };

        writeln!(self.output, "{title}")?;
        for workspace in gate.selection() {
            writeln!(self.output, "  - {}", workspace.display_name())?;
        }
        writeln!(self.output, "{DESCRIPTION}")?;
        Ok(())
    }

    /// Read lines until the phrase matches or input ends.
    ///
    /// While `busy` the confirm action is disabled: lines are taken as edits
    /// but never submitted.
    pub fn ask(
        &mut self,
        gate: &mut DeleteConfirmationGate,
        busy: bool,
    ) -> AppResult<PromptOutcome> {
        loop {
            if !gate.is_open() {
                return Ok(PromptOutcome::Cancelled);
            }

            write!(self.output, "{PLACEHOLDER}: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                writeln!(self.output, "Cancelled")?;
                gate.close();
                return Ok(PromptOutcome::Cancelled);
            }

            gate.change_text(line.trim_end_matches(['\n', '\r']));

            if !gate.confirm_enabled(busy) {
                writeln!(
                    self.output,
                    "A batch is still in progress, confirmation is disabled"
                )?;
                continue;
            }

            let mut confirmed = None;
            match gate.submit(|selection| confirmed = Some(selection.to_vec())) {
                SubmitOutcome::Confirmed => return Ok(finish_confirmation(gate, confirmed)),
                SubmitOutcome::Rejected => {
                    if let Some(helper) = gate.helper_text() {
                        writeln!(self.output, "{helper}")?;
                    }
                }
                SubmitOutcome::Ignored => return Ok(PromptOutcome::Cancelled),
            }
        }
    }
}

/// A confirmation that never reached the handler must not turn into an
/// empty delete batch.
fn finish_confirmation(
    gate: &mut DeleteConfirmationGate,
    confirmed: Option<Vec<Workspace>>,
) -> PromptOutcome {
    match confirmed {
        Some(selection) => PromptOutcome::Confirmed(selection),
        None => {
            log::error!("Delete confirmation accepted without handing over a selection");
            gate.close();
            PromptOutcome::Cancelled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::delete_confirmation::GatePhase;
    use server::testing::workspaces;
    use std::io::Cursor;

    fn prompt(input: &str) -> DeletePrompt<Cursor<Vec<u8>>, Vec<u8>> {
        DeletePrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn open_gate(ids: &[&str]) -> DeleteConfirmationGate {
        let mut gate = DeleteConfirmationGate::new();
        gate.open(workspaces(ids));
        gate
    }

    fn output(prompt: DeletePrompt<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompt.into_output()).unwrap()
    }

    #[test]
    fn test_render_lists_selection() {
        let gate = open_gate(&["a", "b"]);
        let mut prompt = prompt("");

        prompt.render(&gate).unwrap();

        let text = output(prompt);
        assert!(text.starts_with("Delete 2 workspaces\n"));
        assert!(text.contains("  - tester/ws-a\n"));
        assert!(text.contains("  - tester/ws-b\n"));
        assert!(text.contains(DESCRIPTION));
    }

    #[test]
    fn test_render_closed_gate_prints_nothing() {
        let gate = DeleteConfirmationGate::new();
        let mut prompt = prompt("");

        prompt.render(&gate).unwrap();
        assert!(output(prompt).is_empty());
    }

    #[test]
    fn test_exact_phrase_confirms_selection() {
        let mut gate = open_gate(&["a", "b"]);
        let mut prompt = prompt("DELETE\n");

        let outcome = prompt.ask(&mut gate, false).unwrap();

        assert_eq!(outcome, PromptOutcome::Confirmed(workspaces(&["a", "b"])));
        assert_eq!(gate.phase(), GatePhase::Confirming);
    }

    #[test]
    fn test_mismatch_shows_helper_then_accepts_retry() {
        let mut gate = open_gate(&["a"]);
        let mut prompt = prompt("delete\nDELETE \r\nDELETE\r\n");

        let outcome = prompt.ask(&mut gate, false).unwrap();

        assert_eq!(outcome, PromptOutcome::Confirmed(workspaces(&["a"])));
        let text = output(prompt);
        assert_eq!(text.matches("Please type DELETE to confirm").count(), 2);
    }

    #[test]
    fn test_end_of_input_cancels_and_closes() {
        let mut gate = open_gate(&["a"]);
        let mut prompt = prompt("nope\n");

        let outcome = prompt.ask(&mut gate, false).unwrap();

        assert_eq!(outcome, PromptOutcome::Cancelled);
        assert_eq!(gate.phase(), GatePhase::Closed);
        assert!(output(prompt).ends_with("Cancelled\n"));
    }

    #[test]
    fn test_busy_never_submits() {
        let mut gate = open_gate(&["a"]);
        let mut prompt = prompt("DELETE\n");

        let outcome = prompt.ask(&mut gate, true).unwrap();

        assert_eq!(outcome, PromptOutcome::Cancelled);
        assert!(output(prompt).contains("confirmation is disabled"));
    }

    #[test]
    fn test_confirmation_without_selection_cancels() {
        let mut gate = open_gate(&["a"]);

        let outcome = finish_confirmation(&mut gate, None);

        assert_eq!(outcome, PromptOutcome::Cancelled);
        assert_eq!(gate.phase(), GatePhase::Closed);
    }

    #[test]
    fn test_closed_gate_is_cancelled_without_reading_further() {
        let mut gate = DeleteConfirmationGate::new();
        let mut prompt = prompt("DELETE\nDELETE\n");

        let outcome = prompt.ask(&mut gate, false).unwrap();
        assert_eq!(outcome, PromptOutcome::Cancelled);
        assert!(output(prompt).is_empty());
    }
}
