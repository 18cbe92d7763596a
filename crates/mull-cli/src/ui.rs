//! Line-oriented terminal rendering of turn events

use std::io::{self, Write};

use crossterm::{
    cursor::{MoveLeft, MoveToColumn},
    queue,
    style::{Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
};
use mull_agent::{TurnErrorKind, TurnEvent};

const CURSOR: &str = "▌";
const THINKING: &str = "Thinking...";

/// Renders one turn's events to a pair of writers.
///
/// On a terminal the answer streams in place with a placeholder, a cursor
/// and a dimmed reasoning block. When the answer no longer extends what is
/// already on screen (the closing reasoning marker arrived and the answer
/// was rebased), rendering continues on a fresh line.
///
/// When `out` is not a terminal it receives only the final answer, and
/// reasoning goes to `err`, so piped output stays clean.
pub struct TerminalView<W: Write, E: Write> {
    out: W,
    err: E,
    is_tty: bool,
    base_url: String,
    /// Answer text already written
    shown: String,
    placeholder: bool,
    cursor: bool,
    reasoning_shown: bool,
}

impl<W: Write, E: Write> TerminalView<W, E> {
    pub fn new(out: W, err: E, is_tty: bool, base_url: impl Into<String>) -> Self {
        Self {
            out,
            err,
            is_tty,
            base_url: base_url.into(),
            shown: String::new(),
            placeholder: false,
            cursor: false,
            reasoning_shown: false,
        }
    }

    /// Render one event. Returns `true` once the turn is over.
    pub fn handle_event(&mut self, event: &TurnEvent) -> io::Result<bool> {
        match event {
            TurnEvent::TurnStart { .. } => {
                self.shown.clear();
                self.reasoning_shown = false;
            }
            TurnEvent::AwaitingFirstToken => {
                if self.is_tty {
                    queue!(self.out, PrintStyledContent(THINKING.dim()))?;
                    self.placeholder = true;
                }
            }
            TurnEvent::ReasoningUpdate { reasoning } => {
                self.show_reasoning(reasoning)?;
            }
            TurnEvent::AnswerUpdate { answer } => {
                if self.is_tty {
                    self.clear_transient()?;
                    self.write_answer(answer)?;
                    queue!(self.out, Print(CURSOR))?;
                    self.cursor = true;
                }
            }
            TurnEvent::TurnEnd { turn } => {
                // The reasoning update may have been missed by a lagging receiver
                if turn.has_reasoning() && !self.reasoning_shown {
                    self.show_reasoning(turn.reasoning())?;
                }
                self.clear_transient()?;
                self.write_answer(turn.content())?;
                writeln!(self.out)?;
                self.shown.clear();
            }
            TurnEvent::TurnError { kind, message } => {
                self.clear_transient()?;
                if !self.shown.is_empty() {
                    writeln!(self.out)?;
                    self.shown.clear();
                }
                self.out.flush()?;
                writeln!(self.err, "{}", error_notice(*kind, message, &self.base_url))?;
                self.err.flush()?;
            }
        }
        self.out.flush()?;
        Ok(event.is_terminal())
    }

    fn show_reasoning(&mut self, reasoning: &str) -> io::Result<()> {
        self.reasoning_shown = true;
        if !self.is_tty {
            writeln!(self.err, "{}", reasoning.trim())?;
            return self.err.flush();
        }

        self.clear_transient()?;
        if !self.shown.is_empty() {
            writeln!(self.out)?;
            self.shown.clear();
        }
        queue!(self.out, PrintStyledContent(reasoning.trim().dim()), Print("\n"))
    }

    fn write_answer(&mut self, answer: &str) -> io::Result<()> {
        match answer.strip_prefix(self.shown.as_str()) {
            Some(delta) => write!(self.out, "{}", delta)?,
            None => {
                writeln!(self.out)?;
                write!(self.out, "{}", answer)?;
            }
        }
        self.shown = answer.to_string();
        Ok(())
    }

    /// Remove the placeholder and the cursor, whichever is showing
    fn clear_transient(&mut self) -> io::Result<()> {
        if self.placeholder {
            queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
            self.placeholder = false;
        }
        if self.cursor {
            queue!(self.out, MoveLeft(1), Clear(ClearType::UntilNewLine))?;
            self.cursor = false;
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_parts(self) -> (W, E) {
        (self.out, self.err)
    }
}

/// User-facing text for a failed turn
pub fn error_notice(kind: TurnErrorKind, message: &str, base_url: &str) -> String {
    match kind {
        TurnErrorKind::Connectivity => format!(
            "Error: could not get a reply from {}: {}\nIs the server running? Start it with `ollama serve` or pass --base-url.",
            base_url, message
        ),
        TurnErrorKind::Protocol => format!(
            "Error: the server sent a reply that could not be read: {}",
            message
        ),
        TurnErrorKind::Cancelled => "[aborted]".to_string(),
        TurnErrorKind::Timeout => format!("Error: {}", message),
    }
}
