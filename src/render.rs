//! Output rendering for the chat transcript.
//!
//! This module provides the renderer trait and a plain-text implementation
//! that tags each turn with its author, optionally with ANSI styling.

use std::io::{self, Stdout, Write};

use crate::types::{Role, Turn};

/// ANSI escape code for bold text (used for role labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for info lines).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the user label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for magenta text (used for the assistant label).
const ANSI_MAGENTA: &str = "\x1b[35m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Label shown before user turns.
pub const USER_LABEL: &str = "You";

/// Label shown before assistant turns.
pub const ASSISTANT_LABEL: &str = "Gemini";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
pub trait Renderer: Send {
    /// Print one turn, tagged by role.
    fn print_turn(&mut self, turn: &Turn);

    /// Print every turn in order.
    fn print_transcript(&mut self, turns: &[Turn]) {
        for turn in turns {
            self.print_turn(turn);
        }
    }

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a new PlainTextRenderer on stdout with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer on stdout with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer over an arbitrary writer.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self { out, use_color }
    }

    /// Consumes the renderer, returning its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn label(&self, role: Role) -> String {
        let (name, color) = match role {
            Role::User => (USER_LABEL, ANSI_CYAN),
            Role::Assistant => (ASSISTANT_LABEL, ANSI_MAGENTA),
        };
        if self.use_color {
            format!("{ANSI_BOLD}{color}{name}:{ANSI_RESET}")
        } else {
            format!("{name}:")
        }
    }

    // Terminal write failures are not actionable mid-conversation.
    fn emit(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

impl Default for PlainTextRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn print_turn(&mut self, turn: &Turn) {
        let label = self.label(turn.role);
        let body = turn.content.trim_end();
        self.emit(&format!("{label}\n{body}\n\n"));
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            self.emit(&format!("{ANSI_RED}Error: {error}{ANSI_RESET}\n"));
        } else {
            self.emit(&format!("Error: {error}\n"));
        }
    }

    fn print_info(&mut self, info: &str) {
        if self.use_color {
            self.emit(&format!("{ANSI_DIM}{info}{ANSI_RESET}\n"));
        } else {
            self.emit(&format!("{info}\n"));
        }
    }
}
