//! Terminal input handling.
//!
//! The game talks to a [`Prompt`], which turns raw lines into menu choices,
//! names and confirmations. [`ConsoleInput`] reads from the terminal; tests
//! drive the game with [`ScriptedInput`] instead.

use std::collections::VecDeque;
use std::io::{self, IsTerminal, Write};

use anyhow::Result;
use log::{info, warn};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::InputClosed;
use crate::style::GameStyle;
use crate::view::{View, ViewItem};

const CHOICE_PROMPT: &str = "> ";
const PAUSE_PROMPT: &str = "[Press ENTER to continue]";

/// Outcome of reading a line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

/// Source of player decisions.
///
/// Implementors only provide [`Prompt::read`]; the higher level helpers
/// validate and re-ask. End of input and Ctrl-C both surface as an
/// [`InputClosed`] error so the game can wind down.
pub trait Prompt {
    /// Read one raw line. Implementations that talk to a terminal flush `view` first.
    ///
    /// # Errors
    /// Returns an error if the underlying input fails.
    fn read(&mut self, view: &mut View, prompt: &str) -> Result<InputEvent>;

    /// Ask for a number in `min..=max`, repeating until one is given.
    ///
    /// # Errors
    /// Returns [`InputClosed`] when input ends, or any read failure.
    fn choose(&mut self, view: &mut View, min: u32, max: u32) -> Result<u32> {
        loop {
            match self.read(view, CHOICE_PROMPT)? {
                InputEvent::Line(line) => match line.trim().parse::<u32>() {
                    Ok(choice) if (min..=max).contains(&choice) => return Ok(choice),
                    _ => view.push(ViewItem::Error(format!(
                        "Invalid option! Enter a number from {min} to {max}."
                    ))),
                },
                InputEvent::Eof | InputEvent::Interrupted => return Err(InputClosed.into()),
            }
        }
    }

    /// Ask for a line of free text, returned trimmed.
    ///
    /// # Errors
    /// Returns [`InputClosed`] when input ends, or any read failure.
    fn text(&mut self, view: &mut View, prompt: &str) -> Result<String> {
        match self.read(view, prompt)? {
            InputEvent::Line(line) => Ok(line.trim().to_string()),
            InputEvent::Eof | InputEvent::Interrupted => Err(InputClosed.into()),
        }
    }

    /// Ask a yes/no question; anything starting with `y` counts as yes.
    ///
    /// # Errors
    /// See [`Prompt::text`].
    fn confirm(&mut self, view: &mut View, question: &str) -> Result<bool> {
        let answer = self.text(view, &format!("{question} (y/n) "))?;
        Ok(answer.to_lowercase().starts_with('y'))
    }

    /// Wait for the player before moving on.
    ///
    /// # Errors
    /// See [`Prompt::text`].
    fn pause(&mut self, view: &mut View) -> Result<()> {
        self.text(view, PAUSE_PROMPT).map(|_| ())
    }
}

/// Interactive prompt backed by the terminal.
///
/// Line editing comes from rustyline when stdin is a terminal. Otherwise, or
/// after rustyline fails, lines are read from plain stdin.
pub struct ConsoleInput {
    editor: Option<DefaultEditor>,
    buffer: String,
}

impl ConsoleInput {
    pub fn new() -> Self {
        let editor = if io::stdin().is_terminal() {
            DefaultEditor::new()
                .inspect(|_| info!("using rustyline-backed input"))
                .map_err(|err| warn!("rustyline unavailable ({err}), reading plain stdin"))
                .ok()
        } else {
            info!("stdin is not a TTY; reading plain stdin");
            None
        };
        Self {
            editor,
            buffer: String::new(),
        }
    }

    /// Read one line, dropping to plain stdin for good if the editor breaks.
    ///
    /// # Errors
    /// Returns an error if reading from stdin fails.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        if let Some(editor) = self.editor.as_mut() {
            match editor.readline(prompt).map_or_else(convert_readline_error, |line| Ok(InputEvent::Line(line))) {
                Ok(event) => return Ok(event),
                Err(err) => {
                    warn!("rustyline input failed: {err}; switching to plain stdin");
                    self.editor = None;
                },
            }
        }
        self.read_plain(prompt)
    }

    fn read_plain(&mut self, prompt: &str) -> io::Result<InputEvent> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        self.buffer.clear();
        if io::stdin().read_line(&mut self.buffer)? == 0 {
            return Ok(InputEvent::Eof);
        }
        let line = self.buffer.trim_end_matches(['\n', '\r']);
        Ok(InputEvent::Line(line.to_string()))
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for ConsoleInput {
    fn read(&mut self, view: &mut View, prompt: &str) -> Result<InputEvent> {
        view.flush();
        Ok(self.read_line(&prompt.prompt_style().to_string())?)
    }
}

/// Prompt that replays prepared answers, for tests and demos.
///
/// Pauses do not consume answers. When the script runs out, input is closed.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl Prompt for ScriptedInput {
    fn read(&mut self, _view: &mut View, _prompt: &str) -> Result<InputEvent> {
        Ok(self.lines.pop_front().map_or(InputEvent::Eof, InputEvent::Line))
    }

    fn pause(&mut self, _view: &mut View) -> Result<()> {
        Ok(())
    }
}

fn convert_readline_error(err: ReadlineError) -> io::Result<InputEvent> {
    match err {
        ReadlineError::Interrupted => Ok(InputEvent::Interrupted),
        ReadlineError::Eof => Ok(InputEvent::Eof),
        ReadlineError::Io(io_err) => Err(io_err),
        other => Err(io::Error::other(other)),
    }
}
