//! Terminal user turns through a rustyline line editor.

use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io;
use tessera_core::{TurnRead, TurnSource};

pub struct LineEditor {
    editor: DefaultEditor,
}

impl LineEditor {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("Failed to create line editor")?;
        Ok(Self { editor })
    }
}

impl TurnSource for LineEditor {
    fn draws_prompt(&self) -> bool {
        true
    }

    fn next_turn(&mut self, prompt: &str, prefix: &str) -> io::Result<TurnRead> {
        let mut buffer = String::from(prefix);
        let mut prompt = prompt;

        loop {
            let mut line = match self.editor.readline(prompt) {
                Ok(line) => line,
                // Ctrl+D
                Err(ReadlineError::Eof) => return Ok(TurnRead::Closed),
                // Ctrl+C while the user has the terminal
                Err(ReadlineError::Interrupted) => return Ok(TurnRead::Interrupted),
                Err(ReadlineError::Io(e)) => return Err(e),
                Err(e) => return Err(io::Error::other(e)),
            };

            let another_line = line.ends_with('\\');
            if another_line {
                line.pop();
            }
            buffer.push_str(&line);
            buffer.push('\n');

            if !another_line {
                let entry = buffer[prefix.len()..].trim_end();
                if !entry.is_empty() {
                    let _ = self.editor.add_history_entry(entry);
                }
                return Ok(TurnRead::Line(buffer));
            }
            // continuation lines get no marker
            prompt = "";
        }
    }
}
