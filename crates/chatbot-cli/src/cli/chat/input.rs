//! Async line input for the chat loop.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// What the user did at the prompt.
#[derive(Debug)]
pub enum InputEvent {
    /// A submitted line, trimmed.
    Message(String),
    /// Ctrl+D.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Returns the input handler and a writer for printing above the prompt.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    self.rl.add_history_entry(line.clone());
                }
                InputEvent::Message(line)
            }
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Ok(ReadlineEvent::Eof) | Err(_) => InputEvent::Eof,
        }
    }

    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }

    /// Restore the terminal before the process prints anything else.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}
