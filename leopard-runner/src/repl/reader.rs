use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::error::Result;

const PROMPT: &str = ">> ";
const HISTORY_FILE: &str = ".leopard_history";

pub enum ReadOutput {
    Exit,
    Clear,
    Line(String),
}

pub struct Reader {
    rl: DefaultEditor,
    history: Option<PathBuf>,
}

impl Reader {
    pub fn new() -> Result<Self> {
        let mut rl = DefaultEditor::new()?;

        let history = dirs::home_dir().map(|home| home.join(HISTORY_FILE));
        if let Some(path) = &history {
            // A missing file just means there is no history yet.
            if let Err(err) = rl.load_history(path) {
                log::debug!("no history loaded from {}: {err}", path.display());
            }
        }

        Ok(Self { rl, history })
    }

    pub fn read(&mut self) -> Result<ReadOutput> {
        let line = match self.rl.readline(PROMPT) {
            Err(ReadlineError::Interrupted) => return Ok(ReadOutput::Clear),
            Err(ReadlineError::Eof) => return Ok(ReadOutput::Exit),
            Err(err) => return Err(err.into()),
            Ok(line) => line,
        };

        if !line.trim().is_empty() {
            self.rl.add_history_entry(line.as_str())?;
        }
        Ok(ReadOutput::Line(line))
    }

    pub fn save_history(&mut self) {
        if let Some(path) = &self.history {
            if let Err(err) = self.rl.save_history(path) {
                log::warn!("failed to save history to {}: {err}", path.display());
            }
        }
    }
}
