//! Interactive line loop with rustyline
//!
//! Reads lines with the context's prompt, keeps history, and feeds each
//! line to [`Context::process_line`] until the session ends.

use std::path::PathBuf;
use std::rc::Rc;

use rustyline::config::Config;
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::{EditMode, Editor};
use tracing::{debug, warn};

use crate::repl::context::Context;
use crate::repl::driver::{StdoutSink, StreamDriver};
use crate::util::config::ReplConfig;
use crate::util::diagnostic::Result;

/// Line editor settings
#[derive(Debug, Clone)]
pub struct LineReplConfig {
    /// Use vi key bindings
    pub vi_mode: bool,
    /// History file, if any
    pub history_file: Option<PathBuf>,
    /// Maximum history entries
    pub history_size: usize,
}

impl Default for LineReplConfig {
    fn default() -> Self {
        Self {
            vi_mode: false,
            history_file: None,
            history_size: 1000,
        }
    }
}

impl From<&ReplConfig> for LineReplConfig {
    fn from(config: &ReplConfig) -> Self {
        Self {
            vi_mode: config.vi_mode,
            history_file: config.history_file.clone(),
            history_size: config.history_size,
        }
    }
}

/// rustyline-backed console loop
pub struct LineRepl {
    config: LineReplConfig,
    editor: Editor<(), FileHistory>,
}

impl LineRepl {
    pub fn new() -> Result<Self> {
        Self::with_config(LineReplConfig::default())
    }

    pub fn with_config(config: LineReplConfig) -> Result<Self> {
        let rl_config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(false)
            .max_history_size(config.history_size)?
            .edit_mode(if config.vi_mode {
                EditMode::Vi
            } else {
                EditMode::Emacs
            })
            .build();

        let mut editor = Editor::with_config(rl_config)?;
        if let Some(ref history_file) = config.history_file {
            if history_file.exists() {
                if let Err(err) = editor.load_history(history_file) {
                    warn!(path = %history_file.display(), error = %err, "could not load history");
                }
            }
        }

        Ok(Self { config, editor })
    }

    /// Run `context` until an exit command or end of input
    pub fn run(
        &mut self,
        context: &mut Context,
    ) -> Result<()> {
        let _driver = context
            .drivers()
            .push(Rc::new(StreamDriver::new(StdoutSink)));

        loop {
            let prompt = context.prompt();
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        self.editor.add_history_entry(line.as_str())?;
                    }
                    if !context.process_line(&line) {
                        break;
                    }
                }
                Err(ReadlineError::Eof) => {
                    debug!("end of input");
                    break;
                }
                Err(ReadlineError::Interrupted) => {
                    context.clear_buffer();
                    context.output("^C");
                }
                Err(err) => return Err(err.into()),
            }
        }

        self.save_history();
        Ok(())
    }

    fn save_history(&mut self) {
        if let Some(ref history_file) = self.config.history_file {
            if let Some(parent) = history_file.parent() {
                if let Err(err) = std::fs::create_dir_all(parent) {
                    warn!(path = %parent.display(), error = %err, "could not create history directory");
                    return;
                }
            }
            if let Err(err) = self.editor.save_history(history_file) {
                warn!(path = %history_file.display(), error = %err, "could not save history");
            }
        }
    }
}
