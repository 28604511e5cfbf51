//! Interactive console menu around the lexer.

use std::io::{self, Write};

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::error::ShellError;
use crate::render::Renderer;
use crate::scanner::{Token, tokenize};

const MENU: &str = "\
=== OCaml compiler menu ===
1) Tokenize code (lexer)
2) Parse code (parser)
3) Exit";

/// Source of input lines for the shell.
pub trait LineReader {
    /// Next line without its terminator, or `None` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError>;
}

/// Line editor backed by rustyline, with in-memory history.
pub struct EditorReader {
    editor: DefaultEditor,
}

impl EditorReader {
    pub fn new() -> Result<Self, ShellError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineReader for EditorReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Tokenize,
    Parse,
    Exit,
}

impl Command {
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::Tokenize),
            "2" => Some(Self::Parse),
            "3" => Some(Self::Exit),
            _ => None,
        }
    }
}

pub struct Shell<R, W> {
    reader: R,
    out: W,
    renderer: Renderer,
}

impl<R: LineReader, W: Write> Shell<R, W> {
    pub fn new(reader: R, out: W, renderer: Renderer) -> Self {
        Self {
            reader,
            out,
            renderer,
        }
    }

    /// Run the menu loop until the operator exits or input ends.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            writeln!(self.out, "{MENU}")?;
            self.out.flush()?;

            let Some(choice) = self.reader.read_line("Choose an option: ")? else {
                break;
            };
            let command = Command::from_choice(&choice);
            debug!(?command, "menu selection");
            if command == Some(Command::Exit) {
                break;
            }

            writeln!(
                self.out,
                "\nEnter the OCaml code to analyze (press ENTER twice to finish):"
            )?;
            self.out.flush()?;
            let code = read_code(&mut self.reader)?;
            debug!(bytes = code.len(), "collected code");

            match command {
                Some(Command::Tokenize) => self.run_lexer(&code)?,
                Some(Command::Parse) => self.run_parser(&code)?,
                _ => writeln!(self.out, "Invalid option.")?,
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn run_lexer(&mut self, code: &str) -> Result<(), ShellError> {
        writeln!(self.out, "\nTokens found:\n")?;
        let tokens: Vec<Token<'_>> = tokenize(code).collect();
        let count = self
            .renderer
            .write_listing(&mut self.out, tokens.iter().copied())?;
        let errors =
            self.renderer
                .write_diagnostics(&mut self.out, "input", code, tokens.iter().copied())?;
        debug!(count, errors, "tokenized code");
        Ok(())
    }

    fn run_parser(&mut self, code: &str) -> Result<(), ShellError> {
        let count = tokenize(code).count();
        warn!("parser stage requested but not implemented");
        writeln!(
            self.out,
            "\nParsing is not available: the lexer produced {count} tokens but no grammar is implemented."
        )?;
        Ok(())
    }
}

/// Collect code lines until two consecutive blank lines or end of input.
///
/// A single blank line between code lines is kept so that reported line
/// numbers match what was typed; a trailing one is dropped.
fn read_code<R: LineReader>(reader: &mut R) -> Result<String, ShellError> {
    let mut code = String::new();
    let mut last_blank = false;

    while let Some(line) = reader.read_line("  ")? {
        if line.trim().is_empty() {
            if last_blank {
                break;
            }
            last_blank = true;
        } else {
            if last_blank {
                code.push('\n');
            }
            last_blank = false;
            code.push_str(&line);
            code.push('\n');
        }
    }
    Ok(code)
}

/// Run the interactive shell on the terminal.
pub fn run_shell(renderer: Renderer) -> Result<(), ShellError> {
    let reader = EditorReader::new()?;
    Shell::new(reader, io::stdout(), renderer).run()
}
