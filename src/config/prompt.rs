use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Interactive input used when no stored credentials exist.
pub trait Prompter {
    /// Ask for a line of visible input.
    fn ask(&mut self, label: &str) -> io::Result<String>;
    /// Ask for input that must not be echoed.
    fn ask_secret(&mut self, label: &str) -> io::Result<String>;
    /// Show an informational message.
    fn notice(&mut self, message: &str);
}

/// Prompts on stderr and reads from stdin, keeping stdout free for results.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn read_line(&self) -> io::Result<String> {
        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, label: &str) -> io::Result<String> {
        let mut err = io::stderr();
        write!(err, "{label}")?;
        err.flush()?;
        self.read_line()
    }

    fn ask_secret(&mut self, label: &str) -> io::Result<String> {
        let mut err = io::stderr();
        write!(err, "{label}")?;
        err.flush()?;

        if !io::stdin().is_terminal() {
            return self.read_line();
        }

        enable_raw_mode()?;
        let result = read_hidden();
        disable_raw_mode()?;
        writeln!(err)?;
        result
    }

    fn notice(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

fn read_hidden() -> io::Result<String> {
    let mut secret = String::new();
    loop {
        let Event::Key(KeyEvent { code, modifiers, kind, .. }) = event::read()? else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }
        match code {
            KeyCode::Enter => return Ok(secret),
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "input cancelled"));
            }
            KeyCode::Char(c) => secret.push(c),
            _ => {}
        }
    }
}
