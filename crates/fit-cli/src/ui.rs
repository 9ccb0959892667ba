//! User-facing collaborators: a message sink, a blocking yes/no prompt, and
//! a raw line reader.
//!
//! Command handlers talk to the terminal only through the [`Ui`] trait so
//! they stay testable without one; prompts block until answered, by design
//! (single interactive user).

use std::io::{self, BufRead, Write};

pub const DIVIDER: &str = "----------------------------------------";

pub trait Ui {
    /// Show plain text to the user.
    fn show(&mut self, message: &str);

    /// Show an error to the user. Never fatal; the command loop continues.
    fn show_error(&mut self, message: &str);

    /// Ask a yes/no question, blocking until answered. End-of-input counts
    /// as "no".
    fn confirm(&mut self, question: &str) -> bool;

    /// Read one command line. `None` on end-of-input.
    fn read_line(&mut self) -> Option<String>;
}

/// Terminal implementation over stdin/stdout.
pub struct Console {
    stdin: io::Stdin,
}

impl Console {
    #[must_use]
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }

    fn read_raw_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Ui for Console {
    fn show(&mut self, message: &str) {
        println!("{message}");
    }

    fn show_error(&mut self, message: &str) {
        println!("[!] {message}");
    }

    fn confirm(&mut self, question: &str) -> bool {
        loop {
            println!("{question} (Y/N)");
            let _ = io::stdout().flush();
            let Some(answer) = self.read_raw_line() else {
                return false;
            };
            match answer.trim().to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => println!("Please answer Y or N."),
            }
        }
    }

    fn read_line(&mut self) -> Option<String> {
        print!("> ");
        let _ = io::stdout().flush();
        self.read_raw_line()
    }
}
