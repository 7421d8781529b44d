use std::io::{self, BufRead, Write};

use rewind_archive::Chooser;
use rewind_core::SnapshotLevel;

use crate::messages::{Locale, Message};

pub(crate) trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

/// Numbered menu and y/N questions over any line-oriented input.
pub(crate) struct TerminalPrompt<R, W> {
    input: R,
    output: W,
    locale: Locale,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    pub(crate) fn stdio(locale: Locale) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), locale)
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub(crate) fn new(input: R, output: W, locale: Locale) -> Self {
        Self {
            input,
            output,
            locale,
        }
    }

    fn read_answer(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn write_text(&mut self, text: &str) {
        let _ = self.output.write_all(text.as_bytes());
        let _ = self.output.flush();
    }
}

impl<R: BufRead, W: Write> Chooser for TerminalPrompt<R, W> {
    fn choose(&mut self, level: SnapshotLevel, options: &[String]) -> Option<usize> {
        if options.is_empty() {
            return None;
        }

        let width = options.len().to_string().len();
        let mut menu = format!("{}\n", self.locale.level_prompt(level));
        for (index, option) in options.iter().enumerate() {
            menu.push_str(&format!("  {:>width$}) {option}\n", index + 1));
        }
        self.write_text(&menu);

        loop {
            self.write_text(self.locale.text(Message::ChoicePrompt));
            let answer = self.read_answer()?;
            if let Some(index) = parse_choice(&answer, options) {
                return Some(index);
            }
            if matches!(answer.to_ascii_lowercase().as_str(), "q" | "quit") {
                return None;
            }
            self.write_text(&format!("{}\n", self.locale.text(Message::InvalidChoice)));
        }
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalPrompt<R, W> {
    fn confirm(&mut self, question: &str) -> bool {
        self.write_text(question);
        self.read_answer()
            .is_some_and(|answer| self.locale.is_affirmative(&answer))
    }
}

/// Menu numbers are 1-based.
pub(crate) fn parse_choice(answer: &str, options: &[String]) -> Option<usize> {
    let number = answer.trim().parse::<usize>().ok()?;
    (1..=options.len()).contains(&number).then(|| number - 1)
}
