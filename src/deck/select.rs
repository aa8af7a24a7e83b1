//! Choosing one deck out of a catalog.

use super::{Catalog, DeckEntry};
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};

/// Interactive choice between several decks.
pub trait DeckSelector {
    /// Index into `catalog`, or `None` when the user cancelled.
    fn choose(&mut self, catalog: &Catalog) -> io::Result<Option<usize>>;
}

/// How the session's deck was picked.
#[derive(Debug, PartialEq, Eq)]
pub enum Selection {
    /// The catalog held exactly one deck.
    Auto(DeckEntry),
    /// The user picked from the list.
    Chosen(DeckEntry),
    Cancelled,
}

impl Selection {
    pub fn into_entry(self) -> Option<DeckEntry> {
        match self {
            Self::Auto(entry) | Self::Chosen(entry) => Some(entry),
            Self::Cancelled => None,
        }
    }
}

/// Apply the selection policy: one deck is taken as-is, more go to `selector`.
pub fn select(catalog: Catalog, selector: &mut dyn DeckSelector) -> io::Result<Selection> {
    if catalog.len() == 1 {
        let entry = catalog.into_entries().remove(0);
        return Ok(Selection::Auto(entry));
    }

    match selector.choose(&catalog)? {
        Some(index) if index < catalog.len() => {
            Ok(Selection::Chosen(catalog.into_entries().swap_remove(index)))
        }
        _ => Ok(Selection::Cancelled),
    }
}

/// Numbered stdin prompt: `1)  intro - Intro`.
///
/// Invalid input relists the options; `q` or end of input cancels.
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
}

impl PromptSelector<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn list(&mut self, catalog: &Catalog) -> io::Result<()> {
        writeln!(self.output, "Found {} presentations", catalog.len())?;
        for (i, entry) in catalog.iter().enumerate() {
            writeln!(
                self.output,
                "{})  {} - {}",
                i + 1,
                entry.manifest.filename.cyan(),
                entry.manifest.title
            )?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> DeckSelector for PromptSelector<R, W> {
    fn choose(&mut self, catalog: &Catalog) -> io::Result<Option<usize>> {
        self.list(catalog)?;
        loop {
            write!(self.output, "Choose a deck: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(None);
            }

            let answer = line.trim();
            if answer.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=catalog.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => {
                    writeln!(self.output, "{}", format!("[ERROR] invalid choice `{answer}`").red())?;
                    self.list(catalog)?;
                }
            }
        }
    }
}
