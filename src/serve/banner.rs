//! Session banner printed once the preview is live.

use crate::deck::DeckEntry;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use std::io::{Write, stdout};

/// Lines shown under the header, in order.
pub fn banner_lines(entry: &DeckEntry, locale: &str, url: &str) -> Vec<String> {
    let manifest = &entry.manifest;
    vec![
        format!("Title: {} - {}", manifest.filename, manifest.title),
        format!("Description: {}", manifest.description),
        format!("Author: {}", manifest.author_label()),
        format!("Localization: {locale}"),
        String::new(),
        url.to_string(),
    ]
}

/// Clear the terminal and print the session banner.
pub fn print_banner(entry: &DeckEntry, locale: &str, url: &str) {
    let mut out = stdout().lock();
    execute!(out, Clear(ClearType::All), cursor::MoveTo(0, 0)).ok();

    let header = format!("Pony Show v{}", env!("CARGO_PKG_VERSION"));
    writeln!(out, "{}", header.bright_yellow().bold()).ok();
    writeln!(out).ok();

    let lines = banner_lines(entry, locale, url);
    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate() {
        if i == last || line.starts_with("Localization") {
            writeln!(out, "{}", line.yellow()).ok();
        } else {
            writeln!(out, "{line}").ok();
        }
    }
    writeln!(out).ok();
    out.flush().ok();
}

/// Open `url` in the default browser; failure is only logged.
pub fn open_browser(url: &str) {
    if let Err(e) = open::that(url) {
        crate::log!("serve"; "cannot open browser: {}", e);
    }
}
