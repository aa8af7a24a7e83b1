//! Markdown slide renderer using pulldown-cmark.
//!
//! ```text
//! theme:ribbon          <- directives (first block, `key:value` lines only)
//!
//! # Welcome             <- slide 1
//!
//! ---cover              <- separator, `cover` becomes a CSS class
//!
//! # Title               <- slide 2
//! ```

use pulldown_cmark::{Options, Parser, html};
use regex::Regex;
use std::{collections::BTreeMap, sync::LazyLock};

use super::{RenderError, Renderer};
use crate::config::Settings;
use crate::embed::theme::stylesheet_href;
use crate::utils::html::{escape, escape_attr};

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^---([A-Za-z0-9_-]*)[ \t]*$").unwrap());

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9_-]*):[ \t]*(.*?)[ \t]*$").unwrap());

/// Built-in renderer: one `<section class="slide">` per slide.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

/// Leading `key:value` lines of a deck.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideDirectives(BTreeMap<String, String>);

impl SlideDirectives {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Split directives off the front of `source`.
    ///
    /// The first block only counts when every line in it is a directive.
    pub fn parse(source: &str) -> (Self, &str) {
        let trimmed = source.trim_start_matches(['\n', '\r']);
        let block_end = trimmed.find("\n\n").or_else(|| trimmed.find("\r\n\r\n"));
        let (block, rest) = match block_end {
            Some(end) => (&trimmed[..end], &trimmed[end..]),
            None => (trimmed, ""),
        };

        let mut map = BTreeMap::new();
        for line in block.lines() {
            match DIRECTIVE.captures(line) {
                Some(caps) => {
                    map.insert(caps[1].to_ascii_lowercase(), caps[2].to_string());
                }
                None => return (Self::default(), source),
            }
        }
        if map.is_empty() {
            return (Self::default(), source);
        }
        (Self(map), rest)
    }
}

/// One slide: markdown body plus optional class from the separator.
#[derive(Debug, PartialEq, Eq)]
struct Slide<'a> {
    class: Option<&'a str>,
    body: String,
}

fn split_slides(body: &str) -> Vec<Slide<'_>> {
    let mut slides = Vec::new();
    let mut class = None;
    let mut current = String::new();

    for line in body.lines() {
        if let Some(caps) = SEPARATOR.captures(line) {
            slides.push(Slide {
                class,
                body: std::mem::take(&mut current),
            });
            class = caps.get(1).map(|m| m.as_str()).filter(|c| !c.is_empty());
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    slides.push(Slide {
        class,
        body: current,
    });

    slides.retain(|s| !s.body.trim().is_empty());
    slides
}

fn markdown_options() -> Options {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_FOOTNOTES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts
}

fn markdown_to_html(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, markdown_options()));
    out
}

/// First ATX heading text, used as the document title.
fn first_heading(body: &str) -> Option<&str> {
    body.lines()
        .map(str::trim_start)
        .find(|l| l.starts_with('#'))
        .map(|l| l.trim_start_matches('#').trim())
        .filter(|l| !l.is_empty())
}

impl Renderer for MarkdownRenderer {
    /// Returns an empty string when the deck has no slide content.
    fn render(&self, source: &str, settings: &Settings) -> Result<String, RenderError> {
        let (directives, body) = SlideDirectives::parse(source);
        let slides = split_slides(body);
        if slides.is_empty() {
            return Ok(String::new());
        }

        let theme = directives.get("theme").unwrap_or(&settings.theme);
        let lang = directives.get("locale").unwrap_or(&settings.locale);
        let title = directives
            .get("title")
            .or_else(|| first_heading(body))
            .unwrap_or("Untitled");

        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n");
        out.push_str(&format!("<html lang=\"{}\">\n<head>\n", escape_attr(lang)));
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        out.push_str(&format!("<title>{}</title>\n", escape(title)));
        out.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"{}\">\n",
            escape_attr(&stylesheet_href(theme))
        ));
        out.push_str("</head>\n<body>\n<main class=\"deck\">\n");

        for (i, slide) in slides.iter().enumerate() {
            let class = match slide.class {
                Some(extra) => format!("slide {}", escape_attr(extra)),
                None => "slide".to_string(),
            };
            out.push_str(&format!(
                "<section class=\"{class}\" id=\"slide-{}\">\n{}</section>\n",
                i + 1,
                markdown_to_html(&slide.body)
            ));
        }

        out.push_str("</main>\n</body>\n</html>\n");
        Ok(out)
    }
}
