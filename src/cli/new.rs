//! `pony new`: scaffold a deck directory.
//!
//! ```text
//! <name>/
//! ├── deck.md
//! ├── package.json
//! ├── assets/
//! └── locales/
//!     └── <configured>.md   # only when it differs from the deck locale
//! ```

use super::{args::NewArgs, prompt::ask};
use crate::{
    config::{AppPaths, Settings},
    deck::{ASSETS_DIR, DECK_FILE, LOCALES_DIR, MANIFEST_FILE},
    log,
};
use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::{Value, json, ser::PrettyFormatter};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Everything needed to write a new deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckTemplate {
    pub filename: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub theme: String,
    pub locale: String,
    pub license: String,
}

/// Directory name for a deck: spaces become `-`.
pub fn deck_dir_name(name: &str) -> String {
    name.trim().replace(' ', "-")
}

/// Starter `deck.md` content.
pub fn starter_text(template: &DeckTemplate) -> String {
    format!(
        "theme:{theme}\n\n#Welcome\n\n{description}\n\n---cover\n\n# {title}\n\n---\n\n# Slide 2\n\n---section\n\n# Welcome to Ponyshow\n\n---\n\n# Slide 4\n\n- This is a list\n- So is this\n",
        theme = template.theme,
        description = template.description,
        title = template.title,
    )
}

fn manifest_json(template: &DeckTemplate) -> Value {
    let mut manifest = json!({
        "filename": template.filename,
        "title": template.title,
        "description": template.description,
        "version": "0.1.0",
        "theme": template.theme,
        "locale": template.locale,
        "license": template.license,
    });
    if !template.author.is_empty()
        && let Some(map) = manifest.as_object_mut()
    {
        map.insert("author".into(), Value::String(template.author.clone()));
    }
    manifest
}

/// Write the deck into `<parent>/<filename>`.
///
/// `configured_locale` is the user's default language; a copy of the starter
/// text is written for it when the deck is in another language.
pub fn scaffold(parent: &Path, template: &DeckTemplate, configured_locale: &str) -> Result<PathBuf> {
    let root = parent.join(&template.filename);
    let manifest_path = root.join(MANIFEST_FILE);
    if manifest_path.exists() {
        bail!("{} already exists", manifest_path.display());
    }

    for dir in [ASSETS_DIR, LOCALES_DIR] {
        let path = root.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("cannot create directory '{}'", path.display()))?;
    }

    let mut manifest = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut manifest, PrettyFormatter::with_indent(b"\t"));
    manifest_json(template).serialize(&mut serializer)?;
    manifest.push(b'\n');
    fs::write(&manifest_path, manifest)
        .with_context(|| format!("cannot write '{}'", manifest_path.display()))?;

    let text = starter_text(template);
    let deck = root.join(DECK_FILE);
    fs::write(&deck, &text).with_context(|| format!("cannot write '{}'", deck.display()))?;

    if configured_locale != template.locale {
        let localized = root.join(LOCALES_DIR).join(format!("{configured_locale}.md"));
        fs::write(&localized, &text)
            .with_context(|| format!("cannot write '{}'", localized.display()))?;
    }

    Ok(root)
}

/// Fill in missing fields interactively.
fn complete(args: &NewArgs, settings: &Settings) -> Result<DeckTemplate> {
    let filename = deck_dir_name(&args.name);
    if filename.is_empty() {
        bail!("deck name must not be empty");
    }

    let or_ask = |value: &Option<String>, question: &str, default: Option<&str>| -> Result<String> {
        match value {
            Some(v) => Ok(v.trim().to_string()),
            None => Ok(ask(question, default)?),
        }
    };

    let title = or_ask(&args.title, "Enter the slide title", Some(filename.as_str()))?;
    let description = or_ask(&args.description, "Enter a description", None)?;
    let author = or_ask(&args.author, "Author", None)?;
    let license = or_ask(&args.license, "License", Some("MIT"))?;

    Ok(DeckTemplate {
        title,
        description,
        author,
        theme: args.theme.clone().unwrap_or_else(|| settings.theme.clone()),
        locale: args.locale.clone().unwrap_or_else(|| settings.locale.clone()),
        license,
        filename,
    })
}

/// Entry point for `pony new`.
pub fn new_deck(args: &NewArgs, paths: &AppPaths) -> Result<()> {
    let settings = Settings::load_or_default(&paths.config_file())?;
    let template = complete(args, &settings)?;

    let cwd = std::env::current_dir().context("cannot read current directory")?;
    let root = scaffold(&cwd, &template, &settings.locale)?;

    log!("new"; "created {}", root.display());
    log!("new"; "deck is ready, preview it with `pony run {}`", template.filename);
    Ok(())
}
