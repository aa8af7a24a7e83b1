//! Embedded static resources.
//!
//! - `serve` - the live reload client injected into served HTML
//! - `theme` - the built-in `default` theme stylesheet

mod template;

pub use template::{Template, TemplateVars};

use std::{fs, io, path::Path};

pub mod serve {
    use super::{Template, TemplateVars};
    use crate::reload::RELOAD_TOKEN;

    /// Variables for reload.js.
    pub struct ReloadVars {
        pub ws_port: u16,
    }

    impl TemplateVars for ReloadVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__PONY_WS_PORT__", &self.ws_port.to_string())
                .replace("__PONY_RELOAD_TOKEN__", RELOAD_TOKEN)
        }
    }

    /// Live reload client with WebSocket port injection.
    pub const RELOAD_JS: Template<ReloadVars> = Template::new(include_str!("serve/reload.js"));

    /// Inline `<script>` tag carrying the reload client.
    pub fn reload_script_tag(ws_port: u16) -> String {
        format!("<script>{}</script>", RELOAD_JS.render(&ReloadVars { ws_port }))
    }
}

pub mod theme {
    /// Name of the built-in theme.
    pub const DEFAULT_THEME: &str = "default";

    /// Stylesheet for the built-in theme.
    pub const DEFAULT_CSS: &str = include_str!("theme/default.css");

    /// Path of a theme stylesheet relative to the serving root.
    pub fn stylesheet_href(theme: &str) -> String {
        format!("themes/{theme}/style.css")
    }
}

/// Write embedded assets into the serving root (only when missing or stale).
pub fn write_embedded_assets(workspace: &Path) -> io::Result<()> {
    let css = workspace.join(theme::stylesheet_href(theme::DEFAULT_THEME));
    if fs::read_to_string(&css).ok().as_deref() == Some(theme::DEFAULT_CSS) {
        return Ok(());
    }
    if let Some(parent) = css.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(css, theme::DEFAULT_CSS)
}
