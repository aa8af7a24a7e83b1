//! Renderer adapter.
//!
//! The engine turning deck source into HTML sits behind [`Renderer`]; the
//! pipeline only sees `render(source, settings) -> html | RenderError`.
//!
//! - `markdown` - the built-in pulldown-cmark slide renderer

pub mod markdown;

pub use markdown::MarkdownRenderer;

use crate::config::Settings;
use thiserror::Error;

/// A render that produced nothing publishable.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer produced no output")]
    Empty,

    #[error("renderer failed: {0}")]
    Engine(String),
}

/// Deck rendering engine.
///
/// Implementations must be free of side effects: everything they need comes
/// in through `source` and `settings`.
pub trait Renderer: Send + Sync {
    fn render(&self, source: &str, settings: &Settings) -> Result<String, RenderError>;
}

/// Invoke `renderer`, treating blank output as a failure.
pub fn render(
    renderer: &dyn Renderer,
    source: &str,
    settings: &Settings,
) -> Result<String, RenderError> {
    let html = renderer.render(source, settings)?;
    if html.trim().is_empty() {
        return Err(RenderError::Empty);
    }
    Ok(html)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Renderer returning a fixed result, for pipeline tests.
    pub(crate) struct FixedRenderer(pub Option<&'static str>);

    impl Renderer for FixedRenderer {
        fn render(&self, _: &str, _: &Settings) -> Result<String, RenderError> {
            Ok(self.0.unwrap_or_default().to_string())
        }
    }

    struct Failing;

    impl Renderer for Failing {
        fn render(&self, _: &str, _: &Settings) -> Result<String, RenderError> {
            Err(RenderError::Engine("bad directive".into()))
        }
    }

    #[test]
    fn test_blank_output_is_error() {
        let settings = Settings::default();
        assert!(matches!(
            render(&FixedRenderer(None), "# hi", &settings),
            Err(RenderError::Empty)
        ));
        assert!(matches!(
            render(&FixedRenderer(Some(" \n\t")), "# hi", &settings),
            Err(RenderError::Empty)
        ));
    }

    #[test]
    fn test_passthrough() {
        let settings = Settings::default();
        assert_eq!(
            render(&FixedRenderer(Some("<p>x</p>")), "x", &settings).unwrap(),
            "<p>x</p>"
        );
        assert!(matches!(
            render(&Failing, "x", &settings),
            Err(RenderError::Engine(_))
        ));
    }
}
