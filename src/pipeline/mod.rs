//! One publish cycle.
//!
//! ```text
//! resolve source -> read -> load settings -> render -> stage
//!     -> [commit lock] still newest? rename : discard
//!     -> mirror assets (background)
//! ```
//!
//! Cycles may overlap. Each one claims a generation from the
//! [`RenderSession`] when it starts and only the newest generation is
//! allowed to replace `index.html`.

mod locale;
mod session;

pub use locale::{SourceChoice, create_locale_file, resolve_source};
pub use session::RenderSession;

use crate::{
    config::{ConfigError, Settings},
    publish::{AssetMirror, PublishError, Publisher},
    render::{self, RenderError, Renderer},
};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;

/// A cycle that stopped before publishing.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("cannot read `{}`", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot load settings")]
    Settings(#[from] ConfigError),

    #[error("cannot render `{}`", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// How a cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// `index.html` was replaced; assets may still be copying.
    Published {
        path: PathBuf,
        assets: Option<AssetMirror>,
    },
    /// A newer cycle started while this one was rendering.
    Superseded,
    /// The requested locale has no source file yet. Nothing was published.
    MissingLocale { localized: PathBuf, primary: PathBuf },
    /// Rendering or writing failed; the previous artifact is untouched.
    Failed(CycleError),
}

impl CycleOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }
}

/// Render → publish, for any session.
#[derive(Clone)]
pub struct Pipeline {
    renderer: Arc<dyn Renderer>,
    publisher: Publisher,
    settings_path: PathBuf,
}

impl Pipeline {
    pub fn new(renderer: Arc<dyn Renderer>, publisher: Publisher, settings_path: PathBuf) -> Self {
        Self {
            renderer,
            publisher,
            settings_path,
        }
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Run one cycle for `session`.
    pub fn run_cycle(&self, session: &RenderSession) -> CycleOutcome {
        let generation = session.begin_cycle();
        match self.cycle(session, generation) {
            Ok(outcome) => outcome,
            Err(e) => CycleOutcome::Failed(e),
        }
    }

    fn cycle(&self, session: &RenderSession, generation: u64) -> Result<CycleOutcome, CycleError> {
        let entry = session.entry();
        let path = match resolve_source(entry) {
            SourceChoice::Ready(path) => path,
            SourceChoice::MissingLocale { localized, primary } => {
                return Ok(CycleOutcome::MissingLocale { localized, primary });
            }
        };

        let source = fs::read_to_string(&path).map_err(|source| CycleError::Read {
            path: path.clone(),
            source,
        })?;

        // settings can change between cycles (`pony config` in another shell)
        let settings = Settings::load_or_default(&self.settings_path)?;

        let html = render::render(self.renderer.as_ref(), &source, &settings)
            .map_err(|source| CycleError::Render { path, source })?;

        let staged = self.publisher.stage(&html, generation)?;

        let committed = {
            let _guard = session.lock_commit();
            if session.is_current(generation) {
                let committed = staged.commit()?;
                session.mark_rendered();
                committed
            } else {
                staged.discard();
                crate::debug!("watch"; "cycle {} superseded", generation);
                return Ok(CycleOutcome::Superseded);
            }
        };

        let assets = self.publisher.mirror_assets(&entry.assets_dir());
        Ok(CycleOutcome::Published {
            path: committed,
            assets,
        })
    }
}
