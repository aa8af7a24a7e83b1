//! Publish actor.
//!
//! Each `Changed` message starts an independent cycle on the blocking pool.
//! Cycles are not serialized; the session's generation counter decides which
//! of several overlapping cycles gets to commit.

use super::messages::{PublishMsg, WsMsg};
use crate::{
    logger::{status_error, status_success, status_warning},
    pipeline::{CycleOutcome, Pipeline, RenderSession},
};
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinSet};

pub struct PublishActor {
    rx: mpsc::Receiver<PublishMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    pipeline: Pipeline,
    session: Arc<RenderSession>,
}

impl PublishActor {
    pub fn new(
        rx: mpsc::Receiver<PublishMsg>,
        ws_tx: mpsc::Sender<WsMsg>,
        pipeline: Pipeline,
        session: Arc<RenderSession>,
    ) -> Self {
        Self {
            rx,
            ws_tx,
            pipeline,
            session,
        }
    }

    /// Run until shutdown, then let in-flight cycles finish.
    pub async fn run(mut self) {
        let mut cycles = JoinSet::new();

        while let Some(msg) = self.rx.recv().await {
            match msg {
                PublishMsg::Changed { paths } => {
                    crate::debug!("watch"; "{} path(s) changed", paths.len());
                    let pipeline = self.pipeline.clone();
                    let session = Arc::clone(&self.session);
                    let ws_tx = self.ws_tx.clone();

                    cycles.spawn(async move {
                        let display = session.entry().manifest.filename.clone();
                        let task = {
                            let session = Arc::clone(&session);
                            tokio::task::spawn_blocking(move || pipeline.run_cycle(&session))
                        };
                        match task.await {
                            Ok(outcome) => report(outcome, &display, &ws_tx).await,
                            Err(e) => status_error("publish cycle aborted", &e.to_string()),
                        }
                    });
                }
                PublishMsg::Shutdown => break,
            }

            while cycles.try_join_next().is_some() {}
        }

        while cycles.join_next().await.is_some() {}
        crate::debug!("watch"; "publish actor stopped");
    }
}

/// Print the outcome and push a reload when something was published.
async fn report(outcome: CycleOutcome, deck: &str, ws_tx: &mpsc::Sender<WsMsg>) {
    match outcome {
        CycleOutcome::Published { .. } => {
            status_success(&format!("published: {deck}"));
            let _ = ws_tx.send(WsMsg::Reload).await;
        }
        CycleOutcome::Superseded => {}
        CycleOutcome::MissingLocale { localized, .. } => {
            status_warning(&format!("missing locale file: {}", localized.display()));
        }
        CycleOutcome::Failed(e) => {
            status_error(
                &format!("not published: {deck}"),
                &format!("{:#}", anyhow::Error::from(e)),
            );
        }
    }
}
