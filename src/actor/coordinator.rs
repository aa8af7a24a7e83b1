//! Actor coordinator.
//!
//! Thin orchestrator: creates channels, installs the session's watch and
//! runs the actors until shutdown. Business logic lives in `pipeline/`.

use super::{
    fs::{FsActor, WatchHandle},
    messages::{PublishMsg, WsMsg},
    publish::PublishActor,
    ws::WsActor,
};
use crate::pipeline::{Pipeline, RenderSession};
use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc;

/// Channel buffer size
pub const CHANNEL_BUFFER: usize = 32;

pub struct Coordinator {
    pipeline: Pipeline,
    session: Arc<RenderSession>,
    ws: Option<(mpsc::Sender<WsMsg>, mpsc::Receiver<WsMsg>)>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn new(pipeline: Pipeline, session: Arc<RenderSession>) -> Self {
        Self {
            pipeline,
            session,
            ws: None,
            shutdown_rx: None,
        }
    }

    /// Use a ws channel whose sender the socket acceptor already holds.
    pub fn with_ws_channel(mut self, tx: mpsc::Sender<WsMsg>, rx: mpsc::Receiver<WsMsg>) -> Self {
        self.ws = Some((tx, rx));
        self
    }

    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system until the shutdown signal fires (or, without
    /// one, until any actor stops).
    pub async fn run(mut self) -> Result<()> {
        let (publish_tx, publish_rx) = mpsc::channel::<PublishMsg>(CHANNEL_BUFFER);
        let (ws_tx, ws_rx) = self
            .ws
            .take()
            .unwrap_or_else(|| mpsc::channel::<WsMsg>(CHANNEL_BUFFER));

        let root = self.session.entry().parent_dir.clone();
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();
        let handle = WatchHandle::watch(&root, notify_tx)
            .with_context(|| format!("cannot watch {}", root.display()))?;
        self.session.attach_watch(handle);
        crate::debug!("watch"; "watching {}", root.display());

        let fs = FsActor::new(notify_rx, publish_tx.clone());
        let publish = PublishActor::new(
            publish_rx,
            ws_tx.clone(),
            self.pipeline.clone(),
            Arc::clone(&self.session),
        );
        let ws = WsActor::new(ws_rx);

        let mut fs_handle = tokio::spawn(fs.run());
        let mut publish_handle = tokio::spawn(publish.run());
        let mut ws_handle = tokio::spawn(ws.run());

        if let Some(rx) = self.shutdown_rx.take() {
            // crossbeam receiver is sync: poll it
            while rx.try_recv().is_err() {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            crate::debug!("actor"; "shutdown signal received");
        } else {
            tokio::select! {
                _ = &mut fs_handle => {}
                _ = &mut publish_handle => {}
                _ = &mut ws_handle => {}
            }
        }

        self.session.detach_watch();
        let _ = publish_tx.send(PublishMsg::Shutdown).await;
        let _ = ws_tx.send(WsMsg::Shutdown).await;

        let drain = async {
            let _ = publish_handle.await;
            let _ = ws_handle.await;
            let _ = fs_handle.await;
        };
        if tokio::time::timeout(Duration::from_secs(2), drain).await.is_err() {
            crate::debug!("actor"; "timed out waiting for actors");
        }
        Ok(())
    }
}
