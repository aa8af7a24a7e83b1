//! WebSocket actor.
//!
//! Sole owner of the [`ReloadChannel`], so connection swaps and reload
//! broadcasts never race each other.

use super::messages::WsMsg;
use crate::reload::ReloadChannel;
use tokio::sync::mpsc;

pub struct WsActor {
    rx: mpsc::Receiver<WsMsg>,
    channel: ReloadChannel,
}

impl WsActor {
    pub fn new(rx: mpsc::Receiver<WsMsg>) -> Self {
        Self {
            rx,
            channel: ReloadChannel::new(),
        }
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::Reload => {
                    if self.channel.broadcast_reload() {
                        crate::debug!("reload"; "sent reload");
                    }
                }
                WsMsg::AddClient(stream) => {
                    if let Err(e) = self.channel.connect(stream) {
                        crate::log!("reload"; "{}", e);
                    }
                }
                WsMsg::Shutdown => break,
            }
        }
        self.channel.close();
        crate::debug!("reload"; "ws actor stopped");
    }
}
