//! Live reload push channel.
//!
//! ```text
//! acceptor thread --AddClient(TcpStream)--> WsActor --owns--> ReloadChannel
//!                                              ^
//!                     PublishActor --Reload----+
//! ```
//!
//! - `channel` - single-client state machine (greeting, reload broadcast)
//! - `server`  - socket acceptor feeding new connections to the actor

mod channel;
mod server;

pub use channel::ReloadChannel;
pub use server::start_ws_server_with_channel;

use std::{io, net::SocketAddr};
use thiserror::Error;

/// Payload the browser client reacts to by reloading the page.
pub const RELOAD_TOKEN: &str = "reload";

/// Status message sent to every client right after it connects.
pub const GREETING: &str = "Socket server is running";

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("cannot bind live reload socket on {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("websocket handshake failed: {0}")]
    Handshake(String),

    #[error("cannot reach live reload client")]
    Send(#[from] tungstenite::Error),
}
