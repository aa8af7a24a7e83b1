//! Actor message definitions.

use std::{net::TcpStream, path::PathBuf};

/// Messages to the PublishActor.
#[derive(Debug)]
pub enum PublishMsg {
    /// One filesystem event under the deck root.
    Changed { paths: Vec<PathBuf> },
    Shutdown,
}

/// Messages to the WsActor.
#[derive(Debug)]
pub enum WsMsg {
    /// A cycle published a new artifact.
    Reload,
    /// Raw connection from the acceptor, handshake pending.
    AddClient(TcpStream),
    Shutdown,
}
