//! Live reload socket acceptor.

use super::ReloadError;
use crate::actor::messages::WsMsg;
use std::{
    io::ErrorKind,
    net::{SocketAddr, TcpListener},
    thread,
    time::Duration,
};
use tokio::sync::mpsc;

/// Bind `addr` and hand every accepted connection to the `WsActor`.
///
/// Binding failure is returned to the caller; there is no fallback port.
/// The acceptor thread exits once the actor's channel closes.
pub fn start_ws_server_with_channel(
    addr: SocketAddr,
    ws_tx: mpsc::Sender<WsMsg>,
) -> Result<SocketAddr, ReloadError> {
    let bind_err = |source| ReloadError::Bind { addr, source };
    let listener = TcpListener::bind(addr).map_err(bind_err)?;
    let local = listener.local_addr().map_err(bind_err)?;
    listener.set_nonblocking(true).map_err(bind_err)?;

    thread::spawn(move || {
        loop {
            if ws_tx.is_closed() {
                break;
            }
            match listener.accept() {
                Ok((stream, peer)) => {
                    crate::debug!("reload"; "connection from {}", peer);
                    let _ = stream.set_nonblocking(false);
                    if ws_tx.blocking_send(WsMsg::AddClient(stream)).is_err() {
                        break;
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    crate::log!("reload"; "accept error: {}", e);
                    thread::sleep(Duration::from_millis(100));
                }
            }
        }
    });

    Ok(local)
}
