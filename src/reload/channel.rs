use super::{GREETING, RELOAD_TOKEN, ReloadError};
use crate::{debug, log};
use std::{net::TcpStream, time::Duration};
use tungstenite::{Message, WebSocket};

const IO_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    NoClient,
    ClientConnected,
}

/// Push channel to at most one browser tab.
///
/// A new connection replaces the previous one. Send failures are logged and
/// drop the client; they never propagate past this type.
#[derive(Default)]
pub struct ReloadChannel {
    client: Option<WebSocket<TcpStream>>,
}

impl ReloadChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ChannelState {
        match self.client {
            Some(_) => ChannelState::ClientConnected,
            None => ChannelState::NoClient,
        }
    }

    /// Complete the websocket handshake on `stream` and greet the client.
    pub fn connect(&mut self, stream: TcpStream) -> Result<(), ReloadError> {
        let _ = stream.set_nonblocking(false);
        // a stalled peer must not wedge the actor that owns this channel
        let _ = stream.set_read_timeout(Some(IO_TIMEOUT));
        let _ = stream.set_write_timeout(Some(IO_TIMEOUT));
        let ws = tungstenite::accept(stream).map_err(|e| ReloadError::Handshake(e.to_string()))?;
        self.attach(ws)
    }

    /// Adopt an already upgraded socket and greet it.
    pub fn attach(&mut self, mut ws: WebSocket<TcpStream>) -> Result<(), ReloadError> {
        ws.send(Message::text(GREETING))?;

        if let Some(mut previous) = self.client.replace(ws) {
            debug!("reload"; "replacing previous client");
            let _ = previous.close(None);
            let _ = previous.flush();
        } else {
            debug!("reload"; "client connected");
        }
        Ok(())
    }

    /// Send the reload token to the connected client, if any.
    ///
    /// Returns `true` when the token was delivered.
    pub fn broadcast_reload(&mut self) -> bool {
        let Some(ws) = self.client.as_mut() else {
            debug!("reload"; "no client connected");
            return false;
        };

        match ws.send(Message::text(RELOAD_TOKEN)) {
            Ok(()) => true,
            Err(e) => {
                log!("reload"; "client dropped: {}", e);
                self.client = None;
                false
            }
        }
    }

    /// Close the connection, if any.
    pub fn close(&mut self) {
        if let Some(mut ws) = self.client.take() {
            let _ = ws.close(None);
            let _ = ws.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{net::TcpListener, thread, time::Duration};

    fn read_text<S: std::io::Read + std::io::Write>(ws: &mut WebSocket<S>) -> String {
        loop {
            match ws.read().unwrap() {
                Message::Text(text) => return text.to_string(),
                Message::Ping(_) | Message::Pong(_) => continue,
                other => panic!("unexpected message: {other:?}"),
            }
        }
    }

    #[test]
    fn test_broadcast_without_client_is_noop() {
        let mut channel = ReloadChannel::new();
        assert_eq!(channel.state(), ChannelState::NoClient);
        assert!(!channel.broadcast_reload());
        assert_eq!(channel.state(), ChannelState::NoClient);
    }

    #[test]
    fn test_greeting_then_reload() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());

        let client = thread::spawn(move || {
            let (mut ws, _) = tungstenite::connect(url).unwrap();
            let greeting = read_text(&mut ws);
            let reload = read_text(&mut ws);
            (greeting, reload)
        });

        let (stream, _) = listener.accept().unwrap();
        let mut channel = ReloadChannel::new();
        channel.connect(stream).unwrap();
        assert_eq!(channel.state(), ChannelState::ClientConnected);
        assert!(channel.broadcast_reload());

        let (greeting, reload) = client.join().unwrap();
        assert_eq!(greeting, GREETING);
        assert_eq!(reload, RELOAD_TOKEN);
    }

    #[test]
    fn test_new_connection_replaces_old() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        let mut channel = ReloadChannel::new();

        let first_url = url.clone();
        let first = thread::spawn(move || {
            let (mut ws, _) = tungstenite::connect(first_url).unwrap();
            assert_eq!(read_text(&mut ws), GREETING);
            // replaced: the next frame is a close, never the reload token
            loop {
                match ws.read() {
                    Ok(Message::Text(text)) => return Some(text.to_string()),
                    Ok(Message::Close(_)) | Err(_) => return None,
                    Ok(_) => continue,
                }
            }
        });
        let (stream, _) = listener.accept().unwrap();
        channel.connect(stream).unwrap();

        let second = thread::spawn(move || {
            let (mut ws, _) = tungstenite::connect(url).unwrap();
            (read_text(&mut ws), read_text(&mut ws))
        });
        let (stream, _) = listener.accept().unwrap();
        channel.connect(stream).unwrap();
        assert!(channel.broadcast_reload());

        assert_eq!(first.join().unwrap(), None);
        assert_eq!(
            second.join().unwrap(),
            (GREETING.to_string(), RELOAD_TOKEN.to_string())
        );
    }

    #[test]
    fn test_send_failure_drops_client() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());

        let client = thread::spawn(move || {
            let (ws, _) = tungstenite::connect(url).unwrap();
            // greeting left unread so the close resets the connection
            thread::sleep(Duration::from_millis(50));
            drop(ws);
        });

        let (stream, _) = listener.accept().unwrap();
        let mut channel = ReloadChannel::new();
        channel.connect(stream).unwrap();
        client.join().unwrap();

        for _ in 0..50 {
            if !channel.broadcast_reload() {
                break;
            }
            thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(channel.state(), ChannelState::NoClient);
        // still a no-op afterwards
        assert!(!channel.broadcast_reload());
    }
}
