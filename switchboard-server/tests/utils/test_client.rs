use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use switchboard_core::{ClientEvent, ConnectionId, ServerEvent};
use switchboard_server::{RelayConfig, serve_with_listener};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Starts a relay on an ephemeral localhost port.
pub async fn start_test_server(config: RelayConfig) -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("Failed to bind test listener")?;
    let addr = listener.local_addr()?;

    tokio::spawn(serve_with_listener(
        listener,
        config,
        std::future::pending::<()>(),
    ));

    Ok(addr)
}

/// Plain HTTP/1.1 GET, returning the raw response.
pub async fn http_get(addr: SocketAddr, path: &str) -> Result<String> {
    let mut stream = TcpStream::connect(addr).await?;
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await?;

    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    Ok(response)
}

/// A signaling client speaking the JSON protocol over a real WebSocket.
pub struct TestClient {
    pub connection_id: ConnectionId,
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Connects and consumes the welcome frame.
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let (ws, _) = connect_async(format!("ws://{addr}/ws"))
            .await
            .context("WebSocket handshake failed")?;

        let mut client = Self {
            connection_id: ConnectionId::from(""),
            ws,
        };

        match client.recv(2000).await? {
            ServerEvent::Welcome { connection_id, .. } => client.connection_id = connection_id,
            other => anyhow::bail!("Expected welcome, got {:?}", other),
        }

        Ok(client)
    }

    pub async fn send(&mut self, event: &ClientEvent) -> Result<()> {
        let json = serde_json::to_string(event)?;
        self.send_raw(json).await
    }

    pub async fn send_raw(&mut self, text: String) -> Result<()> {
        self.ws
            .send(Message::text(text))
            .await
            .context("Failed to send frame")
    }

    /// Next server event, skipping control frames.
    pub async fn recv(&mut self, timeout_ms: u64) -> Result<ServerEvent> {
        let timeout = Duration::from_millis(timeout_ms);

        loop {
            let frame = tokio::time::timeout(timeout, self.ws.next())
                .await
                .context("Timeout waiting for server event")?;

            match frame {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str(text.as_str()).context("Undecodable server event");
                }
                Some(Ok(Message::Close(_))) | None => anyhow::bail!("Connection closed"),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e).context("WebSocket error"),
            }
        }
    }

    /// Succeeds if no server event arrives within `timeout_ms`.
    pub async fn expect_silence(&mut self, timeout_ms: u64) -> Result<()> {
        match self.recv(timeout_ms).await {
            Ok(event) => anyhow::bail!("Expected no event, got {:?}", event),
            Err(_) => Ok(()),
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.ws.close(None).await.context("Failed to close WebSocket")
    }
}
