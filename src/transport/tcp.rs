use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::protocol::{ClientEvent, ServerEvent};
use crate::transport::{read_frame, write_frame, Transport};

/// Default timeout for network operations (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client-side TCP transport speaking the server's framed protocol.
pub struct TcpTransport {
    stream: TcpStream,
    timeout_duration: Duration,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            timeout_duration: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(stream: TcpStream, timeout_duration: Duration) -> Self {
        Self {
            stream,
            timeout_duration,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, event: ClientEvent) -> anyhow::Result<()> {
        timeout(self.timeout_duration, write_frame(&mut self.stream, &event))
            .await
            .map_err(|_| anyhow::anyhow!("send timeout after {:?}", self.timeout_duration))?
    }

    async fn recv(&mut self) -> anyhow::Result<ServerEvent> {
        timeout(self.timeout_duration, read_frame(&mut self.stream))
            .await
            .map_err(|_| anyhow::anyhow!("receive timeout after {:?}", self.timeout_duration))?
    }
}
