//! Framed wire transport: u32 big-endian length prefix, bincode payload.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::protocol::{ClientEvent, ServerEvent};

pub mod tcp;

/// Maximum frame size (1 MB) to prevent excessive memory allocation.
pub const MAX_FRAME_SIZE: u32 = 1_000_000;

/// Client-side seam over the server's framed protocol.
#[async_trait::async_trait]
pub trait Transport: Send {
    async fn send(&mut self, event: ClientEvent) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<ServerEvent>;
}

/// Write one length-prefixed bincode frame.
pub async fn write_frame<W, T>(writer: &mut W, value: &T) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let data =
        bincode::serialize(value).map_err(|e| anyhow::anyhow!("serialization error: {}", e))?;
    if data.len() as u32 > MAX_FRAME_SIZE {
        return Err(anyhow::anyhow!(
            "frame too large: {} bytes (max: {})",
            data.len(),
            MAX_FRAME_SIZE
        ));
    }

    let len = (data.len() as u32).to_be_bytes();
    writer.write_all(&len).await.map_err(write_error)?;
    writer.write_all(&data).await.map_err(write_error)?;
    Ok(())
}

/// Read one length-prefixed bincode frame.
pub async fn read_frame<R, T>(reader: &mut R) -> anyhow::Result<T>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await.map_err(read_error)?;

    let len = u32::from_be_bytes(len_buf);
    if len == 0 {
        return Err(anyhow::anyhow!("invalid frame length: 0"));
    }
    if len > MAX_FRAME_SIZE {
        return Err(anyhow::anyhow!(
            "frame too large: {} bytes (max: {})",
            len,
            MAX_FRAME_SIZE
        ));
    }

    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf).await.map_err(read_error)?;
    bincode::deserialize(&buf).map_err(|e| anyhow::anyhow!("deserialization error: {}", e))
}

fn read_error(err: std::io::Error) -> anyhow::Error {
    match err.kind() {
        std::io::ErrorKind::UnexpectedEof => anyhow::anyhow!("connection closed by peer"),
        std::io::ErrorKind::ConnectionReset => anyhow::anyhow!("connection reset by peer"),
        _ => anyhow::anyhow!("read error: {}", err),
    }
}

fn write_error(err: std::io::Error) -> anyhow::Error {
    match err.kind() {
        std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::ConnectionReset => {
            anyhow::anyhow!("connection closed by peer")
        }
        _ => anyhow::anyhow!("write error: {}", err),
    }
}
