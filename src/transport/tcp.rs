use std::io::ErrorKind;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::protocol::Message;
use crate::transport::Transport;

/// Default timeout for writing one frame (30 seconds).
const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum frame size (10 MB) to prevent excessive memory allocation.
pub const MAX_MESSAGE_SIZE: u32 = 10_000_000;

/// Length-prefixed bincode frames over a TCP stream.
///
/// Each frame is a big-endian `u32` length followed by that many bytes of
/// bincode. Reads wait indefinitely since a human player may take any
/// amount of time to answer; writes are bounded by a timeout.
pub struct TcpTransport {
    stream: TcpStream,
    write_timeout: Duration,
    max_message_size: u32,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_config(stream, DEFAULT_WRITE_TIMEOUT, MAX_MESSAGE_SIZE)
    }

    pub fn with_config(stream: TcpStream, write_timeout: Duration, max_message_size: u32) -> Self {
        Self {
            stream,
            write_timeout,
            max_message_size,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }
}

fn write_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset => {
            anyhow::anyhow!("Connection closed by peer")
        }
        _ => anyhow::anyhow!("Write error: {}", e),
    }
}

fn read_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        ErrorKind::UnexpectedEof => anyhow::anyhow!("Connection closed by peer"),
        ErrorKind::ConnectionReset => anyhow::anyhow!("Connection reset by peer"),
        _ => anyhow::anyhow!("Read error: {}", e),
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        let data =
            bincode::serialize(&msg).map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;
        if data.len() as u64 > self.max_message_size as u64 {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                data.len(),
                self.max_message_size
            ));
        }

        let len = (data.len() as u32).to_be_bytes();
        let stream = &mut self.stream;
        let send_op = async {
            stream.write_all(&len).await.map_err(write_error)?;
            stream.write_all(&data).await.map_err(write_error)?;
            stream.flush().await.map_err(write_error)?;
            anyhow::Ok(())
        };

        timeout(self.write_timeout, send_op)
            .await
            .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", self.write_timeout))?
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        let mut len_buf = [0u8; 4];
        self.stream
            .read_exact(&mut len_buf)
            .await
            .map_err(read_error)?;

        let len = u32::from_be_bytes(len_buf);
        if len > self.max_message_size {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                len,
                self.max_message_size
            ));
        }
        if len == 0 {
            return Err(anyhow::anyhow!("Invalid message length: 0"));
        }

        let mut buf = vec![0u8; len as usize];
        self.stream.read_exact(&mut buf).await.map_err(read_error)?;

        bincode::deserialize(&buf).map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))
    }
}
