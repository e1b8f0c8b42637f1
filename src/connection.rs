use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::MemcacheCodec;
use crate::frame::{Request, Response};
use crate::Result;

pub struct Connection {
    stream: TcpStream,
    // Data is read from the socket into the read buffer. When a request is
    // parsed, the corresponding data is removed from the buffer.
    buffer: BytesMut,
    codec: MemcacheCodec,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Connection {
        Connection {
            stream,
            // Allocate the buffer with 4kb of capacity.
            buffer: BytesMut::with_capacity(4096),
            codec: MemcacheCodec,
        }
    }

    /// Read one framed request, buffering socket data until a full frame
    /// is available. Returns `None` when the peer closed the connection
    /// cleanly between requests.
    pub async fn read_request(&mut self) -> Result<Option<Request>> {
        loop {
            if let Some(request) = self.codec.decode(&mut self.buffer)? {
                return Ok(Some(request));
            }

            if self.stream.read_buf(&mut self.buffer).await? == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err("connection reset by peer".into());
            }
        }
    }

    pub async fn write_response(&mut self, response: Response) -> Result<()> {
        let mut buf = BytesMut::new();
        self.codec.encode(response, &mut buf)?;
        self.stream.write_all(&buf).await?;
        Ok(())
    }
}
