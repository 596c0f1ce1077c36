//! Line-based client for the control socket.

use std::path::Path;

use futures_util::{SinkExt, StreamExt};
use panelmenu_types::{ControlRequest, ControlResponse};
use tokio::net::UnixStream;
use tokio_util::codec::{Framed, LinesCodec};

use crate::error::{DaemonError, Result};
use crate::server::MAX_LINE_LENGTH;

pub struct ControlClient {
    framed: Framed<UnixStream, LinesCodec>,
}

impl ControlClient {
    /// # Errors
    ///
    /// Returns an error if nothing is listening at `path`.
    pub async fn connect(path: &Path) -> Result<Self> {
        let stream = UnixStream::connect(path).await?;
        Ok(Self {
            framed: Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LENGTH)),
        })
    }

    /// Send one request and wait for its response line.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails, the reply is not valid JSON, or
    /// the daemon closes the connection first.
    pub async fn request(&mut self, request: &ControlRequest) -> Result<ControlResponse> {
        self.framed.send(serde_json::to_string(request)?).await?;
        match self.framed.next().await {
            Some(line) => Ok(serde_json::from_str(&line?)?),
            None => Err(DaemonError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "daemon closed the connection",
            ))),
        }
    }
}
