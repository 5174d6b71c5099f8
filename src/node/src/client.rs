//! Minimal client for the loader socket

use ptloader_core::protocol::encode_request;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

/// Send one identity and return the reply text
pub async fn query(socket: &Path, identity: &[u8]) -> std::io::Result<String> {
    let mut stream = UnixStream::connect(socket).await?;
    stream.write_all(&encode_request(identity)).await?;

    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).await?;

    Ok(String::from_utf8_lossy(&reply).into_owned())
}
