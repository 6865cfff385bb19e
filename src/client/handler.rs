use log::{error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use zeroize::Zeroizing;

use crate::error::handlers::error_to_response;
use crate::error::{ProtocolError, ServiceError};
use crate::protocol::{ServiceContext, handle_request, parse_request};

/// One read from the client.
#[derive(Debug, PartialEq)]
pub(crate) enum RequestLine {
    Closed,
    TooLong,
    Line(Zeroizing<Vec<u8>>),
}

/// Handles one client connection using the Tokio async runtime.
///
/// - Reads newline-terminated requests, at most `max_request_length` bytes each.
/// - Dispatches requests through `handle_request`.
/// - Writes exactly one response line per request line.
pub async fn handle_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    ctx: Arc<ServiceContext>,
    max_request_length: usize,
) {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    loop {
        let response = match read_request_line(&mut reader, max_request_length).await {
            Ok(RequestLine::Closed) => {
                info!("Connection closed by client {}", client_addr);
                break;
            }
            Ok(RequestLine::TooLong) => {
                warn!("Request from {} exceeded {} bytes", client_addr, max_request_length);
                error_to_response(&ProtocolError::RequestTooLong(max_request_length).into())
            }
            Ok(RequestLine::Line(bytes)) => {
                let parsed = std::str::from_utf8(&bytes)
                    .map_err(|_| ProtocolError::MalformedRequest("request is not UTF-8".into()))
                    .and_then(parse_request);

                match parsed {
                    Ok(request) => {
                        info!("Received from {}: {:?}", client_addr, request);
                        handle_request(request, Arc::clone(&ctx)).await
                    }
                    Err(e) => {
                        warn!("Rejected request from {}: {}", client_addr, e);
                        error_to_response(&ServiceError::from(e))
                    }
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                break;
            }
        };

        if let Err(e) = write_half.write_all(response.to_line().as_bytes()).await {
            error!("Failed to write to {}: {}", client_addr, e);
            break;
        }
    }

    info!("Client {} disconnected", client_addr);
}

/// Reads one line without buffering more than `max_len + 1` bytes of it.
/// An oversized line is consumed up to its terminator and reported as `TooLong`.
pub(crate) async fn read_request_line<R>(reader: &mut R, max_len: usize) -> io::Result<RequestLine>
where
    R: AsyncBufRead + Unpin,
{
    let limit = max_len as u64 + 1;
    let mut buf = Zeroizing::new(Vec::new());

    let n = (&mut *reader).take(limit).read_until(b'\n', &mut buf).await?;
    if n == 0 {
        return Ok(RequestLine::Closed);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        return Ok(RequestLine::Line(buf));
    }

    if buf.len() <= max_len {
        // Final line without a terminator
        return Ok(RequestLine::Line(buf));
    }

    loop {
        buf.clear();
        let n = (&mut *reader).take(limit).read_until(b'\n', &mut buf).await?;
        if n == 0 || buf.last() == Some(&b'\n') {
            return Ok(RequestLine::TooLong);
        }
    }
}
