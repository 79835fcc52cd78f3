//! Just enough of the Redis serialization protocol (RESP) to issue `GET`
//! and read scalar replies.

use ferrous_ptr_domain::DomainError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

const MAX_BULK_LEN: i64 = 512 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespValue {
    SimpleString(String),
    Error(String),
    Integer(i64),
    /// `None` is the null bulk string, Redis' "no such key".
    BulkString(Option<Vec<u8>>),
}

/// Encode a command as an array of bulk strings.
pub fn encode_command(args: &[&str]) -> Vec<u8> {
    let mut bytes = format!("*{}\r\n", args.len()).into_bytes();
    for arg in args {
        bytes.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
        bytes.extend_from_slice(arg.as_bytes());
        bytes.extend_from_slice(b"\r\n");
    }
    bytes
}

pub async fn read_value<R>(reader: &mut R) -> Result<RespValue, DomainError>
where
    R: AsyncBufRead + Unpin,
{
    let line = read_line(reader).await?;
    let (kind, rest) = line.split_at(1);

    match kind {
        "+" => Ok(RespValue::SimpleString(rest.to_string())),
        "-" => Ok(RespValue::Error(rest.to_string())),
        ":" => rest
            .parse::<i64>()
            .map(RespValue::Integer)
            .map_err(|e| protocol_error(format!("invalid integer reply '{}': {}", rest, e))),
        "$" => {
            let len = rest
                .parse::<i64>()
                .map_err(|e| protocol_error(format!("invalid bulk length '{}': {}", rest, e)))?;

            if len < 0 {
                return Ok(RespValue::BulkString(None));
            }
            if len > MAX_BULK_LEN {
                return Err(protocol_error(format!("bulk reply too large: {}", len)));
            }

            let mut data = vec![0u8; len as usize + 2];
            reader
                .read_exact(&mut data)
                .await
                .map_err(|e| DomainError::DiscoveryError(format!("read failed: {}", e)))?;

            if !data.ends_with(b"\r\n") {
                return Err(protocol_error("bulk reply missing CRLF".to_string()));
            }
            data.truncate(len as usize);

            Ok(RespValue::BulkString(Some(data)))
        }
        other => Err(protocol_error(format!("unexpected reply type '{}'", other))),
    }
}

async fn read_line<R>(reader: &mut R) -> Result<String, DomainError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .await
        .map_err(|e| DomainError::DiscoveryError(format!("read failed: {}", e)))?;

    if read == 0 {
        return Err(DomainError::DiscoveryError(
            "connection closed by server".to_string(),
        ));
    }

    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() || !line.is_char_boundary(1) {
        return Err(protocol_error("empty reply line".to_string()));
    }

    Ok(line.to_string())
}

fn protocol_error(message: String) -> DomainError {
    DomainError::DiscoveryError(format!("RESP protocol error: {}", message))
}
