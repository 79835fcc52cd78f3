#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_ptr_application::ports::UpstreamForwarder;
use ferrous_ptr_domain::DomainError;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// Wire-format query built the way a stub resolver would.
pub fn build_query(id: u16, name: &str, record_type: RecordType) -> Vec<u8> {
    let mut query = Query::new();
    query.set_name(Name::from_str(name).unwrap());
    query.set_query_type(record_type);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(query);

    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message.emit(&mut encoder).unwrap();
    buf
}

/// Canned upstream reply: the request with QR/RA set and a fixed A answer
/// appended after the question.
pub fn canned_upstream_response(request: &[u8]) -> Vec<u8> {
    let mut response = request.to_vec();
    response[2] |= 0x80;
    response[3] = 0x80;
    response[6] = 0x00;
    response[7] = 0x01;
    response.extend_from_slice(&[
        0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x3C, 0x00, 0x04, 192, 0, 2, 1,
    ]);
    response
}

/// Fake upstream resolver speaking DNS over TCP.
pub struct MockTcpUpstream {
    pub addr: SocketAddr,
    pub connections: Arc<AtomicUsize>,
    pub queries: Arc<AtomicUsize>,
}

impl MockTcpUpstream {
    /// `mangle_id` makes every reply carry a different message id.
    pub async fn start(mangle_id: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));
        let queries = Arc::new(AtomicUsize::new(0));

        let conn_counter = Arc::clone(&connections);
        let query_counter = Arc::clone(&queries);
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                conn_counter.fetch_add(1, Ordering::SeqCst);
                let query_counter = Arc::clone(&query_counter);

                tokio::spawn(async move {
                    loop {
                        let mut len_buf = [0u8; 2];
                        if stream.read_exact(&mut len_buf).await.is_err() {
                            break;
                        }
                        let mut request = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                        if stream.read_exact(&mut request).await.is_err() {
                            break;
                        }
                        query_counter.fetch_add(1, Ordering::SeqCst);

                        let mut response = canned_upstream_response(&request);
                        if mangle_id {
                            response[0] ^= 0xFF;
                        }
                        let len = (response.len() as u16).to_be_bytes();
                        if stream.write_all(&len).await.is_err()
                            || stream.write_all(&response).await.is_err()
                        {
                            break;
                        }
                    }
                });
            }
        });

        Self {
            addr,
            connections,
            queries,
        }
    }
}

/// Fake Redis-protocol server that answers `GET` from a fixed map.
pub struct MockRedisServer {
    pub addr: SocketAddr,
    pub connections: Arc<AtomicUsize>,
    pub commands: Arc<Mutex<Vec<String>>>,
}

impl MockRedisServer {
    pub async fn start(values: HashMap<String, String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));
        let commands = Arc::new(Mutex::new(Vec::new()));
        let values = Arc::new(values);

        let conn_counter = Arc::clone(&connections);
        let command_log = Arc::clone(&commands);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                conn_counter.fetch_add(1, Ordering::SeqCst);
                let values = Arc::clone(&values);
                let command_log = Arc::clone(&command_log);

                tokio::spawn(async move {
                    let mut reader = BufReader::new(stream);
                    while let Some(args) = read_command(&mut reader).await {
                        command_log.lock().unwrap().push(args.join(" "));

                        let reply = match args.as_slice() {
                            [cmd, key] if cmd.eq_ignore_ascii_case("GET") => {
                                if key == "wrongtype" {
                                    b"-WRONGTYPE Operation against a key holding the wrong kind of value\r\n".to_vec()
                                } else {
                                    match values.get(key) {
                                        Some(v) => format!("${}\r\n{}\r\n", v.len(), v).into_bytes(),
                                        None => b"$-1\r\n".to_vec(),
                                    }
                                }
                            }
                            _ => b"-ERR unknown command\r\n".to_vec(),
                        };

                        if reader.get_mut().write_all(&reply).await.is_err() {
                            break;
                        }
                    }
                });
            }
        });

        Self {
            addr,
            connections,
            commands,
        }
    }
}

async fn read_command<R>(reader: &mut R) -> Option<Vec<String>>
where
    R: AsyncBufReadExt + Unpin,
{
    let mut line = String::new();
    if reader.read_line(&mut line).await.ok()? == 0 {
        return None;
    }
    let count: usize = line.trim_end().strip_prefix('*')?.parse().ok()?;

    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        line.clear();
        reader.read_line(&mut line).await.ok()?;
        let len: usize = line.trim_end().strip_prefix('$')?.parse().ok()?;
        let mut data = vec![0u8; len + 2];
        reader.read_exact(&mut data).await.ok()?;
        data.truncate(len);
        args.push(String::from_utf8(data).ok()?);
    }
    Some(args)
}

/// In-process upstream stand-in for handler tests.
#[derive(Default)]
pub struct MockUpstream {
    pub fail: bool,
    pub oversized: bool,
    pub forwarded: Mutex<Vec<Vec<u8>>>,
}

impl MockUpstream {
    pub fn forwarded_count(&self) -> usize {
        self.forwarded.lock().unwrap().len()
    }
}

#[async_trait]
impl UpstreamForwarder for MockUpstream {
    async fn forward(&self, request: &[u8]) -> Result<Vec<u8>, DomainError> {
        self.forwarded.lock().unwrap().push(request.to_vec());

        if self.fail {
            return Err(DomainError::TransportConnectionRefused {
                server: "mock".to_string(),
            });
        }

        let mut response = canned_upstream_response(request);
        if self.oversized {
            response.resize(2048, 0);
        }
        Ok(response)
    }

    fn server_name(&self) -> String {
        "mock upstream".to_string()
    }
}
