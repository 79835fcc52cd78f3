//! Full message decoding for the packets the fast path in [`super::wire`]
//! turns away, and every error or truncation reply.

use ferrous_ptr_domain::PtrAnswer;
use hickory_proto::op::{Edns, Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::PTR;
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;
use tracing::{debug, error};

const DEFAULT_UDP_SIZE: u16 = 512;
const EDNS_UDP_SIZE: u16 = 4096;

/// Decode a request, keeping it only if it is a query.
pub fn decode(request: &[u8]) -> Option<Message> {
    match Message::from_vec(request) {
        Ok(message) if message.message_type() == MessageType::Query => Some(message),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, len = request.len(), "Request does not decode");
            None
        }
    }
}

/// Largest UDP response the client accepts (EDNS0, never below 512).
pub fn client_max_size(request: &Message) -> usize {
    request
        .extensions()
        .as_ref()
        .map_or(DEFAULT_UDP_SIZE, |edns| edns.max_payload().max(DEFAULT_UDP_SIZE)) as usize
}

/// Question name, without the trailing dot, when the request asks exactly
/// one IN-class PTR question.
pub fn ptr_question(request: &Message) -> Option<String> {
    if request.op_code() != OpCode::Query {
        return None;
    }

    match request.queries() {
        [query] if query.query_type() == RecordType::PTR && query.query_class() == DNSClass::IN => {
            Some(query.name().to_utf8().trim_end_matches('.').to_string())
        }
        _ => None,
    }
}

/// Response carrying one synthesized PTR record for the decoded request.
pub fn build_ptr_response(request: &Message, answer: &PtrAnswer) -> Option<Vec<u8>> {
    let owner = request.queries().first()?.name().clone();
    let target = match Name::from_str(&answer.target) {
        Ok(name) => name,
        Err(e) => {
            debug!(target = %answer.target, error = %e, "Synthesized target does not encode");
            return None;
        }
    };

    let mut response = reply_to(request, ResponseCode::NoError);
    response.add_answer(Record::from_rdata(owner, answer.ttl, RData::PTR(PTR(target))));
    encode(&response)
}

/// SERVFAIL for a request whose upstream relay failed.
pub fn build_servfail(request: &[u8]) -> Option<Vec<u8>> {
    encode(&error_reply(request, ResponseCode::ServFail))
}

/// Empty response with TC set, telling the client to retry over TCP.
pub fn build_truncated(request: &[u8]) -> Option<Vec<u8>> {
    let mut response = error_reply(request, ResponseCode::NoError);
    response.set_truncated(true);
    encode(&response)
}

/// FORMERR for a query that does not decode at all.
pub fn build_format_error(request: &[u8]) -> Option<Vec<u8>> {
    encode(&Message::error_msg(
        request_id(request),
        OpCode::Query,
        ResponseCode::FormErr,
    ))
}

/// Echoes the question and RD bit; EDNS clients get an OPT record back.
fn reply_to(request: &Message, response_code: ResponseCode) -> Message {
    let mut response = Message::error_msg(request.id(), request.op_code(), response_code);
    response.set_recursion_desired(request.recursion_desired());
    response.set_recursion_available(true);
    response.add_queries(request.queries().iter().cloned());

    if request.extensions().is_some() {
        let mut edns = Edns::new();
        edns.set_max_payload(EDNS_UDP_SIZE);
        response.set_edns(edns);
    }

    response
}

fn error_reply(request: &[u8], response_code: ResponseCode) -> Message {
    match decode(request) {
        Some(decoded) => reply_to(&decoded, response_code),
        None => Message::error_msg(request_id(request), OpCode::Query, response_code),
    }
}

fn request_id(request: &[u8]) -> u16 {
    match request {
        [hi, lo, ..] => u16::from_be_bytes([*hi, *lo]),
        _ => 0,
    }
}

fn encode(message: &Message) -> Option<Vec<u8>> {
    let mut buf = Vec::with_capacity(DEFAULT_UDP_SIZE as usize);
    let mut encoder = BinEncoder::new(&mut buf);
    if let Err(e) = message.emit(&mut encoder) {
        error!(id = message.id(), error = %e, "Failed to encode response");
        return None;
    }
    Some(buf)
}
