//! Direct wire-format handling for the synthesis path.
//!
//! Inbound questions are decoded straight from the datagram and PTR answers
//! are written into a fresh buffer that reuses the client's question bytes,
//! so the owner name goes back exactly as it was asked.

use ferrous_ptr_domain::{PtrAnswer, RecordType};

const HEADER_LEN: usize = 12;
const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;
const DEFAULT_UDP_SIZE: u16 = 512;
const CLASS_IN: u16 = 1;
const TYPE_PTR: u16 = 12;
const TYPE_OPT: u16 = 41;

const FLAG_QR: u8 = 0x80;
const FLAG_RD: u8 = 0x01;
const FLAG_RA: u8 = 0x80;

const OPT_RECORD: [u8; 11] = [
    0x00, 0x00, 0x29, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// A standard single-question query in the IN class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireQuery {
    pub id: u16,
    pub recursion_desired: bool,
    /// Query name as sent, without the trailing dot.
    pub name: String,
    pub record_type: RecordType,
    /// Byte offset in the request where the question section ends.
    pub question_end: usize,
    /// Largest UDP response the client accepts (EDNS0, never below 512).
    pub client_max_size: u16,
    pub has_edns: bool,
}

/// True when the buffer carries at least a header and the QR bit is clear.
pub fn is_query(buf: &[u8]) -> bool {
    buf.len() >= HEADER_LEN && buf[2] & FLAG_QR == 0
}

/// Decode a query that the synthesis path may answer.
///
/// Returns `None` for anything else (non-QUERY opcode, zero or several
/// questions, non-IN class, compressed or non-printable question names,
/// broken additional section). Those go through [`super::message`].
pub fn parse_query(buf: &[u8]) -> Option<WireQuery> {
    if !is_query(buf) {
        return None;
    }

    let id = u16::from_be_bytes([buf[0], buf[1]]);
    let opcode = (buf[2] >> 3) & 0x0F;
    if opcode != 0 {
        return None;
    }

    let qdcount = u16::from_be_bytes([buf[4], buf[5]]);
    let ancount = u16::from_be_bytes([buf[6], buf[7]]);
    let nscount = u16::from_be_bytes([buf[8], buf[9]]);
    let arcount = u16::from_be_bytes([buf[10], buf[11]]);

    if qdcount != 1 || ancount != 0 || nscount != 0 {
        return None;
    }

    let mut pos = HEADER_LEN;
    let mut name = String::new();

    loop {
        let label_len = *buf.get(pos)? as usize;
        pos += 1;
        if label_len == 0 {
            break;
        }
        if label_len & 0xC0 != 0 || pos + label_len > buf.len() {
            return None;
        }

        let label = &buf[pos..pos + label_len];
        if !label.iter().all(|b| b.is_ascii_graphic() && *b != b'.') {
            return None;
        }
        if !name.is_empty() {
            name.push('.');
        }
        name.extend(label.iter().map(|&b| b as char));
        if name.len() > MAX_NAME_LEN {
            return None;
        }
        pos += label_len;
    }

    if pos + 4 > buf.len() {
        return None;
    }
    let qtype = u16::from_be_bytes([buf[pos], buf[pos + 1]]);
    let qclass = u16::from_be_bytes([buf[pos + 2], buf[pos + 3]]);
    pos += 4;

    if qclass != CLASS_IN {
        return None;
    }

    let question_end = pos;
    let (client_max_size, has_edns) = scan_additional(buf, question_end, arcount)?;

    Some(WireQuery {
        id,
        recursion_desired: buf[2] & FLAG_RD != 0,
        name,
        record_type: RecordType::from_code(qtype),
        question_end,
        client_max_size,
        has_edns,
    })
}

/// Walks the additional section looking for an EDNS0 OPT record.
fn scan_additional(buf: &[u8], start: usize, arcount: u16) -> Option<(u16, bool)> {
    let mut pos = start;
    let mut client_max_size = DEFAULT_UDP_SIZE;
    let mut has_edns = false;

    for _ in 0..arcount {
        // Only root-owned records (OPT, in practice) are accepted here.
        if *buf.get(pos)? != 0x00 {
            return None;
        }
        pos += 1;

        if pos + 10 > buf.len() {
            return None;
        }
        let rr_type = u16::from_be_bytes([buf[pos], buf[pos + 1]]);
        let rr_class = u16::from_be_bytes([buf[pos + 2], buf[pos + 3]]);
        let rdlen = u16::from_be_bytes([buf[pos + 8], buf[pos + 9]]) as usize;
        pos += 10 + rdlen;

        if pos > buf.len() {
            return None;
        }

        if rr_type == TYPE_OPT {
            has_edns = true;
            client_max_size = rr_class.max(DEFAULT_UDP_SIZE);
        }
    }

    Some((client_max_size, has_edns))
}

/// Uncompressed wire encoding of a fully qualified name.
fn encode_name(name: &str) -> Option<Vec<u8>> {
    let bare = name.strip_suffix('.').unwrap_or(name);
    if bare.is_empty() || bare.len() > MAX_NAME_LEN {
        return None;
    }

    let mut out = Vec::with_capacity(bare.len() + 2);
    for label in bare.split('.') {
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return None;
        }
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    Some(out)
}

/// Build the response carrying one synthesized PTR record.
///
/// Returns `None` if the target cannot be encoded or the response would not
/// fit in what the client accepts over UDP.
pub fn build_ptr_response(query: &WireQuery, request: &[u8], answer: &PtrAnswer) -> Option<Vec<u8>> {
    if query.question_end > request.len() {
        return None;
    }

    let rdata = encode_name(&answer.target)?;
    let question = &request[HEADER_LEN..query.question_end];
    let opt_len = if query.has_edns { OPT_RECORD.len() } else { 0 };
    let total = HEADER_LEN + question.len() + 12 + rdata.len() + opt_len;

    if total > query.client_max_size as usize {
        return None;
    }

    let mut buf = Vec::with_capacity(total);
    buf.extend_from_slice(&query.id.to_be_bytes());
    buf.push(FLAG_QR | if query.recursion_desired { FLAG_RD } else { 0 });
    buf.push(FLAG_RA);
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&0u16.to_be_bytes());
    buf.extend_from_slice(&(u16::from(query.has_edns)).to_be_bytes());

    buf.extend_from_slice(question);

    // Owner is a pointer back to the question name at offset 12.
    buf.extend_from_slice(&[0xC0, 0x0C]);
    buf.extend_from_slice(&TYPE_PTR.to_be_bytes());
    buf.extend_from_slice(&CLASS_IN.to_be_bytes());
    buf.extend_from_slice(&answer.ttl.to_be_bytes());
    buf.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    buf.extend_from_slice(&rdata);

    if query.has_edns {
        buf.extend_from_slice(&OPT_RECORD);
    }

    Some(buf)
}
