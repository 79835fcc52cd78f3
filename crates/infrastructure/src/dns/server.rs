use super::message;
use super::wire::{self, WireQuery};
use ferrous_ptr_application::ports::UpstreamForwarder;
use ferrous_ptr_application::use_cases::HandlePtrQueryUseCase;
use ferrous_ptr_domain::{PtrAnswer, PtrQuery, RecordType, Synthesis};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Turns one inbound datagram into the datagram to send back.
///
/// PTR questions the policy can answer get a synthesized response; every
/// other well-formed query is relayed upstream byte for byte.
pub struct PtrServerHandler {
    use_case: Arc<HandlePtrQueryUseCase>,
    upstream: Arc<dyn UpstreamForwarder>,
}

impl PtrServerHandler {
    pub fn new(use_case: Arc<HandlePtrQueryUseCase>, upstream: Arc<dyn UpstreamForwarder>) -> Self {
        Self { use_case, upstream }
    }

    /// `None` means the packet is dropped without a reply.
    pub async fn handle(&self, request: &[u8], client_ip: IpAddr) -> Option<Vec<u8>> {
        if !wire::is_query(request) {
            debug!(client = %client_ip, len = request.len(), "Dropping malformed or non-query packet");
            return None;
        }

        let Some(query) = wire::parse_query(request) else {
            return self.handle_decoded(request, client_ip).await;
        };

        debug!(
            name = %query.name,
            record_type = %query.record_type,
            client = %client_ip,
            "DNS query received"
        );

        if let Some(response) = self.synthesize(&query, request, client_ip).await {
            return Some(response);
        }

        self.relay(request, query.client_max_size as usize).await
    }

    async fn synthesize(&self, query: &WireQuery, request: &[u8], client_ip: IpAddr) -> Option<Vec<u8>> {
        if !query.record_type.is_ptr() {
            return None;
        }

        let answer = self.answer(query.name.as_str(), client_ip).await?;

        match wire::build_ptr_response(query, request, &answer) {
            Some(response) => {
                log_answer(&answer, client_ip);
                Some(response)
            }
            None => {
                debug!(name = %answer.owner, "Synthesized answer does not fit, relaying");
                None
            }
        }
    }

    /// Slow path for queries the wire fast path turns away.
    async fn handle_decoded(&self, request: &[u8], client_ip: IpAddr) -> Option<Vec<u8>> {
        let Some(decoded) = message::decode(request) else {
            debug!(client = %client_ip, len = request.len(), "Undecodable query, answering FORMERR");
            return message::build_format_error(request);
        };
        let max_size = message::client_max_size(&decoded);

        if let Some(name) = message::ptr_question(&decoded) {
            debug!(name = %name, client = %client_ip, "DNS query received (full decode)");

            if let Some(answer) = self.answer(&name, client_ip).await {
                match message::build_ptr_response(&decoded, &answer) {
                    Some(response) if response.len() <= max_size => {
                        log_answer(&answer, client_ip);
                        return Some(response);
                    }
                    _ => debug!(name = %answer.owner, "Synthesized answer does not fit, relaying"),
                }
            }
        }

        self.relay(request, max_size).await
    }

    async fn answer(&self, name: &str, client_ip: IpAddr) -> Option<PtrAnswer> {
        let ptr_query = PtrQuery::new(name, RecordType::PTR, client_ip);

        match self.use_case.execute(&ptr_query).await {
            Synthesis::Answer(answer) => Some(answer),
            Synthesis::Fallthrough => None,
        }
    }

    async fn relay(&self, request: &[u8], max_size: usize) -> Option<Vec<u8>> {
        match self.upstream.forward(request).await {
            Ok(response) if response.len() > max_size => {
                debug!(
                    len = response.len(),
                    max_size, "Upstream response too large for UDP, truncating"
                );
                message::build_truncated(request)
            }
            Ok(response) => Some(response),
            Err(e) => {
                error!(
                    error = %e,
                    upstream = %self.upstream.server_name(),
                    "Upstream relay failed"
                );
                message::build_servfail(request)
            }
        }
    }
}

fn log_answer(answer: &PtrAnswer, client_ip: IpAddr) {
    info!(
        name = %answer.owner,
        target = %answer.target,
        ttl = answer.ttl,
        client = %client_ip,
        "Synthesized PTR answer"
    );
}
