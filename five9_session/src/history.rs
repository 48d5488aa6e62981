use std::collections::VecDeque;

/// One request sent by a session and the reply to it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub operation: String,
    pub url: String,
    pub request_headers: Vec<(String, String)>,
    pub request_body: String,
    pub response_status: Option<u16>,
    pub response_body: Option<String>,
}

/// Bounded log of the most recent exchanges.
#[derive(Debug, Clone)]
pub struct History {
    exchanges: VecDeque<Exchange>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl History {
    pub const DEFAULT_CAPACITY: usize = 10;

    pub fn new(capacity: usize) -> Self {
        Self {
            exchanges: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn record_request(
        &mut self,
        operation: &str,
        url: &str,
        headers: &[(String, String)],
        body: &str,
    ) {
        if self.exchanges.len() == self.capacity {
            self.exchanges.pop_front();
        }
        self.exchanges.push_back(Exchange {
            operation: operation.to_string(),
            url: url.to_string(),
            request_headers: headers.to_vec(),
            request_body: body.to_string(),
            response_status: None,
            response_body: None,
        });
    }

    /// Attaches a reply to the latest request.
    pub fn record_response(&mut self, status: u16, body: &str) {
        if let Some(exchange) = self.exchanges.back_mut() {
            exchange.response_status = Some(status);
            exchange.response_body = Some(body.to_string());
        }
    }

    pub fn last(&self) -> Option<&Exchange> {
        self.exchanges.back()
    }

    /// The most recent exchange that received a reply.
    pub fn last_received(&self) -> Option<&Exchange> {
        self.exchanges
            .iter()
            .rev()
            .find(|exchange| exchange.response_body.is_some())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter()
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }
}
