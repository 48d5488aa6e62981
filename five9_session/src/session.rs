use log::{debug, info};
use serde_json::{Value, json};

use five9_core::de::list_from_value;
use five9_core::{CallCounterState, VccConfiguration, format_api_usage};

use crate::config::{SessionConfig, SessionType};
use crate::credentials::Credentials;
use crate::errors::SessionError;
use crate::history::History;
use crate::soap;
use crate::transport::{HttpTransport, Transport};

const NO_REQUEST: &str = "No request found in history";

/// An authenticated session against one of the web services.
///
/// Creating a session performs the calls needed to learn about the
/// domain, so a session that exists is known to work.
#[derive(Debug)]
pub struct Five9Session<T: Transport = HttpTransport> {
    config: SessionConfig,
    credentials: Credentials,
    transport: T,
    history: History,
    call_counters: Vec<CallCounterState>,
    vcc: Option<VccConfiguration>,
    operations: Option<Vec<String>>,
}

impl Five9Session<HttpTransport> {
    /// Connects over HTTPS.
    pub fn connect(config: SessionConfig, credentials: Credentials) -> Result<Self, SessionError> {
        let transport =
            HttpTransport::new().map_err(|e| SessionError::Creation(Box::new(e)))?;
        Self::with_transport(config, credentials, transport)
    }
}

impl<T: Transport> Five9Session<T> {
    pub fn with_transport(
        config: SessionConfig,
        credentials: Credentials,
        transport: T,
    ) -> Result<Self, SessionError> {
        info!("API definition: {}", config.wsdl_url(&credentials.username));

        let mut session = Self {
            config,
            credentials,
            transport,
            history: History::default(),
            call_counters: Vec::new(),
            vcc: None,
            operations: None,
        };
        session
            .initialize()
            .map_err(|e| SessionError::Creation(Box::new(e)))?;

        info!("Client ready for {}", session.credentials.username);
        Ok(session)
    }

    fn initialize(&mut self) -> Result<(), SessionError> {
        if self.config.session_type == SessionType::Admin {
            self.refresh_call_counters()?;
        }
        if self.config.session_type != SessionType::Statistics {
            let value = self.call("getVCCConfiguration", Value::Null)?;
            let vcc: VccConfiguration = serde_json::from_value(value)?;
            debug!("Domain {} ({})", vcc.domain_name, vcc.domain_id);
            self.vcc = Some(vcc);
        }
        Ok(())
    }

    /// Invokes a remote operation with a JSON object of named parameters.
    pub fn call(&mut self, operation: &str, params: Value) -> Result<Value, SessionError> {
        let url = self.config.endpoint_url();
        let envelope =
            soap::build_envelope(self.config.session_type.namespace(), operation, &params);
        let headers = vec![
            (
                "Content-Type".to_string(),
                "text/xml; charset=utf-8".to_string(),
            ),
            ("SOAPAction".to_string(), "\"\"".to_string()),
        ];

        debug!("Calling {}", operation);
        self.history
            .record_request(operation, &url, &headers, &envelope);
        let response = self
            .transport
            .post(&url, &headers, &envelope, &self.credentials)?;
        self.history.record_response(response.status, &response.body);

        soap::parse_response(response.status, &response.body)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn domain_name(&self) -> Option<&str> {
        self.vcc.as_ref().map(|vcc| vcc.domain_name.as_str())
    }

    pub fn domain_id(&self) -> Option<&str> {
        self.vcc.as_ref().map(|vcc| vcc.domain_id.as_str())
    }

    /// Counters captured when the session was created or last refreshed.
    pub fn call_counters(&self) -> &[CallCounterState] {
        &self.call_counters
    }

    pub fn refresh_call_counters(&mut self) -> Result<&[CallCounterState], SessionError> {
        let value = self.call("getCallCountersState", Value::Null)?;
        self.call_counters = list_from_value(value)?;
        Ok(&self.call_counters)
    }

    /// Fetches the counters and formats them per operation type.
    pub fn current_api_usage_formatted(&mut self) -> Result<String, SessionError> {
        let counters = self.refresh_call_counters()?;
        Ok(format_api_usage(counters))
    }

    /// Remote operations the service declares, sorted by name.
    pub fn operations(&mut self) -> Result<&[String], SessionError> {
        if self.operations.is_none() {
            let url = self.config.wsdl_url(&self.credentials.username);
            let response = self.transport.get(&url, &self.credentials)?;
            if !(200..300).contains(&response.status) {
                return Err(SessionError::Http {
                    status: response.status,
                    body: response.body,
                });
            }
            self.operations = Some(soap::wsdl_operations(&response.body)?);
        }
        Ok(self.operations.as_deref().unwrap_or_default())
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn latest_envelope_sent(&self) -> String {
        self.history
            .last()
            .map(|exchange| display_xml(&exchange.request_body))
            .unwrap_or_default()
    }

    pub fn latest_envelope_received(&self) -> String {
        self.history
            .last_received()
            .and_then(|exchange| exchange.response_body.as_deref())
            .map(display_xml)
            .unwrap_or_default()
    }

    /// Sent and received envelopes separated by a blank line.
    pub fn latest_envelopes(&self) -> String {
        [self.latest_envelope_sent(), self.latest_envelope_received()]
            .into_iter()
            .filter(|envelope| !envelope.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Headers of the latest request, including the authorization header.
    pub fn latest_request_headers(&self) -> String {
        let Some(exchange) = self.history.last() else {
            return NO_REQUEST.to_string();
        };
        let mut output = String::new();
        for (name, value) in &exchange.request_headers {
            output.push_str(&format!("{}: {}\n", name, value));
        }
        output.push_str(&format!("Authorization: {}", self.credentials.basic_auth()));
        output
    }

    /// Sets the statistics view for this session.
    pub fn set_session_parameters(&mut self, view_settings: Value) -> Result<(), SessionError> {
        self.call("setSessionParameters", json!({ "viewSettings": view_settings }))?;
        Ok(())
    }

    /// Fetches one statistics table, e.g. `AgentState` or `ACDStatus`.
    pub fn statistics(&mut self, statistic_type: &str) -> Result<Value, SessionError> {
        self.call("getStatistics", json!({ "statisticType": statistic_type }))
    }
}

fn display_xml(xml: &str) -> String {
    soap::pretty_print(xml).unwrap_or_else(|_| format!("{}\n", xml.trim_end()))
}
