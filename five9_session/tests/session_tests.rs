//! Tests for session creation and remote calls over a scripted transport

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use assert_matches::assert_matches;
use serde_json::json;

use five9_core::lists::fields_mapping;
use five9_core::{ConfigService, ListUpdateSettings, ServiceError, UserSkill};
use five9_session::{
    Credentials, Five9Session, SessionConfig, SessionError, SessionType, Transport,
    TransportResponse,
};

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<TransportResponse>,
    sent: Vec<(String, String)>,
    wsdl: Option<TransportResponse>,
}

#[derive(Debug, Clone, Default)]
struct ScriptedTransport(Rc<RefCell<Script>>);

impl ScriptedTransport {
    fn reply(&self, status: u16, body: String) -> &Self {
        self.0
            .borrow_mut()
            .responses
            .push_back(TransportResponse { status, body });
        self
    }

    fn sent_bodies(&self) -> Vec<String> {
        self.0.borrow().sent.iter().map(|(_, body)| body.clone()).collect()
    }
}

impl Transport for ScriptedTransport {
    fn post(
        &self,
        url: &str,
        _headers: &[(String, String)],
        body: &str,
        _credentials: &Credentials,
    ) -> Result<TransportResponse, SessionError> {
        let mut script = self.0.borrow_mut();
        script.sent.push((url.to_string(), body.to_string()));
        script
            .responses
            .pop_front()
            .ok_or_else(|| SessionError::Transport("connection refused".to_string()))
    }

    fn get(&self, _url: &str, _credentials: &Credentials) -> Result<TransportResponse, SessionError> {
        self.0
            .borrow()
            .wsdl
            .clone()
            .ok_or_else(|| SessionError::Transport("connection refused".to_string()))
    }
}

fn envelope(body: &str) -> String {
    format!(
        "<env:Envelope xmlns:env=\"http://schemas.xmlsoap.org/soap/envelope/\">\
         <env:Body>{}</env:Body></env:Envelope>",
        body
    )
}

fn response(operation: &str, inner: &str) -> String {
    envelope(&format!(
        "<ns2:{op}Response xmlns:ns2=\"http://service.admin.ws.five9.com/\">{}</ns2:{op}Response>",
        inner,
        op = operation
    ))
}

fn counters_response() -> String {
    response(
        "getCallCountersState",
        "<return><timeout>60</timeout>\
         <callCounterStates><operationType>Query</operationType><value>2</value><limit>10</limit></callCounterStates>\
         </return>\
         <return><timeout>3600</timeout>\
         <callCounterStates><operationType>Query</operationType><value>5</value><limit>100</limit></callCounterStates>\
         <callCounterStates><operationType>Modify</operationType><value>1</value><limit>50</limit></callCounterStates>\
         </return>",
    )
}

fn vcc_response() -> String {
    response(
        "getVCCConfiguration",
        "<return><domainName>Acme Corp</domainName><domainId>1234</domainId></return>",
    )
}

fn admin_session(transport: &ScriptedTransport) -> Five9Session<ScriptedTransport> {
    transport.reply(200, counters_response()).reply(200, vcc_response());
    Five9Session::with_transport(
        SessionConfig::default(),
        Credentials::new("admin@example.com", "secret"),
        transport.clone(),
    )
    .unwrap()
}

#[test]
fn test_admin_session_learns_domain() {
    let transport = ScriptedTransport::default();
    let session = admin_session(&transport);

    assert_eq!(session.domain_name(), Some("Acme Corp"));
    assert_eq!(session.domain_id(), Some("1234"));
    assert_eq!(session.call_counters().len(), 2);

    let bodies = transport.sent_bodies();
    assert!(bodies[0].contains("getCallCountersState"));
    assert!(bodies[1].contains("getVCCConfiguration"));
}

#[test]
fn test_statistics_session_skips_admin_calls() {
    let transport = ScriptedTransport::default();
    let session = Five9Session::with_transport(
        SessionConfig::new(SessionType::Statistics),
        Credentials::new("supervisor@example.com", "secret"),
        transport.clone(),
    )
    .unwrap();

    assert_eq!(session.domain_name(), None);
    assert!(transport.sent_bodies().is_empty());
    assert_eq!(session.latest_envelopes(), "");
}

#[test]
fn test_creation_fails_on_fault() {
    let transport = ScriptedTransport::default();
    transport.reply(
        500,
        envelope(
            "<env:Fault><faultcode>env:Client</faultcode>\
             <faultstring>Bad credentials</faultstring></env:Fault>",
        ),
    );

    let result = Five9Session::with_transport(
        SessionConfig::default(),
        Credentials::new("admin@example.com", "wrong"),
        transport,
    );
    assert_matches!(result, Err(SessionError::Creation(cause)) => {
        assert_matches!(*cause, SessionError::Fault { ref message, .. } if message == "Bad credentials");
    });
}

#[test]
fn test_creation_fails_on_unreachable_host() {
    let result = Five9Session::with_transport(
        SessionConfig::default(),
        Credentials::new("admin@example.com", "secret"),
        ScriptedTransport::default(),
    );
    assert_matches!(result, Err(SessionError::Creation(_)));
}

#[test]
fn test_api_usage_formatted() {
    let transport = ScriptedTransport::default();
    let mut session = admin_session(&transport);
    transport.reply(200, counters_response());

    assert_eq!(
        session.current_api_usage_formatted().unwrap(),
        "Modify:\n\t 3600:       1/50\n\nQuery:\n\t   60:       2/10\n\t 3600:       5/100"
    );
}

#[test]
fn test_request_headers_include_authorization() {
    let transport = ScriptedTransport::default();
    let session = admin_session(&transport);

    let headers = session.latest_request_headers();
    assert!(headers.contains("Content-Type: text/xml; charset=utf-8\n"));
    assert!(headers.ends_with(&format!(
        "Authorization: {}",
        Credentials::new("admin@example.com", "secret").basic_auth()
    )));
}

#[test]
fn test_request_headers_without_history() {
    let transport = ScriptedTransport::default();
    let session = Five9Session::with_transport(
        SessionConfig::new(SessionType::Statistics),
        Credentials::new("supervisor@example.com", "secret"),
        transport,
    )
    .unwrap();
    assert_eq!(session.latest_request_headers(), "No request found in history");
}

#[test]
fn test_latest_envelopes_are_pretty_printed() {
    let transport = ScriptedTransport::default();
    let session = admin_session(&transport);

    let sent = session.latest_envelope_sent();
    assert!(sent.starts_with("<soapenv:Envelope"));
    assert!(sent.contains("\n    <ser:getVCCConfiguration>"));

    let received = session.latest_envelope_received();
    assert!(received.contains("<domainName>Acme Corp</domainName>"));

    assert_eq!(session.latest_envelopes(), format!("{}\n{}", sent, received));
}

#[test]
fn test_users_general_info_single_user() {
    let transport = ScriptedTransport::default();
    let mut session = admin_session(&transport);
    transport.reply(
        200,
        response(
            "getUsersGeneralInfo",
            "<return><userName>jdoe</userName><EMail>jdoe@example.com</EMail></return>",
        ),
    );

    let users = session.users_general_info().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["userName"], json!("jdoe"));
}

#[test]
fn test_modify_user_sends_record() {
    let transport = ScriptedTransport::default();
    let mut session = admin_session(&transport);
    transport.reply(200, response("modifyUser", ""));

    let record = json!({"userName": "jdoe", "fullName": "Jane Doe"});
    session
        .modify_user(record.as_object().unwrap())
        .unwrap();

    let bodies = transport.sent_bodies();
    assert!(bodies.last().unwrap().contains(
        "<ser:modifyUser><userGeneralInfo><userName>jdoe</userName><fullName>Jane Doe</fullName></userGeneralInfo></ser:modifyUser>"
    ));
}

#[test]
fn test_fault_maps_to_service_error() {
    let transport = ScriptedTransport::default();
    let mut session = admin_session(&transport);
    transport.reply(
        500,
        envelope(
            "<env:Fault><faultcode>env:Server</faultcode>\
             <faultstring>Campaign profile 'Nope' not found</faultstring></env:Fault>",
        ),
    );

    assert_matches!(
        session.campaign_profile_filter("Nope"),
        Err(ServiceError::Fault { .. })
    );
}

#[test]
fn test_report_calls() {
    let transport = ScriptedTransport::default();
    let mut session = admin_session(&transport);
    transport
        .reply(200, response("isReportRunning", "<return>false</return>"))
        .reply(200, response("getReportResultCsv", "<return>a,b\n1,2\n</return>"));

    assert!(!session.is_report_running("42", 10).unwrap());
    assert_eq!(session.report_result_csv("42").unwrap(), "a,b\n1,2\n");
}

#[test]
fn test_operations_from_wsdl() {
    let transport = ScriptedTransport::default();
    let mut session = admin_session(&transport);
    transport.0.borrow_mut().wsdl = Some(TransportResponse {
        status: 200,
        body: "<wsdl:definitions xmlns:wsdl=\"http://schemas.xmlsoap.org/wsdl/\">\
               <wsdl:portType name=\"AdminWebService\">\
               <wsdl:operation name=\"getSkills\"/><wsdl:operation name=\"addSkill\"/>\
               </wsdl:portType></wsdl:definitions>"
            .to_string(),
    });

    assert_eq!(session.operations().unwrap(), ["addSkill", "getSkills"]);
}

#[test]
fn test_creation_fails_without_domain_name() {
    let transport = ScriptedTransport::default();
    transport
        .reply(200, counters_response())
        .reply(
            200,
            response("getVCCConfiguration", "<return><domainId>1234</domainId></return>"),
        );

    let result = Five9Session::with_transport(
        SessionConfig::default(),
        Credentials::new("admin@example.com", "secret"),
        transport.clone(),
    );
    assert_matches!(result, Err(SessionError::Creation(_)));
}

#[test]
fn test_add_record_to_list_sends_row() {
    let transport = ScriptedTransport::default();
    let mut session = admin_session(&transport);
    transport.reply(
        200,
        response(
            "addRecordToList",
            "<return><identifier>9f0c-11</identifier></return>",
        ),
    );

    let headers = vec!["number1".to_string(), "uuid".to_string()];
    let mapping = fields_mapping(&headers, &headers[1..]).unwrap();
    let identifier = session
        .add_record_to_list(
            "outreach",
            &ListUpdateSettings::new(mapping),
            &["9135554444".to_string(), "abc&1".to_string()],
        )
        .unwrap();

    assert_eq!(identifier, "9f0c-11");
    let bodies = transport.sent_bodies();
    let body = bodies.last().unwrap();
    assert!(body.contains("<ser:addRecordToList><listName>outreach</listName>"));
    assert!(body.contains(
        "<fieldsMapping><columnNumber>2</columnNumber><fieldName>uuid</fieldName><key>true</key></fieldsMapping>"
    ));
    assert!(body.contains("<crmUpdateMode>UPDATE_FIRST</crmUpdateMode>"));
    assert!(body.contains(
        "<importData><values><item>9135554444</item><item>abc&amp;1</item></values></importData>"
    ));
}

#[test]
fn test_skill_lookup_and_assignment() {
    let transport = ScriptedTransport::default();
    let mut session = admin_session(&transport);
    transport
        .reply(
            200,
            response(
                "getSkill",
                "<return><id>266</id><name>omni</name><routeVoiceMails>false</routeVoiceMails></return>",
            ),
        )
        .reply(200, response("userSkillAdd", ""));

    let skill = session.skill("omni").unwrap();
    assert_eq!(skill.id, 266);
    assert!(!skill.route_voice_mails);

    session
        .user_skill_add(&UserSkill::new(&skill, "jdoe@acme"))
        .unwrap();
    let bodies = transport.sent_bodies();
    assert!(bodies.last().unwrap().contains(
        "<ser:userSkillAdd><userSkill><id>266</id><level>1</level><skillName>omni</skillName><userName>jdoe@acme</userName></userSkill></ser:userSkillAdd>"
    ));
}
