//! SOAP envelopes built from and decoded into JSON values.
//!
//! The services use document/literal style with unqualified child
//! elements, so a request is the operation element in the service
//! namespace with one child per named parameter. Responses are decoded
//! without a schema: leaf elements become strings and repeated siblings
//! become arrays.

use std::fmt::Write;

use roxmltree::{Document, Node};
use serde_json::{Map, Value};

use crate::errors::SessionError;

const ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const WSDL_NS: &str = "http://schemas.xmlsoap.org/wsdl/";
const RESULT_ELEMENT: &str = "return";
const INDENT: &str = "  ";

/// Builds a request envelope for `operation` from a JSON object of parameters.
///
/// Objects become nested elements, arrays repeat their element, and null
/// values are left out.
pub fn build_envelope(namespace: &str, operation: &str, params: &Value) -> String {
    let mut body = String::new();
    if let Value::Object(fields) = params {
        for (name, value) in fields {
            write_element(&mut body, name, value);
        }
    }

    format!(
        "<soapenv:Envelope xmlns:soapenv=\"{}\" xmlns:ser=\"{}\">\
         <soapenv:Header/>\
         <soapenv:Body><ser:{op}>{}</ser:{op}></soapenv:Body>\
         </soapenv:Envelope>",
        ENVELOPE_NS,
        escape(namespace),
        body,
        op = operation
    )
}

fn write_element(output: &mut String, name: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                write_element(output, name, item);
            }
        }
        Value::Object(fields) => {
            let _ = write!(output, "<{}>", name);
            for (child, child_value) in fields {
                write_element(output, child, child_value);
            }
            let _ = write!(output, "</{}>", name);
        }
        Value::String(text) => {
            let _ = write!(output, "<{name}>{}</{name}>", escape(text));
        }
        other => {
            let _ = write!(output, "<{name}>{}</{name}>", other);
        }
    }
}

/// Escapes text for use in element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Decodes a response envelope into the value of its `return` element(s).
///
/// Operations without a result decode to `Value::Null`. A SOAP fault is
/// returned as [`SessionError::Fault`] whatever the HTTP status; any
/// other non-success status is [`SessionError::Http`].
pub fn parse_response(status: u16, xml: &str) -> Result<Value, SessionError> {
    let document = match Document::parse(xml) {
        Ok(document) => document,
        Err(_) if !is_success(status) => {
            return Err(SessionError::Http {
                status,
                body: xml.to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let body = document
        .root_element()
        .children()
        .find(|n| is_envelope_element(n, "Body"));
    let payload = body.and_then(|b| b.children().find(Node::is_element));

    if let Some(fault) = payload.filter(|p| is_envelope_element(p, "Fault")) {
        return Err(SessionError::Fault {
            code: child_text(fault, "faultcode"),
            message: child_text(fault, "faultstring"),
        });
    }

    if !is_success(status) {
        return Err(SessionError::Http {
            status,
            body: xml.to_string(),
        });
    }

    let payload = payload.ok_or_else(|| {
        SessionError::Decode("Response envelope has no body element".to_string())
    })?;

    match element_to_value(payload) {
        Value::Object(mut fields) => Ok(fields.remove(RESULT_ELEMENT).unwrap_or(Value::Null)),
        _ => Ok(Value::Null),
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn is_envelope_element(node: &Node, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(ENVELOPE_NS)
}

fn child_text(node: Node, name: &str) -> String {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| n.text())
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

/// Converts an element to JSON: leaves to strings, nil to null, repeated
/// children to arrays.
pub fn element_to_value(node: Node) -> Value {
    if node.attribute((XSI_NS, "nil")) == Some("true") {
        return Value::Null;
    }

    let mut children = node.children().filter(Node::is_element).peekable();
    if children.peek().is_none() {
        return Value::String(node.text().unwrap_or_default().to_string());
    }

    let mut fields = Map::new();
    for child in children {
        let name = child.tag_name().name().to_string();
        let value = element_to_value(child);
        match fields.get_mut(&name) {
            None => {
                fields.insert(name, value);
            }
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
    Value::Object(fields)
}

/// Re-indents an XML document for display. Leaf elements are kept verbatim.
pub fn pretty_print(xml: &str) -> Result<String, SessionError> {
    let document = Document::parse(xml)?;
    let mut output = String::new();
    write_pretty(&mut output, xml, document.root_element(), 0);
    Ok(output)
}

fn write_pretty(output: &mut String, source: &str, node: Node, level: usize) {
    let indent = INDENT.repeat(level);
    let range = node.range();
    let has_child_elements = node.children().any(|n| n.is_element());

    let (Some(first), Some(last)) = (node.first_child(), node.last_child()) else {
        let _ = writeln!(output, "{}{}", indent, &source[range]);
        return;
    };
    if !has_child_elements {
        let _ = writeln!(output, "{}{}", indent, &source[range]);
        return;
    }

    let start_tag = source[range.start..first.range().start].trim();
    let end_tag = source[last.range().end..range.end].trim();

    let _ = writeln!(output, "{}{}", indent, start_tag);
    for child in node.children().filter(Node::is_element) {
        write_pretty(output, source, child, level + 1);
    }
    let _ = writeln!(output, "{}{}", indent, end_tag);
}

/// Names of the operations declared in a WSDL document, sorted.
pub fn wsdl_operations(wsdl: &str) -> Result<Vec<String>, SessionError> {
    let document = Document::parse(wsdl)?;
    let mut operations: Vec<String> = document
        .descendants()
        .filter(|n| {
            n.is_element()
                && n.tag_name().name() == "portType"
                && n.tag_name().namespace() == Some(WSDL_NS)
        })
        .flat_map(|port_type| port_type.children())
        .filter(|n| n.is_element() && n.tag_name().name() == "operation")
        .filter_map(|n| n.attribute("name").map(str::to_string))
        .collect();
    operations.sort();
    operations.dedup();
    Ok(operations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ADMIN_NS: &str = "http://service.admin.ws.five9.com/";

    fn response(body: &str) -> String {
        format!(
            "<env:Envelope xmlns:env=\"{}\"><env:Header/><env:Body>{}</env:Body></env:Envelope>",
            ENVELOPE_NS, body
        )
    }

    #[test]
    fn test_build_envelope_without_params() {
        let envelope = build_envelope(ADMIN_NS, "getVCCConfiguration", &Value::Null);
        assert!(envelope.contains("<ser:getVCCConfiguration></ser:getVCCConfiguration>"));
        assert!(envelope.contains("xmlns:ser=\"http://service.admin.ws.five9.com/\""));
    }

    #[test]
    fn test_build_envelope_nests_and_repeats() {
        let params = json!({
            "userGeneralInfo": {"userName": "jdoe", "active": true, "skip": null},
            "rolesToRemove": ["Supervisor", "Reporting"]
        });
        let envelope = build_envelope(ADMIN_NS, "modifyUser", &params);
        assert!(envelope.contains(
            "<ser:modifyUser><userGeneralInfo><userName>jdoe</userName><active>true</active></userGeneralInfo>\
             <rolesToRemove>Supervisor</rolesToRemove><rolesToRemove>Reporting</rolesToRemove></ser:modifyUser>"
        ));
        assert!(!envelope.contains("skip"));
    }

    #[test]
    fn test_build_envelope_escapes_text() {
        let params = json!({"campaignName": "Sales & <Support>"});
        let envelope = build_envelope(ADMIN_NS, "getOutboundCampaign", &params);
        assert!(envelope.contains("<campaignName>Sales &amp; &lt;Support&gt;</campaignName>"));
        assert!(Document::parse(&envelope).is_ok());
    }

    #[test]
    fn test_parse_repeated_returns() {
        let xml = response(
            "<ns2:getSkillsResponse xmlns:ns2=\"http://service.admin.ws.five9.com/\">\
             <return><name>Sales</name><id>1</id></return>\
             <return><name>Support</name><id>2</id></return>\
             </ns2:getSkillsResponse>",
        );
        let value = parse_response(200, &xml).unwrap();
        assert_eq!(
            value,
            json!([{"name": "Sales", "id": "1"}, {"name": "Support", "id": "2"}])
        );
    }

    #[test]
    fn test_parse_void_response() {
        let xml = response("<ns2:modifyUserResponse xmlns:ns2=\"http://service.admin.ws.five9.com/\"/>");
        assert_eq!(parse_response(200, &xml).unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_nil_element() {
        let xml = response(
            "<ns2:getUserInfoResponse xmlns:ns2=\"x\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
             <return><fullName xsi:nil=\"true\"/><EMail></EMail></return>\
             </ns2:getUserInfoResponse>",
        );
        assert_eq!(
            parse_response(200, &xml).unwrap(),
            json!({"fullName": null, "EMail": ""})
        );
    }

    #[test]
    fn test_parse_fault() {
        let xml = response(
            "<env:Fault><faultcode>env:Server</faultcode>\
             <faultstring>Object 'Nope' not found</faultstring></env:Fault>",
        );
        assert_eq!(
            parse_response(500, &xml),
            Err(SessionError::Fault {
                code: "env:Server".to_string(),
                message: "Object 'Nope' not found".to_string()
            })
        );
    }

    #[test]
    fn test_parse_http_error_without_fault() {
        let result = parse_response(401, "<html>Unauthorized</html>");
        assert!(matches!(result, Err(SessionError::Http { status: 401, .. })));

        let result = parse_response(503, "Service Unavailable");
        assert!(matches!(result, Err(SessionError::Http { status: 503, .. })));
    }

    #[test]
    fn test_pretty_print() {
        let pretty = pretty_print("<a xmlns:p=\"urn:x\"><p:b><c>1</c></p:b><d/></a>").unwrap();
        assert_eq!(
            pretty,
            "<a xmlns:p=\"urn:x\">\n  <p:b>\n    <c>1</c>\n  </p:b>\n  <d/>\n</a>\n"
        );
    }

    #[test]
    fn test_wsdl_operations() {
        let wsdl = "<wsdl:definitions xmlns:wsdl=\"http://schemas.xmlsoap.org/wsdl/\">\
                    <wsdl:portType name=\"AdminWebService\">\
                    <wsdl:operation name=\"getSkills\"/>\
                    <wsdl:operation name=\"addSkill\"/>\
                    </wsdl:portType>\
                    <wsdl:binding><wsdl:operation name=\"getSkills\"/></wsdl:binding>\
                    </wsdl:definitions>";
        assert_eq!(wsdl_operations(wsdl).unwrap(), vec!["addSkill", "getSkills"]);
    }
}
