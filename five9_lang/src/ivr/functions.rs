use std::io::Read;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::read::{GzDecoder, ZlibDecoder};
use log::{debug, info};
use roxmltree::{Document, Node};

use super::IvrError;

/// A JavaScript function defined inside an IVR script.
#[derive(Debug, Clone, PartialEq)]
pub struct IvrFunction {
    pub name: String,
    pub arguments: Vec<String>,
    pub body: String,
}

impl IvrFunction {
    /// Renders the function as standalone JavaScript.
    pub fn to_javascript(&self) -> String {
        format!(
            "function {}({}) {{\n{}\n}}\n",
            self.name,
            self.arguments.join(", "),
            self.body
        )
    }
}

/// Extracts the script functions from an IVR XML definition.
///
/// Functions whose body cannot be decoded are logged and skipped.
pub fn extract_functions(xml: &str) -> Result<Vec<IvrFunction>, IvrError> {
    let document = Document::parse(xml)?;
    let mut functions = Vec::new();

    let Some(functions_node) = child(document.root_element(), "functions") else {
        debug!("IVR script has no functions section");
        return Ok(functions);
    };

    for entry in children(functions_node, "entry") {
        let Some(value) = child(entry, "value") else {
            continue;
        };
        let name = child_text(value, "name");
        let encoded = child_text(value, "functionBody");

        let Some(body) = decode_function_body(&encoded) else {
            info!("Could not decompress function: {}", name);
            continue;
        };

        let arguments = child(value, "arguments")
            .map(|list| {
                children(list, "arguments")
                    .map(|argument| child_text(argument, "name"))
                    .collect()
            })
            .unwrap_or_default();

        functions.push(IvrFunction {
            name,
            arguments,
            body,
        });
    }

    Ok(functions)
}

/// Decodes a base64 function body, trying zlib and then gzip.
pub fn decode_function_body(encoded: &str) -> Option<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = match STANDARD.decode(compact) {
        Ok(bytes) => bytes,
        Err(e) => {
            info!("Failed to decode function body: {}", e);
            return None;
        }
    };

    let mut body = String::new();
    if ZlibDecoder::new(bytes.as_slice())
        .read_to_string(&mut body)
        .is_ok()
    {
        return Some(body);
    }

    body.clear();
    match GzDecoder::new(bytes.as_slice()).read_to_string(&mut body) {
        Ok(_) => Some(body),
        Err(e) => {
            info!("Failed to decompress function body: {}", e);
            None
        }
    }
}

fn children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &'static str) -> Option<Node<'a, 'input>> {
    children(node, name).next()
}

fn child_text(node: Node, name: &'static str) -> String {
    child(node, name)
        .and_then(|n| n.text())
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}
