use std::collections::BTreeMap;

use log::warn;
use roxmltree::Document;

use five9_core::IvrScript;

const SKIPPED_MARKER: &str = "EXAMPLE";

/// Maps each dotted script variable to the IVRs that use it.
///
/// Only variables of the form `Group.name` are collected. Scripts whose
/// name contains `EXAMPLE` are ignored, and scripts whose XML cannot be
/// parsed are logged and skipped.
pub fn variable_usage(scripts: &[IvrScript]) -> BTreeMap<String, Vec<String>> {
    let mut usage: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for script in scripts {
        if script.name.contains(SKIPPED_MARKER) {
            continue;
        }

        let document = match Document::parse(&script.xml_definition) {
            Ok(document) => document,
            Err(e) => {
                warn!("Skipping IVR '{}': {}", script.name, e);
                continue;
            }
        };

        let variables = document
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "variableName")
            .filter_map(|n| n.text())
            .filter(|name| name.contains('.'));

        for variable in variables {
            let scripts = usage.entry(variable.to_string()).or_default();
            if !scripts.contains(&script.name) {
                scripts.push(script.name.clone());
            }
        }
    }

    usage
}
