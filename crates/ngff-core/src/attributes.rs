//! # Attribute and Version Resolution
//!
//! A raw group document comes in one of three layouts. [`resolve`] decides
//! which one applies, in this order, and returns the effective attributes,
//! the payload handed to the schema evaluator and exactly one version:
//!
//! 1. **Namespaced** (`zarr.json`, v0.5+): `attributes.ome` is an object.
//!    Effective attributes are `attributes.ome`, the payload is
//!    `attributes`. `attributes.ome.version` is mandatory.
//! 2. **Top-level**: a top-level `ome` object with a `version` (effective
//!    attributes = `ome`, payload = document), or a top-level string
//!    `version` (document is both).
//! 3. **Legacy** (`.zattrs`, v0.1 to v0.4): the document is both. The version
//!    is the first of `multiscales[0].version`, `plate.version`,
//!    `well.version`, else [`DEFAULT_LEGACY_VERSION`].
//!
//! When `attributes.ome` and legacy keys coexist, `attributes.ome` wins.
//!
//! [`DEFAULT_LEGACY_VERSION`]: crate::version::DEFAULT_LEGACY_VERSION

use serde::Serialize;
use serde_json::Value;

use crate::error::ResolveError;
use crate::version::SpecVersion;

/// Which layout rule produced a [`ResolvedAttributes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "layout")]
pub enum AttributesLayout {
    /// Attributes nested under `attributes.ome`.
    Namespaced,
    /// Version declared at the document root (`ome.version` or `version`).
    TopLevel,
    /// Pre-namespacing document.
    Legacy {
        /// True if no version was declared and the default was applied.
        defaulted: bool,
    },
}

/// Output of [`resolve`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAttributes {
    /// The logical NGFF attributes, used for classification and walking.
    pub effective: Value,
    /// The value validated against the schema.
    pub payload: Value,
    /// The declared or defaulted spec version.
    pub version: SpecVersion,
    /// Which rule applied.
    pub layout: AttributesLayout,
}

/// Resolve a raw group document into effective attributes and a version.
///
/// # Errors
///
/// - [`ResolveError::NotAnObject`] if `raw` is not a JSON object.
/// - [`ResolveError::MissingNamespacedVersion`] if `attributes.ome` has no
///   string `version`.
/// - [`ResolveError::InvalidVersion`] if a declared version cannot be parsed.
pub fn resolve(raw: &Value) -> Result<ResolvedAttributes, ResolveError> {
    let doc = raw.as_object().ok_or(ResolveError::NotAnObject {
        found: json_type_name(raw),
    })?;

    // Rule 1: attributes.ome
    if let Some(attributes) = doc.get("attributes").filter(|a| a.is_object()) {
        if let Some(ome) = attributes.get("ome").filter(|o| o.is_object()) {
            let declared = ome
                .get("version")
                .and_then(Value::as_str)
                .ok_or(ResolveError::MissingNamespacedVersion)?;
            return Ok(ResolvedAttributes {
                effective: ome.clone(),
                payload: attributes.clone(),
                version: parse_field(declared, "attributes.ome.version")?,
                layout: AttributesLayout::Namespaced,
            });
        }
    }

    // Rule 2: ome.version, then version
    if let Some(ome) = doc.get("ome").filter(|o| o.is_object()) {
        if let Some(declared) = ome.get("version").and_then(Value::as_str) {
            return Ok(ResolvedAttributes {
                effective: ome.clone(),
                payload: raw.clone(),
                version: parse_field(declared, "ome.version")?,
                layout: AttributesLayout::TopLevel,
            });
        }
    }
    if let Some(declared) = doc.get("version").and_then(Value::as_str) {
        return Ok(ResolvedAttributes {
            effective: raw.clone(),
            payload: raw.clone(),
            version: parse_field(declared, "version")?,
            layout: AttributesLayout::TopLevel,
        });
    }

    // Rule 3: legacy
    let (version, defaulted) = match legacy_version(raw)? {
        Some(version) => (version, false),
        None => (SpecVersion::default_legacy(), true),
    };
    Ok(ResolvedAttributes {
        effective: raw.clone(),
        payload: raw.clone(),
        version,
        layout: AttributesLayout::Legacy { defaulted },
    })
}

/// The version a legacy document declares, if any.
///
/// Only `multiscales[0]` is consulted: every multiscale entry of one
/// document shares a version.
fn legacy_version(doc: &Value) -> Result<Option<SpecVersion>, ResolveError> {
    let candidates: [(&'static str, Option<&Value>); 3] = [
        ("multiscales[0].version", doc.pointer("/multiscales/0/version")),
        ("plate.version", doc.pointer("/plate/version")),
        ("well.version", doc.pointer("/well/version")),
    ];
    for (field, value) in candidates {
        if let Some(declared) = value.and_then(Value::as_str) {
            return parse_field(declared, field).map(Some);
        }
    }
    Ok(None)
}

fn parse_field(declared: &str, field: &'static str) -> Result<SpecVersion, ResolveError> {
    SpecVersion::parse(declared).map_err(|source| ResolveError::InvalidVersion { field, source })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_image_uses_multiscales_version() {
        let doc = json!({
            "multiscales": [{
                "version": "0.4",
                "axes": [{"name": "y", "type": "space"}, {"name": "x", "type": "space"}],
                "datasets": [{"path": "0"}]
            }]
        });
        let resolved = resolve(&doc).unwrap();
        assert_eq!(resolved.version.as_str(), "0.4");
        assert_eq!(resolved.layout, AttributesLayout::Legacy { defaulted: false });
        assert_eq!(resolved.effective, doc);
        assert_eq!(resolved.payload, doc);
    }

    #[test]
    fn legacy_without_version_defaults_to_0_4() {
        let doc = json!({"multiscales": [{"datasets": [{"path": "0"}]}]});
        let resolved = resolve(&doc).unwrap();
        assert_eq!(resolved.version.as_str(), "0.4");
        assert_eq!(resolved.layout, AttributesLayout::Legacy { defaulted: true });
    }

    #[test]
    fn legacy_plate_and_well_versions() {
        let plate = json!({"plate": {"version": "0.3", "wells": []}});
        assert_eq!(resolve(&plate).unwrap().version.as_str(), "0.3");

        let well = json!({"well": {"version": "0.2", "images": []}});
        assert_eq!(resolve(&well).unwrap().version.as_str(), "0.2");
    }

    #[test]
    fn only_first_multiscale_is_consulted() {
        let doc = json!({"multiscales": [{}, {"version": "0.1"}]});
        let resolved = resolve(&doc).unwrap();
        assert_eq!(resolved.version.as_str(), "0.4");
        assert_eq!(resolved.layout, AttributesLayout::Legacy { defaulted: true });
    }

    #[test]
    fn empty_multiscales_falls_through_to_plate() {
        let doc = json!({"multiscales": [], "plate": {"version": "0.2"}});
        assert_eq!(resolve(&doc).unwrap().version.as_str(), "0.2");
    }

    #[test]
    fn namespaced_document_unwraps_attributes_ome() {
        let doc = json!({
            "zarr_format": 3,
            "node_type": "group",
            "attributes": {
                "ome": {
                    "version": "0.5",
                    "multiscales": [{"datasets": [{"path": "0"}]}]
                }
            }
        });
        let resolved = resolve(&doc).unwrap();
        assert_eq!(resolved.version.as_str(), "0.5");
        assert_eq!(resolved.layout, AttributesLayout::Namespaced);
        assert_eq!(resolved.effective, doc["attributes"]["ome"]);
        assert_eq!(resolved.payload, doc["attributes"]);
    }

    #[test]
    fn namespaced_without_version_is_an_error() {
        let doc = json!({"attributes": {"ome": {"multiscales": []}}});
        let err = resolve(&doc).unwrap_err();
        assert_eq!(err, ResolveError::MissingNamespacedVersion);
        assert!(err.to_string().contains("no version found under attributes.ome"));
    }

    #[test]
    fn namespaced_wins_over_legacy_keys() {
        // Transitional documents: the latest rule gives attributes.ome precedence.
        let doc = json!({
            "multiscales": [{"version": "0.4"}],
            "version": "0.3",
            "attributes": {"ome": {"version": "0.5", "plate": {}}}
        });
        let resolved = resolve(&doc).unwrap();
        assert_eq!(resolved.version.as_str(), "0.5");
        assert_eq!(resolved.layout, AttributesLayout::Namespaced);
        assert!(resolved.effective.get("plate").is_some());
    }

    #[test]
    fn top_level_ome_version() {
        let doc = json!({"ome": {"version": "0.5", "well": {"images": []}}});
        let resolved = resolve(&doc).unwrap();
        assert_eq!(resolved.version.as_str(), "0.5");
        assert_eq!(resolved.layout, AttributesLayout::TopLevel);
        assert_eq!(resolved.effective, doc["ome"]);
        assert_eq!(resolved.payload, doc);
        assert_eq!(
            crate::kind::classify(&resolved.effective),
            vec![crate::kind::ObjectKind::Well]
        );
    }

    #[test]
    fn top_level_version_field() {
        let doc = json!({"version": "0.6.dev2", "multiscales": []});
        let resolved = resolve(&doc).unwrap();
        assert_eq!(resolved.version.as_str(), "0.6.dev2");
        assert_eq!(resolved.layout, AttributesLayout::TopLevel);
        assert_eq!(resolved.effective, doc);
    }

    #[test]
    fn non_objects_are_rejected() {
        assert_eq!(
            resolve(&json!([1])).unwrap_err(),
            ResolveError::NotAnObject { found: "array" }
        );
    }

    #[test]
    fn unparseable_versions_name_their_field() {
        let doc = json!({"plate": {"version": "latest"}});
        match resolve(&doc).unwrap_err() {
            ResolveError::InvalidVersion { field, .. } => assert_eq!(field, "plate.version"),
            other => panic!("expected InvalidVersion, got {other:?}"),
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        /// Legacy documents without any declared version always resolve to 0.4.
        #[test]
        fn undeclared_legacy_versions_default(
            extra_keys in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..6),
            datasets in 0usize..4,
        ) {
            let mut map: serde_json::Map<String, Value> = extra_keys
                .into_iter()
                .filter(|(k, _)| k != "version" && k != "attributes" && k != "ome")
                .map(|(k, v)| (k, json!(v)))
                .collect();
            let datasets: Vec<Value> =
                (0..datasets).map(|i| json!({"path": i.to_string()})).collect();
            map.insert("multiscales".into(), json!([{"datasets": datasets}]));
            let resolved = resolve(&Value::Object(map)).unwrap();
            prop_assert_eq!(resolved.version.as_str(), "0.4");
            prop_assert_eq!(resolved.layout, AttributesLayout::Legacy { defaulted: true });
        }
    }
}
