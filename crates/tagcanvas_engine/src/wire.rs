//! JSON shapes exchanged with the backend.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub(crate) const STATIC_PREFIX: &str = "/api/static/";

/// Path under which the backend serves a rendered file.
pub fn static_asset_path(filename: &str) -> String {
    format!("{STATIC_PREFIX}{filename}")
}

/// One element of the `/api/search` response array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitRequest<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default, deserialize_with = "lenient_id")]
    pub prompt_id: Option<String>,
}

/// Accepts a non-empty string or a non-zero number; anything else counts as
/// missing.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(id)) if !id.is_empty() => Some(id),
        Some(Value::Number(id)) if id.as_f64() != Some(0.0) => Some(id.to_string()),
        _ => None,
    })
}

/// Momentary answer from `/api/progress/<id>`.
///
/// Only the fields needed to decide readiness are inspected. Node entries
/// without an `images` list, and images without a `filename`, are skipped.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub outputs: Option<Value>,
}

impl ProgressSnapshot {
    pub fn is_ready(&self) -> bool {
        matches!(&self.status, Some(Value::String(status)) if status == "ready")
    }

    /// Asset paths of every rendered image, in document order, once the job
    /// is ready and carries outputs. `None` means keep polling.
    ///
    /// Falsy `outputs` (`null`, `false`, `0`, `""`) keep the job pending. Any
    /// other scalar holds no nodes, so the job is ready with no images.
    pub fn ready_images(&self) -> Option<Vec<String>> {
        if !self.is_ready() {
            return None;
        }
        let nodes: Vec<&Value> = match self.outputs.as_ref()? {
            Value::Object(map) => map.values().collect(),
            Value::Array(items) => items.iter().collect(),
            scalar if is_truthy(scalar) => Vec::new(),
            _ => return None,
        };
        let images = nodes
            .into_iter()
            .filter_map(|node| node.get("images")?.as_array())
            .flatten()
            .filter_map(|image| image.get("filename")?.as_str())
            .filter(|filename| !filename.is_empty())
            .map(static_asset_path)
            .collect();
        Some(images)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64() != Some(0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: Value) -> ProgressSnapshot {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn pending_snapshot_is_not_ready() {
        assert_eq!(snapshot(json!({"status": "pending"})).ready_images(), None);
        assert_eq!(snapshot(json!({})).ready_images(), None);
    }

    #[test]
    fn ready_without_outputs_keeps_polling() {
        assert_eq!(snapshot(json!({"status": "ready"})).ready_images(), None);
        assert_eq!(
            snapshot(json!({"status": "ready", "outputs": null})).ready_images(),
            None
        );
    }

    #[test]
    fn images_flatten_in_document_order() {
        let snap = snapshot(json!({
            "status": "ready",
            "outputs": {
                "9": {"images": [{"filename": "b.png"}, {"filename": "a.png"}]},
                "3": {"text": "no images here"},
                "12": {"images": "not-a-list"},
                "1": {"images": [{"filename": "c.png"}, {"subfolder": "x"}]}
            }
        }));
        assert_eq!(
            snap.ready_images(),
            Some(vec![
                "/api/static/b.png".to_string(),
                "/api/static/a.png".to_string(),
                "/api/static/c.png".to_string(),
            ])
        );
    }

    #[test]
    fn ready_with_empty_outputs_has_no_images() {
        let snap = snapshot(json!({"status": "ready", "outputs": {}}));
        assert_eq!(snap.ready_images(), Some(Vec::new()));
    }

    #[test]
    fn scalar_outputs_settle_by_truthiness() {
        for outputs in [json!(false), json!(0), json!("")] {
            let snap = snapshot(json!({"status": "ready", "outputs": outputs}));
            assert_eq!(snap.ready_images(), None, "outputs {outputs}");
        }
        for outputs in [json!(true), json!(7), json!("done")] {
            let snap = snapshot(json!({"status": "ready", "outputs": outputs}));
            assert_eq!(snap.ready_images(), Some(Vec::new()), "outputs {outputs}");
        }
    }

    #[test]
    fn prompt_id_accepts_strings_and_numbers() {
        let parse = |v: Value| serde_json::from_value::<SubmitResponse>(v).unwrap().prompt_id;
        assert_eq!(parse(json!({"prompt_id": "abc"})), Some("abc".to_string()));
        assert_eq!(parse(json!({"prompt_id": 42})), Some("42".to_string()));
        assert_eq!(parse(json!({"prompt_id": ""})), None);
        assert_eq!(parse(json!({"prompt_id": 0})), None);
        assert_eq!(parse(json!({"prompt_id": 0.0})), None);
        assert_eq!(parse(json!({"prompt_id": false})), None);
        assert_eq!(parse(json!({"prompt_id": null})), None);
        assert_eq!(parse(json!({})), None);
    }
}
