//! Google Translate adapter using the public `gtx` endpoint.

use super::http::HttpClient;
use super::Translator;
use crate::error::UpstreamError;
use serde_json::Value;

const TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

pub struct GoogleTranslator {
    http: HttpClient,
}

impl GoogleTranslator {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

/// The response is a nested array; element `[0]` holds one
/// `[translated, original, ...]` segment per sentence.
fn join_segments(body: &Value) -> Result<String, UpstreamError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| UpstreamError::Translation("unexpected response shape".into()))?;
    let text: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .collect();
    if text.is_empty() {
        return Err(UpstreamError::Translation("empty translation".into()));
    }
    Ok(text)
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, UpstreamError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }
        let query = [
            ("client", "gtx".to_string()),
            ("sl", "auto".to_string()),
            ("tl", target_lang.to_string()),
            ("dt", "t".to_string()),
            ("q", text.to_string()),
        ];
        let body: Value = self
            .http
            .get_json(TRANSLATE_URL, &query)
            .map_err(|e| UpstreamError::Translation(e.to_string()))?;
        join_segments(&body)
    }
}
