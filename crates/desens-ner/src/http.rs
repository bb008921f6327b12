use async_trait::async_trait;
use desens_core::TextSpan;
use serde_json::Value;
use std::time::Duration;

use crate::{RecognitionError, Recognizer, Result};

pub const DEFAULT_ENTITIES_KEY: &str = "ner/msra";

/// Client for a HanLP-style NER REST endpoint.
///
/// The chunk is posted as form field `text` with the API token in a
/// `token` header. The reply carries entities as
/// `{"data": {"<entities_key>": [[text, label, start, end], ...]}}`.
pub struct HttpRecognizer {
    client: reqwest::Client,
    url: String,
    token: String,
    entities_key: String,
}

impl HttpRecognizer {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::build(url.into(), token.into(), None)
    }

    /// Same as [`HttpRecognizer::new`] with a per-request timeout
    pub fn with_timeout(
        url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Self::build(url.into(), token.into(), Some(timeout))
    }

    fn build(url: String, token: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("desens/0.2 (document redaction)");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url,
            token,
            entities_key: DEFAULT_ENTITIES_KEY.to_string(),
        })
    }

    pub fn entities_key(mut self, key: impl Into<String>) -> Self {
        self.entities_key = key.into();
        self
    }
}

#[async_trait]
impl Recognizer for HttpRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<TextSpan>> {
        let response = self
            .client
            .post(&self.url)
            .header("token", &self.token)
            .form(&[("text", text)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RecognitionError::Status {
                status: response.status().as_u16(),
                url: self.url.clone(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RecognitionError::Decode(e.to_string()))?;

        parse_entities(&body, &self.entities_key)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Extract spans from a response body.
///
/// Entries that are not `[text, label, start, end]` tuples are skipped.
/// A body without the entities list yields no spans.
pub fn parse_entities(body: &Value, key: &str) -> Result<Vec<TextSpan>> {
    if let Some(error) = body.get("error") {
        let message = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(RecognitionError::Api(message));
    }

    let Some(entries) = body.get("data").and_then(|data| data.get(key)) else {
        tracing::debug!(key, "Response carries no entity list");
        return Ok(Vec::new());
    };

    let entries = entries.as_array().ok_or_else(|| {
        RecognitionError::Decode(format!("'{}' is not an array", key))
    })?;

    Ok(entries.iter().filter_map(parse_entity).collect())
}

fn parse_entity(entry: &Value) -> Option<TextSpan> {
    match entry.as_array()?.as_slice() {
        [text, label, start, end] => Some(TextSpan::new(
            text.as_str()?,
            label.as_str()?,
            usize::try_from(start.as_u64()?).ok()?,
            usize::try_from(end.as_u64()?).ok()?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desens_core::EntityLabel;
    use serde_json::json;

    #[test]
    fn test_parse_entities() {
        let body = json!({
            "code": 0,
            "data": {
                "ner/msra": [
                    ["孙中山", "PERSON", 0, 3],
                    ["连云港市审计局", "ORGANIZATION", 4, 11]
                ]
            }
        });

        let spans = parse_entities(&body, DEFAULT_ENTITIES_KEY).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0], TextSpan::new("孙中山", EntityLabel::Person, 0, 3));
        assert_eq!(spans[1].label, EntityLabel::Organization);
        assert_eq!(spans[1].end, 11);
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let body = json!({
            "data": {
                "ner/msra": [
                    ["孙中山", "NR", 0],
                    "garbage",
                    ["北京", "NS", 5, 7],
                    ["x", "NR", -1, 2]
                ]
            }
        });

        let spans = parse_entities(&body, DEFAULT_ENTITIES_KEY).unwrap();
        assert_eq!(spans, vec![TextSpan::new("北京", "NS", 5, 7)]);
    }

    #[test]
    fn test_missing_entities_is_empty() {
        let spans = parse_entities(&json!({"data": {}}), DEFAULT_ENTITIES_KEY).unwrap();
        assert!(spans.is_empty());

        let spans = parse_entities(&json!({}), DEFAULT_ENTITIES_KEY).unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_error_body() {
        let err = parse_entities(&json!({"error": "token expired"}), DEFAULT_ENTITIES_KEY)
            .unwrap_err();
        assert!(matches!(err, RecognitionError::Api(ref m) if m == "token expired"));
    }

    #[test]
    fn test_non_array_entities() {
        let body = json!({"data": {"ner/msra": "oops"}});
        assert!(matches!(
            parse_entities(&body, DEFAULT_ENTITIES_KEY),
            Err(RecognitionError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        // Port 9 (discard) on localhost is not expected to speak HTTP
        let recognizer = HttpRecognizer::with_timeout(
            "http://127.0.0.1:9/ner",
            "token",
            Duration::from_secs(2),
        )
        .unwrap();

        assert!(recognizer.recognize("孙中山").await.is_err());
    }
}
