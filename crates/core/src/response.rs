//! Response lifecycle
//!
//! A request slot moves `Loading -> Failed | Ready` exactly once per
//! request. Completions that arrive for a request the slot no longer tracks
//! are discarded.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error_detection::{present, ErrorDetectionResult, ErrorDetectionView};
use crate::format::{format_response, Segment};
use crate::request::RequestError;

/// The single active state of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

/// Result of an AI request.
pub type AiResponse = ResponseState<ProviderOutput>;

/// Result of an OCR request: the extracted text.
pub type ImageUploadResponse = ResponseState<String>;

impl<T> ResponseState<T> {
    /// Terminal state for a finished call. Errors become `Failed`.
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => ResponseState::Ready(value),
            Err(e) => ResponseState::Failed(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ResponseState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ResponseState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn content(&self) -> Option<&T> {
        match self {
            ResponseState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }
}

impl<T: Serialize> ResponseState<T> {
    /// Wire shape `{loading, error, <content_key>}` with exactly one field set.
    pub fn to_json(&self, content_key: &str) -> serde_json::Value {
        let content = self
            .content()
            .and_then(|value| serde_json::to_value(value).ok())
            .unwrap_or(serde_json::Value::Null);

        let mut object = serde_json::Map::new();
        object.insert("loading".to_string(), self.is_loading().into());
        object.insert(
            "error".to_string(),
            self.error()
                .map(|message| serde_json::Value::String(message.to_string()))
                .unwrap_or(serde_json::Value::Null),
        );
        object.insert(content_key.to_string(), content);
        serde_json::Value::Object(object)
    }
}

/// What the AI collaborator hands back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderOutput {
    ErrorDetection(ErrorDetectionResult),
    Text(String),
}

/// Render-ready output for a finished AI response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "body", rename_all = "snake_case")]
pub enum Rendered {
    Segments(Vec<Segment>),
    ErrorDetection(ErrorDetectionView),
}

/// Route provider output to the matching formatter.
///
/// Error detection results bypass fence scanning entirely.
pub fn render_output(output: &ProviderOutput) -> Rendered {
    match output {
        ProviderOutput::Text(raw) => Rendered::Segments(format_response(raw)),
        ProviderOutput::ErrorDetection(result) => Rendered::ErrorDetection(present(result)),
    }
}

/// Handle for one dispatched request.
///
/// Consumed by [`RequestSlot::resolve`], so a request resolves at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// One request lane holding at most one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSlot<T> {
    generation: u64,
    state: Option<ResponseState<T>>,
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            state: None,
        }
    }
}

impl<T> RequestSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state; `None` before the first request or after a reset.
    pub fn state(&self) -> Option<&ResponseState<T>> {
        self.state.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.state.as_ref().is_some_and(ResponseState::is_loading)
    }

    /// Start a request. Rejected while the previous one is still loading.
    pub fn begin(&mut self) -> Result<Ticket, RequestError> {
        if self.is_loading() {
            return Err(RequestError::RequestInFlight);
        }

        self.generation += 1;
        self.state = Some(ResponseState::Loading);
        Ok(Ticket {
            generation: self.generation,
        })
    }

    /// Apply the outcome of the request behind `ticket`.
    ///
    /// Returns `false` and leaves the slot untouched when the ticket is stale.
    pub fn resolve<E: Display>(&mut self, ticket: Ticket, result: Result<T, E>) -> bool {
        if ticket.generation != self.generation || !self.is_loading() {
            return false;
        }

        self.state = Some(ResponseState::from_result(result));
        true
    }

    /// Forget the current request. Any in-flight completion becomes stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = None;
    }

    /// Move the state out, leaving the slot empty.
    pub fn take(&mut self) -> Option<ResponseState<T>> {
        self.state.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_fields<T>(state: &ResponseState<T>) -> usize {
        [
            state.is_loading(),
            state.error().is_some(),
            state.content().is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    // ============================================================================
    // ResponseState
    // ============================================================================

    #[test]
    fn test_exactly_one_field_active() {
        let states: Vec<ResponseState<String>> = vec![
            ResponseState::Loading,
            ResponseState::Failed("boom".to_string()),
            ResponseState::Ready("text".to_string()),
        ];
        for state in &states {
            assert_eq!(active_fields(state), 1, "{state:?}");
        }
    }

    #[test]
    fn test_from_result() {
        let ok: ResponseState<u8> = ResponseState::from_result(Ok::<_, String>(1));
        assert_eq!(ok, ResponseState::Ready(1));

        let failed: ResponseState<u8> =
            ResponseState::from_result(Err::<u8, _>("network down".to_string()));
        assert_eq!(failed.error(), Some("network down"));
    }

    #[test]
    fn test_to_json_shape() {
        let state: ImageUploadResponse = ResponseState::Ready("hello".to_string());
        assert_eq!(
            state.to_json("text"),
            serde_json::json!({ "loading": false, "error": null, "text": "hello" })
        );

        let state: ImageUploadResponse = ResponseState::Loading;
        assert_eq!(
            state.to_json("text"),
            serde_json::json!({ "loading": true, "error": null, "text": null })
        );

        let state: AiResponse = ResponseState::Failed("bad key".to_string());
        assert_eq!(
            state.to_json("content"),
            serde_json::json!({ "loading": false, "error": "bad key", "content": null })
        );
    }

    // ============================================================================
    // render_output
    // ============================================================================

    #[test]
    fn test_render_text_goes_through_formatter() {
        let rendered = render_output(&ProviderOutput::Text("a```\nb\n```".to_string()));
        assert_eq!(
            rendered,
            Rendered::Segments(vec![
                Segment::Text("a".to_string()),
                Segment::Code("b".to_string())
            ])
        );
    }

    #[test]
    fn test_render_error_detection_bypasses_formatter() {
        let result = ErrorDetectionResult {
            errors: "none".to_string(),
            corrected_code: "```\nx\n```".to_string(),
        };
        let rendered = render_output(&ProviderOutput::ErrorDetection(result));
        match rendered {
            Rendered::ErrorDetection(view) => assert_eq!(view.corrected_view, "```\nx\n```"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_provider_output_deserializes_both_shapes() {
        let output: ProviderOutput =
            serde_json::from_str(r#"{"errors":"e","correctedCode":"c"}"#).unwrap();
        assert!(matches!(output, ProviderOutput::ErrorDetection(_)));

        let output: ProviderOutput = serde_json::from_str(r#""plain""#).unwrap();
        assert_eq!(output, ProviderOutput::Text("plain".to_string()));
    }

    // ============================================================================
    // RequestSlot
    // ============================================================================

    #[test]
    fn test_slot_starts_empty() {
        let slot: RequestSlot<String> = RequestSlot::new();
        assert!(slot.state().is_none());
        assert!(!slot.is_loading());
    }

    #[test]
    fn test_slot_rejects_second_request_while_loading() {
        let mut slot: RequestSlot<String> = RequestSlot::new();
        let _ticket = slot.begin().unwrap();
        assert_eq!(slot.begin(), Err(RequestError::RequestInFlight));
    }

    #[test]
    fn test_slot_resolves_once() {
        let mut slot: RequestSlot<String> = RequestSlot::new();
        let ticket = slot.begin().unwrap();
        assert!(slot.resolve(ticket, Ok::<_, String>("done".to_string())));
        assert_eq!(slot.state(), Some(&ResponseState::Ready("done".to_string())));

        // Terminal: a new request is allowed now
        let ticket = slot.begin().unwrap();
        assert!(slot.resolve(ticket, Err::<String, _>("timeout")));
        assert_eq!(slot.state().and_then(|s| s.error()), Some("timeout"));
    }

    #[test]
    fn test_slot_discards_stale_completion_after_reset() {
        let mut slot: RequestSlot<String> = RequestSlot::new();
        let stale = slot.begin().unwrap();
        slot.reset();

        assert!(!slot.resolve(stale, Ok::<_, String>("late".to_string())));
        assert!(slot.state().is_none());
    }

    #[test]
    fn test_slot_discards_completion_from_previous_request() {
        let mut slot: RequestSlot<String> = RequestSlot::new();
        let first = slot.begin().unwrap();
        slot.reset();
        let second = slot.begin().unwrap();

        assert!(!slot.resolve(first, Ok::<_, String>("old".to_string())));
        assert!(slot.is_loading());
        assert!(slot.resolve(second, Ok::<_, String>("new".to_string())));
        assert_eq!(slot.state(), Some(&ResponseState::Ready("new".to_string())));
    }

    #[test]
    fn test_slot_take() {
        let mut slot: RequestSlot<u32> = RequestSlot::new();
        let ticket = slot.begin().unwrap();
        slot.resolve(ticket, Ok::<_, String>(7));
        assert_eq!(slot.take(), Some(ResponseState::Ready(7)));
        assert!(slot.state().is_none());
    }
}
