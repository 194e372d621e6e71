//! Reasoning-tag extraction.
//!
//! Some models emit chain-of-thought inline, wrapped in an XML-ish tag
//! (e.g. `<think>...</think>`). This transform splits the answer stream into
//! two channels: tagged spans are re-emitted as `ReasoningDelta`, everything
//! else stays `TextDelta`. Tags may arrive split across any number of
//! deltas, so a trailing fragment that could still become a tag is held back
//! until the next delta decides it.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use tidechat_types::llm::{LlmError, StreamEvent};

/// Incremental tag-splitting state machine.
pub struct ReasoningExtractor {
    open_tag: String,
    close_tag: String,
    in_reasoning: bool,
    pending: String,
}

impl ReasoningExtractor {
    pub fn new(tag: &str) -> Self {
        Self {
            open_tag: format!("<{tag}>"),
            close_tag: format!("</{tag}>"),
            in_reasoning: false,
            pending: String::new(),
        }
    }

    /// Feed one text delta; returns the events it releases.
    pub fn push(&mut self, delta: &str) -> Vec<StreamEvent> {
        self.pending.push_str(delta);
        let mut events = Vec::new();

        loop {
            let tag = if self.in_reasoning {
                &self.close_tag
            } else {
                &self.open_tag
            };

            match self.pending.find(tag.as_str()) {
                Some(idx) => {
                    let head = self.pending[..idx].to_string();
                    self.emit(&mut events, head);
                    self.pending.drain(..idx + tag.len());
                    self.in_reasoning = !self.in_reasoning;
                }
                None => {
                    // Hold back a suffix that is a prefix of the tag we are
                    // looking for; it may complete in the next delta.
                    let hold = partial_tag_suffix(&self.pending, tag);
                    let cut = self.pending.len() - hold;
                    let head: String = self.pending.drain(..cut).collect();
                    self.emit(&mut events, head);
                    break;
                }
            }
        }

        events
    }

    /// Flush whatever is still pending at stream end.
    ///
    /// An unterminated tag fragment is released on the current channel.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        let tail = std::mem::take(&mut self.pending);
        self.emit(&mut events, tail);
        events
    }

    fn emit(&self, events: &mut Vec<StreamEvent>, text: String) {
        if text.is_empty() {
            return;
        }
        if self.in_reasoning {
            events.push(StreamEvent::ReasoningDelta { text });
        } else {
            events.push(StreamEvent::TextDelta { text });
        }
    }
}

/// Length of the longest proper suffix of `s` that is a prefix of `tag`.
///
/// Tags are ASCII, so the returned length always lands on a char boundary.
fn partial_tag_suffix(s: &str, tag: &str) -> usize {
    let max = tag.len().saturating_sub(1).min(s.len());
    for k in (1..=max).rev() {
        if s.ends_with(&tag[..k]) {
            return k;
        }
    }
    0
}

/// Wrap a provider stream, splitting tagged spans onto the reasoning channel.
pub fn extract_reasoning(
    stream: Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>,
    tag: &str,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
    let mut extractor = ReasoningExtractor::new(tag);
    Box::pin(async_stream::stream! {
        let mut inner = stream;
        while let Some(item) = inner.next().await {
            match item {
                Ok(StreamEvent::TextDelta { text }) => {
                    for event in extractor.push(&text) {
                        yield Ok(event);
                    }
                }
                Ok(StreamEvent::Done) => {
                    for event in extractor.finish() {
                        yield Ok(event);
                    }
                    yield Ok(StreamEvent::Done);
                }
                other => yield other,
            }
        }
        for event in extractor.finish() {
            yield Ok(event);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn texts(events: &[StreamEvent]) -> (String, String) {
        let mut text = String::new();
        let mut reasoning = String::new();
        for event in events {
            match event {
                StreamEvent::TextDelta { text: t } => text.push_str(t),
                StreamEvent::ReasoningDelta { text: t } => reasoning.push_str(t),
                _ => {}
            }
        }
        (text, reasoning)
    }

    #[test]
    fn test_single_delta_with_tags() {
        let mut extractor = ReasoningExtractor::new("think");
        let mut events = extractor.push("<think>plan the trip</think>Sure, let's go.");
        events.extend(extractor.finish());
        let (text, reasoning) = texts(&events);
        assert_eq!(reasoning, "plan the trip");
        assert_eq!(text, "Sure, let's go.");
    }

    #[test]
    fn test_tag_split_across_deltas() {
        let mut extractor = ReasoningExtractor::new("think");
        let mut events = Vec::new();
        for delta in ["<th", "ink>deep ", "thought</th", "ink>answer"] {
            events.extend(extractor.push(delta));
        }
        events.extend(extractor.finish());
        let (text, reasoning) = texts(&events);
        assert_eq!(reasoning, "deep thought");
        assert_eq!(text, "answer");
    }

    #[test]
    fn test_no_tags_passes_text_through() {
        let mut extractor = ReasoningExtractor::new("think");
        let mut events = extractor.push("just a plain answer");
        events.extend(extractor.finish());
        let (text, reasoning) = texts(&events);
        assert_eq!(text, "just a plain answer");
        assert!(reasoning.is_empty());
    }

    #[test]
    fn test_angle_bracket_that_is_not_a_tag() {
        let mut extractor = ReasoningExtractor::new("think");
        let mut events = extractor.push("a < b and <thin ice");
        events.extend(extractor.finish());
        let (text, reasoning) = texts(&events);
        assert_eq!(text, "a < b and <thin ice");
        assert!(reasoning.is_empty());
    }

    #[test]
    fn test_unterminated_tag_flushed_as_reasoning() {
        let mut extractor = ReasoningExtractor::new("think");
        let mut events = extractor.push("<think>never closed");
        events.extend(extractor.finish());
        let (text, reasoning) = texts(&events);
        assert!(text.is_empty());
        assert_eq!(reasoning, "never closed");
    }

    #[test]
    fn test_partial_tag_suffix() {
        assert_eq!(partial_tag_suffix("abc<th", "<think>"), 3);
        assert_eq!(partial_tag_suffix("abc<", "<think>"), 1);
        assert_eq!(partial_tag_suffix("abc", "<think>"), 0);
        // A complete tag is not a partial suffix.
        assert_eq!(partial_tag_suffix("<think>", "<think>"), 0);
    }

    #[tokio::test]
    async fn test_stream_adapter_splits_channels() {
        let input = stream::iter(vec![
            Ok(StreamEvent::Connected),
            Ok(StreamEvent::TextDelta {
                text: "<think>hm</think>".to_string(),
            }),
            Ok(StreamEvent::TextDelta {
                text: "hello".to_string(),
            }),
            Ok(StreamEvent::Done),
        ]);
        let events: Vec<StreamEvent> = extract_reasoning(Box::pin(input), "think")
            .map(|r| r.unwrap())
            .collect()
            .await;

        assert!(matches!(events[0], StreamEvent::Connected));
        let (text, reasoning) = texts(&events);
        assert_eq!(reasoning, "hm");
        assert_eq!(text, "hello");
        assert!(matches!(events.last(), Some(StreamEvent::Done)));
    }
}
