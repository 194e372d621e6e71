//! Word-boundary smoothing.
//!
//! Providers emit raw token fragments ("Hel", "lo wor", "ld"). Relaying
//! those directly makes the client render mid-word flickers, so deltas are
//! coalesced and only flushed as whole words with their trailing whitespace.
//! The tail (a final partial word) is flushed at stream end. Text and
//! reasoning channels are buffered independently.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};

use tidechat_types::llm::{LlmError, StreamEvent};

/// Drain every complete word chunk from the buffer.
///
/// A chunk is the leading run up to and including a whitespace run that is
/// followed by a non-whitespace character; the rest stays buffered until
/// more input (or the end of the stream) decides it.
fn drain_complete_words(buf: &mut String) -> Vec<String> {
    let mut chunks = Vec::new();
    loop {
        let mut boundary = None;
        let mut in_whitespace = false;
        for (i, ch) in buf.char_indices() {
            if ch.is_whitespace() {
                in_whitespace = true;
            } else if in_whitespace {
                boundary = Some(i);
                break;
            }
        }
        match boundary {
            Some(i) => {
                let chunk: String = buf.drain(..i).collect();
                chunks.push(chunk);
            }
            None => break,
        }
    }
    chunks
}

/// Wrap a provider stream, coalescing deltas to word boundaries.
pub fn smooth_words(
    stream: Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
    Box::pin(async_stream::stream! {
        let mut inner = stream;
        let mut text_buf = String::new();
        let mut reasoning_buf = String::new();

        while let Some(item) = inner.next().await {
            match item {
                Ok(StreamEvent::TextDelta { text }) => {
                    text_buf.push_str(&text);
                    for chunk in drain_complete_words(&mut text_buf) {
                        yield Ok(StreamEvent::TextDelta { text: chunk });
                    }
                }
                Ok(StreamEvent::ReasoningDelta { text }) => {
                    reasoning_buf.push_str(&text);
                    for chunk in drain_complete_words(&mut reasoning_buf) {
                        yield Ok(StreamEvent::ReasoningDelta { text: chunk });
                    }
                }
                Ok(StreamEvent::Done) => {
                    if !reasoning_buf.is_empty() {
                        yield Ok(StreamEvent::ReasoningDelta { text: std::mem::take(&mut reasoning_buf) });
                    }
                    if !text_buf.is_empty() {
                        yield Ok(StreamEvent::TextDelta { text: std::mem::take(&mut text_buf) });
                    }
                    yield Ok(StreamEvent::Done);
                }
                other => yield other,
            }
        }

        if !reasoning_buf.is_empty() {
            yield Ok(StreamEvent::ReasoningDelta { text: reasoning_buf });
        }
        if !text_buf.is_empty() {
            yield Ok(StreamEvent::TextDelta { text: text_buf });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn text_delta(s: &str) -> Result<StreamEvent, LlmError> {
        Ok(StreamEvent::TextDelta {
            text: s.to_string(),
        })
    }

    async fn collect_texts(
        input: Vec<Result<StreamEvent, LlmError>>,
    ) -> Vec<String> {
        smooth_words(Box::pin(stream::iter(input)))
            .filter_map(|r| async move {
                match r.unwrap() {
                    StreamEvent::TextDelta { text } => Some(text),
                    _ => None,
                }
            })
            .collect()
            .await
    }

    #[test]
    fn test_drain_holds_partial_word() {
        let mut buf = "Hello wor".to_string();
        let chunks = drain_complete_words(&mut buf);
        assert_eq!(chunks, vec!["Hello ".to_string()]);
        assert_eq!(buf, "wor");
    }

    #[test]
    fn test_drain_multiple_words() {
        let mut buf = "one two three ".to_string();
        let chunks = drain_complete_words(&mut buf);
        assert_eq!(chunks, vec!["one ".to_string(), "two ".to_string()]);
        assert_eq!(buf, "three ");
    }

    #[test]
    fn test_drain_keeps_whitespace_run_together() {
        let mut buf = "end.\n\nNext".to_string();
        let chunks = drain_complete_words(&mut buf);
        assert_eq!(chunks, vec!["end.\n\n".to_string()]);
        assert_eq!(buf, "Next");
    }

    #[tokio::test]
    async fn test_fragments_coalesce_to_words() {
        let chunks = collect_texts(vec![
            text_delta("Hel"),
            text_delta("lo wor"),
            text_delta("ld, friend"),
            Ok(StreamEvent::Done),
        ])
        .await;
        assert_eq!(chunks, vec!["Hello ", "world, ", "friend"]);
    }

    #[tokio::test]
    async fn test_tail_flushed_without_done() {
        let chunks = collect_texts(vec![text_delta("half a wor"), text_delta("d")]).await;
        assert_eq!(chunks, vec!["half ", "a ", "word"]);
    }

    #[tokio::test]
    async fn test_reasoning_channel_buffered_independently() {
        let input = vec![
            Ok(StreamEvent::ReasoningDelta {
                text: "deep th".to_string(),
            }),
            text_delta("answer he"),
            Ok(StreamEvent::ReasoningDelta {
                text: "ought".to_string(),
            }),
            text_delta("re"),
            Ok(StreamEvent::Done),
        ];
        let events: Vec<StreamEvent> = smooth_words(Box::pin(stream::iter(input)))
            .map(|r| r.unwrap())
            .collect()
            .await;

        let reasoning: String = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::ReasoningDelta { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        let text: String = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::TextDelta { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(reasoning, "deep thought");
        assert_eq!(text, "answer here");
        assert!(matches!(events.last(), Some(StreamEvent::Done)));
    }

    #[tokio::test]
    async fn test_error_passes_through() {
        let input = vec![
            text_delta("oops"),
            Err(LlmError::Stream("connection reset".to_string())),
        ];
        let events: Vec<Result<StreamEvent, LlmError>> =
            smooth_words(Box::pin(stream::iter(input))).collect().await;
        assert!(events.iter().any(|e| e.is_err()));
    }
}
