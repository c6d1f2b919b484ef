use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const CHANNEL_CAPACITY: usize = 16;

/// Wire shape of one streamed event: `{"chunk": "..."}` or `{"done": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StreamEvent {
    Chunk { chunk: String },
    Done { done: bool },
}

#[derive(Debug, Clone, Copy)]
pub struct StreamOptions {
    pub chunk_size: usize,
    pub delay: Duration,
}

/// Splits `text` into pieces of at most `chunk_size` characters, never
/// cutting through a UTF-8 sequence. A zero size is treated as one.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    let size = chunk_size.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}

/// Emits `text` as ordered chunk events followed by a single done event,
/// waiting `delay` between chunks. The task stops early once the receiver is
/// dropped; the handle resolves to the number of chunks delivered.
pub fn spawn_chunk_stream(
    text: String,
    opts: StreamOptions,
) -> (mpsc::Receiver<StreamEvent>, JoinHandle<usize>) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    let handle = tokio::spawn(async move {
        let chunks = chunk_text(&text, opts.chunk_size);
        let total = chunks.len();
        let mut delivered = 0usize;

        for (i, chunk) in chunks.into_iter().enumerate() {
            if i > 0 && !opts.delay.is_zero() {
                tokio::time::sleep(opts.delay).await;
            }
            if tx.send(StreamEvent::Chunk { chunk }).await.is_err() {
                tracing::debug!(delivered, total, "stream receiver dropped; stopping");
                return delivered;
            }
            delivered += 1;
        }

        if tx.send(StreamEvent::Done { done: true }).await.is_err() {
            tracing::debug!(delivered, total, "stream receiver dropped before done");
        }
        delivered
    });

    (rx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_respect_char_boundaries() {
        let chunks = chunk_text("héllo wörld", 3);
        assert_eq!(chunks, vec!["hél", "lo ", "wör", "ld"]);
        assert_eq!(chunks.concat(), "héllo wörld");
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        assert_eq!(chunk_text("abc", 0), vec!["a", "b", "c"]);
        assert!(chunk_text("", 4).is_empty());
    }

    #[test]
    fn events_serialize_to_wire_shape() {
        let chunk = serde_json::to_value(StreamEvent::Chunk {
            chunk: "hi".to_string(),
        })
        .unwrap();
        assert_eq!(chunk, serde_json::json!({"chunk": "hi"}));
        let done = serde_json::to_value(StreamEvent::Done { done: true }).unwrap();
        assert_eq!(done, serde_json::json!({"done": true}));
    }

    #[tokio::test]
    async fn delivers_chunks_in_order_then_done() {
        let text = "Spend rose [REF:agg:spend-total] this week.".to_string();
        let (mut rx, handle) = spawn_chunk_stream(
            text.clone(),
            StreamOptions {
                chunk_size: 5,
                delay: Duration::from_millis(1),
            },
        );

        let mut events = Vec::new();
        while let Some(ev) = rx.recv().await {
            events.push(ev);
        }

        assert_eq!(events.last(), Some(&StreamEvent::Done { done: true }));
        let rebuilt: String = events
            .iter()
            .filter_map(|ev| match ev {
                StreamEvent::Chunk { chunk } => Some(chunk.as_str()),
                StreamEvent::Done { .. } => None,
            })
            .collect();
        assert_eq!(rebuilt, text);
        assert_eq!(handle.await.unwrap(), chunk_text(&text, 5).len());
    }

    #[tokio::test]
    async fn stops_when_receiver_is_dropped() {
        let text = "x".repeat(200);
        let (mut rx, handle) = spawn_chunk_stream(
            text,
            StreamOptions {
                chunk_size: 2,
                delay: Duration::from_millis(5),
            },
        );

        assert!(matches!(rx.recv().await, Some(StreamEvent::Chunk { .. })));
        drop(rx);

        let delivered = handle.await.unwrap();
        assert!(delivered < 100, "delivered {delivered} of 100 chunks");
    }
}
