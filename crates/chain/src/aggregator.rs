//! Stream aggregation.
//!
//! Post-call hooks expect one complete response, but a streaming invoker
//! produces chunks. The aggregator forwards every chunk downstream the
//! moment it arrives while concatenating chunk contents on the side; when
//! the upstream closes cleanly it fires a single completion callback with
//! the aggregated response. Forwarding is never blocked on the callback.

use std::future::Future;

use tokio::sync::mpsc;
use tracing::debug;

use relai_core::invoker::ChunkStream;
use relai_core::request::ChatResponse;

/// Capacity of the forwarding channel between the invoker stream and the
/// consumer.
const FORWARD_CAPACITY: usize = 16;

/// Tee a chunk stream: the returned stream yields exactly the upstream
/// items, and `on_complete` fires exactly once with the concatenated
/// response after the upstream ends without an error.
///
/// "Forwarded" means handed to the returned stream's channel, not read by
/// the consumer: when the whole upstream fits in the channel buffer, the
/// callback fires while the consumer may still be draining chunks, and a
/// consumer that stops reading at that point has already triggered it.
///
/// The callback does not fire when the upstream terminates with an error
/// (the error is forwarded instead) or when the consumer drops the returned
/// stream before every chunk was buffered; in neither case does a complete
/// response exist. A zero-chunk upstream completes with an empty response.
pub fn aggregate_stream<F, Fut>(mut upstream: ChunkStream, on_complete: F) -> ChunkStream
where
    F: FnOnce(ChatResponse) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(FORWARD_CAPACITY);

    tokio::spawn(async move {
        // Only the running concatenation is buffered, never the chunks.
        let mut text = String::new();

        while let Some(item) = upstream.recv().await {
            let errored = item.is_err();
            if let Ok(chunk) = &item {
                text.push_str(&chunk.content);
            }

            if tx.send(item).await.is_err() {
                debug!("Stream consumer dropped, skipping aggregation");
                return;
            }
            if errored {
                debug!("Stream ended with an error, skipping aggregation");
                return;
            }
        }

        on_complete(ChatResponse::new(text)).await;
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use relai_core::error::InvokeError;
    use relai_core::request::ResponseChunk;
    use std::sync::Arc;
    use std::sync::Mutex;

    fn chunk_stream(contents: &[&str]) -> ChunkStream {
        let (tx, rx) = mpsc::channel(FORWARD_CAPACITY);
        let contents: Vec<String> = contents.iter().map(|s| s.to_string()).collect();
        tokio::spawn(async move {
            for c in contents {
                if tx.send(Ok(ResponseChunk::new(c))).await.is_err() {
                    return;
                }
            }
        });
        rx
    }

    #[tokio::test]
    async fn forwards_chunks_and_aggregates_concatenation() {
        let aggregated: Arc<Mutex<Option<ChatResponse>>> = Arc::new(Mutex::new(None));
        let sink = aggregated.clone();

        let mut rx = aggregate_stream(chunk_stream(&["Hel", "lo, ", "world"]), move |response| {
            let sink = sink.clone();
            async move {
                *sink.lock().unwrap() = Some(response);
            }
        });

        let mut forwarded = Vec::new();
        while let Some(item) = rx.recv().await {
            forwarded.push(item.unwrap().content);
        }
        assert_eq!(forwarded, vec!["Hel", "lo, ", "world"]);

        // The stream is exhausted, so the callback has fired by now; the
        // spawned task sends all items before invoking it.
        tokio::task::yield_now().await;
        let response = aggregated.lock().unwrap().clone().unwrap();
        assert_eq!(response.text, "Hello, world");
    }

    #[tokio::test]
    async fn zero_chunk_stream_completes_with_empty_response() {
        let (tx, upstream) = mpsc::channel::<Result<ResponseChunk, InvokeError>>(1);
        drop(tx);

        let (done_tx, mut done_rx) = mpsc::channel(1);
        let mut rx = aggregate_stream(upstream, move |response| async move {
            let _ = done_tx.send(response).await;
        });

        assert!(rx.recv().await.is_none());
        let response = done_rx.recv().await.unwrap();
        assert_eq!(response.text, "");
    }

    #[tokio::test]
    async fn error_propagates_and_callback_does_not_fire() {
        let (tx, upstream) = mpsc::channel(4);
        tokio::spawn(async move {
            let _ = tx.send(Ok(ResponseChunk::new("partial"))).await;
            let _ = tx
                .send(Err(InvokeError::StreamInterrupted("connection reset".into())))
                .await;
        });

        let fired = Arc::new(Mutex::new(false));
        let flag = fired.clone();
        let mut rx = aggregate_stream(upstream, move |_| {
            let flag = flag.clone();
            async move {
                *flag.lock().unwrap() = true;
            }
        });

        assert_eq!(rx.recv().await.unwrap().unwrap().content, "partial");
        assert!(rx.recv().await.unwrap().is_err());
        assert!(rx.recv().await.is_none());

        tokio::task::yield_now().await;
        assert!(!*fired.lock().unwrap());
    }

    #[tokio::test]
    async fn buffered_stream_completes_before_the_consumer_reads() {
        let (done_tx, mut done_rx) = mpsc::channel(1);
        let mut rx = aggregate_stream(chunk_stream(&["a", "b", "c"]), move |response| async move {
            let _ = done_tx.send(response).await;
        });

        // Three chunks fit in the forward buffer, so the callback fires
        // without the consumer touching the stream.
        let response = done_rx.recv().await.unwrap();
        assert_eq!(response.text, "abc");

        // Walking away after one chunk changes nothing: the aggregated
        // response was already delivered, and the rest stays readable.
        assert_eq!(rx.recv().await.unwrap().unwrap().content, "a");
        drop(rx);
    }

    #[tokio::test]
    async fn consumer_cancellation_skips_callback() {
        // Upstream produces more than the forward capacity so the
        // aggregator is still sending when the consumer walks away.
        let (tx, upstream) = mpsc::channel(1);
        let producer = tokio::spawn(async move {
            for i in 0..100 {
                if tx.send(Ok(ResponseChunk::new(format!("c{i}")))).await.is_err() {
                    return;
                }
            }
        });

        let fired = Arc::new(Mutex::new(false));
        let flag = fired.clone();
        let mut rx = aggregate_stream(upstream, move |_| {
            let flag = flag.clone();
            async move {
                *flag.lock().unwrap() = true;
            }
        });

        // Take one chunk, then cancel.
        let _ = rx.recv().await.unwrap().unwrap();
        drop(rx);

        let _ = producer.await;
        tokio::task::yield_now().await;
        assert!(!*fired.lock().unwrap());
    }
}
