use anyhow::Result;
use futures::StreamExt;
use reqwest::Response;

use super::buffering::CircularLineBuffer;
use crate::traits::EventStream;
use crate::StreamEvent;

/// Turns the payload of one SSE `data:` line into stream events
pub trait SseLineParser: Send {
    fn parse_data_line(&self, data: &str) -> Result<Vec<StreamEvent>>;

    fn is_done_marker(&self, data: &str) -> bool {
        data == "[DONE]"
    }
}

/// Generic SSE stream parser over a line buffer.
///
/// Non-`data:` lines (comments, `event:` names, keep-alives) are skipped.
/// The stream ends at the done marker or when the body ends.
pub fn parse_sse_stream<P: SseLineParser + 'static>(response: Response, parser: P) -> EventStream {
    let stream = response.bytes_stream();

    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(stream);
        let mut buffer = CircularLineBuffer::with_capacity(4096);

        'body: while let Some(chunk_result) = byte_chunks.next().await {
            let bytes = match chunk_result {
                Ok(bytes) => bytes,
                Err(e) => {
                    yield Err(anyhow::anyhow!("Stream error: {}", e));
                    break;
                }
            };
            buffer.extend(&bytes);

            while let Some(line_result) = buffer.next_line() {
                let line = match line_result {
                    Ok(line) => line,
                    Err(e) => {
                        yield Err(e);
                        continue;
                    }
                };

                let Some(data) = line.strip_prefix("data:").map(str::trim_start) else {
                    continue;
                };

                if parser.is_done_marker(data) {
                    yield Ok(StreamEvent::Done { finish_reason: None });
                    break 'body;
                }

                match parser.parse_data_line(data) {
                    Ok(events) => {
                        for event in events {
                            yield Ok(event);
                        }
                    }
                    Err(e) => yield Err(e),
                }
            }
        }
    })
}
