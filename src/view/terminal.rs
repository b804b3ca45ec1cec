//! Line-oriented terminal driver for the client view

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::{ClientView, PredictClient};

const QUIT_COMMAND: &str = ":q";

/// Drive a [`ClientView`] from `input`, writing every rendered frame to `output`.
///
/// Each line becomes the input text and is submitted. A blank line renders the
/// disabled view and makes no call. Stops at EOF or `:q`, returning the final view.
pub async fn run_terminal<C, R, W>(client: &C, input: R, mut output: W) -> std::io::Result<ClientView>
where
    C: PredictClient + ?Sized,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut view = ClientView::new();
    let mut lines = input.lines();

    write_frame(&mut output, &view).await?;

    while let Some(line) = lines.next_line().await? {
        if line.trim() == QUIT_COMMAND {
            break;
        }

        view.set_input(line);
        let Some(request) = view.begin_submit() else {
            write_frame(&mut output, &view).await?;
            continue;
        };

        write_frame(&mut output, &view).await?;
        let outcome = client.predict(&request).await;
        view.complete(outcome);
        write_frame(&mut output, &view).await?;
    }

    output.flush().await?;
    Ok(view)
}

async fn write_frame<W: AsyncWrite + Unpin>(output: &mut W, view: &ClientView) -> std::io::Result<()> {
    output.write_all(view.render().as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PredictionRequest;
    use crate::view::ClientError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::BufReader;

    struct EchoClient {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PredictClient for EchoClient {
        async fn predict(&self, request: &PredictionRequest) -> Result<Value, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({"echo": request.text}))
        }
    }

    async fn drive(script: &str) -> (ClientView, String, usize) {
        let client = EchoClient {
            calls: AtomicUsize::new(0),
        };
        let mut output = Vec::new();
        let view = run_terminal(&client, BufReader::new(script.as_bytes()), &mut output)
            .await
            .unwrap();
        (view, String::from_utf8(output).unwrap(), client.calls.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn test_each_line_is_submitted() {
        let (view, output, calls) = drive("hello\nworld\n").await;

        assert_eq!(calls, 2);
        assert_eq!(view.result(), Some(&json!({"echo": "world"})));
        assert!(output.contains("[ Predicting... ]"));
        assert!(output.contains("\"echo\": \"hello\""));
    }

    #[tokio::test]
    async fn test_blank_line_makes_no_call() {
        let (view, output, calls) = drive("   \n").await;

        assert_eq!(calls, 0);
        assert!(view.result().is_none());
        assert!(output.contains("(disabled)"));
    }

    #[tokio::test]
    async fn test_quit_stops_reading() {
        let (view, _, calls) = drive("one\n:q\ntwo\n").await;

        assert_eq!(calls, 1);
        assert_eq!(view.input(), "one");
    }

    #[tokio::test]
    async fn test_empty_input_renders_once() {
        let (view, output, calls) = drive("").await;

        assert_eq!(calls, 0);
        assert!(!view.is_busy());
        assert_eq!(output.matches(crate::view::TITLE).count(), 1);
    }
}
