// Method channel adapter - JSON request/response boundary for host processes
//
// Wire format, one JSON object per line:
//   request:  {"id": <any>, "method": "getMetadata", "args": {"videoBytes": [..], "extension": "mp4"}}
//   success:  {"id": <any>, "ok": {...record...}}
//   failure:  {"id": <any>, "error": {"code": "MediaError", "message": "..."}}

use std::io;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::app::metadata_interactor::MetadataInteractor;
use crate::domain::errors::ExtractionError;

/// Method extracting metadata from `videoBytes` + `extension`
pub const GET_METADATA: &str = "getMetadata";
/// Method reporting the crate version and active prober
pub const GET_PLATFORM_VERSION: &str = "getPlatformVersion";
/// Error code for methods this channel does not serve
pub const NOT_IMPLEMENTED: &str = "NotImplemented";

/// Incoming method call
#[derive(Debug, Clone, Deserialize)]
pub struct MethodCall {
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub args: Value,
}

/// Error sent back across the boundary; no internal detail beyond the message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

impl From<&ExtractionError> for ErrorPayload {
    fn from(err: &ExtractionError) -> Self {
        Self {
            code: err.kind().to_string(),
            message: err.message().to_string(),
        }
    }
}

/// Outcome of a call; never both a result and an error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Ok(Value),
    Error(ErrorPayload),
}

/// Response to a method call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl MethodResponse {
    fn ok(id: Option<Value>, value: Value) -> Self {
        Self {
            id,
            outcome: Outcome::Ok(value),
        }
    }

    fn error(id: Option<Value>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            outcome: Outcome::Error(ErrorPayload {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// Dispatches method calls to the metadata interactor
pub struct MethodChannel {
    interactor: Arc<MetadataInteractor>,
}

impl MethodChannel {
    pub fn new(interactor: Arc<MetadataInteractor>) -> Self {
        Self { interactor }
    }

    /// Handle one decoded call
    pub async fn handle(&self, call: MethodCall) -> MethodResponse {
        debug!(method = %call.method, "Dispatching method call");
        match call.method.as_str() {
            GET_METADATA => match self.interactor.extract_from_value(&call.args).await {
                Ok(record) => match serde_json::to_value(&record) {
                    Ok(value) => MethodResponse::ok(call.id, value),
                    Err(e) => MethodResponse::error(call.id, "InternalError", e.to_string()),
                },
                Err(err) => {
                    warn!(
                        code = err.kind(),
                        transient = err.is_transient(),
                        message = err.message(),
                        "getMetadata failed"
                    );
                    MethodResponse {
                        id: call.id,
                        outcome: Outcome::Error(ErrorPayload::from(&err)),
                    }
                }
            },
            GET_PLATFORM_VERSION => MethodResponse::ok(
                call.id,
                Value::String(format!(
                    "vidmeta {} ({})",
                    env!("CARGO_PKG_VERSION"),
                    self.interactor.profile().name
                )),
            ),
            other => MethodResponse::error(
                call.id,
                NOT_IMPLEMENTED,
                format!("Unknown method: {}", other),
            ),
        }
    }

    /// Handle one raw line and render the response line
    pub async fn handle_line(&self, line: &str) -> String {
        let response = match serde_json::from_str::<MethodCall>(line) {
            Ok(call) => self.handle(call).await,
            Err(e) => MethodResponse::error(None, "InvalidArgument", format!("Malformed method call: {}", e)),
        };
        render(&response)
    }

    /// Serve JSON lines from `reader` until EOF, writing one response line per
    /// call to `writer`.
    ///
    /// Up to `max_concurrent` calls run at once; responses are written as they
    /// complete and carry the caller's `id`. A line that is not UTF-8 gets an
    /// `InvalidArgument` reply and serving continues. On a read error, calls
    /// already accepted are still answered before the error is returned.
    /// Returns the number of calls served.
    pub async fn serve<R, W>(
        self: Arc<Self>,
        mut reader: R,
        writer: W,
        max_concurrent: usize,
    ) -> io::Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let writer_task = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(line) = rx.recv().await {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<(), io::Error>(())
        });

        let mut tasks = JoinSet::new();
        let mut served = 0usize;
        let mut buf = Vec::new();

        let read_result: io::Result<()> = loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break Ok(()),
                Ok(_) => {}
                Err(e) => break Err(e),
            }

            while let Some(joined) = tasks.try_join_next() {
                log_join_failure(joined);
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim().to_string(),
                Err(e) => {
                    served += 1;
                    warn!(error = %e, "Rejected non-UTF-8 method call");
                    let response = MethodResponse::error(
                        None,
                        "InvalidArgument",
                        format!("Malformed method call: {}", e),
                    );
                    // Receiver only goes away if the writer failed; that error surfaces below.
                    let _ = tx.send(render(&response));
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }
            served += 1;

            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => break Err(io::Error::other(e)),
            };
            let channel = Arc::clone(&self);
            let tx = tx.clone();
            tasks.spawn(async move {
                let response = channel.handle_line(&line).await;
                drop(permit);
                let _ = tx.send(response);
            });
        };

        while let Some(joined) = tasks.join_next().await {
            log_join_failure(joined);
        }
        drop(tx);
        let write_result = writer_task.await.map_err(io::Error::other)?;

        read_result?;
        write_result?;

        info!(served, "Method channel reached end of input");
        Ok(served)
    }
}

fn render(response: &MethodResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        format!(
            r#"{{"error":{{"code":"InternalError","message":"{}"}}}}"#,
            e.to_string().replace('"', "'")
        )
    })
}

fn log_join_failure(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        warn!(error = %e, "Method call task failed");
    }
}
