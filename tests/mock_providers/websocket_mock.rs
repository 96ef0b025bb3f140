//! WebSocket mock server for CosyVoice synthesis
//!
//! Speaks the DashScope duplex task protocol: answers `run-task` with
//! `task-started`, collects `continue-task` text and answers `finish-task`
//! with binary audio frames followed by `task-finished`.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

/// How the mock server answers a task
#[derive(Debug, Clone)]
pub enum TaskBehavior {
    /// Stream these chunks as binary frames, then finish
    Succeed(Vec<Vec<u8>>),
    /// Reject `run-task` with `task-failed`
    Fail { code: String, message: String },
    /// Close the socket after `finish-task` without finishing
    CloseEarly,
}

/// What the server observed across all connections
#[derive(Debug, Default)]
pub struct Recorded {
    pub authorization: Vec<String>,
    pub client_messages: Vec<Value>,
}

impl Recorded {
    /// Messages whose `header.action` equals `action`
    pub fn actions(&self, action: &str) -> Vec<Value> {
        self.client_messages
            .iter()
            .filter(|m| m["header"]["action"] == action)
            .cloned()
            .collect()
    }
}

pub struct CosyVoiceMockServer {
    pub addr: SocketAddr,
    pub recorded: Arc<Mutex<Recorded>>,
}

impl CosyVoiceMockServer {
    pub async fn start(behavior: TaskBehavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let recorded = Arc::new(Mutex::new(Recorded::default()));

        let state = recorded.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = state.clone();
                let behavior = behavior.clone();
                tokio::spawn(async move {
                    let _ = handle_connection(stream, behavior, state).await;
                });
            }
        });

        Self { addr, recorded }
    }

    pub fn url(&self) -> String {
        format!("ws://{}/api-ws/v1/inference", self.addr)
    }
}

fn event(name: &str, task_id: &str) -> Message {
    let body = json!({
        "header": {"event": name, "task_id": task_id, "attributes": {}},
        "payload": {}
    });
    Message::Text(body.to_string().into())
}

async fn handle_connection(
    stream: TcpStream,
    behavior: TaskBehavior,
    recorded: Arc<Mutex<Recorded>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let auth_state = recorded.clone();
    let callback = move |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        if let Some(value) = request.headers().get("authorization") {
            auth_state
                .lock()
                .authorization
                .push(value.to_str().unwrap_or_default().to_string());
        }
        Ok(response)
    };

    let ws_stream = accept_hdr_async(stream, callback).await?;
    let (mut write, mut read) = ws_stream.split();

    while let Some(message) = read.next().await {
        let Message::Text(text) = message? else {
            continue;
        };
        let value: Value = serde_json::from_str(&text)?;
        recorded.lock().client_messages.push(value.clone());

        let task_id = value["header"]["task_id"].as_str().unwrap_or_default().to_string();
        match value["header"]["action"].as_str() {
            Some("run-task") => match &behavior {
                TaskBehavior::Fail { code, message } => {
                    let body = json!({
                        "header": {
                            "event": "task-failed",
                            "task_id": task_id,
                            "error_code": code,
                            "error_message": message
                        },
                        "payload": {}
                    });
                    write.send(Message::Text(body.to_string().into())).await?;
                    return Ok(());
                }
                _ => write.send(event("task-started", &task_id)).await?,
            },
            Some("finish-task") => match &behavior {
                TaskBehavior::Succeed(chunks) => {
                    for chunk in chunks {
                        write.send(event("result-generated", &task_id)).await?;
                        write.send(Message::Binary(chunk.clone().into())).await?;
                    }
                    write.send(event("task-finished", &task_id)).await?;
                }
                _ => {
                    write.send(Message::Close(None)).await?;
                    return Ok(());
                }
            },
            _ => {}
        }
    }

    Ok(())
}
