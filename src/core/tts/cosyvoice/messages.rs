//! DashScope duplex inference message types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Client messages
// =============================================================================

/// Client-side task control action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskAction {
    RunTask,
    ContinueTask,
    FinishTask,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientHeader {
    pub action: TaskAction,
    pub task_id: String,
    pub streaming: &'static str,
}

/// Voice and encoding parameters sent with `run-task`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisParameters {
    pub text_type: &'static str,
    pub voice: String,
    pub format: String,
    pub sample_rate: u32,
    pub volume: u32,
    pub rate: f32,
}

impl SynthesisParameters {
    pub fn plain_text(voice: String, format: String, sample_rate: u32, volume: u32, rate: f32) -> Self {
        Self {
            text_type: "PlainText",
            voice,
            format,
            sample_rate,
            volume,
            rate,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_group: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<SynthesisParameters>,
    pub input: TaskInput,
}

/// A message sent from client to server
#[derive(Debug, Clone, Serialize)]
pub struct ClientMessage {
    pub header: ClientHeader,
    pub payload: ClientPayload,
}

impl ClientMessage {
    fn new(action: TaskAction, task_id: &str, payload: ClientPayload) -> Self {
        Self {
            header: ClientHeader {
                action,
                task_id: task_id.to_string(),
                streaming: "duplex",
            },
            payload,
        }
    }

    /// Open a synthesis task
    pub fn run_task(task_id: &str, model: &str, parameters: SynthesisParameters) -> Self {
        Self::new(
            TaskAction::RunTask,
            task_id,
            ClientPayload {
                task_group: Some("audio"),
                task: Some("tts"),
                function: Some("SpeechSynthesizer"),
                model: Some(model.to_string()),
                parameters: Some(parameters),
                input: TaskInput::default(),
            },
        )
    }

    /// Send text to synthesize
    pub fn continue_task(task_id: &str, text: &str) -> Self {
        Self::new(
            TaskAction::ContinueTask,
            task_id,
            ClientPayload {
                input: TaskInput {
                    text: Some(text.to_string()),
                },
                ..Default::default()
            },
        )
    }

    /// Signal that no more text follows
    pub fn finish_task(task_id: &str) -> Self {
        Self::new(TaskAction::FinishTask, task_id, ClientPayload::default())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// =============================================================================
// Server messages
// =============================================================================

/// Server-side task event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServerEvent {
    TaskStarted,
    ResultGenerated,
    TaskFinished,
    TaskFailed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerHeader {
    pub event: ServerEvent,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A JSON message sent from server to client
#[derive(Debug, Clone, Deserialize)]
pub struct ServerMessage {
    pub header: ServerHeader,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ServerMessage {
    /// `error_code: error_message` for a failed task
    pub fn failure_description(&self) -> String {
        let code = self.header.error_code.as_deref().unwrap_or("UnknownError");
        let message = self
            .header
            .error_message
            .as_deref()
            .unwrap_or("task failed without a message");
        format!("{code}: {message}")
    }
}
