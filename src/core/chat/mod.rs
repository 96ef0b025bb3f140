//! Chat completion.
//!
//! [`ChatCompletion`] sends a conversation history to a remote assistant and
//! returns its reply, either whole or as a stream of content deltas.
//! [`HttpChatClient`] talks to an OpenAI-style endpoint that additionally
//! takes an application code:
//!
//! ```text
//! POST <url>
//! Authorization: Bearer <key>
//! {"app_code": "...", "messages": [{"role": "user", "content": "..."}], "stream": false}
//! ```

mod base;
pub mod client;
pub mod sse;

pub use base::{ChatCompletion, ChatError, ChatMessage, ChatResult, ChatStream, Role};
pub use client::{ChatConfig, HttpChatClient};
