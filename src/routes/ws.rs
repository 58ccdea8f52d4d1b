//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to the import flow. An import gets a `progress` message before its result.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use async_trait::async_trait;
use tracing::{info, error, instrument, debug};

use crate::protocol::{to_out, ClientWsMessage, ServerWsMessage};
use crate::slug::extract_slug;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "leetnote", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "leetnote", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        if !handle_text(&txt, &state, &mut socket).await { break; }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "leetnote", "WebSocket disconnected");
}

/// Where server messages go. Returns false once the peer is gone.
#[async_trait]
trait Outbox: Send {
  async fn push(&mut self, msg: ServerWsMessage) -> bool;
}

#[async_trait]
impl Outbox for WebSocket {
  async fn push(&mut self, msg: ServerWsMessage) -> bool {
    send(self, &msg).await
  }
}

/// Answer one text frame. An import with a usable URL gets `progress` before its result.
async fn handle_text<O: Outbox>(txt: &str, state: &AppState, out: &mut O) -> bool {
  let incoming = match serde_json::from_str::<ClientWsMessage>(txt) {
    Ok(incoming) => incoming,
    Err(e) => return out.push(ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }).await,
  };
  debug!(target: "leetnote", "WS received: {:?}", &incoming);

  if let ClientWsMessage::Import { url } = &incoming {
    if extract_slug(url).is_some() {
      let progress = ServerWsMessage::Progress { message: "Fetching problem from LeetCode...".into() };
      if !out.push(progress).await { return false; }
    }
  }
  let reply = handle_client_ws(incoming, state).await;
  out.push(reply).await
}

/// Serialize and send one message. Returns false once the socket is unusable.
async fn send(socket: &mut WebSocket, msg: &ServerWsMessage) -> bool {
  let out = serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  });
  match socket.send(Message::Text(out)).await {
    Ok(()) => true,
    Err(e) => {
      error!(target: "leetnote", error = %e, "WS send error");
      false
    }
  }
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Import { url } => match state.import(&url).await {
      Ok(outcome) => {
        info!(target: "import", filename = %outcome.filename, "WS import served");
        to_out(&outcome).into()
      }
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::GetSettings => ServerWsMessage::Settings { settings: state.settings_snapshot().await },

    ClientWsMessage::SaveSettings { settings } => match state.update_settings(settings).await {
      Ok(settings) => ServerWsMessage::Settings { settings },
      Err(e) => ServerWsMessage::Error { message: format!("Failed to save settings: {}", e) },
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Settings;
  use crate::domain::fixtures::two_sum;
  use crate::leetcode::stub::StubSource;
  use crate::leetcode::ProblemSource;

  #[async_trait]
  impl Outbox for Vec<ServerWsMessage> {
    async fn push(&mut self, msg: ServerWsMessage) -> bool {
      Vec::push(self, msg);
      true
    }
  }

  fn state(dir: &std::path::Path, source: impl ProblemSource + 'static) -> AppState {
    let settings = Settings { vault_dir: dir.to_path_buf(), ..Settings::default() };
    AppState::with_source(settings, None, Arc::new(source))
  }

  #[tokio::test]
  async fn import_reports_progress_then_result() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path(), StubSource::serving(two_sum()));
    let mut sent = Vec::new();

    let frame = r#"{"type":"import","url":"https://leetcode.com/problems/two-sum/"}"#;
    assert!(handle_text(frame, &state, &mut sent).await);

    assert_eq!(sent.len(), 2);
    assert!(matches!(&sent[0], ServerWsMessage::Progress { message } if message == "Fetching problem from LeetCode..."));
    match &sent[1] {
      ServerWsMessage::Imported { filename, message, .. } => {
        assert_eq!(filename, "1. Two Sum.md");
        assert_eq!(message, "Successfully imported: Two Sum");
      }
      other => panic!("unexpected reply: {:?}", other),
    }
  }

  #[tokio::test]
  async fn failed_fetch_reports_progress_then_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path(), StubSource::failing(503));
    let mut sent = Vec::new();

    let frame = r#"{"type":"import","url":"https://leetcode.com/problems/two-sum/"}"#;
    assert!(handle_text(frame, &state, &mut sent).await);

    assert_eq!(sent.len(), 2);
    assert!(matches!(sent[0], ServerWsMessage::Progress { .. }));
    assert!(matches!(&sent[1], ServerWsMessage::Error { message }
      if message == "Failed to import problem: Failed to fetch problem: 503"));
  }

  #[tokio::test]
  async fn invalid_url_skips_progress() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path(), StubSource::serving(two_sum()));
    let mut sent = Vec::new();

    assert!(handle_text(r#"{"type":"import","url":"https://example.com/"}"#, &state, &mut sent).await);
    assert_eq!(sent.len(), 1);
    assert!(matches!(&sent[0], ServerWsMessage::Error { message } if message == "Invalid LeetCode URL"));
  }

  #[tokio::test]
  async fn malformed_frame_and_ping() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path(), StubSource::serving(two_sum()));
    let mut sent = Vec::new();

    assert!(handle_text("{nope", &state, &mut sent).await);
    assert!(handle_text(r#"{"type":"ping"}"#, &state, &mut sent).await);
    assert!(matches!(&sent[0], ServerWsMessage::Error { message } if message.starts_with("Invalid JSON")));
    assert!(matches!(sent[1], ServerWsMessage::Pong));
  }
}
