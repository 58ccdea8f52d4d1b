//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable so clients can evolve independently.

use serde::{Deserialize, Serialize};

use crate::config::{Settings, SettingsPatch};
use crate::import::ImportOutcome;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Import {
        url: String,
    },
    GetSettings,
    SaveSettings {
        settings: SettingsPatch,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Progress {
        message: String,
    },
    Imported {
        title: String,
        filename: String,
        path: String,
        message: String,
    },
    Settings {
        settings: Settings,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Deserialize)]
pub struct ImportIn {
    #[serde(default)]
    pub url: String,
}

/// DTO used by both WS and HTTP for a finished import.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ImportOut {
    pub title: String,
    pub filename: String,
    pub path: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorOut {
    pub message: String,
}

impl From<ImportOut> for ServerWsMessage {
    fn from(o: ImportOut) -> Self {
        ServerWsMessage::Imported {
            title: o.title,
            filename: o.filename,
            path: o.path,
            message: o.message,
        }
    }
}

pub fn to_out(o: &ImportOutcome) -> ImportOut {
    ImportOut {
        title: o.title.clone(),
        filename: o.filename.clone(),
        path: o.path.display().to_string(),
        message: o.message(),
    }
}
