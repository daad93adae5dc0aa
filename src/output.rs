//! Output types for host consumption.
//!
//! These structs are serialized to JSON and handed to hosts that draw the
//! scene themselves or need to mirror the view state (focus, hover).

use serde::Serialize;

use crate::error::Error;
use crate::focus::{Focus, ViewTransform};
use crate::hierarchy::SourceRef;
use crate::render::Scene;
use crate::view::RingView;

/// Error information for the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}

impl From<&Error> for ErrorInfo {
    fn from(err: &Error) -> Self {
        Self { message: err.to_string() }
    }
}

/// Everything a host needs to draw one frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub scene: Scene,
    pub focus: Focus,
    pub transform: ViewTransform,
    pub animating: bool,
    pub hovered: Option<SourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl ViewSnapshot {
    pub fn of(view: &RingView) -> Self {
        Self {
            scene: view.scene(),
            focus: view.focus(),
            transform: view.transform(),
            animating: view.is_animating(),
            hovered: view.hovered(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: Option<ErrorInfo>) -> Self {
        self.error = error;
        self
    }

    pub fn to_json(&self) -> String {
        // Only numbers, strings and enums: serializing cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
