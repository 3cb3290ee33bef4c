//! Filter types shared across the verb surface (§4.4): the `PROC OUTPUT`
//! output filter (serialized as space-separated `key=value` args) and the
//! directory filter (serialized as an optional JSON payload).

use serde::{Deserialize, Serialize};

/// Filter for `PROC OUTPUT id <filter...>`. Serializes to a sequence of
/// `key=value` argument tokens, never a payload — the wire format this
/// verb used before structured payloads existed, kept for backward
/// compatibility with peers that only understand the argument form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputFilter {
    /// `None`/`Some("combined")` are equivalent and both omit the `stream=`
    /// argument entirely.
    pub stream: Option<String>,
    pub tail: Option<u32>,
    pub head: Option<u32>,
    pub grep: Option<String>,
    pub grep_v: bool,
}

impl OutputFilter {
    /// Render as the argument tokens that follow `OUTPUT <id>`.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(stream) = &self.stream {
            if stream != "combined" {
                args.push(format!("stream={stream}"));
            }
        }
        if let Some(tail) = self.tail {
            if tail > 0 {
                args.push(format!("tail={tail}"));
            }
        }
        if let Some(head) = self.head {
            if head > 0 {
                args.push(format!("head={head}"));
            }
        }
        if let Some(grep) = &self.grep {
            args.push(format!("grep={grep}"));
        }
        if self.grep_v {
            args.push("grep_v".to_string());
        }
        args
    }
}

/// Filter for any `LIST` sub-verb that can be scoped to one working
/// directory, or to all directories (`Global`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryFilter {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub directory: String,
    #[serde(default)]
    pub global: bool,
}

impl DirectoryFilter {
    /// JSON payload, or `None` when the filter is a no-op — presence of the
    /// payload is itself meaningful to older peers (§4.4), so an inactive
    /// filter must omit it rather than send `{}`.
    pub fn to_payload(&self) -> Option<Vec<u8>> {
        if self.directory.is_empty() && !self.global {
            return None;
        }
        serde_json::to_vec(self).ok()
    }
}
