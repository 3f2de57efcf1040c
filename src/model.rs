//! Core data model.
//!
//! A request is one unit of client-submitted work. The core creates it with
//! status `RECEIVED`; anything after that belongs to the downstream worker.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Partition key shared by every request record.
pub const PARTITION_KEY: &str = "request";

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A tracked request, in the shape clients see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Grouping key. Always [`PARTITION_KEY`] for records written here.
    #[serde(rename = "id")]
    pub partition_key: String,

    #[serde(rename = "requestID")]
    pub request_id: RequestId,

    /// Milliseconds since the Unix epoch, set at admission.
    #[serde(rename = "timestamp")]
    pub created_at: i64,

    pub status: RequestStatus,

    /// Set by the downstream worker when it finishes.
    #[serde(
        rename = "finishTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub finished_at: Option<i64>,
}

impl Request {
    /// A freshly admitted request: new id, `RECEIVED`, stamped now.
    pub fn received() -> Self {
        Self {
            partition_key: PARTITION_KEY.to_string(),
            request_id: RequestId::new(),
            created_at: now_millis(),
            status: RequestStatus::Received,
            finished_at: None,
        }
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Sort newest first by `created_at`. Stable, so ties keep their input order.
pub fn sort_newest_first(requests: &mut [Request]) {
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

// ---------------------------------------------------------------------------
// RequestId
// ---------------------------------------------------------------------------

/// Newtype for request IDs (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First 8 characters, for tables.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Request status. Open-ended: the worker may write states this crate
/// does not know about, and they are carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestStatus {
    Received,
    Other(String),
}

impl RequestStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RequestStatus::Received => "RECEIVED",
            RequestStatus::Other(s) => s,
        }
    }
}

impl From<String> for RequestStatus {
    fn from(s: String) -> Self {
        if s == "RECEIVED" {
            RequestStatus::Received
        } else {
            RequestStatus::Other(s)
        }
    }
}

impl From<RequestStatus> for String {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Received => "RECEIVED".to_string(),
            RequestStatus::Other(s) => s,
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Queue payload
// ---------------------------------------------------------------------------

/// Body of the message handed to the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMessage {
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_with_wire_names() {
        let id: RequestId = "6f1c2d4e-8a9b-4c3d-9e8f-0a1b2c3d4e5f".parse().unwrap();
        let request = Request {
            partition_key: PARTITION_KEY.to_string(),
            request_id: id,
            created_at: 1_700_000_000_000,
            status: RequestStatus::Received,
            finished_at: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "request",
                "requestID": "6f1c2d4e-8a9b-4c3d-9e8f-0a1b2c3d4e5f",
                "timestamp": 1_700_000_000_000_i64,
                "status": "RECEIVED"
            })
        );
    }

    #[test]
    fn unknown_status_is_carried_through() {
        let value = json!({
            "id": "request",
            "requestID": "6f1c2d4e-8a9b-4c3d-9e8f-0a1b2c3d4e5f",
            "timestamp": 10,
            "status": "COMPLETED",
            "finishTime": 20
        });
        let request: Request = serde_json::from_value(value).unwrap();
        assert_eq!(request.status, RequestStatus::Other("COMPLETED".to_string()));
        assert_eq!(request.finished_at, Some(20));
    }

    #[test]
    fn sort_is_newest_first() {
        let mut requests: Vec<Request> = [100, 300, 200]
            .into_iter()
            .map(|t| Request {
                created_at: t,
                ..Request::received()
            })
            .collect();
        sort_newest_first(&mut requests);
        let order: Vec<i64> = requests.iter().map(|r| r.created_at).collect();
        assert_eq!(order, vec![300, 200, 100]);
    }

    #[test]
    fn short_id_is_eight_chars() {
        assert_eq!(RequestId::new().short().len(), 8);
    }

    #[test]
    fn queue_message_uses_camel_case_id() {
        let id = RequestId::new();
        let value = serde_json::to_value(QueueMessage { request_id: id }).unwrap();
        assert_eq!(value, json!({ "requestId": id.to_string() }));
    }
}
