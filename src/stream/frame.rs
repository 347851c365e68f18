// file: src/stream/frame.rs
// description: wire frames of the progress stream and their SSE encoding
// reference: text/event-stream, one JSON object per data line

use crate::error::StreamError;
use crate::models::{BatchResult, ProgressEvent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamFrame {
    Progress { data: ProgressEvent },
    Results { data: BatchResult },
    Error { message: String },
}

impl StreamFrame {
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }

    pub fn to_sse(&self) -> Result<String, StreamError> {
        Ok(format!("data: {}\n\n", serde_json::to_string(self)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemStatus;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_progress_frame_shape() {
        let frame = StreamFrame::Progress {
            data: ProgressEvent::new("id-1", "jane.pdf", ItemStatus::Analyzing, 42.5, "Analyzing"),
        };

        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "progress",
                "data": {
                    "item_id": "id-1",
                    "filename": "jane.pdf",
                    "status": "analyzing",
                    "progress": 42.5,
                    "message": "Analyzing"
                }
            })
        );
    }

    #[test]
    fn test_sse_encoding() {
        let frame = StreamFrame::Error {
            message: "boom".to_string(),
        };
        assert_eq!(
            frame.to_sse().unwrap(),
            "data: {\"type\":\"error\",\"message\":\"boom\"}\n\n"
        );
        assert!(frame.is_final());
    }

    #[test]
    fn test_results_frame_carries_count() {
        let frame = StreamFrame::Results {
            data: BatchResult::default(),
        };
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value["type"], "results");
        assert_eq!(value["data"]["count"], 0);
        assert_eq!(value["data"]["results"], json!([]));
    }
}
