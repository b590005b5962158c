//! Shared response envelope types for API handlers.
//!
//! Successful responses carry `"success": true` and a `"timestamp"` next to
//! their payload. Use [`Envelope`] instead of ad-hoc `json!` so every
//! handler serializes the same shape.

use fleetwatch_core::types::Timestamp;
use serde::Serialize;

/// `{ "success": true, ...body, "timestamp": ... }`.
///
/// `body` is flattened, so a struct payload contributes its fields directly
/// to the top-level object.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
    pub timestamp: Timestamp,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(body: T) -> Self {
        Self {
            success: true,
            body,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Standard `{ "data": T }` payload.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Envelope<DataResponse<T>> {
    /// `{ "success": true, "data": ..., "timestamp": ... }`.
    pub fn data(data: T) -> Self {
        Self::ok(DataResponse { data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_envelope_shape() {
        let json = serde_json::to_value(Envelope::data(vec![1, 2])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn struct_body_is_flattened() {
        #[derive(Serialize)]
        struct Body {
            date: &'static str,
            count: usize,
        }

        let json = serde_json::to_value(Envelope::ok(Body {
            date: "25 August",
            count: 3,
        }))
        .unwrap();
        assert_eq!(json["date"], "25 August");
        assert_eq!(json["count"], 3);
        assert_eq!(json["success"], true);
    }
}
