pub mod capabilities;
pub mod constants;
pub mod error;
pub mod message;
pub mod result;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::protocol::message::{JsonRpcMessage, JsonRpcRaw};

    #[test]
    fn test_notification_conversion() {
        let raw = JsonRpcRaw {
            jsonrpc: "2.0".to_string(),
            id: None,
            method: Some("notifications/initialized".to_string()),
            params: None,
            result: None,
            error: None,
        };

        let message = JsonRpcMessage::try_from(raw).unwrap();
        match message {
            JsonRpcMessage::Notification(n) => {
                assert_eq!(n.jsonrpc, "2.0");
                assert_eq!(n.method, "notifications/initialized");
                assert!(n.params.is_none());
            }
            _ => panic!("Expected Notification"),
        }
    }

    #[test]
    fn test_request_conversion() {
        let raw = JsonRpcRaw {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: Some("tools/call".to_string()),
            params: Some(json!({"name": "generate_pie_chart"})),
            result: None,
            error: None,
        };

        let message = JsonRpcMessage::try_from(raw).unwrap();
        match message {
            JsonRpcMessage::Request(r) => {
                assert_eq!(r.jsonrpc, "2.0");
                assert_eq!(r.id, Some(json!(1)));
                assert_eq!(r.method, "tools/call");
                assert_eq!(r.params.unwrap(), json!({"name": "generate_pie_chart"}));
            }
            _ => panic!("Expected Request"),
        }
    }

    #[test]
    fn test_string_request_id_survives_round_trip() {
        let msg: JsonRpcMessage = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": "req-7",
            "method": "tools/list"
        }))
        .unwrap();

        let JsonRpcMessage::Request(request) = msg else {
            panic!("Expected Request");
        };
        assert_eq!(request.id, Some(json!("req-7")));
        assert!(!request.is_initialize());
    }

    #[test]
    fn test_message_ids() {
        let parse = |value| serde_json::from_value::<JsonRpcMessage>(value).unwrap();

        let request = parse(json!({"jsonrpc": "2.0", "id": "a", "method": "ping"}));
        assert_eq!(request.id(), Some(&json!("a")));
        let response = parse(json!({"jsonrpc": "2.0", "id": 3, "result": {}}));
        assert_eq!(response.id(), Some(&json!(3)));
        let error = parse(json!({"jsonrpc": "2.0", "id": 4, "error": {"code": -32601, "message": "x"}}));
        assert_eq!(error.id(), Some(&json!(4)));
        let notification = parse(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}));
        assert_eq!(notification.id(), None);
    }
}
