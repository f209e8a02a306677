use pharmassist_llm::StreamEvent;

#[test]
fn test_stream_event_serialization_message() {
    let event = StreamEvent::Message {
        content: "Test".to_string(),
    };

    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"message\""));
    assert!(json.contains("Test"));
}

#[test]
fn test_stream_event_deserialization_tool_call() {
    let json = r#"{"type":"tool_call","index":0,"id":"call_1","name":"wikipedia_search","arguments":"{}"}"#;
    let event: StreamEvent = serde_json::from_str(json).unwrap();

    match event {
        StreamEvent::ToolCall { index, name, .. } => {
            assert_eq!(index, 0);
            assert_eq!(name.as_deref(), Some("wikipedia_search"));
        }
        _ => panic!("Expected ToolCall variant"),
    }
}

#[test]
fn test_stream_event_tool_call_partial() {
    // Argument fragments arrive without id or name
    let event = StreamEvent::ToolCall {
        index: 0,
        id: None,
        name: None,
        arguments: Some("{\"que".to_string()),
    };

    let json = serde_json::to_value(&event).unwrap();
    assert!(json.get("id").is_none());
    assert_eq!(json["arguments"], "{\"que");
}

#[test]
fn test_message_text_only_for_message_events() {
    let message = StreamEvent::Message {
        content: "Lepirudin".to_string(),
    };
    let done = StreamEvent::Done {
        finish_reason: Some("stop".to_string()),
    };

    assert_eq!(message.message_text(), Some("Lepirudin"));
    assert_eq!(done.message_text(), None);
}
