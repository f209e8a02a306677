use futures::StreamExt;
use mockito::Matcher;
use pharmassist_llm::{ChatClient, ChatOptions, ChatRequest, Message, OpenAIClient, StreamEvent};
use serde_json::json;

fn client_for(server: &mockito::ServerGuard) -> OpenAIClient {
    OpenAIClient::new("sk-test").unwrap().with_base_url(server.url())
}

#[tokio::test]
async fn test_chat_returns_content_and_usage() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-3.5-turbo",
            "stream": false,
            "temperature": 0.0,
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "created": 1,
                "model": "gpt-3.5-turbo",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "DATABASE"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 10, "completion_tokens": 1, "total_tokens": 11}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let request = ChatRequest::new("gpt-3.5-turbo", vec![Message::human("route me")])
        .with_options(ChatOptions::new().temperature(0.0));
    let response = client_for(&server).chat(request).await.unwrap();

    assert_eq!(response.content.as_deref(), Some("DATABASE"));
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert_eq!(response.usage.unwrap().total_tokens, 11);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_chat_parses_tool_calls() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(
            json!({
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_1",
                            "type": "function",
                            "function": {"name": "wikipedia_search", "arguments": "{\"query\":\"aspirin\"}"}
                        }]
                    },
                    "finish_reason": "tool_calls"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let response = client_for(&server)
        .chat(ChatRequest::new("gpt-3.5-turbo", vec![Message::human("aspirin?")]))
        .await
        .unwrap();

    let calls = response.tool_calls.unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].function.name, "wikipedia_search");
    assert!(response.usage.is_none());
}

#[tokio::test]
async fn test_api_error_carries_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .chat(ChatRequest::new("gpt-3.5-turbo", vec![Message::human("hi")]))
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("401"));
    assert!(message.contains("Incorrect API key"));
}

#[tokio::test]
async fn test_chat_stream_yields_fragments_until_done() {
    let body = concat!(
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"\"},\"finish_reason\":null}]}\n\n",
        ": keep-alive\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Lepirudin \"},\"finish_reason\":null}]}\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"and Apixaban\"},\"finish_reason\":null}]}\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
        "data: [DONE]\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"ignored\"},\"finish_reason\":null}]}\n\n",
    );

    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"stream": true})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let mut stream = client_for(&server)
        .chat_stream(ChatRequest::new("gpt-3.5-turbo", vec![Message::human("narrate")]))
        .await
        .unwrap();

    let mut events = Vec::new();
    while let Some(event) = stream.next().await {
        events.push(event.unwrap());
    }

    let text: String = events.iter().filter_map(StreamEvent::message_text).collect();
    assert_eq!(text, "Lepirudin and Apixaban");
    assert_eq!(
        events.last(),
        Some(&StreamEvent::Done { finish_reason: None })
    );
}

#[tokio::test]
async fn test_chat_stream_surfaces_malformed_chunk() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body("data: {broken\n\ndata: [DONE]\n\n")
        .create_async()
        .await;

    let mut stream = client_for(&server)
        .chat_stream(ChatRequest::new("gpt-3.5-turbo", vec![]))
        .await
        .unwrap();

    assert!(stream.next().await.unwrap().is_err());
}
