mod common;

use common::{ScriptedChatClient, StubTool};
use futures::StreamExt;
use pharmassist_agent::{AgentConfig, KnowledgeAgent, KnowledgeResponder};
use pharmassist_llm::{ChatResponse, Message, ToolCall, ToolChoice};
use std::sync::Arc;

fn search_call(id: &str, query: &str) -> ChatResponse {
    ChatResponse::with_tool_calls(vec![ToolCall::new(
        id,
        "wikipedia_search",
        serde_json::json!({ "query": query }).to_string(),
    )])
}

const ASPIRIN_ANSWER: &str =
    "Aspirin irreversibly inhibits the cyclooxygenase enzymes COX-1 and COX-2.";

#[tokio::test]
async fn test_direct_answer_without_tool() {
    let client = Arc::new(ScriptedChatClient::new().reply("Ibuprofen is an NSAID."));
    let tool = Arc::new(StubTool::answering("unused"));
    let agent = KnowledgeAgent::new(client.clone(), tool.clone(), AgentConfig::default());

    assert_eq!(agent.run("What is ibuprofen?").await.unwrap(), "Ibuprofen is an NSAID.");
    assert!(tool.queries().is_empty());

    let request = &client.requests()[0];
    assert_eq!(request.options.temperature, Some(0.3));
    assert_eq!(request.options.tool_choice, Some(ToolChoice::auto()));
    let tools = request.options.tools.as_ref().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name(), "wikipedia_search");
}

#[tokio::test]
async fn test_tool_result_is_fed_back() {
    let client = Arc::new(
        ScriptedChatClient::new()
            .reply_with(search_call("call_1", "aspirin mechanism of action"))
            .reply(ASPIRIN_ANSWER),
    );
    let tool = Arc::new(StubTool::answering("Page: Aspirin\nSummary: Aspirin is a COX inhibitor."));
    let agent = KnowledgeAgent::new(client.clone(), tool.clone(), AgentConfig::default());

    let answer = agent.run("What is the mechanism of action of aspirin?").await.unwrap();

    assert_eq!(answer, ASPIRIN_ANSWER);
    assert_eq!(tool.queries(), vec!["aspirin mechanism of action".to_string()]);

    let second = &client.requests()[1];
    let last = second.messages.last().unwrap();
    assert_eq!(
        last,
        &Message::tool_result("call_1", "Page: Aspirin\nSummary: Aspirin is a COX inhibitor.")
    );
}

#[tokio::test]
async fn test_tool_failure_goes_back_to_model() {
    let client = Arc::new(
        ScriptedChatClient::new()
            .reply_with(search_call("call_1", "aspirin"))
            .reply("I could not look that up."),
    );
    let tool = Arc::new(StubTool::failing("connection reset"));
    let agent = KnowledgeAgent::new(client.clone(), tool, AgentConfig::default());

    let answer = agent.run("aspirin?").await.unwrap();
    assert_eq!(answer, "I could not look that up.");

    let fed_back = client.requests()[1].messages.last().unwrap().text().unwrap().to_string();
    assert!(fed_back.starts_with("Tool execution failed:"));
    assert!(fed_back.contains("connection reset"));
}

#[tokio::test]
async fn test_malformed_arguments_are_fed_back() {
    let bad_call = ChatResponse::with_tool_calls(vec![ToolCall::new("call_1", "wikipedia_search", "{not json")]);
    let client = Arc::new(ScriptedChatClient::new().reply_with(bad_call).reply("done"));
    let tool = Arc::new(StubTool::answering("unused"));
    let agent = KnowledgeAgent::new(client.clone(), tool.clone(), AgentConfig::default());

    assert_eq!(agent.run("q").await.unwrap(), "done");
    assert!(tool.queries().is_empty());
}

#[tokio::test]
async fn test_iteration_cap_is_an_error() {
    let client = Arc::new(
        ScriptedChatClient::new()
            .reply_with(search_call("call_1", "a"))
            .reply_with(search_call("call_2", "b"))
            .reply_with(search_call("call_3", "c")),
    );
    let tool = Arc::new(StubTool::answering("nothing useful"));
    let config = AgentConfig::default().with_max_iterations(2);
    let agent = KnowledgeAgent::new(client.clone(), tool.clone(), config);

    let err = agent.run("q").await.unwrap_err();

    assert!(err.to_string().contains("2 iterations"));
    assert_eq!(client.requests().len(), 2);
    assert_eq!(tool.queries().len(), 2);
}

#[tokio::test]
async fn test_responder_yields_exactly_one_chunk() {
    let long_answer = "Aspirin. ".repeat(2000);
    let client = Arc::new(
        ScriptedChatClient::new()
            .reply_with(search_call("call_1", "aspirin"))
            .reply(&long_answer),
    );
    let tool = Arc::new(StubTool::answering("Page: Aspirin\nSummary: ..."));
    let agent = KnowledgeAgent::new(client, tool, AgentConfig::default());
    let responder = KnowledgeResponder::new(Arc::new(agent));

    let chunks: Vec<String> = responder
        .answer("What is the mechanism of action of aspirin?")
        .map(|chunk| chunk.unwrap())
        .collect()
        .await;

    assert_eq!(chunks, vec![long_answer]);
}

#[tokio::test]
async fn test_responder_surfaces_agent_failure() {
    let client = Arc::new(ScriptedChatClient::new().fail("service unavailable"));
    let agent = KnowledgeAgent::new(client, Arc::new(StubTool::answering("x")), AgentConfig::default());
    let responder = KnowledgeResponder::new(Arc::new(agent));

    let chunks: Vec<_> = responder.answer("q").collect().await;
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].is_err());
}
