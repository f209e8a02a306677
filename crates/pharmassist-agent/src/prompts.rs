//! Prompt templates. Each prompt is sent as a single human message.

use crate::history::ConversationHistory;

pub fn classification(question: &str, history: &ConversationHistory) -> String {
    format!(
        r#"You are an expert at determining what type of pharmaceutical query a user is asking about.

Your task is to STRICTLY categorize the following query:

ONLY respond with "DATABASE" if the query is SPECIFICALLY about:
1. Drug-to-drug interactions between two specific medications
2. Direct questions about the database itself (schema, statistics, number of entries)

For ALL other queries, including but not limited to:
- Drug compositions
- Synthesis methods
- Side effects (unless specifically about interaction side effects)
- Pharmacology
- Chemical properties
- Manufacturing
- History or discovery
- Mechanisms of action
- Dosage information

You MUST respond with "WIKIPEDIA" for these types of queries.

Conversation History: {history}
User Query: {question}

Response (ONLY "DATABASE" or "WIKIPEDIA"):"#,
        history = history.render(),
        question = question,
    )
}

pub fn sql_generation(schema: &str, question: &str, history: &ConversationHistory) -> String {
    format!(
        r#"You are an expert pharmacologist analyzing a drug interaction database at a company.
You are interacting with a user who is asking you questions about the company's database.
Based on the table schema below, write a SQL query that would answer the user's question. Take the conversation history into account.

<SCHEMA>{schema}</SCHEMA>

Conversation History: {history}

Write only the SQL query and nothing else. Do not wrap the SQL query in any other text, not even backticks.

For example:
Question: What's the interaction of Lepirudin and Apixaban?
SQL Query: SELECT description FROM ddi WHERE (drug_name = 'Lepirudin' AND interacting_drug_name = 'Apixaban');

Question: Show me interactions for anticoagulant drugs only?
SQL Query: SELECT * FROM ddi WHERE drug_name = 'Lepirudin' AND description LIKE '%anticoagulant%' LIMIT 5;

Your turn:
Question: {question}
SQL Query:"#,
        schema = schema,
        history = history.render(),
        question = question,
    )
}

pub fn narration(
    schema: &str,
    sql: &str,
    question: &str,
    response: &str,
    history: &ConversationHistory,
) -> String {
    format!(
        r#"You are an expert pharmacologist analyzing a drug interaction database at a company.
You are interacting with a user who is asking you question about the company's database.
Based on the table schema below, sql query, and sql response, write a natural language response.

<SCHEMA>{schema}</SCHEMA>

Conversation History: {history}
SQL Query: <SQL>{sql}</SQL>
User question: {question}
SQL Response: {response}"#,
        schema = schema,
        history = history.render(),
        sql = sql,
        question = question,
        response = response,
    )
}

/// System message for the knowledge agent
pub fn knowledge_agent(tool_name: &str, tool_description: &str) -> String {
    format!(
        "Answer the following questions as best you can. You have access to one tool:\n\n\
         {tool_name}: {tool_description}\n\n\
         Call the tool when you need facts you are not sure about. When you know the final \
         answer, reply with the answer only.",
    )
}
