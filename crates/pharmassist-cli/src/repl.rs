use anyhow::Result;
use futures::StreamExt;
use pharmassist_agent::{ChatSession, ConversationTurn};
use pharmassist_db::ConnectionConfig;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect,
    History,
    Quit,
    Ask(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "/connect" => Self::Connect,
            "/history" => Self::History,
            "/quit" | "/exit" => Self::Quit,
            _ => Self::Ask(line.to_string()),
        }
    }
}

pub struct Repl {
    session: ChatSession,
    connection: ConnectionConfig,
}

impl Repl {
    pub fn new(session: ChatSession, connection: ConnectionConfig) -> Self {
        Self { session, connection }
    }

    pub async fn connect(&mut self) {
        println!(
            "Connecting to {}:{}/{} ...",
            self.connection.host, self.connection.port, self.connection.database
        );
        match self.session.connect(&self.connection).await {
            Ok(()) => println!("Connected to database!"),
            Err(e) => {
                tracing::error!(error = %e, "Connection failed");
                println!("Failed to connect: {}", e);
            }
        }
    }

    pub fn print_history(&self) {
        for turn in self.session.history().turns() {
            match turn {
                ConversationTurn::Human(text) => println!("Human: {}", text),
                ConversationTurn::Assistant(text) => println!("AI: {}", text),
            }
        }
    }

    /// Read lines until `/quit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        self.print_history();
        println!("Commands: /connect, /history, /quit");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match Command::parse(&line) {
                Command::Connect => self.connect().await,
                Command::History => self.print_history(),
                Command::Quit => break,
                Command::Ask(question) => self.ask(&question).await?,
            }
        }

        Ok(())
    }

    async fn ask(&mut self, question: &str) -> Result<()> {
        let mut stream = match self.session.ask(question).await {
            Ok(Some(stream)) => stream,
            Ok(None) => return Ok(()),
            Err(e) => {
                println!("{}", self.session.record_failure(e));
                return Ok(());
            }
        };

        let mut answer = String::new();
        let mut failure = None;
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(text) => {
                    print!("{}", text);
                    std::io::stdout().flush()?;
                    answer.push_str(&text);
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }
        println!();

        match failure {
            None => self.session.record_answer(answer),
            Some(e) => {
                tracing::warn!(error = %e, "Answer failed");
                println!("{}", self.session.record_failure(e));
            }
        }

        Ok(())
    }
}
