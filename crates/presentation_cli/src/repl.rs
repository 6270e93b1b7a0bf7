//! Interactive chat loop
//!
//! Reads lines from stdin and drives the chat session. Slash commands
//! control the voice loop and the transcript; anything else is sent to the
//! assistant. Session events print between prompts.

use std::sync::Arc;

use application::{ChatSession, SendOutcome, SessionEvent, SessionPhase, TranscriptService};
use domain::Sender;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

const HELP: &str = "Commands:
  /voice    start or stop voice input
  /speak    speak the last reply (again: stop)
  /replies  toggle spoken replies
  /history  show the transcript
  /clear    clear the transcript
  /help     show this help
  /quit     exit";

/// Run the interactive loop until the user quits
pub async fn run(
    session: Arc<ChatSession>,
    transcript: Arc<TranscriptService>,
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
) -> anyhow::Result<()> {
    println!("SousChef - ask me anything about cooking. /help for commands.");
    if !session.speech_available() {
        println!("(voice is not configured; running text-only)");
    }

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::TypingStarted => println!("...thinking"),
                SessionEvent::TypingFinished => {},
                SessionEvent::PhaseChanged(SessionPhase::Listening) => println!("[listening]"),
                SessionEvent::PhaseChanged(SessionPhase::Speaking) => println!("[speaking]"),
                SessionEvent::PhaseChanged(SessionPhase::Idle) => {},
                SessionEvent::Notice(notice) => println!("! {notice}"),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            "" => {},
            "/quit" | "/exit" => break,
            "/help" => println!("{HELP}"),
            "/voice" => {
                let outcome = session.toggle_voice_input().await?;
                print_outcome(&outcome);
            },
            "/speak" => session.toggle_speech_output().await?,
            "/replies" => {
                let enabled = !session.voice_replies();
                session.set_voice_replies(enabled);
                println!(
                    "Spoken replies {}.",
                    if enabled { "enabled" } else { "disabled" }
                );
            },
            "/history" => {
                for message in transcript.messages() {
                    let prefix = match message.sender {
                        Sender::User => "you",
                        Sender::Bot => "chef",
                    };
                    println!("{prefix}: {}", message.text);
                }
            },
            "/clear" => {
                transcript.clear().await;
                println!("Transcript cleared.");
            },
            _ => {
                let outcome = session.send_message(line).await?;
                print_outcome(&outcome);
            },
        }
    }

    session.interrupt();
    Ok(())
}

fn print_outcome(outcome: &SendOutcome) {
    match outcome {
        SendOutcome::Delivered(reply) | SendOutcome::Failed(reply) => {
            println!("chef: {}", reply.text);
        },
        SendOutcome::Ignored | SendOutcome::Superseded => {},
    }
}

async fn prompt() -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"> ").await?;
    stdout.flush().await
}
