// Shadow.AI Interactive Console
// REPL that talks to one avatar session

use anyhow::Result;
use shadow_brain::{AvatarSession, BrainReply, Personality};
use std::io::{self, BufRead, BufReader, Write};

pub struct InteractiveConsole {
    session: AvatarSession,
    /// Metadata appended to every utterance while set
    context: Option<String>,
    prompt: String,
}

impl InteractiveConsole {
    pub fn new(session: AvatarSession) -> Self {
        Self {
            session,
            context: None,
            prompt: "shadow".to_string(),
        }
    }

    /// Start the interactive console
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner().await;
        self.print_help();

        let stdin = io::stdin();
        let mut stdin = BufReader::new(stdin.lock());

        loop {
            print!("{}> ", self.prompt);
            io::stdout().flush()?;

            let mut line = String::new();
            if stdin.read_line(&mut line)? == 0 {
                break;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match self.handle_command(line).await {
                Ok(CommandResult::Continue) => continue,
                Ok(CommandResult::Exit) => break,
                Ok(CommandResult::Success(msg)) => println!("✅ {}", msg),
                Ok(CommandResult::Error(msg)) => println!("❌ Error: {}", msg),
                Ok(CommandResult::Output(output)) => println!("{}", output),
                Err(e) => println!("❌ Error: {}", e),
            }
        }

        println!("\n👋 Goodbye!");
        Ok(())
    }

    async fn print_banner(&self) {
        let config = self.session.config().await;
        println!("\n╔═══════════════════════════════════════════════════════════════╗");
        println!("║                 Shadow.AI Avatar Brain Console                ║");
        println!("╚═══════════════════════════════════════════════════════════════╝");
        println!();
        println!(
            "Meeting: {} | personality: {} | type: {} | language: {}",
            self.session.meeting_id(),
            config.personality,
            config.meeting_type,
            config.language
        );
        println!("Type '/help' for available commands, '/exit' to quit");
        println!();
    }

    fn print_help(&self) {
        println!("📚 Available Commands:");
        println!("  /help, /?           - Show this help message");
        println!("  /exit, /quit, /q    - Exit the console");
        println!("  /history            - Show the conversation");
        println!("  /summary            - Summarize the meeting so far");
        println!("  /clear              - Forget the conversation");
        println!("  /persona <p>        - Switch personality (history is reset)");
        println!("  /context [text]     - Set or clear the context appended to each utterance");
        println!("  /prompt             - Show the current system prompt");
        println!("  <anything else>     - Say it to the avatar");
        println!();
    }

    /// Lines starting with `/` are console commands; everything else is
    /// spoken to the avatar.
    async fn handle_command(&mut self, line: &str) -> Result<CommandResult> {
        let Some(command_line) = line.strip_prefix('/') else {
            let reply = self.session.respond(line, self.context.as_deref()).await?;
            return Ok(CommandResult::Output(format_reply(&reply)));
        };

        let (command, rest) = match command_line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (command_line, ""),
        };

        match command.to_lowercase().as_str() {
            "exit" | "quit" | "q" => Ok(CommandResult::Exit),
            "help" | "?" => {
                self.print_help();
                Ok(CommandResult::Continue)
            }
            "history" => {
                let history = self.session.history().await;
                if history.is_empty() {
                    return Ok(CommandResult::Output("(no conversation yet)".to_string()));
                }
                let lines: Vec<String> = history
                    .iter()
                    .enumerate()
                    .map(|(i, turn)| format!("  {}: [{}] {}", i + 1, turn.role, turn.content))
                    .collect();
                Ok(CommandResult::Output(lines.join("\n")))
            }
            "summary" => Ok(CommandResult::Output(self.session.summarize().await)),
            "clear" => {
                self.session.reset().await;
                Ok(CommandResult::Success("Conversation cleared".to_string()))
            }
            "persona" => {
                if rest.is_empty() {
                    return Ok(CommandResult::Error(
                        "Usage: /persona <professional|friendly|assistant|expert>".to_string(),
                    ));
                }
                match rest.parse::<Personality>() {
                    Ok(personality) => {
                        self.session.change_personality(personality).await;
                        Ok(CommandResult::Success(format!("Personality set to {}", personality)))
                    }
                    Err(e) => Ok(CommandResult::Error(e.to_string())),
                }
            }
            "context" => {
                if rest.is_empty() {
                    self.context = None;
                    Ok(CommandResult::Success("Context cleared".to_string()))
                } else {
                    self.context = Some(rest.to_string());
                    Ok(CommandResult::Success(format!("Context set to '{}'", rest)))
                }
            }
            "prompt" => Ok(CommandResult::Output(self.session.system_prompt().await)),
            other => Ok(CommandResult::Error(format!(
                "Unknown command '/{}', type /help",
                other
            ))),
        }
    }
}

fn format_reply(reply: &BrainReply) -> String {
    let cue = reply.cue();
    format!(
        "🤖 {}\n   emotion: {} | action: {} | cue: {:?}/{:?} intensity {:.1} for {}ms",
        reply.response,
        reply.emotion,
        reply.action,
        cue.expression,
        cue.gesture,
        cue.intensity,
        cue.duration_ms
    )
}

#[derive(Debug, PartialEq)]
enum CommandResult {
    Continue,
    Exit,
    Success(String),
    Error(String),
    Output(String),
}
