pub mod admin;
pub mod ask;
pub mod auth;
pub mod chat;
pub mod documents;

use colored::Colorize;
use docqa_application::SendOutcome;
use docqa_core::chat::{Message, MessageState};

/// Prints one exchange the way the chat view shows it.
pub fn print_message(message: &Message) {
    println!("{}", format!("> {}", message.question).green());
    for line in message.answer.lines() {
        let line = match message.state {
            MessageState::Pending => line.bright_black(),
            MessageState::Resolved => line.bright_blue(),
            MessageState::Failed => line.red(),
        };
        println!("{}", line);
    }
    println!();
}

/// Prints the settled answer. Returns `false` when it failed.
pub fn print_outcome(outcome: &SendOutcome) -> bool {
    match outcome {
        SendOutcome::Resolved(message) => {
            for line in message.answer.lines() {
                println!("{}", line.bright_blue());
            }
            println!();
            true
        }
        SendOutcome::Failed { message, error } => {
            println!("{}", message.answer.red());
            println!("{}", format!("  ({})", error).bright_black());
            println!();
            false
        }
        SendOutcome::Discarded => true,
    }
}
