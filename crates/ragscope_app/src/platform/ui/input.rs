use std::io::BufRead;
use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use console_logging::console_info;
use ragscope_core::{Msg, SelectedFile};

pub const HELP: &str = "Type a question and press Enter. /upload <path> sends a document, /quit exits.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Upload(String),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some(("/upload", path)) if !path.trim().is_empty() => {
            Command::Upload(path.trim().to_string())
        }
        _ => match trimmed {
            "/quit" | "/exit" => Command::Quit,
            "/help" | "/upload" => Command::Help,
            // Whitespace-only lines go through as messages; the core rejects them.
            _ => Command::Say(line.trim_end_matches(['\r', '\n']).to_string()),
        },
    }
}

pub fn command_msgs(command: Command) -> Vec<Msg> {
    match command {
        Command::Say(text) => vec![Msg::InputChanged(text), Msg::MessageSubmitted],
        Command::Upload(path) => vec![Msg::FileSelected {
            file: SelectedFile::from_path(path),
            at: Utc::now(),
        }],
        Command::Help => Vec::new(),
        Command::Quit => vec![Msg::Unmounted],
    }
}

/// Reads stdin on a background thread. End of input unmounts the view.
pub fn spawn_reader(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let command = parse_command(&line);
            if command == Command::Help {
                println!("{HELP}");
                continue;
            }
            let quit = command == Command::Quit;
            for msg in command_msgs(command) {
                if msg_tx.send(msg).is_err() {
                    return;
                }
            }
            if quit {
                return;
            }
        }
        console_info!("Input closed");
        let _ = msg_tx.send(Msg::Unmounted);
    });
}
