//! Line-buffered keys from standard input
//!
//! A terminal has no key-down events, so each submitted line is turned into
//! key presses: `esc`, `quit` or `exit` is Escape, anything else is one press
//! per recognised character. The reader runs on its own thread and hands keys
//! to the frame loop over a channel; the loop drains it without blocking.

use super::KeyCode;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Keys typed on a reader, delivered without blocking
pub struct StdinKeys {
    receiver: Receiver<KeyCode>,
}

impl StdinKeys {
    /// Start reading process stdin
    pub fn spawn() -> std::io::Result<Self> {
        Self::spawn_reader(std::io::BufReader::new(std::io::stdin()))
    }

    /// Start reading an arbitrary line source
    pub fn spawn_reader<R: BufRead + Send + 'static>(reader: R) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        thread::Builder::new()
            .name("stdin-keys".to_string())
            .spawn(move || {
                for line in reader.lines() {
                    let Ok(line) = line else { break };
                    for key in parse_line(&line) {
                        if sender.send(key).is_err() {
                            return;
                        }
                    }
                }
                log::debug!("Key input closed");
            })?;
        Ok(Self { receiver })
    }

    /// Every key received since the last call
    pub fn drain(&self) -> Vec<KeyCode> {
        let mut keys = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(key) => keys.push(key),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        keys
    }
}

fn parse_line(line: &str) -> Vec<KeyCode> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "esc" | "quit" | "exit" => vec![KeyCode::Escape],
        _ => line.chars().filter_map(KeyCode::from_char).collect(),
    }
}
