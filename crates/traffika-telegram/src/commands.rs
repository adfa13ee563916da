// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command parsing for the chat surface.

/// Operator commands understood by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Offers,
    Sources,
    AddOffer,
    AddSource,
    Report,
    Analyze,
    GrantAdmin { username: Option<String> },
    Cancel,
}

impl Command {
    /// Parse a message text into a command.
    ///
    /// Accepts an optional `@botname` suffix on the command word.
    /// Returns `None` for non-commands and unknown commands alike; the
    /// caller distinguishes the two by the leading slash.
    pub fn parse(text: &str) -> Option<Command> {
        let mut parts = text.trim().split_whitespace();
        let word = parts.next()?;
        if !word.starts_with('/') {
            return None;
        }
        let word = word.split('@').next().unwrap_or(word);

        let command = match word {
            "/start" => Command::Start,
            "/help" => Command::Help,
            "/offers" => Command::Offers,
            "/sources" => Command::Sources,
            "/addoffer" => Command::AddOffer,
            "/addsource" => Command::AddSource,
            "/report" => Command::Report,
            "/analyze" => Command::Analyze,
            "/cancel" => Command::Cancel,
            "/grant_admin" => Command::GrantAdmin {
                username: parts
                    .next()
                    .map(|u| u.trim_start_matches('@').to_string()),
            },
            _ => return None,
        };
        Some(command)
    }
}
