//! Line-oriented text protocol for driving a [`Game`].
//!
//! The protocol follows the shape of GTP: one command per line, optional
//! numeric id, responses of the form `=[id] message` on success and
//! `?[id] message` on failure, each followed by a blank line.
//!
//! ## Supported Commands
//!
//! - `name` / `version` - Engine identification
//! - `list_commands` / `known_command <cmd>` - Command discovery
//! - `quit` - Exit the loop
//! - `reset` - Start a new game
//! - `board` - Render the board
//! - `turn` - Side to move
//! - `select <row> <col>` - Select a piece or move the selected piece there
//! - `moves` - Destinations of the selected piece
//! - `ai` - Search for the side to move and play the result
//! - `depth <1-8>` - Set the search depth
//! - `algorithm <minimax|alphabeta>` - Set the search routine
//! - `winner` - Winning color, or `none`
//! - `eval` - Static evaluation of the current position
//!
//! ## Example
//!
//! ```
//! use checkers_rust::protocol::Engine;
//!
//! let mut engine = Engine::new();
//! let mut out = Vec::new();
//! engine.run("select 2 1\nselect 3 2\nturn\n".as_bytes(), &mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().contains("= red"));
//! ```

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::board::Rules;
use crate::constants::{DEFAULT_DEPTH, MAX_DEPTH, MIN_DEPTH, N};
use crate::game::Game;
use crate::piece::{Color, Square};
use crate::search::Algorithm;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "ai",
    "algorithm",
    "board",
    "depth",
    "eval",
    "known_command",
    "list_commands",
    "moves",
    "name",
    "quit",
    "reset",
    "select",
    "turn",
    "version",
    "winner",
];

/// Protocol engine state.
pub struct Engine {
    /// Current game
    game: Game,
    /// Search depth for `ai`
    depth: u32,
    /// Search routine for `ai`
    algorithm: Algorithm,
    /// Color the engine answers for automatically after each human move
    auto_color: Option<Color>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_settings(Rules::default(), DEFAULT_DEPTH, Algorithm::default())
    }

    pub fn with_settings(rules: Rules, depth: u32, algorithm: Algorithm) -> Self {
        Self {
            game: Game::with_rules(rules),
            depth,
            algorithm,
            auto_color: None,
        }
    }

    /// Let the engine reply for `color` whenever it becomes that side's turn.
    pub fn auto_play(mut self, color: Option<Color>) -> Self {
        self.auto_color = color;
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        if let Some(reply) = self.auto_reply() {
            writeln!(output, "\n= {reply}\n")?;
            output.flush()?;
        }

        for line in input.lines() {
            let line = line.context("failed to read command")?;

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((&command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = match self.execute(&command, args) {
                Ok(message) => (true, message),
                Err(err) => (false, err.to_string()),
            };
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(output, "\n{prefix}{id_str} {message}\n")?;

            if success {
                if let Some(reply) = self.auto_reply() {
                    writeln!(output, "\n= {reply}\n")?;
                }
            }
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Parse and bounds-check a `<row> <col>` pair.
    fn parse_square(args: &[&str]) -> Result<Square> {
        let [row, col] = args else {
            bail!("expected <row> <col>");
        };
        let row: usize = row.parse().with_context(|| format!("invalid row '{row}'"))?;
        let col: usize = col.parse().with_context(|| format!("invalid column '{col}'"))?;
        if row >= N || col >= N {
            bail!("coordinates out of range, use 0-{}", N - 1);
        }
        Ok((row, col))
    }

    /// Play the engine's move if it is the auto-play color's turn.
    fn auto_reply(&mut self) -> Option<String> {
        let color = self.auto_color?;
        if self.game.turn() != color || self.game.winner().is_some() {
            return None;
        }
        Some(self.play_ai())
    }

    fn play_ai(&mut self) -> String {
        let color = self.game.turn();
        match self.game.ai_move(self.depth, self.algorithm) {
            Some(score) => {
                debug!(%color, score, "engine moved");
                format!("{color} moved, score {score}\n{}", self.game.board())
            }
            None => format!("{color} has no move"),
        }
    }

    fn format_moves(&self) -> String {
        self.game
            .valid_moves()
            .destinations()
            .map(|(r, c)| format!("{r},{c}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Execute a command and return the response message.
    fn execute(&mut self, command: &str, args: &[&str]) -> Result<String> {
        match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(name) = args.first() else {
                    bail!("missing argument");
                };
                let known = KNOWN_COMMANDS.contains(&name.to_lowercase().as_str());
                Ok(known.to_string())
            }

            "quit" => Ok(String::new()),

            "reset" => {
                self.game.reset();
                Ok(String::new())
            }

            "board" => Ok(format!("\n{}", self.game.board())),

            "turn" => Ok(self.game.turn().to_string()),

            "select" => {
                let (row, col) = Self::parse_square(args)?;
                if let Some(color) = self.game.winner() {
                    bail!("game over, {color} won");
                }
                let mover = self.game.turn();
                if !self.game.select(row, col) {
                    bail!("invalid selection");
                }
                if self.game.turn() != mover {
                    Ok(format!("moved to {row},{col}"))
                } else {
                    Ok(format!("selected {row},{col}: {}", self.format_moves()))
                }
            }

            "moves" => Ok(self.format_moves()),

            "ai" => {
                if let Some(color) = self.game.winner() {
                    bail!("game over, {color} won");
                }
                Ok(self.play_ai())
            }

            "depth" => {
                let Some(arg) = args.first() else {
                    bail!("missing argument");
                };
                let depth: u32 = arg.parse().with_context(|| format!("invalid depth '{arg}'"))?;
                if !(MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
                    bail!("depth must be between {MIN_DEPTH} and {MAX_DEPTH}");
                }
                self.depth = depth;
                Ok(String::new())
            }

            "algorithm" => {
                let Some(arg) = args.first() else {
                    bail!("missing argument");
                };
                self.algorithm = arg.parse()?;
                Ok(String::new())
            }

            "winner" => Ok(self
                .game
                .winner()
                .map_or_else(|| "none".to_string(), |c| c.to_string())),

            "eval" => Ok(self.game.board().evaluate().to_string()),

            _ => bail!("unknown command: {command}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = Engine::parse_id("123 turn");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "turn");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = Engine::parse_id("turn");
        assert_eq!(id, None);
        assert_eq!(cmd, "turn");
    }

    #[test]
    fn test_parse_square() {
        assert_eq!(Engine::parse_square(&["2", "1"]).unwrap(), (2, 1));
        assert!(Engine::parse_square(&["8", "1"]).is_err());
        assert!(Engine::parse_square(&["a", "1"]).is_err());
        assert!(Engine::parse_square(&["2"]).is_err());
    }

    #[test]
    fn test_known_command() {
        let mut engine = Engine::new();
        assert_eq!(engine.execute("known_command", &["select"]).unwrap(), "true");
        assert_eq!(engine.execute("known_command", &["genmove"]).unwrap(), "false");
        assert!(engine.execute("known_command", &[]).is_err());
    }

    #[test]
    fn test_select_and_move() {
        let mut engine = Engine::new();
        let reply = engine.execute("select", &["2", "1"]).unwrap();
        assert_eq!(reply, "selected 2,1: 3,0 3,2");
        let reply = engine.execute("select", &["3", "0"]).unwrap();
        assert_eq!(reply, "moved to 3,0");
        assert_eq!(engine.execute("turn", &[]).unwrap(), "red");
    }

    #[test]
    fn test_select_opponent_fails() {
        let mut engine = Engine::new();
        assert!(engine.execute("select", &["5", "0"]).is_err());
        assert_eq!(engine.execute("turn", &[]).unwrap(), "white");
    }

    #[test]
    fn test_depth_bounds() {
        let mut engine = Engine::new();
        assert!(engine.execute("depth", &["0"]).is_err());
        assert!(engine.execute("depth", &["9"]).is_err());
        assert!(engine.execute("depth", &["2"]).is_ok());
        assert_eq!(engine.depth, 2);
    }

    #[test]
    fn test_ai_and_reset() {
        let mut engine = Engine::new();
        engine.execute("depth", &["1"]).unwrap();
        engine.execute("algorithm", &["minimax"]).unwrap();
        assert!(engine.execute("ai", &[]).unwrap().starts_with("white moved"));
        assert_eq!(engine.game.turn(), Color::Red);
        engine.execute("reset", &[]).unwrap();
        assert_eq!(engine.game.turn(), Color::White);
        assert_eq!(engine.execute("eval", &[]).unwrap(), "0");
    }

    #[test]
    fn test_run_loop_with_auto_reply() {
        let mut engine =
            Engine::with_settings(Rules::default(), 1, Algorithm::AlphaBeta).auto_play(Some(Color::Red));
        let mut out = Vec::new();
        let input = "# comment\n\nselect 2 1\n7 select 3 2\nturn\nbogus\nquit\nturn\n";
        engine.run(input.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("= selected 2,1"));
        assert!(text.contains("=7 moved to 3,2"));
        assert!(text.contains("= red moved"));
        assert!(text.contains("= white"));
        assert!(text.contains("? unknown command: bogus"));
        // Nothing after quit is processed.
        assert_eq!(text.matches("= white").count(), 1);
    }
}
