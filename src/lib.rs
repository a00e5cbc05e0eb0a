//! tuxsh: the command-list execution engine of a small Unix shell.
//!
//! This crate takes an already-parsed line — an ordered list of
//! [`CommandNode`](line::CommandNode)s — and runs it as OS processes: one
//! fork per command, pipes between stages, file redirections, `;` / `&&` /
//! `||` / `|` / `&` control flow, builtins that must also affect the shell
//! itself, and subshells. The line's result is the status of its last
//! waited command.
//!
//! # Architecture
//!
//! - **[`line`]** — Data model: command nodes, control operators, redirections.
//! - **[`exec`]** — Line runner, process launcher, redirection applier, zombie reaper.
//! - **[`builtins`]** — `cd`, `exit`, `pwd`, `help`, each with a child and a parent context.
//! - **[`config`]** — Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]** — `simplelog` setup for the binary.

/// Builtin commands and their dual execution contexts.
pub mod builtins;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Process launching, control flow and reaping.
pub mod exec;
/// Logger installation.
pub mod logging;
/// Command nodes as produced by the parser.
pub mod line;

use exec::LineRunner;
use line::CommandNode;

/// Run one line with the default configuration and return its status.
///
/// This is the main entry point for tests and simple usage. A shell that
/// runs many lines should keep one [`LineRunner`] so background jobs are
/// reaped across lines.
pub fn run_line(line: &[CommandNode]) -> i32 {
    LineRunner::new().run(line)
}
