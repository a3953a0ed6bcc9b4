//! Shell script composition.
//!
//! A [`ShellScript`] is an ordered list of commands. It can be projected to
//! a multi-line script for humans or to a single line for config
//! directives that must fit on one line (such as WireGuard's `PostUp`).
//! Both projections come from the same list, so they can never disagree
//! on ordering.

use std::fmt;

/// Separator used by [`ShellScript::to_one_line`]
pub const ONE_LINE_SEPARATOR: &str = "; ";

/// An ordered sequence of shell commands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellScript {
    commands: Vec<String>,
}

impl ShellScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command
    pub fn push(&mut self, command: impl Into<String>) -> &mut Self {
        self.commands.push(command.into());
        self
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// One command per line, with a trailing newline
    pub fn to_multi_line(&self) -> String {
        let mut script = String::new();
        for command in &self.commands {
            script.push_str(command);
            script.push('\n');
        }
        script
    }

    /// All commands joined with [`ONE_LINE_SEPARATOR`]
    pub fn to_one_line(&self) -> String {
        self.commands.join(ONE_LINE_SEPARATOR)
    }
}

impl fmt::Display for ShellScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_multi_line())
    }
}
