//! Shell-command script recording for dry runs.

use std::path::Path;

use crate::error::MediaResult;

/// An ordered list of shell command lines, written out as an executable
/// script at the end of a recorded run.
#[derive(Debug, Default)]
pub struct CommandScript {
    lines: Vec<String>,
}

impl CommandScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one invocation. The program name is left bare; every
    /// argument is single-quoted for POSIX shells.
    pub fn push(&mut self, program: &str, args: &[String]) {
        let mut line = String::from(program);
        for arg in args {
            line.push(' ');
            line.push_str(&quote(arg));
        }
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// One command per line, trailing newline included.
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> MediaResult<()> {
        std::fs::write(path, self.render())?;
        Ok(())
    }
}

/// Single-quote `arg`, escaping embedded quotes with the `'\''` idiom.
fn quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}
