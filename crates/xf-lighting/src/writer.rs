//! Shader text sinks
//!
//! The generator walks a lighting configuration once per call. Whether
//! that walk produces text is decided by the writer it is handed:
//! [`ShaderCode`] collects the text, [`NullWriter`] drops it without
//! formatting anything, which is how uid-only passes stay cheap.

use std::fmt;
use std::fmt::Write as _;

/// Destination for generated shader text
///
/// `write!(out, ...)` and `writeln!(out, ...)` work on any writer through [`ShaderWriter::write_fmt`].
pub trait ShaderWriter {
    /// Whether written text is kept
    fn emits_code(&self) -> bool;

    fn write_str(&mut self, s: &str);

    fn write_fmt(&mut self, args: fmt::Arguments<'_>);
}

/// Generated shader text
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ShaderCode {
    buffer: String,
}

impl ShaderCode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Generated source, line by line
    pub fn lines(&self) -> std::str::Lines<'_> {
        self.buffer.lines()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl ShaderWriter for ShaderCode {
    fn emits_code(&self) -> bool {
        true
    }

    fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) {
        // Formatting into a String cannot fail
        let _ = self.buffer.write_fmt(args);
    }
}

impl fmt::Display for ShaderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buffer)
    }
}

/// Writer for uid-only passes
#[derive(Debug, Clone, Copy, Default)]
pub struct NullWriter;

impl ShaderWriter for NullWriter {
    fn emits_code(&self) -> bool {
        false
    }

    fn write_str(&mut self, _s: &str) {}

    fn write_fmt(&mut self, _args: fmt::Arguments<'_>) {}
}
