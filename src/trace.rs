//! Reading branch traces.
//!
//! A text trace has one conditional branch per line: a program counter value
//! (hexadecimal with a `0x` prefix, or decimal) followed by an outcome
//! (`T`/`N` or `1`/`0`). Blank lines and lines starting with `#` are ignored.
//!
//! ```text
//! # pc       outcome
//! 0x4005d0   T
//! 0x4005e8   N
//! ```

use std::path::Path;

use itertools::Itertools;
use tracing::info;

use crate::branch::*;
use crate::error::*;

/// A sequence of branch records read from a text trace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextTrace {
    pub name: String,
    pub data: Vec<BranchRecord>,
}
impl TextTrace {
    pub fn parse(name: impl ToString, s: &str) -> Result<Self> {
        let data = s.lines().enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
            .map(|(lineno, line)| parse_line(lineno, line))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { name: name.to_string(), data })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)?;
        let name = path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let trace = Self::parse(name, &s)?;
        info!(trace = %trace.name, records = trace.len(), "read trace");
        Ok(trace)
    }

    pub fn len(&self) -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    pub fn as_slice(&self) -> &[BranchRecord] { &self.data }
}

fn parse_line(line: usize, s: &str) -> Result<BranchRecord> {
    let err = |reason: String| Error::Trace { line, reason };
    let (pc, outcome) = s.split_whitespace().next_tuple()
        .ok_or_else(|| err(format!("expected '<pc> <outcome>', found '{}'", s)))?;
    if s.split_whitespace().count() != 2 {
        return Err(err(format!("trailing input in '{}'", s)));
    }

    let pc = match pc.strip_prefix("0x").or_else(|| pc.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => pc.parse(),
    }.map_err(|e| err(format!("bad program counter '{}': {}", pc, e)))?;

    let outcome = match outcome {
        "T" | "t" | "1" => Outcome::T,
        "N" | "n" | "0" => Outcome::N,
        _ => return Err(err(format!("bad outcome '{}'", outcome))),
    };
    Ok(BranchRecord::new(pc, outcome))
}
