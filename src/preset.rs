use std::fmt::Write as _;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use crate::Coord;
use crate::field::CellOp;
use crate::parse_util;
use crate::rule;
use crate::rule::RuleError;
use crate::rule::RuleSet;

/// A parsed preset file.
///
/// The first line of the file is the preset name, kept verbatim (an empty
/// name is fine). Every later line is either a `#`-directive or a cell
/// activation:
///
/// ```notrust
/// Blinker
/// #R B3/S23
/// #N A period-2 oscillator
/// 0 1
/// 1 1
/// 2 1
/// ```
///
/// Parsing is line-at-a-time and best-effort: a malformed line becomes a
/// [`Warning`] and is skipped, and parsing continues to the end of the
/// file. Only a missing file aborts the whole load.
#[derive(Debug, Default)]
pub struct Preset {
    pub name: String,

    /// Free-text comment from a `#N` line, if any.
    pub comment: Option<String>,

    /// Rule from a `#R` line, if any. Callers fall back to B3/S23.
    pub rule: Option<RuleSet>,

    /// Cell activations, in file order.
    pub ops: Vec<CellOp>,

    /// One entry per malformed line, in file order.
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("Preset file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read preset file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A malformed line, recorded with enough context to point at the file.
#[derive(Debug)]
pub struct Warning {
    /// 1-based line number within the file.
    pub line: usize,

    /// The raw line text, verbatim.
    pub text: String,

    pub error: LineError,
}

#[derive(Debug, Error)]
pub enum LineError {
    #[error("Invalid rule: {0}")]
    InvalidRule(#[from] RuleError),

    #[error("Empty comment")]
    EmptyComment,

    #[error("Unrecognized directive '#{got}'")]
    UnknownDirective { got: char },

    #[error("Directive line has no type")]
    BareHash,

    #[error("Expected two integers, found \"{text}\"")]
    InvalidCell { text: String },
}

impl Preset {
    /// Read and parse a preset file.
    ///
    /// A missing file is a [`PresetError::NotFound`], distinct from the
    /// per-line warnings accumulated on the returned preset.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PresetError> {
        let path = path.as_ref();

        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                PresetError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                PresetError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        Ok(Self::parse(&text))
    }

    /// Parse preset text. Never fails; malformed lines end up in
    /// [`Preset::warnings`].
    pub fn parse(text: &str) -> Self {
        let mut preset = Self::default();
        let mut lines = text.lines();

        // First line is the name, whatever it is
        preset.name = lines.next().unwrap_or_default().to_string();

        for (i, line) in lines.enumerate() {
            // Name line is line 1
            let lineno = i + 2;

            let res = match parse_util::take_1(line.as_bytes()) {
                (Some(b'#'), rest) => preset.parse_directive(rest),
                _ => preset.parse_cell(line),
            };

            if let Err(error) = res {
                warn!(line = lineno, text = line, %error, "Failed to parse");

                preset.warnings.push(Warning {
                    line: lineno,
                    text: line.to_string(),
                    error,
                });
            }
        }

        preset
    }

    /// Dispatch a `#`-directive on the byte after the `#`.
    fn parse_directive(&mut self, bytes: &[u8]) -> Result<(), LineError> {
        let (Some(b), bytes) = parse_util::take_1(bytes) else {
            return Err(LineError::BareHash);
        };

        match b {
            // Rule line: #R B3/S23
            b'R' => {
                let bytes = parse_util::take_ws(bytes);
                let (rule, _) = rule::parse_rule(bytes)?;

                self.rule = Some(rule);

                Ok(())
            }

            // Comment line: #N some text
            b'N' => {
                let bytes = parse_util::take_ws(bytes);
                if bytes.is_empty() {
                    return Err(LineError::EmptyComment);
                }

                self.comment = Some(String::from_utf8_lossy(bytes).into_owned());

                Ok(())
            }

            b => Err(LineError::UnknownDirective { got: b as char }),
        }
    }

    /// A cell activation line: two whitespace-separated integers `x y`.
    /// Anything after the second integer is ignored.
    fn parse_cell(&mut self, line: &str) -> Result<(), LineError> {
        let invalid = || LineError::InvalidCell {
            text: line.to_string(),
        };

        let bytes = parse_util::take_ws(line.as_bytes());

        let (Some(x), bytes) = parse_util::take_until_ws(bytes) else {
            return Err(invalid());
        };

        let bytes = parse_util::take_ws(bytes);

        let (Some(y), _) = parse_util::take_until_ws(bytes) else {
            return Err(invalid());
        };

        let x: Coord = parse_util::convert(x).map_err(|_| invalid())?;
        let y: Coord = parse_util::convert(y).map_err(|_| invalid())?;

        self.ops.push(CellOp { x, y, alive: true });

        Ok(())
    }
}

/// Render a live session in the preset text format, the inverse of
/// [`Preset::parse`]. The output reloads through the ordinary file path.
pub fn write_state<I>(name: &str, rule: RuleSet, live_cells: I) -> String
where
    I: IntoIterator<Item = (usize, usize)>,
{
    let mut out = String::new();

    let _ = writeln!(out, "{name}");
    let _ = writeln!(out, "#R {rule}");

    for (x, y) in live_cells {
        let _ = writeln!(out, "{x} {y}");
    }

    out
}
