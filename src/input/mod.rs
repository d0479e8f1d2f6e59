//! Input handling: format autodetection and the parsed `Instance`
//! representation consumed by the concrete CNF-backed oracles.

pub mod dimacs;

use std::path::Path;

use crate::error::InputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOverride {
    Cnf,
    Smt,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetectedFormat {
    Cnf,
    GroupCnf,
    Smt2,
}

/// A parsed constraint set: `n` indexed constraints, each a conjunction of
/// one or more DIMACS clauses, plus permanent hard (group-0) background
/// clauses that are never part of any enumerated subset.
#[derive(Debug, Clone)]
pub struct Instance {
    pub constraints: Vec<Vec<Vec<i64>>>,
    pub hard_clauses: Vec<Vec<i64>>,
}

impl Instance {
    pub fn n(&self) -> usize {
        self.constraints.len()
    }
}

fn strip_gz(name: &str) -> &str {
    name.strip_suffix(".gz").unwrap_or(name)
}

fn detect_format(path: &str, format: FormatOverride) -> Result<DetectedFormat, InputError> {
    match format {
        FormatOverride::Cnf => {
            if strip_gz(path).ends_with(".gcnf") {
                Ok(DetectedFormat::GroupCnf)
            } else {
                Ok(DetectedFormat::Cnf)
            }
        }
        FormatOverride::Smt => Ok(DetectedFormat::Smt2),
        FormatOverride::Auto => {
            let bare = strip_gz(path);
            if bare.ends_with(".gcnf") {
                Ok(DetectedFormat::GroupCnf)
            } else if bare.ends_with(".cnf") {
                Ok(DetectedFormat::Cnf)
            } else if bare.ends_with(".smt2") {
                Ok(DetectedFormat::Smt2)
            } else {
                Err(InputError::UnrecognisedFormat {
                    path: path.to_string(),
                })
            }
        }
    }
}

/// Reads and parses an instance from `path` (or stdin when `path` is
/// `None`), autodetecting the format from the extension unless overridden.
pub fn read_instance(path: Option<&Path>, format: FormatOverride) -> Result<Instance, InputError> {
    let path_str = path
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<stdin>".to_string());

    if path.is_none() && format == FormatOverride::Smt {
        return Err(InputError::Malformed {
            line: 0,
            reason: "SMT cannot be read from stdin; specify a filename".to_string(),
        });
    }

    let detected = detect_format(&path_str, format)?;

    let text = match path {
        Some(p) => dimacs::read_text(p)?,
        None => {
            use std::io::Read;
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| InputError::Unreadable {
                    path: path_str.clone(),
                    source: e,
                })?;
            buf
        }
    };

    let instance = match detected {
        DetectedFormat::Cnf => dimacs::parse_cnf(&text)?,
        DetectedFormat::GroupCnf => dimacs::parse_gcnf(&text)?,
        DetectedFormat::Smt2 => return Err(InputError::UnsupportedFormat),
    };

    if instance.n() == 0 && instance.hard_clauses.is_empty() {
        return Err(InputError::EmptyConstraintSet);
    }

    Ok(instance)
}
