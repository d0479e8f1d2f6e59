//! DIMACS CNF and Group CNF parsing, with transparent gzip support
//! (`flate2`, as used by the sibling `satgalaxy-rs` example for the same
//! purpose).

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::InputError;
use crate::input::Instance;

pub(super) fn read_text(path: &Path) -> Result<String, InputError> {
    let path_str = path.to_string_lossy().into_owned();
    let file = File::open(path).map_err(|e| InputError::Unreadable {
        path: path_str.clone(),
        source: e,
    })?;

    let mut buf = String::new();
    if path_str.ends_with(".gz") {
        GzDecoder::new(file)
            .read_to_string(&mut buf)
            .map_err(|e| InputError::Unreadable {
                path: path_str.clone(),
                source: e,
            })?;
    } else {
        let mut file = file;
        file.read_to_string(&mut buf)
            .map_err(|e| InputError::Unreadable {
                path: path_str.clone(),
                source: e,
            })?;
    }
    Ok(buf)
}

fn parse_clause_line(line: &str, line_no: usize) -> Result<Vec<i64>, InputError> {
    let mut lits = Vec::new();
    for token in line.split_whitespace() {
        let v: i64 = token.parse().map_err(|_| InputError::Malformed {
            line: line_no,
            reason: format!("expected an integer literal, found '{token}'"),
        })?;
        if v == 0 {
            break;
        }
        lits.push(v);
    }
    Ok(lits)
}

/// Plain DIMACS CNF: one clause per line is one constraint.
pub(super) fn parse_cnf(text: &str) -> Result<Instance, InputError> {
    let mut constraints = Vec::new();
    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('c') || line.starts_with('p') {
            continue;
        }
        let clause = parse_clause_line(line, idx + 1)?;
        if clause.is_empty() {
            continue;
        }
        constraints.push(vec![clause]);
    }
    Ok(Instance {
        constraints,
        hard_clauses: Vec::new(),
    })
}

/// Group CNF: each clause is prefixed with `{g}`. Clauses sharing a
/// non-zero group collapse into a single multi-clause constraint; group 0
/// clauses are permanent hard background constraints.
pub(super) fn parse_gcnf(text: &str) -> Result<Instance, InputError> {
    let mut groups: BTreeMap<i64, Vec<Vec<i64>>> = BTreeMap::new();
    let mut hard_clauses = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('c') || line.starts_with('p') {
            continue;
        }
        let line_no = idx + 1;
        let rest = line.strip_prefix('{').ok_or_else(|| InputError::Malformed {
            line: line_no,
            reason: "expected a '{group}' prefix on a gcnf clause".to_string(),
        })?;
        let (group_str, clause_str) = rest.split_once('}').ok_or_else(|| InputError::Malformed {
            line: line_no,
            reason: "unterminated '{group}' prefix".to_string(),
        })?;
        let group: i64 = group_str.trim().parse().map_err(|_| InputError::Malformed {
            line: line_no,
            reason: format!("expected an integer group id, found '{group_str}'"),
        })?;
        let clause = parse_clause_line(clause_str.trim(), line_no)?;
        if clause.is_empty() {
            continue;
        }
        if group == 0 {
            hard_clauses.push(clause);
        } else {
            groups.entry(group).or_default().push(clause);
        }
    }

    // groups.values() iterates in ascending key order (BTreeMap), giving a
    // deterministic constraint numbering independent of group id spacing.
    let constraints = groups.into_values().collect();
    Ok(Instance {
        constraints,
        hard_clauses,
    })
}
