//! Display titles for exported units
//!
//! Titles come from the first signature line only. A line that does not look
//! like the expected declaration gives an empty title rather than an error.

use crate::models::{ExportedUnit, UnitKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// `export type Name = ...`, capturing everything before the first `=`
static TYPE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"export type ([^=]+)=").expect("Invalid type title regex"));

/// `export function rest...`
static FUNCTION_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"export function (.+)").expect("Invalid function title regex"));

/// Short display name for a unit: `type Name` for types, the bare name for functions
pub fn title(unit: &ExportedUnit) -> String {
    match unit.kind() {
        UnitKind::Type => type_title(unit.first_line()),
        UnitKind::Function => function_title(unit.first_line()),
    }
}

fn type_title(line: &str) -> String {
    TYPE_TITLE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|name| format!("type {}", name.as_str().trim()))
        .unwrap_or_default()
}

fn function_title(line: &str) -> String {
    let Some(rest) = FUNCTION_TITLE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        return String::new();
    };

    // Generic parameters win over the parameter list
    let name = match rest.find('<') {
        Some(idx) => &rest[..idx],
        None => rest.split('(').next().unwrap_or(rest),
    };

    name.trim().to_string()
}
