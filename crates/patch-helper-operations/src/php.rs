//! Line-level analysis of hunks: which PHP functions and which schema tables
//! a change touches.

use std::sync::OnceLock;

use indexmap::IndexSet;
use patch_helper_core::{Hunk, PatchEntry};
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FunctionDeclaration {
    name: String,
    interceptable: bool,
}

fn function_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*((?:(?:abstract|final|public|protected|private|static)\s+)*)function\s+&?\s*([A-Za-z_][A-Za-z0-9_]*)\s*\(",
        )
        .expect("function regex must compile")
    })
}

fn table_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<table\s[^>]*?\bname\s*=\s*"([^"]+)""#).expect("table regex must compile")
    })
}

fn parse_function(text: &str) -> Option<FunctionDeclaration> {
    let captures = function_re().captures(text)?;
    let modifiers: Vec<&str> = captures
        .get(1)
        .map(|m| m.as_str().split_whitespace().collect())
        .unwrap_or_default();
    let name = captures.get(2)?.as_str().to_string();
    let interceptable = !modifiers
        .iter()
        .any(|modifier| matches!(*modifier, "private" | "protected" | "static"))
        && !name.eq_ignore_ascii_case("__construct");
    Some(FunctionDeclaration {
        name,
        interceptable,
    })
}

fn parse_table(text: &str) -> Option<String> {
    table_open_re()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

fn is_change(line: &str) -> bool {
    line.starts_with('+') || line.starts_with('-')
}

fn content(line: &str) -> &str {
    line.get(1..).unwrap_or_default()
}

/// Walks a hunk, tracking the innermost declaration seen so far, and records
/// the declaration for every added or removed line.
fn collect_affected<T, F, C>(hunk: &Hunk, parse: F, closes: C, affected: &mut IndexSet<T>)
where
    T: Clone + Eq + std::hash::Hash,
    F: Fn(&str) -> Option<T>,
    C: Fn(&str) -> bool,
{
    let mut current = hunk.heading().and_then(&parse);
    for line in &hunk.lines {
        let text = content(line);
        if let Some(declaration) = parse(text) {
            current = Some(declaration);
        }
        if is_change(line) {
            if let Some(declaration) = &current {
                affected.insert(declaration.clone());
            }
        }
        if closes(text) {
            current = None;
        }
    }
}

/// Names of public, non-static, non-constructor functions whose bodies the
/// entry changes. Only these can be wrapped by plugins.
#[must_use]
pub fn affected_interceptable_functions(entry: &PatchEntry) -> Vec<String> {
    let mut affected = IndexSet::new();
    for hunk in entry.hunks() {
        collect_affected(hunk, parse_function, |_| false, &mut affected);
    }
    affected
        .into_iter()
        .filter(|function| function.interceptable)
        .map(|function| function.name)
        .collect()
}

/// Names of the `<table>` elements whose declarations the entry changes.
#[must_use]
pub fn affected_tables(entry: &PatchEntry) -> Vec<String> {
    let mut affected = IndexSet::new();
    for hunk in entry.hunks() {
        collect_affected(
            hunk,
            parse_table,
            |text| {
                text.contains("</table>")
                    || (text.contains("<table") && text.trim_end().ends_with("/>"))
            },
            &mut affected,
        );
    }
    affected.into_iter().collect()
}
