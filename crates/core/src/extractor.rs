//! Line-oriented extraction of exported declarations
//!
//! The extractor walks a file one line at a time and recognizes three kinds of
//! blocks without parsing the language:
//!
//! - `/** ... */` doc comments, kept verbatim for the next declaration
//! - `export type ...` blocks, closed by the first empty line
//! - `export function ...` headers, closed by the first line ending in `{`
//!
//! Declarations must start at column zero. A doc comment attaches to whatever
//! declaration closes next, however far away it is, and a doc comment that is
//! never closed absorbs the rest of the file.

use crate::models::{ExportedUnit, LineSpan, UnitKind};

pub const DOC_OPENER: &str = "/**";
pub const DOC_CLOSER: &str = "*/";
pub const TYPE_KEYWORD: &str = "export type";
pub const FUNCTION_KEYWORD: &str = "export function";
const FUNCTION_BODY_OPENER: char = '{';

/// Scanner state. Signature lines live inside the block being accumulated.
#[derive(Debug)]
enum ScanState {
    Idle,
    InDoc,
    InType { start: usize, lines: Vec<String> },
    InFunction { start: usize, lines: Vec<String> },
}

/// Incremental extractor fed one line at a time
#[derive(Debug)]
pub struct Extractor {
    state: ScanState,
    pending_doc: Vec<String>,
    units: Vec<ExportedUnit>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            state: ScanState::Idle,
            pending_doc: Vec::new(),
            units: Vec::new(),
        }
    }

    /// Advance the scanner by one line. `line_number` is zero-based.
    pub fn feed(&mut self, line_number: usize, line: &str) {
        let state = std::mem::replace(&mut self.state, ScanState::Idle);

        self.state = match state {
            ScanState::Idle => self.start_block(line_number, line),
            ScanState::InDoc => {
                self.pending_doc.push(line.to_string());
                if line.ends_with(DOC_CLOSER) {
                    ScanState::Idle
                } else {
                    ScanState::InDoc
                }
            }
            ScanState::InType { start, mut lines } => {
                lines.push(line.to_string());
                if line.is_empty() {
                    self.emit(UnitKind::Type, start, line_number, lines);
                    ScanState::Idle
                } else {
                    ScanState::InType { start, lines }
                }
            }
            ScanState::InFunction { start, mut lines } => {
                lines.push(line.to_string());
                self.close_function_header(start, line_number, line, lines)
            }
        };
    }

    /// Units closed so far, in file order. Unterminated blocks are dropped.
    pub fn finish(self) -> Vec<ExportedUnit> {
        self.units
    }

    fn start_block(&mut self, line_number: usize, line: &str) -> ScanState {
        if line.starts_with(DOC_OPENER) {
            // The closer is only looked for on the lines after the opener
            self.pending_doc.push(line.to_string());
            ScanState::InDoc
        } else if line.starts_with(TYPE_KEYWORD) {
            ScanState::InType {
                start: line_number,
                lines: vec![line.to_string()],
            }
        } else if line.starts_with(FUNCTION_KEYWORD) {
            self.close_function_header(line_number, line_number, line, vec![line.to_string()])
        } else {
            ScanState::Idle
        }
    }

    fn close_function_header(
        &mut self,
        start: usize,
        line_number: usize,
        line: &str,
        lines: Vec<String>,
    ) -> ScanState {
        if line.ends_with(FUNCTION_BODY_OPENER) {
            self.emit(UnitKind::Function, start, line_number, lines);
            ScanState::Idle
        } else {
            ScanState::InFunction { start, lines }
        }
    }

    fn emit(&mut self, kind: UnitKind, start: usize, end: usize, lines: Vec<String>) {
        let doc_lines = std::mem::take(&mut self.pending_doc);
        self.units
            .push(ExportedUnit::new(kind, lines, doc_lines, LineSpan { start, end }));
    }
}

/// Extract every exported type and function from `text`.
///
/// Lines are split on `\n` only, so a carriage return stays part of its line.
pub fn extract(text: &str) -> Vec<ExportedUnit> {
    let mut extractor = Extractor::new();
    for (line_number, line) in text.split('\n').enumerate() {
        extractor.feed(line_number, line);
    }
    extractor.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(unit: &ExportedUnit) -> Vec<&str> {
        unit.signature_lines().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_plain_code_yields_nothing() {
        let text = "import { x } from './x';\n\nconst y = 1;\nfunction local() {\n}\n";
        assert!(extract(text).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_single_line_function() {
        let units = extract("export function add(a: number, b: number): number {\n    return a + b;\n}\n");

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].kind(), UnitKind::Function);
        assert_eq!(lines(&units[0]), vec!["export function add(a: number, b: number): number {"]);
        assert_eq!(units[0].span(), LineSpan { start: 0, end: 0 });
        assert!(units[0].doc_lines().is_empty());
    }

    #[test]
    fn test_multi_line_function_header() {
        let text = "\
export function connect(
    host: string,
    port: number
): Connection {
    return open(host, port);
}
";
        let units = extract(text);

        assert_eq!(units.len(), 1);
        assert_eq!(
            lines(&units[0]),
            vec![
                "export function connect(",
                "    host: string,",
                "    port: number",
                "): Connection {",
            ]
        );
        assert_eq!(units[0].span(), LineSpan { start: 0, end: 3 });
    }

    #[test]
    fn test_type_block_ends_at_first_blank_line() {
        let text = "\
export type Point = {
    x: number;
    y: number;
};

const origin = { x: 0, y: 0 };
";
        let units = extract(text);

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].kind(), UnitKind::Type);
        assert_eq!(
            lines(&units[0]),
            vec!["export type Point = {", "    x: number;", "    y: number;", "};", ""]
        );
        assert_eq!(units[0].span(), LineSpan { start: 0, end: 4 });
    }

    #[test]
    fn test_type_ignores_braces() {
        let units = extract("export type Handler = () => {\n}\n\n");

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].kind(), UnitKind::Type);
        assert_eq!(units[0].span(), LineSpan { start: 0, end: 2 });
    }

    #[test]
    fn test_trailing_newline_closes_type() {
        let units = extract("export type Id = string;\n");

        assert_eq!(units.len(), 1);
        assert_eq!(lines(&units[0]), vec!["export type Id = string;", ""]);
        assert_eq!(units[0].span(), LineSpan { start: 0, end: 1 });
    }

    #[test]
    fn test_unterminated_blocks_are_dropped() {
        assert!(extract("export type Id = string;").is_empty());
        assert!(extract("export function open(\n    path: string").is_empty());
    }

    #[test]
    fn test_doc_attaches_to_next_declaration() {
        let text = "\
/**
 * Adds two numbers.
 */
export function add(a: number, b: number): number {
    return a + b;
}
";
        let units = extract(text);

        assert_eq!(units.len(), 1);
        assert_eq!(
            units[0].doc_lines(),
            &["/**", " * Adds two numbers.", " */"].map(String::from)
        );
        assert_eq!(units[0].span(), LineSpan { start: 3, end: 3 });
    }

    #[test]
    fn test_doc_consumed_once() {
        let text = "\
/** first */
 */
export type A = string;

export type B = number;

";
        let units = extract(text);

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].doc_lines().len(), 2);
        assert!(units[1].doc_lines().is_empty());
    }

    #[test]
    fn test_one_line_doc_stays_open_until_closer() {
        // The opener line is never checked for the closer, so the
        // declaration below is swallowed as doc text.
        let text = "/** Short doc. */\nexport function f() {\n}\n";
        assert!(extract(text).is_empty());
    }

    #[test]
    fn test_unclosed_doc_absorbs_rest_of_file() {
        let text = "/**\n * never closed\nexport function f() {\n}\n";
        assert!(extract(text).is_empty());
    }

    #[test]
    fn test_doc_attaches_across_unrelated_code() {
        let text = "\
/**
 * Orphaned comment.
 */
const x = 1;

export function later() {
}
";
        let units = extract(text);

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].doc_lines().len(), 3);
        assert_eq!(units[0].span(), LineSpan { start: 5, end: 5 });
    }

    #[test]
    fn test_consecutive_doc_blocks_accumulate() {
        let text = "/**\n * one\n */\n/**\n * two\n */\nexport function f() {\n";
        let units = extract(text);

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].doc_lines().len(), 6);
    }

    #[test]
    fn test_indented_declarations_are_ignored() {
        let text = "namespace N {\n    export function inner() {\n    }\n}\n";
        assert!(extract(text).is_empty());
    }

    #[test]
    fn test_carriage_returns_stay_on_lines() {
        // `{\r` does not end in `{`, so the header never closes
        let units = extract("export function f() {\r\n}\r\n");
        assert!(units.is_empty());
    }

    #[test]
    fn test_units_in_file_order() {
        let text = "\
/**
 * A type.
 */
export type A = {
    a: string;
};

export function b(): void {
}

/**
 * Generic.
 */
export function c<T>(
    value: T
): T {
    return value;
}

export type D = number;

";
        let units = extract(text);

        let kinds: Vec<UnitKind> = units.iter().map(|u| u.kind()).collect();
        assert_eq!(
            kinds,
            vec![UnitKind::Type, UnitKind::Function, UnitKind::Function, UnitKind::Type]
        );

        let spans: Vec<LineSpan> = units.iter().map(|u| u.span()).collect();
        assert_eq!(
            spans,
            vec![
                LineSpan { start: 3, end: 6 },
                LineSpan { start: 7, end: 7 },
                LineSpan { start: 13, end: 15 },
                LineSpan { start: 19, end: 20 },
            ]
        );
        for unit in &units {
            assert!(unit.span().start <= unit.span().end);
        }
        assert!(spans.windows(2).all(|w| w[0].start <= w[1].start));
        assert_eq!(units[2].doc_lines().len(), 3);
        assert!(units[3].doc_lines().is_empty());
    }

    #[test]
    fn test_arbitrary_bytes_do_not_panic() {
        let text = "/**\u{0}\n*/\nexport type \u{feff}= {\n\n}{{{\nexport function\n{";
        let units = extract(text);
        assert_eq!(units.len(), 2);
    }
}
