//! Line-based function length heuristic for Python sources.
//!
//! A function opens at a line whose stripped text starts with `def ` (or
//! `async def `) and closes at the next `def`, the next top-level statement,
//! or the end of the file. The span is counted from the `def` line up to, but
//! not including, the closing line. This is textual, not an AST walk: nested
//! functions and column-zero continuation lines are not special-cased.

/// A function whose span exceeded the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongFunction {
    pub name: String,
    /// 1-based line of the `def`.
    pub start_line: usize,
    pub length: usize,
}

struct OpenFunction<'a> {
    name: &'a str,
    start: usize,
}

/// Functions longer than `threshold` lines (strictly greater).
pub fn long_functions(source: &str, threshold: usize) -> Vec<LongFunction> {
    let mut found = Vec::new();
    let mut open: Option<OpenFunction> = None;
    let mut total = 0;

    for (i, line) in source.lines().enumerate() {
        total = i + 1;
        let stripped = line.trim();

        if let Some(name) = function_name(stripped) {
            close(open.take(), i, threshold, &mut found);
            open = Some(OpenFunction { name, start: i });
        } else if is_top_level_statement(line, stripped) {
            close(open.take(), i, threshold, &mut found);
        }
    }
    close(open.take(), total, threshold, &mut found);

    found
}

fn close(open: Option<OpenFunction>, end: usize, threshold: usize, found: &mut Vec<LongFunction>) {
    if let Some(f) = open {
        let length = end - f.start;
        if length > threshold {
            found.push(LongFunction {
                name: f.name.to_string(),
                start_line: f.start + 1,
                length,
            });
        }
    }
}

fn function_name(stripped: &str) -> Option<&str> {
    let rest = stripped
        .strip_prefix("def ")
        .or_else(|| stripped.strip_prefix("async def "))?;
    let name = rest.split('(').next().unwrap_or(rest).trim();
    Some(name.trim_end_matches(':'))
}

fn is_top_level_statement(line: &str, stripped: &str) -> bool {
    !stripped.is_empty()
        && !stripped.starts_with('#')
        && !line.starts_with(' ')
        && !line.starts_with('\t')
}
