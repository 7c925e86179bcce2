//! Quote- and depth-aware field splitters
//!
//! These scanners are what lets the rest of the engine get away without a
//! grammar: a comma inside `"Smith, John"` is not a delimiter, and an `AND`
//! inside a parenthesized group is not a term boundary.

/// Split `text` on `delimiter`, treating quoted spans as atomic.
///
/// A `"` or `'` opens a quoted span; the other quote character is literal
/// inside it. Segments are trimmed as they are collected; intermediate
/// empty segments are kept, a trailing empty segment is dropped. An
/// unterminated quote is tolerated: the scan simply ends with whatever was
/// accumulated. Quote characters stay in the output, callers strip them.
pub fn split_quoted(text: &str, delimiter: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quote_char = '"';

    for ch in text.chars() {
        if ch == '"' || ch == '\'' {
            if !in_quotes {
                in_quotes = true;
                quote_char = ch;
            } else if ch == quote_char {
                in_quotes = false;
            }
            current.push(ch);
        } else if ch == delimiter && !in_quotes {
            parts.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        parts.push(tail.to_string());
    }
    parts
}

/// Split a boolean expression into top-level terms on `operator`
/// (the literal word `AND` or `OR`, matched case-insensitively).
///
/// The operator only splits when it sits at parenthesis depth 0, outside
/// quotes, with whitespace on both sides. Backslash-escaped quotes do not
/// toggle the quote state. Unbalanced parentheses are tolerated: depth may
/// go negative without error. An expression with no operator occurrence
/// yields a single-element result holding the trimmed expression.
pub fn split_logical(expr: &str, operator: &str) -> Vec<String> {
    let chars: Vec<char> = expr.chars().collect();
    let op: Vec<char> = operator.chars().collect();

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quote_char = '"';
    let mut depth: i32 = 0;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch == '\\' {
            // escaped character: push both and skip operator/quote handling
            current.push(ch);
            if let Some(&next) = chars.get(i + 1) {
                current.push(next);
                i += 1;
            }
            i += 1;
            continue;
        }

        if ch == '"' || ch == '\'' {
            if !in_quotes {
                in_quotes = true;
                quote_char = ch;
            } else if ch == quote_char {
                in_quotes = false;
            }
            current.push(ch);
            i += 1;
            continue;
        }

        if !in_quotes {
            if ch == '(' {
                depth += 1;
            } else if ch == ')' {
                depth -= 1;
            } else if depth == 0 && operator_at(&chars, i, &op) {
                parts.push(current.trim().to_string());
                current.clear();
                i += op.len();
                while i < chars.len() && chars[i].is_whitespace() {
                    i += 1;
                }
                continue;
            }
        }

        current.push(ch);
        i += 1;
    }

    let tail = current.trim();
    if !tail.is_empty() || parts.is_empty() {
        parts.push(tail.to_string());
    }
    parts
}

/// Whole-word, case-insensitive operator match at position `i`:
/// whitespace is required on both sides.
fn operator_at(chars: &[char], i: usize, op: &[char]) -> bool {
    if i == 0 || !chars[i - 1].is_whitespace() {
        return false;
    }
    if i + op.len() >= chars.len() {
        return false;
    }
    if !chars[i + op.len()].is_whitespace() {
        return false;
    }
    chars[i..i + op.len()]
        .iter()
        .zip(op)
        .all(|(a, b)| a.eq_ignore_ascii_case(b))
}

/// Remove one layer of surrounding quotes, if present.
pub fn strip_quotes(text: &str) -> &str {
    let t = text.trim();
    if t.len() >= 2 {
        if let Some(first @ ('"' | '\'')) = t.chars().next() {
            if t.ends_with(first) {
                return &t[1..t.len() - 1];
            }
        }
    }
    t
}
