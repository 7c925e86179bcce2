//! Statement parser - extracts clauses from SQL text
//!
//! There is no grammar here: each statement kind has a fixed clause order,
//! and parsing means locating the clause keywords (case-insensitively,
//! outside quoted spans) and slicing the substrings between them. Filter
//! substrings are passed through untouched; only the evaluator interprets
//! them.

use super::ast::*;
use super::split::{split_quoted, strip_quotes};
use crate::error::{QueryError, Result};

/// Parse a single SQL statement.
///
/// The leading command word picks the statement kind; anything else is an
/// `UnsupportedStatement` error. A statement that matches its command but
/// not its clause shape is a `MalformedStatement` error carrying the text.
pub fn parse(sql: &str) -> Result<Statement> {
    let text = sql.trim().trim_end_matches(';').trim_end();
    let command = leading_word(text);
    let rest = &text[command.len()..];

    if command.eq_ignore_ascii_case("SELECT") {
        parse_select(text, rest)
    } else if command.eq_ignore_ascii_case("INSERT") {
        parse_insert(text, rest)
    } else if command.eq_ignore_ascii_case("UPDATE") {
        parse_update(text, rest)
    } else if command.eq_ignore_ascii_case("DELETE") {
        parse_delete(text, rest)
    } else {
        Err(QueryError::UnsupportedStatement(command.to_string()))
    }
}

fn parse_select(text: &str, rest: &str) -> Result<Statement> {
    let malformed = || QueryError::MalformedStatement(text.to_string());

    let (from_start, from_end) = find_keyword(rest, "FROM").ok_or_else(malformed)?;
    let columns_text = rest[..from_start].trim();
    if columns_text.is_empty() {
        return Err(malformed());
    }
    let columns = if columns_text == "*" {
        ColumnSpec::Star
    } else {
        // column names are unquoted identifiers; a plain split is enough
        ColumnSpec::Columns(
            columns_text
                .split(',')
                .map(|column| column.trim().to_string())
                .collect(),
        )
    };

    let tail = &rest[from_end..];
    let where_kw = find_keyword(tail, "WHERE");
    let order_kw = find_keyword(tail, "ORDER BY");
    let limit_kw = find_keyword(tail, "LIMIT");

    // clauses must appear in grammatical order
    let mut previous = 0;
    for start in [where_kw, order_kw, limit_kw].iter().flatten().map(|k| k.0) {
        if start < previous {
            return Err(malformed());
        }
        previous = start;
    }

    let end = tail.len();
    let first_clause = [where_kw, order_kw, limit_kw]
        .iter()
        .flatten()
        .map(|k| k.0)
        .min()
        .unwrap_or(end);
    let table = parse_table_token(&tail[..first_clause]).ok_or_else(malformed)?;

    let where_clause = match where_kw {
        Some((_, clause_start)) => {
            let stop = order_kw.or(limit_kw).map(|k| k.0).unwrap_or(end);
            if stop < clause_start {
                return Err(malformed());
            }
            let expr = tail[clause_start..stop].trim();
            if expr.is_empty() {
                return Err(malformed());
            }
            Some(expr.to_string())
        }
        None => None,
    };

    let order_by = match order_kw {
        Some((_, clause_start)) => {
            let stop = limit_kw.map(|k| k.0).unwrap_or(end);
            if stop < clause_start {
                return Err(malformed());
            }
            let mut words = tail[clause_start..stop].split_whitespace();
            let field = words.next().ok_or_else(malformed)?.to_string();
            let direction = match words.next() {
                None => SortDirection::Asc,
                Some(word) if word.eq_ignore_ascii_case("ASC") => SortDirection::Asc,
                Some(word) if word.eq_ignore_ascii_case("DESC") => SortDirection::Desc,
                Some(_) => return Err(malformed()),
            };
            if words.next().is_some() {
                return Err(malformed());
            }
            Some(OrderBy { field, direction })
        }
        None => None,
    };

    let limit = match limit_kw {
        Some((_, clause_start)) => {
            let token = tail[clause_start..].trim();
            Some(token.parse::<usize>().map_err(|_| malformed())?)
        }
        None => None,
    };

    Ok(Statement::Select(SelectStmt {
        columns,
        table,
        where_clause,
        order_by,
        limit,
    }))
}

fn parse_insert(text: &str, rest: &str) -> Result<Statement> {
    let malformed = || QueryError::MalformedStatement(text.to_string());

    let rest = rest.trim_start();
    let into = leading_word(rest);
    if !into.eq_ignore_ascii_case("INTO") {
        return Err(malformed());
    }
    let rest = rest[into.len()..].trim_start();

    // table name runs up to whitespace or the column list's opening paren
    let table_end = rest
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(rest.len());
    let table = &rest[..table_end];
    if table.is_empty() {
        return Err(malformed());
    }

    let rest = rest[table_end..].trim_start();
    if !rest.starts_with('(') {
        return Err(malformed());
    }
    // the column list closes at the first ')'
    let close = rest.find(')').ok_or_else(malformed)?;
    let columns_inner = &rest[1..close];
    if columns_inner.trim().is_empty() {
        return Err(malformed());
    }
    let columns = split_quoted(columns_inner, ',');

    let rest = rest[close + 1..].trim_start();
    let values_kw = leading_word(rest);
    if !values_kw.eq_ignore_ascii_case("VALUES") {
        return Err(malformed());
    }
    let rest = rest[values_kw.len()..].trim_start();
    if !rest.starts_with('(') {
        return Err(malformed());
    }
    // the value list closes at the last ')', so quoted values may contain ')'
    let close = rest.rfind(')').ok_or_else(malformed)?;
    if !rest[close + 1..].trim().is_empty() {
        return Err(malformed());
    }
    let values_inner = &rest[1..close];
    if values_inner.trim().is_empty() {
        return Err(malformed());
    }
    let values = split_quoted(values_inner, ',');

    Ok(Statement::Insert(InsertStmt {
        table: table.to_string(),
        columns,
        values,
    }))
}

fn parse_update(text: &str, rest: &str) -> Result<Statement> {
    let malformed = || QueryError::MalformedStatement(text.to_string());

    let (set_start, set_end) = find_keyword(rest, "SET").ok_or_else(malformed)?;
    let table = parse_table_token(&rest[..set_start]).ok_or_else(malformed)?;

    let tail = &rest[set_end..];
    let where_kw = find_keyword(tail, "WHERE");
    let set_text = match where_kw {
        Some((where_start, _)) => &tail[..where_start],
        None => tail,
    };
    let set_text = set_text.trim();
    if set_text.is_empty() {
        return Err(malformed());
    }

    let mut assignments = Vec::new();
    for pair in split_quoted(set_text, ',') {
        // the first '=' separates field from raw value
        let eq = pair.find('=').ok_or_else(malformed)?;
        let field = pair[..eq].trim();
        if field.is_empty() {
            return Err(malformed());
        }
        let raw = pair[eq + 1..].trim();
        assignments.push((field.to_string(), strip_quotes(raw).to_string()));
    }

    let where_clause = parse_where_tail(tail, where_kw, &malformed)?;

    Ok(Statement::Update(UpdateStmt {
        table,
        assignments,
        where_clause,
    }))
}

fn parse_delete(text: &str, rest: &str) -> Result<Statement> {
    let malformed = || QueryError::MalformedStatement(text.to_string());

    let rest = rest.trim_start();
    let from = leading_word(rest);
    if !from.eq_ignore_ascii_case("FROM") {
        return Err(malformed());
    }
    let tail = &rest[from.len()..];

    let where_kw = find_keyword(tail, "WHERE");
    let table_end = where_kw.map(|k| k.0).unwrap_or(tail.len());
    let table = parse_table_token(&tail[..table_end]).ok_or_else(malformed)?;

    let where_clause = parse_where_tail(tail, where_kw, &malformed)?;

    Ok(Statement::Delete(DeleteStmt { table, where_clause }))
}

/// Trailing `WHERE <expr>` shared by UPDATE and DELETE.
fn parse_where_tail(
    tail: &str,
    where_kw: Option<(usize, usize)>,
    malformed: &dyn Fn() -> QueryError,
) -> Result<Option<String>> {
    match where_kw {
        Some((_, clause_start)) => {
            let expr = tail[clause_start..].trim();
            if expr.is_empty() {
                return Err(malformed());
            }
            Ok(Some(expr.to_string()))
        }
        None => Ok(None),
    }
}

/// A table name must be a single bare token.
fn parse_table_token(text: &str) -> Option<String> {
    let table = text.trim();
    if table.is_empty() || table.contains(char::is_whitespace) {
        return None;
    }
    Some(table.to_string())
}

fn leading_word(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Byte range of the first occurrence of `keyword` outside quoted spans.
/// The match is case-insensitive and whole-word; multi-word keywords
/// ("ORDER BY") match across any run of whitespace. The returned range
/// covers the keyword itself, exclusive of surrounding text.
fn find_keyword(text: &str, keyword: &str) -> Option<(usize, usize)> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let words: Vec<&str> = keyword.split_whitespace().collect();
    let mut in_quotes = false;
    let mut quote_char = '"';

    for i in 0..chars.len() {
        let (pos, ch) = chars[i];
        if ch == '"' || ch == '\'' {
            if !in_quotes {
                in_quotes = true;
                quote_char = ch;
            } else if ch == quote_char {
                in_quotes = false;
            }
            continue;
        }
        if in_quotes {
            continue;
        }
        if i > 0 && is_word_char(chars[i - 1].1) {
            continue;
        }
        if let Some(end) = match_keyword_at(&chars, i, &words, text.len()) {
            return Some((pos, end));
        }
    }
    None
}

/// Match the keyword's words starting at char index `start`; returns the
/// byte offset just past the final word.
fn match_keyword_at(
    chars: &[(usize, char)],
    start: usize,
    words: &[&str],
    text_len: usize,
) -> Option<usize> {
    let mut i = start;
    for (w, word) in words.iter().enumerate() {
        if w > 0 {
            let gap_start = i;
            while i < chars.len() && chars[i].1.is_whitespace() {
                i += 1;
            }
            if i == gap_start {
                return None;
            }
        }
        for wc in word.chars() {
            match chars.get(i) {
                Some(&(_, ch)) if ch.eq_ignore_ascii_case(&wc) => i += 1,
                _ => return None,
            }
        }
    }
    // trailing word boundary
    match chars.get(i) {
        Some(&(_, ch)) if is_word_char(ch) => None,
        Some(&(pos, _)) => Some(pos),
        None => Some(text_len),
    }
}
