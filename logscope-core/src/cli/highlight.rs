use ahash::AHashSet;
use once_cell::sync::Lazy;
use owo_colors::OwoColorize;

static KEYWORDS: Lazy<AHashSet<&'static str>> = Lazy::new(|| {
    [
        "SELECT", "FROM", "WHERE", "AND", "OR", "NOT", "BETWEEN", "ORDER", "GROUP", "BY",
        "DESC", "ASC", "LIMIT", "OFFSET", "AS", "COUNT", "IN", "LIKE", "ILIKE", "IS", "NULL",
        "DATE_TRUNC", "DATE_BIN", "INTERVAL",
    ]
    .into_iter()
    .collect()
});

/// Colors SQL keywords outside of quoted literals and identifiers.
pub fn highlight_sql(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() * 2);
    let mut word = String::new();
    let mut quote: Option<char> = None;

    for c in sql.chars() {
        if let Some(open) = quote {
            out.push(c);
            if c == open {
                quote = None;
            }
            continue;
        }

        if c.is_ascii_alphanumeric() || c == '_' {
            word.push(c);
            continue;
        }

        flush_word(&mut out, &mut word);
        if c == '\'' || c == '"' {
            quote = Some(c);
        }
        out.push(c);
    }
    flush_word(&mut out, &mut word);

    out
}

fn flush_word(out: &mut String, word: &mut String) {
    if word.is_empty() {
        return;
    }
    if KEYWORDS.contains(word.as_str()) {
        out.push_str(&word.blue().bold().to_string());
    } else {
        out.push_str(word);
    }
    word.clear();
}
