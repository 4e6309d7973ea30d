//! Message shaping helpers for chat sinks.
//!
//! Telegram's message limit is 4096 characters. We use 4090 for safety.

/// Maximum characters per Telegram message (limit is 4096; we use 4090 for safety).
pub const CHUNK_MAX: usize = 4090;

/// Split `text` into chunks of at most `max` characters, breaking on line
/// boundaries where possible.
///
/// Lengths are counted in `char`s, never bytes, so multi-byte bullets and
/// emoji are never cut in half.
pub fn split_chunks(text: &str, max: usize) -> Vec<String> {
    if text.chars().count() <= max {
        return vec![text.to_string()];
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let cost = if current.is_empty() { line_len } else { 1 + line_len };

        if !current.is_empty() && current_len + cost > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    // A single line longer than `max` still needs a hard split.
    let mut result = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        if chunk.chars().count() <= max {
            result.push(chunk);
            continue;
        }
        let chars: Vec<char> = chunk.chars().collect();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + max).min(chars.len());
            let split_at = if end == chars.len() {
                end
            } else {
                chars[start..end]
                    .iter()
                    .rposition(|c| *c == ' ')
                    .filter(|&p| p > 0)
                    .map(|p| start + p)
                    .unwrap_or(end)
            };
            let piece: String = chars[start..split_at].iter().collect();
            let piece = piece.trim();
            if !piece.is_empty() {
                result.push(piece.to_string());
            }
            start = split_at;
        }
    }

    result
}

/// Escape special characters for Telegram MarkdownV2.
///
/// MarkdownV2 requires escaping: `_ * [ ] ( ) ~ ` > # + - = | { } . ! \`
pub fn escape_markdown_v2(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '='
            | '|' | '{' | '}' | '.' | '!' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}
