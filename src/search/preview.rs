/// Characters of context kept on each side of a match
pub const SNIPPET_RADIUS: usize = 60;

/// Length cap for previews of matches that cannot be located
pub const SNIPPET_MAX: usize = 180;

const ELLIPSIS: &str = "...";

/// Build a one-line preview around a match
///
/// `match_at` and `match_len` are in characters. Newlines and carriage returns are
/// flattened to spaces first. Ellipses mark each side where the window cut text off.
pub fn make_preview(content: &str, match_at: Option<usize>, match_len: usize) -> String {
    let cleaned: Vec<char> =
        content.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }).collect();
    let lead = cleaned.iter().take_while(|c| c.is_whitespace()).count();
    let trail = cleaned[lead..].iter().rev().take_while(|c| c.is_whitespace()).count();
    let body = &cleaned[lead..cleaned.len() - trail];
    if body.is_empty() {
        return String::new();
    }

    let located = match_at
        .and_then(|at| at.checked_sub(lead))
        .filter(|&at| at < body.len() && match_len > 0);
    let Some(at) = located else {
        return truncate(body, SNIPPET_MAX);
    };

    let start = at.saturating_sub(SNIPPET_RADIUS);
    let end = (at + match_len + SNIPPET_RADIUS).min(body.len());
    let window: String = body[start..end].iter().collect();

    let mut preview = String::with_capacity(window.len() + 2 * ELLIPSIS.len());
    if start > 0 {
        preview.push_str(ELLIPSIS);
    }
    preview.push_str(window.trim());
    if end < body.len() {
        preview.push_str(ELLIPSIS);
    }
    preview
}

/// Locate a match found in `content.to_lowercase()` within `content` itself
///
/// `lower_at` and `lower_len` are a byte range of the lower-cased text. Returns the
/// matching (start, length) in characters of `content`. Lower-casing can widen a
/// character (`İ` becomes two), so the offsets cannot be reused directly.
pub fn match_span(content: &str, lower_at: usize, lower_len: usize) -> Option<(usize, usize)> {
    let lower_end = lower_at + lower_len;
    let mut lowered = 0;
    let mut start = None;

    for (index, ch) in content.chars().enumerate() {
        lowered += ch.to_lowercase().map(char::len_utf8).sum::<usize>();
        if start.is_none() && lowered > lower_at {
            start = Some(index);
        }
        if let Some(at) = start
            && lowered >= lower_end
        {
            return Some((at, index + 1 - at));
        }
    }
    None
}

fn truncate(chars: &[char], max: usize) -> String {
    if chars.len() <= max {
        return chars.iter().collect();
    }
    if max <= ELLIPSIS.len() {
        return chars[..max].iter().collect();
    }
    let mut out: String = chars[..max - ELLIPSIS.len()].iter().collect();
    out.push_str(ELLIPSIS);
    out
}
