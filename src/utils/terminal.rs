//! Terminal output sanitization
//!
//! Session logs contain arbitrary model and tool output. The CLI prints message
//! content and previews, so escape sequences embedded in those logs must be removed
//! before they reach the terminal.

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Remove ANSI escape sequences and control characters from log text
///
/// Handles CSI (`ESC [ ... letter`) and OSC (`ESC ] ... BEL` or `ESC ] ... ESC \`)
/// sequences. Tabs and newlines are kept; every other control character is dropped.
///
/// # Examples
///
/// ```
/// use codex_sessions::utils::terminal::sanitize_for_terminal;
///
/// assert_eq!(sanitize_for_terminal("\x1b[31mred\x1b[0m"), "red");
/// ```
pub fn sanitize_for_terminal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ESC {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    for next in chars.by_ref() {
                        if next.is_ascii_alphabetic() || next == '~' {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == BEL {
                            break;
                        }
                        if next == ESC && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        if ch.is_control() && ch != '\n' && ch != '\t' {
            continue;
        }
        out.push(ch);
    }

    out
}
