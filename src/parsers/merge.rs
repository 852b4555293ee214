use crate::models::ConversationEntry;

/// Collapse runs of adjacent entries that share (type, subtype, role)
///
/// A run of user messages keeps only its last message, since the client
/// resubmits the prompt. Any other run concatenates its non-empty contents with a
/// blank line between them. Order is never changed.
pub fn merge_consecutive(entries: Vec<ConversationEntry>) -> Vec<ConversationEntry> {
    let mut merged = Vec::with_capacity(entries.len());
    let mut iter = entries.into_iter();
    let Some(mut current) = iter.next() else {
        return merged;
    };
    let mut in_user_group = current.is_user_message();

    for entry in iter {
        if !current.same_group(&entry) {
            merged.push(std::mem::replace(&mut current, entry));
            in_user_group = current.is_user_message();
            continue;
        }

        if in_user_group && entry.is_user_message() {
            current.content = entry.content;
            current.line = entry.line;
            current.timestamp = entry.timestamp;
            current.raw = entry.raw;
        } else if !entry.content.trim().is_empty() {
            if current.content.trim().is_empty() {
                current.content = entry.content;
            } else {
                current.content.push_str("\n\n");
                current.content.push_str(&entry.content);
            }
        }
    }

    merged.push(current);
    merged
}
