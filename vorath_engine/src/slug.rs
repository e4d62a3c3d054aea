/// Normalize a player-provided slot name into a filesystem-safe file stem.
///
/// Letters and digits are kept with their case, `-` and `_` pass through and
/// any other run of characters becomes a single `-`. Returns `None` when
/// nothing usable is left.
pub fn sanitize_slot_name(raw: &str) -> Option<String> {
    let mut slug = String::new();
    let mut pending_dash = false;
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch);
            pending_dash = false;
        } else if ch == '-' || ch == '_' {
            if !slug.is_empty() {
                slug.push(ch);
            }
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    let trimmed = slug.trim_matches(&['-', '_'][..]);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
