/// Characters that would break the `lat,lng,comment;...` layout or end up as markup.
pub const RESERVED_CHARS: [char; 5] = [',', ';', '&', '<', '>'];

fn is_reserved(ch: char) -> bool {
    RESERVED_CHARS.contains(&ch)
}

/// Replaces every reserved character with a single space. Everything else, including
/// non-ASCII text, is kept as is.
pub fn sanitize_comment(input: &str) -> String {
    if !input.contains(is_reserved) {
        return input.to_string();
    }
    input
        .chars()
        .map(|ch| if is_reserved(ch) { ' ' } else { ch })
        .collect()
}
