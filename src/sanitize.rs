//! HTML neutralization for user-supplied text
//!
//! Titles and descriptions are rendered by browser clients, so any character
//! that can open a tag or break out of an attribute is replaced with its
//! entity. An `&` that already starts a character reference is left alone,
//! which keeps `sanitize(sanitize(s)) == sanitize(s)`.

/// Escapes markup-significant characters in `input`
///
/// # Example
///
/// ```
/// # use bookmarks::sanitize::sanitize;
/// assert_eq!(
///     sanitize("<script>alert(\"xss\")</script>"),
///     "&lt;script&gt;alert(&quot;xss&quot;)&lt;/script&gt;"
/// );
/// ```
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for (idx, ch) in input.char_indices() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '&' if starts_char_ref(&input[idx..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            _ => out.push(ch),
        }
    }

    out
}

/// True if `s` (which begins with `&`) opens a complete character reference
fn starts_char_ref(s: &str) -> bool {
    let body = &s[1..];
    let Some(end) = body.find(';') else {
        return false;
    };
    let name = &body[..end];

    if let Some(num) = name.strip_prefix('#') {
        return match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !num.is_empty() && num.chars().all(|c| c.is_ascii_digit()),
        };
    }

    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}
