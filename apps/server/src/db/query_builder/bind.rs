use super::BindValue;

/// Push a bind value and return its 1-based placeholder index.
pub(super) fn push(bind_params: &mut Vec<BindValue>, value: BindValue) -> usize {
    bind_params.push(value);
    bind_params.len()
}

/// Escape SQL `LIKE` meta-characters so user text matches literally.
pub(super) fn escape_like_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `%fragment%` with the fragment escaped.
pub(super) fn contains_pattern(fragment: &str) -> String {
    format!("%{}%", escape_like_pattern(fragment))
}
