//! Greedy word wrap against a caller-supplied text measure.

/// Break `text` into lines no wider than `max_width`.
///
/// Words are separated by single spaces. A line always holds at least one
/// word, even if that word alone overflows. Joining the result with `" "`
/// gives back `text`.
pub fn wrap_words(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut words = text.split(' ');
    let mut line = words.next().unwrap_or_default().to_string();
    for word in words {
        let candidate = format!("{line} {word}");
        if measure(&candidate) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    lines.push(line);
    lines
}
