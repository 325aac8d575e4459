//! Filesystem-safe identifiers derived from titles and tracked paths.

use deunicode::deunicode;

const ORDER_EXTENSION: &str = "ord";

fn is_dash(ch: char) -> bool {
    matches!(
        ch,
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' | '\u{2212}'
    )
}

/// Collapses every run of non-alphanumeric characters into a single `-`.
///
/// Non-ASCII letters are transliterated first and case is preserved, so
/// `Documentation/git-branch.txt` becomes `Documentation-git-branch-txt`
/// and `Café` becomes `Cafe`.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut out = String::with_capacity(ascii.len());
    let mut pending_separator = false;
    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(ch);
        } else {
            pending_separator = true;
        }
    }
    out
}

/// Produces a filename from a page title, keeping dots and dashes.
///
/// Unicode dashes become `-` before the title is transliterated to ASCII.
/// Whitespace turns into `_` and other punctuation is dropped, so
/// `List of Nintendo Switch games (A–F)` maps to
/// `List_of_Nintendo_Switch_games_A-F`.
pub fn slugify_filename(text: &str) -> String {
    let dashed: String = text.chars().map(|ch| if is_dash(ch) { '-' } else { ch }).collect();
    let ascii = deunicode(&dashed);
    let mut out = String::with_capacity(ascii.len());
    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' {
            out.push(ch);
        } else if ch == '_' || ch.is_whitespace() {
            if !out.ends_with('_') {
                out.push('_');
            }
        }
    }
    out.trim_matches('_').to_string()
}

/// Name of the order file persisted for a tracked path.
pub fn order_file_name(tracked_path: &str) -> String {
    format!("{}.{ORDER_EXTENSION}", slugify(tracked_path))
}
