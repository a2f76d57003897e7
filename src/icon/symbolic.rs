//! Recoloring of symbolic SVG icons.
//!
//! Symbolic icons are drawn with a single neutral fill.  Every fill whose
//! color is near-gray (the largest difference between two RGB channels is
//! below [`NEUTRAL_DELTA`]) or one of the named neutrals is replaced with
//! the configured foreground color.  Colored fills are left alone.
//!
//! Both attribute (`fill="#bebebe"`) and inline-style (`style="fill:#bebebe"`)
//! forms are handled.

/// Channel spread under which a color counts as neutral.
pub const NEUTRAL_DELTA: u8 = 32;

const NAMED_NEUTRALS: &[&str] = &["gray", "grey", "black", "white"];

/// Whether `color` is a neutral tone that should follow the foreground.
pub fn is_neutral(color: &str) -> bool {
    let lower = color.to_ascii_lowercase();
    if NAMED_NEUTRALS.contains(&lower.as_str()) {
        return true;
    }
    match rgb(&lower) {
        Some((r, g, b)) => {
            let delta = r.abs_diff(g).max(r.abs_diff(b)).max(g.abs_diff(b));
            delta < NEUTRAL_DELTA
        }
        None => false,
    }
}

/// Parse `#rgb` or `#rrggbb` (trailing alpha digits are ignored).
fn rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 | 4 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        6 | 8 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

/// Replace neutral fills in `svg` with `foreground`.
pub fn recolor(svg: &str, foreground: &str) -> String {
    let mut out = String::with_capacity(svg.len());
    let mut rest = svg;

    while let Some(pos) = rest.find("fill") {
        let (head, tail) = rest.split_at(pos + "fill".len());
        out.push_str(head);
        rest = tail;

        let standalone = at_word_boundary(&head[..pos]);
        if !standalone {
            continue;
        }
        let Some((start, len)) = fill_value(tail) else {
            continue;
        };
        let value = &tail[start..start + len];
        out.push_str(&tail[..start]);
        if is_neutral(value) {
            out.push_str(foreground);
        } else {
            out.push_str(value);
        }
        rest = &tail[start + len..];
    }

    out.push_str(rest);
    out
}

/// Whether the text before a `fill` token ends on a word boundary.
fn at_word_boundary(before: &str) -> bool {
    before
        .chars()
        .next_back()
        .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
}

/// Locate the color value following a `fill` token.
///
/// Returns `(offset, length)` of the value within `s`, or `None` if `s`
/// does not continue with `="value"`, `='value'` or `:value`, or if the
/// value is not a plain `#?[A-Za-z0-9]+` token.
fn fill_value(s: &str) -> Option<(usize, usize)> {
    let bytes = s.as_bytes();
    let (start, closing) = if s.starts_with("=\"") {
        (2, Some(b'"'))
    } else if s.starts_with("='") {
        (2, Some(b'\''))
    } else if s.starts_with(':') {
        let after = &s[1..];
        (1 + after.len() - after.trim_start().len(), None)
    } else {
        return None;
    };

    let body = &bytes[start..];
    let hash = usize::from(body.first() == Some(&b'#'));
    let len = hash
        + body[hash..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();
    if len == hash {
        return None;
    }

    let next = body.get(len).copied();
    let terminated = match closing {
        Some(q) => next == Some(q),
        None => next.map_or(true, |b| matches!(b, b';' | b'"' | b'\'' | b'}' | b' ' | b'\n' | b'\t' | b'\r')),
    };
    terminated.then_some((start, len))
}
