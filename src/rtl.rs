//! egui lays glyphs out left to right and does not run the bidi algorithm,
//! so Hebrew labels are converted to visual order before display.

fn is_rtl(ch: char) -> bool {
    matches!(ch, '\u{0590}'..='\u{05FF}' | '\u{FB1D}'..='\u{FB4F}')
}

fn is_strong_ltr(ch: char) -> bool {
    ch.is_alphanumeric() && !is_rtl(ch)
}

/// Visual order for a single line of right-to-left text.
///
/// Runs of Latin letters and digits keep their internal order; everything
/// else is mirrored. Text without Hebrew is returned untouched.
pub fn visual(text: &str) -> String {
    if !text.chars().any(is_rtl) {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = chars.len();
    while i > 0 {
        let ch = chars[i - 1];
        if is_strong_ltr(ch) {
            // Walk back to the start of the LTR run, allowing inner
            // separators like "050-6897798" or "12.50".
            let end = i;
            let mut start = i - 1;
            while start > 0 {
                let prev = chars[start - 1];
                let joins = matches!(prev, '.' | ',' | '-' | ':' | '/' | '@' | '_')
                    && start >= 2
                    && is_strong_ltr(chars[start - 2]);
                let currency =
                    matches!(prev, '₪' | '$' | '%') && chars[start].is_ascii_digit();
                if is_strong_ltr(prev) || joins || currency {
                    start -= 1;
                } else {
                    break;
                }
            }
            out.extend(&chars[start..end]);
            i = start;
        } else {
            out.push(mirror(ch));
            i -= 1;
        }
    }
    out
}

fn mirror(ch: char) -> char {
    match ch {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '<' => '>',
        '>' => '<',
        other => other,
    }
}

/// Visual order applied line by line.
pub fn visual_lines(text: &str) -> String {
    text.lines().map(visual).collect::<Vec<_>>().join("\n")
}
