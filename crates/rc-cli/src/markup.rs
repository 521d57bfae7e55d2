//! Terminal rendering of `|x` color markup in check messages.

use colored::Colorize;

/// Replace `|r |g |y |m |c |w |b` and the `|n` reset with terminal colors.
///
/// Unknown codes are left as written. When colors are off the markup is
/// simply removed.
pub fn render(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut segment = String::new();
    let mut style = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '|' {
            if let Some(&code) = chars.peek() {
                if is_code(code) {
                    chars.next();
                    out.push_str(&paint(&segment, style));
                    segment.clear();
                    style = (code != 'n').then_some(code);
                    continue;
                }
            }
        }
        segment.push(c);
    }
    out.push_str(&paint(&segment, style));
    out
}

fn is_code(c: char) -> bool {
    matches!(c, 'r' | 'g' | 'y' | 'm' | 'c' | 'w' | 'b' | 'n')
}

fn paint(segment: &str, style: Option<char>) -> String {
    if segment.is_empty() {
        return String::new();
    }
    match style {
        Some('r') => segment.red().to_string(),
        Some('g') => segment.green().to_string(),
        Some('y') => segment.yellow().to_string(),
        Some('m') => segment.magenta().to_string(),
        Some('c') => segment.cyan().to_string(),
        Some('w') => segment.white().bold().to_string(),
        Some('b') => segment.blue().to_string(),
        _ => segment.to_string(),
    }
}
