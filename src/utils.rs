/// Rough Helvetica width of `text` in millimetres at `font_size` points.
pub fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    let average_char_width = font_size * 0.2;
    text.chars().count() as f32 * average_char_width
}

/// Greedy word wrap. A word wider than `max_width` is broken between characters.
pub fn wrap_text(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current_line = String::new();
        let mut current_width = 0.0;
        let space_width = estimate_text_width(" ", font_size);

        for word in paragraph.split_whitespace() {
            let word_width = estimate_text_width(word, font_size);

            if word_width > max_width {
                if !current_line.is_empty() {
                    lines.push(std::mem::take(&mut current_line));
                }
                let mut pieces = split_word(word, font_size, max_width);
                current_line = pieces.pop().unwrap_or_default();
                current_width = estimate_text_width(&current_line, font_size);
                lines.extend(pieces);
                continue;
            }

            if current_width + word_width + space_width > max_width && !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
                current_width = 0.0;
            }

            if !current_line.is_empty() {
                current_line.push(' ');
                current_width += space_width;
            }
            current_line.push_str(word);
            current_width += word_width;
        }

        lines.push(current_line);
    }

    lines
}

/// Breaks `word` into pieces no wider than `max_width`, at least one char each.
fn split_word(word: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let char_width = estimate_text_width("x", font_size);
    let per_piece = ((max_width / char_width).floor() as usize).max(1);
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(per_piece)
        .map(|piece| piece.iter().collect())
        .collect()
}

/// Maps text onto what the builtin PDF fonts can show (Latin-1).
pub fn builtin_font_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '₹' => out.push_str("Rs."),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            c if (c as u32) < 0x100 => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_word_boundaries() {
        // 2mm per char at 10pt: "aaaa bbbb" is 18mm wide.
        let lines = wrap_text("aaaa bbbb cccc", 10.0, 19.0);
        assert_eq!(lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn long_words_are_split_to_fit() {
        let lines = wrap_text("Khasra-12345678901234567890", 10.0, 10.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| estimate_text_width(line, 10.0) <= 10.0));
        assert_eq!(lines.concat(), "Khasra-12345678901234567890");
    }

    #[test]
    fn split_word_tail_keeps_filling_its_line() {
        // 5 chars fit in 10mm.
        let lines = wrap_text("ab XXXXXXXXXXXX cd", 10.0, 10.0);
        assert_eq!(lines, vec!["ab", "XXXXX", "XXXXX", "XX cd"]);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(wrap_text("", 10.0, 50.0), vec![String::new()]);
    }

    #[test]
    fn explicit_newlines_are_kept() {
        assert_eq!(wrap_text("a\nb", 10.0, 50.0), vec!["a", "b"]);
    }

    #[test]
    fn rupee_sign_is_spelled_out() {
        assert_eq!(builtin_font_text("Price (₹)"), "Price (Rs.)");
        assert_eq!(builtin_font_text("Café – 日"), "Café - ?");
    }
}
