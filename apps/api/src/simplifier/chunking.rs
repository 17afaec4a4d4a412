//! Chunking — splits long documents into fixed-width pieces that fit the
//! model's input budget.
//!
//! Width is `max_tokens * CHARS_PER_TOKEN` characters. Wrapping is greedy by
//! word: whitespace separates words and collapses to a single space, chunks
//! never start or end with whitespace. Hyphenated words may break after a
//! hyphen, and a piece wider than a whole chunk is hard-broken.

use crate::model_client::CHARS_PER_TOKEN;

/// Default token budget per chunk, below the 512-token encoder limit.
pub const DEFAULT_MAX_TOKENS: usize = 450;

/// Splits `text` into chunks of at most `max_tokens * CHARS_PER_TOKEN` chars.
///
/// Returns an empty vector for blank input. `max_tokens == 0` is treated as 1.
pub fn chunk_text(text: &str, max_tokens: usize) -> Vec<String> {
    let width = max_tokens.max(1) * CHARS_PER_TOKEN;
    wrap_words(text, width)
}

fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Lines::new(width);
    for word in text.split_whitespace() {
        for (i, piece) in split_after_hyphens(word).into_iter().enumerate() {
            lines.push(piece, i > 0);
        }
    }
    lines.finish()
}

/// Greedy line filler. Pieces of one hyphenated word are joined without a
/// space; separate words get one.
struct Lines {
    width: usize,
    chunks: Vec<String>,
    current: String,
    current_len: usize,
}

impl Lines {
    fn new(width: usize) -> Self {
        Self {
            width,
            chunks: Vec::new(),
            current: String::new(),
            current_len: 0,
        }
    }

    fn push(&mut self, piece: &str, attached: bool) {
        let piece_len = piece.chars().count();
        let sep = usize::from(self.current_len > 0 && !attached);

        if piece_len > self.width {
            // Fill the rest of the current line with the head of the piece,
            // then emit full-width pieces.
            let mut rest = piece;
            if self.current_len > 0 && self.current_len + sep < self.width {
                let room = self.width - self.current_len - sep;
                let (head, tail) = split_at_char(rest, room);
                if sep == 1 {
                    self.current.push(' ');
                }
                self.current.push_str(head);
                rest = tail;
            }
            self.flush();
            while rest.chars().count() > self.width {
                let (head, tail) = split_at_char(rest, self.width);
                self.chunks.push(head.to_string());
                rest = tail;
            }
            self.current.push_str(rest);
            self.current_len = rest.chars().count();
            return;
        }

        if self.current_len + sep + piece_len > self.width {
            self.flush();
            self.current.push_str(piece);
            self.current_len = piece_len;
        } else {
            if sep == 1 {
                self.current.push(' ');
            }
            self.current.push_str(piece);
            self.current_len += sep + piece_len;
        }
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.chunks.push(std::mem::take(&mut self.current));
        }
        self.current_len = 0;
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}

/// Splits a word after each hyphen that sits between a letter or digit and
/// a letter: `well-known` gives `["well-", "known"]`, `-5` and `x--y` stay whole.
fn split_after_hyphens(word: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = word.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c == '-' {
            let after_word = prev.is_some_and(char::is_alphanumeric);
            let before_word = chars.peek().is_some_and(|&(_, next)| next.is_alphabetic());
            if after_word && before_word {
                let end = idx + c.len_utf8();
                pieces.push(&word[start..end]);
                start = end;
            }
        }
        prev = Some(c);
    }
    pieces.push(&word[start..]);
    pieces
}

/// Splits at the `n`-th char, returning `(first n chars, remainder)`.
fn split_at_char(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((idx, _)) => s.split_at(idx),
        None => (s, ""),
    }
}
