use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[a-z0-9]+").expect("valid regex");
}

/// Lazy stream of lowercase alphanumeric tokens.
///
/// The input is lowercased once up front; every maximal run of `[a-z0-9]` is a token and
/// everything else (punctuation, hyphens, underscores, dots, non-ASCII letters) separates
/// tokens. A clone taken before iteration replays the same tokens, and [`Tokens::restart`]
/// rewinds in place.
#[derive(Debug, Clone)]
pub struct Tokens {
    text: String,
    pos: usize,
    limit: Option<usize>,
    emitted: usize,
}

impl Tokens {
    /// Rewind to the first token, keeping the same limit.
    pub fn restart(&mut self) {
        self.pos = 0;
        self.emitted = 0;
    }
}

impl Iterator for Tokens {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.limit.is_some_and(|limit| self.emitted >= limit) {
            return None;
        }
        let mat = RE.find_at(&self.text, self.pos)?;
        self.pos = mat.end();
        self.emitted += 1;
        Some(mat.as_str().to_string())
    }
}

/// Tokenize text into lowercase `[a-z0-9]+` runs, stopping after `limit` tokens when given.
pub fn tokenize(text: &str, limit: Option<usize>) -> Tokens {
    Tokens { text: text.to_lowercase(), pos: 0, limit, emitted: 0 }
}
