//! Front-destructive token stream over raw argument strings.

/// Ordered argument tokens consumed strictly left to right.
///
/// Consumed tokens are never reconsidered. Peeking and matching never
/// consume; only [`pop_front`](Self::pop_front) and
/// [`advance`](Self::advance) move the cursor.
///
/// # Examples
///
/// ```
/// use wperf_args_core::TokenStream;
///
/// let mut stream = TokenStream::new(["stat", "-v"]);
/// assert_eq!(stream.peek(), Some("stat"));
/// assert_eq!(stream.pop_front().as_deref(), Some("stat"));
/// assert_eq!(stream.remaining(), ["-v".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<String>,
    cursor: usize,
}

impl TokenStream {
    /// Creates a stream over `tokens`.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            cursor: 0,
        }
    }

    /// Returns the head token without consuming it.
    pub fn peek(&self) -> Option<&str> {
        self.tokens.get(self.cursor).map(String::as_str)
    }

    /// Returns the token `n` positions after the head.
    pub fn peek_nth(&self, n: usize) -> Option<&str> {
        self.tokens.get(self.cursor + n).map(String::as_str)
    }

    /// Returns all tokens not yet consumed.
    pub fn remaining(&self) -> &[String] {
        &self.tokens[self.cursor..]
    }

    /// Consumes and returns the head token.
    pub fn pop_front(&mut self) -> Option<String> {
        let token = self.tokens.get_mut(self.cursor).map(std::mem::take)?;
        self.cursor += 1;
        Some(token)
    }

    /// Consumes up to `n` tokens.
    pub fn advance(&mut self, n: usize) {
        self.cursor = (self.cursor + n).min(self.tokens.len());
    }

    /// Number of tokens not yet consumed.
    pub fn len(&self) -> usize {
        self.tokens.len() - self.cursor
    }

    /// Returns `true` when every token has been consumed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
