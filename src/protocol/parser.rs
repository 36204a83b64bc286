//! Text command parser.
//!
//! Message content (delimiters already stripped by the framer):
//! ```text
//! command=<type>[,<key>=<value>]*
//! ```
//!
//! [`parse_message`] splits off the command type and hands back the rest
//! of the message untouched.  [`pairs`] then walks that remainder lazily,
//! borrowing slices of the original string; nothing is copied or mutated.

/// First key of every command message.
pub const COMMAND_KEY: &str = "command";

/// Separates a key from its value.
pub const KEY_VALUE_SEPARATOR: char = '=';

/// Separates pairs (and the command type from the payload).
pub const PAIR_SEPARATOR: char = ',';

/// A message that carried the `command=<type>` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedMessage<'a> {
    /// Text between `command=` and the first comma.
    pub command_type: &'a str,
    /// Everything after the first comma, still unparsed.
    pub remainder: &'a str,
}

/// Split a framed message into its command type and payload.
///
/// Returns `None` for anything that does not start with `command=<type>`;
/// such frames are not errors, just traffic meant for someone else.
pub fn parse_message(message: &str) -> Option<ParsedMessage<'_>> {
    let (key, rest) = message.split_once(KEY_VALUE_SEPARATOR)?;
    if key != COMMAND_KEY {
        return None;
    }
    let (command_type, remainder) = rest.split_once(PAIR_SEPARATOR).unwrap_or((rest, ""));
    if command_type.is_empty() {
        return None;
    }
    Some(ParsedMessage {
        command_type,
        remainder,
    })
}

/// One item produced by [`Pairs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A complete `key=value` pair.
    Pair { key: &'a str, value: &'a str },
    /// A trailing key with no value.  Always the last token.
    Dangling(&'a str),
}

/// Lazy iterator over the `key=value` pairs of a payload.
///
/// A key runs up to the next `=`; its value runs up to the next `,`, so a
/// value may itself contain `=`.  Stray separators in front of a key or a
/// value are skipped.
#[derive(Debug, Clone)]
pub struct Pairs<'a> {
    rest: &'a str,
}

/// Tokenize `payload` into pairs.
pub fn pairs(payload: &str) -> Pairs<'_> {
    Pairs { rest: payload }
}

impl<'a> Iterator for Pairs<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self
            .rest
            .trim_start_matches([KEY_VALUE_SEPARATOR, PAIR_SEPARATOR]);
        if rest.is_empty() {
            self.rest = "";
            return None;
        }

        let Some((key, after_key)) = rest.split_once(KEY_VALUE_SEPARATOR) else {
            self.rest = "";
            return Some(Token::Dangling(rest));
        };

        let after_key = after_key.trim_start_matches(PAIR_SEPARATOR);
        if after_key.is_empty() {
            self.rest = "";
            return Some(Token::Dangling(key));
        }

        let (value, next) = after_key
            .split_once(PAIR_SEPARATOR)
            .unwrap_or((after_key, ""));
        self.rest = next;
        Some(Token::Pair { key, value })
    }
}
