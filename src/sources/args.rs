//! Command-line argument configuration source.

use super::{Pair, Pairs, Source};
use crate::core::{SourceId, Value};
use crate::error::{ConfigError, Result};
use std::collections::HashSet;

/// Command-line argument configuration source.
///
/// Recognised forms:
/// - `--key=value`
/// - `-k value` when the next token is not itself an option
/// - `-kvalue` when `k` is declared with [`with_required`](Self::with_required)
/// - `-abc`, expanding to boolean flags `a`, `b`, `c` set to `"true"`
///
/// Parsing stops at the first token that is not an option, or at `--`.
///
/// # Examples
///
/// ```rust
/// use figstore::sources::{ArgsSource, Source};
///
/// let source = ArgsSource::new(["--key=value", "-b", "-cval3", "-def"]).with_required(['c']);
/// let keys: Vec<String> = source.pairs().map(|p| p.unwrap().0).collect();
/// assert_eq!(keys, ["key", "b", "c", "d", "e", "f"]);
/// ```
#[derive(Debug, Clone)]
pub struct ArgsSource {
    args: Vec<String>,
    required: HashSet<char>,
}

impl ArgsSource {
    /// Create a source over the given tokens (without the program name).
    ///
    /// For the live process use `std::env::args().skip(1)`.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            required: HashSet::new(),
        }
    }

    /// Declare short keys that take an attached or following value.
    pub fn with_required(mut self, keys: impl IntoIterator<Item = char>) -> Self {
        self.required.extend(keys);
        self
    }

    /// Parse all tokens. Pairs parsed before an error are kept ahead of it.
    fn parse(&self) -> Vec<Result<Pair>> {
        let mut out = Vec::new();
        if let Err(e) = self.parse_into(&mut out) {
            out.push(Err(e));
        }
        out
    }

    fn parse_into(&self, out: &mut Vec<Result<Pair>>) -> Result<()> {
        let mut tokens = self.args.iter().peekable();

        while let Some(token) = tokens.next() {
            if token == "--" || !looks_like_option(token) {
                break;
            }

            if let Some(long) = token.strip_prefix("--") {
                let (key, value) = long
                    .split_once('=')
                    .ok_or_else(|| ConfigError::argument(token, "expected --key=value"))?;
                if key.is_empty() {
                    return Err(ConfigError::argument(token, "empty key"));
                }
                out.push(Ok((key.to_string(), Value::from(value))));
                continue;
            }

            let letters = &token[1..];
            for (i, flag) in letters.char_indices() {
                let rest = &letters[i + flag.len_utf8()..];

                if self.required.contains(&flag) {
                    let value = if !rest.is_empty() {
                        rest.to_string()
                    } else {
                        match tokens.next_if(|next| !looks_like_option(next)) {
                            Some(next) => next.clone(),
                            None => {
                                return Err(ConfigError::argument(
                                    token,
                                    format!("-{} requires a value", flag),
                                ));
                            }
                        }
                    };
                    out.push(Ok((flag.to_string(), Value::from(value))));
                    break;
                }

                if rest.is_empty() && i == 0 {
                    // Lone `-k`: take the following token as its value if it
                    // is not an option.
                    let value = tokens
                        .next_if(|next| !looks_like_option(next))
                        .map_or_else(|| "true".to_string(), Clone::clone);
                    out.push(Ok((flag.to_string(), Value::from(value))));
                    break;
                }

                out.push(Ok((flag.to_string(), Value::from("true"))));
            }
        }

        Ok(())
    }
}

fn looks_like_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

impl Source for ArgsSource {
    fn pairs(&self) -> Pairs<'_> {
        Box::new(self.parse().into_iter())
    }

    fn id(&self) -> SourceId {
        SourceId::reader("args")
    }
}
