// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Whitespace tokenizer for one presentation-format record line.

use crate::error::{ProtoErrorKind, ProtoResult};

/// Split `line` into whitespace-separated tokens. A `"`-quoted run is kept
/// as a single token with its surrounding quotes stripped and `\"`/`\\`
/// escapes resolved, so a quoted HINFO field containing embedded
/// whitespace survives as one token rather than being split apart.
pub fn tokenize(line: &str) -> ProtoResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next();
            let mut token = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some(escaped @ ('"' | '\\')) => token.push(escaped),
                        Some(other) => {
                            token.push('\\');
                            token.push(other);
                        }
                        None => {
                            return Err(ProtoErrorKind::MalformedPresentation {
                                token_index: tokens.len(),
                                message: "dangling escape at end of quoted token".to_string(),
                            }
                            .into());
                        }
                    },
                    other => token.push(other),
                }
            }
            if !closed {
                return Err(ProtoErrorKind::MalformedPresentation {
                    token_index: tokens.len(),
                    message: "unterminated quoted token".to_string(),
                }
                .into());
            }
            tokens.push(token);
            continue;
        }

        let mut token = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            token.push(c);
            chars.next();
        }
        tokens.push(token);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(
            tokenize("10.0.0.1 6 25 80").unwrap(),
            vec!["10.0.0.1", "6", "25", "80"]
        );
    }

    #[test]
    fn quoted_token_keeps_embedded_whitespace() {
        assert_eq!(
            tokenize(r#""INTEL-386" "some OS""#).unwrap(),
            vec!["INTEL-386", "some OS"]
        );
    }

    #[test]
    fn quoted_token_resolves_escapes() {
        assert_eq!(tokenize(r#""a\"b\\c""#).unwrap(), vec![r#"a"b\c"#]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert!(tokenize(r#""unterminated"#).is_err());
    }

    #[test]
    fn collapses_repeated_whitespace() {
        assert_eq!(tokenize("a   b\tc").unwrap(), vec!["a", "b", "c"]);
    }
}
