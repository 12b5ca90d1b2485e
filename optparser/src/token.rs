//! Classification of a single raw argument.
//!
//! A token is a short option (`-x` with optional attached text), a long
//! option (`--name` with optional `=value` or attached text) or plain text.

use std::sync::LazyLock;

use regex::Regex;

/// Shape of one command-line token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `-o` or `-ofoo`.
    Short {
        name: &'a str,
        inline: Option<&'a str>,
    },
    /// `--name`, `--name=value` or `--name=`.
    Long {
        name: &'a str,
        inline: Option<&'a str>,
    },
    /// Anything else: positional text or a value.
    Text,
}

impl Token<'_> {
    pub fn is_option(&self) -> bool {
        !matches!(self, Token::Text)
    }
}

// Groups: 1 short name, 2 short inline, 3 long name, 4 long inline.
static OPTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Constant pattern; failure to compile is a programmer error.
    Regex::new(r"^(?:-([a-zA-Z])(.+)?|--([a-zA-Z_-]+)=?(.+)?)$")
        .expect("option pattern must compile")
});

/// Classify `arg`. Every input maps to exactly one [`Token`].
pub fn classify(arg: &str) -> Token<'_> {
    let Some(caps) = OPTION_PATTERN.captures(arg) else {
        return Token::Text;
    };

    if let Some(name) = caps.get(1) {
        Token::Short {
            name: name.as_str(),
            inline: caps.get(2).map(|m| m.as_str()),
        }
    } else if let Some(name) = caps.get(3) {
        Token::Long {
            name: name.as_str(),
            inline: caps.get(4).map(|m| m.as_str()),
        }
    } else {
        Token::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bare() {
        assert_eq!(
            classify("-a"),
            Token::Short {
                name: "a",
                inline: None
            }
        );
    }

    #[test]
    fn short_with_attached_value() {
        assert_eq!(
            classify("-ofoo"),
            Token::Short {
                name: "o",
                inline: Some("foo")
            }
        );
    }

    #[test]
    fn short_keeps_equals_in_value() {
        assert_eq!(
            classify("-o=foo"),
            Token::Short {
                name: "o",
                inline: Some("=foo")
            }
        );
    }

    #[test]
    fn long_bare() {
        assert_eq!(
            classify("--output"),
            Token::Long {
                name: "output",
                inline: None
            }
        );
    }

    #[test]
    fn long_with_value() {
        assert_eq!(
            classify("--long-a=foo"),
            Token::Long {
                name: "long-a",
                inline: Some("foo")
            }
        );
    }

    #[test]
    fn long_value_may_contain_equals() {
        assert_eq!(
            classify("--define=k=v"),
            Token::Long {
                name: "define",
                inline: Some("k=v")
            }
        );
    }

    #[test]
    fn long_with_empty_value() {
        assert_eq!(
            classify("--output="),
            Token::Long {
                name: "output",
                inline: None
            }
        );
    }

    #[test]
    fn long_with_underscore() {
        assert_eq!(
            classify("--dry_run"),
            Token::Long {
                name: "dry_run",
                inline: None
            }
        );
    }

    #[test]
    fn long_attached_text_without_equals() {
        assert_eq!(
            classify("--out.txt"),
            Token::Long {
                name: "out",
                inline: Some(".txt")
            }
        );
    }

    #[test]
    fn plain_text() {
        for arg in ["foo", "", "-", "--", "-1", "-42.5", "-?", "--=x", "a-b"] {
            assert_eq!(classify(arg), Token::Text, "arg {:?}", arg);
        }
    }

    #[test]
    fn triple_dash_is_long() {
        assert_eq!(
            classify("---x"),
            Token::Long {
                name: "-x",
                inline: None
            }
        );
    }

    #[test]
    fn is_option() {
        assert!(classify("-a").is_option());
        assert!(classify("--a").is_option());
        assert!(!classify("a").is_option());
    }
}
