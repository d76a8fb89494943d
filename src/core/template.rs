//! Replacement templates with `$`-style group references.
//!
//! Supported references: `$1`..`$99`, `${N}`, `$&` (whole match) and `$$`
//! (a literal dollar). A `$N` that names no existing group stays literal, and
//! `$NN` only reads as a two-digit reference when that group exists.

use super::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Group(usize),
    WholeMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementTemplate {
    tokens: Vec<Token>,
}

impl ReplacementTemplate {
    /// Parse `template` for a pattern with `group_count` groups (counting the
    /// whole-match group 0).
    pub fn parse(template: &str, group_count: usize) -> Result<Self, ConfigError> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(pos) = rest.find('$') {
            literal.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let bytes = after.as_bytes();

            let (token, consumed) = match bytes.first() {
                Some(b'$') => (None, 1),
                Some(b'&') => (Some(Token::WholeMatch), 1),
                Some(b'{') => {
                    let Some(close) = after.find('}') else {
                        return Err(invalid(template, "unterminated `${`"));
                    };
                    let index: usize = after[1..close]
                        .parse()
                        .map_err(|_| invalid(template, "`${...}` must contain a group number"))?;
                    if index >= group_count {
                        return Err(invalid(
                            template,
                            &format!("group {} does not exist in `functionPattern`", index),
                        ));
                    }
                    (Some(Token::Group(index)), close + 1)
                }
                Some(d) if d.is_ascii_digit() => match numbered_reference(bytes, group_count) {
                    Some((index, len)) => (Some(Token::Group(index)), len),
                    None => {
                        literal.push('$');
                        rest = after;
                        continue;
                    }
                },
                _ => {
                    literal.push('$');
                    rest = after;
                    continue;
                }
            };

            match token {
                Some(token) => {
                    if !literal.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }
                    tokens.push(token);
                }
                None => literal.push('$'),
            }
            rest = &after[consumed..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self { tokens })
    }

    /// Group indices referenced by the template, in order of appearance.
    pub(crate) fn referenced_groups(&self) -> impl Iterator<Item = usize> + '_ {
        self.tokens.iter().filter_map(|t| match t {
            Token::Group(index) => Some(*index),
            _ => None,
        })
    }

    /// Render the template. `group` resolves a group index to its text.
    pub fn render<'a>(&self, whole: &str, mut group: impl FnMut(usize) -> &'a str) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::WholeMatch => out.push_str(whole),
                Token::Group(index) => out.push_str(group(*index)),
            }
        }
        out
    }
}

/// Resolve `$N` / `$NN` from the digits following a `$`.
fn numbered_reference(bytes: &[u8], group_count: usize) -> Option<(usize, usize)> {
    let first = usize::from(bytes[0] - b'0');
    if let Some(second) = bytes.get(1).filter(|b| b.is_ascii_digit()) {
        let two = first * 10 + usize::from(second - b'0');
        if two >= 1 && two < group_count {
            return Some((two, 2));
        }
    }
    (first >= 1 && first < group_count).then_some((first, 1))
}

fn invalid(template: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidTemplate {
        template: template.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(template: &str, groups: &[&'static str]) -> String {
        let parsed = ReplacementTemplate::parse(template, groups.len()).unwrap();
        parsed.render(groups[0], |i| groups[i])
    }

    #[test]
    fn test_simple_references() {
        assert_eq!(render("t('$1')", &["t(\"a\")", "a"]), "t('a')");
        assert_eq!(render("$2:$1", &["x", "a", "b"]), "b:a");
    }

    #[test]
    fn test_braced_reference() {
        assert_eq!(render("${1}0", &["x", "a"]), "a0");
    }

    #[test]
    fn test_whole_match_and_dollar() {
        assert_eq!(render("[$&] $$1", &["m", "a"]), "[m] $1");
    }

    #[test]
    fn test_missing_group_stays_literal() {
        assert_eq!(render("$3-$0", &["x", "a"]), "$3-$0");
        assert_eq!(render("cost: $", &["x"]), "cost: $");
        assert_eq!(render("$x", &["x"]), "$x");
    }

    #[test]
    fn test_two_digit_reference() {
        let groups: Vec<&'static str> = vec![
            "m", "g1", "g2", "g3", "g4", "g5", "g6", "g7", "g8", "g9", "g10", "g11",
        ];
        assert_eq!(render("$11", &groups), "g11");
        // Group 12 does not exist, so this is group 1 followed by "2".
        assert_eq!(render("$12", &groups), "g12");
    }

    #[test]
    fn test_referenced_groups() {
        let parsed = ReplacementTemplate::parse("$1 ${2} $1", 3).unwrap();
        assert_eq!(parsed.referenced_groups().collect::<Vec<_>>(), vec![1, 2, 1]);
    }

    #[test]
    fn test_invalid_braced_reference() {
        assert!(ReplacementTemplate::parse("${1", 2).is_err());
        assert!(ReplacementTemplate::parse("${a}", 2).is_err());
        assert!(ReplacementTemplate::parse("${5}", 2).is_err());
    }
}
