//! Reusable field rules that accumulate violations instead of failing fast.

use url::Url;

use crate::error::{FieldViolation, ValidationErrors};

/// Accumulates field violations for a single input.
///
/// ```ignore
/// let mut rules = FieldRules::new();
/// rules.not_blank("name", &input.name).max_chars("name", &input.name, 100);
/// rules.finish()?;
/// ```
#[derive(Debug, Default)]
pub struct FieldRules {
    errors: ValidationErrors,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for `field` unless `ok` holds.
    pub fn check(&mut self, field: &str, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(FieldViolation::new(field, message));
        }
        self
    }

    pub fn not_blank(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(field, !is_blank(value), "must not be blank")
    }

    /// Length is counted in characters, not bytes.
    pub fn max_chars(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        self.check(
            field,
            char_len(value) <= max,
            format!("must be at most {max} characters"),
        )
    }

    pub fn uri_reference(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(field, is_uri_reference(value), "must be a valid URI")
    }

    pub fn has_violations(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// RFC 3986 URI-reference syntax check.
///
/// Absolute URIs must parse; relative references (`logo.png`, `/img/a.svg`)
/// are accepted when they resolve against a base. `[` and `]` are only
/// allowed around an IP-literal host.
pub fn is_uri_reference(value: &str) -> bool {
    if value.is_empty()
        || !value.chars().all(is_uri_char)
        || !has_valid_percent_escapes(value)
        || !brackets_only_in_host(value)
    {
        return false;
    }

    if scheme_of(value).is_some() {
        return Url::parse(value).is_ok();
    }

    // A relative reference may not carry a colon in its first path segment.
    let first_segment = value
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    if first_segment.contains(':') {
        return false;
    }

    Url::parse("http://localhost/")
        .and_then(|base| base.join(value))
        .is_ok()
}

fn is_uri_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._~:/?#[]@!$&'()*+,;=%".contains(c)
}

/// `[`/`]` may only appear as one pair enclosing the authority's host.
fn brackets_only_in_host(value: &str) -> bool {
    let is_bracket = |c: char| c == '[' || c == ']';
    if !value.contains(is_bracket) {
        return true;
    }

    let hier_part = match scheme_of(value) {
        Some(scheme) => &value[scheme.len() + 1..],
        None => value,
    };
    let Some(rest) = hier_part.strip_prefix("//") else {
        return false;
    };

    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);
    if tail.contains(is_bracket) {
        return false;
    }

    let (userinfo, host) = authority.rsplit_once('@').unwrap_or(("", authority));
    if userinfo.contains(is_bracket) {
        return false;
    }
    let Some(literal) = host.strip_prefix('[') else {
        return false;
    };
    let Some((inner, port)) = literal.split_once(']') else {
        return false;
    };

    !inner.is_empty()
        && !inner.contains(is_bracket)
        && (port.is_empty() || (port.starts_with(':') && !port.contains(is_bracket)))
}

fn has_valid_percent_escapes(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len()
                || !bytes[i + 1].is_ascii_hexdigit()
                || !bytes[i + 2].is_ascii_hexdigit()
            {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

fn scheme_of(value: &str) -> Option<&str> {
    let end = value.find(':')?;
    let candidate = &value[..end];
    let mut chars = candidate.chars();
    let first = chars.next()?;
    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_absolute_and_relative_references() {
        for ok in [
            "https://sportmaster.com",
            "https://www.nike.com/assets/logos/swoosh.png",
            "http://example.com/a%20b?q=1#frag",
            "mailto:brand@example.com",
            "sportmaster-logo.png",
            "/static/logo.svg",
            "../logo.png",
            "http://[::1]/x",
            "http://[::1]:8080/logo.png",
        ] {
            assert!(is_uri_reference(ok), "expected {ok:?} to be accepted");
        }
    }

    #[test]
    fn rejects_malformed_references() {
        for bad in [
            "",
            "https://exa mple.com",
            "https://",
            "http://[::1",
            "logo%zz.png",
            "logo%2",
            "1http:logo",
            "ht<tp://x",
            "brand logo.png",
            "logo[1].png",
            "http://example.com/a[b]",
            "http://example.com/logo.png?size=[1]",
            "http://[::1]x/",
            "http://[]/",
        ] {
            assert!(!is_uri_reference(bad), "expected {bad:?} to be rejected");
        }
    }

    #[test]
    fn rules_accumulate_in_order() {
        let mut rules = FieldRules::new();
        rules
            .not_blank("name", "  ")
            .max_chars("description", "abcdef", 3)
            .uri_reference("website", "not a uri");

        let errors = rules.finish().unwrap_err();
        let fields: Vec<_> = errors.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "description", "website"]);
    }

    #[test]
    fn max_chars_counts_characters_not_bytes() {
        let mut rules = FieldRules::new();
        rules.max_chars("name", "ééé", 3);
        assert!(rules.finish().is_ok());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: max_chars accepts exactly the strings at or below the bound.
            #[test]
            fn max_chars_boundary(value in "\\PC{0,40}", max in 0usize..40) {
                let mut rules = FieldRules::new();
                rules.max_chars("f", &value, max);
                prop_assert_eq!(rules.finish().is_ok(), value.chars().count() <= max);
            }

            /// Property: whitespace-only strings are always blank.
            #[test]
            fn whitespace_is_blank(value in "[ \\t\\n]{0,20}") {
                prop_assert!(is_blank(&value));
            }

            /// Property: simple relative file names are valid references.
            #[test]
            fn simple_file_names_are_references(
                stem in "[a-z][a-z0-9-]{0,30}",
                ext in "(png|svg|jpg)",
            ) {
                let value = format!("{stem}.{ext}");
                prop_assert!(is_uri_reference(&value));
            }
        }
    }
}
