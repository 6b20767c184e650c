//! Scoped usernames, `user@domain`, as carried in GSSUP tokens (CSIv2 § 16.2.5).
//!
//! `@` and `\` inside either half are escaped with a backslash. The first
//! unescaped `@` separates the username from the domain.

use alloc::string::String;

const ESCAPE: char = '\\';
const SEPARATOR: char = '@';

fn push_escaped(out: &mut String, part: &str) {
    for c in part.chars() {
        if c == ESCAPE || c == SEPARATOR {
            out.push(ESCAPE);
        }
        out.push(c);
    }
}

/// Joins `user` and `domain` into a scoped username.
///
/// A missing half is omitted together with its separator, except that a
/// domain without a user still gets its leading `@`.
///
/// ```
/// use csiv2_token::scoped_name::build_scoped_user_name;
///
/// assert_eq!(build_scoped_user_name(Some(r"a\b@c"), Some("d")), r"a\\b\@c@d");
/// assert_eq!(build_scoped_user_name(Some("user"), None), "user");
/// ```
pub fn build_scoped_user_name(user: Option<&str>, domain: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(user) = user {
        push_escaped(&mut out, user);
    }
    if let Some(domain) = domain {
        out.push(SEPARATOR);
        push_escaped(&mut out, domain);
    }
    out
}

/// Unescapes `scoped` up to the first unescaped `@`.
///
/// Returns the unescaped part and the remainder after the separator, if any.
fn unescape_until_separator(scoped: &str) -> (String, Option<&str>) {
    let mut out = String::with_capacity(scoped.len());
    let mut chars = scoped.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            ESCAPE => match chars.peek() {
                Some(&(_, next)) if next == ESCAPE || next == SEPARATOR => {
                    out.push(next);
                    chars.next();
                }
                _ => out.push(c),
            },
            SEPARATOR => return (out, Some(&scoped[i + 1..])),
            _ => out.push(c),
        }
    }

    (out, None)
}

/// Returns the unescaped username part of a scoped username.
///
/// Scanning stops at the first unescaped `@`; the domain is discarded. A
/// backslash that does not precede `\` or `@` is kept as is.
///
/// ```
/// use csiv2_token::scoped_name::extract_user_name_from_scoped_name;
///
/// assert_eq!(extract_user_name_from_scoped_name(r"a\\b\@c@d"), r"a\b@c");
/// ```
pub fn extract_user_name_from_scoped_name(scoped: &str) -> String {
    unescape_until_separator(scoped).0
}

/// Splits a scoped username into its unescaped username and domain.
pub fn split_scoped_name(scoped: &str) -> (String, Option<String>) {
    let (user, rest) = unescape_until_separator(scoped);
    let domain = rest.map(|rest| {
        let mut domain = String::with_capacity(rest.len());
        let mut chars = rest.chars().peekable();
        while let Some(c) = chars.next() {
            if c == ESCAPE {
                if let Some(&next) = chars.peek() {
                    if next == ESCAPE || next == SEPARATOR {
                        domain.push(next);
                        chars.next();
                        continue;
                    }
                }
            }
            domain.push(c);
        }
        domain
    });
    (user, domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_each_half() {
        assert_eq!(
            build_scoped_user_name(Some(r"a\b@c"), Some("d@e")),
            r"a\\b\@c@d\@e"
        );
        assert_eq!(build_scoped_user_name(None, Some("realm")), "@realm");
        assert_eq!(build_scoped_user_name(None, None), "");
    }

    #[test]
    fn extract_stops_at_first_unescaped_separator() {
        assert_eq!(extract_user_name_from_scoped_name("user@realm@x"), "user");
        assert_eq!(extract_user_name_from_scoped_name(r"us\@er@realm"), "us@er");
        assert_eq!(extract_user_name_from_scoped_name("user"), "user");
        assert_eq!(extract_user_name_from_scoped_name("@realm"), "");
    }

    #[test]
    fn lone_backslash_is_literal() {
        assert_eq!(extract_user_name_from_scoped_name(r"a\b"), r"a\b");
        assert_eq!(extract_user_name_from_scoped_name(r"ab\"), r"ab\");
    }

    #[test]
    fn roundtrip_with_specials() {
        for user in [r"a\b@c", r"\\", "@@", r"\@", "ünï@cødé", ""] {
            let scoped = build_scoped_user_name(Some(user), Some(r"d\@"));
            assert_eq!(extract_user_name_from_scoped_name(&scoped), user);
            assert_eq!(
                split_scoped_name(&scoped),
                (user.into(), Some(r"d\@".into()))
            );
        }
    }

    #[test]
    fn split_without_domain() {
        assert_eq!(split_scoped_name(r"a\@b"), ("a@b".into(), None));
    }
}
