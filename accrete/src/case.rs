//! Key normalisation shared by the environment and argument sources.

use heck::ToLowerCamelCase;

/// Convert a delimiter- or boundary-separated identifier into camel case.
///
/// Words are split on any non-alphanumeric character and on case
/// boundaries (`fooBar`, `XMLHttp`). The first word is lowercased; each
/// following word is lowercased with its first character capitalised.
///
/// # Examples
///
/// ```rust
/// use accrete::camel_case;
///
/// assert_eq!(camel_case("FOO_BAR"), "fooBar");
/// assert_eq!(camel_case("foo-bar"), "fooBar");
/// assert_eq!(camel_case("fooBar"), "fooBar");
/// ```
#[must_use]
pub fn camel_case(raw: &str) -> String {
    raw.to_lower_camel_case()
}

/// Returns the remainder of `key` after `prefix`, or `None` when `key` does
/// not start with it.
///
/// Matching is exact: no case folding and no delimiter handling.
#[must_use]
pub fn strip_prefix<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    key.strip_prefix(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("FOO_BAR", "fooBar")]
    #[case("FOO", "foo")]
    #[case("foo", "foo")]
    #[case("foo-bar", "fooBar")]
    #[case("foo_bar_baz", "fooBarBaz")]
    #[case("fooBar", "fooBar")]
    #[case("FooBar", "fooBar")]
    #[case("XMLHttpRequest", "xmlHttpRequest")]
    #[case("HTTP_PORT", "httpPort")]
    #[case("__foo__bar__", "fooBar")]
    #[case("foo.bar baz", "fooBarBaz")]
    #[case("LEVEL2_CACHE", "level2Cache")]
    #[case("v2Api", "v2Api")]
    #[case("", "")]
    #[case("___", "")]
    fn converts_to_camel_case(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(camel_case(raw), expected);
    }

    #[rstest]
    #[case("BAR_FOO", "BAR_", Some("FOO"))]
    #[case("FOO_BAR", "BAR_", None)]
    #[case("bar_foo", "BAR_", None)]
    #[case("ANYTHING", "", Some("ANYTHING"))]
    #[case("BAR_", "BAR_", Some(""))]
    fn strips_exact_prefixes(
        #[case] key: &str,
        #[case] prefix: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(strip_prefix(key, prefix), expected);
    }
}
