//! Short display labels from raw symbol text.
//!
//! Raw symbols are debug renderings of resolved frames, for example
//! `Symbol { name: "<trie::TrieDBMut<L> as trie::TrieMut<L>>::insert::h0123456789abcdef", lineno: 231 }`.
//! Deriving a label happens in stages:
//!
//! 1. Generic decoration is peeled off by running [`REWRITE_RULES`] until
//!    the text stops changing.
//! 2. `::h<16 hex digits>` build hashes are removed.
//! 3. The `name: ` field is extracted and unquoted.
//! 4. The path is trimmed to its last two segments (three for closures).
//! 5. `:<lineno>` is appended when the raw symbol carries a line number.

/// One rewrite over innermost `<...>` groups
pub struct RewriteRule {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

/// Rules in the order they run on each pass
pub const REWRITE_RULES: &[RewriteRule] = &[
    RewriteRule {
        name: "as-trait",
        apply: collapse_as_trait,
    },
    RewriteRule {
        name: "impl-for",
        apply: collapse_impl_for,
    },
    RewriteRule {
        name: "qualified-path",
        apply: collapse_qualified_path,
    },
    RewriteRule {
        name: "generic-args",
        apply: remove_generic_args,
    },
];

const HASH_PREFIX: &str = "::h";
const HASH_DIGITS: usize = 16;
const NAME_FIELD: &str = "name: ";
const LINENO_FIELD: &str = "lineno: ";
const PATH_SEPARATOR: &str = "::";
const CLOSURE_SEGMENT: &str = "{{closure}}";

/// Replace every innermost `<inner>` group for which `rule` yields a
/// replacement. `rule` sees the group body and the text after `>`.
fn rewrite_groups<'a>(text: &'a str, rule: impl Fn(&'a str, &'a str) -> Option<&'a str>) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'<' {
            let body = &text[i + 1..];
            if let Some(offset) = body.find(|c: char| c == '<' || c == '>') {
                let close = i + 1 + offset;
                if bytes[close] == b'>' {
                    if let Some(replacement) = rule(&text[i + 1..close], &text[close + 1..]) {
                        out.push_str(&text[copied..i]);
                        out.push_str(replacement);
                        i = close + 1;
                        copied = i;
                        continue;
                    }
                }
            }
        }
        i += 1;
    }

    out.push_str(&text[copied..]);
    out
}

/// `<T as Trait>` -> `T`
fn collapse_as_trait(text: &str) -> String {
    rewrite_groups(text, |inner, _| inner.rfind(" as ").map(|pos| &inner[..pos]))
}

/// `<impl Trait for T>` -> `T`
fn collapse_impl_for(text: &str) -> String {
    rewrite_groups(text, |inner, _| {
        let rest = inner.strip_prefix("impl ")?;
        rest.rfind(" for ").map(|pos| &rest[pos + " for ".len()..])
    })
}

/// `<T>::f` -> `T::f`
fn collapse_qualified_path(text: &str) -> String {
    rewrite_groups(text, |inner, after| after.starts_with(PATH_SEPARATOR).then_some(inner))
}

/// `Vec<T>` -> `Vec`
fn remove_generic_args(text: &str) -> String {
    rewrite_groups(text, |_, _| Some(""))
}

/// Remove every `::h<16 lowercase hex digits>`
pub fn strip_hash_suffixes(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while let Some(offset) = text[i..].find(HASH_PREFIX) {
        let start = i + offset;
        let digits_at = start + HASH_PREFIX.len();
        let is_hash = bytes.len() >= digits_at + HASH_DIGITS
            && bytes[digits_at..digits_at + HASH_DIGITS]
                .iter()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));

        if is_hash {
            out.push_str(&text[copied..start]);
            i = digits_at + HASH_DIGITS;
            copied = i;
        } else {
            i = start + 1;
        }
    }

    out.push_str(&text[copied..]);
    out
}

/// Peel generic decoration to a fixed point, then drop build hashes
pub fn simplify_symbol(symbol: &str) -> String {
    let mut current = symbol.to_string();
    loop {
        let next = REWRITE_RULES
            .iter()
            .fold(current.clone(), |text, rule| (rule.apply)(&text));
        if next == current {
            break;
        }
        current = next;
    }
    strip_hash_suffixes(&current)
}

/// Value of the first `name: ` field, ended by `, ` or a space
fn find_name_field(text: &str) -> Option<&str> {
    for (pos, _) in text.match_indices(NAME_FIELD) {
        let rest = &text[pos + NAME_FIELD.len()..];
        for (idx, c) in rest.char_indices() {
            if c == '\n' {
                break;
            }
            let end = idx + c.len_utf8();
            let tail = &rest[end..];
            if tail.starts_with(' ') || tail.starts_with(", ") {
                return Some(&rest[..end]);
            }
        }
    }
    None
}

/// Digits of the first `lineno: <digits>` field
fn find_lineno_field(text: &str) -> Option<&str> {
    text.match_indices(LINENO_FIELD).find_map(|(pos, _)| {
        let rest = &text[pos + LINENO_FIELD.len()..];
        let len = rest.bytes().take_while(u8::is_ascii_digit).count();
        (len > 0).then(|| &rest[..len])
    })
}

/// Keep the last two path segments, or three when the last is a closure
fn trim_path(name: &str) -> String {
    let parts: Vec<&str> = name.split(PATH_SEPARATOR).collect();
    let max_parts = if parts.last() == Some(&CLOSURE_SEGMENT) { 3 } else { 2 };
    if parts.len() > max_parts {
        parts[parts.len() - max_parts..].join(PATH_SEPARATOR)
    } else {
        name.to_string()
    }
}

/// Label for a single raw symbol, if it carries a `name: ` field
pub fn derive_label(symbol: &str) -> Option<String> {
    let simple = simplify_symbol(symbol);
    let name = find_name_field(&simple)?.replace('"', "");

    let mut label = trim_path(&name);
    if let Some(lineno) = find_lineno_field(symbol) {
        label.push(':');
        label.push_str(lineno);
    }
    Some(label)
}

/// Label from the first symbol that yields one, else the hex IP
pub fn label_for(ip: u64, symbols: &[String]) -> String {
    symbols
        .iter()
        .find_map(|symbol| derive_label(symbol))
        .unwrap_or_else(|| hex_ip(ip))
}

/// `0x` followed by 16 zero-padded hex digits
pub fn hex_ip(ip: u64) -> String {
    format!("{:#018x}", ip)
}

/// Escape backslashes and double quotes for a quoted DOT string
pub fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// All raw symbols, escaped and joined with DOT `\n` line breaks
pub fn symbol_tooltip(symbols: &[String]) -> String {
    symbols
        .iter()
        .map(|symbol| escape_dot(symbol))
        .collect::<Vec<_>>()
        .join("\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order() {
        let names: Vec<&str> = REWRITE_RULES.iter().map(|rule| rule.name).collect();
        assert_eq!(names, ["as-trait", "impl-for", "qualified-path", "generic-args"]);
    }

    #[test]
    fn test_as_trait_rule() {
        assert_eq!(
            collapse_as_trait("<trie::TrieDBMut as trie::TrieMut>::insert"),
            "trie::TrieDBMut::insert"
        );
        // innermost groups only
        assert_eq!(collapse_as_trait("<A<B> as C>::f"), "<A<B> as C>::f");
    }

    #[test]
    fn test_impl_for_rule() {
        assert_eq!(
            collapse_impl_for("<impl Drop for Guard>::drop"),
            "Guard::drop"
        );
        assert_eq!(collapse_impl_for("<impl Drop>::drop"), "<impl Drop>::drop");
    }

    #[test]
    fn test_qualified_path_rule() {
        assert_eq!(collapse_qualified_path("<Foo>::bar"), "Foo::bar");
        assert_eq!(collapse_qualified_path("Vec<u8>"), "Vec<u8>");
    }

    #[test]
    fn test_generic_args_rule() {
        assert_eq!(remove_generic_args("HashMap<K, V>::get"), "HashMap::get");
    }

    #[test]
    fn test_simplify_nested_generics() {
        assert_eq!(
            simplify_symbol("<trie::TrieDBMut<L> as trie::TrieMut<L>>::insert::h0123456789abcdef"),
            "trie::TrieDBMut::insert"
        );
        assert_eq!(
            simplify_symbol("<alloc::vec::Vec<T> as core::ops::Drop>::drop"),
            "alloc::vec::Vec::drop"
        );
    }

    #[test]
    fn test_strip_hash_suffixes() {
        assert_eq!(strip_hash_suffixes("foo::bar::h0123456789abcdef"), "foo::bar");
        assert_eq!(strip_hash_suffixes("a::h0123456789abcdefx"), "ax");
        // uppercase and short hashes stay
        assert_eq!(strip_hash_suffixes("a::h0123456789ABCDEF"), "a::h0123456789ABCDEF");
        assert_eq!(strip_hash_suffixes("a::h0123"), "a::h0123");
    }

    #[test]
    fn test_simplify_is_idempotent_on_plain_paths() {
        let plain = "storage::State::commit";
        assert_eq!(simplify_symbol(plain), plain);
        assert_eq!(simplify_symbol(&simplify_symbol(plain)), plain);
    }

    #[test]
    fn test_name_field_extraction() {
        assert_eq!(find_name_field("Symbol { name: a::b, lineno: 3 }"), Some("a::b"));
        assert_eq!(find_name_field("Symbol { name: a::b }"), Some("a::b"));
        assert_eq!(find_name_field("Symbol { name: a::b,x }"), Some("a::b,x"));
        assert_eq!(find_name_field("Symbol { addr: 1 }"), None);
        assert_eq!(find_name_field("name: tail"), None);
    }

    #[test]
    fn test_derive_label_with_lineno() {
        let symbol = "Symbol { name: \"<ekiden_storage::State<D> as Backend>::insert_cache::h0123456789abcdef\", lineno: 534 }";
        assert_eq!(derive_label(symbol).as_deref(), Some("State::insert_cache:534"));
    }

    #[test]
    fn test_derive_label_keeps_closure_context() {
        let symbol = "Symbol { name: trie::triedbmut::TrieDBMut::commit::{{closure}}, lineno: 848 }";
        assert_eq!(
            derive_label(symbol).as_deref(),
            Some("TrieDBMut::commit::{{closure}}:848")
        );
    }

    #[test]
    fn test_label_for_prefers_first_usable_symbol() {
        let symbols = vec![
            "foo::bar::h0123456789abcdef".to_string(),
            "Symbol { name: a::b::c, lineno: 1 }".to_string(),
            "Symbol { name: x::y, lineno: 2 }".to_string(),
        ];
        assert_eq!(label_for(0x10, &symbols), "b::c:1");
    }

    #[test]
    fn test_label_for_falls_back_to_hex() {
        let symbols = vec!["foo::bar::h0123456789abcdef".to_string()];
        assert_eq!(label_for(100, &symbols), "0x0000000000000064");
        assert_eq!(label_for(100, &[]), "0x0000000000000064");
    }

    #[test]
    fn test_symbol_tooltip_escapes() {
        let symbols = vec!["a \"q\"".to_string(), "b\\c".to_string()];
        assert_eq!(symbol_tooltip(&symbols), "a \\\"q\\\"\\nb\\\\c");
    }
}
