//! Naming and literal helpers shared by extraction and emission.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Java keywords and literals that cannot be used as identifiers.
pub static JAVA_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "abstract",
        "assert",
        "boolean",
        "break",
        "byte",
        "case",
        "catch",
        "char",
        "class",
        "const",
        "continue",
        "default",
        "do",
        "double",
        "else",
        "enum",
        "extends",
        "false",
        "final",
        "finally",
        "float",
        "for",
        "goto",
        "if",
        "implements",
        "import",
        "instanceof",
        "int",
        "interface",
        "long",
        "native",
        "new",
        "null",
        "package",
        "private",
        "protected",
        "public",
        "return",
        "short",
        "static",
        "strictfp",
        "super",
        "switch",
        "synchronized",
        "this",
        "throw",
        "throws",
        "transient",
        "true",
        "try",
        "void",
        "volatile",
        "while",
        "_",
    ]
    .into_iter()
    .collect()
});

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// True if `name` can be used verbatim as a Java identifier.
pub fn is_java_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_ident_start)
        && chars.all(is_ident_part)
        && !JAVA_RESERVED_WORDS.contains(name)
}

/// Turn a wire label into a Java parameter name.
///
/// Valid identifiers are kept as-is. Anything else is split on
/// non-identifier characters and joined in camelCase (`X-Trace-Id` →
/// `xTraceId`); a leading digit or a reserved word gets a `_` prefix.
pub fn java_identifier(label: &str) -> String {
    if is_java_identifier(label) {
        return label.to_string();
    }

    let mut result = String::new();
    for part in label.split(|c: char| !is_ident_part(c)) {
        let mut chars = part.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        if result.is_empty() {
            result.extend(first.to_lowercase());
        } else {
            result.extend(first.to_uppercase());
        }
        result.extend(chars);
    }

    if result.is_empty() {
        return "value".to_string();
    }
    if !result.starts_with(is_ident_start) || JAVA_RESERVED_WORDS.contains(result.as_str()) {
        result.insert(0, '_');
    }
    result
}

/// Escape a string for a Java string literal.
pub fn escape_java_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// Hands out unique names: `entity`, then `entity2`, `entity3`, ...
#[derive(Debug, Default, Clone)]
pub struct NameAllocator {
    taken: HashSet<String>,
}

impl NameAllocator {
    /// Allocator with no names taken.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` as used without renaming it.
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    /// True once `name` is reserved or claimed.
    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// `base` if free, else `base` with the first free numeric suffix.
    pub fn claim(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_java_identifier() {
        assert_eq!(java_identifier("limit"), "limit");
        assert_eq!(java_identifier("Limit"), "Limit");
        assert_eq!(java_identifier("X-Trace-Id"), "xTraceId");
        assert_eq!(java_identifier("page.size"), "pageSize");
        assert_eq!(java_identifier("class"), "_class");
        assert_eq!(java_identifier("2fa"), "_2fa");
        assert_eq!(java_identifier("--"), "value");
        assert_eq!(java_identifier(""), "value");
    }

    #[test]
    fn test_is_java_identifier() {
        assert!(is_java_identifier("entity"));
        assert!(is_java_identifier("$x_1"));
        assert!(!is_java_identifier("new"));
        assert!(!is_java_identifier("a-b"));
        assert!(!is_java_identifier(""));
    }

    #[test]
    fn test_escape_java_string() {
        assert_eq!(escape_java_string(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape_java_string("line\nnext"), "line\\nnext");
    }

    #[test]
    fn test_name_allocator() {
        let mut names = NameAllocator::new();
        names.reserve("base");
        assert!(names.is_taken("base"));
        assert_eq!(names.claim("context"), "context");
        assert_eq!(names.claim("context"), "context2");
        assert_eq!(names.claim("context"), "context3");
        assert_eq!(names.claim("base"), "base2");
    }
}
