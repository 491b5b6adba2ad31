//! Java type expressions as they appear in resource descriptors.
//!
//! Descriptors spell types the way Java source does:
//! `java.util.List<com.acme.Item>`, `long`, `void`, `byte[]`,
//! `java.util.Map<String, java.util.List<Long>>`. Nested classes use the
//! binary `$` separator (`com.acme.Outer$Inner`).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `java.lang` types that may be written without their package.
const JAVA_LANG_TYPES: [&str; 14] = [
    "Boolean",
    "Byte",
    "CharSequence",
    "Character",
    "Double",
    "Float",
    "Integer",
    "Iterable",
    "Long",
    "Number",
    "Object",
    "Short",
    "String",
    "Void",
];

const LIST_TYPES: [&str; 4] = [
    "java.util.List",
    "java.util.ArrayList",
    "java.util.LinkedList",
    "java.util.concurrent.CopyOnWriteArrayList",
];

const SET_TYPES: [&str; 5] = [
    "java.util.Set",
    "java.util.HashSet",
    "java.util.LinkedHashSet",
    "java.util.SortedSet",
    "java.util.TreeSet",
];

pub(crate) const RESPONSE_TYPE: &str = "javax.ws.rs.core.Response";
pub(crate) const COOKIE_TYPE: &str = "javax.ws.rs.core.Cookie";
const STRING_TYPE: &str = "java.lang.String";

/// Java primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    /// `boolean`
    Boolean,
    /// `byte`
    Byte,
    /// `short`
    Short,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `char`
    Char,
}

impl Primitive {
    /// Primitive spelled by `keyword`, if any.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "boolean" => Primitive::Boolean,
            "byte" => Primitive::Byte,
            "short" => Primitive::Short,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            "char" => Primitive::Char,
            _ => return None,
        })
    }

    /// Java keyword of this primitive.
    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Char => "char",
        }
    }

    /// Fully qualified name of the boxing class.
    pub fn wrapper(self) -> &'static str {
        match self {
            Primitive::Boolean => "java.lang.Boolean",
            Primitive::Byte => "java.lang.Byte",
            Primitive::Short => "java.lang.Short",
            Primitive::Int => "java.lang.Integer",
            Primitive::Long => "java.lang.Long",
            Primitive::Float => "java.lang.Float",
            Primitive::Double => "java.lang.Double",
            Primitive::Char => "java.lang.Character",
        }
    }
}

/// Bound of a `?` wildcard type argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    /// `? extends T`
    Extends(Box<TypeRef>),
    /// `? super T`
    Super(Box<TypeRef>),
}

/// A (possibly generic) Java type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    /// `void`, only valid as a return type.
    Void,
    /// A primitive such as `int`.
    Primitive(Primitive),
    /// Non-generic class or interface, fully qualified.
    Class(String),
    /// Generic class applied to type arguments.
    Parameterized {
        /// Fully qualified erased class name.
        raw: String,
        /// Type arguments in declaration order.
        args: Vec<TypeRef>,
    },
    /// `T[]`
    Array(Box<TypeRef>),
    /// `?`, optionally bounded. Only appears as a type argument.
    Wildcard(Option<WildcardBound>),
}

impl TypeRef {
    /// Parse a Java type expression.
    pub fn parse(input: &str) -> Result<Self, TypeParseError> {
        let mut parser = Parser::new(input);
        parser.skip_ws();
        if parser.at_end() {
            return Err(TypeParseError::Empty);
        }
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if !parser.at_end() {
            return Err(parser.unexpected());
        }
        Ok(ty)
    }

    /// Non-generic class reference.
    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class(name.into())
    }

    /// True for `void`.
    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }

    /// True when the type carries type arguments.
    pub fn is_parameterized(&self) -> bool {
        matches!(self, TypeRef::Parameterized { .. })
    }

    /// Erased class name for class and parameterized types.
    pub fn raw_name(&self) -> Option<&str> {
        match self {
            TypeRef::Class(name) | TypeRef::Parameterized { raw: name, .. } => Some(name),
            _ => None,
        }
    }

    /// Type arguments; empty for anything but a parameterized type.
    pub fn type_args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Parameterized { args, .. } => args,
            _ => &[],
        }
    }

    /// Primitives become their wrapper class; everything else is unchanged.
    pub fn boxed(&self) -> TypeRef {
        match self {
            TypeRef::Primitive(p) => TypeRef::Class(p.wrapper().to_string()),
            other => other.clone(),
        }
    }

    /// True for `java.lang.String`.
    pub fn is_string(&self) -> bool {
        matches!(self, TypeRef::Class(name) if name == STRING_TYPE)
    }

    /// True for `List` and the common `List` implementations.
    pub fn is_list_like(&self) -> bool {
        self.raw_name().is_some_and(|raw| LIST_TYPES.contains(&raw))
    }

    /// True for `Set` and the common `Set` implementations.
    pub fn is_set_like(&self) -> bool {
        self.raw_name().is_some_and(|raw| SET_TYPES.contains(&raw))
    }

    /// The raw JAX-RS response, returned without an entity type witness.
    pub fn is_response(&self) -> bool {
        matches!(self, TypeRef::Class(name) if name == RESPONSE_TYPE)
    }

    /// True for `javax.ws.rs.core.Cookie`.
    pub fn is_cookie(&self) -> bool {
        matches!(self, TypeRef::Class(name) if name == COOKIE_TYPE)
    }

    /// Literal a stub method returns for this type; `None` for `void`.
    pub fn zero_value(&self) -> Option<&'static str> {
        match self {
            TypeRef::Void => None,
            TypeRef::Primitive(Primitive::Boolean) => Some("false"),
            TypeRef::Primitive(_) => Some("0"),
            _ => Some("null"),
        }
    }

    /// Element type of a collection, `Object` when the collection is raw.
    pub fn element_type(&self) -> TypeRef {
        match self.type_args().first() {
            Some(TypeRef::Wildcard(Some(WildcardBound::Extends(bound)))) => (**bound).clone(),
            Some(TypeRef::Wildcard(_)) | None => TypeRef::class("java.lang.Object"),
            Some(arg) => arg.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => f.write_str("void"),
            TypeRef::Primitive(p) => f.write_str(p.keyword()),
            TypeRef::Class(name) => f.write_str(name),
            TypeRef::Parameterized { raw, args } => {
                write!(f, "{raw}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            TypeRef::Array(inner) => write!(f, "{inner}[]"),
            TypeRef::Wildcard(None) => f.write_str("?"),
            TypeRef::Wildcard(Some(WildcardBound::Extends(bound))) => write!(f, "? extends {bound}"),
            TypeRef::Wildcard(Some(WildcardBound::Super(bound))) => write!(f, "? super {bound}"),
        }
    }
}

impl TryFrom<String> for TypeRef {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

/// Failure to read a Java type expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    /// Nothing but whitespace.
    #[error("empty type expression")]
    Empty,
    /// A character that cannot appear at this point.
    #[error("unexpected `{found}` at offset {offset} in type `{input}`")]
    Unexpected {
        /// The whole expression.
        input: String,
        /// Character offset of `found`.
        offset: usize,
        /// The offending character.
        found: char,
    },
    /// Input ended inside a type argument list or array suffix.
    #[error("type expression `{0}` ends early")]
    UnexpectedEnd(String),
    /// Type arguments on `void`, a primitive or a wildcard.
    #[error("`{0}` cannot take type arguments")]
    NotGeneric(String),
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }
}

impl Parser<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), TypeParseError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> TypeParseError {
        match self.peek() {
            Some(found) => TypeParseError::Unexpected {
                input: self.input.to_string(),
                offset: self.pos,
                found,
            },
            None => TypeParseError::UnexpectedEnd(self.input.to_string()),
        }
    }

    fn ident(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn parse_type(&mut self) -> Result<TypeRef, TypeParseError> {
        let mut ty = if self.eat('?') {
            self.parse_wildcard()?
        } else {
            self.parse_named()?
        };
        while self.eat('[') {
            self.expect(']')?;
            ty = TypeRef::Array(Box::new(ty));
        }
        Ok(ty)
    }

    fn parse_wildcard(&mut self) -> Result<TypeRef, TypeParseError> {
        self.skip_ws();
        let save = self.pos;
        match self.ident().as_str() {
            "extends" => Ok(TypeRef::Wildcard(Some(WildcardBound::Extends(Box::new(
                self.parse_type()?,
            ))))),
            "super" => Ok(TypeRef::Wildcard(Some(WildcardBound::Super(Box::new(
                self.parse_type()?,
            ))))),
            _ => {
                self.pos = save;
                Ok(TypeRef::Wildcard(None))
            }
        }
    }

    fn parse_named(&mut self) -> Result<TypeRef, TypeParseError> {
        self.skip_ws();
        let mut name = self.ident();
        if name.is_empty() {
            return Err(self.unexpected());
        }
        while self.peek() == Some('.') {
            self.pos += 1;
            let part = self.ident();
            if part.is_empty() {
                return Err(self.unexpected());
            }
            name.push('.');
            name.push_str(&part);
        }

        let simple = if name == "void" {
            Some(TypeRef::Void)
        } else {
            Primitive::from_keyword(&name).map(TypeRef::Primitive)
        };
        if let Some(ty) = simple {
            self.skip_ws();
            if self.peek() == Some('<') {
                return Err(TypeParseError::NotGeneric(name));
            }
            return Ok(ty);
        }

        let raw = qualify_java_lang(name);
        if !self.eat('<') {
            return Ok(TypeRef::Class(raw));
        }
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type()?);
            if self.eat(',') {
                continue;
            }
            self.expect('>')?;
            break;
        }
        Ok(TypeRef::Parameterized { raw, args })
    }
}

fn qualify_java_lang(name: String) -> String {
    if JAVA_LANG_TYPES.contains(&name.as_str()) {
        format!("java.lang.{name}")
    } else {
        name
    }
}
