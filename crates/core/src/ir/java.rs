//! Java AST for generated clients.
//!
//! Types reuse [`TypeRef`]; everything else is the small subset of Java the
//! generator needs: one class with fields, constructors and methods made of
//! local declarations, call chains, returns and for-each loops.

use crate::typeref::TypeRef;

/// Canonical pieces of a class name, e.g. `com.acme` + `[Outer, Inner]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName {
    /// Dotted package, empty for the default package.
    pub package: String,
    /// Outermost class first.
    pub simple_names: Vec<String>,
}

impl ClassName {
    /// Split a binary name (`com.acme.Outer$Inner`).
    pub fn from_binary(name: &str) -> Self {
        let (package, simple) = name.rsplit_once('.').unwrap_or(("", name));
        Self {
            package: package.to_string(),
            simple_names: simple.split('$').map(str::to_string).collect(),
        }
    }

    /// Name of the outermost class, the one an import refers to.
    pub fn top_level(&self) -> &str {
        self.simple_names.first().map_or("", String::as_str)
    }

    /// Source spelling relative to an import of the top-level class.
    pub fn nested_path(&self) -> String {
        self.simple_names.join(".")
    }

    /// Fully qualified source spelling.
    pub fn canonical(&self) -> String {
        if self.package.is_empty() {
            self.nested_path()
        } else {
            format!("{}.{}", self.package, self.nested_path())
        }
    }

    /// Fully qualified name of the top-level class.
    pub fn top_level_canonical(&self) -> String {
        if self.package.is_empty() {
            self.top_level().to_string()
        } else {
            format!("{}.{}", self.package, self.top_level())
        }
    }
}

/// One `.name(args)` step of a call chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Method name.
    pub name: String,
    /// Call arguments.
    pub args: Vec<JavaExpr>,
}

impl Step {
    /// Step calling `name` with `args`.
    pub fn new(name: impl Into<String>, args: Vec<JavaExpr>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Java expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JavaExpr {
    /// Local, parameter or field: `entity`
    Ident(String),
    /// String literal: `"application/json"`
    Str(String),
    /// Keyword or numeric literal: `null`, `false`, `0`
    Literal(String),
    /// Class literal: `Item.class`
    ClassLiteral(TypeRef),
    /// Anonymous type capture: `new GenericType<List<Item>>(){}`
    GenericCapture(TypeRef),
    /// Instance creation: `new Form(mmap)`
    New {
        /// Instantiated type.
        ty: TypeRef,
        /// Constructor arguments.
        args: Vec<JavaExpr>,
    },
    /// Static call: `Long.toString(count)`
    StaticCall {
        /// Class declaring the method.
        owner: TypeRef,
        /// Method name.
        name: String,
        /// Call arguments.
        args: Vec<JavaExpr>,
    },
    /// Single method call kept on one line: `bean.getId()`
    Call {
        /// Object the method is called on.
        receiver: Box<JavaExpr>,
        /// Method name.
        name: String,
        /// Call arguments.
        args: Vec<JavaExpr>,
    },
    /// Field read: `bean.id`
    Field {
        /// Object owning the field.
        receiver: Box<JavaExpr>,
        /// Field name.
        name: String,
    },
    /// Fluent call chain, wrapped before every step after the first.
    Chain {
        /// Start of the chain.
        receiver: Box<JavaExpr>,
        /// Calls in order.
        steps: Vec<Step>,
    },
    /// `x != null ? x.toString() : null`
    NullSafeToString(Box<JavaExpr>),
}

impl JavaExpr {
    /// Identifier expression.
    pub fn ident(name: impl Into<String>) -> Self {
        JavaExpr::Ident(name.into())
    }

    /// String literal; escaped on emission.
    pub fn str(value: impl Into<String>) -> Self {
        JavaExpr::Str(value.into())
    }

    /// Instance method call.
    pub fn call(receiver: JavaExpr, name: impl Into<String>, args: Vec<JavaExpr>) -> Self {
        JavaExpr::Call {
            receiver: Box::new(receiver),
            name: name.into(),
            args,
        }
    }

    /// Static call on the class named `owner`.
    pub fn static_call(owner: &str, name: impl Into<String>, args: Vec<JavaExpr>) -> Self {
        JavaExpr::StaticCall {
            owner: TypeRef::class(owner),
            name: name.into(),
            args,
        }
    }
}

/// Java statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JavaStmt {
    /// `Type name = init;`
    Local {
        /// Declared type.
        ty: TypeRef,
        /// Variable name.
        name: String,
        /// Initializer.
        init: JavaExpr,
    },
    /// `target = value;`
    Assign {
        /// Assigned field or local.
        target: String,
        /// New value.
        value: JavaExpr,
    },
    /// `expr;`
    Expr(JavaExpr),
    /// `return expr;`
    Return(JavaExpr),
    /// `for (Type var : iterable) { body }`
    ForEach {
        /// Element type.
        ty: TypeRef,
        /// Loop variable.
        var: String,
        /// Collection iterated over.
        iterable: JavaExpr,
        /// Loop body.
        body: Vec<JavaStmt>,
    },
}

/// Declaration modifiers the generated code uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// `public`
    Public,
    /// `private`
    Private,
    /// `final`
    Final,
}

impl Modifier {
    /// Source keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Final => "final",
        }
    }
}

/// Method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaParam {
    /// Declared type.
    pub ty: TypeRef,
    /// Parameter name.
    pub name: String,
}

/// Field declaration without initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaField {
    /// Modifiers in source order.
    pub modifiers: Vec<Modifier>,
    /// Declared type.
    pub ty: TypeRef,
    /// Field name.
    pub name: String,
}

/// Constructor of the enclosing [`TypeSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaConstructor {
    /// Modifiers in source order.
    pub modifiers: Vec<Modifier>,
    /// Parameters in order.
    pub params: Vec<JavaParam>,
    /// Statements in order.
    pub body: Vec<JavaStmt>,
}

/// Method declaration with a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaMethod {
    /// Qualified annotation type names, e.g. `java.lang.Override`.
    pub annotations: Vec<String>,
    /// Modifiers in source order.
    pub modifiers: Vec<Modifier>,
    /// Declared return type.
    pub return_type: TypeRef,
    /// Method name.
    pub name: String,
    /// Parameters in order.
    pub params: Vec<JavaParam>,
    /// Statements in order.
    pub body: Vec<JavaStmt>,
}

/// A top-level class declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    /// Class modifiers.
    pub modifiers: Vec<Modifier>,
    /// Simple class name.
    pub name: String,
    /// Implemented interfaces.
    pub superinterfaces: Vec<TypeRef>,
    /// Fields, emitted first.
    pub fields: Vec<JavaField>,
    /// Constructors, emitted after the fields.
    pub constructors: Vec<JavaConstructor>,
    /// Methods, emitted last.
    pub methods: Vec<JavaMethod>,
}

/// One generated compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaFile {
    /// Package declaration; empty for the default package.
    pub package: String,
    /// The single class in the file.
    pub type_spec: TypeSpec,
}

impl JavaFile {
    /// `com/acme/ItemsClient.java` for package `com.acme`.
    pub fn relative_path(&self) -> std::path::PathBuf {
        let mut path: std::path::PathBuf = self
            .package
            .split('.')
            .filter(|part| !part.is_empty())
            .collect();
        path.push(format!("{}.java", self.type_spec.name));
        path
    }
}
