//! Java code emission via the Emit trait.
//!
//! Output follows JavaPoet conventions: sorted single-type imports, no
//! `java.lang` or same-package imports, 4-space indentation, one blank line
//! between members, and call chains that break before every step after the
//! first with an 8-space continuation indent.

use std::collections::{BTreeSet, HashMap};

use crate::typeref::{TypeRef, WildcardBound};

use super::java::{
    ClassName, JavaConstructor, JavaExpr, JavaField, JavaFile, JavaMethod, JavaParam, JavaStmt,
    Modifier, Step, TypeSpec,
};
use super::utils::escape_java_string;

const GENERIC_TYPE: &str = "javax.ws.rs.core.GenericType";

const INDENT: &str = "    ";
const CONTINUATION: &str = "        ";

/// Simple-name resolution for one compilation unit.
///
/// The first class seen for a simple name owns it; later classes with the
/// same simple name are written fully qualified.
#[derive(Debug, Default)]
pub struct NameTable {
    package: String,
    claims: HashMap<String, String>,
    imports: BTreeSet<String>,
}

impl NameTable {
    /// Collect every class `file` references. The file's own class claims
    /// its simple name first.
    pub fn for_file(file: &JavaFile) -> Self {
        let mut table = NameTable {
            package: file.package.clone(),
            ..NameTable::default()
        };
        let own = if file.package.is_empty() {
            file.type_spec.name.clone()
        } else {
            format!("{}.{}", file.package, file.type_spec.name)
        };
        table.claims.insert(file.type_spec.name.clone(), own);
        table.visit_type_spec(&file.type_spec);
        table
    }

    /// Classes visible without an import.
    fn is_implicit(&self, class: &ClassName) -> bool {
        class.package.is_empty() || class.package == "java.lang" || class.package == self.package
    }

    fn register(&mut self, binary: &str) {
        let class = ClassName::from_binary(binary);
        if self.claims.contains_key(class.top_level()) {
            return;
        }
        let canonical = class.top_level_canonical();
        if !self.is_implicit(&class) {
            self.imports.insert(canonical.clone());
        }
        self.claims.insert(class.top_level().to_string(), canonical);
    }

    /// Source spelling of the class with the given binary name.
    pub fn reference(&self, binary: &str) -> String {
        let class = ClassName::from_binary(binary);
        match self.claims.get(class.top_level()) {
            Some(owner) if *owner == class.top_level_canonical() => class.nested_path(),
            None if self.is_implicit(&class) => class.nested_path(),
            _ => class.canonical(),
        }
    }

    /// Sorted import list.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    fn visit_type(&mut self, ty: &TypeRef) {
        match ty {
            TypeRef::Void | TypeRef::Primitive(_) | TypeRef::Wildcard(None) => {}
            TypeRef::Class(name) => self.register(name),
            TypeRef::Parameterized { raw, args } => {
                self.register(raw);
                for arg in args {
                    self.visit_type(arg);
                }
            }
            TypeRef::Array(inner) => self.visit_type(inner),
            TypeRef::Wildcard(Some(WildcardBound::Extends(bound) | WildcardBound::Super(bound))) => {
                self.visit_type(bound);
            }
        }
    }

    fn visit_exprs(&mut self, exprs: &[JavaExpr]) {
        for expr in exprs {
            self.visit_expr(expr);
        }
    }

    fn visit_expr(&mut self, expr: &JavaExpr) {
        match expr {
            JavaExpr::Ident(_) | JavaExpr::Str(_) | JavaExpr::Literal(_) => {}
            JavaExpr::ClassLiteral(ty) => self.visit_type(ty),
            JavaExpr::GenericCapture(ty) => {
                self.register(GENERIC_TYPE);
                self.visit_type(ty);
            }
            JavaExpr::New { ty, args } => {
                self.visit_type(ty);
                self.visit_exprs(args);
            }
            JavaExpr::StaticCall { owner, args, .. } => {
                self.visit_type(owner);
                self.visit_exprs(args);
            }
            JavaExpr::Call { receiver, args, .. } => {
                self.visit_expr(receiver);
                self.visit_exprs(args);
            }
            JavaExpr::Field { receiver, .. } | JavaExpr::NullSafeToString(receiver) => {
                self.visit_expr(receiver);
            }
            JavaExpr::Chain { receiver, steps } => {
                self.visit_expr(receiver);
                for step in steps {
                    self.visit_exprs(&step.args);
                }
            }
        }
    }

    fn visit_stmts(&mut self, stmts: &[JavaStmt]) {
        for stmt in stmts {
            match stmt {
                JavaStmt::Local { ty, init, .. } => {
                    self.visit_type(ty);
                    self.visit_expr(init);
                }
                JavaStmt::Assign { value: expr, .. }
                | JavaStmt::Expr(expr)
                | JavaStmt::Return(expr) => self.visit_expr(expr),
                JavaStmt::ForEach {
                    ty, iterable, body, ..
                } => {
                    self.visit_type(ty);
                    self.visit_expr(iterable);
                    self.visit_stmts(body);
                }
            }
        }
    }

    fn visit_params(&mut self, params: &[JavaParam]) {
        for param in params {
            self.visit_type(&param.ty);
        }
    }

    fn visit_type_spec(&mut self, spec: &TypeSpec) {
        for iface in &spec.superinterfaces {
            self.visit_type(iface);
        }
        for field in &spec.fields {
            self.visit_type(&field.ty);
        }
        for ctor in &spec.constructors {
            self.visit_params(&ctor.params);
            self.visit_stmts(&ctor.body);
        }
        for method in &spec.methods {
            for annotation in &method.annotations {
                self.register(annotation);
            }
            self.visit_type(&method.return_type);
            self.visit_params(&method.params);
            self.visit_stmts(&method.body);
        }
    }
}

/// Trait for emitting Java source from AST nodes.
pub trait Emit {
    /// Render the node, resolving class names through `names`.
    fn emit(&self, names: &NameTable) -> String;
}

/// Prefix every non-empty line with `prefix`.
fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn emit_list<T: Emit>(items: &[T], names: &NameTable) -> String {
    items
        .iter()
        .map(|item| item.emit(names))
        .collect::<Vec<_>>()
        .join(", ")
}

fn emit_modifiers(modifiers: &[Modifier]) -> String {
    modifiers
        .iter()
        .map(|m| format!("{} ", m.keyword()))
        .collect()
}

fn emit_block(body: &[JavaStmt], names: &NameTable) -> String {
    let mut out = String::from("{\n");
    for stmt in body {
        out.push_str(&indent(&stmt.emit(names), INDENT));
        out.push('\n');
    }
    out.push('}');
    out
}

// =============================================================================
// Types and expressions
// =============================================================================

impl Emit for TypeRef {
    fn emit(&self, names: &NameTable) -> String {
        match self {
            TypeRef::Void => "void".to_string(),
            TypeRef::Primitive(p) => p.keyword().to_string(),
            TypeRef::Class(name) => names.reference(name),
            TypeRef::Parameterized { raw, args } => {
                format!("{}<{}>", names.reference(raw), emit_list(args, names))
            }
            TypeRef::Array(inner) => format!("{}[]", inner.emit(names)),
            TypeRef::Wildcard(None) => "?".to_string(),
            TypeRef::Wildcard(Some(WildcardBound::Extends(bound))) => {
                format!("? extends {}", bound.emit(names))
            }
            TypeRef::Wildcard(Some(WildcardBound::Super(bound))) => {
                format!("? super {}", bound.emit(names))
            }
        }
    }
}

impl Emit for Step {
    fn emit(&self, names: &NameTable) -> String {
        format!(".{}({})", self.name, emit_list(&self.args, names))
    }
}

impl Emit for JavaExpr {
    fn emit(&self, names: &NameTable) -> String {
        match self {
            JavaExpr::Ident(name) | JavaExpr::Literal(name) => name.clone(),
            JavaExpr::Str(value) => format!("\"{}\"", escape_java_string(value)),
            JavaExpr::ClassLiteral(ty) => format!("{}.class", ty.emit(names)),
            JavaExpr::GenericCapture(ty) => format!(
                "new {}<{}>(){{}}",
                names.reference(GENERIC_TYPE),
                ty.emit(names)
            ),
            JavaExpr::New { ty, args } => {
                format!("new {}({})", ty.emit(names), emit_list(args, names))
            }
            JavaExpr::StaticCall { owner, name, args } => {
                format!("{}.{name}({})", owner.emit(names), emit_list(args, names))
            }
            JavaExpr::Call {
                receiver,
                name,
                args,
            } => format!("{}.{name}({})", receiver.emit(names), emit_list(args, names)),
            JavaExpr::Field { receiver, name } => format!("{}.{name}", receiver.emit(names)),
            JavaExpr::Chain { receiver, steps } => {
                let mut out = receiver.emit(names);
                for (i, step) in steps.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                        out.push_str(CONTINUATION);
                    }
                    out.push_str(&step.emit(names));
                }
                out
            }
            JavaExpr::NullSafeToString(value) => {
                let value = value.emit(names);
                format!("{value} != null ? {value}.toString() : null")
            }
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for JavaStmt {
    fn emit(&self, names: &NameTable) -> String {
        match self {
            JavaStmt::Local { ty, name, init } => {
                format!("{} {name} = {};", ty.emit(names), init.emit(names))
            }
            JavaStmt::Assign { target, value } => format!("{target} = {};", value.emit(names)),
            JavaStmt::Expr(expr) => format!("{};", expr.emit(names)),
            JavaStmt::Return(expr) => format!("return {};", expr.emit(names)),
            JavaStmt::ForEach {
                ty,
                var,
                iterable,
                body,
            } => format!(
                "for ({} {var} : {}) {}",
                ty.emit(names),
                iterable.emit(names),
                emit_block(body, names)
            ),
        }
    }
}

// =============================================================================
// Members
// =============================================================================

impl Emit for JavaParam {
    fn emit(&self, names: &NameTable) -> String {
        format!("{} {}", self.ty.emit(names), self.name)
    }
}

impl Emit for JavaField {
    fn emit(&self, names: &NameTable) -> String {
        format!(
            "{}{} {};",
            emit_modifiers(&self.modifiers),
            self.ty.emit(names),
            self.name
        )
    }
}

impl Emit for JavaMethod {
    fn emit(&self, names: &NameTable) -> String {
        let mut out = String::new();
        for annotation in &self.annotations {
            out.push('@');
            out.push_str(&names.reference(annotation));
            out.push('\n');
        }
        out.push_str(&format!(
            "{}{} {}({}) {}",
            emit_modifiers(&self.modifiers),
            self.return_type.emit(names),
            self.name,
            emit_list(&self.params, names),
            emit_block(&self.body, names)
        ));
        out
    }
}

fn emit_constructor(ctor: &JavaConstructor, class_name: &str, names: &NameTable) -> String {
    format!(
        "{}{class_name}({}) {}",
        emit_modifiers(&ctor.modifiers),
        emit_list(&ctor.params, names),
        emit_block(&ctor.body, names)
    )
}

impl Emit for TypeSpec {
    fn emit(&self, names: &NameTable) -> String {
        let mut out = format!("{}class {}", emit_modifiers(&self.modifiers), self.name);
        if !self.superinterfaces.is_empty() {
            out.push_str(" implements ");
            out.push_str(&emit_list(&self.superinterfaces, names));
        }
        out.push_str(" {\n");

        let members: Vec<String> = self
            .fields
            .iter()
            .map(|field| field.emit(names))
            .chain(
                self.constructors
                    .iter()
                    .map(|ctor| emit_constructor(ctor, &self.name, names)),
            )
            .chain(self.methods.iter().map(|method| method.emit(names)))
            .collect();
        for (i, member) in members.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&indent(member, INDENT));
            out.push('\n');
        }
        out.push_str("}\n");
        out
    }
}

impl Emit for JavaFile {
    fn emit(&self, names: &NameTable) -> String {
        let mut out = String::new();
        if !self.package.is_empty() {
            out.push_str(&format!("package {};\n\n", self.package));
        }
        let mut has_imports = false;
        for import in names.imports() {
            out.push_str(&format!("import {import};\n"));
            has_imports = true;
        }
        if has_imports {
            out.push('\n');
        }
        out.push_str(&self.type_spec.emit(names));
        out
    }
}

impl JavaFile {
    /// Render the complete source file.
    pub fn to_source(&self) -> String {
        let names = NameTable::for_file(self);
        self.emit(&names)
    }
}
