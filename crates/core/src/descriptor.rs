//! Capability interface the generator reads resource types through.
//!
//! The core never discovers or loads types itself. Callers hand it something
//! implementing [`TypeIntrospect`] (the resource) and [`TypeLookup`] (every
//! other type the resource may reference, used for bean parameters).
//!
//! [`DescriptorBundle`] is the bundled implementation: plain declaration data
//! deserialized from JSON or YAML descriptor files.

use serde::{Deserialize, Serialize};

use crate::typeref::TypeRef;

/// JAX-RS annotations the generator understands.
///
/// Serialized externally tagged in snake_case, e.g. `{"path": "items"}`,
/// `"get"`, `{"query_param": "limit"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    /// `@Path` template.
    Path(String),
    /// `@Consumes` media types.
    Consumes(Vec<String>),
    /// `@Produces` media types.
    Produces(Vec<String>),
    /// `@GET`
    #[serde(alias = "GET")]
    Get,
    /// `@POST`
    #[serde(alias = "POST")]
    Post,
    /// `@PUT`
    #[serde(alias = "PUT")]
    Put,
    /// `@DELETE`
    #[serde(alias = "DELETE")]
    Delete,
    /// `@PathParam` with the template variable name.
    PathParam(String),
    /// `@QueryParam`
    QueryParam(String),
    /// `@MatrixParam`
    MatrixParam(String),
    /// `@FormParam`
    FormParam(String),
    /// `@HeaderParam`
    HeaderParam(String),
    /// `@CookieParam`
    CookieParam(String),
    /// `@BeanParam`: members of the parameter's type carry the bindings.
    BeanParam,
    /// `@Context`: injected by the server, never sent.
    Context,
    /// Any annotation the generator ignores, kept by name.
    Other(String),
}

impl Annotation {
    /// Template of a `@Path` annotation.
    pub fn path(&self) -> Option<&str> {
        match self {
            Annotation::Path(path) => Some(path),
            _ => None,
        }
    }
}

/// Method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Annotations on the parameter.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

fn void() -> TypeRef {
    TypeRef::Void
}

/// Declared method. `returns` defaults to `void`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Method name.
    pub name: String,
    /// Return type.
    #[serde(default = "void")]
    pub returns: TypeRef,
    /// Annotations on the method.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub params: Vec<ParamDecl>,
}

/// Declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Private fields cannot be read directly from generated code.
    #[serde(default)]
    pub private: bool,
    /// Annotations on the field.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Declared constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorDecl {
    /// Parameters in declaration order.
    #[serde(default)]
    pub params: Vec<ParamDecl>,
}

/// Read access to one declared type.
pub trait TypeIntrospect {
    /// Binary name, e.g. `com.acme.Outer$Inner`.
    fn qualified_name(&self) -> &str;
    /// True for interfaces, false for classes.
    fn is_interface(&self) -> bool;
    /// Type-level annotations.
    fn annotations(&self) -> &[Annotation];
    /// Methods declared by the type itself, inherited ones excluded.
    fn declared_methods(&self) -> &[MethodDecl];
    /// Fields declared by the type itself.
    fn declared_fields(&self) -> &[FieldDecl];
    /// Constructors in declaration order.
    fn declared_constructors(&self) -> &[ConstructorDecl];

    /// Name after the last `.` or `$`.
    fn simple_name(&self) -> &str {
        let name = self.qualified_name();
        let start = name.rfind(['.', '$']).map_or(0, |idx| idx + 1);
        &name[start..]
    }

    /// Everything before the last `.`; empty for the default package.
    fn package(&self) -> &str {
        let name = self.qualified_name();
        name.rfind('.').map_or("", |idx| &name[..idx])
    }

    /// Value of the type-level `@Path`, if any.
    fn root_path(&self) -> Option<&str> {
        self.annotations().iter().find_map(Annotation::path)
    }
}

/// Resolves referenced types by qualified name.
pub trait TypeLookup {
    /// The type named `qualified_name`, if known.
    fn lookup(&self, qualified_name: &str) -> Option<&dyn TypeIntrospect>;
}

/// One type as written in a descriptor file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Binary name, e.g. `com.acme.ItemEndpoint`.
    pub name: String,
    /// Interface rather than class.
    #[serde(default)]
    pub interface: bool,
    /// Type-level annotations.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Declared methods.
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    /// Declared fields.
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    /// Declared constructors.
    #[serde(default)]
    pub constructors: Vec<ConstructorDecl>,
}

impl TypeIntrospect for TypeDescriptor {
    fn qualified_name(&self) -> &str {
        &self.name
    }

    fn is_interface(&self) -> bool {
        self.interface
    }

    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    fn declared_methods(&self) -> &[MethodDecl] {
        &self.methods
    }

    fn declared_fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    fn declared_constructors(&self) -> &[ConstructorDecl] {
        &self.constructors
    }
}

/// Contents of a descriptor file: `{ "types": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorBundle {
    /// Every type in the file, resources and beans alike.
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

impl DescriptorBundle {
    /// Types carrying a root `@Path`, in declaration order.
    pub fn resources(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter().filter(|ty| ty.root_path().is_some())
    }

    /// Append the types of `other`. A name already present keeps its first
    /// definition; the skipped names are returned.
    pub fn merge(&mut self, other: DescriptorBundle) -> Vec<String> {
        let mut skipped = Vec::new();
        for ty in other.types {
            if self.types.iter().any(|existing| existing.name == ty.name) {
                skipped.push(ty.name);
            } else {
                self.types.push(ty);
            }
        }
        skipped
    }
}

impl TypeLookup for DescriptorBundle {
    fn lookup(&self, qualified_name: &str) -> Option<&dyn TypeIntrospect> {
        self.types
            .iter()
            .find(|ty| ty.name == qualified_name)
            .map(|ty| -> &dyn TypeIntrospect { ty })
    }
}
