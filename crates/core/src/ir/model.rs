//! Resource-level IR produced by extraction.
//!
//! Built once per resource type and consumed by synthesis; nothing here is
//! mutated after [`super::extract::extract`] returns.

use std::fmt;

use crate::typeref::TypeRef;

/// Media type used when neither the resource nor the method declares one.
pub const WILDCARD_MEDIA_TYPE: &str = "*/*";

/// How a parameter's value reaches the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Substituted into the path template.
    Path,
    /// `queryParam` on the target.
    Query,
    /// `matrixParam` on the target.
    Matrix,
    /// Added to the form body.
    Form,
    /// `header` on the request.
    Header,
    /// `cookie` on the request.
    Cookie,
    /// Aggregate whose members carry the bindings.
    Bean,
    /// Server-injected, never sent.
    Context,
    /// Unannotated parameter sent as the body.
    Entity,
}

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `@GET`
    Get,
    /// `@POST`
    Post,
    /// `@PUT`
    Put,
    /// `@DELETE`
    Delete,
}

impl Verb {
    /// `SyncInvoker` method issuing this verb.
    pub fn invoker_method(self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Delete => "delete",
        }
    }

    /// POST and PUT send a body.
    pub fn takes_entity(self) -> bool {
        matches!(self, Verb::Post | Verb::Put)
    }
}

/// Reads a member off a bean parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// Zero-argument getter method name.
    Getter(String),
    /// Directly accessible field name.
    Field(String),
}

/// Expression the generated code uses to read a bound value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    /// Name of the generated method parameter holding the value (or the bean).
    pub root: String,
    /// Member read off `root`; `None` reads `root` itself.
    pub accessor: Option<Accessor>,
}

impl CallExpr {
    /// Read a method parameter directly.
    pub fn param(name: impl Into<String>) -> Self {
        Self {
            root: name.into(),
            accessor: None,
        }
    }

    /// Read a member of the bean parameter `root`.
    pub fn member(root: impl Into<String>, accessor: Accessor) -> Self {
        Self {
            root: root.into(),
            accessor: Some(accessor),
        }
    }
}

impl fmt::Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.accessor {
            None => f.write_str(&self.root),
            Some(Accessor::Getter(getter)) => write!(f, "{}.{getter}()", self.root),
            Some(Accessor::Field(field)) => write!(f, "{}.{field}", self.root),
        }
    }
}

/// One bound parameter, field, constructor argument or bean member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamData {
    /// Where the value goes.
    pub kind: ParamKind,
    /// Wire name for query/header/form/... keys, generated name otherwise.
    pub label: String,
    /// How generated code reads the value.
    pub call: CallExpr,
    /// Declared type of the value.
    pub ty: TypeRef,
    /// Flattened members, only for [`ParamKind::Bean`].
    pub nested: Vec<ParamData>,
}

impl ParamData {
    /// Name of the generated method parameter carrying this binding.
    pub fn param_name(&self) -> &str {
        &self.call.root
    }

    /// This binding followed by its bean members.
    pub fn flatten(&self) -> impl Iterator<Item = &ParamData> {
        std::iter::once(self).chain(self.nested.iter())
    }
}

fn any_form(params: &[ParamData]) -> bool {
    params
        .iter()
        .any(|param| param.kind == ParamKind::Form || any_form(&param.nested))
}

/// One declared method of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointData {
    /// Method name, reused for the client method.
    pub name: String,
    /// Declared return type.
    pub return_type: TypeRef,
    /// Method-level `@Path`, appended to the resource path.
    pub path: Option<String>,
    /// Method-level `@Consumes`, overriding the resource's.
    pub consumes: Option<Vec<String>>,
    /// Method-level `@Produces`, overriding the resource's.
    pub produces: Option<Vec<String>>,
    /// `None` for methods that are not endpoints.
    pub verb: Option<Verb>,
    /// Parameter bindings in declaration order.
    pub params: Vec<ParamData>,
}

impl EndpointData {
    /// True when any parameter, at any bean depth, is a form field.
    pub fn has_form(&self) -> bool {
        any_form(&self.params)
    }
}

/// Everything synthesis needs to know about one resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassData {
    /// Interfaces get an implementing client; classes get a standalone one.
    pub is_interface: bool,
    /// Simple name of the resource type.
    pub class_name: String,
    /// Package of the resource, and of the client.
    pub package: String,
    /// Binary name of the resource type.
    pub qualified_name: String,
    /// Type-level `@Path` template.
    pub path: String,
    /// Type-level `@Consumes`, `*/*` when absent.
    pub consumes: Vec<String>,
    /// Type-level `@Produces`, `*/*` when absent.
    pub produces: Vec<String>,
    /// Sorted by name.
    pub methods: Vec<EndpointData>,
    /// Setter, field and constructor bindings, in that order.
    pub class_params: Vec<ParamData>,
}

impl ClassData {
    /// True when any class-level binding, at any bean depth, is a form field.
    pub fn class_params_have_form(&self) -> bool {
        any_form(&self.class_params)
    }

    /// Media types the endpoint's body is sent as.
    pub fn effective_consumes<'a>(&'a self, endpoint: &'a EndpointData) -> &'a [String] {
        endpoint.consumes.as_deref().unwrap_or(&self.consumes)
    }

    /// Media types the endpoint's response is requested in.
    pub fn effective_produces<'a>(&'a self, endpoint: &'a EndpointData) -> &'a [String] {
        endpoint.produces.as_deref().unwrap_or(&self.produces)
    }
}
