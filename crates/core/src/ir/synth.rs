//! Endpoint → client method.
//!
//! Builds the request chain
//! `base → path steps → query/matrix → request(produces) → header/cookie → async() → verb`
//! and, for form endpoints, the `MultivaluedHashMap` that becomes the body.

use tracing::{debug, warn};

use crate::error::GenerateError;
use crate::typeref::{RESPONSE_TYPE, TypeRef};

use super::extract::{BindingPolicy, RESERVED_LOCALS};
use super::java::{JavaExpr, JavaMethod, JavaParam, JavaStmt, Modifier, Step};
use super::model::{
    Accessor, CallExpr, ClassData, EndpointData, ParamData, ParamKind, Verb, WILDCARD_MEDIA_TYPE,
};
use super::path::{PathOp, resolve_path};
use super::utils::{NameAllocator, java_identifier};

const ENTITY: &str = "javax.ws.rs.client.Entity";
const FORM: &str = "javax.ws.rs.core.Form";
const MULTIVALUED_HASH_MAP: &str = "javax.ws.rs.core.MultivaluedHashMap";
const FUTURE: &str = "java.util.concurrent.Future";
const ARRAY_LIST: &str = "java.util.ArrayList";
const STRING: &str = "java.lang.String";
const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";
const MMAP: &str = "mmap";

fn string_map() -> TypeRef {
    TypeRef::Parameterized {
        raw: MULTIVALUED_HASH_MAP.to_string(),
        args: vec![TypeRef::class(STRING), TypeRef::class(STRING)],
    }
}

fn future_of(ty: TypeRef) -> TypeRef {
    TypeRef::Parameterized {
        raw: FUTURE.to_string(),
        args: vec![ty],
    }
}

/// Java expression reading a bound value.
pub(super) fn call_expr(call: &CallExpr) -> JavaExpr {
    let root = JavaExpr::ident(&call.root);
    match &call.accessor {
        None => root,
        Some(Accessor::Getter(getter)) => JavaExpr::call(root, getter, vec![]),
        Some(Accessor::Field(field)) => JavaExpr::Field {
            receiver: Box::new(root),
            name: field.clone(),
        },
    }
}

fn mmap_call(name: &str, args: Vec<JavaExpr>) -> JavaStmt {
    JavaStmt::Expr(JavaExpr::call(JavaExpr::ident(MMAP), name, args))
}

/// Statements adding one form binding to `mmap`. Loop variables are
/// claimed from `names`.
fn form_field(param: &ParamData, names: &mut NameAllocator) -> JavaStmt {
    let key = JavaExpr::str(&param.label);
    let value = call_expr(&param.call);
    let ty = &param.ty;

    if ty.is_string() {
        return mmap_call("add", vec![key, value]);
    }
    if let TypeRef::Primitive(primitive) = ty {
        let text = JavaExpr::static_call(primitive.wrapper(), "toString", vec![value]);
        return mmap_call("add", vec![key, text]);
    }
    if ty.is_list_like() || ty.is_set_like() {
        let element = ty.element_type();
        if element.is_string() {
            let values = if ty.is_set_like() {
                JavaExpr::New {
                    ty: TypeRef::Parameterized {
                        raw: ARRAY_LIST.to_string(),
                        args: vec![TypeRef::class(STRING)],
                    },
                    args: vec![value],
                }
            } else {
                value
            };
            return mmap_call("addAll", vec![key, values]);
        }
        let var = names.claim(&format!("{}_i", java_identifier(&param.label)));
        return JavaStmt::ForEach {
            ty: element,
            var: var.clone(),
            iterable: value,
            body: vec![mmap_call(
                "add",
                vec![key, JavaExpr::NullSafeToString(Box::new(JavaExpr::ident(var)))],
            )],
        };
    }
    mmap_call("add", vec![key, JavaExpr::NullSafeToString(Box::new(value))])
}

/// How the verb call's result is handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReturnShape {
    /// `void`: the call is a plain statement.
    Discard,
    /// `Response` (and every async `void`): returned without a witness.
    Raw,
    /// `new GenericType<T>(){}` keeps type arguments past erasure.
    Captured(TypeRef),
    /// `T.class`
    Class(TypeRef),
}

struct Synthesizer<'a> {
    class: &'a ClassData,
    endpoint: &'a EndpointData,
    verb: Verb,
    async_mode: bool,
    policy: BindingPolicy,
}

impl<'a> Synthesizer<'a> {
    fn label(&self) -> String {
        format!("{}.{}", self.class.qualified_name, self.endpoint.name)
    }

    /// Class bindings then endpoint bindings. `@Context` values only reach
    /// the signature of interface implementations.
    fn bindings(&self) -> impl Iterator<Item = &'a ParamData> + 'a {
        let keep_context = self.class.is_interface;
        self.class
            .class_params
            .iter()
            .chain(self.endpoint.params.iter())
            .filter(move |param| keep_context || param.kind != ParamKind::Context)
    }

    /// Leaf bindings with bean members expanded in place.
    fn leaves(&self) -> impl Iterator<Item = &'a ParamData> + 'a {
        self.bindings().flat_map(|param| {
            let own = (param.kind != ParamKind::Bean).then_some(param);
            own.into_iter().chain(param.nested.iter())
        })
    }

    fn return_shape(&self) -> ReturnShape {
        let ty = &self.endpoint.return_type;
        if ty.is_void() {
            if self.async_mode {
                ReturnShape::Raw
            } else {
                ReturnShape::Discard
            }
        } else if ty.is_response() {
            ReturnShape::Raw
        } else if ty.is_parameterized() {
            ReturnShape::Captured(ty.clone())
        } else {
            ReturnShape::Class(ty.boxed())
        }
    }

    fn return_type(&self) -> TypeRef {
        let ty = &self.endpoint.return_type;
        if !self.async_mode {
            return ty.clone();
        }
        if ty.is_void() || ty.is_response() {
            future_of(TypeRef::class(RESPONSE_TYPE))
        } else {
            future_of(ty.boxed())
        }
    }

    /// Allocator holding every name already visible in the method body.
    fn local_names(&self) -> NameAllocator {
        let mut names = NameAllocator::new();
        for local in RESERVED_LOCALS {
            names.reserve(local);
        }
        for param in self.bindings() {
            names.reserve(param.param_name());
        }
        names
    }

    fn params(&self) -> Vec<JavaParam> {
        self.bindings()
            .map(|param| JavaParam {
                ty: param.ty.clone(),
                name: param.param_name().to_string(),
            })
            .collect()
    }

    /// Form statements and the name of the resulting `Form` local.
    fn form_entity(&self, body: &mut Vec<JavaStmt>) -> Option<String> {
        if !self.endpoint.has_form() && !self.class.class_params_have_form() {
            return None;
        }
        if !self.verb.takes_entity() {
            warn!(
                "{}: form params ignored on {} endpoint",
                self.label(),
                self.verb.invoker_method()
            );
            return None;
        }

        body.push(JavaStmt::Local {
            ty: string_map(),
            name: MMAP.to_string(),
            init: JavaExpr::New {
                ty: string_map(),
                args: vec![],
            },
        });
        let mut names = self.local_names();
        body.extend(
            self.leaves()
                .filter(|param| param.kind == ParamKind::Form)
                .map(|param| form_field(param, &mut names)),
        );

        let name = if names.is_taken("entity") {
            names.claim("formEntity")
        } else {
            names.claim("entity")
        };
        body.push(JavaStmt::Local {
            ty: TypeRef::class(FORM),
            name: name.clone(),
            init: JavaExpr::New {
                ty: TypeRef::class(FORM),
                args: vec![JavaExpr::ident(MMAP)],
            },
        });
        Some(name)
    }

    fn path_steps(&self) -> Result<Vec<Step>, GenerateError> {
        let params = self
            .class
            .class_params
            .iter()
            .chain(self.endpoint.params.iter());
        let ops = resolve_path(
            &self.label(),
            &self.class.path,
            self.endpoint.path.as_deref(),
            params,
            self.policy,
        )?;
        Ok(ops
            .into_iter()
            .map(|op| match op {
                PathOp::Literal(segment) => Step::new("path", vec![JavaExpr::str(segment)]),
                PathOp::Bound { call, .. } => Step::new("path", vec![call_expr(&call)]),
            })
            .collect())
    }

    fn request_steps(&self) -> Result<Vec<Step>, GenerateError> {
        let mut target = Vec::new();
        let mut request = Vec::new();
        for param in self.leaves() {
            let key = JavaExpr::str(&param.label);
            let value = call_expr(&param.call);
            match param.kind {
                ParamKind::Query => target.push(Step::new("queryParam", vec![key, value])),
                ParamKind::Matrix => target.push(Step::new("matrixParam", vec![key, value])),
                ParamKind::Header => request.push(Step::new("header", vec![key, value])),
                ParamKind::Cookie if param.ty.is_cookie() => {
                    request.push(Step::new("cookie", vec![value]));
                }
                ParamKind::Cookie if param.ty.is_string() => {
                    request.push(Step::new("cookie", vec![key, value]));
                }
                ParamKind::Cookie => {
                    return Err(GenerateError::UnsupportedCookieType {
                        label: param.label.clone(),
                        ty: param.ty.clone(),
                    });
                }
                _ => {}
            }
        }

        let produces = self
            .class
            .effective_produces(self.endpoint)
            .iter()
            .map(JavaExpr::str)
            .collect();
        target.push(Step::new("request", produces));
        target.extend(request);
        if self.async_mode {
            target.push(Step::new("async", vec![]));
        }
        Ok(target)
    }

    /// Body argument for POST/PUT.
    fn entity_arg(&self, form: Option<String>) -> JavaExpr {
        let (value, media) = match form {
            Some(name) => (JavaExpr::ident(name), FORM_MEDIA_TYPE.to_string()),
            None => {
                let body = self
                    .endpoint
                    .params
                    .iter()
                    .rev()
                    .find(|param| param.kind == ParamKind::Entity)
                    .map(|param| JavaExpr::ident(param.param_name()));
                let body = body.unwrap_or_else(|| {
                    warn!("{}: no entity parameter, sending null", self.label());
                    JavaExpr::Literal("null".to_string())
                });
                let media = self
                    .class
                    .effective_consumes(self.endpoint)
                    .first()
                    .cloned()
                    .unwrap_or_else(|| WILDCARD_MEDIA_TYPE.to_string());
                (body, media)
            }
        };
        JavaExpr::static_call(ENTITY, "entity", vec![value, JavaExpr::str(media)])
    }

    fn synthesize(&self) -> Result<JavaMethod, GenerateError> {
        let mut body = Vec::new();
        let form = self.form_entity(&mut body);

        let mut steps = self.path_steps()?;
        steps.extend(self.request_steps()?);

        let mut args = Vec::new();
        if self.verb.takes_entity() {
            args.push(self.entity_arg(form));
        }
        let shape = self.return_shape();
        match &shape {
            ReturnShape::Captured(ty) => args.push(JavaExpr::GenericCapture(ty.clone())),
            ReturnShape::Class(ty) => args.push(JavaExpr::ClassLiteral(ty.clone())),
            ReturnShape::Discard | ReturnShape::Raw => {}
        }
        steps.push(Step::new(self.verb.invoker_method(), args));

        let chain = JavaExpr::Chain {
            receiver: Box::new(JavaExpr::ident("base")),
            steps,
        };
        body.push(if shape == ReturnShape::Discard {
            JavaStmt::Expr(chain)
        } else {
            JavaStmt::Return(chain)
        });

        debug!("Synthesized {} ({:?})", self.label(), self.verb);
        Ok(JavaMethod {
            annotations: Vec::new(),
            modifiers: vec![Modifier::Public],
            return_type: self.return_type(),
            name: self.endpoint.name.clone(),
            params: self.params(),
            body,
        })
    }
}

/// Build the client method for one verb-bearing endpoint.
pub(super) fn synthesize_endpoint(
    class: &ClassData,
    endpoint: &EndpointData,
    verb: Verb,
    async_mode: bool,
    policy: BindingPolicy,
) -> Result<JavaMethod, GenerateError> {
    Synthesizer {
        class,
        endpoint,
        verb,
        async_mode: async_mode && !class.is_interface,
        policy,
    }
    .synthesize()
}
