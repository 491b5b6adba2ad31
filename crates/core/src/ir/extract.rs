//! Resource type → [`ClassData`].
//!
//! Binding annotations are matched against an ordered rule table, once per
//! annotated element. Class-level bindings (setter-style methods, fields,
//! constructor parameters) are collected first so that endpoint parameter
//! names never shadow them.

use tracing::{debug, warn};

use crate::descriptor::{Annotation, MethodDecl, TypeIntrospect, TypeLookup};
use crate::error::GenerateError;
use crate::typeref::TypeRef;

use super::bean::resolve_bean;
use super::model::{CallExpr, ClassData, EndpointData, ParamData, ParamKind, Verb, WILDCARD_MEDIA_TYPE};
use super::utils::{NameAllocator, java_identifier};

/// What to do when one element carries conflicting metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BindingPolicy {
    /// First binding annotation wins, last verb wins, last unannotated
    /// parameter is the body, inaccessible bean members are dropped.
    #[default]
    Lenient,
    /// Each of those situations is an error.
    Strict,
}

/// Names the generated code already uses for its own locals and fields.
pub(super) const RESERVED_LOCALS: [&str; 2] = ["base", "mmap"];

#[derive(Debug, Clone, Copy)]
enum LabelRule {
    /// The annotation's value is the wire name.
    AnnotationValue,
    /// No wire name; numbered per method starting from this base.
    Numbered(&'static str),
}

#[derive(Debug)]
struct BindingRule {
    kind: ParamKind,
    matches: fn(&Annotation) -> bool,
    label: LabelRule,
}

static BINDING_RULES: [BindingRule; 8] = [
    BindingRule {
        kind: ParamKind::Path,
        matches: |a| matches!(a, Annotation::PathParam(_)),
        label: LabelRule::AnnotationValue,
    },
    BindingRule {
        kind: ParamKind::Query,
        matches: |a| matches!(a, Annotation::QueryParam(_)),
        label: LabelRule::AnnotationValue,
    },
    BindingRule {
        kind: ParamKind::Context,
        matches: |a| matches!(a, Annotation::Context),
        label: LabelRule::Numbered("context"),
    },
    BindingRule {
        kind: ParamKind::Matrix,
        matches: |a| matches!(a, Annotation::MatrixParam(_)),
        label: LabelRule::AnnotationValue,
    },
    BindingRule {
        kind: ParamKind::Header,
        matches: |a| matches!(a, Annotation::HeaderParam(_)),
        label: LabelRule::AnnotationValue,
    },
    BindingRule {
        kind: ParamKind::Form,
        matches: |a| matches!(a, Annotation::FormParam(_)),
        label: LabelRule::AnnotationValue,
    },
    BindingRule {
        kind: ParamKind::Cookie,
        matches: |a| matches!(a, Annotation::CookieParam(_)),
        label: LabelRule::AnnotationValue,
    },
    BindingRule {
        kind: ParamKind::Bean,
        matches: |a| matches!(a, Annotation::BeanParam),
        label: LabelRule::Numbered("beanParam"),
    },
];

fn binding_value(annotation: &Annotation) -> &str {
    match annotation {
        Annotation::PathParam(value)
        | Annotation::QueryParam(value)
        | Annotation::MatrixParam(value)
        | Annotation::HeaderParam(value)
        | Annotation::FormParam(value)
        | Annotation::CookieParam(value) => value,
        _ => "",
    }
}

/// Binding resolved from one element's annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Binding {
    pub kind: ParamKind,
    /// Wire name, or `None` for synthesized labels.
    pub wire: Option<String>,
    base: &'static str,
}

impl Binding {
    pub(super) fn entity() -> Self {
        Self {
            kind: ParamKind::Entity,
            wire: None,
            base: "entity",
        }
    }

    /// Claim a parameter name and produce `(label, name)`.
    pub(super) fn name(&self, names: &mut NameAllocator) -> (String, String) {
        match &self.wire {
            Some(wire) => (wire.clone(), names.claim(&java_identifier(wire))),
            None => {
                let name = names.claim(self.base);
                (name.clone(), name)
            }
        }
    }
}

/// Match `annotations` against the rule table; the first match wins.
pub(super) fn resolve_binding(
    annotations: &[Annotation],
    element: &str,
    policy: BindingPolicy,
) -> Result<Option<Binding>, GenerateError> {
    let mut found: Option<Binding> = None;
    for annotation in annotations {
        let Some(rule) = BINDING_RULES.iter().find(|rule| (rule.matches)(annotation)) else {
            continue;
        };
        if found.is_some() {
            if policy == BindingPolicy::Strict {
                return Err(GenerateError::AmbiguousBinding {
                    element: element.to_string(),
                });
            }
            debug!("{element}: ignoring extra binding {annotation:?}");
            continue;
        }
        found = Some(match rule.label {
            LabelRule::AnnotationValue => Binding {
                kind: rule.kind,
                wire: Some(binding_value(annotation).to_string()),
                base: "",
            },
            LabelRule::Numbered(base) => Binding {
                kind: rule.kind,
                wire: None,
                base,
            },
        });
    }
    Ok(found)
}

/// Shared state while extracting one resource type.
struct Extractor<'a> {
    resource: &'a dyn TypeIntrospect,
    lookup: &'a dyn TypeLookup,
    policy: BindingPolicy,
}

impl Extractor<'_> {
    fn bind(
        &self,
        binding: &Binding,
        ty: &TypeRef,
        names: &mut NameAllocator,
    ) -> Result<ParamData, GenerateError> {
        let (label, name) = binding.name(names);
        let nested = if binding.kind == ParamKind::Bean {
            resolve_bean(ty, &name, self.lookup, self.policy)?
        } else {
            Vec::new()
        };
        Ok(ParamData {
            kind: binding.kind,
            label,
            call: CallExpr::param(name),
            ty: ty.clone(),
            nested,
        })
    }

    fn element(&self, member: &str) -> String {
        format!("{}.{member}", self.resource.qualified_name())
    }

    fn class_params(
        &self,
        methods: &[&MethodDecl],
        names: &mut NameAllocator,
    ) -> Result<Vec<ParamData>, GenerateError> {
        let mut params = Vec::new();

        for method in methods {
            if !is_setter_style(method) {
                continue;
            }
            let element = self.element(&method.name);
            if let Some(binding) = resolve_binding(&method.annotations, &element, self.policy)? {
                params.push(self.bind(&binding, &method.params[0].ty, names)?);
            }
        }

        for field in self.resource.declared_fields() {
            let element = self.element(&field.name);
            if let Some(binding) = resolve_binding(&field.annotations, &element, self.policy)? {
                params.push(self.bind(&binding, &field.ty, names)?);
            }
        }

        for (ctor_idx, ctor) in self.resource.declared_constructors().iter().enumerate() {
            for (idx, param) in ctor.params.iter().enumerate() {
                let element = self.element(&format!("<init>#{ctor_idx}({idx})"));
                if let Some(binding) = resolve_binding(&param.annotations, &element, self.policy)? {
                    params.push(self.bind(&binding, &param.ty, names)?);
                }
            }
        }

        Ok(params)
    }

    fn endpoint(
        &self,
        method: &MethodDecl,
        class_names: &NameAllocator,
    ) -> Result<EndpointData, GenerateError> {
        let mut path = None;
        let mut consumes = None;
        let mut produces = None;
        let mut verb = None;
        for annotation in &method.annotations {
            let next_verb = match annotation {
                Annotation::Path(value) => {
                    path = Some(value.clone());
                    continue;
                }
                Annotation::Consumes(values) => {
                    consumes = Some(media_types(values));
                    continue;
                }
                Annotation::Produces(values) => {
                    produces = Some(media_types(values));
                    continue;
                }
                Annotation::Get => Verb::Get,
                Annotation::Post => Verb::Post,
                Annotation::Put => Verb::Put,
                Annotation::Delete => Verb::Delete,
                _ => continue,
            };
            if verb.is_some() && self.policy == BindingPolicy::Strict {
                return Err(GenerateError::MultipleVerbs {
                    method: self.element(&method.name),
                });
            }
            verb = Some(next_verb);
        }

        let mut names = class_names.clone();
        let mut params = Vec::with_capacity(method.params.len());
        let mut entities = 0usize;
        for (idx, param) in method.params.iter().enumerate() {
            let element = self.element(&format!("{}({idx})", method.name));
            let binding = match resolve_binding(&param.annotations, &element, self.policy)? {
                Some(binding) => binding,
                None => {
                    entities += 1;
                    Binding::entity()
                }
            };
            params.push(self.bind(&binding, &param.ty, &mut names)?);
        }

        if verb.is_some() && entities > 1 {
            if self.policy == BindingPolicy::Strict {
                return Err(GenerateError::MultipleEntities {
                    method: self.element(&method.name),
                });
            }
            warn!(
                "{}: {entities} unannotated parameters, the last one is sent as the body",
                self.element(&method.name)
            );
        }

        Ok(EndpointData {
            name: method.name.clone(),
            return_type: method.returns.clone(),
            path,
            consumes,
            produces,
            verb,
            params,
        })
    }
}

/// Verb-less `setX(value)` methods contribute class-level bindings.
fn is_setter_style(method: &MethodDecl) -> bool {
    method.name.starts_with("set")
        && method.params.len() == 1
        && !method.annotations.iter().any(|a| {
            matches!(
                a,
                Annotation::Get | Annotation::Post | Annotation::Put | Annotation::Delete
            )
        })
}

fn media_types(values: &[String]) -> Vec<String> {
    if values.is_empty() {
        vec![WILDCARD_MEDIA_TYPE.to_string()]
    } else {
        values.to_vec()
    }
}

fn class_media_types(annotations: &[Annotation], consumes: bool) -> Vec<String> {
    annotations
        .iter()
        .find_map(|annotation| match annotation {
            Annotation::Consumes(values) if consumes => Some(media_types(values)),
            Annotation::Produces(values) if !consumes => Some(media_types(values)),
            _ => None,
        })
        .unwrap_or_else(|| vec![WILDCARD_MEDIA_TYPE.to_string()])
}

/// Extract the IR for one resource type.
pub fn extract(
    resource: &dyn TypeIntrospect,
    lookup: &dyn TypeLookup,
    policy: BindingPolicy,
) -> Result<ClassData, GenerateError> {
    let path = resource
        .root_path()
        .ok_or_else(|| GenerateError::MissingRootPath(resource.qualified_name().to_string()))?
        .to_string();

    let mut methods: Vec<&MethodDecl> = resource.declared_methods().iter().collect();
    methods.sort_by(|l, r| l.name.cmp(&r.name));

    let extractor = Extractor {
        resource,
        lookup,
        policy,
    };

    let mut names = NameAllocator::new();
    for local in RESERVED_LOCALS {
        names.reserve(local);
    }
    let class_params = extractor.class_params(&methods, &mut names)?;

    let endpoints = methods
        .iter()
        .map(|method| extractor.endpoint(method, &names))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Extracted {} ({} methods, {} class params)",
        resource.qualified_name(),
        endpoints.len(),
        class_params.len()
    );

    Ok(ClassData {
        is_interface: resource.is_interface(),
        class_name: resource.simple_name().to_string(),
        package: resource.package().to_string(),
        qualified_name: resource.qualified_name().to_string(),
        path,
        consumes: class_media_types(resource.annotations(), true),
        produces: class_media_types(resource.annotations(), false),
        methods: endpoints,
        class_params,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::descriptor::{ConstructorDecl, DescriptorBundle, FieldDecl, ParamDecl, TypeDescriptor};
    use crate::ir::model::Accessor;

    fn ty(expr: &str) -> TypeRef {
        TypeRef::parse(expr).unwrap()
    }

    fn param(expr: &str, annotations: Vec<Annotation>) -> ParamDecl {
        ParamDecl {
            ty: ty(expr),
            annotations,
        }
    }

    fn method(name: &str, annotations: Vec<Annotation>, params: Vec<ParamDecl>) -> MethodDecl {
        MethodDecl {
            name: name.into(),
            returns: TypeRef::Void,
            annotations,
            params,
        }
    }

    fn resource(methods: Vec<MethodDecl>) -> TypeDescriptor {
        TypeDescriptor {
            name: "com.acme.Orders".into(),
            interface: true,
            annotations: vec![Annotation::Path("orders".into())],
            methods,
            fields: vec![],
            constructors: vec![],
        }
    }

    fn bundle(types: Vec<TypeDescriptor>) -> DescriptorBundle {
        DescriptorBundle { types }
    }

    #[test]
    fn test_missing_root_path() {
        let mut orders = resource(vec![]);
        orders.annotations.clear();
        let err = extract(&orders, &bundle(vec![]), BindingPolicy::Lenient).unwrap_err();
        assert_eq!(err, GenerateError::MissingRootPath("com.acme.Orders".into()));
    }

    #[test]
    fn test_defaults_and_sorting() {
        let orders = resource(vec![
            method("update", vec![Annotation::Put], vec![]),
            method("create", vec![Annotation::Post], vec![]),
            method("ping", vec![], vec![]),
        ]);
        let class = extract(&orders, &bundle(vec![]), BindingPolicy::Lenient).unwrap();

        assert_eq!(class.class_name, "Orders");
        assert_eq!(class.package, "com.acme");
        assert_eq!(class.consumes, vec!["*/*".to_string()]);
        assert_eq!(class.produces, vec!["*/*".to_string()]);
        let names: Vec<_> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["create", "ping", "update"]);
        assert_eq!(class.methods[1].verb, None);
    }

    #[test]
    fn test_param_kinds_and_labels() {
        let orders = resource(vec![method(
            "find",
            vec![Annotation::Get, Annotation::Path("{id}".into())],
            vec![
                param("String", vec![Annotation::PathParam("id".into())]),
                param("String", vec![Annotation::HeaderParam("X-Trace-Id".into())]),
                param("javax.ws.rs.core.UriInfo", vec![Annotation::Context]),
                param("javax.ws.rs.core.HttpHeaders", vec![Annotation::Context]),
                param("com.acme.Order", vec![]),
            ],
        )]);
        let class = extract(&orders, &bundle(vec![]), BindingPolicy::Lenient).unwrap();
        let find = &class.methods[0];

        assert_eq!(find.verb, Some(Verb::Get));
        assert_eq!(find.path.as_deref(), Some("{id}"));
        let summary: Vec<_> = find
            .params
            .iter()
            .map(|p| (p.kind, p.label.as_str(), p.param_name()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ParamKind::Path, "id", "id"),
                (ParamKind::Header, "X-Trace-Id", "xTraceId"),
                (ParamKind::Context, "context", "context"),
                (ParamKind::Context, "context2", "context2"),
                (ParamKind::Entity, "entity", "entity"),
            ]
        );
    }

    #[test]
    fn test_first_binding_wins_when_lenient() {
        let orders = resource(vec![method(
            "find",
            vec![Annotation::Get],
            vec![param(
                "String",
                vec![
                    Annotation::Other("javax.validation.constraints.NotNull".into()),
                    Annotation::QueryParam("q".into()),
                    Annotation::HeaderParam("h".into()),
                ],
            )],
        )]);
        let class = extract(&orders, &bundle(vec![]), BindingPolicy::Lenient).unwrap();
        assert_eq!(class.methods[0].params[0].kind, ParamKind::Query);

        let err = extract(&orders, &bundle(vec![]), BindingPolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            GenerateError::AmbiguousBinding {
                element: "com.acme.Orders.find(0)".into()
            }
        );
    }

    #[test]
    fn test_last_verb_wins_when_lenient() {
        let orders = resource(vec![method(
            "touch",
            vec![Annotation::Get, Annotation::Put],
            vec![],
        )]);
        let class = extract(&orders, &bundle(vec![]), BindingPolicy::Lenient).unwrap();
        assert_eq!(class.methods[0].verb, Some(Verb::Put));

        let err = extract(&orders, &bundle(vec![]), BindingPolicy::Strict).unwrap_err();
        assert!(matches!(err, GenerateError::MultipleVerbs { .. }));
    }

    #[test]
    fn test_multiple_entities() {
        let orders = resource(vec![method(
            "merge",
            vec![Annotation::Post],
            vec![param("com.acme.Order", vec![]), param("com.acme.Order", vec![])],
        )]);
        let class = extract(&orders, &bundle(vec![]), BindingPolicy::Lenient).unwrap();
        let names: Vec<_> = class.methods[0].params.iter().map(|p| p.param_name()).collect();
        assert_eq!(names, vec!["entity", "entity2"]);

        let err = extract(&orders, &bundle(vec![]), BindingPolicy::Strict).unwrap_err();
        assert!(matches!(err, GenerateError::MultipleEntities { .. }));
    }

    #[test]
    fn test_class_params_order_and_names() {
        let stock = TypeDescriptor {
            name: "com.acme.Stock".into(),
            interface: false,
            annotations: vec![Annotation::Path("stock/{warehouse}".into())],
            methods: vec![
                method(
                    "setTraceId",
                    vec![Annotation::HeaderParam("X-Trace-Id".into())],
                    vec![param("String", vec![])],
                ),
                method("setIgnored", vec![], vec![param("String", vec![])]),
                method(
                    "levels",
                    vec![Annotation::Get],
                    vec![param("String", vec![Annotation::QueryParam("region".into())])],
                ),
            ],
            fields: vec![FieldDecl {
                name: "warehouse".into(),
                ty: ty("String"),
                private: true,
                annotations: vec![Annotation::PathParam("warehouse".into())],
            }],
            constructors: vec![ConstructorDecl {
                params: vec![param("long", vec![Annotation::QueryParam("region".into())])],
            }],
        };
        let class = extract(&stock, &bundle(vec![]), BindingPolicy::Lenient).unwrap();

        let summary: Vec<_> = class
            .class_params
            .iter()
            .map(|p| (p.kind, p.label.as_str(), p.param_name()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ParamKind::Header, "X-Trace-Id", "xTraceId"),
                (ParamKind::Path, "warehouse", "warehouse"),
                (ParamKind::Query, "region", "region"),
            ]
        );

        let levels = class.methods.iter().find(|m| m.name == "levels").unwrap();
        assert_eq!(levels.params[0].label, "region");
        assert_eq!(levels.params[0].param_name(), "region2");
    }

    #[test]
    fn test_reserved_locals_are_renamed() {
        let orders = resource(vec![method(
            "find",
            vec![Annotation::Get],
            vec![param("String", vec![Annotation::QueryParam("base".into())])],
        )]);
        let class = extract(&orders, &bundle(vec![]), BindingPolicy::Lenient).unwrap();
        assert_eq!(class.methods[0].params[0].label, "base");
        assert_eq!(class.methods[0].params[0].param_name(), "base2");
    }

    #[test]
    fn test_bean_params_are_flattened() {
        let filter = TypeDescriptor {
            name: "com.acme.Filter".into(),
            interface: false,
            annotations: vec![],
            methods: vec![method("getStatus", vec![], vec![])],
            fields: vec![FieldDecl {
                name: "status".into(),
                ty: ty("String"),
                private: true,
                annotations: vec![Annotation::QueryParam("status".into())],
            }],
            constructors: vec![],
        };
        let orders = resource(vec![method(
            "search",
            vec![Annotation::Get],
            vec![param("com.acme.Filter", vec![Annotation::BeanParam])],
        )]);
        let class = extract(&orders, &bundle(vec![filter]), BindingPolicy::Lenient).unwrap();

        let bean = &class.methods[0].params[0];
        assert_eq!(bean.kind, ParamKind::Bean);
        assert_eq!(bean.param_name(), "beanParam");
        assert_eq!(
            bean.nested[0].call,
            CallExpr::member("beanParam", Accessor::Getter("getStatus".into()))
        );
    }

    #[test]
    fn test_unknown_bean_type() {
        let orders = resource(vec![method(
            "search",
            vec![Annotation::Get],
            vec![param("com.acme.Filter", vec![Annotation::BeanParam])],
        )]);
        let err = extract(&orders, &bundle(vec![]), BindingPolicy::Lenient).unwrap_err();
        assert_eq!(err, GenerateError::UnknownBeanType("com.acme.Filter".into()));
    }

    #[test]
    fn test_empty_media_type_list_falls_back_to_wildcard() {
        let orders = resource(vec![method(
            "find",
            vec![Annotation::Get, Annotation::Produces(vec![])],
            vec![],
        )]);
        let class = extract(&orders, &bundle(vec![]), BindingPolicy::Lenient).unwrap();
        assert_eq!(class.methods[0].produces, Some(vec!["*/*".to_string()]));
    }
}
