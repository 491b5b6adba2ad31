//! Flattening of `@BeanParam` aggregates.
//!
//! Each bound member of the bean type (fields, then constructor parameters)
//! becomes a nested [`ParamData`] read through a getter when one exists, or
//! through the field itself when it is not private. Nesting is one level deep.

use tracing::{debug, warn};

use crate::descriptor::{FieldDecl, TypeIntrospect, TypeLookup};
use crate::error::GenerateError;
use crate::typeref::TypeRef;

use super::extract::{BindingPolicy, resolve_binding};
use super::model::{Accessor, CallExpr, ParamData, ParamKind};
use super::utils::NameAllocator;

/// First zero-argument `get*`/`is*` method whose lower-cased name ends with
/// `member_lower`.
fn find_getter<'a>(bean: &'a dyn TypeIntrospect, member_lower: &str) -> Option<&'a str> {
    bean.declared_methods()
        .iter()
        .find(|method| {
            method.params.is_empty()
                && (method.name.starts_with("get") || method.name.starts_with("is"))
                && method.name.to_lowercase().ends_with(member_lower)
        })
        .map(|method| method.name.as_str())
}

fn accessible_field<'a>(bean: &'a dyn TypeIntrospect, name: &str) -> Option<&'a FieldDecl> {
    bean.declared_fields()
        .iter()
        .find(|field| field.name == name && !field.private)
}

struct BeanResolver<'a> {
    bean: &'a dyn TypeIntrospect,
    root: &'a str,
    policy: BindingPolicy,
    labels: NameAllocator,
    members: Vec<ParamData>,
}

impl BeanResolver<'_> {
    fn element(&self, member: &str) -> String {
        format!("{}.{member}", self.bean.qualified_name())
    }

    fn push(
        &mut self,
        member: &str,
        kind: ParamKind,
        label: String,
        ty: &TypeRef,
        accessor: Option<Accessor>,
    ) -> Result<(), GenerateError> {
        let Some(accessor) = accessor else {
            if self.policy == BindingPolicy::Strict {
                return Err(GenerateError::InaccessibleBeanMember {
                    bean: self.bean.qualified_name().to_string(),
                    member: member.to_string(),
                });
            }
            warn!(
                "{}: no getter for `{member}` and the field is not accessible, binding `{label}` dropped",
                self.bean.qualified_name()
            );
            return Ok(());
        };
        self.members.push(ParamData {
            kind,
            label,
            call: CallExpr::member(self.root, accessor),
            ty: ty.clone(),
            nested: Vec::new(),
        });
        Ok(())
    }

    fn fields(&mut self) -> Result<(), GenerateError> {
        let bean = self.bean;
        for field in bean.declared_fields() {
            let element = self.element(&field.name);
            let Some(binding) = resolve_binding(&field.annotations, &element, self.policy)? else {
                continue;
            };
            if binding.kind == ParamKind::Bean {
                debug!("{element}: nested bean params are not flattened");
                continue;
            }
            let (label, _) = binding.name(&mut self.labels);
            let accessor = find_getter(bean, &field.name.to_lowercase())
                .map(|getter| Accessor::Getter(getter.to_string()))
                .or_else(|| (!field.private).then(|| Accessor::Field(field.name.clone())));
            self.push(&field.name, binding.kind, label, &field.ty, accessor)?;
        }
        Ok(())
    }

    fn constructor_params(&mut self) -> Result<(), GenerateError> {
        let bean = self.bean;
        for (ctor_idx, ctor) in bean.declared_constructors().iter().enumerate() {
            for (idx, param) in ctor.params.iter().enumerate() {
                let element = self.element(&format!("<init>#{ctor_idx}({idx})"));
                let Some(binding) = resolve_binding(&param.annotations, &element, self.policy)?
                else {
                    continue;
                };
                if binding.kind == ParamKind::Bean {
                    debug!("{element}: nested bean params are not flattened");
                    continue;
                }
                let (label, _) = binding.name(&mut self.labels);
                let accessor = find_getter(bean, &label.to_lowercase())
                    .map(|getter| Accessor::Getter(getter.to_string()))
                    .or_else(|| {
                        accessible_field(bean, &label).map(|field| Accessor::Field(field.name.clone()))
                    });
                let member = label.clone();
                self.push(&member, binding.kind, label, &param.ty, accessor)?;
            }
        }
        Ok(())
    }
}

/// Resolve the bound members of the bean parameter `root` of type `ty`.
pub(super) fn resolve_bean(
    ty: &TypeRef,
    root: &str,
    lookup: &dyn TypeLookup,
    policy: BindingPolicy,
) -> Result<Vec<ParamData>, GenerateError> {
    let bean = ty
        .raw_name()
        .and_then(|raw| lookup.lookup(raw))
        .ok_or_else(|| GenerateError::UnknownBeanType(ty.to_string()))?;

    let mut resolver = BeanResolver {
        bean,
        root,
        policy,
        labels: NameAllocator::new(),
        members: Vec::new(),
    };
    resolver.fields()?;
    resolver.constructor_params()?;

    debug!(
        "Flattened bean {} into {} bindings",
        bean.qualified_name(),
        resolver.members.len()
    );
    Ok(resolver.members)
}
