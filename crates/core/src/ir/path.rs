//! Merging of resource and method `@Path` templates into path steps.

use std::collections::HashMap;

use crate::error::GenerateError;

use super::extract::BindingPolicy;
use super::model::{CallExpr, ParamData, ParamKind};

/// One `.path(...)` step of the request chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOp {
    /// Fixed segment, sent as a string literal.
    Literal(String),
    /// Template variable filled from a `@PathParam` binding.
    Bound {
        /// Variable name from the template.
        name: String,
        /// Expression reading the bound value.
        call: CallExpr,
    },
}

/// PATH bindings by label, class level first. Bean members are included.
fn index_path_bindings<'a>(
    method: &str,
    params: impl Iterator<Item = &'a ParamData>,
    policy: BindingPolicy,
) -> Result<HashMap<&'a str, &'a ParamData>, GenerateError> {
    let mut by_label = HashMap::new();
    for param in params.flat_map(ParamData::flatten) {
        if param.kind != ParamKind::Path {
            continue;
        }
        if by_label.insert(param.label.as_str(), param).is_some()
            && policy == BindingPolicy::Strict
        {
            return Err(GenerateError::AmbiguousBinding {
                element: format!("{method} path param `{}`", param.label),
            });
        }
    }
    Ok(by_label)
}

/// Variable name of a `{name}` or `{name: regex}` segment.
fn template_variable(segment: &str) -> Option<&str> {
    let inner = segment.strip_prefix('{')?.strip_suffix('}')?;
    let name = inner.split_once(':').map_or(inner, |(name, _)| name);
    Some(name.trim())
}

fn push_segments(
    template: &str,
    method: &str,
    bindings: &HashMap<&str, &ParamData>,
    ops: &mut Vec<PathOp>,
) -> Result<(), GenerateError> {
    for segment in template.split('/').filter(|segment| !segment.is_empty()) {
        let Some(name) = template_variable(segment) else {
            ops.push(PathOp::Literal(segment.to_string()));
            continue;
        };
        let param = bindings
            .get(name)
            .ok_or_else(|| GenerateError::PathParamMismatch {
                method: method.to_string(),
                name: name.to_string(),
            })?;
        ops.push(PathOp::Bound {
            name: name.to_string(),
            call: param.call.clone(),
        });
    }
    Ok(())
}

/// Resolve the class template followed by the method template.
pub fn resolve_path<'a>(
    method: &str,
    class_path: &str,
    method_path: Option<&str>,
    params: impl Iterator<Item = &'a ParamData>,
    policy: BindingPolicy,
) -> Result<Vec<PathOp>, GenerateError> {
    let bindings = index_path_bindings(method, params, policy)?;
    let mut ops = Vec::new();
    push_segments(class_path, method, &bindings, &mut ops)?;
    if let Some(method_path) = method_path {
        push_segments(method_path, method, &bindings, &mut ops)?;
    }
    Ok(ops)
}
