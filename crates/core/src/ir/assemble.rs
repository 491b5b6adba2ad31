//! [`ClassData`] → [`JavaFile`].

use crate::error::GenerateError;
use crate::typeref::TypeRef;

use super::extract::BindingPolicy;
use super::java::{
    JavaConstructor, JavaExpr, JavaField, JavaFile, JavaMethod, JavaParam, JavaStmt, Modifier,
    TypeSpec,
};
use super::model::{ClassData, EndpointData};
use super::synth::synthesize_endpoint;

const WEB_TARGET: &str = "javax.ws.rs.client.WebTarget";
const CLIENT: &str = "javax.ws.rs.client.Client";
const OVERRIDE: &str = "java.lang.Override";

/// Name of the generated type for `class`.
pub fn client_name(class: &ClassData, async_mode: bool) -> String {
    if async_mode && !class.is_interface {
        format!("{}AsyncClient", class.class_name)
    } else {
        format!("{}Client", class.class_name)
    }
}

fn base_field() -> JavaField {
    JavaField {
        modifiers: vec![Modifier::Private, Modifier::Final],
        ty: TypeRef::class(WEB_TARGET),
        name: "base".to_string(),
    }
}

/// `(Client client, String endpointUrl) { base = client.target(endpointUrl); }`
fn constructor() -> JavaConstructor {
    JavaConstructor {
        modifiers: vec![Modifier::Public],
        params: vec![
            JavaParam {
                ty: TypeRef::class(CLIENT),
                name: "client".to_string(),
            },
            JavaParam {
                ty: TypeRef::class("java.lang.String"),
                name: "endpointUrl".to_string(),
            },
        ],
        body: vec![JavaStmt::Assign {
            target: "base".to_string(),
            value: JavaExpr::call(
                JavaExpr::ident("client"),
                "target",
                vec![JavaExpr::ident("endpointUrl")],
            ),
        }],
    }
}

/// Body-less implementation of a non-endpoint interface method.
fn stub(endpoint: &EndpointData) -> JavaMethod {
    let params = endpoint
        .params
        .iter()
        .enumerate()
        .map(|(idx, param)| JavaParam {
            ty: param.ty.clone(),
            name: format!("param{idx}"),
        })
        .collect();
    let body = endpoint
        .return_type
        .zero_value()
        .map(|zero| JavaStmt::Return(JavaExpr::Literal(zero.to_string())))
        .into_iter()
        .collect();
    JavaMethod {
        annotations: Vec::new(),
        modifiers: vec![Modifier::Public],
        return_type: endpoint.return_type.clone(),
        name: endpoint.name.clone(),
        params,
        body,
    }
}

/// Assemble the client class: base field, constructor, one method per
/// endpoint. Interfaces also get stubs for their other methods.
pub fn assemble(
    class: &ClassData,
    async_mode: bool,
    policy: BindingPolicy,
) -> Result<JavaFile, GenerateError> {
    let mut methods = Vec::with_capacity(class.methods.len());
    for endpoint in &class.methods {
        let mut method = match endpoint.verb {
            Some(verb) => synthesize_endpoint(class, endpoint, verb, async_mode, policy)?,
            None if class.is_interface => stub(endpoint),
            None => continue,
        };
        if class.is_interface {
            method.annotations.push(OVERRIDE.to_string());
        }
        methods.push(method);
    }

    let superinterfaces = if class.is_interface {
        vec![TypeRef::class(&class.qualified_name)]
    } else {
        Vec::new()
    };

    Ok(JavaFile {
        package: class.package.clone(),
        type_spec: TypeSpec {
            modifiers: vec![Modifier::Public],
            name: client_name(class, async_mode),
            superinterfaces,
            fields: vec![base_field()],
            constructors: vec![constructor()],
            methods,
        },
    })
}
