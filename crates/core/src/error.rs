//! Errors raised while generating one client.

use thiserror::Error;

use crate::typeref::TypeRef;

/// Configuration errors that abort generation of one resource type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// The resource type has no type-level `@Path`.
    #[error("{0} has no @Path annotation")]
    MissingRootPath(String),

    /// A path template variable has no `@PathParam` binding.
    #[error("{method}: path variable `{name}` has no matching @PathParam")]
    PathParamMismatch {
        /// `Type.method` of the endpoint.
        method: String,
        /// Template variable without a binding.
        name: String,
    },

    /// A `@CookieParam` bound to neither `Cookie` nor `String`.
    #[error("cookie param `{label}` must be javax.ws.rs.core.Cookie or java.lang.String, found {ty}")]
    UnsupportedCookieType {
        /// Cookie name.
        label: String,
        /// Declared parameter type.
        ty: TypeRef,
    },

    /// A `@BeanParam` type the lookup does not know.
    #[error("bean param type {0} is not available")]
    UnknownBeanType(String),

    /// Strict mode: an element carries several binding annotations.
    #[error("{element} carries more than one binding")]
    AmbiguousBinding {
        /// `Type.member` of the annotated element.
        element: String,
    },

    /// Strict mode: a method carries several HTTP method annotations.
    #[error("{method} declares more than one HTTP method annotation")]
    MultipleVerbs {
        /// `Type.method` of the endpoint.
        method: String,
    },

    /// Strict mode: an endpoint has several unannotated parameters.
    #[error("{method} declares more than one unannotated entity parameter")]
    MultipleEntities {
        /// `Type.method` of the endpoint.
        method: String,
    },

    /// Strict mode: a bound bean member is readable neither by getter nor
    /// by field.
    #[error("bean {bean}: member `{member}` has no getter and is not accessible")]
    InaccessibleBeanMember {
        /// Qualified bean type name.
        bean: String,
        /// Field or constructor parameter name.
        member: String,
    },
}
