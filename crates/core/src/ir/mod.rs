//! Intermediate representation for JAX-RS client generation.
//!
//! Three layers, each testable on its own:
//! 1. Resource IR: endpoints and parameter bindings (`model`), built by
//!    `extract` with help from `bean` and resolved into path steps by `path`
//! 2. Java AST: fields, constructors, methods and call chains (`java`),
//!    built by `synth` per endpoint and `assemble` per resource
//! 3. Emission: Java AST to source text via the `Emit` trait (`emit`)
//!
//! ## Module Structure
//!
//! - `model`: ClassData, EndpointData, ParamData
//! - `extract`: resource descriptor -> ClassData
//! - `bean`: @BeanParam flattening
//! - `path`: @Path template merging
//! - `synth`: EndpointData -> JavaMethod
//! - `assemble`: ClassData -> JavaFile
//! - `java`: Java AST
//! - `emit`: Java AST -> source text
//! - `utils`: identifiers, escaping, name allocation

mod assemble;
mod bean;
mod emit;
mod extract;
mod java;
mod model;
mod path;
mod synth;
pub mod utils;

pub use assemble::{assemble, client_name};
pub use emit::{Emit, NameTable};
pub use extract::{BindingPolicy, extract};
pub use java::{
    ClassName, JavaConstructor, JavaExpr, JavaField, JavaFile, JavaMethod, JavaParam, JavaStmt,
    Modifier, Step, TypeSpec,
};
pub use model::{
    Accessor, CallExpr, ClassData, EndpointData, ParamData, ParamKind, Verb, WILDCARD_MEDIA_TYPE,
};
pub use path::{PathOp, resolve_path};
