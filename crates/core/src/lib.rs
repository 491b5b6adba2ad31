//! Generates JAX-RS client classes from annotated resource descriptors.
//!
//! The core is a pure, synchronous transformation: one resource type in,
//! one [`JavaFile`] out. Type discovery and file I/O belong to callers,
//! which feed the generator through the [`TypeIntrospect`] and
//! [`TypeLookup`] capability traits.

pub mod descriptor;
pub mod error;
pub mod generator;
pub mod ir;
pub mod typeref;

// Re-export commonly used types
pub use descriptor::{
    Annotation, ConstructorDecl, DescriptorBundle, FieldDecl, MethodDecl, ParamDecl,
    TypeDescriptor, TypeIntrospect, TypeLookup,
};
pub use error::GenerateError;
pub use generator::{ClientGenerator, GeneratorOptions};
pub use ir::{BindingPolicy, JavaFile};
pub use typeref::{Primitive, TypeParseError, TypeRef};
