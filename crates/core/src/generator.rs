//! JAX-RS client generator.
//!
//! The pipeline is:
//! 1. Extract: resource descriptor -> ClassData (bindings, paths, media types)
//! 2. Assemble: ClassData -> JavaFile (synthesized method bodies)
//! 3. Emit: JavaFile -> String (via the Emit trait)

use tracing::{debug, debug_span};

use crate::descriptor::{TypeIntrospect, TypeLookup};
use crate::error::GenerateError;
use crate::ir::{BindingPolicy, JavaFile, assemble, extract};

/// Switches that change the generated code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Return `Future`s from concrete resource clients.
    pub async_mode: bool,
    /// Handling of conflicting or unreadable bindings.
    pub policy: BindingPolicy,
}

/// Turns resource types into client compilation units.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientGenerator {
    options: GeneratorOptions,
}

impl ClientGenerator {
    /// Generator applying `options` to every resource.
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// Generate the client compilation unit for one resource type.
    pub fn generate(
        &self,
        resource: &dyn TypeIntrospect,
        lookup: &dyn TypeLookup,
    ) -> Result<JavaFile, GenerateError> {
        let span = debug_span!("generate", resource = resource.qualified_name());
        let _guard = span.enter();

        let class = extract(resource, lookup, self.options.policy)?;
        let file = assemble(&class, self.options.async_mode, self.options.policy)?;
        debug!(
            "Generated {} with {} methods",
            file.type_spec.name,
            file.type_spec.methods.len()
        );
        Ok(file)
    }

    /// Generate and render the client source.
    pub fn generate_source(
        &self,
        resource: &dyn TypeIntrospect,
        lookup: &dyn TypeLookup,
    ) -> Result<String, GenerateError> {
        Ok(self.generate(resource, lookup)?.to_source())
    }
}
