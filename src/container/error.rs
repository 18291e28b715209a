//! Failures raised while auto-wiring a type.

use thiserror::Error;

/// Error returned by [`Container::build`](super::Container::build).
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The type was never registered with the container.
    #[error("unknown type {0}: it is not registered with the container")]
    UnknownType(&'static str),

    /// The type is registered as abstract and has no constructor.
    #[error("type {0} is not instantiable")]
    NotInstantiable(&'static str),

    /// Building the type requires building itself again.
    #[error("circular dependency detected: {}", .chain.join(" -> "))]
    CircularDependency {
        /// Every type on the cycle, starting and ending with the repeated type.
        chain: Vec<&'static str>,
    },

    /// A parameter has no buildable type and no default value.
    #[error("cannot resolve parameter `{parameter}` of {declaring_type}: {reason}")]
    UnresolvableParameter {
        /// Parameter name as declared in the signature.
        parameter: &'static str,
        /// Type whose constructor declares the parameter.
        declaring_type: &'static str,
        /// Why no value could be produced.
        reason: String,
    },

    /// Building a parameter's dependency failed and the parameter has no default.
    #[error("failed to build parameter `{parameter}` of {declaring_type}: {source}")]
    Dependency {
        /// Parameter name as declared in the signature.
        parameter: &'static str,
        /// Type whose constructor declares the parameter.
        declaring_type: &'static str,
        /// The failure raised while building the dependency.
        #[source]
        source: Box<ContainerError>,
    },

    /// A constructor took an argument of a different type than it declared.
    #[error("constructor of {owner} expected `{parameter}` to be {expected}")]
    ArgumentMismatch {
        /// Type whose constructor is running.
        owner: &'static str,
        /// Parameter name as declared in the signature.
        parameter: &'static str,
        /// The type the constructor asked for.
        expected: &'static str,
    },

    /// A constructor rejected its resolved arguments.
    #[error("constructor of {owner} failed: {message}")]
    Construction {
        /// Type whose constructor failed.
        owner: &'static str,
        /// Failure description.
        message: String,
    },
}

impl ContainerError {
    /// Returns the innermost failure, unwrapping [`ContainerError::Dependency`] layers.
    #[must_use]
    pub fn root_cause(&self) -> &ContainerError {
        let mut current = self;
        while let ContainerError::Dependency { source, .. } = current {
            current = &**source;
        }
        current
    }

    /// Parameter path from the outermost type down to the failure, e.g.
    /// `ServerAddCommand.servers -> ServerRepository.store`.
    #[must_use]
    pub fn parameter_path(&self) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = self;
        while let ContainerError::Dependency { parameter, declaring_type, source } = current {
            path.push(format!("{}.{parameter}", short_name(declaring_type)));
            current = &**source;
        }
        if let ContainerError::UnresolvableParameter { parameter, declaring_type, .. } = current {
            path.push(format!("{}.{parameter}", short_name(declaring_type)));
        }
        path
    }
}

/// Strips the module path and generic arguments from a type name.
pub(crate) fn short_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}
