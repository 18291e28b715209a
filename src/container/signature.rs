//! Constructor metadata: type identity, parameters and resolved arguments.

use std::any::{Any, TypeId};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use super::error::ContainerError;

/// A type-erased constructor argument or built instance.
pub type Instance = Box<dyn Any + Send>;

/// Produces a fresh copy of a parameter's default value.
pub(crate) type DefaultFactory = Arc<dyn Fn() -> Instance + Send + Sync>;

/// Identity of a constructible type.
///
/// Equality and hashing use the `TypeId` only; the name is kept for messages.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key for `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self { id: TypeId::of::<T>(), name: std::any::type_name::<T>() }
    }

    /// The runtime type id.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The fully qualified type name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// What a constructor parameter declares about its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A concrete service the container resolves by building it.
    Service(TypeKey),
    /// A primitive or plain value the container never builds on its own.
    Builtin(&'static str),
    /// No usable declared type.
    Untyped,
}

/// One constructor parameter.
#[derive(Clone)]
pub struct Parameter {
    name: &'static str,
    kind: ParamKind,
    default: Option<DefaultFactory>,
}

impl Parameter {
    /// A parameter resolved by building `T` through the container.
    #[must_use]
    pub fn service<T: Any>(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Service(TypeKey::of::<T>()), default: None }
    }

    /// A plain value parameter of type `T` that only a default can satisfy.
    #[must_use]
    pub fn builtin<T: Any>(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Builtin(std::any::type_name::<T>()), default: None }
    }

    /// A parameter with no declared type.
    #[must_use]
    pub fn untyped(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Untyped, default: None }
    }

    /// Attaches a default value, cloned each time it is used.
    #[must_use]
    pub fn with_default<T>(mut self, value: T) -> Self
    where
        T: Any + Clone + Send + Sync,
    {
        self.default = Some(Arc::new(move || Box::new(value.clone()) as Instance));
        self
    }

    /// Attaches a default computed by `factory` each time it is used.
    #[must_use]
    pub fn with_default_fn<T, F>(mut self, factory: F) -> Self
    where
        T: Any + Send,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(move || Box::new(factory()) as Instance));
        self
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared kind.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Whether a default value is available.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub(crate) fn default_value(&self) -> Option<Instance> {
        self.default.as_ref().map(|factory| factory())
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("has_default", &self.has_default())
            .finish()
    }
}

/// Ordered constructor parameter list for one type.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    params: Vec<Parameter>,
}

impl Signature {
    /// A constructor taking no parameters.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }
}

/// Resolved constructor arguments, consumed in declaration order.
pub struct Arguments {
    owner: TypeKey,
    values: VecDeque<(&'static str, Instance)>,
}

impl Arguments {
    pub(crate) fn new(owner: TypeKey, values: Vec<(&'static str, Instance)>) -> Self {
        Self { owner, values: values.into() }
    }

    /// Takes the next argument as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::ArgumentMismatch`] if the arguments are
    /// exhausted or the next value is not a `T`.
    pub fn take<T: Any>(&mut self) -> Result<T, ContainerError> {
        let expected = std::any::type_name::<T>();
        let Some((name, value)) = self.values.pop_front() else {
            return Err(ContainerError::ArgumentMismatch {
                owner: self.owner.name(),
                parameter: "<missing>",
                expected,
            });
        };
        value.downcast::<T>().map(|boxed| *boxed).map_err(|_| ContainerError::ArgumentMismatch {
            owner: self.owner.name(),
            parameter: name,
            expected,
        })
    }

    /// Number of arguments not yet taken.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}
