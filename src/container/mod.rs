//! Auto-wiring dependency container.
//!
//! Types describe their constructor once, through [`Autowire::signature`],
//! and the container builds the whole object graph from there:
//!
//! ```text
//! build(ServerAddCommand)
//!   ├── servers: ServerRepository
//!   │     └── store: InventoryStore
//!   │           ├── fs: Arc<dyn FileSystem>
//!   │           └── settings: Settings (default if unbound)
//!   └── probe: Arc<dyn SshProbe>
//!         └── shell: Arc<dyn ShellExecutor>
//! ```
//!
//! Signatures are computed once per type and cached for the container's
//! lifetime. Built instances are never cached: each `build` call returns a
//! fresh value. The container is meant for single-threaded use; `build`
//! takes `&mut self`.

pub mod error;
pub mod signature;

use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

pub use error::ContainerError;
pub use signature::{Arguments, Instance, ParamKind, Parameter, Signature, TypeKey};

/// A type the container can construct from its declared parameters.
pub trait Autowire: Sized + Send + 'static {
    /// Describes the constructor parameters in declaration order.
    fn signature() -> Signature;

    /// Builds the value from arguments resolved for [`Autowire::signature`].
    ///
    /// # Errors
    ///
    /// Returns an error if an argument has an unexpected type or the
    /// arguments are rejected.
    fn construct(args: &mut Arguments) -> Result<Self, ContainerError>;
}

type SignatureFn = Box<dyn Fn() -> Signature + Send + Sync>;
type Constructor = Box<dyn Fn(&mut Arguments) -> Result<Instance, ContainerError> + Send + Sync>;

struct Registration {
    signature: SignatureFn,
    constructor: Option<Constructor>,
}

/// Builds registered types, resolving constructor parameters recursively.
#[derive(Default)]
pub struct Container {
    registrations: HashMap<TypeKey, Registration>,
    signatures: HashMap<TypeKey, Arc<Signature>>,
}

impl Container {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an [`Autowire`] type.
    pub fn register<T: Autowire>(&mut self) -> &mut Self {
        self.insert(
            TypeKey::of::<T>(),
            Registration {
                signature: Box::new(T::signature),
                constructor: Some(Box::new(|args: &mut Arguments| {
                    Ok(Box::new(T::construct(args)?) as Instance)
                })),
            },
        )
    }

    /// Registers `T` as produced by a factory with no parameters.
    ///
    /// This is how trait-object handles such as `Arc<dyn FileSystem>` are
    /// bound to an implementation.
    pub fn bind<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Any + Send,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.insert(
            TypeKey::of::<T>(),
            Registration {
                signature: Box::new(Signature::empty),
                constructor: Some(Box::new(move |_: &mut Arguments| {
                    Ok(Box::new(factory()) as Instance)
                })),
            },
        )
    }

    /// Registers `T` with an explicit signature and constructor.
    pub fn register_factory<T, S, F>(&mut self, signature: S, factory: F) -> &mut Self
    where
        T: Any + Send,
        S: Fn() -> Signature + Send + Sync + 'static,
        F: Fn(&mut Arguments) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.insert(
            TypeKey::of::<T>(),
            Registration {
                signature: Box::new(signature),
                constructor: Some(Box::new(move |args: &mut Arguments| {
                    Ok(Box::new(factory(args)?) as Instance)
                })),
            },
        )
    }

    /// Declares `T` as known but abstract: it cannot be built directly and
    /// parameters of this type need a default.
    pub fn declare_abstract<T: Any>(&mut self) -> &mut Self {
        self.insert(
            TypeKey::of::<T>(),
            Registration { signature: Box::new(Signature::empty), constructor: None },
        )
    }

    /// Returns `true` if `T` has been registered, abstract or not.
    #[must_use]
    pub fn is_registered<T: Any>(&self) -> bool {
        self.registrations.contains_key(&TypeKey::of::<T>())
    }

    /// Number of types whose signature has been computed and cached.
    #[must_use]
    pub fn cached_signatures(&self) -> usize {
        self.signatures.len()
    }

    /// Builds a new `T` with all of its dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::UnknownType`] if `T` is not registered,
    /// [`ContainerError::NotInstantiable`] if it is abstract,
    /// [`ContainerError::CircularDependency`] if `T` depends on itself, and
    /// [`ContainerError::UnresolvableParameter`] or
    /// [`ContainerError::Dependency`] if a parameter without a default cannot
    /// be produced.
    pub fn build<T: Any>(&mut self) -> Result<T, ContainerError> {
        let key = TypeKey::of::<T>();
        let instance = self.build_key(key)?;
        instance.downcast::<T>().map(|boxed| *boxed).map_err(|_| ContainerError::ArgumentMismatch {
            owner: key.name(),
            parameter: "<instance>",
            expected: key.name(),
        })
    }

    /// Builds the type identified by `key` as a type-erased instance.
    ///
    /// # Errors
    ///
    /// Same failures as [`Container::build`].
    pub fn build_key(&mut self, key: TypeKey) -> Result<Instance, ContainerError> {
        let mut resolving = Vec::new();
        let result = self.resolve(key, &mut resolving);
        debug_assert!(resolving.is_empty(), "resolving stack must unwind on every path");
        result
    }

    fn insert(&mut self, key: TypeKey, registration: Registration) -> &mut Self {
        self.signatures.remove(&key);
        self.registrations.insert(key, registration);
        self
    }

    fn resolve(
        &mut self,
        key: TypeKey,
        resolving: &mut Vec<TypeKey>,
    ) -> Result<Instance, ContainerError> {
        if let Some(start) = resolving.iter().position(|pending| *pending == key) {
            let mut chain: Vec<&'static str> =
                resolving[start..].iter().map(TypeKey::name).collect();
            chain.push(key.name());
            return Err(ContainerError::CircularDependency { chain });
        }

        let signature = {
            let Some(registration) = self.registrations.get(&key) else {
                return Err(ContainerError::UnknownType(key.name()));
            };
            if registration.constructor.is_none() {
                return Err(ContainerError::NotInstantiable(key.name()));
            }
            match self.signatures.entry(key) {
                Entry::Occupied(cached) => Arc::clone(cached.get()),
                Entry::Vacant(slot) => {
                    debug!(type_name = key.name(), "caching constructor signature");
                    Arc::clone(slot.insert(Arc::new((registration.signature)())))
                }
            }
        };

        resolving.push(key);
        let result = self
            .resolve_arguments(key, &signature, resolving)
            .and_then(|values| self.instantiate(key, values));
        resolving.pop();
        result
    }

    fn resolve_arguments(
        &mut self,
        owner: TypeKey,
        signature: &Signature,
        resolving: &mut Vec<TypeKey>,
    ) -> Result<Vec<(&'static str, Instance)>, ContainerError> {
        let mut values = Vec::with_capacity(signature.params().len());
        for param in signature.params() {
            let value = match param.kind() {
                ParamKind::Service(dependency) if self.is_buildable(dependency) => {
                    match self.resolve(dependency, resolving) {
                        Ok(value) => value,
                        Err(err) => match param.default_value() {
                            Some(fallback) => {
                                warn!(
                                    parameter = param.name(),
                                    owner = owner.name(),
                                    error = %err,
                                    "dependency failed, using default value"
                                );
                                fallback
                            }
                            None => {
                                return Err(ContainerError::Dependency {
                                    parameter: param.name(),
                                    declaring_type: owner.name(),
                                    source: Box::new(err),
                                })
                            }
                        },
                    }
                }
                kind => param.default_value().ok_or_else(|| {
                    ContainerError::UnresolvableParameter {
                        parameter: param.name(),
                        declaring_type: owner.name(),
                        reason: self.describe_unbuildable(kind),
                    }
                })?,
            };
            values.push((param.name(), value));
        }
        Ok(values)
    }

    fn instantiate(
        &self,
        key: TypeKey,
        values: Vec<(&'static str, Instance)>,
    ) -> Result<Instance, ContainerError> {
        let constructor = self
            .registrations
            .get(&key)
            .and_then(|registration| registration.constructor.as_ref())
            .ok_or(ContainerError::NotInstantiable(key.name()))?;
        debug!(type_name = key.name(), arguments = values.len(), "constructing");
        let mut args = Arguments::new(key, values);
        constructor(&mut args)
    }

    fn is_buildable(&self, key: TypeKey) -> bool {
        self.registrations.get(&key).is_some_and(|registration| registration.constructor.is_some())
    }

    fn describe_unbuildable(&self, kind: ParamKind) -> String {
        match kind {
            ParamKind::Service(key) if self.registrations.contains_key(&key) => {
                format!("{key} is abstract and has no binding, and no default is declared")
            }
            ParamKind::Service(key) => {
                format!("no binding is registered for {key}, and no default is declared")
            }
            ParamKind::Builtin(name) => {
                format!("builtin type {name} cannot be auto-wired, and no default is declared")
            }
            ParamKind::Untyped => "parameter has no declared type and no default".to_string(),
        }
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.registrations.keys().map(TypeKey::name).collect();
        names.sort_unstable();
        f.debug_struct("Container")
            .field("registrations", &names)
            .field("cached_signatures", &self.signatures.len())
            .finish_non_exhaustive()
    }
}
