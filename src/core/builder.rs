//! # SubjectBuilder: configured construction of a [`Subject`].
//!
//! Collects identity, [`SubjectConfig`], initial value, an optional shared
//! [`Bus`] and initial subscribers, then validates the initial value once in
//! [`SubjectBuilder::build`]. Use [`Subject::new`] when defaults are enough.

use std::sync::Arc;

use crate::core::{StateInput, Subject, SubjectConfig};
use crate::error::ValidationError;
use crate::events::Bus;
use crate::subscribers::{Registry, Subscribe};

/// Builder for constructing a [`Subject`] with non-default settings.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use statecast::{Bus, HexFormatter, Subject, SubjectConfig};
///
/// let shared = Bus::new(256);
/// let hex = Arc::new(HexFormatter::new());
///
/// let subject = Subject::builder("temperature")
///     .with_config(SubjectConfig { min: -50, max: 60, ..SubjectConfig::default() })
///     .with_initial(20)
///     .with_bus(shared.clone())
///     .with_subscriber(&hex)
///     .build()
///     .unwrap();
///
/// assert_eq!(subject.get_state(), 20);
/// assert!(subject.set_state(100).is_err());
/// ```
pub struct SubjectBuilder {
    identity: Arc<str>,
    cfg: SubjectConfig,
    initial: StateInput,
    bus: Option<Bus>,
    registry: Registry,
}

impl SubjectBuilder {
    /// Creates a builder with default configuration and initial value 0.
    pub fn new(identity: impl Into<Arc<str>>) -> Self {
        Self {
            identity: identity.into(),
            cfg: SubjectConfig::default(),
            initial: StateInput::Int(0),
            bus: None,
            registry: Registry::new(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: SubjectConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the initial value; validated by [`build`](Self::build).
    pub fn with_initial(mut self, initial: impl Into<StateInput>) -> Self {
        self.initial = initial.into();
        self
    }

    /// Reports into an existing bus instead of creating one.
    ///
    /// Useful to collect diagnostics of several subjects in one place.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Uses a pre-populated registry. Replaces any subscriber added so far.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers a subscriber up front. Duplicates are ignored.
    ///
    /// Only a weak reference is kept; the caller must hold on to `subscriber`.
    pub fn with_subscriber<S: Subscribe>(mut self, subscriber: &Arc<S>) -> Self {
        self.registry.add(subscriber);
        self
    }

    /// Registers several type-erased subscribers in order. Duplicates are ignored.
    pub fn with_subscribers<'a>(
        mut self,
        subscribers: impl IntoIterator<Item = &'a Arc<dyn Subscribe>>,
    ) -> Self {
        for sub in subscribers {
            self.registry.add_dyn(sub);
        }
        self
    }

    /// Builds the subject.
    ///
    /// # Errors
    /// [`ValidationError`] if the initial value is outside the configured domain.
    pub fn build(self) -> Result<Subject, ValidationError> {
        let initial = self.initial.validate(&self.cfg.bounds())?;
        let bus = self
            .bus
            .unwrap_or_else(|| Bus::new(self.cfg.bus_capacity_clamped()));

        Ok(Subject::from_parts(
            self.identity,
            self.cfg,
            initial,
            bus,
            self.registry,
        ))
    }
}
