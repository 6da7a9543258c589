use crate::foundation::error::{SonoError, SonoResult};
use std::fmt;

type Validator<T> = fn(&T) -> Result<(), String>;
type Subscriber<T> = Box<dyn FnMut(&T)>;

/// A validated project setting that notifies subscribers when it changes.
pub struct Property<T> {
    name: &'static str,
    value: T,
    validator: Validator<T>,
    subscribers: Vec<Subscriber<T>>,
}

impl<T: Clone + PartialEq> Property<T> {
    /// Create a property. The initial value must pass `validator`.
    pub fn new(name: &'static str, value: T, validator: Validator<T>) -> SonoResult<Self> {
        validator(&value).map_err(|m| SonoError::invalid_field(name, m))?;
        Ok(Self {
            name,
            value,
            validator,
            subscribers: Vec::new(),
        })
    }

    /// Create a property from a possibly invalid value, using `fallback` when it fails validation.
    pub fn with_fallback(name: &'static str, value: T, fallback: T, validator: Validator<T>) -> Self {
        let value = match validator(&value) {
            Ok(()) => value,
            Err(message) => {
                tracing::warn!(property = name, %message, "invalid initial value, using fallback");
                fallback
            }
        };
        Self {
            name,
            value,
            validator,
            subscribers: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn validate(&self, value: &T) -> SonoResult<()> {
        (self.validator)(value).map_err(|m| SonoError::invalid_field(self.name, m))
    }

    /// Replace the value. Invalid values are rejected and leave the property untouched.
    ///
    /// Returns `true` when the value changed; subscribers only hear about actual changes.
    pub fn set(&mut self, value: T) -> SonoResult<bool> {
        self.validate(&value)?;
        if value == self.value {
            return Ok(false);
        }
        self.value = value;
        for notify in &mut self.subscribers {
            notify(&self.value);
        }
        Ok(true)
    }

    pub fn on_change(&mut self, subscriber: impl FnMut(&T) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/property.rs"]
mod tests;
