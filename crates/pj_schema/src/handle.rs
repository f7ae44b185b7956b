use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::{PoisonError, RwLock};

// -----------------------------------------------------------------------------
// ParentHandle

#[derive(Default)]
struct ObjectCore {
    required: RwLock<Vec<String>>,
    discriminator: RwLock<Option<String>>,
}

/// Shared access to the parts of an object schema its properties bind to:
/// the required-name set and the discriminator name.
///
/// Cloning the handle shares the same parent. The required set keeps
/// insertion order and never holds a name twice.
#[derive(Clone, Default)]
pub struct ParentHandle {
    core: Arc<ObjectCore>,
}

impl ParentHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_state(required: Vec<String>, discriminator: Option<String>) -> Self {
        let handle = Self::new();
        for name in required {
            handle.set_required(&name, true);
        }
        handle.set_discriminator(discriminator);
        handle
    }

    /// Returns `true` if `name` is in the required set.
    pub fn is_required(&self, name: &str) -> bool {
        self.core
            .required
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|required| required == name)
    }

    /// Add or remove `name`, doing nothing if it is already in the desired state.
    pub fn set_required(&self, name: &str, required: bool) {
        let mut set = self
            .core
            .required
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let position = set.iter().position(|item| item == name);
        match (position, required) {
            (None, true) => set.push(String::from(name)),
            (Some(index), false) => {
                set.remove(index);
            }
            _ => {}
        }
    }

    /// A copy of the required set, in insertion order.
    pub fn required(&self) -> Vec<String> {
        self.core
            .required
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn discriminator(&self) -> Option<String> {
        self.core
            .discriminator
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_discriminator(&self, discriminator: Option<String>) {
        *self
            .core
            .discriminator
            .write()
            .unwrap_or_else(PoisonError::into_inner) = discriminator;
    }

    /// Returns `true` if the discriminator is set to `name`.
    pub fn is_discriminator(&self, name: &str) -> bool {
        self.core
            .discriminator
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_deref()
            == Some(name)
    }

    /// Returns `true` if both handles refer to the same parent.
    #[inline]
    pub fn same_parent(&self, other: &ParentHandle) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }

    /// A handle to a new parent holding a copy of this one's state.
    pub(crate) fn deep_copy(&self) -> Self {
        Self::with_state(self.required(), self.discriminator())
    }
}

impl core::fmt::Debug for ParentHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParentHandle")
            .field("required", &self.required())
            .field("discriminator", &self.discriminator())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
