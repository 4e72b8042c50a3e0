//! Build context: a typed object store shared by build tasks

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use yoo_asset_core::{Result, YooAssetError};

/// Holds one object per type. Tasks read what earlier stages stored.
#[derive(Default)]
pub struct BuildContext {
    objects: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object, replacing any previous object of the same type
    pub fn set_context_object<T: Any + Send + Sync>(&mut self, object: T) {
        self.objects.insert(TypeId::of::<T>(), Box::new(object));
    }

    pub fn get_context_object<T: Any + Send + Sync>(&self) -> Result<&T> {
        self.objects
            .get(&TypeId::of::<T>())
            .and_then(|object| object.downcast_ref::<T>())
            .ok_or(YooAssetError::MissingContextObject {
                type_name: type_name::<T>(),
            })
    }

    pub fn get_context_object_mut<T: Any + Send + Sync>(&mut self) -> Result<&mut T> {
        self.objects
            .get_mut(&TypeId::of::<T>())
            .and_then(|object| object.downcast_mut::<T>())
            .ok_or(YooAssetError::MissingContextObject {
                type_name: type_name::<T>(),
            })
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.objects.contains_key(&TypeId::of::<T>())
    }
}

impl std::fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildContext")
            .field("object_count", &self.objects.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Counter(u32);

    #[test]
    fn test_set_and_get() {
        let mut context = BuildContext::new();
        context.set_context_object(Counter(1));
        assert_eq!(context.get_context_object::<Counter>().unwrap(), &Counter(1));

        context.get_context_object_mut::<Counter>().unwrap().0 += 1;
        assert_eq!(context.get_context_object::<Counter>().unwrap().0, 2);
    }

    #[test]
    fn test_missing_object() {
        let context = BuildContext::new();
        let err = context.get_context_object::<Counter>().unwrap_err();
        assert!(matches!(err, YooAssetError::MissingContextObject { .. }));
        assert!(err.to_string().contains("Counter"));
    }
}
