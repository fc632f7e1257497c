//! Type-erased objects produced by the container.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::{ClassEntry, ResolveError, TypeInfo};

/// A shared, type-erased object together with its class description.
///
/// Cloning an `Instance` clones the handle, not the object: singleton
/// identity is preserved across clones and can be checked with
/// [`Instance::ptr_eq`].
#[derive(Clone)]
pub struct Instance {
    object: Arc<dyn Any + Send + Sync>,
    class: Arc<ClassEntry>,
}

impl Instance {
    /// Pair an object with its class.
    ///
    /// The object's concrete type must be the class type; casts declared by
    /// the class are only applied to objects of that type.
    pub fn new(object: Arc<dyn Any + Send + Sync>, class: Arc<ClassEntry>) -> Self {
        debug_assert_eq!(
            (*object).type_id(),
            class.type_info().id(),
            "instance object does not match its class"
        );
        Self { object, class }
    }

    /// Wrap a shared object whose type is not described in any catalog.
    ///
    /// The instance can be cast to `T` and to [`TypeInfo::object`] only.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            object: value,
            class: Arc::new(ClassEntry::opaque::<T>()),
        }
    }

    /// The runtime type.
    pub fn type_info(&self) -> TypeInfo {
        self.class.type_info()
    }

    /// The runtime class description.
    pub fn class(&self) -> &Arc<ClassEntry> {
        &self.class
    }

    /// The underlying object.
    pub fn as_any(&self) -> &Arc<dyn Any + Send + Sync> {
        &self.object
    }

    /// Check if the instance can be viewed as `ty`.
    pub fn can_cast(&self, ty: TypeInfo) -> bool {
        self.class.can_cast(ty)
    }

    /// View the instance as `I`.
    ///
    /// `I` may be the concrete type, any interface the class declares, or
    /// `dyn Any + Send + Sync`. The returned `Arc` shares the allocation of
    /// the instance.
    pub fn get<I: ?Sized + 'static>(&self) -> Result<Arc<I>, ResolveError> {
        let mismatch = || {
            ResolveError::type_mismatch(
                TypeInfo::of::<I>().short_name(),
                self.type_info().short_name(),
            )
        };
        let cast = self.class.cast(TypeId::of::<I>()).ok_or_else(mismatch)?;
        cast(Arc::clone(&self.object))
            .and_then(|boxed| boxed.downcast::<Arc<I>>().ok())
            .map(|arc| *arc)
            .ok_or_else(mismatch)
    }

    /// Check if both handles point at the same object.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.object, &other.object)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_info())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_instance_casts_to_itself() {
        let instance = Instance::from_arc(Arc::new(7u32));
        assert_eq!(*instance.get::<u32>().unwrap(), 7);
        assert!(instance.can_cast(TypeInfo::object()));
        assert!(instance.get::<dyn Any + Send + Sync>().is_ok());
    }

    #[test]
    fn wrong_type_is_a_mismatch() {
        let instance = Instance::from_arc(Arc::new(7u32));
        let err = instance.get::<String>().unwrap_err();
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn clones_share_identity() {
        let a = Instance::from_arc(Arc::new(String::from("shared")));
        let b = a.clone();
        let c = Instance::from_arc(Arc::new(String::from("shared")));
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert!(Arc::ptr_eq(&a.get::<String>().unwrap(), &b.get::<String>().unwrap()));
    }
}
