use alloc::sync::Arc;
use core::any::{Any, TypeId};

use crate::Result;
use crate::plan::ErasedPlan;
use crate::registry::Registry;
use crate::schema::SchemaType;

// -----------------------------------------------------------------------------
// Context

/// Caller-owned state threaded through every nested read and write.
///
/// The engine only forwards a shared reference; it never inspects the value.
/// Implemented for every `Send + Sync + 'static` type, `()` included.
pub trait Context: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Context for T {}

// -----------------------------------------------------------------------------
// Marshal

/// A record type that the engine can transcode.
///
/// Usually implemented with `#[derive(Marshal)]`. A hand-written
/// implementation describes the type through the [`SchemaType`] builder:
///
/// ```
/// use vc_serial::{FieldDescriptor, Marshal, Modifiers, SchemaType};
///
/// #[derive(Default)]
/// struct Header {
///     version: i32,
///     name: String,
/// }
///
/// impl Marshal<()> for Header {
///     fn schema() -> SchemaType<Self, ()> {
///         SchemaType::new("Header")
///             .constructor(Header::default)
///             .field(
///                 FieldDescriptor::new("version", |h: &Header| &h.version, |h| &mut h.version)
///                     .modifiers(Modifiers::COMPACT),
///             )
///             .field(FieldDescriptor::new("name", |h: &Header| &h.name, |h| &mut h.name))
///     }
/// }
/// ```
pub trait Marshal<C: Context>: Send + Sync + Sized + 'static {
    /// Describes the type. Called once per [`Registry`].
    fn schema() -> SchemaType<Self, C>;

    /// The value whose concrete plan populates and emits `self`.
    ///
    /// Records return themselves. A closed polymorphic enum returns the
    /// record wrapped by its active variant, so that writes pick the plan of
    /// the runtime variant rather than the declared type.
    #[inline]
    fn as_object(&self) -> &dyn Object<C> {
        self
    }

    /// Mutable counterpart of [`Marshal::as_object`].
    #[inline]
    fn as_object_mut(&mut self) -> &mut dyn Object<C> {
        self
    }
}

// -----------------------------------------------------------------------------
// Object

/// Type-erased view of a [`Marshal`] value, used to dispatch on the runtime
/// type.
///
/// Implemented for every `Marshal` type; not meant to be implemented by hand.
pub trait Object<C: Context>: Any + Send + Sync {
    fn type_name(&self) -> &'static str;

    /// [`TypeId`] of the concrete type behind the reference.
    fn object_type_id(&self) -> TypeId;

    /// Plan of the concrete type, built on first use.
    fn plan(&self, registry: &Registry<C>) -> Result<Arc<dyn ErasedPlan<C>>>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Context, T: Marshal<C>> Object<C> for T {
    #[inline]
    fn type_name(&self) -> &'static str {
        core::any::type_name::<T>()
    }

    #[inline]
    fn object_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn plan(&self, registry: &Registry<C>) -> Result<Arc<dyn ErasedPlan<C>>> {
        let plan: Arc<dyn ErasedPlan<C>> = registry.plan::<T>()?;
        Ok(plan)
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
