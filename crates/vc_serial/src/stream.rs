//! The object stream facade.
//!
//! [`ObjectInput`] and [`ObjectOutput`] bundle a byte stream, the caller's
//! context and the plan registry. They dereference to the underlying
//! [`DataInput`] / [`DataOutput`], so hooks and custom serializers use the
//! primitive reads and writes directly on them.

use core::any::TypeId;
use core::fmt;
use core::ops::{Deref, DerefMut};

use vc_stream::{DataInput, DataOutput};

use crate::error::Result;
use crate::object::{Context, Marshal};
use crate::registry::Registry;

// -----------------------------------------------------------------------------
// ObjectInput

/// Read half of the facade.
pub struct ObjectInput<'a, C: Context> {
    stream: &'a mut (dyn DataInput + 'a),
    context: &'a C,
    registry: &'a Registry<C>,
}

impl<'a, C: Context> ObjectInput<'a, C> {
    #[inline]
    pub fn new(stream: &'a mut (dyn DataInput + 'a), context: &'a C, registry: &'a Registry<C>) -> Self {
        Self {
            stream,
            context,
            registry,
        }
    }

    /// The caller's context, forwarded unchanged.
    #[inline]
    pub fn context(&self) -> &'a C {
        self.context
    }

    #[inline]
    pub fn registry(&self) -> &'a Registry<C> {
        self.registry
    }

    /// Reads one `T`: instantiate, then populate.
    ///
    /// A type-level custom serializer of `T` handles both halves.
    pub fn read<T: Marshal<C>>(&mut self) -> Result<T> {
        self.registry.plan::<T>()?.read_object(self)
    }

    /// Populates an existing value with the compiled plan of its concrete
    /// runtime type, bypassing any type-level custom serializer.
    ///
    /// This is what a custom serializer calls once it has instantiated the
    /// right variant.
    pub fn read_into<T: Marshal<C>>(&mut self, obj: &mut T) -> Result<()> {
        let concrete = obj.as_object_mut();
        if concrete.object_type_id() == TypeId::of::<T>() {
            return self.registry.plan::<T>()?.read_fields(obj, self);
        }
        let plan = concrete.plan(self.registry)?;
        plan.read_dyn(concrete.as_any_mut(), self)
    }
}

impl<'a, C: Context> Deref for ObjectInput<'a, C> {
    type Target = dyn DataInput + 'a;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.stream
    }
}

impl<C: Context> DerefMut for ObjectInput<'_, C> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.stream
    }
}

impl<C: Context> fmt::Debug for ObjectInput<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectInput")
            .field("position", &self.stream.position())
            .field("charset", &self.stream.charset())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ObjectOutput

/// Write half of the facade.
pub struct ObjectOutput<'a, C: Context> {
    stream: &'a mut (dyn DataOutput + 'a),
    context: &'a C,
    registry: &'a Registry<C>,
}

impl<'a, C: Context> ObjectOutput<'a, C> {
    #[inline]
    pub fn new(stream: &'a mut (dyn DataOutput + 'a), context: &'a C, registry: &'a Registry<C>) -> Self {
        Self {
            stream,
            context,
            registry,
        }
    }

    /// The caller's context, forwarded unchanged.
    #[inline]
    pub fn context(&self) -> &'a C {
        self.context
    }

    #[inline]
    pub fn registry(&self) -> &'a Registry<C> {
        self.registry
    }

    /// Writes `value`, through the type-level custom serializer of `T` if
    /// there is one, otherwise with the plan of its concrete runtime type.
    pub fn write<T: Marshal<C>>(&mut self, value: &T) -> Result<()> {
        self.registry.plan::<T>()?.write_object(value, self)
    }

    /// Emits `obj` with the compiled plan of its concrete runtime type,
    /// bypassing any type-level custom serializer.
    pub fn write_fields<T: Marshal<C>>(&mut self, obj: &T) -> Result<()> {
        let concrete = obj.as_object();
        if concrete.object_type_id() == TypeId::of::<T>() {
            return self.registry.plan::<T>()?.write_fields(obj, self);
        }
        let plan = concrete.plan(self.registry)?;
        plan.write_dyn(concrete.as_any(), self)
    }
}

impl<'a, C: Context> Deref for ObjectOutput<'a, C> {
    type Target = dyn DataOutput + 'a;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.stream
    }
}

impl<C: Context> DerefMut for ObjectOutput<'_, C> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.stream
    }
}

impl<C: Context> fmt::Debug for ObjectOutput<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectOutput")
            .field("position", &self.stream.position())
            .field("charset", &self.stream.charset())
            .finish_non_exhaustive()
    }
}
