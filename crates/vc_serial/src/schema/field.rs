use alloc::boxed::Box;
use core::fmt;

use crate::codec::FieldType;
use crate::custom::Serializer;
use crate::error::{Result, SchemaError};
use crate::object::Context;
use crate::plan::{ReadStep, WriteStep};
use crate::registry::Registry;
use crate::schema::{FieldMeta, Kind, LengthPrefix, Modifiers};
use crate::stream::{ObjectInput, ObjectOutput};

type Bind<T, C> = Box<dyn FnOnce(&FieldMeta, &Registry<C>) -> Result<(ReadStep<T, C>, WriteStep<T, C>)>>;

// -----------------------------------------------------------------------------
// FieldDescriptor

/// One eligible field of a [`SchemaType`](crate::SchemaType).
///
/// Holds the field's metadata and the accessors needed to bind it into a
/// read step and a write step. Binding happens once, when the owning plan is
/// compiled; the resulting codec is reused by every call.
pub struct FieldDescriptor<T, C: Context> {
    name: &'static str,
    kind: Option<Kind>,
    modifiers: Modifiers,
    length: Option<LengthPrefix>,
    bind: Bind<T, C>,
}

impl<T: 'static, C: Context> FieldDescriptor<T, C> {
    /// A field transcoded by the built-in codec of `V`.
    pub fn new<V: FieldType<C>>(
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        Self {
            name,
            kind: Some(V::KIND),
            modifiers: Modifiers::empty(),
            length: None,
            bind: Box::new(move |meta, registry| {
                let codec = V::codec(meta, registry)?;
                let read_codec = codec.clone();
                let read: ReadStep<T, C> =
                    Box::new(move |obj: &mut T, input: &mut ObjectInput<'_, C>| {
                        *get_mut(obj) = read_codec.read(input)?;
                        Ok(())
                    });
                let write: WriteStep<T, C> =
                    Box::new(move |obj: &T, output: &mut ObjectOutput<'_, C>| {
                        codec.write(get(obj), output)
                    });
                Ok((read, write))
            }),
        }
    }

    /// A field handed over entirely to the custom serializer `S`.
    ///
    /// The serializer instantiates the value, populates it and writes it;
    /// no built-in handling applies. One `S` instance is shared per registry.
    pub fn custom<V, S>(
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self
    where
        V: Send + Sync + 'static,
        S: Serializer<V, C> + Default,
    {
        Self {
            name,
            kind: None,
            modifiers: Modifiers::empty(),
            length: None,
            bind: Box::new(move |_, registry| {
                let serializer = registry.serializer::<S>();
                let read_serializer = serializer.clone();
                let read: ReadStep<T, C> =
                    Box::new(move |obj: &mut T, input: &mut ObjectInput<'_, C>| {
                        let mut value = read_serializer.instantiate(input)?;
                        read_serializer.read_object(&mut value, input)?;
                        *get_mut(obj) = value;
                        Ok(())
                    });
                let write: WriteStep<T, C> =
                    Box::new(move |obj: &T, output: &mut ObjectOutput<'_, C>| {
                        serializer.write_object(get(obj), output)
                    });
                Ok((read, write))
            }),
        }
    }

    #[inline]
    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Length policy of an array field.
    #[inline]
    pub fn length(mut self, length: LengthPrefix) -> Self {
        self.length = Some(length);
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Built-in kind, `None` for custom fields.
    #[inline]
    pub fn kind(&self) -> Option<Kind> {
        self.kind
    }

    #[inline]
    pub fn is_custom(&self) -> bool {
        self.kind.is_none()
    }

    /// Validates the field-level annotations and binds the codec.
    pub(crate) fn bind(
        self,
        owner: &'static str,
        registry: &Registry<C>,
    ) -> Result<(ReadStep<T, C>, WriteStep<T, C>)> {
        let meta = FieldMeta {
            owner,
            name: self.name,
            modifiers: self.modifiers,
            length: self.length,
        };

        match self.kind {
            None if !self.modifiers.is_empty() || self.length.is_some() => {
                return Err(meta.schema_error(SchemaError::CustomModifiers { field: self.name }));
            }
            Some(kind) if kind != Kind::Array && self.length.is_some() => {
                return Err(meta.schema_error(SchemaError::Length { field: self.name }));
            }
            _ => {}
        }

        (self.bind)(&meta, registry)
    }
}

impl<T, C: Context> fmt::Debug for FieldDescriptor<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("modifiers", &self.modifiers)
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}
