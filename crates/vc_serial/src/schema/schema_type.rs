use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::custom::Serializer;
use crate::error::Result;
use crate::object::{Context, Marshal};
use crate::plan::{ReadStep, WriteStep};
use crate::registry::Registry;
use crate::schema::FieldDescriptor;
use crate::stream::{ObjectInput, ObjectOutput};

/// Replaces the field-derived read of one type's own declaration level.
pub type ReadHook<T, C> = fn(&mut T, &mut ObjectInput<'_, C>) -> Result<()>;

/// Replaces the field-derived write of one type's own declaration level.
pub type WriteHook<T, C> = fn(&T, &mut ObjectOutput<'_, C>) -> Result<()>;

type AncestorBind<T, C> = Box<dyn FnOnce(&Registry<C>) -> Result<(ReadStep<T, C>, WriteStep<T, C>)>>;

type CustomFactory<T, C> = Box<dyn FnOnce(&Registry<C>) -> Arc<dyn Serializer<T, C>>>;

// -----------------------------------------------------------------------------
// SchemaType

/// Declarative description of one record type, compiled into a
/// [`Plan`](crate::Plan) on first use.
///
/// The builder captures everything the plan needs:
///
/// - how to construct an empty value;
/// - at most one ancestor, reached through a projection to the field that
///   holds it;
/// - the eligible fields, in declaration order;
/// - optional read/write hooks that replace this level's own fields;
/// - an optional type-level custom serializer, used whenever the type is
///   read or written as a whole.
pub struct SchemaType<T, C: Context> {
    pub(crate) name: &'static str,
    pub(crate) constructor: Option<fn() -> T>,
    pub(crate) ancestor: Option<AncestorBind<T, C>>,
    pub(crate) duplicate_ancestor: bool,
    pub(crate) fields: Vec<FieldDescriptor<T, C>>,
    pub(crate) read_hook: Option<ReadHook<T, C>>,
    pub(crate) write_hook: Option<WriteHook<T, C>>,
    pub(crate) custom: Option<CustomFactory<T, C>>,
}

impl<T: 'static, C: Context> SchemaType<T, C> {
    /// Creates an empty schema. `name` is used in diagnostics and logs.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            constructor: None,
            ancestor: None,
            duplicate_ancestor: false,
            fields: Vec::new(),
            read_hook: None,
            write_hook: None,
            custom: None,
        }
    }

    /// Sets the no-argument constructor used to instantiate values.
    #[inline]
    pub fn constructor(mut self, constructor: fn() -> T) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Declares the ancestor held in the field reached through `get`.
    ///
    /// The ancestor's whole compiled sequence runs as the first step of this
    /// type's read and write, ahead of own fields or hooks.
    pub fn ancestor<A: Marshal<C>>(mut self, get: fn(&T) -> &A, get_mut: fn(&mut T) -> &mut A) -> Self {
        if self.ancestor.is_some() {
            self.duplicate_ancestor = true;
        }
        self.ancestor = Some(Box::new(move |registry| {
            let plan = registry.plan::<A>()?;
            let read_plan = plan.clone();
            let read: ReadStep<T, C> = Box::new(move |obj: &mut T, input: &mut ObjectInput<'_, C>| {
                read_plan.read_fields(get_mut(obj), input)
            });
            let write: WriteStep<T, C> =
                Box::new(move |obj: &T, output: &mut ObjectOutput<'_, C>| {
                    plan.write_fields(get(obj), output)
                });
            Ok((read, write))
        }));
        self
    }

    /// Appends an eligible field.
    #[inline]
    pub fn field(mut self, field: FieldDescriptor<T, C>) -> Self {
        self.fields.push(field);
        self
    }

    #[inline]
    pub fn read_hook(mut self, hook: ReadHook<T, C>) -> Self {
        self.read_hook = Some(hook);
        self
    }

    #[inline]
    pub fn write_hook(mut self, hook: WriteHook<T, C>) -> Self {
        self.write_hook = Some(hook);
        self
    }

    /// Hands whole-value reads and writes of `T` to `S`.
    ///
    /// The instance is shared with every field naming the same serializer.
    pub fn custom<S: Serializer<T, C> + Default>(mut self) -> Self {
        self.custom = Some(Box::new(|registry| {
            let serializer: Arc<dyn Serializer<T, C>> = registry.serializer::<S>();
            serializer
        }));
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor<T, C>] {
        &self.fields
    }

    #[inline]
    pub fn has_ancestor(&self) -> bool {
        self.ancestor.is_some()
    }

    #[inline]
    pub fn has_read_hook(&self) -> bool {
        self.read_hook.is_some()
    }

    #[inline]
    pub fn has_write_hook(&self) -> bool {
        self.write_hook.is_some()
    }

    #[inline]
    pub fn has_custom(&self) -> bool {
        self.custom.is_some()
    }
}

impl<T, C: Context> fmt::Debug for SchemaType<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaType")
            .field("name", &self.name)
            .field("ancestor", &self.ancestor.is_some())
            .field("fields", &self.fields)
            .field("read_hook", &self.read_hook.is_some())
            .field("write_hook", &self.write_hook.is_some())
            .field("custom", &self.custom.is_some())
            .finish()
    }
}
