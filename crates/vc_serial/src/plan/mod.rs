//! Compiled transcoding plans.
//!
//! A [`Plan`] starts as a placeholder when the registry begins building it
//! and becomes immutable once its steps are set. Steps that reference other
//! plans hold the `Arc` and look at its contents only when they run, which
//! is what lets a type reach itself through its fields.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use std::sync::OnceLock;

use crate::custom::Serializer;
use crate::error::{MarshalError, Result, SchemaError};
use crate::object::{Context, Marshal};
use crate::stream::{ObjectInput, ObjectOutput};

// -----------------------------------------------------------------------------
// Modules

mod builder;

pub(crate) use builder::compile;

// -----------------------------------------------------------------------------
// Steps

/// One bound read operation of a plan.
pub type ReadStep<T, C> = Box<dyn Fn(&mut T, &mut ObjectInput<'_, C>) -> Result<()> + Send + Sync>;

/// One bound write operation of a plan.
pub type WriteStep<T, C> = Box<dyn Fn(&T, &mut ObjectOutput<'_, C>) -> Result<()> + Send + Sync>;

pub(crate) struct Compiled<T, C: Context> {
    pub(crate) constructor: Option<fn() -> T>,
    pub(crate) custom: Option<Arc<dyn Serializer<T, C>>>,
    pub(crate) read: Vec<ReadStep<T, C>>,
    pub(crate) write: Vec<WriteStep<T, C>>,
}

// -----------------------------------------------------------------------------
// PlanState

/// Build state of a plan that exists in a registry.
///
/// A type without any entry is unbuilt. No transition follows `Built`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanState {
    /// Placeholder installed, steps not set yet.
    Building,
    /// Steps set, immutable from now on.
    Built,
}

// -----------------------------------------------------------------------------
// Plan

/// Compiled read/write sequence of one [`Marshal`] type.
///
/// The read sequence is the ancestor's sequence (as a single step) followed
/// by the read hook, or by the own fields in declaration order when there is
/// no hook. The write sequence is built the same way.
pub struct Plan<T, C: Context> {
    type_name: &'static str,
    compiled: OnceLock<Compiled<T, C>>,
}

impl<T: Marshal<C>, C: Context> Plan<T, C> {
    pub(crate) fn placeholder(type_name: &'static str) -> Self {
        Self {
            type_name,
            compiled: OnceLock::new(),
        }
    }

    pub(crate) fn finish(&self, compiled: Compiled<T, C>) {
        if self.compiled.set(compiled).is_err() {
            log::warn!("plan for `{}` was already built", self.type_name);
        }
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn state(&self) -> PlanState {
        if self.compiled.get().is_some() {
            PlanState::Built
        } else {
            PlanState::Building
        }
    }

    /// Number of read and write steps, `None` while building.
    pub fn step_count(&self) -> Option<(usize, usize)> {
        self.compiled.get().map(|c| (c.read.len(), c.write.len()))
    }

    #[inline]
    pub fn has_custom(&self) -> bool {
        self.compiled.get().is_some_and(|c| c.custom.is_some())
    }

    #[inline]
    fn compiled(&self) -> Result<&Compiled<T, C>> {
        self.compiled.get().ok_or(MarshalError::Unbuilt(self.type_name))
    }

    /// Creates an empty value: through the type-level custom serializer if
    /// present (which may consume a discriminant), otherwise through the
    /// constructor.
    pub fn instantiate(&self, input: &mut ObjectInput<'_, C>) -> Result<T> {
        let compiled = self.compiled()?;
        match (&compiled.custom, compiled.constructor) {
            (Some(custom), _) => custom.instantiate(input),
            (None, Some(constructor)) => Ok(constructor()),
            (None, None) => Err(MarshalError::Schema {
                type_name: self.type_name,
                reason: SchemaError::NoConstructor,
            }),
        }
    }

    /// Runs this plan's own read sequence on `obj`.
    pub fn read_fields(&self, obj: &mut T, input: &mut ObjectInput<'_, C>) -> Result<()> {
        for step in &self.compiled()?.read {
            step(obj, input)?;
        }
        Ok(())
    }

    /// Runs this plan's own write sequence on `obj`.
    pub fn write_fields(&self, obj: &T, output: &mut ObjectOutput<'_, C>) -> Result<()> {
        for step in &self.compiled()?.write {
            step(obj, output)?;
        }
        Ok(())
    }

    /// Populates `obj` with the plan of its concrete runtime type.
    ///
    /// For records that is this plan. For polymorphic enums it is the plan
    /// of the active variant's payload.
    pub fn populate(&self, obj: &mut T, input: &mut ObjectInput<'_, C>) -> Result<()> {
        if obj.as_object().object_type_id() == TypeId::of::<T>() {
            return self.read_fields(obj, input);
        }
        let concrete = obj.as_object_mut();
        let plan = concrete.plan(input.registry())?;
        plan.read_dyn(concrete.as_any_mut(), input)
    }

    /// Emits `obj` with the plan of its concrete runtime type.
    pub fn emit(&self, obj: &T, output: &mut ObjectOutput<'_, C>) -> Result<()> {
        let concrete = obj.as_object();
        if concrete.object_type_id() == TypeId::of::<T>() {
            return self.write_fields(obj, output);
        }
        let plan = concrete.plan(output.registry())?;
        plan.write_dyn(concrete.as_any(), output)
    }

    /// Reads a whole value: instantiate, then populate. A type-level custom
    /// serializer takes over both halves.
    pub fn read_object(&self, input: &mut ObjectInput<'_, C>) -> Result<T> {
        let compiled = self.compiled()?;
        if let Some(custom) = &compiled.custom {
            let mut obj = custom.instantiate(input)?;
            custom.read_object(&mut obj, input)?;
            return Ok(obj);
        }
        let mut obj = self.instantiate(input)?;
        self.populate(&mut obj, input)?;
        Ok(obj)
    }

    /// Writes a whole value, through the type-level custom serializer when
    /// there is one.
    pub fn write_object(&self, obj: &T, output: &mut ObjectOutput<'_, C>) -> Result<()> {
        match &self.compiled()?.custom {
            Some(custom) => custom.write_object(obj, output),
            None => self.emit(obj, output),
        }
    }
}

impl<T, C: Context> fmt::Debug for Plan<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Plan");
        debug.field("type_name", &self.type_name);
        match self.compiled.get() {
            Some(compiled) => debug
                .field("read", &compiled.read.len())
                .field("write", &compiled.write.len())
                .field("custom", &compiled.custom.is_some()),
            None => debug.field("state", &PlanState::Building),
        };
        debug.finish()
    }
}

// -----------------------------------------------------------------------------
// ErasedPlan

/// Object-safe view of a [`Plan`], used when the concrete type is only
/// known at runtime.
pub trait ErasedPlan<C: Context>: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn state(&self) -> PlanState;

    /// [`Plan::populate`] on a value of the plan's type.
    fn read_dyn(&self, obj: &mut dyn Any, input: &mut ObjectInput<'_, C>) -> Result<()>;

    /// [`Plan::emit`] on a value of the plan's type.
    fn write_dyn(&self, obj: &dyn Any, output: &mut ObjectOutput<'_, C>) -> Result<()>;
}

impl<T: Marshal<C>, C: Context> ErasedPlan<C> for Plan<T, C> {
    #[inline]
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    fn state(&self) -> PlanState {
        Plan::state(self)
    }

    fn read_dyn(&self, obj: &mut dyn Any, input: &mut ObjectInput<'_, C>) -> Result<()> {
        let obj = obj.downcast_mut::<T>().ok_or(MarshalError::TypeMismatch {
            expected: self.type_name,
        })?;
        self.populate(obj, input)
    }

    fn write_dyn(&self, obj: &dyn Any, output: &mut ObjectOutput<'_, C>) -> Result<()> {
        let obj = obj.downcast_ref::<T>().ok_or(MarshalError::TypeMismatch {
            expected: self.type_name,
        })?;
        self.emit(obj, output)
    }
}
