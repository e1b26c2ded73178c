use alloc::boxed::Box;
use alloc::vec::Vec;

#[cfg(all(debug_assertions, feature = "debug"))]
use vc_stream::{DataInput, DataOutput};

use crate::error::{MarshalError, Result, SchemaError};
use crate::object::{Context, Marshal};
use crate::plan::{Compiled, ReadStep, WriteStep};
use crate::registry::Registry;
use crate::schema::SchemaType;
#[cfg(all(debug_assertions, feature = "debug"))]
use crate::stream::{ObjectInput, ObjectOutput};

/// Compiles `schema` into plan steps.
///
/// Sequence per direction: the ancestor step first, then the hook if one is
/// declared, otherwise one step per own field. Own fields are bound even
/// when both hooks replace them, so their annotations are validated either
/// way.
pub(crate) fn compile<T: Marshal<C>, C: Context>(
    schema: SchemaType<T, C>,
    registry: &Registry<C>,
) -> Result<Compiled<T, C>> {
    let SchemaType {
        name,
        constructor,
        ancestor,
        duplicate_ancestor,
        fields,
        read_hook,
        write_hook,
        custom,
    } = schema;

    let fail = |reason| MarshalError::Schema {
        type_name: name,
        reason,
    };

    if duplicate_ancestor {
        return Err(fail(SchemaError::DuplicateAncestor));
    }
    if constructor.is_none() && custom.is_none() {
        return Err(fail(SchemaError::NoConstructor));
    }
    for (index, field) in fields.iter().enumerate() {
        if fields[..index].iter().any(|f| f.name() == field.name()) {
            return Err(fail(SchemaError::DuplicateField(field.name())));
        }
    }

    let mut read: Vec<ReadStep<T, C>> = Vec::with_capacity(fields.len() + 1);
    let mut write: Vec<WriteStep<T, C>> = Vec::with_capacity(fields.len() + 1);

    if let Some(bind) = ancestor {
        let (read_step, write_step) = bind(registry)?;
        read.push(read_step);
        write.push(write_step);
    }

    let mut own_read = Vec::with_capacity(fields.len());
    let mut own_write = Vec::with_capacity(fields.len());
    for field in fields {
        #[cfg(all(debug_assertions, feature = "debug"))]
        let field_name = field.name();

        let (read_step, write_step) = field.bind(name, registry)?;

        #[cfg(all(debug_assertions, feature = "debug"))]
        let (read_step, write_step) = (
            traced_read(name, field_name, read_step),
            traced_write(name, field_name, write_step),
        );

        own_read.push(read_step);
        own_write.push(write_step);
    }

    match read_hook {
        Some(hook) => read.push(Box::new(hook)),
        None => read.extend(own_read),
    }
    match write_hook {
        Some(hook) => write.push(Box::new(hook)),
        None => write.extend(own_write),
    }

    let custom = custom.map(|factory| factory(registry));

    Ok(Compiled {
        constructor,
        custom,
        read,
        write,
    })
}

#[cfg(all(debug_assertions, feature = "debug"))]
fn traced_read<T: 'static, C: Context>(
    owner: &'static str,
    field: &'static str,
    step: ReadStep<T, C>,
) -> ReadStep<T, C> {
    Box::new(move |obj: &mut T, input: &mut ObjectInput<'_, C>| {
        log::trace!("read `{owner}.{field}` at {}", input.position());
        step(obj, input).inspect_err(|err| log::debug!("read `{owner}.{field}` failed: {err}"))
    })
}

#[cfg(all(debug_assertions, feature = "debug"))]
fn traced_write<T: 'static, C: Context>(
    owner: &'static str,
    field: &'static str,
    step: WriteStep<T, C>,
) -> WriteStep<T, C> {
    Box::new(move |obj: &T, output: &mut ObjectOutput<'_, C>| {
        log::trace!("write `{owner}.{field}` at {}", output.position());
        step(obj, output).inspect_err(|err| log::debug!("write `{owner}.{field}` failed: {err}"))
    })
}

// -----------------------------------------------------------------------------
// Tests
