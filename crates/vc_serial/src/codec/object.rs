use crate::codec::Codec;
use crate::error::Result;
use crate::object::{Context, Marshal};
use crate::registry::Registry;
use crate::schema::{FieldMeta, Kind, Modifiers};

/// Codec of a composite field holding a `T`.
///
/// Reads instantiate through `T`'s custom serializer when it declares one,
/// otherwise through its constructor followed by the plan of the concrete
/// runtime type. Writes mirror that choice.
///
/// Only the plan reference is captured here. The plan may still be a
/// placeholder (a type reachable from its own fields) and is resolved when
/// the codec first runs.
pub fn object_codec<T: Marshal<C>, C: Context>(
    meta: &FieldMeta,
    registry: &Registry<C>,
) -> Result<Codec<T, C>> {
    meta.allow_modifiers(Kind::Object, Modifiers::empty())?;

    let plan = registry.plan::<T>()?;
    let read_plan = plan.clone();
    Ok(Codec::new(
        move |input| read_plan.read_object(input),
        move |value, output| plan.write_object(value, output),
    ))
}
