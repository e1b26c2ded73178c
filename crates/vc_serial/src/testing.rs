//! In-memory stream helpers shared by unit tests.

use alloc::vec::Vec;

use vc_stream::{Charset, DataInput, DataInputStream, DataOutputStream};

use crate::{ObjectInput, ObjectOutput, Registry, Result};

pub(crate) fn try_encode(
    registry: &Registry<()>,
    sink: &mut Vec<u8>,
    f: impl FnOnce(&mut ObjectOutput<'_, ()>) -> Result<()>,
) -> Result<()> {
    let mut stream = DataOutputStream::new(sink, Charset::Latin1);
    f(&mut ObjectOutput::new(&mut stream, &(), registry))
}

pub(crate) fn encode(
    registry: &Registry<()>,
    f: impl FnOnce(&mut ObjectOutput<'_, ()>) -> Result<()>,
) -> Vec<u8> {
    let mut bytes = Vec::new();
    try_encode(registry, &mut bytes, f).unwrap();
    bytes
}

pub(crate) fn try_decode<V>(
    registry: &Registry<()>,
    bytes: &[u8],
    f: impl FnOnce(&mut ObjectInput<'_, ()>) -> Result<V>,
) -> Result<V> {
    let mut stream = DataInputStream::new(bytes, Charset::Latin1);
    let mut input = ObjectInput::new(&mut stream, &(), registry);
    let value = f(&mut input)?;
    assert_eq!(stream.position() as usize, bytes.len(), "bytes left unread");
    Ok(value)
}

pub(crate) fn decode<V>(
    registry: &Registry<()>,
    bytes: &[u8],
    f: impl FnOnce(&mut ObjectInput<'_, ()>) -> Result<V>,
) -> V {
    try_decode(registry, bytes, f).unwrap()
}
