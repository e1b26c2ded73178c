//! The caller's context reaches nested records and custom serializers.

use vc_serial::vc_stream::{DataInput, DataOutput};
use vc_serial::{Marshal, ObjectInput, ObjectOutput, Registry, Result, Serializer};

struct Package {
    bias: i32,
}

/// Stores an `i32` shifted by the package bias.
#[derive(Default)]
struct Biased;

impl Serializer<i32, Package> for Biased {
    fn instantiate(&self, input: &mut ObjectInput<'_, Package>) -> Result<i32> {
        let stored = input.read_int()?;
        Ok(stored - input.context().bias)
    }

    fn read_object(&self, _: &mut i32, _: &mut ObjectInput<'_, Package>) -> Result<()> {
        Ok(())
    }

    fn write_object(&self, obj: &i32, output: &mut ObjectOutput<'_, Package>) -> Result<()> {
        let bias = output.context().bias;
        output.write_int(obj + bias)?;
        Ok(())
    }
}

#[derive(Marshal, Default, Debug, PartialEq)]
#[marshal(context = Package)]
struct Slot {
    #[marshal(custom = Biased)]
    value: i32,
}

#[derive(Marshal, Default, Debug, PartialEq)]
#[marshal(context = Package)]
struct Container {
    #[marshal(ubyte)]
    count: i32,
    slot: Slot,
    #[marshal(length = byte)]
    spares: Vec<Slot>,
}

#[test]
fn nested_custom_field_sees_the_context() {
    let registry = Registry::<Package>::new();
    let package = Package { bias: 100 };
    let value = Container {
        count: 1,
        slot: Slot { value: 5 },
        spares: vec![Slot { value: -1 }],
    };

    let bytes = registry.to_bytes(&package, &value).unwrap();
    let mut expected = vec![1];
    expected.extend_from_slice(&105i32.to_le_bytes());
    expected.push(1);
    expected.extend_from_slice(&99i32.to_le_bytes());
    assert_eq!(bytes, expected);

    let back: Container = registry.from_bytes(&package, &bytes).unwrap();
    assert_eq!(back, value);

    // Another context reads the same bytes differently.
    let shifted: Container = registry.from_bytes(&Package { bias: 0 }, &bytes).unwrap();
    assert_eq!(shifted.slot.value, 105);
    assert_eq!(shifted.spares[0].value, 99);
}
