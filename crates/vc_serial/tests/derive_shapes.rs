//! `#[derive(Marshal)]` over the supported struct shapes and attributes.

use vc_serial::vc_stream::DataInput;
use vc_serial::{LengthPrefix, Marshal, MarshalError, ObjectInput, PlanState, Registry, Result, SchemaError};

// -----------------------------------------------------------------------------
// Shapes

#[derive(Marshal, Default, Debug, PartialEq)]
struct Scalars {
    byte: i8,
    short: i16,
    int: i32,
    long: i64,
    float: f32,
}

#[derive(Marshal, Default, Debug, PartialEq)]
struct Point(i16, #[marshal(compact)] i32);

#[derive(Marshal, Default, Debug, PartialEq)]
struct Marker;

#[derive(Marshal, Default, Debug, PartialEq)]
struct Labels {
    #[marshal(utf)]
    title: String,
    line: String,
    #[marshal(skip)]
    cached_len: usize,
}

#[test]
fn scalars_are_little_endian() {
    let registry = Registry::new();
    let value = Scalars {
        byte: -1,
        short: 0x0102,
        int: -2,
        long: 3,
        float: 1.0,
    };
    let bytes = registry.to_bytes(&(), &value).unwrap();
    assert_eq!(
        bytes,
        [
            0xFF, //
            0x02, 0x01, //
            0xFE, 0xFF, 0xFF, 0xFF, //
            3, 0, 0, 0, 0, 0, 0, 0, //
            0x00, 0x00, 0x80, 0x3F,
        ],
    );
    assert_eq!(registry.from_bytes::<Scalars>(&(), &bytes).unwrap(), value);
}

#[test]
fn tuple_and_unit_structs() {
    let registry = Registry::new();

    let bytes = registry.to_bytes(&(), &Point(5, 3)).unwrap();
    assert_eq!(bytes, [5, 0, 3]);
    assert_eq!(registry.from_bytes::<Point>(&(), &bytes).unwrap(), Point(5, 3));

    assert!(registry.to_bytes(&(), &Marker).unwrap().is_empty());
    assert_eq!(registry.from_bytes::<Marker>(&(), &[]).unwrap(), Marker);
}

#[test]
fn skipped_fields_keep_their_default() {
    let registry = Registry::new();
    let value = Labels {
        title: "ab".into(),
        line: String::new(),
        cached_len: 99,
    };
    let bytes = registry.to_bytes(&(), &value).unwrap();
    assert_eq!(bytes, [4, 0, 0, 0, b'a', 0, b'b', 0, 0]);

    let back: Labels = registry.from_bytes(&(), &bytes).unwrap();
    assert_eq!(back.title, "ab");
    assert_eq!(back.cached_len, 0);
}

// -----------------------------------------------------------------------------
// Inheritance

#[derive(Marshal, Default, Debug, PartialEq)]
struct Base {
    #[marshal(ubyte)]
    id: i32,
}

#[derive(Marshal, Default, Debug, PartialEq)]
struct Middle {
    #[marshal(ushort)]
    flags: i32,
    #[marshal(ancestor)]
    base: Base,
}

#[derive(Marshal, Default, Debug, PartialEq)]
struct Leaf {
    name: String,
    #[marshal(ancestor)]
    middle: Middle,
}

#[test]
fn ancestors_run_root_first() {
    let registry = Registry::new();
    let value = Leaf {
        name: "x".into(),
        middle: Middle {
            flags: 0x0203,
            base: Base { id: 200 },
        },
    };
    let bytes = registry.to_bytes(&(), &value).unwrap();
    assert_eq!(bytes, [200, 3, 2, 2, b'x', 0]);
    assert_eq!(registry.from_bytes::<Leaf>(&(), &bytes).unwrap(), value);

    assert_eq!(registry.state::<Base>(), Some(PlanState::Built));
    assert_eq!(registry.state::<Middle>(), Some(PlanState::Built));
}

// -----------------------------------------------------------------------------
// Context

struct Package {
    version: i32,
}

/// Reads its payload only from version 2 on.
#[derive(Marshal, Default, Debug, PartialEq)]
#[marshal(context = Package, read_hook = Versioned::read)]
struct Versioned {
    payload: i32,
}

impl Versioned {
    fn read(&mut self, input: &mut ObjectInput<'_, Package>) -> Result<()> {
        if input.context().version >= 2 {
            self.payload = input.read_int()?;
        }
        Ok(())
    }
}

#[test]
fn hooks_see_the_context() {
    let registry = Registry::<Package>::new();
    let bytes = [5, 0, 0, 0];

    let old: Versioned = registry.from_bytes(&Package { version: 1 }, &bytes).unwrap();
    assert_eq!(old.payload, 0);

    let new: Versioned = registry.from_bytes(&Package { version: 2 }, &bytes).unwrap();
    assert_eq!(new.payload, 5);

    // Writes keep the declared fields.
    let written = registry.to_bytes(&Package { version: 1 }, &new).unwrap();
    assert_eq!(written, bytes);
}

// -----------------------------------------------------------------------------
// Generics and recursion

#[derive(Marshal, Default, Debug, PartialEq)]
struct Pair<T> {
    left: T,
    right: T,
}

#[derive(Marshal, Default, Debug, PartialEq)]
struct Tree {
    #[marshal(ubyte)]
    value: i32,
    #[marshal(length = byte)]
    children: Vec<Tree>,
}

#[test]
fn generic_records() {
    let registry = Registry::new();

    let ints = Pair { left: 1i16, right: 2i16 };
    assert_eq!(registry.to_bytes(&(), &ints).unwrap(), [1, 0, 2, 0]);

    let names = Pair {
        left: String::from("a"),
        right: String::from("b"),
    };
    let bytes = registry.to_bytes(&(), &names).unwrap();
    assert_eq!(registry.from_bytes::<Pair<String>>(&(), &bytes).unwrap(), names);
    assert_eq!(registry.len(), 2);
}

#[test]
fn self_referential_record() {
    let registry = Registry::new();
    let tree = Tree {
        value: 1,
        children: vec![
            Tree {
                value: 2,
                children: vec![],
            },
            Tree {
                value: 3,
                children: vec![Tree {
                    value: 4,
                    children: vec![],
                }],
            },
        ],
    };
    let bytes = registry.to_bytes(&(), &tree).unwrap();
    assert_eq!(bytes, [1, 2, 2, 0, 3, 1, 4, 0]);
    assert_eq!(registry.from_bytes::<Tree>(&(), &bytes).unwrap(), tree);
    assert_eq!(registry.len(), 1);
}

// -----------------------------------------------------------------------------
// Failures

#[derive(Marshal, Default, Debug)]
struct Misdeclared {
    #[marshal(compact)]
    name: String,
}

#[derive(Marshal, Default, Debug)]
struct Palette {
    #[marshal(length = byte)]
    colors: Vec<i8>,
}

#[test]
fn misplaced_modifier_fails_the_build() {
    let registry = Registry::new();
    let err = registry.to_bytes(&(), &Misdeclared::default()).unwrap_err();
    match err {
        MarshalError::Schema { type_name, reason } => {
            assert_eq!(type_name, "Misdeclared");
            assert!(matches!(reason, SchemaError::Modifier { field: "name", .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(registry.state::<Misdeclared>(), None);
}

#[test]
fn byte_prefix_overflow() {
    let registry = Registry::new();
    let palette = Palette {
        colors: vec![0; 256],
    };
    let err = registry.to_bytes(&(), &palette).unwrap_err();
    assert!(matches!(
        err,
        MarshalError::LengthOverflow {
            len: 256,
            prefix: LengthPrefix::Byte,
        }
    ));

    let fits = Palette {
        colors: vec![1; 255],
    };
    let bytes = registry.to_bytes(&(), &fits).unwrap();
    assert_eq!(bytes.len(), 256);
    assert_eq!(bytes[0], 255);
}
