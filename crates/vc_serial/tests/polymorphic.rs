//! Closed polymorphic enums and type-level custom serializers.

use std::thread;

use vc_serial::vc_stream::{DataInput, DataOutput};
use vc_serial::{
    Context, Marshal, MarshalError, ObjectInput, ObjectOutput, Registry, Result, Serializer,
    TagWidth, Variants,
};

// -----------------------------------------------------------------------------
// Records

#[derive(Marshal, Default, Debug, PartialEq, Clone)]
struct Mesh {
    #[marshal(compact)]
    vertices: i32,
}

#[derive(Marshal, Default, Debug, PartialEq, Clone)]
struct SkinnedMesh {
    #[marshal(ancestor)]
    mesh: Mesh,
    #[marshal(ubyte)]
    bones: i32,
}

#[derive(Marshal, Default, Debug, PartialEq, Clone)]
struct Sound {
    #[marshal(ushort)]
    rate: i32,
}

/// Strict: unknown tags are errors.
#[derive(Marshal, Debug, PartialEq, Clone)]
#[marshal(tag_width = compact)]
enum Resource {
    Mesh(Mesh),
    Skinned(SkinnedMesh),
    #[marshal(tag = 300)]
    Sound(Sound),
}

#[derive(Marshal, Default, Debug, PartialEq)]
struct Bundle {
    #[marshal(length = int)]
    items: Vec<Resource>,
}

#[test]
fn tags_follow_declaration_order() {
    assert_eq!(<Resource as Variants>::TAG_WIDTH, TagWidth::Compact);
    assert_eq!(Resource::Mesh(Mesh::default()).tag(), 0);
    assert_eq!(Resource::Skinned(SkinnedMesh::default()).tag(), 1);
    assert_eq!(Resource::Sound(Sound::default()).tag(), 300);
    assert!(Resource::from_tag(2).is_none());
    assert!(Resource::fallback().is_none());
}

#[test]
fn each_element_carries_its_variant() {
    let registry = Registry::new();
    let bundle = Bundle {
        items: vec![
            Resource::Skinned(SkinnedMesh {
                mesh: Mesh { vertices: 3 },
                bones: 2,
            }),
            Resource::Mesh(Mesh { vertices: 5 }),
        ],
    };

    let bytes = registry.to_bytes(&(), &bundle).unwrap();
    assert_eq!(bytes, [2, 0, 0, 0, 1, 3, 2, 0, 5]);
    assert_eq!(registry.from_bytes::<Bundle>(&(), &bytes).unwrap(), bundle);
}

#[test]
fn strict_enum_rejects_unknown_tags() {
    let registry = Registry::new();
    let err = registry.from_bytes::<Resource>(&(), &[9, 0]).unwrap_err();
    assert!(matches!(
        err,
        MarshalError::UnknownDiscriminant { tag: 9, .. }
    ));
}

#[test]
fn concurrent_readers_share_plans() {
    let registry = Registry::new();
    let bytes = registry
        .to_bytes(&(), &Resource::Sound(Sound { rate: 44100 }))
        .unwrap();

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let back: Resource = registry.from_bytes(&(), &bytes).unwrap();
                assert_eq!(back, Resource::Sound(Sound { rate: 44100 }));
            });
        }
    });
    // Payload plans are built on first dispatch, Mesh was never reached.
    assert_eq!(registry.len(), 2);
}

// -----------------------------------------------------------------------------
// Type-level custom serializer

/// A record whose version byte picks the layout of the rest.
#[derive(Marshal, Default, Debug, PartialEq)]
#[marshal(custom = HeaderSerializer)]
struct Header {
    version: i32,
    flags: i32,
}

#[derive(Default)]
struct HeaderSerializer;

impl<C: Context> Serializer<Header, C> for HeaderSerializer {
    fn instantiate(&self, input: &mut ObjectInput<'_, C>) -> Result<Header> {
        let version = i32::from(input.read_unsigned_byte()?);
        Ok(Header { version, flags: 0 })
    }

    fn read_object(&self, obj: &mut Header, input: &mut ObjectInput<'_, C>) -> Result<()> {
        if obj.version > 1 {
            obj.flags = input.read_int()?;
        }
        Ok(())
    }

    fn write_object(&self, obj: &Header, output: &mut ObjectOutput<'_, C>) -> Result<()> {
        output.write_byte(obj.version as u8)?;
        if obj.version > 1 {
            output.write_int(obj.flags)?;
        }
        Ok(())
    }
}

#[derive(Marshal, Default, Debug, PartialEq)]
struct Archive {
    #[marshal(ubyte)]
    count: i32,
    header: Header,
}

#[test]
fn custom_type_serializer_owns_the_layout() {
    let registry = Registry::new();

    let old = Header { version: 1, flags: 0 };
    assert_eq!(registry.to_bytes(&(), &old).unwrap(), [1]);
    assert_eq!(registry.from_bytes::<Header>(&(), &[1]).unwrap(), old);

    let new = Header { version: 2, flags: 6 };
    let bytes = registry.to_bytes(&(), &new).unwrap();
    assert_eq!(bytes, [2, 6, 0, 0, 0]);
    assert_eq!(registry.from_bytes::<Header>(&(), &bytes).unwrap(), new);
}

#[test]
fn custom_type_serializer_applies_to_fields() {
    let registry = Registry::new();
    let archive = Archive {
        count: 1,
        header: Header { version: 2, flags: 6 },
    };
    let bytes = registry.to_bytes(&(), &archive).unwrap();
    assert_eq!(bytes, [1, 2, 6, 0, 0, 0]);
    assert_eq!(registry.from_bytes::<Archive>(&(), &bytes).unwrap(), archive);
}
