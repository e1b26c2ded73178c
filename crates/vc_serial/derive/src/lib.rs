//! See [`Marshal`](derive_marshal).
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static MARSHAL_ATTRIBUTE_NAME: &str = "marshal";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Marshal Derivation
///
/// `#[derive(Marshal)]` implements `Marshal` and `FieldType` for records,
/// and additionally `Variants` for closed polymorphic enums.
///
/// The generated schema lists every field in declaration order. Values are
/// constructed through `Default`, unless a type-level `custom` serializer
/// instantiates them.
///
/// ## Field attributes
///
/// | attribute | effect |
/// |---|---|
/// | `ancestor` | the field holds the ancestor record; its plan runs first |
/// | `skip` | not transcoded, keeps its `Default` value |
/// | `compact` | `i32` as a compact integer |
/// | `ushort` / `ubyte` | `i32` as an unsigned 16/8-bit value |
/// | `utf` | `String` as `i32`-length UTF-16 text |
/// | `length = byte \| int \| compact` | array length prefix, compact by default |
/// | `custom = Type` | the field is handled by the serializer `Type` |
///
/// On array fields the numeric and text modifiers describe the elements.
///
/// ```rust, ignore
/// #[derive(Marshal, Default)]
/// struct Mesh {
///     #[marshal(ancestor)]
///     base: Object,
///     #[marshal(compact)]
///     lod: i32,
///     #[marshal(ushort, length = int)]
///     indices: Vec<i32>,
///     #[marshal(custom = DeflatedText)]
///     script: String,
///     #[marshal(skip)]
///     cache: Vec<i32>,
/// }
/// ```
///
/// ## Type attributes
///
/// | attribute | effect |
/// |---|---|
/// | `read_hook = path` | `fn(&mut Self, &mut ObjectInput<C>) -> Result<()>` replacing the own-field read |
/// | `write_hook = path` | `fn(&Self, &mut ObjectOutput<C>) -> Result<()>` replacing the own-field write |
/// | `custom = Type` | type-level serializer, used whenever the type is read or written as a whole |
/// | `context = Type` | implement for this context only instead of every context |
/// | `tag_width = byte \| int \| compact` | discriminant width of an enum, `byte` by default |
///
/// Hooks never replace the ancestor, which still runs first.
///
/// ## Enums
///
/// Each variant wraps exactly one record. The enum reads and writes through
/// `Tagged<Self>` unless a type-level `custom` serializer is given.
///
/// ```rust, ignore
/// #[derive(Marshal)]
/// enum Shape {
///     #[marshal(tag = 0, fallback)]
///     Circle(Circle),
///     #[marshal(tag = 1)]
///     Square(Square),
/// }
/// ```
///
/// Variants without `tag` take their position. An unregistered tag resolves
/// to the `fallback` variant; without one the read fails.
#[proc_macro_derive(Marshal, attributes(marshal))]
pub fn derive_marshal(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    impls::match_marshal_impls(ast)
}
