// -----------------------------------------------------------------------------
// Modules

mod match_marshal;

mod enum_kind;
mod struct_kind;

mod field_type;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use match_marshal::match_marshal_impls;

use enum_kind::impl_enum;
use field_type::impl_field_type;
use struct_kind::impl_struct;
