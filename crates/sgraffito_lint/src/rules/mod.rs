//! Built-in lint rules.
//!
//! Every rule works from resolved origins rather than surface syntax,
//! so aliasing and destructuring do not hide findings and unknown
//! values never produce them.

mod no_deprecated_instance_members;
mod no_multiple_slot_args;
mod no_prop_mutation;
mod ref_needs_value;

pub use no_deprecated_instance_members::NoDeprecatedInstanceMembers;
pub use no_multiple_slot_args::NoMultipleSlotArgs;
pub use no_prop_mutation::NoPropMutation;
pub use ref_needs_value::RefNeedsValue;
