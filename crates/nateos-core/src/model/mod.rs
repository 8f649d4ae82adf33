// ── Domain model ──
//
// Static catalog of configuration domains plus the loosely-typed records
// the remote store returns for them.

pub mod domain;
pub mod field;
pub mod record;

pub use domain::{
    DomainDescriptor, DomainId, KeySpec, Layer, MutationKind, Shape, UpsertRoute, Verb, catalog,
    describe, describe_str,
};
pub use field::{FieldDefault, FieldKind, FieldSpec, Scalar};
pub use record::{DomainState, Record};
