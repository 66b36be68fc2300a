pub mod coercion;
pub mod record_class;

pub use coercion::{Coercion, CoercionError};
pub use record_class::{FieldSpec, RecordClass, RecordKind};
