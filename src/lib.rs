//! Type classification and value mapping for the XML-RPC wire protocol.
//!
//! A [`Mapper`] walks a flattened stream of wire [`Node`]s and produces
//! dynamic [`Value`]s, optionally constrained by a [`TypeDesc`] resolved
//! against a [`TypeRegistry`] of record and enum descriptors. Tolerances
//! for out-of-spec peers are collected in [`MapperOptions`], and failures
//! carry a rendered [`MappingStack`] trace down to the offending value.

mod composite;
mod error;
mod fault;
mod iso8601;
mod mapper;
mod node;
mod options;
mod stack;
mod typeinfo;
mod types;
mod value;

/// Untyped-array element type inference.
pub use composite::infer_element_type;
/// Error and result aliases.
pub use error::{MapError, Result};
/// Fault-response extraction.
pub use fault::Fault;
/// ISO-8601 parsing helpers and the minimum date sentinel.
pub use iso8601::{min_date_time, parse_date_time, parse_date_time_lenient};
/// The node-to-value mapping engine.
pub use mapper::Mapper;
/// Wire node stream types.
pub use node::{Node, NodeCursor};
/// Mapping tolerances and the missing-member actions.
pub use options::{MapperOptions, MappingAction};
/// Diagnostic mapping trace.
pub use stack::MappingStack;
/// Wire type classification.
pub use typeinfo::{XmlRpcKind, kind_str, xml_rpc_kind};
/// Native type descriptors and the descriptor registry.
pub use types::{EnumDesc, IntWidth, MemberDesc, StructDesc, TypeDesc, TypeRegistry};
/// Mapped runtime values.
pub use value::{EnumValue, FieldValue, MultiArray, StructValue, Value, XmlRpcStruct};
