use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, MapError>;

/// Failures raised while mapping wire nodes to native values.
///
/// Every mapping variant carries the rendered trace: the mapping subject
/// followed by each context pushed on the way down to the failing value.
#[derive(Debug, Error)]
pub enum MapError {
	/// Wire value shape is incompatible with the expected native type.
	#[error("{subject} contains {found} value where {expected} expected {trace}")]
	TypeMismatch {
		/// Mapping subject label.
		subject: String,
		/// Wire shape that was found.
		found: String,
		/// Description of the expected shape.
		expected: String,
		/// Rendered mapping trace.
		trace: String,
	},
	/// Primitive payload does not parse under its wire-type grammar.
	#[error("{subject} contains invalid {wire_type} value {trace}")]
	InvalidValue {
		/// Mapping subject label.
		subject: String,
		/// Wire-type keyword of the offending payload.
		wire_type: &'static str,
		/// Rendered mapping trace.
		trace: String,
	},
	/// Wire value does not correspond to a defined enum member.
	#[error("{subject} contains invalid or out of range {wire_type} value mapped to enum {enum_name} {trace}")]
	InvalidEnumValue {
		/// Mapping subject label.
		subject: String,
		/// Wire-type keyword of the attempted mapping.
		wire_type: &'static str,
		/// Target enum type name.
		enum_name: String,
		/// Rendered mapping trace.
		trace: String,
	},
	/// Required record members never appeared on the wire under the
	/// `Error` mapping action.
	#[error("{subject} contains struct value with missing non-optional members: {members} {trace}")]
	MissingMembers {
		/// Mapping subject label.
		subject: String,
		/// Target record type name.
		type_name: String,
		/// Space-separated missing member names.
		members: String,
		/// Rendered mapping trace.
		trace: String,
	},
	/// A struct member name repeated with duplicate tolerance disabled.
	#[error("{subject} contains struct value with duplicate member {member} {trace}")]
	DuplicateMember {
		/// Mapping subject label.
		subject: String,
		/// Duplicated wire member name.
		member: String,
		/// Rendered mapping trace.
		trace: String,
	},
	/// A wire member resolved to a target member excluded from mapping.
	#[error("cannot map wire member onto excluded member {member} {trace}")]
	ExcludedMember {
		/// Excluded native member name.
		member: String,
		/// Rendered mapping trace.
		trace: String,
	},
	/// Sub-arrays of a multi-dimensional array have unequal lengths.
	#[error("multi-dimensional array must not be jagged: rank {rank} saw {got} elements, expected {expected} {trace}")]
	NonRegularArray {
		/// Zero-based rank at which the length diverged.
		rank: u32,
		/// Length recorded from the first sub-array at this rank.
		expected: usize,
		/// Length of the offending sibling sub-array.
		got: usize,
		/// Rendered mapping trace.
		trace: String,
	},
	/// The node stream ended inside a value.
	#[error("unexpected end of wire nodes {trace}")]
	UnexpectedEnd {
		/// Rendered mapping trace.
		trace: String,
	},
	/// Application fault reported by the remote peer; not raised by the
	/// mapper itself.
	#[error("server returned a fault exception: [{code}] {fault_string}")]
	Fault {
		/// Numeric fault code.
		code: i32,
		/// Human-readable fault description.
		fault_string: String,
	},
	/// A fault response did not have the required member shape.
	#[error("malformed fault response: {detail}")]
	MalformedFault {
		/// What was wrong with the fault struct.
		detail: &'static str,
	},
}
