use std::collections::HashMap;
use std::fmt;

use crate::iso8601;
use crate::options::MappingAction;
use crate::value::Value;

/// Descriptor for a native type on the program side of a mapping.
///
/// Struct and enum shapes are referenced by name and resolved through a
/// [`TypeRegistry`], which lets self-referential type graphs be expressed
/// without reference cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
	/// The fully generic type; carries no mapping information.
	Any,
	/// No value (procedure without a return slot).
	Void,
	/// 32-bit signed integer.
	Int,
	/// 64-bit signed integer.
	Long,
	/// Boolean.
	Bool,
	/// Text string.
	String,
	/// 64-bit float.
	Double,
	/// Date and time.
	DateTime,
	/// Opaque byte sequence.
	Base64,
	/// Optional wrapper around another type.
	Nullable(Box<TypeDesc>),
	/// An array with no element type constraint.
	AnyArray,
	/// An array of `elem`; rank 1 is a single-dimension array, higher
	/// ranks are rectangular multi-dimensional arrays.
	Array {
		/// Element type.
		elem: Box<TypeDesc>,
		/// Number of dimensions.
		rank: u32,
	},
	/// The insertion-ordered string-keyed map type.
	Hashtable,
	/// A record type registered under this name.
	Struct(Box<str>),
	/// An enum type registered under this name.
	Enum(Box<str>),
}

impl TypeDesc {
	/// Single-dimension array of `elem`.
	pub fn array(elem: TypeDesc) -> Self {
		TypeDesc::Array {
			elem: Box::new(elem),
			rank: 1,
		}
	}

	/// Rectangular array of `elem` with the given rank.
	pub fn multi_array(elem: TypeDesc, rank: u32) -> Self {
		TypeDesc::Array {
			elem: Box::new(elem),
			rank,
		}
	}

	/// Optional wrapper around `inner`.
	pub fn nullable(inner: TypeDesc) -> Self {
		TypeDesc::Nullable(Box::new(inner))
	}

	/// Record type reference by registered name.
	pub fn record(name: impl Into<Box<str>>) -> Self {
		TypeDesc::Struct(name.into())
	}

	/// Enum type reference by registered name.
	pub fn enumeration(name: impl Into<Box<str>>) -> Self {
		TypeDesc::Enum(name.into())
	}

	/// Zero-initialized value for a member of this type, mirroring default
	/// instantiation of the target record: scalars are zeroed and every
	/// reference-shaped member starts out nil.
	pub fn default_value(&self) -> Value {
		match self {
			TypeDesc::Int => Value::Int(0),
			TypeDesc::Long => Value::Long(0),
			TypeDesc::Bool => Value::Bool(false),
			TypeDesc::Double => Value::Double(0.0),
			TypeDesc::DateTime => Value::DateTime(iso8601::min_date_time()),
			_ => Value::Nil,
		}
	}
}

impl fmt::Display for TypeDesc {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TypeDesc::Any => f.write_str("object"),
			TypeDesc::Void => f.write_str("void"),
			TypeDesc::Int => f.write_str("int"),
			TypeDesc::Long => f.write_str("long"),
			TypeDesc::Bool => f.write_str("bool"),
			TypeDesc::String => f.write_str("string"),
			TypeDesc::Double => f.write_str("double"),
			TypeDesc::DateTime => f.write_str("DateTime"),
			TypeDesc::Base64 => f.write_str("byte[]"),
			TypeDesc::Nullable(inner) => write!(f, "{inner}?"),
			TypeDesc::AnyArray => f.write_str("Array"),
			TypeDesc::Array { elem, rank } => {
				write!(f, "{elem}[{}]", ",".repeat((*rank as usize).saturating_sub(1)))
			}
			TypeDesc::Hashtable => f.write_str("XmlRpcStruct"),
			TypeDesc::Struct(name) | TypeDesc::Enum(name) => f.write_str(name),
		}
	}
}

/// Width of an enum's underlying integer representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
	/// Signed 8-bit.
	I8,
	/// Unsigned 8-bit.
	U8,
	/// Signed 16-bit.
	I16,
	/// Unsigned 16-bit.
	U16,
	/// Signed 32-bit.
	I32,
	/// Unsigned 32-bit.
	U32,
	/// Signed 64-bit.
	I64,
	/// Unsigned 64-bit.
	U64,
}

impl IntWidth {
	/// Whether `value` fits the representable range of this width.
	pub fn contains(self, value: i64) -> bool {
		match self {
			IntWidth::I8 => i8::try_from(value).is_ok(),
			IntWidth::U8 => u8::try_from(value).is_ok(),
			IntWidth::I16 => i16::try_from(value).is_ok(),
			IntWidth::U16 => u16::try_from(value).is_ok(),
			IntWidth::I32 => i32::try_from(value).is_ok(),
			IntWidth::U32 => u32::try_from(value).is_ok(),
			IntWidth::I64 | IntWidth::U64 => value >= 0 || self == IntWidth::I64,
		}
	}
}

/// One mappable member of a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDesc {
	/// Native member name.
	pub name: Box<str>,
	/// Native member type.
	pub ty: TypeDesc,
	/// Wire member name when it differs from the native name.
	pub wire_name: Option<Box<str>>,
	/// Missing-member action override for this member.
	pub action: Option<MappingAction>,
	/// Whether the member is excluded from mapping entirely.
	pub excluded: bool,
}

impl MemberDesc {
	/// Member with no overrides.
	pub fn new(name: impl Into<Box<str>>, ty: TypeDesc) -> Self {
		Self {
			name: name.into(),
			ty,
			wire_name: None,
			action: None,
			excluded: false,
		}
	}

	/// Rename the member on the wire.
	pub fn with_wire_name(mut self, wire_name: impl Into<Box<str>>) -> Self {
		self.wire_name = Some(wire_name.into());
		self
	}

	/// Override the missing-member action for this member.
	pub fn with_action(mut self, action: MappingAction) -> Self {
		self.action = Some(action);
		self
	}

	/// Exclude the member from mapping.
	pub fn excluded(mut self) -> Self {
		self.excluded = true;
		self
	}
}

/// Descriptor for a record type: ordered members plus an optional local
/// missing-member action override.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDesc {
	/// Type name, also the registry key.
	pub name: Box<str>,
	/// Members in declaration order.
	pub members: Vec<MemberDesc>,
	/// Missing-member action override applied at this nesting level only.
	pub action: Option<MappingAction>,
}

impl StructDesc {
	/// Record descriptor with no action override.
	pub fn new(name: impl Into<Box<str>>, members: Vec<MemberDesc>) -> Self {
		Self {
			name: name.into(),
			members,
			action: None,
		}
	}

	/// Override the missing-member action for this type.
	pub fn with_action(mut self, action: MappingAction) -> Self {
		self.action = Some(action);
		self
	}
}

/// Descriptor for an enum type: named members over an underlying integer.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDesc {
	/// Type name, also the registry key.
	pub name: Box<str>,
	/// Underlying integer width.
	pub underlying: IntWidth,
	/// Defined members as (name, value) pairs.
	pub members: Vec<(Box<str>, i64)>,
}

impl EnumDesc {
	/// Enum descriptor from (name, value) pairs.
	pub fn new(name: impl Into<Box<str>>, underlying: IntWidth, members: Vec<(&str, i64)>) -> Self {
		Self {
			name: name.into(),
			underlying,
			members: members.into_iter().map(|(n, v)| (Box::from(n), v)).collect(),
		}
	}

	/// Look up a member by name, case-insensitively.
	pub fn member_by_name(&self, name: &str) -> Option<(&str, i64)> {
		self.members
			.iter()
			.find(|(n, _)| n.eq_ignore_ascii_case(name))
			.map(|(n, v)| (n.as_ref(), *v))
	}

	/// Look up a member by its underlying value.
	pub fn member_by_value(&self, value: i64) -> Option<(&str, i64)> {
		self.members
			.iter()
			.find(|(_, v)| *v == value)
			.map(|(n, v)| (n.as_ref(), *v))
	}
}

/// Name-keyed store of struct and enum descriptors consulted during
/// classification and mapping.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
	structs: HashMap<Box<str>, StructDesc>,
	enums: HashMap<Box<str>, EnumDesc>,
}

impl TypeRegistry {
	/// Empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a record descriptor under its own name.
	pub fn register_struct(&mut self, desc: StructDesc) {
		self.structs.insert(desc.name.clone(), desc);
	}

	/// Register an enum descriptor under its own name.
	pub fn register_enum(&mut self, desc: EnumDesc) {
		self.enums.insert(desc.name.clone(), desc);
	}

	/// Resolve a record descriptor by name.
	pub fn struct_desc(&self, name: &str) -> Option<&StructDesc> {
		self.structs.get(name)
	}

	/// Resolve an enum descriptor by name.
	pub fn enum_desc(&self, name: &str) -> Option<&EnumDesc> {
		self.enums.get(name)
	}
}
