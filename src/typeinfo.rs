use crate::types::{IntWidth, TypeDesc, TypeRegistry};

/// Abstract wire type tag assigned to a native type descriptor.
///
/// `Invalid` means the type cannot be represented on the wire at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlRpcKind {
	/// Unrepresentable type.
	Invalid,
	/// `<int>` / `<i4>`.
	Int32,
	/// `<i8>`.
	Int64,
	/// `<boolean>`.
	Boolean,
	/// `<string>`.
	String,
	/// `<double>`.
	Double,
	/// `<dateTime.iso8601>`.
	DateTime,
	/// `<base64>`.
	Base64,
	/// `<struct>` mapped to a record type.
	Struct,
	/// `<struct>` mapped to the ordered string-keyed map.
	Hashtable,
	/// Single-dimension `<array>`.
	Array,
	/// Rectangular multi-dimension `<array>`.
	MultiDimArray,
	/// No value.
	Void,
	/// `<nil/>`.
	Nil,
}

/// Wire-format keyword for a kind, used in diagnostics. `Invalid` and
/// `Nil` have no keyword.
pub fn kind_str(kind: XmlRpcKind) -> Option<&'static str> {
	match kind {
		XmlRpcKind::Int32 => Some("integer"),
		XmlRpcKind::Int64 => Some("i8"),
		XmlRpcKind::Boolean => Some("boolean"),
		XmlRpcKind::String => Some("string"),
		XmlRpcKind::Double => Some("double"),
		XmlRpcKind::DateTime => Some("dateTime"),
		XmlRpcKind::Base64 => Some("base64"),
		XmlRpcKind::Struct | XmlRpcKind::Hashtable => Some("struct"),
		XmlRpcKind::Array | XmlRpcKind::MultiDimArray => Some("array"),
		XmlRpcKind::Void => Some("void"),
		XmlRpcKind::Invalid | XmlRpcKind::Nil => None,
	}
}

/// Classify a native type descriptor into its wire type tag.
///
/// Composite shapes are validated recursively: an array is only mappable
/// when its element type is, and a record only when every non-excluded
/// member is mappable or fully generic. A visited set of in-progress record
/// names breaks cycles in self-referential type graphs.
pub fn xml_rpc_kind(ty: &TypeDesc, registry: &TypeRegistry) -> XmlRpcKind {
	classify(ty, registry, &mut Vec::new())
}

fn classify<'a>(ty: &'a TypeDesc, registry: &'a TypeRegistry, visited: &mut Vec<&'a str>) -> XmlRpcKind {
	match ty {
		TypeDesc::Any => XmlRpcKind::Invalid,
		TypeDesc::Void => XmlRpcKind::Void,
		TypeDesc::Int => XmlRpcKind::Int32,
		TypeDesc::Long => XmlRpcKind::Int64,
		TypeDesc::Bool => XmlRpcKind::Boolean,
		TypeDesc::String => XmlRpcKind::String,
		TypeDesc::Double => XmlRpcKind::Double,
		TypeDesc::DateTime => XmlRpcKind::DateTime,
		TypeDesc::Base64 => XmlRpcKind::Base64,
		TypeDesc::Nullable(inner) => classify(inner, registry, visited),
		TypeDesc::Hashtable => XmlRpcKind::Hashtable,
		TypeDesc::AnyArray => XmlRpcKind::Array,
		TypeDesc::Array { elem, rank } => {
			if !matches!(elem.as_ref(), TypeDesc::Any) && classify(elem, registry, visited) == XmlRpcKind::Invalid {
				return XmlRpcKind::Invalid;
			}
			if *rank <= 1 { XmlRpcKind::Array } else { XmlRpcKind::MultiDimArray }
		}
		TypeDesc::Enum(name) => match registry.enum_desc(name) {
			Some(desc) => match desc.underlying {
				IntWidth::I8 | IntWidth::U8 | IntWidth::I16 | IntWidth::U16 | IntWidth::I32 => XmlRpcKind::Int32,
				IntWidth::U32 | IntWidth::I64 => XmlRpcKind::Int64,
				IntWidth::U64 => XmlRpcKind::Invalid,
			},
			None => XmlRpcKind::Invalid,
		},
		TypeDesc::Struct(name) => {
			let Some(desc) = registry.struct_desc(name) else {
				return XmlRpcKind::Invalid;
			};
			// Already being validated further up the recursion; assume
			// valid to terminate on self-referential record graphs.
			if visited.iter().any(|n| *n == name.as_ref()) {
				return XmlRpcKind::Struct;
			}
			visited.push(name.as_ref());
			let mut kind = XmlRpcKind::Struct;
			for member in &desc.members {
				if member.excluded || matches!(member.ty, TypeDesc::Any) {
					continue;
				}
				if classify(&member.ty, registry, visited) == XmlRpcKind::Invalid {
					kind = XmlRpcKind::Invalid;
					break;
				}
			}
			visited.pop();
			kind
		}
	}
}
