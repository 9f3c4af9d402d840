use log::trace;

use crate::error::{MapError, Result};
use crate::iso8601;
use crate::node::{Node, NodeCursor};
use crate::options::{MapperOptions, MappingAction};
use crate::stack::MappingStack;
use crate::typeinfo::{XmlRpcKind, kind_str, xml_rpc_kind};
use crate::types::{TypeDesc, TypeRegistry};
use crate::value::{EnumValue, Value};

/// Maps wire nodes to native values against optional expected types.
///
/// A mapper borrows its options and type registry and carries no state of
/// its own, so one instance can serve any number of calls; each call brings
/// its own cursor and [`MappingStack`].
#[derive(Debug, Clone, Copy)]
pub struct Mapper<'a> {
	pub(crate) options: &'a MapperOptions,
	pub(crate) registry: &'a TypeRegistry,
}

impl<'a> Mapper<'a> {
	/// Mapper over the given options and registry.
	pub fn new(options: &'a MapperOptions, registry: &'a TypeRegistry) -> Self {
		Self { options, registry }
	}

	/// Advance the cursor onto the first node and map one complete value.
	pub fn map_element<I: Iterator<Item = Node>>(
		&self,
		cursor: &mut NodeCursor<I>,
		expected: Option<&TypeDesc>,
		stack: &mut MappingStack,
	) -> Result<Value> {
		if !cursor.advance() {
			return Err(self.unexpected_end(stack));
		}
		self.map_value(cursor, expected, stack, self.options.default_action)
	}

	/// Map the value whose first node is already under the cursor.
	///
	/// On return the cursor is left on the last node the value occupied:
	/// the primitive node itself, or the end marker of a composite. The
	/// caller advances past it.
	pub fn map_value<I: Iterator<Item = Node>>(
		&self,
		cursor: &mut NodeCursor<I>,
		expected: Option<&TypeDesc>,
		stack: &mut MappingStack,
		action: MappingAction,
	) -> Result<Value> {
		// A fully generic expected type carries no mapping information.
		let expected = expected.filter(|t| !matches!(t, TypeDesc::Any));

		let node = cursor.current().ok_or_else(|| self.unexpected_end(stack))?.clone();
		trace!("mapping {node:?} against {expected:?}");

		if let Node::Str { implicit: true, .. } = &node {
			self.check_implicit_string(expected, stack)?;
		}

		match node {
			Node::ArrayOpen { .. } => self.map_array(cursor, expected, stack, action),
			Node::StructOpen { .. } => match expected {
				None | Some(TypeDesc::Hashtable) => self.map_hashtable(cursor, stack, action),
				Some(ty) => self.map_struct(cursor, ty, stack, action),
			},
			Node::Int(raw) => self.map_int(&raw, expected, stack),
			Node::Long(raw) => self.map_long(&raw, expected, stack),
			Node::Bool(raw) => self.map_boolean(&raw, expected, stack),
			Node::Str { value, .. } => self.map_string(&value, expected, stack),
			Node::Double(raw) => self.map_double(&raw, expected, stack),
			Node::DateTime(raw) => self.map_date_time(&raw, expected, stack),
			Node::Base64(raw) => self.map_base64(&raw, expected, stack),
			Node::Nil => self.map_nil(expected, stack),
			Node::Member { .. } | Node::EndComposite { .. } => Err(self.unexpected_end(stack)),
		}
	}

	fn map_int(&self, raw: &str, expected: Option<&TypeDesc>, stack: &mut MappingStack) -> Result<Value> {
		if let Some(TypeDesc::Enum(name)) = expected {
			return self.map_number_to_enum(raw, name, "int", stack);
		}
		self.check_expected(expected, XmlRpcKind::Int32, stack)?;
		stack.scoped("integer", |stack| match raw.trim().parse::<i32>() {
			Ok(v) => Ok(Value::Int(v)),
			Err(_) => Err(self.invalid_value("int", stack)),
		})
	}

	fn map_long(&self, raw: &str, expected: Option<&TypeDesc>, stack: &mut MappingStack) -> Result<Value> {
		if let Some(TypeDesc::Enum(name)) = expected {
			return self.map_number_to_enum(raw, name, "i8", stack);
		}
		self.check_expected(expected, XmlRpcKind::Int64, stack)?;
		stack.scoped("i8", |stack| match raw.trim().parse::<i64>() {
			Ok(v) => Ok(Value::Long(v)),
			Err(_) => Err(self.invalid_value("i8", stack)),
		})
	}

	fn map_boolean(&self, raw: &str, expected: Option<&TypeDesc>, stack: &mut MappingStack) -> Result<Value> {
		self.check_expected(expected, XmlRpcKind::Boolean, stack)?;
		stack.scoped("boolean", |stack| match raw {
			"1" => Ok(Value::Bool(true)),
			"0" => Ok(Value::Bool(false)),
			_ => Err(self.invalid_value("boolean", stack)),
		})
	}

	fn map_double(&self, raw: &str, expected: Option<&TypeDesc>, stack: &mut MappingStack) -> Result<Value> {
		self.check_expected(expected, XmlRpcKind::Double, stack)?;
		stack.scoped("double", |stack| match raw.trim().parse::<f64>() {
			Ok(v) => Ok(Value::Double(v)),
			Err(_) => Err(self.invalid_value("double", stack)),
		})
	}

	fn map_string(&self, value: &str, expected: Option<&TypeDesc>, stack: &mut MappingStack) -> Result<Value> {
		if let Some(TypeDesc::Enum(name)) = expected {
			return self.map_string_to_enum(value, name, stack);
		}
		self.check_expected(expected, XmlRpcKind::String, stack)?;
		stack.scoped("string", |_| Ok(Value::String(value.to_owned())))
	}

	fn map_date_time(&self, raw: &str, expected: Option<&TypeDesc>, stack: &mut MappingStack) -> Result<Value> {
		self.check_expected(expected, XmlRpcKind::DateTime, stack)?;
		stack.scoped("dateTime", |stack| {
			if raw.is_empty() && self.options.map_empty_date_time_to_min_value {
				return Ok(Value::DateTime(iso8601::min_date_time()));
			}

			let parsed = if self.options.allow_non_standard_date_time {
				iso8601::parse_date_time_lenient(raw)
			} else {
				iso8601::parse_date_time(raw)
			};
			if let Some(date) = parsed {
				return Ok(Value::DateTime(date));
			}

			if self.options.map_zeros_date_time_to_min_value
				&& matches!(
					raw,
					"00000000T00:00:00" | "0000-00-00T00:00:00Z" | "00000000T00:00:00Z" | "0000-00-00T00:00:00"
				) {
				return Ok(Value::DateTime(iso8601::min_date_time()));
			}

			Err(self.invalid_value("dateTime", stack))
		})
	}

	fn map_base64(&self, raw: &str, expected: Option<&TypeDesc>, stack: &mut MappingStack) -> Result<Value> {
		use base64::Engine as _;

		self.check_expected(expected, XmlRpcKind::Base64, stack)?;
		stack.scoped("base64", |stack| {
			if raw.is_empty() {
				return Ok(Value::Base64(Vec::new()));
			}
			match base64::engine::general_purpose::STANDARD.decode(raw) {
				Ok(bytes) => Ok(Value::Base64(bytes)),
				Err(_) => Err(self.invalid_value("base64", stack)),
			}
		})
	}

	fn map_nil(&self, expected: Option<&TypeDesc>, stack: &mut MappingStack) -> Result<Value> {
		// Only a bare primitive value type cannot absorb a nil; nullable
		// wrappers and reference-shaped types all map it to Nil.
		if matches!(
			expected,
			Some(TypeDesc::Int | TypeDesc::Long | TypeDesc::Bool | TypeDesc::Double)
		) {
			return Err(self.invalid_value("nil", stack));
		}
		Ok(Value::Nil)
	}

	fn map_number_to_enum(&self, raw: &str, enum_name: &str, wire_type: &'static str, stack: &mut MappingStack) -> Result<Value> {
		stack.scoped(wire_type, |stack| {
			let Some(desc) = self.registry.enum_desc(enum_name) else {
				return Err(self.invalid_enum_value(wire_type, enum_name, stack));
			};
			let Ok(number) = raw.trim().parse::<i64>() else {
				return Err(self.invalid_enum_value(wire_type, enum_name, stack));
			};
			if !desc.underlying.contains(number) {
				return Err(self.invalid_enum_value(wire_type, enum_name, stack));
			}
			let Some((member, value)) = desc.member_by_value(number) else {
				return Err(self.invalid_enum_value(wire_type, enum_name, stack));
			};
			Ok(Value::Enum(EnumValue {
				enum_name: desc.name.clone(),
				member: member.into(),
				value,
			}))
		})
	}

	fn map_string_to_enum(&self, raw: &str, enum_name: &str, stack: &mut MappingStack) -> Result<Value> {
		stack.scoped("string", |stack| {
			let Some(desc) = self.registry.enum_desc(enum_name) else {
				return Err(self.invalid_enum_value("string", enum_name, stack));
			};
			let member = desc.member_by_name(raw.trim()).or_else(|| {
				// Numeric member references are accepted on the string
				// path, membership-checked like any other number.
				raw.trim()
					.parse::<i64>()
					.ok()
					.filter(|n| desc.underlying.contains(*n))
					.and_then(|n| desc.member_by_value(n))
			});
			match member {
				Some((member, value)) => Ok(Value::Enum(EnumValue {
					enum_name: desc.name.clone(),
					member: member.into(),
					value,
				})),
				None => Err(self.invalid_enum_value("string", enum_name, stack)),
			}
		})
	}

	/// Reject an implicit (untyped) string unless the expected type is
	/// absent, exactly `string`, or an enum.
	fn check_implicit_string(&self, expected: Option<&TypeDesc>, stack: &mut MappingStack) -> Result<()> {
		match expected {
			None | Some(TypeDesc::String | TypeDesc::Enum(_)) => Ok(()),
			Some(ty) => Err(MapError::TypeMismatch {
				subject: stack.subject().to_owned(),
				found: "implicit string".into(),
				expected: self.describe_expected(ty),
				trace: stack.dump(),
			}),
		}
	}

	/// Validate an expected type against the wire kind about to be mapped.
	/// Enum expected types are reduced to the integer kind of their
	/// underlying representation before comparison.
	pub(crate) fn check_expected(&self, expected: Option<&TypeDesc>, actual: XmlRpcKind, stack: &mut MappingStack) -> Result<()> {
		let Some(ty) = expected else {
			return Ok(());
		};

		let expected_kind = match ty {
			TypeDesc::Enum(name) => {
				let kind = xml_rpc_kind(ty, self.registry);
				if kind == XmlRpcKind::Invalid {
					return Err(self.invalid_enum_value(kind_str(actual).unwrap_or("value"), name, stack));
				}
				kind
			}
			_ => xml_rpc_kind(ty, self.registry),
		};

		if expected_kind == actual {
			return Ok(());
		}
		Err(MapError::TypeMismatch {
			subject: stack.subject().to_owned(),
			found: kind_str(actual).unwrap_or("unmappable").to_owned(),
			expected: self.describe_expected(ty),
			trace: stack.dump(),
		})
	}

	pub(crate) fn describe_expected(&self, ty: &TypeDesc) -> String {
		match kind_str(xml_rpc_kind(ty, self.registry)) {
			Some(keyword) => keyword.to_owned(),
			None => format!("unmappable type {ty}"),
		}
	}

	pub(crate) fn invalid_value(&self, wire_type: &'static str, stack: &MappingStack) -> MapError {
		MapError::InvalidValue {
			subject: stack.subject().to_owned(),
			wire_type,
			trace: stack.dump(),
		}
	}

	fn invalid_enum_value(&self, wire_type: &'static str, enum_name: &str, stack: &MappingStack) -> MapError {
		MapError::InvalidEnumValue {
			subject: stack.subject().to_owned(),
			wire_type,
			enum_name: enum_name.to_owned(),
			trace: stack.dump(),
		}
	}

	pub(crate) fn unexpected_end(&self, stack: &MappingStack) -> MapError {
		MapError::UnexpectedEnd { trace: stack.dump() }
	}
}
