use log::trace;

use crate::error::{MapError, Result};
use crate::mapper::Mapper;
use crate::node::{Node, NodeCursor};
use crate::options::MappingAction;
use crate::stack::MappingStack;
use crate::typeinfo::{XmlRpcKind, xml_rpc_kind};
use crate::types::{StructDesc, TypeDesc};
use crate::value::{FieldValue, MultiArray, StructValue, Value, XmlRpcStruct};

impl Mapper<'_> {
	/// Map a wire struct with no known record type into an
	/// insertion-ordered map. Duplicate members keep the first occurrence
	/// when tolerated and fail otherwise.
	pub(crate) fn map_hashtable<I: Iterator<Item = Node>>(
		&self,
		cursor: &mut NodeCursor<I>,
		stack: &mut MappingStack,
		action: MappingAction,
	) -> Result<Value> {
		stack.scoped("struct mapped to XmlRpcStruct", |stack| {
			let mut map = XmlRpcStruct::new();
			while cursor.advance() {
				let Some(Node::Member { name }) = cursor.current() else {
					break;
				};
				let name = name.clone();
				if map.contains_key(&name) && !self.options.ignore_duplicate_members {
					return Err(MapError::DuplicateMember {
						subject: stack.subject().to_owned(),
						member: name,
						trace: stack.dump(),
					});
				}
				if !cursor.advance() {
					return Err(self.unexpected_end(stack));
				}
				let value = stack.scoped(format!("member {name}"), |stack| {
					self.map_value(cursor, None, stack, action)
				})?;
				map.entry(name).or_insert(value);
			}
			Ok(Value::Hashtable(map))
		})
	}

	/// Map a wire struct onto a record type resolved from the registry.
	pub(crate) fn map_struct<I: Iterator<Item = Node>>(
		&self,
		cursor: &mut NodeCursor<I>,
		expected: &TypeDesc,
		stack: &mut MappingStack,
		action: MappingAction,
	) -> Result<Value> {
		let expected = match expected {
			TypeDesc::Nullable(inner) => inner.as_ref(),
			other => other,
		};

		let desc = self.resolve_struct_target(expected, stack)?;

		// The local action governs the missing-member decision at this
		// nesting level only; members are mapped under the caller's action
		// so nested structs are unaffected.
		let local_action = desc.action.unwrap_or(action);

		stack.scoped(format!("struct mapped to type {}", desc.name), |stack| {
			let mut fields: Vec<FieldValue> = desc
				.members
				.iter()
				.map(|m| FieldValue {
					name: m.name.clone(),
					value: m.ty.default_value(),
				})
				.collect();

			let mut missing: Vec<&str> = desc
				.members
				.iter()
				.filter(|m| !m.excluded)
				.map(|m| m.name.as_ref())
				.collect();
			let mut seen: Vec<String> = Vec::new();

			while cursor.advance() {
				let Some(Node::Member { name }) = cursor.current() else {
					break;
				};
				let wire_name = name.clone();

				if seen.iter().any(|n| *n == wire_name) {
					if !self.options.ignore_duplicate_members {
						return Err(MapError::DuplicateMember {
							subject: stack.subject().to_owned(),
							member: wire_name,
							trace: stack.dump(),
						});
					}
					if !cursor.advance() {
						return Err(self.unexpected_end(stack));
					}
					self.skip_value(cursor, stack)?;
					continue;
				}
				seen.push(wire_name.clone());

				let member = desc
					.members
					.iter()
					.enumerate()
					.find(|(_, m)| m.wire_name.as_deref() == Some(wire_name.as_str()))
					.or_else(|| {
						desc.members
							.iter()
							.enumerate()
							.find(|(_, m)| m.name.as_ref() == wire_name)
					});

				if !cursor.advance() {
					return Err(self.unexpected_end(stack));
				}

				let Some((idx, member)) = member else {
					// Unknown wire member; consume its whole subtree.
					trace!("skipping unknown struct member {wire_name}");
					self.skip_value(cursor, stack)?;
					continue;
				};

				if member.excluded {
					return stack.scoped(format!("member {}", member.name), |stack| {
						Err(MapError::ExcludedMember {
							member: member.name.to_string(),
							trace: stack.dump(),
						})
					});
				}
				missing.retain(|n| *n != member.name.as_ref());

				let label = format!("member {} mapped to type {}", member.name, member.ty);
				let value = stack.scoped(label, |stack| {
					self.map_value(cursor, Some(&member.ty), stack, action)
				})?;
				fields[idx].value = value;
			}

			if local_action == MappingAction::Error && !missing.is_empty() {
				self.report_missing_members(desc, &missing, stack)?;
			}

			Ok(Value::Struct(StructValue {
				type_name: desc.name.clone(),
				fields,
			}))
		})
	}

	/// Validate that a wire struct can target `expected` and resolve the
	/// record descriptor.
	fn resolve_struct_target<'r>(&'r self, expected: &TypeDesc, stack: &mut MappingStack) -> Result<&'r StructDesc> {
		if matches!(expected, TypeDesc::Int | TypeDesc::Long | TypeDesc::Bool | TypeDesc::Double) {
			return Err(self.struct_mismatch(expected, stack));
		}
		let TypeDesc::Struct(name) = expected else {
			return Err(self.struct_mismatch(expected, stack));
		};
		let Some(desc) = self.registry.struct_desc(name) else {
			return Err(MapError::TypeMismatch {
				subject: stack.subject().to_owned(),
				found: "struct".into(),
				expected: format!("struct (as type {name})"),
				trace: stack.dump(),
			});
		};
		if xml_rpc_kind(expected, self.registry) == XmlRpcKind::Invalid {
			return Err(MapError::TypeMismatch {
				subject: stack.subject().to_owned(),
				found: "struct".into(),
				expected: format!("unmappable type {name}"),
				trace: stack.dump(),
			});
		}
		Ok(desc)
	}

	fn struct_mismatch(&self, expected: &TypeDesc, stack: &MappingStack) -> MapError {
		MapError::TypeMismatch {
			subject: stack.subject().to_owned(),
			found: "struct".into(),
			expected: self.describe_expected(expected),
			trace: stack.dump(),
		}
	}

	fn report_missing_members(&self, desc: &StructDesc, missing: &[&str], stack: &mut MappingStack) -> Result<()> {
		let required: Vec<&str> = missing
			.iter()
			.copied()
			.filter(|name| {
				desc.members
					.iter()
					.find(|m| m.name.as_ref() == *name)
					.and_then(|m| m.action)
					.unwrap_or(MappingAction::Error)
					== MappingAction::Error
			})
			.collect();
		if required.is_empty() {
			return Ok(());
		}
		Err(MapError::MissingMembers {
			subject: stack.subject().to_owned(),
			type_name: desc.name.to_string(),
			members: required.join(" "),
			trace: stack.dump(),
		})
	}

	/// Map a wire array against an optional expected array type, inferring
	/// a uniform element type when unconstrained.
	pub(crate) fn map_array<I: Iterator<Item = Node>>(
		&self,
		cursor: &mut NodeCursor<I>,
		expected: Option<&TypeDesc>,
		stack: &mut MappingStack,
		action: MappingAction,
	) -> Result<Value> {
		if let Some(ty) = expected {
			if !matches!(ty, TypeDesc::AnyArray | TypeDesc::Array { .. }) {
				return Err(MapError::TypeMismatch {
					subject: stack.subject().to_owned(),
					found: "array".into(),
					expected: self.describe_expected(ty),
					trace: stack.dump(),
				});
			}
			if xml_rpc_kind(ty, self.registry) == XmlRpcKind::MultiDimArray {
				return stack.scoped(format!("array mapped to type {ty}"), |stack| {
					self.map_multi_dim_array(cursor, ty, stack, action)
				});
			}
		}

		let label = match expected {
			Some(ty) => format!("array mapped to type {ty}"),
			None => "array".to_owned(),
		};
		stack.scoped(label, |stack| {
			let elem_type = match expected {
				Some(TypeDesc::Array { elem, .. }) if !matches!(elem.as_ref(), TypeDesc::Any) => Some(elem.as_ref()),
				_ => None,
			};

			let mut values = Vec::new();
			while cursor.advance() {
				if !cursor.current().is_some_and(Node::is_value) {
					break;
				}
				let value = stack.scoped(format!("element {}", values.len()), |stack| {
					self.map_value(cursor, elem_type, stack, action)
				})?;
				values.push(value);
			}

			if elem_type.is_none() {
				trace!("inferred array element type {}", infer_element_type(&values));
			}
			Ok(Value::Array(values))
		})
	}

	/// Map nested wire arrays into a rectangular multi-dimensional array.
	/// Sibling sub-arrays must agree with the first length recorded at
	/// their rank; jagged input is rejected.
	fn map_multi_dim_array<I: Iterator<Item = Node>>(
		&self,
		cursor: &mut NodeCursor<I>,
		expected: &TypeDesc,
		stack: &mut MappingStack,
		action: MappingAction,
	) -> Result<Value> {
		let TypeDesc::Array { elem, rank } = expected else {
			return Err(MapError::TypeMismatch {
				subject: stack.subject().to_owned(),
				found: "array".into(),
				expected: self.describe_expected(expected),
				trace: stack.dump(),
			});
		};
		let elem_type = match elem.as_ref() {
			TypeDesc::Any => None,
			other => Some(other),
		};

		// Lengths start unrecorded so an empty first sub-array still pins
		// its rank to zero for the regularity check.
		let mut dims = vec![None; *rank as usize];
		let mut elems = Vec::new();
		self.map_multi_dim_elements(cursor, *rank, 0, elem_type, &mut elems, &mut dims, stack, action)?;
		let dims = dims.into_iter().map(|d| d.unwrap_or(0)).collect();
		Ok(Value::MultiArray(MultiArray { dims, elems }))
	}

	#[allow(clippy::too_many_arguments)]
	fn map_multi_dim_elements<I: Iterator<Item = Node>>(
		&self,
		cursor: &mut NodeCursor<I>,
		rank: u32,
		cur_rank: u32,
		elem_type: Option<&TypeDesc>,
		elems: &mut Vec<Value>,
		dims: &mut [Option<usize>],
		stack: &mut MappingStack,
		action: MappingAction,
	) -> Result<()> {
		let mut count = 0_usize;
		if cur_rank < rank - 1 {
			while cursor.advance() {
				if matches!(cursor.current(), Some(Node::ArrayOpen { .. })) {
					count += 1;
					self.map_multi_dim_elements(cursor, rank, cur_rank + 1, elem_type, elems, dims, stack, action)?;
					continue;
				}
				// A value node here means the input is nested one level
				// short of the expected rank.
				if let Some(node) = cursor.current().filter(|n| n.is_value()) {
					return Err(MapError::TypeMismatch {
						subject: stack.subject().to_owned(),
						found: node_keyword(node).to_owned(),
						expected: "array".into(),
						trace: stack.dump(),
					});
				}
				break;
			}
		} else {
			while cursor.advance() {
				if !cursor.current().is_some_and(Node::is_value) {
					break;
				}
				count += 1;
				let value = stack.scoped(format!("element {}", elems.len()), |stack| {
					self.map_value(cursor, elem_type, stack, action)
				})?;
				elems.push(value);
			}
		}

		match dims[cur_rank as usize] {
			Some(recorded) if recorded != count => {
				return Err(MapError::NonRegularArray {
					rank: cur_rank,
					expected: recorded,
					got: count,
					trace: stack.dump(),
				});
			}
			_ => {}
		}
		dims[cur_rank as usize] = Some(count);
		Ok(())
	}

	/// Consume the remaining nodes of the value under the cursor: the
	/// single primitive node, or everything up to and including the end
	/// marker matching a composite open.
	pub(crate) fn skip_value<I: Iterator<Item = Node>>(&self, cursor: &mut NodeCursor<I>, stack: &MappingStack) -> Result<()> {
		let Some(node) = cursor.current() else {
			return Err(self.unexpected_end(stack));
		};
		let Some(depth) = node.composite_depth() else {
			return Ok(());
		};
		loop {
			if !cursor.advance() {
				return Err(self.unexpected_end(stack));
			}
			if matches!(cursor.current(), Some(Node::EndComposite { depth: d }) if *d == depth) {
				return Ok(());
			}
		}
	}
}

/// Wire keyword for the value a node starts, used in mismatch diagnostics.
fn node_keyword(node: &Node) -> &'static str {
	match node {
		Node::Int(_) => "integer",
		Node::Long(_) => "i8",
		Node::Bool(_) => "boolean",
		Node::Str { .. } => "string",
		Node::Double(_) => "double",
		Node::DateTime(_) => "dateTime",
		Node::Base64(_) => "base64",
		Node::Nil => "nil",
		Node::StructOpen { .. } => "struct",
		Node::ArrayOpen { .. } => "array",
		Node::Member { .. } | Node::EndComposite { .. } => "value",
	}
}

/// Infer a uniform element type for an untyped array from its mapped
/// values: exactly one concrete type across all non-nil values, or the
/// fully generic type as the fallback.
///
/// A mapped [`Value::Array`] carries no element type of its own; the
/// mapper only logs the inference, and callers that need a concrete
/// target type apply this to the mapped elements themselves.
pub fn infer_element_type(values: &[Value]) -> TypeDesc {
	let mut inferred: Option<TypeDesc> = None;
	for value in values {
		let Some(ty) = concrete_type(value) else {
			continue;
		};
		match &inferred {
			None => inferred = Some(ty),
			Some(existing) if *existing == ty => {}
			Some(_) => return TypeDesc::Any,
		}
	}
	inferred.unwrap_or(TypeDesc::Any)
}

fn concrete_type(value: &Value) -> Option<TypeDesc> {
	match value {
		Value::Nil => None,
		Value::Int(_) => Some(TypeDesc::Int),
		Value::Long(_) => Some(TypeDesc::Long),
		Value::Bool(_) => Some(TypeDesc::Bool),
		Value::String(_) => Some(TypeDesc::String),
		Value::Double(_) => Some(TypeDesc::Double),
		Value::DateTime(_) => Some(TypeDesc::DateTime),
		Value::Base64(_) => Some(TypeDesc::Base64),
		Value::Enum(e) => Some(TypeDesc::Enum(e.enum_name.clone())),
		Value::Array(_) | Value::MultiArray(_) => Some(TypeDesc::AnyArray),
		Value::Struct(s) => Some(TypeDesc::Struct(s.type_name.clone())),
		Value::Hashtable(_) => Some(TypeDesc::Hashtable),
	}
}
