use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::Serialize;

/// Insertion-ordered string-keyed map produced when a wire struct is mapped
/// without a known record type.
pub type XmlRpcStruct = IndexMap<String, Value>;

/// Runtime value produced by mapping a wire node stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
	/// Explicit null; also the default for reference-shaped members.
	Nil,
	/// 32-bit integer scalar.
	Int(i32),
	/// 64-bit integer scalar.
	Long(i64),
	/// Boolean scalar.
	Bool(bool),
	/// Text string.
	String(String),
	/// 64-bit float scalar.
	Double(f64),
	/// Date and time, normalized to a zone-less UTC instant.
	DateTime(NaiveDateTime),
	/// Decoded binary payload.
	Base64(Vec<u8>),
	/// Mapped enum member.
	Enum(EnumValue),
	/// Single-dimension sequence.
	Array(Vec<Value>),
	/// Rectangular multi-dimensional array.
	MultiArray(MultiArray),
	/// Record-shaped value with a known type.
	Struct(StructValue),
	/// Struct mapped without a known type.
	Hashtable(XmlRpcStruct),
}

/// Mapped enum member with its underlying value preserved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValue {
	/// Enum type name.
	pub enum_name: Box<str>,
	/// Matched member name.
	pub member: Box<str>,
	/// Underlying integer value.
	pub value: i64,
}

/// Mapped record value with member names preserved in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructValue {
	/// Record type name.
	pub type_name: Box<str>,
	/// Member values in declaration order.
	pub fields: Vec<FieldValue>,
}

impl StructValue {
	/// Look up a member value by native name.
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|f| f.name.as_ref() == name).map(|f| &f.value)
	}
}

/// Named member of a mapped record value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValue {
	/// Native member name.
	pub name: Box<str>,
	/// Mapped member payload.
	pub value: Value,
}

/// Rectangular array stored flat in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiArray {
	/// Length of each dimension, outermost first.
	pub dims: Vec<usize>,
	/// Elements flattened row-major (last dimension varies fastest).
	pub elems: Vec<Value>,
}

impl MultiArray {
	/// Element at the given index per dimension.
	pub fn get(&self, indices: &[usize]) -> Option<&Value> {
		if indices.len() != self.dims.len() {
			return None;
		}
		let mut flat = 0_usize;
		for (idx, dim) in indices.iter().zip(&self.dims) {
			if idx >= dim {
				return None;
			}
			flat = flat.checked_mul(*dim)?.checked_add(*idx)?;
		}
		self.elems.get(flat)
	}
}

#[cfg(test)]
mod tests {
	use super::{MultiArray, Value};

	#[test]
	fn multi_array_indexes_row_major() {
		let arr = MultiArray {
			dims: vec![2, 3],
			elems: (0..6).map(Value::Int).collect(),
		};
		assert_eq!(arr.get(&[0, 0]), Some(&Value::Int(0)));
		assert_eq!(arr.get(&[0, 2]), Some(&Value::Int(2)));
		assert_eq!(arr.get(&[1, 0]), Some(&Value::Int(3)));
		assert_eq!(arr.get(&[1, 2]), Some(&Value::Int(5)));
		assert_eq!(arr.get(&[2, 0]), None);
		assert_eq!(arr.get(&[1]), None);
	}

	#[test]
	fn values_serialize_to_json() {
		let value = Value::Array(vec![Value::Int(1), Value::String("two".into()), Value::Nil]);
		let json = serde_json::to_string(&value).expect("serializes");
		assert!(json.contains("two"));
	}
}
