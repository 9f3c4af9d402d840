use log::debug;

use crate::error::{MapError, Result};
use crate::options::MapperOptions;
use crate::value::Value;

/// Application-level fault reported by the remote peer in place of a
/// normal response value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
	/// Numeric fault code.
	pub code: i32,
	/// Human-readable fault description.
	pub fault_string: String,
}

impl Fault {
	/// Extract a fault from the mapped fault-response value.
	///
	/// The value must be a struct carrying `faultCode` and `faultString`
	/// members. A string-typed code is accepted only under
	/// [`MapperOptions::allow_string_fault_code`].
	pub fn from_value(value: &Value, options: &MapperOptions) -> Result<Fault> {
		let (code, fault_string) = match value {
			Value::Hashtable(map) => (map.get("faultCode"), map.get("faultString")),
			Value::Struct(s) => (s.field("faultCode"), s.field("faultString")),
			_ => {
				return Err(MapError::MalformedFault {
					detail: "fault response is not a struct",
				});
			}
		};

		let code = match code {
			Some(Value::Int(code)) => *code,
			Some(Value::String(raw)) if options.allow_string_fault_code => {
				raw.trim().parse::<i32>().map_err(|_| MapError::MalformedFault {
					detail: "faultCode string does not parse as an integer",
				})?
			}
			Some(_) => {
				return Err(MapError::MalformedFault {
					detail: "faultCode member is not an integer",
				});
			}
			None => {
				return Err(MapError::MalformedFault {
					detail: "fault response is missing the faultCode member",
				});
			}
		};

		let fault_string = match fault_string {
			Some(Value::String(s)) => s.clone(),
			Some(_) => {
				return Err(MapError::MalformedFault {
					detail: "faultString member is not a string",
				});
			}
			None => {
				return Err(MapError::MalformedFault {
					detail: "fault response is missing the faultString member",
				});
			}
		};

		debug!("fault response: [{code}] {fault_string}");
		Ok(Fault { code, fault_string })
	}
}

impl From<Fault> for MapError {
	fn from(fault: Fault) -> Self {
		MapError::Fault {
			code: fault.code,
			fault_string: fault.fault_string,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::Fault;
	use crate::error::MapError;
	use crate::options::MapperOptions;
	use crate::value::{Value, XmlRpcStruct};

	fn fault_value(code: Value, string: Value) -> Value {
		let mut map = XmlRpcStruct::new();
		map.insert("faultCode".to_owned(), code);
		map.insert("faultString".to_owned(), string);
		Value::Hashtable(map)
	}

	#[test]
	fn extracts_code_and_string() {
		let value = fault_value(Value::Int(4), Value::String("Too many parameters.".into()));
		let fault = Fault::from_value(&value, &MapperOptions::new()).unwrap();
		assert_eq!(fault.code, 4);
		assert_eq!(fault.fault_string, "Too many parameters.");
	}

	#[test]
	fn string_code_needs_the_tolerance_flag() {
		let value = fault_value(Value::String("12".into()), Value::String("oops".into()));

		let strict = Fault::from_value(&value, &MapperOptions::new());
		assert!(matches!(strict, Err(MapError::MalformedFault { .. })));

		let fault = Fault::from_value(&value, &MapperOptions::new().with_string_fault_code()).unwrap();
		assert_eq!(fault.code, 12);
	}

	#[test]
	fn missing_members_are_malformed() {
		let mut map = XmlRpcStruct::new();
		map.insert("faultCode".to_owned(), Value::Int(1));
		let missing_string = Fault::from_value(&Value::Hashtable(map), &MapperOptions::new());
		assert!(matches!(missing_string, Err(MapError::MalformedFault { .. })));

		let not_a_struct = Fault::from_value(&Value::Int(1), &MapperOptions::new());
		assert!(matches!(not_a_struct, Err(MapError::MalformedFault { .. })));
	}

	#[test]
	fn converts_into_the_error_type() {
		let fault = Fault {
			code: 101,
			fault_string: "no such method".into(),
		};
		let err = MapError::from(fault);
		assert_eq!(err.to_string(), "server returned a fault exception: [101] no such method");
	}
}
