#![allow(missing_docs)]

use xmlrpc_map::{
	MapError, Mapper, MapperOptions, MappingStack, Node, NodeCursor, TypeDesc, TypeRegistry, Value, infer_element_type,
};

fn map(nodes: Vec<Node>, expected: Option<&TypeDesc>) -> Result<Value, MapError> {
	let options = MapperOptions::new();
	let registry = TypeRegistry::new();
	let mapper = Mapper::new(&options, &registry);
	let mut cursor = NodeCursor::from_nodes(nodes);
	let mut stack = MappingStack::new("response");
	mapper.map_element(&mut cursor, expected, &mut stack)
}

fn int_array(values: &[i32]) -> Vec<Node> {
	let mut nodes = vec![Node::ArrayOpen { depth: 0 }];
	nodes.extend(values.iter().map(|v| Node::Int(v.to_string())));
	nodes.push(Node::EndComposite { depth: 0 });
	nodes
}

#[test]
fn typed_array_maps_each_element() {
	let value = map(int_array(&[1, 2, 3]), Some(&TypeDesc::array(TypeDesc::Int))).unwrap();
	assert_eq!(value, Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
}

#[test]
fn element_failure_reports_its_position() {
	let nodes = vec![
		Node::ArrayOpen { depth: 0 },
		Node::Int("1".into()),
		Node::Int("oops".into()),
		Node::EndComposite { depth: 0 },
	];
	let err = map(nodes, Some(&TypeDesc::array(TypeDesc::Int))).unwrap_err();
	match err {
		MapError::InvalidValue { trace, .. } => {
			assert_eq!(trace, "[response : array mapped to type int[] : element 1 : integer]");
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn untyped_array_elements_keep_their_wire_types() {
	let nodes = vec![
		Node::ArrayOpen { depth: 0 },
		Node::Int("12".into()),
		Node::string("Egypt"),
		Node::Bool("0".into()),
		Node::EndComposite { depth: 0 },
	];
	let value = map(nodes, None).unwrap();
	assert_eq!(
		value,
		Value::Array(vec![Value::Int(12), Value::String("Egypt".into()), Value::Bool(false)])
	);
}

#[test]
fn element_type_inference_needs_a_single_concrete_type() {
	let ints = vec![Value::Int(1), Value::Nil, Value::Int(2)];
	assert_eq!(infer_element_type(&ints), TypeDesc::Int);

	let mixed = vec![Value::Int(1), Value::String("x".into())];
	assert_eq!(infer_element_type(&mixed), TypeDesc::Any);

	assert_eq!(infer_element_type(&[]), TypeDesc::Any);
}

#[test]
fn nested_untyped_arrays_stay_nested() {
	let nodes = vec![
		Node::ArrayOpen { depth: 0 },
		Node::ArrayOpen { depth: 1 },
		Node::Int("1".into()),
		Node::EndComposite { depth: 1 },
		Node::ArrayOpen { depth: 1 },
		Node::Int("2".into()),
		Node::Int("3".into()),
		Node::EndComposite { depth: 1 },
		Node::EndComposite { depth: 0 },
	];
	let value = map(nodes, None).unwrap();
	assert_eq!(
		value,
		Value::Array(vec![
			Value::Array(vec![Value::Int(1)]),
			Value::Array(vec![Value::Int(2), Value::Int(3)]),
		])
	);
}

fn two_by_three() -> Vec<Node> {
	let mut nodes = vec![Node::ArrayOpen { depth: 0 }];
	for row in [[1.5, 2.5, 3.5], [4.5, 5.5, 6.5]] {
		nodes.push(Node::ArrayOpen { depth: 1 });
		nodes.extend(row.iter().map(|v| Node::Double(v.to_string())));
		nodes.push(Node::EndComposite { depth: 1 });
	}
	nodes.push(Node::EndComposite { depth: 0 });
	nodes
}

#[test]
fn rectangular_nested_arrays_map_to_a_multi_dim_array() {
	let expected = TypeDesc::multi_array(TypeDesc::Double, 2);
	let value = map(two_by_three(), Some(&expected)).unwrap();
	let Value::MultiArray(arr) = value else {
		panic!("expected a multi-dimensional array value");
	};
	assert_eq!(arr.dims, [2, 3]);
	assert_eq!(arr.get(&[0, 0]), Some(&Value::Double(1.5)));
	assert_eq!(arr.get(&[0, 2]), Some(&Value::Double(3.5)));
	assert_eq!(arr.get(&[1, 0]), Some(&Value::Double(4.5)));
	assert_eq!(arr.get(&[1, 2]), Some(&Value::Double(6.5)));
}

#[test]
fn jagged_nested_arrays_are_rejected() {
	let nodes = vec![
		Node::ArrayOpen { depth: 0 },
		Node::ArrayOpen { depth: 1 },
		Node::Int("1".into()),
		Node::Int("2".into()),
		Node::EndComposite { depth: 1 },
		Node::ArrayOpen { depth: 1 },
		Node::Int("3".into()),
		Node::EndComposite { depth: 1 },
		Node::EndComposite { depth: 0 },
	];
	let err = map(nodes, Some(&TypeDesc::multi_array(TypeDesc::Int, 2))).unwrap_err();
	match err {
		MapError::NonRegularArray { rank, expected, got, .. } => {
			assert_eq!(rank, 1);
			assert_eq!(expected, 2);
			assert_eq!(got, 1);
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn empty_first_sub_array_still_pins_the_length() {
	// The first row being empty must not leave the rank length open for
	// a longer sibling to fill in.
	let nodes = vec![
		Node::ArrayOpen { depth: 0 },
		Node::ArrayOpen { depth: 1 },
		Node::EndComposite { depth: 1 },
		Node::ArrayOpen { depth: 1 },
		Node::Int("1".into()),
		Node::Int("2".into()),
		Node::EndComposite { depth: 1 },
		Node::EndComposite { depth: 0 },
	];
	let err = map(nodes, Some(&TypeDesc::multi_array(TypeDesc::Int, 2))).unwrap_err();
	match err {
		MapError::NonRegularArray { rank, expected, got, .. } => {
			assert_eq!(rank, 1);
			assert_eq!(expected, 0);
			assert_eq!(got, 2);
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn under_nested_multi_dim_input_is_a_mismatch() {
	// Leaf values directly inside a rank-2 array are nested one level
	// short of the expected shape.
	let err = map(int_array(&[1, 2]), Some(&TypeDesc::multi_array(TypeDesc::Int, 2))).unwrap_err();
	match err {
		MapError::TypeMismatch { found, expected, .. } => {
			assert_eq!(found, "integer");
			assert_eq!(expected, "array");
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn array_where_struct_expected_is_a_mismatch() {
	let err = map(int_array(&[1]), Some(&TypeDesc::Hashtable)).unwrap_err();
	match err {
		MapError::TypeMismatch { found, expected, .. } => {
			assert_eq!(found, "array");
			assert_eq!(expected, "struct");
		}
		other => panic!("unexpected error: {other}"),
	}
}
