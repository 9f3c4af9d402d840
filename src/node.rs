/// One typed token in the flattened pre-order traversal of a wire value.
///
/// Primitive kinds carry the raw text payload exactly as it appeared on the
/// wire. Composite kinds open an array or struct and are followed by their
/// children until a [`Node::EndComposite`] with the same nesting depth.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	/// `<int>`/`<i4>` payload.
	Int(String),
	/// `<i8>` payload.
	Long(String),
	/// `<boolean>` payload.
	Bool(String),
	/// `<string>` payload, or a bare value with no type element when
	/// `implicit` is set.
	Str {
		/// Raw string payload.
		value: String,
		/// Whether the value had no explicit `<string>` element.
		implicit: bool,
	},
	/// `<double>` payload.
	Double(String),
	/// `<dateTime.iso8601>` payload.
	DateTime(String),
	/// `<base64>` payload.
	Base64(String),
	/// `<nil/>` marker.
	Nil,
	/// Opens an `<array>` value at the given nesting depth.
	ArrayOpen {
		/// Nesting depth of the opening node.
		depth: u32,
	},
	/// Opens a `<struct>` value at the given nesting depth.
	StructOpen {
		/// Nesting depth of the opening node.
		depth: u32,
	},
	/// Names the next child value inside a struct.
	Member {
		/// Wire member name.
		name: String,
	},
	/// Closes the composite opened at the same nesting depth.
	EndComposite {
		/// Nesting depth of the matching opening node.
		depth: u32,
	},
}

impl Node {
	/// Whether this node starts a value (primitive or composite open).
	pub fn is_value(&self) -> bool {
		!matches!(self, Node::Member { .. } | Node::EndComposite { .. })
	}

	/// Nesting depth when this node opens a composite value.
	pub fn composite_depth(&self) -> Option<u32> {
		match self {
			Node::ArrayOpen { depth } | Node::StructOpen { depth } => Some(*depth),
			_ => None,
		}
	}

	/// Convenience constructor for an explicit string node.
	pub fn string(value: impl Into<String>) -> Self {
		Node::Str {
			value: value.into(),
			implicit: false,
		}
	}

	/// Convenience constructor for a bare string with no type element.
	pub fn implicit_string(value: impl Into<String>) -> Self {
		Node::Str {
			value: value.into(),
			implicit: true,
		}
	}
}

/// Forward-only cursor over a lazily produced sequence of wire nodes.
///
/// The cursor starts positioned before the first node; callers advance it
/// onto a node and read it back with [`NodeCursor::current`].
#[derive(Debug)]
pub struct NodeCursor<I> {
	iter: I,
	current: Option<Node>,
}

impl<I: Iterator<Item = Node>> NodeCursor<I> {
	/// Wrap a node producer.
	pub fn new(iter: I) -> Self {
		Self { iter, current: None }
	}

	/// Move to the next node, returning whether one exists.
	pub fn advance(&mut self) -> bool {
		self.current = self.iter.next();
		self.current.is_some()
	}

	/// The node under the cursor, if any.
	pub fn current(&self) -> Option<&Node> {
		self.current.as_ref()
	}
}

impl NodeCursor<std::vec::IntoIter<Node>> {
	/// Cursor over an already materialized node list.
	pub fn from_nodes(nodes: Vec<Node>) -> Self {
		Self::new(nodes.into_iter())
	}
}

#[cfg(test)]
mod tests {
	use super::{Node, NodeCursor};

	#[test]
	fn cursor_starts_before_first_node() {
		let cursor = NodeCursor::from_nodes(vec![Node::Nil]);
		assert!(cursor.current().is_none());
	}

	#[test]
	fn advance_walks_nodes_in_order() {
		let mut cursor = NodeCursor::from_nodes(vec![Node::Int("1".into()), Node::Nil]);
		assert!(cursor.advance());
		assert_eq!(cursor.current(), Some(&Node::Int("1".into())));
		assert!(cursor.advance());
		assert_eq!(cursor.current(), Some(&Node::Nil));
		assert!(!cursor.advance());
		assert!(cursor.current().is_none());
	}

	#[test]
	fn member_and_end_nodes_are_not_values() {
		assert!(Node::Int("7".into()).is_value());
		assert!(Node::ArrayOpen { depth: 0 }.is_value());
		assert!(!Node::Member { name: "x".into() }.is_value());
		assert!(!Node::EndComposite { depth: 0 }.is_value());
	}
}
