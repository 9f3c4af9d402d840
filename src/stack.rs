use crate::error::Result;

/// Diagnostic trace of the path from a mapping subject down to the value
/// currently being processed. Read only when a failure is rendered.
#[derive(Debug, Clone)]
pub struct MappingStack {
	subject: String,
	entries: Vec<String>,
}

impl MappingStack {
	/// Trace rooted at a subject label such as `"response"` or
	/// `"parameter 2"`.
	pub fn new(subject: impl Into<String>) -> Self {
		Self {
			subject: subject.into(),
			entries: Vec::new(),
		}
	}

	/// The immutable subject label.
	pub fn subject(&self) -> &str {
		&self.subject
	}

	/// Number of contexts currently on the trace.
	pub fn depth(&self) -> usize {
		self.entries.len()
	}

	/// Push a context label.
	pub fn push(&mut self, entry: impl Into<String>) {
		self.entries.push(entry.into());
	}

	/// Pop the most recent context label.
	pub fn pop(&mut self) {
		self.entries.pop();
	}

	/// Run `f` with `entry` pushed, popping again on every exit path.
	pub fn scoped<T>(&mut self, entry: impl Into<String>, f: impl FnOnce(&mut MappingStack) -> Result<T>) -> Result<T> {
		self.push(entry);
		let out = f(self);
		self.pop();
		out
	}

	/// Render the trace, subject first, outermost context first.
	pub fn dump(&self) -> String {
		let mut out = String::from("[");
		out.push_str(&self.subject);
		for entry in &self.entries {
			out.push_str(" : ");
			out.push_str(entry);
		}
		out.push(']');
		out
	}
}
