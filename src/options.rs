/// Action taken when a record member expected by the target type never
/// appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingAction {
	/// Tolerate the absent member, leaving it at its default value.
	Ignore,
	/// Reject the struct with a missing-member failure.
	#[default]
	Error,
}

/// Tolerance flags for out-of-spec peers plus the default missing-member
/// action. Read-only for the duration of any mapping call.
#[derive(Debug, Clone, Default)]
pub struct MapperOptions {
	/// Accept out-of-spec HTTP framing. Consumed by the transport layer,
	/// carried here so one options value covers the whole client surface.
	pub allow_invalid_http_content: bool,
	/// Accept date-time payloads outside the ISO-8601 profile.
	pub allow_non_standard_date_time: bool,
	/// Accept a string-typed `faultCode` in fault responses.
	pub allow_string_fault_code: bool,
	/// Keep the first occurrence of a duplicated struct member instead of
	/// rejecting the struct.
	pub ignore_duplicate_members: bool,
	/// Map an empty date-time payload to the minimum date sentinel.
	pub map_empty_date_time_to_min_value: bool,
	/// Map the all-zero date-time literals to the minimum date sentinel.
	pub map_zeros_date_time_to_min_value: bool,
	/// Missing-member action when no per-type or per-member override
	/// applies.
	pub default_action: MappingAction,
}

impl MapperOptions {
	/// Strict options: every tolerance disabled, missing members rejected.
	pub fn new() -> Self {
		Self::default()
	}

	/// Accept date-time payloads outside the ISO-8601 profile.
	pub fn with_non_standard_date_time(mut self) -> Self {
		self.allow_non_standard_date_time = true;
		self
	}

	/// Accept a string-typed `faultCode` in fault responses.
	pub fn with_string_fault_code(mut self) -> Self {
		self.allow_string_fault_code = true;
		self
	}

	/// Keep the first occurrence of duplicated struct members.
	pub fn with_ignore_duplicate_members(mut self) -> Self {
		self.ignore_duplicate_members = true;
		self
	}

	/// Map empty date-time payloads to the minimum date sentinel.
	pub fn with_empty_date_time_to_min_value(mut self) -> Self {
		self.map_empty_date_time_to_min_value = true;
		self
	}

	/// Map all-zero date-time literals to the minimum date sentinel.
	pub fn with_zeros_date_time_to_min_value(mut self) -> Self {
		self.map_zeros_date_time_to_min_value = true;
		self
	}

	/// Set the default missing-member action.
	pub fn with_default_action(mut self, action: MappingAction) -> Self {
		self.default_action = action;
		self
	}
}
