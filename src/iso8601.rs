use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Minimum date sentinel used by the empty and all-zero date tolerances.
pub fn min_date_time() -> NaiveDateTime {
	NaiveDate::from_ymd_opt(1, 1, 1)
		.and_then(|d| d.and_hms_opt(0, 0, 0))
		.unwrap_or_default()
}

const STRICT_FORMATS: &[&str] = &[
	"%Y%m%dT%H:%M:%S",
	"%Y-%m-%dT%H:%M:%S",
	"%Y%m%dT%H%M%S",
	"%Y%m%dT%H:%M:%S%.f",
	"%Y-%m-%dT%H:%M:%S%.f",
];

const LENIENT_FORMATS: &[&str] = &[
	"%Y-%m-%d %H:%M:%S",
	"%Y-%m-%dT%H:%M",
	"%Y-%m-%d",
];

/// Parse an ISO-8601 basic or extended date-time, normalizing any trailing
/// `Z` or `±hh[:]mm` offset to UTC.
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
	parse_with(value, STRICT_FORMATS)
}

/// Like [`parse_date_time`] but additionally accepts the looser shapes some
/// out-of-spec peers emit (space separator, missing seconds, date only).
pub fn parse_date_time_lenient(value: &str) -> Option<NaiveDateTime> {
	parse_with(value, STRICT_FORMATS).or_else(|| parse_with(value, LENIENT_FORMATS))
}

fn parse_with(value: &str, formats: &[&str]) -> Option<NaiveDateTime> {
	let value = value.trim();
	let (body, offset_minutes) = split_offset(value)?;
	let parsed = formats
		.iter()
		.find_map(|fmt| NaiveDateTime::parse_from_str(body, fmt).ok())
		.or_else(|| {
			// Date-only lenient shapes have no time portion to parse.
			formats
				.iter()
				.filter(|fmt| !fmt.contains("%H"))
				.find_map(|fmt| NaiveDate::parse_from_str(body, fmt).ok())
				.and_then(|d| d.and_hms_opt(0, 0, 0))
		})?;
	parsed.checked_sub_signed(TimeDelta::minutes(offset_minutes))
}

/// Split a trailing zone designator from the payload, returning the bare
/// date-time text and the offset in minutes east of UTC.
fn split_offset(value: &str) -> Option<(&str, i64)> {
	if let Some(body) = value.strip_suffix(['Z', 'z']) {
		return Some((body, 0));
	}

	// An offset sign can only appear after the time part; searching beyond
	// the date keeps dashed dates intact.
	let Some(search_from) = value.find(['T', ' ']).map(|i| i + 1) else {
		return Some((value, 0));
	};
	let Some(rel) = value[search_from..].rfind(['+', '-']) else {
		return Some((value, 0));
	};
	let sign_idx = search_from + rel;
	let (body, suffix) = value.split_at(sign_idx);
	let negative = suffix.starts_with('-');
	let digits = suffix[1..].replace(':', "");
	if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	let hours: i64 = digits[..2].parse().ok()?;
	let minutes: i64 = digits[2..].parse().ok()?;
	if hours > 23 || minutes > 59 {
		return None;
	}
	let total = hours * 60 + minutes;
	Some((body, if negative { -total } else { total }))
}

#[cfg(test)]
mod tests {
	use super::{min_date_time, parse_date_time, parse_date_time_lenient};
	use chrono::NaiveDate;

	fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> chrono::NaiveDateTime {
		NaiveDate::from_ymd_opt(y, mo, d).unwrap().and_hms_opt(h, mi, s).unwrap()
	}

	#[test]
	fn basic_and_extended_profiles_parse() {
		assert_eq!(parse_date_time("19980717T14:08:55"), Some(at(1998, 7, 17, 14, 8, 55)));
		assert_eq!(parse_date_time("1998-07-17T14:08:55"), Some(at(1998, 7, 17, 14, 8, 55)));
		assert_eq!(parse_date_time("19980717T140855"), Some(at(1998, 7, 17, 14, 8, 55)));
	}

	#[test]
	fn zone_designators_normalize_to_utc() {
		assert_eq!(parse_date_time("1998-07-17T14:08:55Z"), Some(at(1998, 7, 17, 14, 8, 55)));
		assert_eq!(parse_date_time("1998-07-17T14:08:55+02:00"), Some(at(1998, 7, 17, 12, 8, 55)));
		assert_eq!(parse_date_time("1998-07-17T14:08:55-0230"), Some(at(1998, 7, 17, 16, 38, 55)));
	}

	#[test]
	fn fractional_seconds_are_accepted() {
		assert_eq!(
			parse_date_time("1998-07-17T14:08:55.250Z").map(|dt| dt.and_utc().timestamp()),
			Some(at(1998, 7, 17, 14, 8, 55).and_utc().timestamp())
		);
	}

	#[test]
	fn garbage_is_rejected() {
		assert_eq!(parse_date_time(""), None);
		assert_eq!(parse_date_time("not a date"), None);
		assert_eq!(parse_date_time("1998-07-17"), None);
		assert_eq!(parse_date_time("1998-07-17T14:08:55+99:00"), None);
	}

	#[test]
	fn lenient_accepts_looser_shapes() {
		assert_eq!(parse_date_time_lenient("1998-07-17 14:08:55"), Some(at(1998, 7, 17, 14, 8, 55)));
		assert_eq!(parse_date_time_lenient("1998-07-17T14:08"), Some(at(1998, 7, 17, 14, 8, 0)));
		assert_eq!(parse_date_time_lenient("1998-07-17"), Some(at(1998, 7, 17, 0, 0, 0)));
	}

	#[test]
	fn sentinel_is_year_one() {
		assert_eq!(min_date_time(), at(1, 1, 1, 0, 0, 0));
	}
}
