//! InfluxDB line protocol encoding.
//!
//! ```text
//! measurement,tag1=val1,tag2=val2 field1=val1,field2=val2 timestamp_ns
//! ```
//!
//! See: <https://docs.influxdata.com/influxdb/v2/reference/syntax/line-protocol/>

use std::borrow::Cow;
use std::fmt::Write;

use crate::error::{Error, Result};
use crate::point::{FieldValue, Point};

const MEASUREMENT_SPECIALS: &[char] = &[',', ' '];
const KEY_SPECIALS: &[char] = &[',', '=', ' '];

/// Encode a single point as one line (without trailing newline).
pub fn encode_point(point: &Point) -> Result<String> {
    if point.fields.is_empty() {
        return Err(Error::InvalidPoint(format!(
            "measurement '{}' has no fields",
            point.measurement
        )));
    }

    let mut line = escape(&point.measurement, MEASUREMENT_SPECIALS).into_owned();

    // BTreeMap iteration keeps tags in canonical (sorted) order
    for (key, value) in &point.tags {
        if value.is_empty() {
            continue;
        }
        line.push(',');
        line.push_str(&escape(key, KEY_SPECIALS));
        line.push('=');
        line.push_str(&escape(value, KEY_SPECIALS));
    }

    for (i, (key, value)) in point.fields.iter().enumerate() {
        line.push(if i == 0 { ' ' } else { ',' });
        line.push_str(&escape(key, KEY_SPECIALS));
        line.push('=');
        push_field_value(&mut line, value);
    }

    if let Some(ts) = point.timestamp {
        let nanos = ts.timestamp_nanos_opt().ok_or_else(|| {
            Error::InvalidPoint(format!("timestamp {} is out of range", ts.to_rfc3339()))
        })?;
        let _ = write!(line, " {}", nanos);
    }

    Ok(line)
}

/// Encode a batch of points, one line per point.
///
/// An empty batch encodes to an empty string.
pub fn encode_batch(points: &[Point]) -> Result<String> {
    let lines = points.iter().map(encode_point).collect::<Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

fn push_field_value(line: &mut String, value: &FieldValue) {
    let _ = match value {
        FieldValue::Float(v) => write!(line, "{}", v),
        FieldValue::Integer(v) => write!(line, "{}i", v),
    };
}

fn escape<'a>(s: &'a str, specials: &[char]) -> Cow<'a, str> {
    if !s.contains(specials) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if specials.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}
