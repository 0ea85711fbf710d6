//! METAR XML response parsing.
//!
//! The data server answers with:
//!
//! ```xml
//! <response>
//!   <errors />
//!   <warnings />
//!   <data num_results="1">
//!     <METAR>
//!       <station_id>KBOS</station_id>
//!       <observation_time>2024-01-01T00:00:00Z</observation_time>
//!       <temp_c>21.5</temp_c>
//!       ...
//!     </METAR>
//!   </data>
//! </response>
//! ```

use chrono::{DateTime, Utc};
use roxmltree::{Document, Node};
use tempsight_collector_framework::{CollectorError, FetchError, Point, Result};

/// Parse a data server response into one point per `METAR` node.
///
/// Malformed XML or an unexpected root element is a parse error. A report
/// missing a station, observation time or temperature fails the whole batch.
pub fn parse_metar_response(xml: &str) -> Result<Vec<Point>> {
    let doc = Document::parse(xml)
        .map_err(|e| CollectorError::parse(format!("malformed METAR XML: {}", e)))?;

    let root = doc.root_element();
    if !root.has_tag_name("response") {
        return Err(CollectorError::parse(format!(
            "unexpected root element <{}>, expected <response>",
            root.tag_name().name()
        )));
    }

    report_service_messages(root);

    let Some(data) = child(root, "data") else {
        return Ok(Vec::new());
    };

    data.children()
        .filter(|n| n.has_tag_name("METAR"))
        .enumerate()
        .map(|(index, metar)| parse_metar(metar, index))
        .collect()
}

fn parse_metar(metar: Node<'_, '_>, index: usize) -> Result<Point> {
    let station = child_text(metar, "station_id")
        .ok_or_else(|| FetchError::missing("station_id", format!("METAR #{}", index + 1)))?;
    let context = format!("METAR {}", station);

    let observed = child_text(metar, "observation_time")
        .ok_or_else(|| FetchError::missing("observation_time", &context))?;
    let observed: DateTime<Utc> = DateTime::parse_from_rfc3339(observed)
        .map_err(|_| FetchError::invalid("observation_time", observed, &context))?
        .with_timezone(&Utc);

    let temp = child_text(metar, "temp_c").ok_or_else(|| FetchError::missing("temp_c", &context))?;
    let celsius: f64 = temp
        .parse()
        .map_err(|_| FetchError::invalid("temp_c", temp, &context))?;

    // Rejects NaN and infinities, which parse as floats
    let point = Point::location_temperature(station, celsius, None)
        .map_err(|_| FetchError::invalid("temp_c", temp, &context))?;

    Ok(point.with_timestamp(observed))
}

/// Log errors and warnings the service embeds in the response.
fn report_service_messages(root: Node<'_, '_>) {
    for (section, item) in [("errors", "error"), ("warnings", "warning")] {
        let Some(list) = child(root, section) else {
            continue;
        };
        for message in list.children().filter(|n| n.has_tag_name(item)) {
            if let Some(text) = message.text().map(str::trim).filter(|t| !t.is_empty()) {
                tracing::warn!(kind = item, "Weather service reported: {}", text);
            }
        }
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child(node, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn response(metars: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<response xmlns:xsd="http://www.w3.org/2001/XMLSchema" version="1.2">
  <request_index>1</request_index>
  <errors />
  <warnings />
  <time_taken_ms>5</time_taken_ms>
  <data num_results="0">{}</data>
</response>"#,
            metars
        )
    }

    fn metar(station: &str, time: &str, temp: &str) -> String {
        format!(
            "<METAR><raw_text>{s} 010000Z</raw_text><station_id>{s}</station_id>\
             <observation_time>{t}</observation_time><temp_c>{c}</temp_c>\
             <dewpoint_c>-1.0</dewpoint_c></METAR>",
            s = station,
            t = time,
            c = temp
        )
    }

    #[test]
    fn test_single_metar() {
        let xml = response(&metar("KXYZ", "2024-01-01T00:00:00Z", "21.5"));

        let points = parse_metar_response(&xml).unwrap();

        assert_eq!(points.len(), 1);
        let point = &points[0];
        assert_eq!(point.measurement, "location_temperature");
        assert_eq!(point.location(), Some("KXYZ"));
        assert_eq!(point.temperature(), Some(21.5));
        assert_eq!(
            point.timestamp,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_one_point_per_metar() {
        let metars = [
            metar("KBOS", "2024-03-01T12:54:00Z", "3.3"),
            metar("KBOS", "2024-03-01T11:54:00Z", "2.8"),
            metar("KJFK", "2024-03-01T12:51:00Z", "-0.6"),
        ]
        .concat();

        let points = parse_metar_response(&response(&metars)).unwrap();

        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.location().is_some_and(|l| !l.is_empty())));
        assert!(points.iter().all(|p| p.temperature().is_some()));
        assert_eq!(points[2].temperature(), Some(-0.6));
        assert_ne!(points[0].timestamp, points[1].timestamp);
    }

    #[test]
    fn test_empty_data() {
        assert!(parse_metar_response(&response("")).unwrap().is_empty());
    }

    #[test]
    fn test_response_without_data() {
        let xml = "<response><errors><error>Invalid station string</error></errors></response>";
        assert!(parse_metar_response(xml).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_xml() {
        let result = parse_metar_response("<response><data><METAR>");
        assert!(matches!(result, Err(CollectorError::Parse(_))));
    }

    #[test]
    fn test_unexpected_root() {
        let result = parse_metar_response("<html><body>Service unavailable</body></html>");
        assert!(matches!(result, Err(CollectorError::Parse(_))));
    }

    #[test]
    fn test_missing_temperature_fails() {
        let xml = response(
            "<METAR><station_id>KXYZ</station_id>\
             <observation_time>2024-01-01T00:00:00Z</observation_time></METAR>",
        );

        let err = parse_metar_response(&xml).unwrap_err();
        match err {
            CollectorError::Fetch(FetchError::MissingField { field, context }) => {
                assert_eq!(field, "temp_c");
                assert_eq!(context, "METAR KXYZ");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_temperature_fails() {
        let xml = response(&metar("KXYZ", "2024-01-01T00:00:00Z", "M05"));

        let err = parse_metar_response(&xml).unwrap_err();
        assert!(matches!(
            err,
            CollectorError::Fetch(FetchError::InvalidValue { ref field, .. }) if field == "temp_c"
        ));
    }

    #[test]
    fn test_nan_temperature_fails() {
        let xml = response(&metar("KXYZ", "2024-01-01T00:00:00Z", "NaN"));
        assert!(matches!(
            parse_metar_response(&xml),
            Err(CollectorError::Fetch(FetchError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_bad_observation_time_fails() {
        let xml = response(&metar("KXYZ", "yesterday", "10.0"));
        assert!(matches!(
            parse_metar_response(&xml),
            Err(CollectorError::Fetch(FetchError::InvalidValue { ref field, .. })) if field == "observation_time"
        ));
    }

    #[test]
    fn test_missing_station_names_position() {
        let xml = response(&format!(
            "{}<METAR><observation_time>2024-01-01T00:00:00Z</observation_time><temp_c>1</temp_c></METAR>",
            metar("KBOS", "2024-01-01T00:00:00Z", "1.0")
        ));

        let err = parse_metar_response(&xml).unwrap_err();
        assert!(err.to_string().contains("METAR #2"), "{}", err);
    }
}
