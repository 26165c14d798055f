//! Payload normalization at the backend boundary.
//!
//! The backend has shipped several shapes for the same records: camelCase and
//! snake_case field names, numbers encoded as strings, foreign keys nested as
//! `{"id": ..}` objects, and collections wrapped in an envelope. Everything is
//! mapped here into the canonical records of [`crate::models`] so that the
//! aggregator never has to care.

use crate::models::{CalendarEntry, Location, NewObservation, Observation, Pandemic};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

const TOTAL_CASES: &[&str] = &["totalCases", "total_cases", "cas_confirmes"];
const TOTAL_DEATHS: &[&str] = &["totalDeaths", "total_deaths", "deces"];
const NEW_CASES: &[&str] = &["newCases", "new_cases"];
const NEW_DEATHS: &[&str] = &["newDeaths", "new_deaths"];
const PANDEMIC_ID: &[&str] = &[
    "idPandemic",
    "id_pandemic",
    "idPandemie",
    "pandemicId",
    "pandemic_id",
    "pandemie",
    "pandemic",
];
const LOCATION_ID: &[&str] = &[
    "idLocation",
    "id_location",
    "locationId",
    "location_id",
    "localisation",
    "location",
];
const CALENDAR_ID: &[&str] = &[
    "idCalendar",
    "id_calendar",
    "calendarId",
    "calendar_id",
    "calendrier",
    "calendar",
];
const DATE: &[&str] = &["dateValue", "date_value", "date"];
const ENVELOPES: &[&str] = &["content", "data", "items", "locations"];

/// Extracts the list of records from a collection payload.
///
/// Returns `None` when the payload cannot be read as a collection at all.
pub fn collection(payload: Value) -> Option<Vec<Value>> {
    match payload {
        Value::Array(items) => Some(items),
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::String(_)) | Err(_) => None,
            Ok(inner) => collection(inner),
        },
        Value::Object(mut map) => {
            for key in ENVELOPES {
                if let Some(Value::Array(_)) = map.get(*key) {
                    if let Some(Value::Array(items)) = map.remove(*key) {
                        return Some(items);
                    }
                }
            }
            Some(
                map.into_iter()
                    .map(|(_, value)| value)
                    .filter(Value::is_object)
                    .collect(),
            )
        }
        _ => None,
    }
}

pub fn observation(item: &Value) -> Option<Observation> {
    if !item.is_object() {
        return None;
    }
    Some(Observation {
        id: field(item, &["id"]).and_then(id),
        total_cases: count(field(item, TOTAL_CASES)),
        total_deaths: count(field(item, TOTAL_DEATHS)),
        new_cases: count(field(item, NEW_CASES)),
        new_deaths: count(field(item, NEW_DEATHS)),
        id_pandemic: field(item, PANDEMIC_ID).and_then(id),
        id_location: field(item, LOCATION_ID).and_then(id),
        id_calendar: field(item, CALENDAR_ID).and_then(id),
        date: field(item, DATE).and_then(text),
    })
}

pub fn calendar_entry(item: &Value) -> Option<CalendarEntry> {
    Some(CalendarEntry {
        id: field(item, &["id"]).and_then(id)?,
        date_value: field(item, DATE).and_then(text)?,
    })
}

pub fn location(item: &Value) -> Option<Location> {
    Some(Location {
        id: field(item, &["id"]).and_then(id)?,
        country: field(item, &["country", "nom", "name"]).and_then(text),
        continent: field(item, &["continent"]).and_then(text),
        latitude: field(item, &["latitude", "lat"]).and_then(float),
        longitude: field(item, &["longitude", "lng", "lon"]).and_then(float),
    })
}

pub fn pandemic(item: &Value) -> Option<Pandemic> {
    Some(Pandemic {
        id: field(item, &["id"]).and_then(id)?,
        name: field(item, &["name", "nom", "nomPandemie", "type"]).and_then(text),
        description: field(item, &["description"]).and_then(text),
    })
}

/// Maps every readable record of a collection, dropping the rest.
pub fn all<T>(items: &[Value], map: impl Fn(&Value) -> Option<T>) -> Vec<T> {
    items.iter().filter_map(map).collect()
}

/// Reads an admin create/update body, accepting either naming scheme.
pub fn new_observation(item: &Value) -> Result<NewObservation, String> {
    if !item.is_object() {
        return Err("observation must be a JSON object".to_string());
    }
    let required = |names: &[&str], label: &str| {
        field(item, names)
            .and_then(id)
            .ok_or_else(|| format!("missing or invalid {label}"))
    };
    Ok(NewObservation {
        total_cases: count(field(item, TOTAL_CASES)),
        total_deaths: count(field(item, TOTAL_DEATHS)),
        new_cases: count(field(item, NEW_CASES)),
        new_deaths: count(field(item, NEW_DEATHS)),
        id_pandemic: required(PANDEMIC_ID, "idPandemic")?,
        id_location: required(LOCATION_ID, "idLocation")?,
        id_calendar: required(CALENDAR_ID, "idCalendar")?,
    })
}

/// Canonical date key: `YYYY-MM-DD` when the value parses as a date, the
/// trimmed input otherwise.
pub fn date_key(raw: &str) -> String {
    let raw = raw.trim();
    parse_date(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(datetime.date());
    }
    NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok()
}

fn field<'a>(item: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| item.get(*name))
        .find(|value| !value.is_null())
}

/// Non-negative count; anything unreadable is zero.
fn count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().and_then(whole_non_negative))
            .unwrap_or(0),
        Some(Value::String(raw)) => {
            let cleaned: String = raw
                .chars()
                .filter(|c| !c.is_whitespace() && *c != ',' && *c != '_')
                .collect();
            cleaned
                .parse::<u64>()
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().and_then(whole_non_negative))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn whole_non_negative(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value.trunc() as u64)
}

fn id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|value| value.fract() == 0.0 && value.is_finite())
                .map(|value| value as i64)
        }),
        Value::String(raw) => raw.trim().parse().ok(),
        Value::Object(_) => value.get("id").and_then(id),
        _ => None,
    }
}

fn float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) if !raw.trim().is_empty() => Some(raw.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn observation_accepts_both_naming_schemes() {
        let camel = observation(&json!({
            "totalCases": 10, "totalDeaths": 2, "newCases": 3, "newDeaths": 1,
            "idPandemic": 1, "idLocation": 4, "idCalendar": 7
        }))
        .unwrap();
        let snake = observation(&json!({
            "total_cases": "10", "total_deaths": 2.0, "new_cases": 3, "new_deaths": "1",
            "id_pandemic": "1", "id_location": 4, "id_calendar": {"id": 7}
        }))
        .unwrap();

        assert_eq!(camel, snake);
        assert_eq!(camel.id_calendar, Some(7));
    }

    #[test]
    fn observation_reads_nested_admin_form_keys() {
        let form = json!({
            "total_cases": 40, "total_deaths": 3, "new_cases": 5, "new_deaths": 0,
            "localisation": {"id": 10}, "pandemie": {"id": 1}, "calendrier": {"id": 2}
        });

        let parsed = observation(&form).unwrap();
        assert_eq!(parsed.id_pandemic, Some(1));
        assert_eq!(parsed.id_location, Some(10));
        assert_eq!(parsed.id_calendar, Some(2));

        let body = new_observation(&form).unwrap();
        assert_eq!(body.id_location, 10);
        assert_eq!(body.id_calendar, 2);
        assert_eq!(body.total_cases, 40);
    }

    #[test]
    fn unreadable_counts_become_zero() {
        let parsed = observation(&json!({
            "totalCases": null, "totalDeaths": "n/a", "newCases": -4, "newDeaths": "1,250"
        }))
        .unwrap();

        assert_eq!(parsed.total_cases, 0);
        assert_eq!(parsed.total_deaths, 0);
        assert_eq!(parsed.new_cases, 0);
        assert_eq!(parsed.new_deaths, 1250);
        assert_eq!(parsed.id_pandemic, None);
    }

    #[test]
    fn collection_unwraps_envelopes() {
        let items = collection(json!({"content": [{"id": 1}, {"id": 2}]})).unwrap();
        assert_eq!(items.len(), 2);

        let items = collection(json!("[{\"id\": 1}]")).unwrap();
        assert_eq!(items.len(), 1);

        let items = collection(json!({"a": {"id": 1}, "b": 3})).unwrap();
        assert_eq!(items, vec![json!({"id": 1})]);

        assert!(collection(json!(42)).is_none());
        assert!(collection(json!("not json")).is_none());
    }

    #[test]
    fn location_falls_back_to_nom() {
        let parsed = location(&json!({
            "id": 3, "nom": "France", "continent": "Europe", "latitude": "46.2", "longitude": 2.2
        }))
        .unwrap();

        assert_eq!(parsed.country.as_deref(), Some("France"));
        assert_eq!(parsed.latitude, Some(46.2));
        assert!(location(&json!({"country": "Nowhere"})).is_none());
    }

    #[test]
    fn calendar_entry_requires_id_and_date() {
        let entry = calendar_entry(&json!({"id": 5, "date_value": "2020-03-01"})).unwrap();
        assert_eq!(entry.date_value, "2020-03-01");
        assert!(calendar_entry(&json!({"id": 5})).is_none());
    }

    #[test]
    fn date_key_normalizes_known_formats() {
        assert_eq!(date_key("2020-03-01"), "2020-03-01");
        assert_eq!(date_key("2020-03-01T00:00:00"), "2020-03-01");
        assert_eq!(date_key("2020-03-01T10:00:00+02:00"), "2020-03-01");
        assert_eq!(date_key("01/03/2020"), "2020-03-01");
        assert_eq!(date_key(" week 12 "), "week 12");
    }

    #[test]
    fn new_observation_reports_missing_keys() {
        let err = new_observation(&json!({"totalCases": 1, "idPandemic": 1})).unwrap_err();
        assert!(err.contains("idLocation"));

        let ok = new_observation(&json!({
            "total_cases": 5, "id_pandemic": 1, "id_location": 2, "id_calendar": 3
        }))
        .unwrap();
        assert_eq!(ok.total_cases, 5);
        assert_eq!(ok.id_calendar, 3);
    }
}
