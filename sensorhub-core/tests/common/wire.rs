//! Line inspection helpers

use serde_json::Value;

/// Parse a line, asserting it is one JSON object led by `type` then `ts`
pub fn parse(line: &str) -> Value {
    assert!(line.starts_with(r#"{"type":""#), "type not first: {}", line);
    let after_type = &line[9..];
    let quote = after_type.find('"').expect("closing quote of type");
    assert!(
        after_type[quote..].starts_with(r#"","ts":"#),
        "ts not second: {}",
        line
    );
    assert!(!line.contains('\n') && !line.contains('\r'));

    let value: Value = serde_json::from_str(line).unwrap_or_else(|e| panic!("{}: {}", e, line));
    assert!(value.is_object());
    value
}

/// Value of the `type` field
pub fn kind(line: &str) -> String {
    parse(line)["type"].as_str().unwrap_or_default().to_string()
}

/// Value of the `ts` field
pub fn ts(line: &str) -> u64 {
    parse(line)["ts"].as_u64().expect("integer ts")
}

/// DATA lines for `sensor`
pub fn data_for<'a>(lines: &'a [String], sensor: &str) -> Vec<&'a String> {
    lines
        .iter()
        .filter(|line| {
            let value = parse(line);
            value["type"] == "DATA" && value["sensor"] == sensor
        })
        .collect()
}

/// Lines of the given `type`
pub fn of_kind<'a>(lines: &'a [String], wanted: &str) -> Vec<&'a String> {
    lines.iter().filter(|line| kind(line) == wanted).collect()
}

/// `message` of a LOG/ERROR line
pub fn message(line: &str) -> String {
    parse(line)["message"].as_str().unwrap_or_default().to_string()
}
