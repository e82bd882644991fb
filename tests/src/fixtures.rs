//! Canned feed responses.

/// A successful feed body with the given pollutant values.
pub fn feed_ok(values: &[(&str, f64)]) -> String {
    let iaqi = values
        .iter()
        .map(|(code, v)| format!(r#""{code}": {{"v": {v}}}"#))
        .collect::<Vec<_>>()
        .join(", ");
    format!(r#"{{"status": "ok", "data": {{"iaqi": {{{iaqi}}}}}}}"#)
}

/// A feed body reporting no coverage.
pub fn feed_error() -> String {
    r#"{"status": "error", "data": "Unknown station"}"#.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_ok_is_valid_json() {
        let body = feed_ok(&[("pm25", 10.0), ("pm10", 20.0)]);
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["data"]["iaqi"]["pm25"]["v"], 10.0);
    }
}
