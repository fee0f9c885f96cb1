use wasm_bindgen::JsValue;

/// Indicator text for a scale factor, e.g. `0.8` -> `"80%"`.
pub fn format_percent(scale: f64) -> String {
    format!("{}%", (scale * 100.0).round() as i64)
}

pub fn clog(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(&format!("[ksxr-zoom] {msg}")));
}

#[cfg(test)]
mod tests {
    use super::format_percent;

    #[test]
    fn percent_rounds_to_whole_numbers() {
        assert_eq!(format_percent(0.8), "80%");
        assert_eq!(format_percent(0.05), "5%");
        assert_eq!(format_percent(1.0000000000000002), "100%");
        assert_eq!(format_percent(1.049), "105%");
        assert_eq!(format_percent(2.0), "200%");
    }
}
