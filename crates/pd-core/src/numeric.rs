/// Fixed-precision display. Malformed measurements stay visible as `NaN`.
pub fn fixed(v: f64, places: usize) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    format!("{:.*}", places, v)
}
