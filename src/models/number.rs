/// Round to a fixed number of decimal places, exact ties to even
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round_ties_even() / factor
}

/// Render a float the way feedback strings expect it.
///
/// Whole numbers keep a single trailing decimal ("150.0"), everything else
/// uses the shortest representation that round-trips ("0.833").
pub fn display_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
