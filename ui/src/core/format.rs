//! Display formatting helpers shared across the dashboard.

/// Formats an emissions magnitude (tonnes of CO2 equivalents) with a
/// human-scale unit suffix.
pub fn format_emissions(tonnes: f64) -> String {
    if !tonnes.is_finite() {
        return "—".to_string();
    }
    let magnitude = tonnes.abs();
    if magnitude >= 1e9 {
        format!("{:.2} Gt", tonnes / 1e9)
    } else if magnitude >= 1e6 {
        format!("{:.2} Mt", tonnes / 1e6)
    } else if magnitude >= 1e3 {
        format!("{:.1} kt", tonnes / 1e3)
    } else {
        format!("{tonnes:.0} t")
    }
}

/// Formats a fractional change (1.0 = +100%) as a signed percentage.
pub fn format_percent(fraction: f64) -> String {
    if !fraction.is_finite() {
        return "—".to_string();
    }
    format!("{:+.1}%", fraction * 100.0)
}
