/// Insert thousands separators into a string of ASCII digits.
fn group_thousands(digits: &str) -> String {
    let mut with_commas = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    with_commas.chars().rev().collect()
}

/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let with_commas = group_thousands(int_part);

    // -0.004 rounds to $0.00; don't print a sign for it
    if negative && cents != "0.00" {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Format a count with thousands separators: 12,345
pub fn number(val: usize) -> String {
    group_thousands(&val.to_string())
}

/// Round to one decimal place.
fn round1(val: f64) -> f64 {
    (val * 10.0).round() / 10.0
}

fn unit_label(val: f64, suffix: &str) -> String {
    if val == val.floor() {
        format!("{}{suffix}", val as u64)
    } else {
        format!("{val:.1}{suffix}")
    }
}

/// Compact dollar label for chart axes: "$950", "$25k", "$2.5k", "$1.5M".
/// The unit is picked after rounding, so 999.7 reads "$1k", not "$1000".
pub fn compact_money(val: f64) -> String {
    let abs = val.abs();
    let body = if abs.round() < 1000.0 {
        unit_label(abs.round(), "")
    } else if round1(abs / 1000.0) < 1000.0 {
        unit_label(round1(abs / 1000.0), "k")
    } else {
        unit_label(round1(abs / 1_000_000.0), "M")
    };
    let sign = if val < 0.0 && body != "0" { "-" } else { "" };
    format!("{sign}${body}")
}
