/// Render an amount in cents as US-dollar text, e.g. `123456` → `"$1,234.56"`.
pub fn format_currency(cents: i64) -> String {
    let negative = cents < 0;
    let abs = cents.unsigned_abs();
    let dollars = abs / 100;
    let fraction = abs % 100;

    let mut out = String::with_capacity(16);
    if negative {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_thousands(dollars));
    out.push('.');
    out.push_str(&format!("{fraction:02}"));
    out
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
