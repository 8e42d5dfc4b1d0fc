//! Canadian-dollar formatting in the `fr-CA` convention: space-grouped
//! thousands, decimal comma and a trailing dollar sign (`1 234,56 $`).

/// No-break space used both as the group separator and before the symbol.
const NBSP: char = '\u{a0}';

/// Decimal places shown on dashboard tiles.
pub const DASHBOARD_DECIMALS: usize = 0;

/// Decimal places shown for bank-account balances.
pub const BALANCE_DECIMALS: usize = 2;

/// Format `amount` as CAD with `decimals` fractional digits.
pub fn format_cad(amount: f64, decimals: usize) -> String {
    if !amount.is_finite() {
        return format_cad(0.0, decimals);
    }

    let rendered = format!("{:.*}", decimals, amount.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rendered.as_str(), None),
    };

    let is_zero = rendered.chars().all(|c| c == '0' || c == '.');
    let mut out = String::with_capacity(rendered.len() + 8);
    if amount < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out.push(NBSP);
    out.push('$');
    out
}

/// Dashboard amount, no decimals.
pub fn format_dashboard_amount(amount: f64) -> String {
    format_cad(amount, DASHBOARD_DECIMALS)
}

/// Bank-account balance, two decimals.
pub fn format_balance(amount: f64) -> String {
    format_cad(amount, BALANCE_DECIMALS)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(NBSP);
        }
        out.push(c);
    }
    out
}
