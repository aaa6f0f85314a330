use super::gst::round_money;
use rust_decimal::Decimal;

const ONES: [&str; 20] = [
    "Zero",
    "One",
    "Two",
    "Three",
    "Four",
    "Five",
    "Six",
    "Seven",
    "Eight",
    "Nine",
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Write a rupee amount the way it is printed on quotations and invoices.
///
/// Uses the Indian numbering system (thousand, lakh, crore) and appends paise
/// when the amount has a fractional part, e.g. 373.33 becomes
/// "Rupees Three Hundred Seventy Three and Thirty Three Paise Only".
pub fn amount_in_words(amount: Decimal) -> String {
    let amount = round_money(amount);
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "Minus "
    } else {
        ""
    };
    let amount = amount.abs();

    let rupees = whole_units(amount.trunc());
    let paise = whole_units(amount.fract() * Decimal::ONE_HUNDRED);

    if paise == 0 {
        format!("{sign}Rupees {} Only", number_in_words(rupees))
    } else {
        format!(
            "{sign}Rupees {} and {} Paise Only",
            number_in_words(rupees),
            number_in_words(paise)
        )
    }
}

// Every non-negative integral Decimal fits in u128.
fn whole_units(n: Decimal) -> u128 {
    let mut n = n;
    n.rescale(0);
    n.mantissa().unsigned_abs()
}

/// Spell out a whole number in the Indian numbering system.
pub fn number_in_words(n: u128) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut parts = Vec::new();
    let crore = n / 1_00_00_000;
    let lakh = (n / 1_00_000) % 100;
    let thousand = (n / 1_000) % 100;
    let rest = n % 1_000;

    if crore > 0 {
        parts.push(format!("{} Crore", number_in_words(crore)));
    }
    if lakh > 0 {
        parts.push(format!("{} Lakh", below_hundred(lakh)));
    }
    if thousand > 0 {
        parts.push(format!("{} Thousand", below_hundred(thousand)));
    }
    if rest > 0 {
        parts.push(below_thousand(rest));
    }
    parts.join(" ")
}

fn below_thousand(n: u128) -> String {
    let hundreds = n / 100;
    let rest = n % 100;
    match (hundreds, rest) {
        (0, _) => below_hundred(rest),
        (h, 0) => format!("{} Hundred", ONES[h as usize]),
        (h, r) => format!("{} Hundred {}", ONES[h as usize], below_hundred(r)),
    }
}

fn below_hundred(n: u128) -> String {
    match n {
        0..=19 => ONES[n as usize].to_string(),
        _ if n % 10 == 0 => TENS[(n / 10) as usize].to_string(),
        _ => format!("{} {}", TENS[(n / 10) as usize], ONES[(n % 10) as usize]),
    }
}
