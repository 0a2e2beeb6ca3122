//! Number formatting for result text.
//!
//! `fixed` follows the usual clinical-display convention of rounding
//! exact ties away from zero (2.5 -> "3", 0.25 -> "0.3"), which differs
//! from the round-half-to-even that `format!("{:.N}")` applies.

/// Fixed-point text with `places` decimals.
///
/// A literal `-0.0` prints unsigned; small negatives that round to zero
/// keep their sign (`-0.04` at one place is "-0.0").
pub fn fixed(value: f64, places: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs();
    let digits = if is_exact_tie(magnitude, places) {
        round_tie_up(magnitude, places)
    } else {
        format!("{magnitude:.places$}")
    };
    if value < 0.0 {
        format!("-{digits}")
    } else {
        digits
    }
}

/// Shortest natural text for an entered value ("10", "12.5").
pub fn plain(value: f64) -> String {
    if value == 0.0 {
        return "0".into();
    }
    value.to_string()
}

/// The value `fixed` would display, read back as a number.
pub fn rounded(value: f64, places: usize) -> f64 {
    fixed(value, places).parse().unwrap_or(value)
}

/// `"{min} - {max}"` at the same precision.
pub fn span(min: f64, max: f64, places: usize) -> String {
    format!("{} - {}", fixed(min, places), fixed(max, places))
}

/// Thousands-grouped text with up to three decimals ("150,000").
pub fn grouped(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let text = plain(rounded);
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3);
    out.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// True when `magnitude` sits exactly halfway between two values at `places`.
///
/// With `magnitude = m * 2^e`, that is `magnitude * 2 * 10^places` being an
/// odd integer; `5^places` is odd, so only the power of two matters.
fn is_exact_tie(magnitude: f64, places: usize) -> bool {
    if magnitude == 0.0 {
        return false;
    }
    let bits = magnitude.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    i64::from(mantissa.trailing_zeros()) + exponent + 1 + places as i64 == 0
}

/// Exact ties terminate at `places + 1` digits with a trailing 5; drop it and
/// carry one unit into the last kept digit.
fn round_tie_up(magnitude: f64, places: usize) -> String {
    let extended = places + 1;
    let mut text = format!("{magnitude:.extended$}");
    text.pop();
    if text.ends_with('.') {
        text.pop();
    }

    let mut bytes = text.into_bytes();
    let mut carry = true;
    for b in bytes.iter_mut().rev() {
        if !carry {
            break;
        }
        match *b {
            b'.' => continue,
            b'9' => *b = b'0',
            _ => {
                *b += 1;
                carry = false;
            }
        }
    }
    if carry {
        bytes.insert(0, b'1');
    }
    String::from_utf8(bytes).unwrap_or_default()
}
