//! Lenient parsing for the free-form numeric fields of an exercise.
//!
//! Reps, intensity and distance are typed by hand ("8-10", "75%", "6 @ RPE8"),
//! so parsing reads the leading number and ignores the rest. Anything without
//! a leading number is "absent" and callers treat it as zero.

/// Parse the leading decimal number of `text` ("72.5kg" -> 72.5, "8-10" -> 8.0)
pub fn leading_float(text: &str) -> Option<f64> {
  let s = text.trim_start();
  let bytes = s.as_bytes();
  let mut end = 0;

  if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
    end += 1;
  }

  let int_start = end;
  while end < bytes.len() && bytes[end].is_ascii_digit() {
    end += 1;
  }
  let mut digits = end - int_start;

  if end < bytes.len() && bytes[end] == b'.' {
    let frac_start = end + 1;
    let mut frac_end = frac_start;
    while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
      frac_end += 1;
    }
    if frac_end > frac_start || digits > 0 {
      digits += frac_end - frac_start;
      end = frac_end;
    }
  }

  if digits == 0 {
    return None;
  }

  // Optional exponent, only consumed when it is complete ("1e3" but not "1e")
  if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
    let mut exp_end = end + 1;
    if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
      exp_end += 1;
    }
    let exp_digits_start = exp_end;
    while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
      exp_end += 1;
    }
    if exp_end > exp_digits_start {
      end = exp_end;
    }
  }

  s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the leading integer of `text` ("8-10" -> 8, "12 each" -> 12)
pub fn leading_int(text: &str) -> Option<i64> {
  let s = text.trim_start();
  let bytes = s.as_bytes();
  let mut end = 0;

  if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
    end += 1;
  }

  let digits_start = end;
  while end < bytes.len() && bytes[end].is_ascii_digit() {
    end += 1;
  }

  if end == digits_start {
    return None;
  }

  s[..end].parse::<i64>().ok()
}

/// Leading float, or zero when the field holds no number
pub fn float_or_zero(text: &str) -> f64 {
  leading_float(text).unwrap_or(0.0)
}

/// Leading integer, or zero when the field holds no number
pub fn int_or_zero(text: &str) -> i64 {
  leading_int(text).unwrap_or(0)
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}
