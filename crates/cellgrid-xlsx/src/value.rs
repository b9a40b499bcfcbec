//! Cell value lowering: raw document values into typed scalars
//!
//! Spreadsheets store dates as serial day counts distinguished only by the
//! cell's number format, and every number as f64. Lowering recovers the
//! intended type: integral numbers become integers, serial numbers under a
//! date format become datetimes.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use umya_spreadsheet::{Cell, CellRawValue};

use cellgrid_core::record::CellScalar;

/// Serial day 0 of the 1900 date system (the off-by-two epoch)
fn serial_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Lower a cell's raw value, using its number format to spot dates.
pub fn lower_value(cell: &Cell, format_code: Option<&str>) -> CellScalar {
    match cell.get_cell_value().get_raw_value() {
        CellRawValue::Empty => CellScalar::Empty,
        CellRawValue::String(s) => CellScalar::Text(s.to_string()),
        CellRawValue::RichText(rt) => CellScalar::Text(rt.get_text().to_string()),
        CellRawValue::Lazy(s) => CellScalar::Text(s.to_string()),
        CellRawValue::Bool(b) => CellScalar::Bool(*b),
        CellRawValue::Error(e) => CellScalar::Error(e.to_string()),
        CellRawValue::Numeric(n) => lower_numeric(*n, format_code),
    }
}

fn lower_numeric(n: f64, format_code: Option<&str>) -> CellScalar {
    if let Some(code) = format_code {
        if is_date_format(code) {
            if let Some(dt) = serial_to_datetime(n) {
                return CellScalar::DateTime(dt);
            }
        }
    }
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        CellScalar::Int(n as i64)
    } else {
        CellScalar::Number(n)
    }
}

/// Whether a number format code formats its value as a date or time.
///
/// Date tokens (y, m, d, h, s) are significant only outside quoted literals
/// and bracketed sections; "General" and plain numeric codes have none.
pub fn is_date_format(code: &str) -> bool {
    let mut in_quotes = false;
    let mut in_brackets = false;
    let mut escaped = false;
    for c in code.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => in_quotes = !in_quotes,
            '[' if !in_quotes => in_brackets = true,
            ']' if !in_quotes => in_brackets = false,
            'y' | 'Y' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' | 'm' | 'M'
                if !in_quotes && !in_brackets =>
            {
                return true
            }
            _ => {}
        }
    }
    false
}

/// Serial day count of 10000-01-01, one past the format's last valid date
const MAX_SERIAL: f64 = 2_958_466.0;

/// Convert a 1900-system serial number to a datetime.
///
/// Serial 1 is 1899-12-31 in this library's arithmetic; values at or below
/// zero, or past the year-9999 ceiling, have no calendar meaning and stay
/// numeric.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if serial <= 0.0 || !serial.is_finite() || serial >= MAX_SERIAL {
        return None;
    }
    let days = serial.trunc() as i64;
    let day_fraction = serial.fract();
    let millis = (day_fraction * 86_400_000.0).round() as i64;
    serial_epoch()
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::milliseconds(millis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn date_format_detection() {
        assert!(is_date_format("yyyy-mm-dd"));
        assert!(is_date_format("h:mm:ss AM/PM"));
        assert!(is_date_format("[$-409]d-mmm-yy"));
        assert!(!is_date_format("General"));
        assert!(!is_date_format("0.00"));
        assert!(!is_date_format("#,##0"));
        // Tokens inside quoted literals do not count.
        assert!(!is_date_format("0.0\" mph\""));
        // Bracketed color sections do not count either.
        assert!(!is_date_format("[Red]0.00"));
    }

    #[test]
    fn serial_conversion() {
        // Serial 45000 is 2023-03-15.
        let dt = serial_to_datetime(45000.0).unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());

        // Half a day past midnight is noon.
        let dt = serial_to_datetime(45000.5).unwrap();
        assert_eq!(dt.hour(), 12);

        assert!(serial_to_datetime(0.0).is_none());
        assert!(serial_to_datetime(-3.0).is_none());
    }

    #[test]
    fn out_of_range_serial_stays_numeric() {
        // Past the year-9999 ceiling there is no date to recover; the value
        // must come back numeric instead of panicking inside date math.
        assert!(serial_to_datetime(1e15).is_none());
        assert!(serial_to_datetime(MAX_SERIAL).is_none());
        assert_eq!(
            lower_numeric(1e15, Some("yyyy-mm-dd")),
            CellScalar::Int(1_000_000_000_000_000)
        );

        // The last representable day still converts.
        let dt = serial_to_datetime(MAX_SERIAL - 1.0).unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(9999, 12, 31).unwrap());
    }

    #[test]
    fn integral_numbers_become_ints() {
        assert_eq!(lower_numeric(42.0, None), CellScalar::Int(42));
        assert_eq!(lower_numeric(-7.0, Some("0.00")), CellScalar::Int(-7));
        assert_eq!(lower_numeric(1.5, None), CellScalar::Number(1.5));
    }

    #[test]
    fn dated_numeric_becomes_datetime() {
        match lower_numeric(45000.0, Some("yyyy-mm-dd")) {
            CellScalar::DateTime(dt) => {
                assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2023, 3, 15).unwrap())
            }
            other => panic!("expected a datetime, got {:?}", other),
        }
    }
}
