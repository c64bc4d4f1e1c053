//! Human-readable labels shown next to the map.

use crate::Coordinate;

/// `125` becomes `"2 min 5 s"`.
pub fn format_time(seconds: u64) -> String {
    let minutes = seconds / 60;
    let rest = seconds - minutes * 60;
    format!("{minutes} min {rest} s")
}

pub fn format_distance_km(km: f64) -> String {
    format!("{:.1} km", km.max(0.0))
}

/// Degrees-minutes-seconds rendering of a clicked point, latitude first:
/// `30° 39′ 38″ N 104° 03′ 50″ E`.
pub fn to_string_hdms(coord: Coordinate) -> String {
    format!(
        "{} {}",
        degrees_to_hdms(['N', 'S'], coord.lat),
        degrees_to_hdms(['E', 'W'], coord.lon)
    )
}

fn degrees_to_hdms(hemispheres: [char; 2], degrees: f64) -> String {
    let normalized = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    let x = (3600.0 * normalized).abs();
    let mut deg = (x / 3600.0).floor() as u32;
    let mut min = ((x - f64::from(deg) * 3600.0) / 60.0).floor() as u32;
    let mut sec = (x - f64::from(deg) * 3600.0 - f64::from(min) * 60.0).round() as u32;
    if sec >= 60 {
        sec = 0;
        min += 1;
    }
    if min >= 60 {
        min = 0;
        deg += 1;
    }

    let mut hdms = format!("{deg}\u{00b0}");
    if min != 0 || sec != 0 {
        hdms.push_str(&format!(" {min:02}\u{2032}"));
    }
    if sec != 0 {
        hdms.push_str(&format!(" {sec:02}\u{2033}"));
    }
    if normalized != 0.0 {
        hdms.push(' ');
        hdms.push(if normalized < 0.0 {
            hemispheres[1]
        } else {
            hemispheres[0]
        });
    }
    hdms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_splits_minutes_and_seconds() {
        assert_eq!(format_time(125), "2 min 5 s");
        assert_eq!(format_time(0), "0 min 0 s");
        assert_eq!(format_time(59), "0 min 59 s");
        assert_eq!(format_time(3600), "60 min 0 s");
    }

    #[test]
    fn distance_label_has_one_decimal() {
        assert_eq!(format_distance_km(2.5), "2.5 km");
        assert_eq!(format_distance_km(12.34), "12.3 km");
        assert_eq!(format_distance_km(-0.01), "0.0 km");
    }

    #[test]
    fn hdms_of_default_view_center() {
        let center = Coordinate {
            lat: 30.660467,
            lon: 104.06385,
        };
        assert_eq!(
            to_string_hdms(center),
            "30\u{00b0} 39\u{2032} 38\u{2033} N 104\u{00b0} 03\u{2032} 50\u{2033} E"
        );
    }

    #[test]
    fn hdms_southern_western_hemispheres() {
        let coord = Coordinate {
            lat: -33.5,
            lon: -70.25,
        };
        assert_eq!(
            to_string_hdms(coord),
            "33\u{00b0} 30\u{2032} S 70\u{00b0} 15\u{2032} W"
        );
    }

    #[test]
    fn hdms_origin_has_no_hemisphere() {
        let coord = Coordinate { lat: 0.0, lon: 0.0 };
        assert_eq!(to_string_hdms(coord), "0\u{00b0} 0\u{00b0}");
    }
}
