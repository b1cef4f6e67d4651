pub mod progress;

use std::time::Duration;

/// Formats an elapsed run duration as `HH:MM:SS.mmm`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    let hours = millis / 3_600_000;
    let minutes = (millis % 3_600_000) / 60_000;
    let seconds = (millis % 60_000) / 1_000;
    let millis = millis % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_time_formats_each_unit() {
        assert_eq!(format_elapsed(Duration::from_millis(42)), "00:00:00.042");
        assert_eq!(format_elapsed(Duration::from_secs(61)), "00:01:01.000");
        assert_eq!(
            format_elapsed(Duration::from_secs(3_600 * 2 + 60 * 3 + 4)),
            "02:03:04.000"
        );
    }
}
