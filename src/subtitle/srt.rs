//! SRT timestamp formatting and caption block assembly.

use crate::transcription::TranscriptSegment;

/// Timestamp substituted when an offset cannot be formatted.
pub const ZERO_TIMESTAMP: &str = "00:00:00,000";

/// Format a seconds offset as an SRT timestamp (`HH:MM:SS,mmm`).
///
/// The hours field is not wrapped at 24. Negative or non-finite input falls
/// back to [`ZERO_TIMESTAMP`] instead of failing; a single bad timestamp
/// must not abort subtitle assembly.
pub fn format_timestamp(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return ZERO_TIMESTAMP.to_string();
    }

    let total_ms = (seconds * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, ms)
}

/// Assemble transcript segments into SRT caption blocks.
///
/// Each segment becomes one block: a 1-based index line, a time-range line,
/// the trimmed text line, and a blank separator. An empty segment list
/// produces an empty string; callers treat that as a failed transcription.
pub fn build_srt(segments: &[TranscriptSegment]) -> String {
    let mut output = String::new();

    for (i, segment) in segments.iter().enumerate() {
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            format_timestamp(segment.start_seconds),
            format_timestamp(segment.end_seconds)
        ));
        output.push_str(segment.text.trim());
        output.push_str("\n\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f64, end: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment::new(start, end, text.to_string())
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_timestamp(61.5), "00:01:01,500");
        assert_eq!(format_timestamp(3661.123), "01:01:01,123");
    }

    #[test]
    fn test_format_timestamp_unbounded_hours() {
        // 100 hours; the hours field widens rather than wrapping
        assert_eq!(format_timestamp(360_000.0), "100:00:00,000");
    }

    #[test]
    fn test_format_timestamp_rounds_to_millisecond() {
        assert_eq!(format_timestamp(1.2345), "00:00:01,235");
        assert_eq!(format_timestamp(0.9996), "00:00:01,000");
    }

    #[test]
    fn test_format_timestamp_invalid_input_falls_back() {
        assert_eq!(format_timestamp(-1.0), ZERO_TIMESTAMP);
        assert_eq!(format_timestamp(f64::NAN), ZERO_TIMESTAMP);
        assert_eq!(format_timestamp(f64::INFINITY), ZERO_TIMESTAMP);
    }

    #[test]
    fn test_build_srt() {
        let srt = build_srt(&[
            segment(0.0, 2.5, " Hello world. "),
            segment(2.5, 5.0, "This is a test."),
        ]);

        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:02,500\nHello world.\n\n\
             2\n00:00:02,500 --> 00:00:05,000\nThis is a test.\n\n"
        );
    }

    #[test]
    fn test_build_srt_contiguous_indices() {
        let segments: Vec<TranscriptSegment> = (0..5)
            .map(|i| segment(i as f64, i as f64 + 1.0, "text"))
            .collect();
        let srt = build_srt(&segments);

        for (i, block) in srt.split("\n\n").filter(|b| !b.is_empty()).enumerate() {
            let index_line = block.lines().next().unwrap();
            assert_eq!(index_line, (i + 1).to_string());
        }
        assert_eq!(srt.split("\n\n").filter(|b| !b.is_empty()).count(), 5);
    }

    #[test]
    fn test_build_srt_empty() {
        assert_eq!(build_srt(&[]), "");
    }
}
