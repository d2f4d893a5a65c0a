//! Data models for transcription.

use serde::{Deserialize, Serialize};

/// One timed segment of transcribed speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds.
    pub start_seconds: f64,
    /// End time in seconds.
    pub end_seconds: f64,
    /// Transcribed text.
    pub text: String,
}

impl TranscriptSegment {
    /// Create a new segment.
    pub fn new(start_seconds: f64, end_seconds: f64, text: String) -> Self {
        Self {
            start_seconds,
            end_seconds,
            text,
        }
    }
}

/// A complete transcript: ordered segments plus total duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Individual transcript segments in playback order.
    pub segments: Vec<TranscriptSegment>,
    /// Total duration in seconds.
    pub duration_seconds: f64,
}

impl Transcript {
    /// Create a new transcript from segments.
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        let duration_seconds = segments.last().map(|s| s.end_seconds).unwrap_or(0.0);

        Self {
            segments,
            duration_seconds,
        }
    }

    /// Whether the transcript carries no usable speech.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_duration() {
        let transcript = Transcript::new(vec![
            TranscriptSegment::new(0.0, 2.0, "a".to_string()),
            TranscriptSegment::new(2.0, 7.5, "b".to_string()),
        ]);
        assert_eq!(transcript.duration_seconds, 7.5);
        assert!(!transcript.is_empty());
    }

    #[test]
    fn test_empty_transcript() {
        let transcript = Transcript::new(vec![]);
        assert_eq!(transcript.duration_seconds, 0.0);
        assert!(transcript.is_empty());
    }
}
