//! Recitation audio: locating the per-verse files and driving a single
//! playback slot over an external backend.

mod backend;
mod player;

pub use backend::{
    AudioBackend, CommandBackend, ConfiguredBackend, PlaybackError, PlaybackHandle,
    SystemOpenBackend,
};
pub use player::{PlaybackState, Player};

/// Base of the per-verse recitation files (128 kbps, Mishary Alafasy).
pub const AUDIO_BASE_URL: &str = "https://cdn.islamic.network/quran/audio/128/ar.alafasy";

/// URL of the recitation for a corpus-wide verse number. The number is not
/// range checked; the remote side rejects unknown verses.
pub fn audio_url(global_verse_number: u32) -> String {
    format!("{AUDIO_BASE_URL}/{global_verse_number}.mp3")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_interpolates_global_number() {
        assert_eq!(
            audio_url(12345),
            "https://cdn.islamic.network/quran/audio/128/ar.alafasy/12345.mp3"
        );
        assert_eq!(
            audio_url(0),
            "https://cdn.islamic.network/quran/audio/128/ar.alafasy/0.mp3"
        );
    }
}
