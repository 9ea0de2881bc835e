//! Quiz subject table
//!
//! Subjects per school level. Senior high (SMA) students get the common core
//! plus the list of their elective track.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::database::Level;

/// Quiz subject with its suggested topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    /// Default topic offered for a quiz
    pub topic: &'static str,
}

const fn subject(id: &'static str, name: &'static str, icon: &'static str, topic: &'static str) -> Subject {
    Subject { id, name, icon, topic }
}

const SD: &[Subject] = &[
    subject("matematika", "Matematika", "📐", "Hitungan Dasar"),
    subject("ipa", "IPA (Sains)", "🌱", "Alam & Makhluk Hidup"),
    subject("bing", "B. Inggris", "💬", "Vocabulary & Grammar"),
    subject("bindo", "B. Indonesia", "📚", "Membaca & Menulis"),
    subject("pkn", "PPKn", "🤝", "Pancasila & Moral"),
];

const SMP: &[Subject] = &[
    subject("matematika", "Matematika", "📐", "Aljabar & Geometri"),
    subject("ipa", "IPA Terpadu", "🔬", "Fisika & Biologi Dasar"),
    subject("ips", "IPS Terpadu", "🌍", "Sejarah & Geografi"),
    subject("bing", "B. Inggris", "💬", "Grammar & Text"),
    subject("bindo", "B. Indonesia", "📚", "Tata Bahasa"),
    subject("pkn", "PPKn", "⚖️", "Hukum & Kewarganegaraan"),
];

const SMA_CORE: &[Subject] = &[
    subject("mtk_wajib", "Matematika Wajib", "📊", "Logika & Fungsi"),
    subject("bing", "B. Inggris", "🗣️", "General English"),
    subject("bindo", "B. Indonesia", "📚", "Analisis Teks"),
    subject("pkn", "PPKn", "🏛️", "Sistem Pemerintahan"),
];

const SMA_MIPA: &[Subject] = &[
    subject("fisika", "Fisika", "⚡", "Mekanika & Listrik"),
    subject("kimia", "Kimia", "🧪", "Zat & Reaksi"),
    subject("biologi", "Biologi", "🧬", "Sel & Ekosistem"),
    subject("mtk_minat", "Matematika Peminatan", "📈", "Kalkulus & Vektor"),
];

const SMA_IPS: &[Subject] = &[
    subject("ekonomi", "Ekonomi", "💰", "Pasar & Akuntansi"),
    subject("sosiologi", "Sosiologi", "👥", "Masyarakat & Interaksi"),
    subject("geografi", "Geografi", "🌋", "Bumi & Lingkungan"),
    subject("sejarah", "Sejarah Peminatan", "📜", "Sejarah Dunia"),
];

const SMA_BAHASA: &[Subject] = &[
    subject("sastra", "Sastra Indonesia", "🎭", "Puisi & Prosa"),
    subject("antropologi", "Antropologi", "🗿", "Budaya Manusia"),
    subject("asing", "Bahasa Asing", "🎌", "Dasar Bahasa Asing"),
];

/// Senior high elective track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SmaTrack {
    /// Natural sciences
    #[default]
    Mipa,
    /// Social sciences
    Ips,
    /// Languages
    Bahasa,
}

impl SmaTrack {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmaTrack::Mipa => "MIPA",
            SmaTrack::Ips => "IPS",
            SmaTrack::Bahasa => "BAHASA",
        }
    }

    fn subjects(&self) -> &'static [Subject] {
        match self {
            SmaTrack::Mipa => SMA_MIPA,
            SmaTrack::Ips => SMA_IPS,
            SmaTrack::Bahasa => SMA_BAHASA,
        }
    }
}

impl fmt::Display for SmaTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SmaTrack {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MIPA" | "IPA" => Ok(SmaTrack::Mipa),
            "IPS" => Ok(SmaTrack::Ips),
            "BAHASA" => Ok(SmaTrack::Bahasa),
            other => Err(format!("Unknown track: {}", other)),
        }
    }
}

/// Subjects offered at a level
///
/// SMA combines the common core with the track list (MIPA when no track is
/// given); levels without a table of their own get the SD list.
pub fn list_subjects(level: Level, track: Option<SmaTrack>) -> Vec<Subject> {
    match level {
        Level::Sd => SD.to_vec(),
        Level::Smp => SMP.to_vec(),
        Level::Sma => SMA_CORE
            .iter()
            .chain(track.unwrap_or_default().subjects())
            .copied()
            .collect(),
        Level::Mahasiswa => SD.to_vec(),
    }
}

/// Find a subject by id or display name
pub fn find_subject(level: Level, track: Option<SmaTrack>, key: &str) -> Option<Subject> {
    list_subjects(level, track)
        .into_iter()
        .find(|s| s.id == key || s.name == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(subjects: &[Subject]) -> Vec<&str> {
        subjects.iter().map(|s| s.name).collect()
    }

    #[test]
    fn test_sd_and_smp() {
        assert_eq!(list_subjects(Level::Sd, None).len(), 5);
        let smp = list_subjects(Level::Smp, Some(SmaTrack::Ips));
        assert_eq!(smp.len(), 6);
        assert!(names(&smp).contains(&"IPS Terpadu"));
    }

    #[test]
    fn test_sma_is_core_plus_track() {
        let mipa = list_subjects(Level::Sma, None);
        assert_eq!(mipa.len(), 8);
        assert_eq!(mipa[0].name, "Matematika Wajib");
        assert!(names(&mipa).contains(&"Fisika"));

        let bahasa = list_subjects(Level::Sma, Some(SmaTrack::Bahasa));
        assert_eq!(bahasa.len(), 7);
        assert!(names(&bahasa).contains(&"Antropologi"));
        assert!(!names(&bahasa).contains(&"Fisika"));
    }

    #[test]
    fn test_other_levels_fall_back_to_sd() {
        assert_eq!(list_subjects(Level::Mahasiswa, None), list_subjects(Level::Sd, None));
    }

    #[test]
    fn test_find_subject() {
        let s = find_subject(Level::Sma, Some(SmaTrack::Ips), "ekonomi").unwrap();
        assert_eq!(s.topic, "Pasar & Akuntansi");
        assert!(find_subject(Level::Sma, Some(SmaTrack::Ips), "Fisika").is_none());
        assert!(find_subject(Level::Sd, None, "Matematika").is_some());
    }

    #[test]
    fn test_track_parsing() {
        assert_eq!("mipa".parse::<SmaTrack>().unwrap(), SmaTrack::Mipa);
        assert_eq!("IPS".parse::<SmaTrack>().unwrap(), SmaTrack::Ips);
        assert!("teknik".parse::<SmaTrack>().is_err());
        assert_eq!(SmaTrack::default().to_string(), "MIPA");
    }
}
