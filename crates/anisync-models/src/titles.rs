use serde::{Deserialize, Serialize};

/// The set of titles a catalog knows a work by. Any of them may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Titles {
    pub english: String,
    /// Native (usually Japanese) title
    pub native: String,
    pub romanized: String,
}

impl Titles {
    pub fn new(english: impl Into<String>, native: impl Into<String>, romanized: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            native: native.into(),
            romanized: romanized.into(),
        }
    }

    /// Title used for searching and logging: English, else native, else romanized
    pub fn display(&self) -> &str {
        if !self.english.is_empty() {
            return &self.english;
        }
        if !self.native.is_empty() {
            return &self.native;
        }
        &self.romanized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_precedence() {
        assert_eq!(Titles::new("Frieren", "葬送のフリーレン", "Sousou no Frieren").display(), "Frieren");
        assert_eq!(Titles::new("", "葬送のフリーレン", "Sousou no Frieren").display(), "葬送のフリーレン");
        assert_eq!(Titles::new("", "", "Sousou no Frieren").display(), "Sousou no Frieren");
        assert_eq!(Titles::default().display(), "");
    }
}
