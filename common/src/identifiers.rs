use std::fmt;

/// Name a player is saved under in the progress store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerName(String);

impl PlayerName {
    pub const MAX_LEN: usize = 50;

    /// Trims surrounding whitespace; rejects empty and over-long names.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("player name must not be empty".to_string());
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(format!("player name must be at most {} characters", Self::MAX_LEN));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let name = PlayerName::parse("  alice ").unwrap();
        assert_eq!(name.as_str(), "alice");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!(PlayerName::parse("   ").is_err());
    }

    #[test]
    fn test_parse_rejects_long() {
        let long = "x".repeat(PlayerName::MAX_LEN + 1);
        assert!(PlayerName::parse(&long).is_err());
    }
}
