//! Validated input names.

use crate::error::{NameGlowError, Result};

/// Characters dropped from a name before processing. Letters are kept;
/// anything not listed here and not alphabetic makes the name invalid.
const SEPARATORS: [char; 3] = ['-', '\'', '.'];

/// Longest accepted name, counted in letters. Variant search cost grows with
/// length, so anything beyond a plausible full name is rejected up front.
pub const MAX_NAME_LETTERS: usize = 64;

/// A person's name, validated and normalized for letter games.
///
/// `display` keeps the trimmed input as typed. `normalized` is the lowercase
/// letter sequence with whitespace and separators (`-`, `'`, `.`) removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    display: String,
    normalized: String,
}

impl Name {
    /// Validate and normalize a raw name.
    ///
    /// Fails for empty input, for names longer than [`MAX_NAME_LETTERS`]
    /// letters, and for input containing anything that is neither a letter,
    /// whitespace, nor a separator.
    pub fn parse(raw: &str) -> Result<Self> {
        let display = raw.trim();
        if display.is_empty() {
            return Err(NameGlowError::InvalidName("name is empty".into()));
        }

        if let Some(bad) = display
            .chars()
            .find(|c| !(c.is_alphabetic() || c.is_whitespace() || SEPARATORS.contains(c)))
        {
            return Err(NameGlowError::InvalidName(format!(
                "'{display}' contains '{bad}'; only letters, spaces, hyphens, apostrophes and periods are allowed"
            )));
        }

        let normalized: String = display
            .chars()
            .filter(|c| c.is_alphabetic())
            .flat_map(char::to_lowercase)
            .collect();
        if normalized.is_empty() {
            return Err(NameGlowError::InvalidName(format!(
                "'{display}' contains no letters"
            )));
        }
        let letters = normalized.chars().count();
        if letters > MAX_NAME_LETTERS {
            return Err(NameGlowError::InvalidName(format!(
                "name has {letters} letters; at most {MAX_NAME_LETTERS} are allowed"
            )));
        }

        Ok(Self {
            display: display.to_string(),
            normalized,
        })
    }

    /// The trimmed name as the user typed it.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Lowercase letters only.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// The normalized name with its first letter uppercased.
    pub fn capitalized(&self) -> String {
        capitalize(&self.normalized)
    }

    /// The normalized letters in reverse order.
    pub fn reversed(&self) -> String {
        self.normalized.chars().rev().collect()
    }

    /// Number of letters in the normalized name.
    pub fn letter_count(&self) -> usize {
        self.normalized.chars().count()
    }

    /// The first `n` letters of the normalized name (fewer if it is shorter).
    pub fn first_letters(&self, n: usize) -> String {
        self.normalized.chars().take(n).collect()
    }
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let name = Name::parse("  Mary Jane ").unwrap();
        assert_eq!(name.display(), "Mary Jane");
        assert_eq!(name.normalized(), "maryjane");
        assert_eq!(name.capitalized(), "Maryjane");
        assert_eq!(name.letter_count(), 8);
    }

    #[test]
    fn drops_separators() {
        let name = Name::parse("O'Brien-Smith").unwrap();
        assert_eq!(name.normalized(), "obriensmith");
    }

    #[test]
    fn rejects_empty_and_blank() {
        assert!(matches!(Name::parse(""), Err(NameGlowError::InvalidName(_))));
        assert!(matches!(
            Name::parse("   "),
            Err(NameGlowError::InvalidName(_))
        ));
        assert!(matches!(
            Name::parse("-'."),
            Err(NameGlowError::InvalidName(_))
        ));
    }

    #[test]
    fn rejects_non_alphabetic() {
        let err = Name::parse("R2D2").unwrap_err();
        assert!(err.to_string().contains("'2'"));
        assert!(Name::parse("alice@example").is_err());
    }

    #[test]
    fn rejects_overlong_names() {
        let longest = "ab".repeat(MAX_NAME_LETTERS / 2);
        assert_eq!(
            Name::parse(&longest).unwrap().letter_count(),
            MAX_NAME_LETTERS
        );

        let spaced = format!("{longest} -'.");
        assert!(Name::parse(&spaced).is_ok());

        let err = Name::parse(&"ab".repeat(50_000)).unwrap_err();
        assert!(matches!(err, NameGlowError::InvalidName(_)));
        assert!(err.to_string().contains("100000 letters"));
    }

    #[test]
    fn reversed_and_prefix() {
        let name = Name::parse("Al").unwrap();
        assert_eq!(name.reversed(), "la");
        assert_eq!(name.first_letters(3), "al");
        assert_eq!(Name::parse("Sophia").unwrap().first_letters(3), "sop");
    }

    #[test]
    fn capitalize_lowercases_the_tail() {
        assert_eq!(capitalize("mARIA"), "Maria");
        assert_eq!(capitalize(""), "");
    }
}
