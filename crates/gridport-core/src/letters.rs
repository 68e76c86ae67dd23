//! Column letter conversions (A = 0, Z = 25, AA = 26, ...)

use crate::error::{Error, Result};

/// Convert column letters to a 0-based index
pub fn letters_to_index(letters: &str) -> Result<usize> {
    let letters = letters.trim();
    if letters.is_empty() {
        return Err(Error::Configuration("empty column letters".into()));
    }

    let mut col: usize = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::Configuration(format!(
                "invalid column letter '{}' in '{}'",
                c, letters
            )));
        }
        col = col * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }

    Ok(col - 1)
}

/// Convert a 0-based column index to letters
pub fn index_to_letters(index: usize) -> String {
    let mut result = String::new();
    let mut n = index + 1;

    while n > 0 {
        n -= 1;
        let c = ((n % 26) as u8 + b'A') as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_round_trip() {
        assert_eq!(letters_to_index("A").unwrap(), 0);
        assert_eq!(letters_to_index("Z").unwrap(), 25);
        assert_eq!(letters_to_index("AA").unwrap(), 26);
        assert_eq!(letters_to_index("ab").unwrap(), 27);

        assert_eq!(index_to_letters(0), "A");
        assert_eq!(index_to_letters(25), "Z");
        assert_eq!(index_to_letters(26), "AA");
        assert_eq!(index_to_letters(27), "AB");
    }

    #[test]
    fn test_invalid_letters() {
        assert!(letters_to_index("").is_err());
        assert!(letters_to_index("A1").is_err());
    }
}
