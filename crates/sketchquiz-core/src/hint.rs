//! Masked rendering of the secret word.

use serde::{Deserialize, Serialize};

const MASK: char = '_';

/// How much of the word is revealed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HintLevel {
    #[default]
    Hidden,
    FirstLetter,
    FirstAndMiddle,
}

impl HintLevel {
    /// Numeric level, 0 through 2.
    pub fn as_u8(self) -> u8 {
        match self {
            HintLevel::Hidden => 0,
            HintLevel::FirstLetter => 1,
            HintLevel::FirstAndMiddle => 2,
        }
    }

    pub fn raised(self) -> Self {
        match self {
            HintLevel::Hidden => HintLevel::FirstLetter,
            HintLevel::FirstLetter | HintLevel::FirstAndMiddle => HintLevel::FirstAndMiddle,
        }
    }
}

/// Mask `word` one unit per character (not per byte), units separated by a
/// single space.
pub fn mask_word(word: &str, level: HintLevel) -> String {
    let chars: Vec<char> = word.chars().collect();
    let middle = chars.len() / 2;

    let revealed = |i: usize| match level {
        HintLevel::Hidden => false,
        HintLevel::FirstLetter => i == 0,
        HintLevel::FirstAndMiddle => i == 0 || i == middle,
    };

    let mut out = String::with_capacity(chars.len() * 2);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(if revealed(i) { c } else { MASK });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_masks_every_character() {
        assert_eq!(mask_word("apple", HintLevel::Hidden), "_ _ _ _ _");
    }

    #[test]
    fn multibyte_characters_mask_as_one_unit() {
        assert_eq!(mask_word("사과", HintLevel::Hidden), "_ _");
        assert_eq!(mask_word("아이스크림", HintLevel::Hidden), "_ _ _ _ _");
    }

    #[test]
    fn first_letter_level() {
        assert_eq!(mask_word("바나나", HintLevel::FirstLetter), "바 _ _");
        assert_eq!(mask_word("cat", HintLevel::FirstLetter), "c _ _");
    }

    #[test]
    fn first_and_middle_level() {
        assert_eq!(mask_word("컴퓨터", HintLevel::FirstAndMiddle), "컴 퓨 _");
        assert_eq!(mask_word("pizza", HintLevel::FirstAndMiddle), "p _ z _ _");
        assert_eq!(mask_word("bird", HintLevel::FirstAndMiddle), "b _ r _");
    }

    #[test]
    fn single_character_word() {
        assert_eq!(mask_word("책", HintLevel::Hidden), "_");
        assert_eq!(mask_word("책", HintLevel::FirstLetter), "책");
        assert_eq!(mask_word("책", HintLevel::FirstAndMiddle), "책");
    }

    #[test]
    fn empty_word_renders_empty() {
        assert_eq!(mask_word("", HintLevel::FirstAndMiddle), "");
    }

    #[test]
    fn levels_only_go_up() {
        assert_eq!(HintLevel::Hidden.raised(), HintLevel::FirstLetter);
        assert_eq!(HintLevel::FirstLetter.raised(), HintLevel::FirstAndMiddle);
        assert_eq!(HintLevel::FirstAndMiddle.raised(), HintLevel::FirstAndMiddle);
        assert_eq!(HintLevel::FirstAndMiddle.as_u8(), 2);
    }
}
