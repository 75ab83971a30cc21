//! Word tables for the surface grammar
//!
//! Keywords, particles, named properties, and the numeric literal pattern.
//! These are fixed data consulted by the classifiers; the grammar itself
//! lives in [crate::kotoba::grammar].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::kotoba::conjugator;
use crate::kotoba::tokens::TokenSub;

/// Particles that mark function arguments. Suffix splitting always takes
/// the longest match, so `から` wins over a shorter particle.
pub const FUNCTION_PARTICLES: &[&str] = &["から", "まで", "で", "と", "に", "へ", "を"];

/// Particle marking an assignment target.
pub const ASSIGNMENT_PARTICLE: &str = "は";

/// Particle marking a comparison subject.
pub const SUBJECT_PARTICLE: &str = "が";

/// Particle marking a property/attribute owner.
pub const POSSESSIVE_PARTICLE: &str = "の";

/// Named properties and their subtypes. Matched by full stem, so order is
/// not significant.
pub const PROPERTIES: &[(&str, TokenSub)] = &[
    ("長さ", TokenSub::PropLen),
    ("キー列", TokenSub::PropKeys),
    ("先頭以外", TokenSub::PropButFirst),
    ("末尾以外", TokenSub::PropButLast),
    ("先頭", TokenSub::PropFirst),
    ("末尾", TokenSub::PropLast),
];

/// Every particle the grammar recognizes, for deciding whether a bare word
/// could still be a phrase with a role marker attached.
pub static ALL_PARTICLES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut particles = FUNCTION_PARTICLES.to_vec();
    particles.extend([ASSIGNMENT_PARTICLE, SUBJECT_PARTICLE, POSSESSIVE_PARTICLE, "より"]);
    particles
});

// Comparator surfaces. The conditional forms close an if/else-if
// condition; the continuative forms close a while condition.
pub const COMP_EQ_IF: &[&str] = &["等しければ", "等しくなければ"];
pub const COMP_EQ_WHILE: &[&str] = &["等しい限り", "等しくない限り"];
pub const COMP_SIZE_IF: &[&str] = &["大きければ", "小さければ"];
pub const COMP_SIZE_WHILE: &[&str] = &["大きい限り", "小さい限り"];
pub const COMP_BE_IF: &[&str] = &["であれば"];
pub const COMP_BE_WHILE: &[&str] = &["である限り"];
pub const COMP_EXISTS_IF: &[&str] = &["あれば", "なければ"];
pub const COMP_EXISTS_WHILE: &[&str] = &["ある限り", "ない限り"];

/// Suffixes marking a bounded comparison operand.
pub const BOUND_UPPER_SUFFIX: &str = "以上";
pub const BOUND_LOWER_SUFFIX: &str = "以下";

pub const NO_OP_WORDS: &[&str] = &["・・・", "…"];
pub const DEBUG_WORD: &str = "デバッグ";
pub const BREAK_WORD: &str = "終わり";
pub const NEXT_WORD: &str = "次";
pub const IF_WORD: &str = "もし";
pub const ELSE_IF_WORDS: &[&str] = &["もしくは", "または"];
pub const ELSE_WORDS: &[&str] = &["それ以外", "それ以外は", "違えば"];
pub const ITERATOR_WORD: &str = "対して";

const RETURN_DICTIONARY: &[&str] = &["返す", "返る", "戻る"];
const LOOP_DICTIONARY: &str = "繰り返す";
const TRY_DICTIONARY: &str = "試す";

/// Every surface form (dictionary plus conjugations) of the return verbs.
pub static RETURN_WORDS: Lazy<Vec<String>> = Lazy::new(|| {
    RETURN_DICTIONARY
        .iter()
        .flat_map(|word| conjugator::surface_forms(word))
        .collect()
});

/// Every surface form of the loop verb.
pub static LOOP_WORDS: Lazy<Vec<String>> =
    Lazy::new(|| conjugator::surface_forms(LOOP_DICTIONARY));

/// Every surface form of the try verb.
pub static TRY_WORDS: Lazy<Vec<String>> = Lazy::new(|| conjugator::surface_forms(TRY_DICTIONARY));

/// Numeric literals: optional sign, digits, optional decimal part, in
/// half- or full-width digits.
pub static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-−]?[0-9０-９]+([.．][0-9０-９]+)?$").unwrap());

/// Words that may never name a variable, parameter, or function.
pub static RESERVED: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut words = vec![
        DEBUG_WORD,
        BREAK_WORD,
        NEXT_WORD,
        IF_WORD,
        ITERATOR_WORD,
        LOOP_DICTIONARY,
        TRY_DICTIONARY,
        "返す",
        "返る",
        "戻る",
        "とは",
        "限り",
        "真",
        "偽",
        "はい",
        "いいえ",
        "無",
        "配列",
        "それ",
    ];
    words.extend_from_slice(NO_OP_WORDS);
    words.extend_from_slice(ELSE_IF_WORDS);
    words.extend_from_slice(ELSE_WORDS);
    words
});

pub fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

pub fn is_number(word: &str) -> bool {
    NUMBER.is_match(word)
}

/// Classify a bare word as a value keyword or number. Declared-variable
/// resolution is the caller's job; this only covers literals.
pub fn value_sub(word: &str) -> Option<TokenSub> {
    if is_number(word) {
        return Some(TokenSub::ValNum);
    }
    match word {
        "真" | "はい" => Some(TokenSub::ValTrue),
        "偽" | "いいえ" => Some(TokenSub::ValFalse),
        "無" => Some(TokenSub::ValNull),
        "配列" => Some(TokenSub::ValArray),
        "それ" => Some(TokenSub::ValSore),
        _ => None,
    }
}

/// Look up a named property stem.
pub fn property_sub(word: &str) -> Option<TokenSub> {
    PROPERTIES
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, sub)| *sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_pattern() {
        assert!(is_number("10"));
        assert!(is_number("-3"));
        assert!(is_number("10.5"));
        assert!(is_number("１０．５"));
        assert!(is_number("−４２"));
        assert!(!is_number("10."));
        assert!(!is_number("ほげ"));
        assert!(!is_number(""));
    }

    #[test]
    fn test_value_keywords() {
        assert_eq!(value_sub("真"), Some(TokenSub::ValTrue));
        assert_eq!(value_sub("いいえ"), Some(TokenSub::ValFalse));
        assert_eq!(value_sub("無"), Some(TokenSub::ValNull));
        assert_eq!(value_sub("それ"), Some(TokenSub::ValSore));
        assert_eq!(value_sub("ほげ"), None);
    }

    #[test]
    fn test_reserved_words() {
        assert!(is_reserved("もし"));
        assert!(is_reserved("繰り返す"));
        assert!(is_reserved("それ以外"));
        assert!(is_reserved("真"));
        assert!(!is_reserved("ほげ"));
    }

    #[test]
    fn test_return_words_include_conjugations() {
        assert!(RETURN_WORDS.iter().any(|w| w == "返す"));
        assert!(RETURN_WORDS.iter().any(|w| w == "返して"));
        assert!(RETURN_WORDS.iter().any(|w| w == "戻って"));
    }

    #[test]
    fn test_property_lookup() {
        assert_eq!(property_sub("長さ"), Some(TokenSub::PropLen));
        assert_eq!(property_sub("先頭以外"), Some(TokenSub::PropButFirst));
        assert_eq!(property_sub("中身"), None);
    }
}
