//! Verb conjugation rules
//!
//! A pure rule engine over dictionary-form verb endings. Used when a
//! function is declared (to register every callable spelling) and when a
//! call-site chunk is recognized. No shared state.
//!
//! Resolution order (important for correctness):
//! 1. Irregular compound suffixes (`〜する`, `〜行く`, `〜来る`, `〜くる`)
//! 2. The regular rule for the nine verb endings
//!
//! The `る` ending is ambiguous between the two regular conjugation
//! patterns, so it yields both.

/// Inflections of one dictionary form: the continuative て-form(s) and the
/// past た-form(s). Ambiguous endings carry two of each.
#[derive(Debug, Clone, PartialEq)]
pub struct Inflections {
    pub continuative: Vec<String>,
    pub past: Vec<String>,
}

const VERB_ENDINGS: &[char] = &['う', 'く', 'ぐ', 'す', 'つ', 'ぬ', 'ぶ', 'む', 'る'];

/// Irregular compound suffixes, replaced wholesale. Checked before the
/// ending-based rule.
const IRREGULAR: &[(&str, &str, &str)] = &[
    ("する", "して", "した"),
    ("行く", "行って", "行った"),
    ("来る", "来て", "来た"),
    ("くる", "きて", "きた"),
];

/// Whether a word is verb-shaped: non-empty stem plus one of the nine
/// dictionary endings.
pub fn is_verb(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next_back() {
        Some(last) => VERB_ENDINGS.contains(&last) && chars.next_back().is_some(),
        None => false,
    }
}

/// Produce the inflection set of a dictionary-form verb, or `None` when the
/// word is not verb-shaped.
pub fn inflect(word: &str) -> Option<Inflections> {
    for (suffix, te, ta) in IRREGULAR {
        if let Some(stem) = word.strip_suffix(suffix) {
            return Some(Inflections {
                continuative: vec![format!("{}{}", stem, te)],
                past: vec![format!("{}{}", stem, ta)],
            });
        }
    }

    if !is_verb(word) {
        return None;
    }

    let last = word.chars().next_back().unwrap();
    let stem: String = {
        let mut chars = word.chars();
        chars.next_back();
        chars.collect()
    };

    let (te, ta): (Vec<String>, Vec<String>) = match last {
        'う' | 'つ' => (vec![format!("{}って", stem)], vec![format!("{}った", stem)]),
        'く' => (vec![format!("{}いて", stem)], vec![format!("{}いた", stem)]),
        'ぐ' => (vec![format!("{}いで", stem)], vec![format!("{}いだ", stem)]),
        'す' => (vec![format!("{}して", stem)], vec![format!("{}した", stem)]),
        'ぬ' | 'ぶ' | 'む' => (vec![format!("{}んで", stem)], vec![format!("{}んだ", stem)]),
        'る' => (
            vec![format!("{}って", stem), format!("{}て", stem)],
            vec![format!("{}った", stem), format!("{}た", stem)],
        ),
        _ => unreachable!("ending already checked"),
    };

    Some(Inflections {
        continuative: te,
        past: ta,
    })
}

/// Dictionary form plus every inflected surface form. Empty when the word
/// is not verb-shaped.
pub fn surface_forms(word: &str) -> Vec<String> {
    match inflect(word) {
        Some(inflections) => {
            let mut forms = vec![word.to_string()];
            forms.extend(inflections.continuative);
            forms.extend(inflections.past);
            forms
        }
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("言う", "言って", "言った")]
    #[case("書く", "書いて", "書いた")]
    #[case("泳ぐ", "泳いで", "泳いだ")]
    #[case("足す", "足して", "足した")]
    #[case("持つ", "持って", "持った")]
    #[case("死ぬ", "死んで", "死んだ")]
    #[case("呼ぶ", "呼んで", "呼んだ")]
    #[case("読む", "読んで", "読んだ")]
    fn test_regular_conjugation(#[case] dict: &str, #[case] te: &str, #[case] ta: &str) {
        let inflections = inflect(dict).unwrap();
        assert_eq!(inflections.continuative, vec![te.to_string()]);
        assert_eq!(inflections.past, vec![ta.to_string()]);
    }

    #[test]
    fn test_ru_is_ambiguous() {
        let inflections = inflect("作る").unwrap();
        assert_eq!(inflections.continuative, vec!["作って", "作て"]);
        assert_eq!(inflections.past, vec!["作った", "作た"]);
    }

    #[rstest]
    #[case("表示する", "表示して", "表示した")]
    #[case("追加する", "追加して", "追加した")]
    #[case("持って行く", "持って行って", "持って行った")]
    #[case("出て来る", "出て来て", "出て来た")]
    #[case("もってくる", "もってきて", "もってきた")]
    fn test_irregular_suffixes(#[case] dict: &str, #[case] te: &str, #[case] ta: &str) {
        let inflections = inflect(dict).unwrap();
        assert_eq!(inflections.continuative, vec![te.to_string()]);
        assert_eq!(inflections.past, vec![ta.to_string()]);
    }

    #[test]
    fn test_suru_alone() {
        let inflections = inflect("する").unwrap();
        assert_eq!(inflections.continuative, vec!["して"]);
        assert_eq!(inflections.past, vec!["した"]);
    }

    #[test]
    fn test_not_a_verb() {
        assert!(inflect("ほげ").is_none());
        assert!(inflect("う").is_none());
        assert!(inflect("").is_none());
        assert!(surface_forms("ほげ").is_empty());
    }

    #[test]
    fn test_surface_forms_include_dictionary() {
        let forms = surface_forms("言う");
        assert_eq!(forms, vec!["言う", "言って", "言った"]);
    }

    #[test]
    fn test_is_verb() {
        assert!(is_verb("足す"));
        assert!(is_verb("繰り返す"));
        assert!(!is_verb("ほげ"));
        assert!(!is_verb("す"));
    }
}
