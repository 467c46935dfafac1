//! Identifier conversions for generated file and class names.

use regex::Regex;
use std::sync::LazyLock;

static CAMEL_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid camel word regex"));
static DOUBLE_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([A-Z])").expect("valid underscore regex"));
static LOWER_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid case boundary regex"));

const FALLBACK_CLASS_NAME: &str = "RpgProgram";

/// `UserProfileCard` -> `user-profile-card`
///
/// Word boundaries are inserted before capitalised words and at lower/upper
/// transitions, then the whole string is lowercased. Acronym runs stay
/// together (`HTTPServer` -> `http-server`).
pub fn to_kebab_case(name: &str) -> String {
    let step = CAMEL_WORD.replace_all(name, "${1}-${2}");
    let step = DOUBLE_UNDERSCORE.replace_all(&step, "-${1}");
    let step = LOWER_UPPER.replace_all(&step, "${1}-${2}");
    step.to_lowercase()
}

/// Title-case one word: uppercase each letter that follows a non-letter,
/// lowercase the rest (`order2go` -> `Order2Go`).
fn title_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev_alpha = false;
    for c in word.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

fn pascal_from_underscored(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(title_word)
        .collect()
}

/// Java class stem for a converted program.
///
/// Built from the program name (`ORDER_ENTRY` -> `OrderEntry`), falling back
/// to the file name up to its first dot. Names that would not start with a
/// letter get an `R` prefix.
pub fn java_base_name(program_name: &str, filename: &str) -> String {
    let mut base = pascal_from_underscored(program_name);
    if base.is_empty() {
        let stem = filename.split('.').next().unwrap_or_default();
        base = pascal_from_underscored(stem);
    }

    match base.chars().next() {
        None => FALLBACK_CLASS_NAME.to_string(),
        Some(c) if !c.is_alphabetic() => format!("R{base}"),
        Some(_) => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(to_kebab_case("UserProfile"), "user-profile");
        assert_eq!(to_kebab_case("UserProfileCard"), "user-profile-card");
        assert_eq!(to_kebab_case("MyExampleComponent"), "my-example-component");
        assert_eq!(to_kebab_case("HTTPServer"), "http-server");
        assert_eq!(to_kebab_case("getHTTPResponse2Code"), "get-http-response2-code");
        assert_eq!(to_kebab_case("already-kebab"), "already-kebab");
        assert_eq!(to_kebab_case(""), "");
    }

    #[test]
    fn test_java_base_name_from_program() {
        assert_eq!(java_base_name("ORDER_ENTRY", "x.rpgle"), "OrderEntry");
        assert_eq!(java_base_name("CUSTMAINT", "x.rpgle"), "Custmaint");
        assert_eq!(java_base_name("__a__b", "x.rpgle"), "AB");
    }

    #[test]
    fn test_java_base_name_fallbacks() {
        assert_eq!(java_base_name("", "inv_upd.rpgle"), "InvUpd");
        assert_eq!(java_base_name("___", "a.b.c"), "A");
        assert_eq!(java_base_name("", ""), "RpgProgram");
        assert_eq!(java_base_name("", ".rpgle"), "RpgProgram");
        assert_eq!(java_base_name("2FAST", "x"), "R2Fast");
    }

    proptest! {
        #[test]
        fn prop_kebab_case_is_idempotent(name in "[A-Za-z0-9_]{0,24}") {
            let once = to_kebab_case(&name);
            prop_assert_eq!(to_kebab_case(&once), once.clone());
            prop_assert!(!once.chars().any(|c| c.is_uppercase()));
        }

        #[test]
        fn prop_java_base_name_is_a_class_name(
            program in "[A-Za-z0-9_]{0,16}",
            file in "[A-Za-z0-9_.]{0,16}",
        ) {
            let name = java_base_name(&program, &file);
            prop_assert!(name.chars().next().is_some_and(|c| c.is_ascii_uppercase()));
            prop_assert!(!name.contains('_'));
        }
    }
}
