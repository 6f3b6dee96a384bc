//! Identifier case conversion and table-name derivation

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

/// `OrderItem` / `orderItem` -> `order_item`
pub fn to_snake_case(identifier: &str) -> String {
    identifier.to_snake_case()
}

/// `order_item` -> `orderItem`
pub fn to_camel_case(identifier: &str) -> String {
    identifier.to_lower_camel_case()
}

/// `order_item` -> `OrderItem`
pub fn to_pascal_case(identifier: &str) -> String {
    identifier.to_upper_camel_case()
}

/// Naive English plural: `y` -> `ies`, append `s` unless already ending in `s`.
///
/// Irregular nouns are not special-cased (`Person` -> `persons`, `Bus` -> `bus`).
pub fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        format!("{stem}ies")
    } else if word.ends_with('s') {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// Table name for a class without an explicit override
pub fn derive_table_name(class_name: &str) -> String {
    pluralize(&to_snake_case(class_name))
}
