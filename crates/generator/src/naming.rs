//! Identifier canonicalization for generated TypeScript

use convert_case::{Case, Casing};

const NAMESPACE_SEPARATOR: &str = "::";
const MODULE_SUFFIX: &str = "MODULE";

/// Class name for a registry type name
///
/// The last `::` segment is used, except for modules where the segment
/// before `MODULE` is kept with a `Module` suffix.
pub fn sanitize_type_name(type_name: &str) -> String {
    let segments: Vec<&str> = type_name.split(NAMESPACE_SEPARATOR).collect();
    match segments.as_slice() {
        [.., previous, last] if *last == MODULE_SUFFIX => {
            format!("{}Module", pascal_case(previous))
        }
        [.., last] => pascal_case(last),
        [] => String::new(),
    }
}

/// Field name for a schema property
pub fn field_name(property: &str) -> String {
    property.to_case(Case::Camel)
}

/// Attribute field name for a read-only schema property
pub fn attribute_field_name(property: &str) -> String {
    format!("attr{}", pascal_case(property))
}

pub fn pascal_case(value: &str) -> String {
    value.to_case(Case::Pascal)
}

/// Kebab case with any non-alphanumeric (including `::`) as a word break
pub fn kebab_case(value: &str) -> String {
    words(value).to_case(Case::Kebab)
}

/// Snake case with any non-alphanumeric (including `::`) as a word break
pub fn snake_case(value: &str) -> String {
    words(value).to_case(Case::Snake)
}

/// Class name for a catalog product
pub fn product_class_name(product_name: &str) -> String {
    pascal_case(&words(product_name))
}

fn words(value: &str) -> String {
    let spaced: String = value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
