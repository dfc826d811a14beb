//! Naming utilities shared across model and method synthesis.
//!
//! Word splitting follows the usual identifier conventions: separators are
//! dropped, and boundaries fall between lower and upper case letters, at the
//! end of an acronym, and between letters and digits.

/// Reserved-word configuration for one target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingRules {
    /// Identifiers that must be back-quoted (properties, enum cases).
    pub reserved_identifiers: &'static [&'static str],
    /// Class names that would clash with language or runtime types.
    pub reserved_class_names: &'static [&'static str],
}

impl Default for NamingRules {
    fn default() -> Self {
        Self {
            reserved_identifiers: &["default", "internal", "as"],
            reserved_class_names: &["Type", "Error", "ErrorResponse"],
        }
    }
}

impl NamingRules {
    /// Make a name usable as an identifier: no leading digit, no reserved word.
    pub fn escape(&self, name: &str) -> String {
        let escaped = if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            format!("_{name}")
        } else {
            name.to_string()
        };
        if self.reserved_identifiers.contains(&escaped.as_str()) {
            format!("`{escaped}`")
        } else {
            escaped
        }
    }

    /// camelCase (or snake_case) identifier from path-like components.
    pub fn identifier(&self, components: &[&str], snake: bool) -> String {
        let joined = components.join("/");
        let name = if snake {
            snake_case(&joined)
        } else {
            camel_case(&joined)
        };
        self.escape(&name)
    }

    /// UPPER_SNAKE identifier, used for enum cases.
    pub fn enum_case_name(&self, components: &[&str]) -> String {
        self.escape(&upper_snake_case(&components.join("/")))
    }

    /// Class name from components, skipping the first `skip` of them.
    ///
    /// If skipping lands on a reserved class name the full component list is
    /// used instead; a reserved name without skipping gets a `_` suffix.
    pub fn class_name(&self, components: &[&str], skip: usize) -> String {
        let skipped = &components[skip.min(components.len())..];
        let name = capitalize_first(&self.identifier(skipped, false));
        if self.reserved_class_names.contains(&name.as_str()) {
            if skip > 0 {
                return self.class_name(components, 0);
            }
            return format!("{name}_");
        }
        name
    }

    /// Class name of the schema a `$ref` points at.
    pub fn class_name_from_ref(&self, reference: &str) -> String {
        self.class_name(&[last_ref_component(reference)], 0)
    }
}

/// Split a string into words.
pub fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some(prev) = current.chars().last() {
            let acronym_end = prev.is_uppercase()
                && c.is_uppercase()
                && chars.get(i + 1).is_some_and(|next| next.is_lowercase());
            let boundary = prev.is_numeric() != c.is_numeric()
                || (prev.is_lowercase() && c.is_uppercase())
                || acronym_end;
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

pub fn camel_case(input: &str) -> String {
    split_words(input)
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i == 0 {
                lower
            } else {
                capitalize_first(&lower)
            }
        })
        .collect()
}

pub fn snake_case(input: &str) -> String {
    split_words(input)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn upper_snake_case(input: &str) -> String {
    split_words(input)
        .iter()
        .map(|word| word.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Last segment of a `$ref` pointer (`#/definitions/Pet` -> `Pet`).
pub fn last_ref_component(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Join URL fragments with single slashes, keeping a leading slash if the first fragment has one.
pub fn join_url(parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .flat_map(|part| part.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if parts.first().is_some_and(|p| p.starts_with('/')) {
        format!("/{joined}")
    } else {
        joined
    }
}
