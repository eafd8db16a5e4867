//! Question text and answer normalisation shared by both commands.

use questionnaire::{FieldDescriptor, FieldKind};

/// Non-blank options of a choice field, in catalog order.
fn options(field: &FieldDescriptor) -> impl Iterator<Item = &'static str> {
    field.kind.choices().iter().copied().filter(|o| !o.is_empty())
}

/// Question as shown to the user, with numbered options for choice fields.
pub fn question_text(field: &FieldDescriptor) -> String {
    let mut text = field.prompt.to_string();

    match field.kind {
        FieldKind::Choice(_) => {
            for (i, option) in options(field).enumerate() {
                text.push_str(&format!("\n  {}) {}", i + 1, option));
            }
        }
        FieldKind::Numeric => text.push_str(" (number)"),
        _ => {}
    }

    text
}

/// Map a typed answer onto the stored value.
///
/// Choice fields accept an option number; anything else is kept verbatim.
/// Surrounding whitespace is dropped.
pub fn resolve_answer(field: &FieldDescriptor, raw: &str) -> String {
    let trimmed = raw.trim();

    if let FieldKind::Choice(_) = field.kind {
        if let Ok(n) = trimmed.parse::<usize>() {
            if let Some(option) = n.checked_sub(1).and_then(|i| options(field).nth(i)) {
                return option.to_string();
            }
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use questionnaire::Catalog;

    #[test]
    fn test_choice_question_lists_options() {
        let catalog = Catalog::marketing();
        let text = question_text(catalog.field("audienceAgeRange").unwrap());

        assert!(text.starts_with("What is the age range of your target audience?"));
        assert!(text.contains("\n  1) 18-24"));
        assert!(text.ends_with("\n  6) 65+"));
    }

    #[test]
    fn test_resolve_choice_by_number_or_text() {
        let catalog = Catalog::marketing();
        let industry = catalog.field("industry").unwrap();

        assert_eq!(resolve_answer(industry, "2"), "Health & Wellness");
        assert_eq!(resolve_answer(industry, " Bakery "), "Bakery");
        assert_eq!(resolve_answer(industry, "0"), "0");
        assert_eq!(resolve_answer(industry, "99"), "99");
    }

    #[test]
    fn test_numbers_on_other_fields_are_kept() {
        let catalog = Catalog::marketing();
        assert_eq!(resolve_answer(catalog.field("budget").unwrap(), " 1500 "), "1500");
        assert!(question_text(catalog.field("budget").unwrap()).ends_with("(number)"));
    }
}
