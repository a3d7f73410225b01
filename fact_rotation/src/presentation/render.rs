//! Plain-text rendering of facts.

use fact_catalog::Fact;

/// The one-line notification, e.g. `Python Fun Fact: Title - summary`.
pub fn notification_text(label: &str, fact: &Fact) -> String {
    if label.is_empty() {
        format!("{} - {}", fact.title, fact.short_description)
    } else {
        format!("{}: {} - {}", label, fact.title, fact.short_description)
    }
}

/// The detail view as Markdown.
///
/// Examples and links sections only appear when the fact has any.
pub fn detail_text(fact: &Fact) -> String {
    let mut text = String::new();

    text.push_str(&format!("# {}\n\n", fact.title));
    text.push_str(&format!("{}\n", fact.detailed_description));

    if fact.has_examples() {
        text.push_str("\n## Examples\n\n```python\n");
        text.push_str(&fact.examples.join("\n"));
        text.push_str("\n```\n");
    }

    if fact.has_links() {
        text.push_str("\n## Learn More\n\n");
        for link in &fact.links {
            text.push_str(&format!("- [{}]({})\n", link.title, link.url));
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_text() {
        let fact = Fact::new("gil", "The GIL").with_short_description("One thread at a time");
        assert_eq!(
            notification_text("Python Fun Fact", &fact),
            "Python Fun Fact: The GIL - One thread at a time"
        );
        assert_eq!(notification_text("", &fact), "The GIL - One thread at a time");
    }

    #[test]
    fn test_detail_text_with_all_sections() {
        let fact = Fact::new("walrus", "Walrus")
            .with_detailed_description("Assignment expressions.")
            .with_example("if (n := 10) > 5:")
            .with_example("    print(n)")
            .with_link("PEP 572", "https://peps.python.org/pep-0572/");

        let text = detail_text(&fact);

        assert!(text.starts_with("# Walrus\n\nAssignment expressions.\n"));
        assert!(text.contains("```python\nif (n := 10) > 5:\n    print(n)\n```"));
        assert!(text.contains("- [PEP 572](https://peps.python.org/pep-0572/)"));
    }

    #[test]
    fn test_detail_text_omits_empty_sections() {
        let fact = Fact::new("plain", "Plain").with_detailed_description("Nothing else.");
        let text = detail_text(&fact);

        assert!(!text.contains("Examples"));
        assert!(!text.contains("Learn More"));
    }
}
