//! SVG template rendering: placeholder substitution.
//!
//! Templates carry literal `BUTTON_n` placeholders in their text content; each
//! placeholder with a binding is replaced by the binding's label.

use std::collections::BTreeMap;

use quick_xml::escape::escape;

/// Counts from rendering one template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Placeholder occurrences replaced.
    pub replaced: usize,
    /// Bindings whose placeholder did not occur in the template.
    pub unmatched: usize,
}

/// Substitute button placeholders in `svg` with their labels.
///
/// Labels are XML-escaped before insertion. Keys are applied longest first so
/// `BUTTON_1` never clobbers part of `BUTTON_12`.
#[must_use]
pub fn render(svg: &str, buttons: &BTreeMap<String, String>) -> (String, RenderStats) {
    let mut keys: Vec<&String> = buttons.keys().collect();
    keys.sort_by_key(|k| std::cmp::Reverse(k.len()));

    let mut rendered = svg.to_string();
    let mut stats = RenderStats::default();

    for key in keys {
        let occurrences = rendered.matches(key.as_str()).count();
        if occurrences == 0 {
            stats.unmatched += 1;
            continue;
        }
        let label = escape(buttons[key].as_str());
        rendered = rendered.replace(key.as_str(), &label);
        stats.replaced += occurrences;
    }

    (rendered, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_replaces_placeholders() {
        let svg = r#"<svg><text>BUTTON_1</text><text>BUTTON_2</text></svg>"#;
        let (out, stats) = render(svg, &bindings(&[("BUTTON_1", "Fire"), ("BUTTON_2", "Lock")]));

        assert!(out.contains(">Fire<"));
        assert!(out.contains(">Lock<"));
        assert_eq!(stats.replaced, 2);
        assert_eq!(stats.unmatched, 0);
    }

    #[test]
    fn test_longer_keys_win_over_prefixes() {
        let svg = "<svg><text>BUTTON_12</text><text>BUTTON_1</text></svg>";
        let (out, stats) = render(
            svg,
            &bindings(&[("BUTTON_1", "Fire"), ("BUTTON_12", "Gear")]),
        );

        assert!(out.contains(">Gear<"));
        assert!(out.contains(">Fire<"));
        assert_eq!(stats.replaced, 2);
    }

    #[test]
    fn test_unmatched_bindings_counted() {
        let svg = "<svg><text>BUTTON_1</text></svg>";
        let (_, stats) = render(svg, &bindings(&[("BUTTON_1", "Fire"), ("BUTTON_9", "Eject")]));

        assert_eq!(stats.replaced, 1);
        assert_eq!(stats.unmatched, 1);
    }

    #[test]
    fn test_labels_are_escaped() {
        let svg = "<svg><text>BUTTON_1</text></svg>";
        let (out, _) = render(svg, &bindings(&[("BUTTON_1", "Guns & Cannon <auto>")]));

        assert!(out.contains("Guns &amp; Cannon &lt;auto&gt;"));
    }

    #[test]
    fn test_unknown_placeholders_left_alone() {
        let svg = "<svg><text>BUTTON_99</text></svg>";
        let (out, stats) = render(svg, &bindings(&[("BUTTON_1", "Fire")]));

        assert!(out.contains("BUTTON_99"));
        assert_eq!(stats.replaced, 0);
        assert_eq!(stats.unmatched, 1);
    }
}
