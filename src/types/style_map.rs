//! Hand-authored mapping from the renderer's utility class vocabulary to
//! literal CSS for the word-processor export. This is an enumerable table,
//! not a computed transform: it must be reviewed whenever the renderer
//! starts emitting a class that is missing here. Bump the version string
//! with every vocabulary change.

/// tracks the renderer's class vocabulary
pub const STYLE_MAP_VERSION: &str = "1.5";

/// accent color shared by headings, links and the PDF button
pub const ACCENT: &str = "#2f7dff";

/// every utility class the renderer emits, with its literal declaration
pub const CLASS_STYLES: &[(&str, &str)] = &[
    ("accent", "color: #2f7dff;"),
    ("muted", "color: #6b7280;"),
    ("body-text", "font-size: 13.5px; line-height: 1.4; color: #1f2937; margin-bottom: 10px;"),
    ("bold", "font-weight: bold;"),
    (
        "card",
        "background-color: #ffffff; border: 1px solid #e5e7eb; border-radius: 12px; padding: 20px; margin-bottom: 12px;",
    ),
    (
        "code",
        "background-color: #f3f4f6; padding: 2px 4px; border-radius: 4px; font-family: monospace; color: #1d4ed8; border: 1px solid #e5e7eb;",
    ),
    ("label", "color: #6b7280; width: 130px; float: left;"),
    ("value", "color: #111827; overflow: hidden; word-break: break-all;"),
    ("divider", "border: none; border-top: 1px solid #e5e7eb; margin: 14px 0;"),
    // float-based simulation of the on-screen 2-column grid
    ("grid", "display: flex; flex-wrap: wrap;"),
    ("col", "width: 48%; margin-right: 2%; float: left;"),
    ("clearfix", "clear: both; display: table; content: \"\";"),
];

/// element-level rules shared by the whole document
const BASE_RULES: &str = "\
body { font-family: 'Segoe UI', Arial, sans-serif; background-color: #ffffff; color: #111827; }\n\
a { color: #2f7dff; text-decoration: none; }\n\
h1 { font-size: 22px; color: #2f7dff; font-weight: 800; margin-bottom: 5px; }\n\
h2 { font-size: 14px; color: #2f7dff; text-transform: uppercase; font-weight: bold; margin-bottom: 8px; margin-top: 14px; letter-spacing: 0.8px; }\n\
p, ul, li { font-size: 13.5px; line-height: 1.4; color: #1f2937; }\n\
ul { padding-left: 20px; margin: 0; }\n\
li { margin-bottom: 4px; }\n";

/// assembles the embedded style sheet: base element rules, then one rule
/// per utility class in table order
pub fn style_sheet() -> String {
    let mut sheet = String::with_capacity(2048);
    sheet.push_str(BASE_RULES);

    for (class, declarations) in CLASS_STYLES {
        sheet.push('.');
        sheet.push_str(class);
        sheet.push_str(" { ");
        sheet.push_str(declarations);
        sheet.push_str(" }\n");
    }

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_class_appears_in_the_sheet() {
        let sheet = style_sheet();
        for (class, _) in CLASS_STYLES {
            assert!(
                sheet.contains(&format!(".{class} {{")),
                "class {class} missing from style sheet"
            );
        }
    }

    #[test]
    fn sheet_carries_the_accent_color() {
        assert!(style_sheet().contains(ACCENT));
    }

    #[test]
    fn table_has_no_duplicate_classes() {
        for (i, (class, _)) in CLASS_STYLES.iter().enumerate() {
            assert!(
                !CLASS_STYLES[i + 1..].iter().any(|(other, _)| other == class),
                "duplicate class {class}"
            );
        }
    }
}
