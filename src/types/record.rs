use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

/// fixed document-type prefix shared by every export filename
pub const FILENAME_PREFIX: &str = "USABC-Onboarding";

/// mail domain used when deriving the login handle
pub const MAIL_DOMAIN: &str = "usasean.org";

/// the fixed office list the entry form offers
pub const OFFICES: &[&str] = &[
    "Washington, D.C.",
    "Brunei",
    "Cambodia",
    "Indonesia",
    "Laos",
    "Malaysia",
    "Myanmar",
    "Philippines",
    "Singapore",
    "Thailand",
    "Vietnam",
];

/// Deserialized from the form's `category` field. Primary hires are interns
/// on the bring-your-own-device track; secondary hires are regular staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Category {
    #[serde(rename = "primary")]
    Primary,
    #[serde(rename = "secondary")]
    Secondary,
}

impl Category {
    /// label used on the rendered sheet
    pub fn label(&self) -> &'static str {
        match self {
            Category::Primary => "Intern",
            Category::Secondary => "Staff",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Primary
    }
}

/// One onboarding case as submitted by the entry form. Created empty,
/// replaced wholesale on submission, discarded on back-to-edit. The pipeline
/// treats every field as an opaque display string except `start_date`
/// (parsed for display) and the two name fields (combined into the login
/// handle and the output filename).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CaseRecord {
    #[serde(rename = "givenName")]
    pub given_name: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
    /// ISO calendar date, may be empty
    #[serde(rename = "startDate")]
    pub start_date: String,
    pub office: String,
    pub supervisor: String,
    pub category: Category,
}

impl CaseRecord {
    /// Derives the filename stem shared by all three export formats:
    /// `<prefix>-<given>-<family>` with every run of whitespace collapsed
    /// to a single hyphen. Pure; empty name fields yield a degenerate but
    /// still valid stem.
    pub fn base_filename(&self) -> String {
        let stem = format!("{FILENAME_PREFIX}-{}-{}", self.given_name, self.family_name);
        let mut out = String::with_capacity(stem.len());
        let mut in_whitespace = false;

        for ch in stem.chars() {
            if ch.is_whitespace() {
                if !in_whitespace {
                    out.push('-');
                }
                in_whitespace = true;
            } else {
                out.push(ch);
                in_whitespace = false;
            }
        }

        out
    }

    /// first initial + family name, lowercased, at the fixed mail domain;
    /// placeholder handle while either name field is still empty
    pub fn login_handle(&self) -> String {
        let given = self.given_name.trim();
        let family = self.family_name.trim();

        match given.chars().next() {
            Some(initial) if !family.is_empty() => format!(
                "{}{}@{MAIL_DOMAIN}",
                initial.to_lowercase(),
                family.to_lowercase()
            ),
            _ => format!("username@{MAIL_DOMAIN}"),
        }
    }

    /// long-form start date for display; `---` when empty, the raw string
    /// when it does not parse as an ISO date
    pub fn display_start_date(&self) -> String {
        if self.start_date.is_empty() {
            return "---".to_string();
        }

        match NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d") {
            Ok(date) => format!("{} {}, {}", date.format("%B"), date.day(), date.year()),
            Err(_) => self.start_date.clone(),
        }
    }

    pub fn display_office(&self) -> &str {
        or_placeholder(&self.office)
    }

    pub fn display_supervisor(&self) -> &str {
        or_placeholder(&self.supervisor)
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        "---"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(given: &str, family: &str) -> CaseRecord {
        CaseRecord {
            given_name: given.to_string(),
            family_name: family.to_string(),
            ..CaseRecord::default()
        }
    }

    #[test]
    fn filename_joins_names_with_hyphens() {
        let rec = record("Jane", "Doe");
        assert_eq!(rec.base_filename(), "USABC-Onboarding-Jane-Doe");
    }

    #[test]
    fn filename_collapses_whitespace_runs() {
        let rec = record("Mary Ann", "Lee");
        assert_eq!(rec.base_filename(), "USABC-Onboarding-Mary-Ann-Lee");

        let rec = record("Mary \t Ann", "Lee");
        assert_eq!(rec.base_filename(), "USABC-Onboarding-Mary-Ann-Lee");
    }

    #[test]
    fn filename_never_contains_whitespace() {
        let names = [
            ("Jane", "Doe"),
            ("Mary Ann", "Lee"),
            ("", ""),
            ("  ", "\t"),
            ("Nguyen Van", "An Binh"),
        ];

        for (given, family) in names {
            let stem = record(given, family).base_filename();
            assert!(
                !stem.contains(char::is_whitespace),
                "whitespace leaked into {stem:?}"
            );
        }
    }

    #[test]
    fn filename_is_deterministic() {
        let rec = record("Mary Ann", "Lee");
        assert_eq!(rec.base_filename(), rec.base_filename());
    }

    #[test]
    fn empty_names_yield_degenerate_but_valid_stem() {
        let rec = record("", "");
        assert_eq!(rec.base_filename(), "USABC-Onboarding--");
    }

    #[test]
    fn login_handle_from_initial_and_family_name() {
        let rec = record("Jane", "Doe");
        assert_eq!(rec.login_handle(), "jdoe@usasean.org");

        let rec = record("  Jane ", " DOE ");
        assert_eq!(rec.login_handle(), "jdoe@usasean.org");
    }

    #[test]
    fn login_handle_placeholder_until_both_names_present() {
        assert_eq!(record("", "Doe").login_handle(), "username@usasean.org");
        assert_eq!(record("Jane", "").login_handle(), "username@usasean.org");
        assert_eq!(record("", "").login_handle(), "username@usasean.org");
    }

    #[test]
    fn start_date_formats_long_form() {
        let rec = CaseRecord {
            start_date: "2026-01-05".to_string(),
            ..CaseRecord::default()
        };
        assert_eq!(rec.display_start_date(), "January 5, 2026");
    }

    #[test]
    fn start_date_placeholder_and_passthrough() {
        let rec = CaseRecord::default();
        assert_eq!(rec.display_start_date(), "---");

        let rec = CaseRecord {
            start_date: "next monday".to_string(),
            ..CaseRecord::default()
        };
        assert_eq!(rec.display_start_date(), "next monday");
    }

    #[test]
    fn deserializes_from_form_payload() {
        let json = r#"{
            "givenName": "Jane",
            "familyName": "Doe",
            "startDate": "2026-02-16",
            "office": "Singapore",
            "supervisor": "K. Byfield",
            "category": "secondary"
        }"#;

        let rec: CaseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.given_name, "Jane");
        assert_eq!(rec.category, Category::Secondary);
        assert_eq!(rec.category.label(), "Staff");
    }

    #[test]
    fn office_placeholder_when_unset() {
        let rec = CaseRecord::default();
        assert_eq!(rec.display_office(), "---");
        assert_eq!(rec.display_supervisor(), "---");
        assert!(OFFICES.contains(&"Singapore"));
    }
}
