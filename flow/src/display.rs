//! Result screen formatting.

use idcheck_types::Record;
use std::fmt;

/// A bound record rendered for the `Complete` step.
pub struct RecordSummary<'a> {
    record: &'a Record,
}

impl<'a> RecordSummary<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    /// "John Doe".
    pub fn headline(&self) -> String {
        self.record.display_name()
    }

    pub fn portrait(&self) -> &str {
        self.record.portrait_ref.as_str()
    }

    /// Labelled fields in display order.
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        let r = self.record;
        [
            ("First Name", r.given_name.as_str()),
            ("Last Name", r.family_name.as_str()),
            ("Middle Name", r.middle_name.as_str()),
            ("Gender", r.sex.as_str()),
            ("NIN", r.primary_id.as_str()),
            ("BVN", r.secondary_id.as_str()),
        ]
    }
}

impl fmt::Display for RecordSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline())?;
        let width = self.fields().iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        for (label, value) in self.fields() {
            writeln!(f, "  {label:<width$}  {value}")?;
        }
        write!(f, "  {:<width$}  {}", "Portrait", self.portrait())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idcheck_types::{PortraitRef, PrimaryId, SecondaryId, Sex};

    #[test]
    fn renders_headline_and_fields() {
        let record = Record {
            primary_id: PrimaryId::parse("98765432109").unwrap(),
            secondary_id: SecondaryId::parse("90123456789").unwrap(),
            given_name: "Jane".into(),
            family_name: "Smith".into(),
            middle_name: "Elizabeth".into(),
            sex: Sex::Female,
            portrait_ref: PortraitRef::new("/jane.png"),
        };
        let summary = RecordSummary::new(&record);
        assert_eq!(summary.headline(), "Jane Smith");
        assert_eq!(summary.fields()[3], ("Gender", "Female"));

        let text = summary.to_string();
        assert!(text.starts_with("Jane Smith\n"));
        assert!(text.contains("Middle Name  Elizabeth"));
        assert!(text.contains("NIN          98765432109"));
        assert!(text.ends_with("/jane.png"));
    }
}
