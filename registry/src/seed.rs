//! Built-in demo data set.

use idcheck_types::{PortraitRef, PrimaryId, Record, SecondaryId, Sex};

const DEMO: [(&str, &str, &str, &str, &str, Sex); 3] = [
    ("12345678901", "10987654321", "John", "Doe", "Michael", Sex::Male),
    ("98765432109", "90123456789", "Jane", "Smith", "Elizabeth", Sex::Female),
    ("11122233344", "44433322211", "David", "Johnson", "Robert", Sex::Male),
];

/// The three demo profiles served when no record file is configured.
pub fn demo_records() -> Vec<Record> {
    DEMO.iter()
        .filter_map(|&(nin, bvn, given, family, middle, sex)| {
            Some(Record {
                primary_id: PrimaryId::parse(nin).ok()?,
                secondary_id: SecondaryId::parse(bvn).ok()?,
                given_name: given.to_owned(),
                family_name: family.to_owned(),
                middle_name: middle.to_owned(),
                sex,
                portrait_ref: PortraitRef::placeholder(),
            })
        })
        .collect()
}
