//! Release taxonomy
//!
//! The closed mapping from category names to the columns each category
//! governs. The mapping is compiled in and never changes at runtime.
//! Name matching is exact: case and whitespace are significant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A releasable category of columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    IdentityContact,
    GeographicDemographic,
    AadhaarUsage,
    ProgramsHealthcare,
}

const IDENTITY_CONTACT: &[&str] = &[
    "Aadhaar Number",
    "Name",
    "Gender",
    "Date of Birth",
    "Address",
    "Mobile Number",
    "Email Address",
];

const GEOGRAPHIC_DEMOGRAPHIC: &[&str] = &[
    "State",
    "City",
    "Origin State",
    "Religion",
    "Caste",
    "Education Level",
    "Occupation",
    "Household Size",
    "Income Bracket",
];

const AADHAAR_USAGE: &[&str] = &[
    "Date of Aadhaar Issuance",
    "Date of Last Aadhaar Update",
    "Verification Status",
    "Number of Times Aadhaar Used",
    "Linked Services Count",
    "Linked Bank Accounts",
    "Mobile Connections Linked",
    "Preferred Authentication Method",
    "Authentication Mode Used",
    "Frequency of Usage",
    "Access Location",
];

const PROGRAMS_HEALTHCARE: &[&str] = &[
    "Subsidies Claimed",
    "Government Schemes Accessed",
    "Program Name",
    "Scheme Enrollment Status",
    "Vaccination Status",
    "Health Insurance Linked",
    "Consent Given for Data Sharing",
    "Data Breach Status",
    "Breach Date",
];

impl Category {
    /// Every category, in presentation order
    pub const ALL: [Category; 4] = [
        Category::IdentityContact,
        Category::GeographicDemographic,
        Category::AadhaarUsage,
        Category::ProgramsHealthcare,
    ];

    /// The canonical category name
    pub fn name(&self) -> &'static str {
        match self {
            Category::IdentityContact => "Identity and Contact Information",
            Category::GeographicDemographic => "Geographical and Demographic Details",
            Category::AadhaarUsage => "Aadhaar Usage and Linkages",
            Category::ProgramsHealthcare => "Programs and Healthcare Details",
        }
    }

    /// Columns governed by this category, in release order
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Category::IdentityContact => IDENTITY_CONTACT,
            Category::GeographicDemographic => GEOGRAPHIC_DEMOGRAPHIC,
            Category::AadhaarUsage => AADHAAR_USAGE,
            Category::ProgramsHealthcare => PROGRAMS_HEALTHCARE,
        }
    }

    /// Resolve an exact category name
    pub fn resolve(name: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// File name a release of this category is written to:
    /// `dp_` + lower-cased name with spaces replaced by underscores.
    pub fn output_file_name(&self) -> String {
        format!("dp_{}.csv", self.name().replace(' ', "_").to_lowercase())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_resolve_round_trips_names() {
        for category in Category::ALL {
            assert_eq!(Category::resolve(category.name()), Some(category));
        }
    }

    #[test]
    fn test_resolve_is_exact() {
        assert_eq!(Category::resolve("identity and contact information"), None);
        assert_eq!(Category::resolve(" Identity and Contact Information"), None);
        assert_eq!(Category::resolve("NotARealCategory"), None);
    }

    #[test]
    fn test_column_sets() {
        assert_eq!(Category::IdentityContact.columns().len(), 7);
        assert_eq!(Category::GeographicDemographic.columns().len(), 9);
        assert_eq!(Category::AadhaarUsage.columns().len(), 11);
        assert_eq!(Category::ProgramsHealthcare.columns().len(), 9);

        for category in Category::ALL {
            let unique: HashSet<_> = category.columns().iter().collect();
            assert_eq!(unique.len(), category.columns().len(), "{} repeats a column", category);
        }
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            Category::IdentityContact.output_file_name(),
            "dp_identity_and_contact_information.csv"
        );
        assert_eq!(
            Category::AadhaarUsage.output_file_name(),
            "dp_aadhaar_usage_and_linkages.csv"
        );
    }
}
