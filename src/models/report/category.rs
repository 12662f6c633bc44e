use serde::Serialize;

const GOVERNMENT_SUBTYPES: &[&str] = &["Bribery", "Embezzlement", "Nepotism", "Abuse of Authority", "Other"];
const CIVILIAN_SUBTYPES: &[&str] = &["Theft", "Assault", "Vandalism", "Fraud", "Other"];

/// Classification chosen at submission; decides which agency reviews the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrimeCategory {
    Government,
    Civilian,
}

impl CrimeCategory {
    pub const ALL: [CrimeCategory; 2] = [CrimeCategory::Government, CrimeCategory::Civilian];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "government" => Some(CrimeCategory::Government),
            "civilian" => Some(CrimeCategory::Civilian),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CrimeCategory::Government => "government",
            CrimeCategory::Civilian => "civilian",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CrimeCategory::Government => "Government Crime",
            CrimeCategory::Civilian => "Civilian Crime",
        }
    }

    /// Fixed single-select options for this category.
    pub fn subtypes(self) -> &'static [&'static str] {
        match self {
            CrimeCategory::Government => GOVERNMENT_SUBTYPES,
            CrimeCategory::Civilian => CIVILIAN_SUBTYPES,
        }
    }

    pub fn is_valid_subtype(self, subtype: &str) -> bool {
        self.subtypes().contains(&subtype)
    }

    pub fn agency(self) -> Agency {
        match self {
            CrimeCategory::Government => Agency::Ciaa,
            CrimeCategory::Civilian => Agency::Police,
        }
    }
}

/// Agency a report is routed to, addressed by URL segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Agency {
    Ciaa,
    Police,
}

impl Agency {
    pub const ALL: [Agency; 2] = [Agency::Ciaa, Agency::Police];

    /// Case-insensitive; anything other than `ciaa` or `police` is unknown.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment.to_ascii_lowercase().as_str() {
            "ciaa" => Some(Agency::Ciaa),
            "police" => Some(Agency::Police),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Agency::Ciaa => "ciaa",
            Agency::Police => "police",
        }
    }

    pub fn category(self) -> CrimeCategory {
        match self {
            Agency::Ciaa => CrimeCategory::Government,
            Agency::Police => CrimeCategory::Civilian,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Agency::Ciaa => "CIAA Reports",
            Agency::Police => "Police Reports",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Agency::Ciaa => "Reports concerning government officials and corruption, routed to the \
                             Commission for the Investigation of Abuse of Authority (CIAA).",
            Agency::Police => "Reports concerning civilian-related crimes, routed to the Nepal Police.",
        }
    }

    /// Tag stored in `feedback_by` when this agency's reviewers answer a report.
    /// Government reports are answered by the ICC review desk.
    pub fn feedback_role(self) -> &'static str {
        match self {
            Agency::Ciaa => "ICC",
            Agency::Police => "Police",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agency_segments() {
        assert_eq!(Agency::from_segment("ciaa"), Some(Agency::Ciaa));
        assert_eq!(Agency::from_segment("POLICE"), Some(Agency::Police));
        assert_eq!(Agency::from_segment("xyz"), None);
        assert_eq!(Agency::from_segment(""), None);
    }

    #[test]
    fn agency_and_category_map_both_ways() {
        for agency in Agency::ALL {
            assert_eq!(agency.category().agency(), agency);
            assert_eq!(Agency::from_segment(agency.slug()), Some(agency));
        }
        assert_eq!(Agency::Ciaa.category(), CrimeCategory::Government);
        assert_eq!(Agency::Police.category(), CrimeCategory::Civilian);
    }

    #[test]
    fn subtypes_are_per_category() {
        assert!(CrimeCategory::Government.is_valid_subtype("Bribery"));
        assert!(CrimeCategory::Government.is_valid_subtype("Abuse of Authority"));
        assert!(!CrimeCategory::Government.is_valid_subtype("Theft"));
        assert!(CrimeCategory::Civilian.is_valid_subtype("Theft"));
        assert!(CrimeCategory::Civilian.is_valid_subtype("Other"));
        assert!(!CrimeCategory::Civilian.is_valid_subtype("bribery"));
    }

    #[test]
    fn category_parse() {
        assert_eq!(CrimeCategory::parse("Government"), Some(CrimeCategory::Government));
        assert_eq!(CrimeCategory::parse("civilian"), Some(CrimeCategory::Civilian));
        assert_eq!(CrimeCategory::parse("icc"), None);
    }

    #[test]
    fn feedback_tags_name_the_reviewing_desk() {
        assert_eq!(Agency::Ciaa.feedback_role(), "ICC");
        assert_eq!(Agency::Police.feedback_role(), "Police");
    }
}
