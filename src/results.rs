use serde::{Deserialize, Serialize};

/// Normalized event extracted from one event page.
///
/// Every optional field is `None` when the page lacks the corresponding markup;
/// extraction never stores an empty string. Absent fields serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: Option<String>,
    pub date_time: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub venue_name: Option<String>,
    pub description: Option<String>,
    pub categories: Option<Vec<String>>,
    pub organiser: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tickets_url: Option<String>,
    pub image_url: Option<String>,

    /// Final (post-redirect) URL of the page
    pub page_url: String,

    /// Human readable name of the site the event came from
    pub source_name: String,
}

impl EventRecord {
    /// Create an empty record for a page
    pub fn new(page_url: String, source_name: String) -> Self {
        Self {
            page_url,
            source_name,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let record = EventRecord::new(
            "https://www.cityofmobile.org/events/x".to_string(),
            "City of Mobile".to_string(),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert!(value["description"].is_null());
        assert!(value["categories"].is_null());
        assert_eq!(value["page_url"], "https://www.cityofmobile.org/events/x");
        assert_eq!(value["source_name"], "City of Mobile");
    }
}
