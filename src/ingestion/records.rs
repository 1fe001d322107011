use serde::Deserialize;

const NAME_FALLBACK: &str = "해당 시설";
const ADDRESS_FALLBACK: &str = "주소 정보 없음";
const VALUE_FALLBACK: &str = "정보 없음";
const DEPARTMENT_FALLBACK: &str = "담당 부서 정보 없음";
const CONTACT_FALLBACK: &str = "연락처 정보 없음";

/// Raw row of the public-facility CSV export. Column names follow the
/// dataset schema; every field but the identifier may be blank.
#[derive(Debug, Clone, Deserialize)]
pub struct FacilityRecord {
    pub id: String,
    pub facility_name: Option<String>,
    pub facility_type: Option<String>,
    pub road_name_address: Option<String>,
    pub weekday_opening_hour: Option<String>,
    pub weekday_closing_hour: Option<String>,
    pub weekend_opening_hour: Option<String>,
    pub weekend_closing_hour: Option<String>,
    pub closed_days: Option<String>,
    pub paid_service: Option<String>,
    pub capacity: Option<String>,
    pub amenities: Option<String>,
    pub application_method: Option<String>,
    pub department_in_charge: Option<String>,
    pub contact_number: Option<String>,
}

/// A facility record after the single default-substitution step: every
/// field is display-ready, blanks replaced by their placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFacility {
    pub name: String,
    pub kind: String,
    pub address: String,
    pub weekday_hours: String,
    pub weekend_hours: String,
    pub closed_days: String,
    pub fee_label: String,
    pub capacity: String,
    pub amenities: String,
    pub application: String,
    pub department: String,
    pub contact: String,
}

impl FacilityRecord {
    pub fn normalize(&self) -> NormalizedFacility {
        NormalizedFacility {
            name: fill(&self.facility_name, NAME_FALLBACK),
            kind: fill(&self.facility_type, VALUE_FALLBACK),
            address: fill(&self.road_name_address, ADDRESS_FALLBACK),
            weekday_hours: hour_range(&self.weekday_opening_hour, &self.weekday_closing_hour),
            weekend_hours: hour_range(&self.weekend_opening_hour, &self.weekend_closing_hour),
            closed_days: fill(&self.closed_days, VALUE_FALLBACK),
            fee_label: fee_label(&self.paid_service),
            capacity: fill(&self.capacity, VALUE_FALLBACK),
            amenities: fill(&self.amenities, VALUE_FALLBACK),
            application: fill(&self.application_method, VALUE_FALLBACK),
            department: fill(&self.department_in_charge, DEPARTMENT_FALLBACK),
            contact: fill(&self.contact_number, CONTACT_FALLBACK),
        }
    }
}

/// Raw row of the city-news CSV export.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsRecord {
    pub id: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub spot: Option<String>,
}

impl NewsRecord {
    /// A news row with neither title nor summary carries nothing worth
    /// embedding.
    pub fn is_empty(&self) -> bool {
        present(&self.title).is_none() && present(&self.summary).is_none()
    }
}

pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn fill(value: &Option<String>, fallback: &str) -> String {
    match present(value) {
        Some(value) => value.to_string(),
        None => fallback.to_string(),
    }
}

/// Opening hours only make sense as a pair; a lone end renders as the
/// placeholder instead of a dangling range.
fn hour_range(open: &Option<String>, close: &Option<String>) -> String {
    match (present(open), present(close)) {
        (Some(open), Some(close)) => format!("{}~{}", open, close),
        _ => VALUE_FALLBACK.to_string(),
    }
}

fn fee_label(paid_service: &Option<String>) -> String {
    match present(paid_service) {
        Some("Y") => "유료".to_string(),
        _ => "무료".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_record() -> FacilityRecord {
        FacilityRecord {
            id: "1".to_string(),
            facility_name: None,
            facility_type: None,
            road_name_address: None,
            weekday_opening_hour: None,
            weekday_closing_hour: None,
            weekend_opening_hour: None,
            weekend_closing_hour: None,
            closed_days: None,
            paid_service: None,
            capacity: None,
            amenities: None,
            application_method: None,
            department_in_charge: None,
            contact_number: None,
        }
    }

    #[test]
    fn blank_fields_take_their_placeholders() {
        let normalized = blank_record().normalize();

        assert_eq!(normalized.name, "해당 시설");
        assert_eq!(normalized.address, "주소 정보 없음");
        assert_eq!(normalized.kind, "정보 없음");
        assert_eq!(normalized.weekday_hours, "정보 없음");
        assert_eq!(normalized.department, "담당 부서 정보 없음");
        assert_eq!(normalized.contact, "연락처 정보 없음");
    }

    #[test]
    fn hour_ranges_require_both_ends() {
        let mut record = blank_record();
        record.weekday_opening_hour = Some("09:00".to_string());
        record.weekday_closing_hour = Some("18:00".to_string());
        record.weekend_opening_hour = Some("10:00".to_string());

        let normalized = record.normalize();
        assert_eq!(normalized.weekday_hours, "09:00~18:00");
        assert_eq!(normalized.weekend_hours, "정보 없음");
    }

    #[test]
    fn only_an_explicit_y_marks_a_paid_facility() {
        let mut record = blank_record();
        record.paid_service = Some("Y".to_string());
        assert_eq!(record.normalize().fee_label, "유료");

        record.paid_service = Some("N".to_string());
        assert_eq!(record.normalize().fee_label, "무료");

        record.paid_service = None;
        assert_eq!(record.normalize().fee_label, "무료");
    }

    #[test]
    fn whitespace_only_values_count_as_blank() {
        let mut record = blank_record();
        record.facility_name = Some("   ".to_string());
        assert_eq!(record.normalize().name, "해당 시설");
    }

    #[test]
    fn news_emptiness_needs_both_title_and_summary_blank() {
        let record = NewsRecord {
            id: "7".to_string(),
            title: None,
            summary: Some(" ".to_string()),
            spot: Some("은파호수공원".to_string()),
        };
        assert!(record.is_empty());

        let record = NewsRecord {
            id: "7".to_string(),
            title: Some("벚꽃 축제".to_string()),
            summary: None,
            spot: None,
        };
        assert!(!record.is_empty());
    }
}
