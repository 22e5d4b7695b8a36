//! Common types and data structures

/// One course as returned by the list endpoint. The four window
/// timestamps are kept as the raw strings the backend sent; parsing
/// happens at render time so a bad field drops one bar, not the row.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub sign_in_start_time: Option<String>,
    pub sign_in_end_time: Option<String>,
    pub sign_out_start_time: Option<String>,
    pub sign_out_end_time: Option<String>,
}

impl Course {
    /// The four window timestamps in a fixed order.
    pub fn timestamps(&self) -> [Option<&str>; 4] {
        [
            self.sign_in_start_time.as_deref(),
            self.sign_in_end_time.as_deref(),
            self.sign_out_start_time.as_deref(),
            self.sign_out_end_time.as_deref(),
        ]
    }
}

/// Envelope of the course list endpoint: `{ code, data: { items } }`.
#[derive(serde::Deserialize)]
pub struct CourseListResponse {
    pub code: i64,
    pub data: Option<CourseListData>,
}

#[derive(serde::Deserialize)]
pub struct CourseListData {
    #[serde(default)]
    pub items: Vec<Course>,
}

/// Lifecycle of the background course fetch.
#[derive(Clone, PartialEq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// State shared between the UI thread and fetch tasks.
pub struct FetchState {
    pub courses: Vec<Course>,
    pub status: FetchStatus,
    pub fetched_at: Option<chrono::NaiveDateTime>,
    pub active_count: usize,
}

impl Default for FetchState {
    fn default() -> Self {
        Self {
            courses: Vec::new(),
            status: FetchStatus::Idle,
            fetched_at: None,
            active_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_course_list_envelope() {
        let json = r#"{
            "code": 200,
            "data": {
                "items": [
                    {
                        "id": 42,
                        "title": "Data Structures",
                        "sign_in_start_time": "2024-03-01 08:00:00",
                        "sign_in_end_time": "2024-03-01 08:15:00",
                        "sign_out_start_time": null,
                        "sign_out_end_time": null
                    }
                ]
            }
        }"#;
        let resp: CourseListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.code, 200);
        let items = resp.data.unwrap().items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 42);
        assert_eq!(items[0].title, "Data Structures");
        assert_eq!(
            items[0].sign_in_start_time.as_deref(),
            Some("2024-03-01 08:00:00")
        );
        assert!(items[0].sign_out_start_time.is_none());
    }

    #[test]
    fn test_decode_envelope_without_data() {
        let resp: CourseListResponse = serde_json::from_str(r#"{"code": 500}"#).unwrap();
        assert_eq!(resp.code, 500);
        assert!(resp.data.is_none());
    }

    #[test]
    fn test_decode_data_without_items() {
        let resp: CourseListResponse =
            serde_json::from_str(r#"{"code": 200, "data": {}}"#).unwrap();
        assert!(resp.data.unwrap().items.is_empty());
    }

    #[test]
    fn test_timestamps_order() {
        let course = Course {
            id: 1,
            title: "T".into(),
            sign_in_start_time: Some("a".into()),
            sign_in_end_time: Some("b".into()),
            sign_out_start_time: Some("c".into()),
            sign_out_end_time: None,
        };
        assert_eq!(
            course.timestamps(),
            [Some("a"), Some("b"), Some("c"), None]
        );
    }
}
