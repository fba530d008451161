use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormsQuery {
    #[serde(alias = "survey_id")]
    pub survey_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsQuery {
    #[serde(alias = "form_id")]
    pub form_id: i32,
}

/// Filters shared by response listings and reports.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsesQuery {
    #[serde(alias = "survey_id")]
    pub survey_id: Option<i32>,
    #[serde(alias = "form_id")]
    pub form_id: Option<i32>,
    #[serde(alias = "group_by")]
    pub group_by: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyQuery {
    #[serde(alias = "survey_id")]
    pub survey_id: Option<i32>,
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyTemplate {
    #[serde(alias = "template_id")]
    pub template_id: i32,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}
