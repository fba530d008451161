use crate::core::answer::encode;
use crate::core::models::{
    question::Query as QuestionQuery,
    response::{ClientMeta, DetailInsert, HeaderInsert, Query, ResponseWithDetails, Submission},
};
use crate::core::ports::repository::{FormCommon, QuestionCommon, ResponseCommon, Store, TxStore};
use crate::error::Error;
use chrono::{DateTime, Utc};
use itertools::Itertools;

/// Records one public submission. Answers are matched against the form's
/// questions; keys that name no question of the form are ignored. Nothing is
/// written unless every answer encodes and every required question has one.
pub async fn submit<T>(mut store: T, submission: Submission, meta: ClientMeta, submitted_at: DateTime<Utc>) -> Result<i32, Error>
where
    T: TxStore,
{
    let form = FormCommon::get(&mut store, submission.form_id).await?;
    if !form.active {
        return Err(Error::NotFound(format!("form {}", form.id)));
    }
    let questions = QuestionCommon::query(&mut store, &QuestionQuery { form_id_eq: Some(form.id) }).await?;
    let mut values = Vec::with_capacity(questions.len());
    let mut missing = Vec::new();
    for q in &questions {
        let value = match submission.answers.get(&q.id) {
            Some(raw) => encode(q.answer_kind, raw).map_err(|e| match e {
                Error::ValidationError(msg) => Error::ValidationError(format!("{}: {}", q.text, msg)),
                other => other,
            })?,
            None => None,
        };
        match value {
            Some(v) => values.push((q.id, v)),
            None if q.required => missing.push(q.text.as_str()),
            None => {}
        }
    }
    if !missing.is_empty() {
        return Err(Error::ValidationError(format!("required questions not answered: {}", missing.iter().join("; "))));
    }
    let response_id = ResponseCommon::insert(
        &mut store,
        HeaderInsert {
            form_id: form.id,
            survey_id: form.survey_id,
            submitted_at,
            ip: meta.ip,
            user_agent: meta.user_agent,
        },
    )
    .await?;
    let details: Vec<DetailInsert> = values
        .into_iter()
        .map(|(question_id, value)| DetailInsert {
            response_id,
            question_id,
            value,
        })
        .collect();
    if !details.is_empty() {
        ResponseCommon::bulk_insert_details(&mut store, details).await?;
    }
    store.commit().await?;
    log::info!("response {} recorded for form {}", response_id, form.id);
    Ok(response_id)
}

/// Newest first. At least one of the two filters is required.
pub async fn list_responses<S>(store: &mut S, survey_id: Option<i32>, form_id: Option<i32>) -> Result<Vec<ResponseWithDetails>, Error>
where
    S: Store,
{
    if survey_id.is_none() && form_id.is_none() {
        return Err(Error::ValidationError("surveyId or formId is required".into()));
    }
    ResponseCommon::query(
        store,
        &Query {
            survey_id_eq: survey_id,
            form_id_eq: form_id,
            newest_first: true,
            ..default::default()
        },
    )
    .await
}

pub async fn delete_response<S>(store: &mut S, id: i32) -> Result<(), Error>
where
    S: Store,
{
    ResponseCommon::delete(store, id).await?;
    log::info!("response {} deleted", id);
    Ok(())
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::core::models::form::Insert as FormInsert;
    use crate::core::models::question::{AnswerKind, Insert as QuestionInsert, QuestionOptions};
    use crate::core::models::response::AnswerValue;
    use crate::core::models::survey::Insert as SurveyInsert;
    use crate::core::ports::repository::SurveyCommon;
    use crate::database::memory::MemStore;
    use chrono::TimeZone;
    use serde_json::json;
    use std::collections::HashMap;

    pub(crate) struct Fixture {
        pub store: MemStore,
        pub survey_id: i32,
        pub form_id: i32,
        /// Question ids in position order: name (TEXT, required), rating
        /// (SCALE), channels (MULTI_CHOICE), liked (SINGLE_CHOICE).
        pub questions: Vec<i32>,
    }

    pub(crate) async fn fixture() -> Fixture {
        let mut store = MemStore::new();
        let survey_id = SurveyCommon::insert(
            &mut store,
            SurveyInsert {
                title: "Festival".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let form_id = FormCommon::insert(
            &mut store,
            FormInsert {
                survey_id,
                name: "Visitantes".into(),
                description: None,
                role: Default::default(),
                active: true,
            },
        )
        .await
        .unwrap();
        let specs = [
            ("Nome", AnswerKind::Text, true, QuestionOptions::None),
            ("Nota", AnswerKind::Scale, false, QuestionOptions::None),
            (
                "Como soube?",
                AnswerKind::MultiChoice,
                false,
                QuestionOptions::Choices {
                    labels: vec!["Rádio".into(), "Internet".into()],
                    include_other: true,
                },
            ),
            (
                "Gostou?",
                AnswerKind::SingleChoice,
                false,
                QuestionOptions::Choices {
                    labels: vec!["Sim".into(), "Não".into()],
                    include_other: false,
                },
            ),
        ];
        let mut questions = Vec::new();
        for (i, (text, answer_kind, required, options)) in specs.into_iter().enumerate() {
            let id = QuestionCommon::insert(
                &mut store,
                QuestionInsert {
                    form_id,
                    text: text.into(),
                    answer_kind,
                    required,
                    position: i as i32 + 1,
                    options,
                },
            )
            .await
            .unwrap();
            questions.push(id);
        }
        Fixture {
            store,
            survey_id,
            form_id,
            questions,
        }
    }

    pub(crate) fn submission(form_id: i32, answers: Vec<(i32, serde_json::Value)>) -> Submission {
        Submission {
            form_id,
            answers: answers.into_iter().collect::<HashMap<_, _>>(),
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_submit_encodes_every_answer() {
        let mut f = fixture().await;
        let q = f.questions.clone();
        let sub = submission(
            f.form_id,
            vec![
                (q[0], json!("Ana")),
                (q[1], json!("4")),
                (q[2], json!(["Rádio", "Internet"])),
                (q[3], json!("")),
                (9999, json!("ignored")),
            ],
        );
        let meta = ClientMeta {
            ip: Some("10.0.0.1".into()),
            user_agent: Some("test".into()),
        };
        let id = submit(f.store.tx(), sub, meta, at(1)).await.unwrap();
        let responses = list_responses(&mut f.store, Some(f.survey_id), None).await.unwrap();
        assert_eq!(responses.len(), 1);
        let r = &responses[0];
        assert_eq!((r.header.id, r.header.form_id, r.header.ip.as_deref()), (id, f.form_id, Some("10.0.0.1")));
        let values: Vec<_> = r.details.iter().map(|d| (d.question.id, d.value.clone())).collect();
        assert_eq!(
            values,
            vec![
                (q[0], Some(AnswerValue::Text("Ana".into()))),
                (q[1], Some(AnswerValue::Number(4.0))),
                (q[2], Some(AnswerValue::Option("Rádio, Internet".into()))),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_required_answer_rejects_submission() {
        let mut f = fixture().await;
        let sub = submission(f.form_id, vec![(f.questions[0], json!("")), (f.questions[3], json!("Sim"))]);
        let err = submit(f.store.tx(), sub, ClientMeta::default(), at(1)).await.unwrap_err();
        match err {
            Error::ValidationError(msg) => assert!(msg.contains("Nome")),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(f.store.with(|d| d.responses.is_empty() && d.details.is_empty()));
    }

    #[tokio::test]
    async fn test_bad_value_rejects_whole_submission() {
        let mut f = fixture().await;
        let sub = submission(f.form_id, vec![(f.questions[0], json!("Ana")), (f.questions[1], json!("excelente"))]);
        let err = submit(f.store.tx(), sub, ClientMeta::default(), at(1)).await.unwrap_err();
        match err {
            Error::ValidationError(msg) => assert!(msg.starts_with("Nota")),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(f.store.with(|d| d.responses.is_empty()));
    }

    #[tokio::test]
    async fn test_inactive_or_missing_form() {
        let mut f = fixture().await;
        let sub = submission(404, vec![]);
        assert!(matches!(submit(f.store.tx(), sub, ClientMeta::default(), at(1)).await, Err(Error::NotFound(_))));
        f.store.with(|d| d.forms[0].active = false);
        let sub = submission(f.form_id, vec![(f.questions[0], json!("Ana"))]);
        assert!(matches!(submit(f.store.tx(), sub, ClientMeta::default(), at(1)).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_listing_is_newest_first_and_needs_a_filter() {
        let mut f = fixture().await;
        for day in [3, 1, 2] {
            let sub = submission(f.form_id, vec![(f.questions[0], json!(format!("dia {}", day)))]);
            submit(f.store.tx(), sub, ClientMeta::default(), at(day)).await.unwrap();
        }
        let responses = list_responses(&mut f.store, None, Some(f.form_id)).await.unwrap();
        let days: Vec<_> = responses.iter().map(|r| r.header.submitted_at).collect();
        assert_eq!(days, vec![at(3), at(2), at(1)]);
        assert!(matches!(list_responses(&mut f.store, None, None).await, Err(Error::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_delete_response_removes_details() {
        let mut f = fixture().await;
        let sub = submission(f.form_id, vec![(f.questions[0], json!("Ana"))]);
        let id = submit(f.store.tx(), sub, ClientMeta::default(), at(1)).await.unwrap();
        delete_response(&mut f.store, id).await.unwrap();
        assert!(f.store.with(|d| d.responses.is_empty() && d.details.is_empty()));
        assert!(matches!(delete_response(&mut f.store, id).await, Err(Error::NotFound(_))));
    }
}
