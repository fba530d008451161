use crate::core::models::{
    form::{Form, FormDetail, Insert, Query, Update},
    question::Query as QuestionQuery,
};
use crate::core::ports::repository::{FormCommon, QuestionCommon, Store, SurveyCommon};
use crate::error::Error;

pub async fn create_form<S>(store: &mut S, form: Insert) -> Result<i32, Error>
where
    S: Store,
{
    form.validate()?;
    SurveyCommon::get(store, form.survey_id).await?;
    FormCommon::insert(store, form).await
}

pub async fn update_form<S>(store: &mut S, id: i32, form: Update) -> Result<(), Error>
where
    S: Store,
{
    form.validate()?;
    FormCommon::update(store, id, form).await
}

pub async fn list_forms<S>(store: &mut S, query: Query) -> Result<Vec<Form>, Error>
where
    S: Store,
{
    FormCommon::query(store, &query).await
}

pub async fn form_detail<S>(store: &mut S, id: i32) -> Result<FormDetail, Error>
where
    S: Store,
{
    let form = FormCommon::get(store, id).await?;
    let questions = QuestionCommon::query(store, &QuestionQuery { form_id_eq: Some(id) }).await?;
    Ok(FormDetail { form, questions })
}

/// What an anonymous respondent sees. Inactive forms look exactly like
/// missing ones.
pub async fn public_form<S>(store: &mut S, id: i32) -> Result<FormDetail, Error>
where
    S: Store,
{
    let detail = form_detail(store, id).await?;
    if !detail.form.active {
        return Err(Error::NotFound(format!("form {}", id)));
    }
    Ok(detail)
}

pub async fn delete_form<S>(store: &mut S, id: i32) -> Result<(), Error>
where
    S: Store,
{
    FormCommon::delete(store, id).await?;
    log::info!("form {} deleted", id);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::form::FormRole;
    use crate::core::models::survey::Insert as SurveyInsert;
    use crate::database::memory::MemStore;

    async fn survey(store: &mut MemStore) -> i32 {
        SurveyCommon::insert(
            store,
            SurveyInsert {
                title: "Feira".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    fn form(survey_id: i32, name: &str, active: bool) -> Insert {
        Insert {
            survey_id,
            name: name.into(),
            description: None,
            role: FormRole::Exhibitor,
            active,
        }
    }

    #[tokio::test]
    async fn test_form_needs_existing_survey() {
        let mut store = MemStore::new();
        assert!(matches!(create_form(&mut store, form(99, "Expositores", true)).await, Err(Error::NotFound(_))));
        let sid = survey(&mut store).await;
        assert!(matches!(create_form(&mut store, form(sid, "", true)).await, Err(Error::ValidationError(_))));
        assert!(create_form(&mut store, form(sid, "Expositores", true)).await.is_ok());
    }

    #[tokio::test]
    async fn test_inactive_form_is_hidden_from_public() {
        let mut store = MemStore::new();
        let sid = survey(&mut store).await;
        let open = create_form(&mut store, form(sid, "Aberto", true)).await.unwrap();
        let closed = create_form(&mut store, form(sid, "Fechado", false)).await.unwrap();
        assert_eq!(public_form(&mut store, open).await.unwrap().form.name, "Aberto");
        assert!(matches!(public_form(&mut store, closed).await, Err(Error::NotFound(_))));
        assert!(form_detail(&mut store, closed).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_by_survey_and_active_flag() {
        let mut store = MemStore::new();
        let a = survey(&mut store).await;
        let b = survey(&mut store).await;
        create_form(&mut store, form(a, "A1", true)).await.unwrap();
        create_form(&mut store, form(a, "A2", false)).await.unwrap();
        create_form(&mut store, form(b, "B1", true)).await.unwrap();
        let forms = list_forms(
            &mut store,
            Query {
                survey_id_eq: Some(a),
                active_eq: Some(true),
            },
        )
        .await
        .unwrap();
        assert_eq!(forms.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(), vec!["A1"]);
    }
}
