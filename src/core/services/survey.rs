use crate::core::models::{
    form::Query as FormQuery,
    survey::{Insert, Survey, SurveyDetail, Update},
};
use crate::core::ports::repository::{FormCommon, Store, SurveyCommon};
use crate::error::Error;

pub async fn create_survey<S>(store: &mut S, survey: Insert) -> Result<i32, Error>
where
    S: Store,
{
    survey.validate()?;
    let id = SurveyCommon::insert(store, survey).await?;
    log::info!("survey {} created", id);
    Ok(id)
}

pub async fn update_survey<S>(store: &mut S, id: i32, survey: Update) -> Result<(), Error>
where
    S: Store,
{
    survey.validate()?;
    SurveyCommon::update(store, id, survey).await
}

pub async fn list_surveys<S>(store: &mut S) -> Result<Vec<Survey>, Error>
where
    S: Store,
{
    SurveyCommon::query(store).await
}

pub async fn survey_detail<S>(store: &mut S, id: i32) -> Result<SurveyDetail, Error>
where
    S: Store,
{
    let survey = SurveyCommon::get(store, id).await?;
    let forms = FormCommon::query(
        store,
        &FormQuery {
            survey_id_eq: Some(id),
            ..default::default()
        },
    )
    .await?;
    Ok(SurveyDetail { survey, forms })
}

pub async fn delete_survey<S>(store: &mut S, id: i32) -> Result<(), Error>
where
    S: Store,
{
    SurveyCommon::delete(store, id).await?;
    log::info!("survey {} deleted", id);
    Ok(())
}
