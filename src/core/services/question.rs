use crate::core::models::question::{Create, Insert, Query, Question, Update};
use crate::core::ports::repository::{FormCommon, QuestionCommon, Store, TxStore};
use crate::error::Error;

/// Appends a question at `max(position) + 1` of its form; positions are never
/// supplied by the caller.
pub async fn create_question<T>(mut store: T, question: Create) -> Result<i32, Error>
where
    T: TxStore,
{
    question.definition.validate()?;
    FormCommon::get_for_update(&mut store, question.form_id).await?;
    let position = QuestionCommon::max_position(&mut store, question.form_id).await?.unwrap_or(0) + 1;
    let def = question.definition;
    let id = QuestionCommon::insert(
        &mut store,
        Insert {
            form_id: question.form_id,
            text: def.text,
            answer_kind: def.answer_kind,
            required: def.required,
            position,
            options: def.options,
        },
    )
    .await?;
    store.commit().await?;
    Ok(id)
}

pub async fn update_question<S>(store: &mut S, id: i32, question: Update) -> Result<(), Error>
where
    S: Store,
{
    question.validate()?;
    QuestionCommon::update(store, id, question).await
}

pub async fn list_questions<S>(store: &mut S, form_id: i32) -> Result<Vec<Question>, Error>
where
    S: Store,
{
    QuestionCommon::query(store, &Query { form_id_eq: Some(form_id) }).await
}

pub async fn question_detail<S>(store: &mut S, id: i32) -> Result<Question, Error>
where
    S: Store,
{
    QuestionCommon::get(store, id).await
}

/// Positions of the remaining questions are left as they are.
pub async fn delete_question<S>(store: &mut S, id: i32) -> Result<(), Error>
where
    S: Store,
{
    QuestionCommon::delete(store, id).await
}
