use crate::core::models::{
    form::Insert as FormInsert,
    question::{Definition, Insert as QuestionInsert},
    template::{Insert, QuestionInsert as TemplateQuestionInsert, Template, TemplateDetail, Update},
};
use crate::core::ports::repository::{FormCommon, QuestionCommon, Store, SurveyCommon, TemplateCommon, TxStore};
use crate::error::Error;

pub async fn create_template<S>(store: &mut S, template: Insert) -> Result<i32, Error>
where
    S: Store,
{
    template.validate()?;
    TemplateCommon::insert(store, template).await
}

pub async fn update_template<S>(store: &mut S, id: i32, template: Update) -> Result<(), Error>
where
    S: Store,
{
    template.validate()?;
    TemplateCommon::update(store, id, template).await
}

pub async fn list_templates<S>(store: &mut S) -> Result<Vec<Template>, Error>
where
    S: Store,
{
    TemplateCommon::query(store).await
}

pub async fn template_detail<S>(store: &mut S, id: i32) -> Result<TemplateDetail, Error>
where
    S: Store,
{
    let template = TemplateCommon::get(store, id).await?;
    let questions = TemplateCommon::questions(store, id).await?;
    Ok(TemplateDetail { template, questions })
}

pub async fn delete_template<S>(store: &mut S, id: i32) -> Result<(), Error>
where
    S: Store,
{
    TemplateCommon::delete(store, id).await
}

/// Same append rule as form questions.
pub async fn add_template_question<T>(mut store: T, template_id: i32, question: Definition) -> Result<i32, Error>
where
    T: TxStore,
{
    question.validate()?;
    TemplateCommon::get_for_update(&mut store, template_id).await?;
    let position = TemplateCommon::max_question_position(&mut store, template_id).await?.unwrap_or(0) + 1;
    let id = TemplateCommon::insert_question(&mut store, TemplateQuestionInsert::new(template_id, position, question)).await?;
    store.commit().await?;
    Ok(id)
}

pub async fn delete_template_question<S>(store: &mut S, template_id: i32, id: i32) -> Result<(), Error>
where
    S: Store,
{
    let question = TemplateCommon::get_question(store, id).await?;
    if question.template_id != template_id {
        return Err(Error::NotFound(format!("template question {}", id)));
    }
    TemplateCommon::delete_question(store, id).await
}

/// Creates an active form in `survey_id` holding a copy of every template
/// question, positions included. The form is named after the template unless
/// `name` is given.
pub async fn apply_template<T>(mut store: T, survey_id: i32, template_id: i32, name: Option<String>) -> Result<i32, Error>
where
    T: TxStore,
{
    SurveyCommon::get(&mut store, survey_id).await?;
    let template = TemplateCommon::get(&mut store, template_id).await?;
    let questions = TemplateCommon::questions(&mut store, template_id).await?;
    let form_id = FormCommon::insert(
        &mut store,
        FormInsert {
            survey_id,
            name: name.filter(|n| !n.trim().is_empty()).unwrap_or(template.name),
            description: template.description,
            role: template.role,
            active: true,
        },
    )
    .await?;
    let copied = questions.len();
    for q in questions {
        QuestionCommon::insert(
            &mut store,
            QuestionInsert {
                form_id,
                text: q.text,
                answer_kind: q.answer_kind,
                required: q.required,
                position: q.position,
                options: q.options,
            },
        )
        .await?;
    }
    store.commit().await?;
    log::info!("template {} applied to survey {} as form {} ({} questions)", template_id, survey_id, form_id, copied);
    Ok(form_id)
}
