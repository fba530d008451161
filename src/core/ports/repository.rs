use crate::core::models::{
    form::{Form, Insert as FormInsert, Query as FormQuery, Update as FormUpdate},
    question::{Insert as QuestionInsert, Query as QuestionQuery, Question, Update as QuestionUpdate},
    response::{DetailInsert, HeaderInsert, Query as ResponseQuery, ResponseHeader, ResponseWithDetails},
    survey::{Insert as SurveyInsert, Survey, Update as SurveyUpdate},
    template::{Insert as TemplateInsert, QuestionInsert as TemplateQuestionInsert, Template, TemplateQuestion, Update as TemplateUpdate},
    user::{Insert as UserInsert, Patch as UserPatch, User},
};
use crate::error::Error;

pub trait SurveyCommon {
    async fn insert(&mut self, data: SurveyInsert) -> Result<i32, Error>;
    async fn update(&mut self, id: i32, data: SurveyUpdate) -> Result<(), Error>;
    async fn get(&mut self, id: i32) -> Result<Survey, Error>;
    /// Newest first.
    async fn query(&mut self) -> Result<Vec<Survey>, Error>;
    /// Cascades to forms, questions and responses.
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
}

pub trait FormCommon {
    async fn insert(&mut self, data: FormInsert) -> Result<i32, Error>;
    async fn update(&mut self, id: i32, data: FormUpdate) -> Result<(), Error>;
    async fn get(&mut self, id: i32) -> Result<Form, Error>;
    /// Locks the form row until the surrounding transaction ends.
    async fn get_for_update(&mut self, id: i32) -> Result<Form, Error>;
    async fn query(&mut self, query: &FormQuery) -> Result<Vec<Form>, Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
}

pub trait QuestionCommon {
    async fn insert(&mut self, data: QuestionInsert) -> Result<i32, Error>;
    async fn update(&mut self, id: i32, data: QuestionUpdate) -> Result<(), Error>;
    async fn get(&mut self, id: i32) -> Result<Question, Error>;
    /// Ascending by position.
    async fn query(&mut self, query: &QuestionQuery) -> Result<Vec<Question>, Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
    async fn max_position(&mut self, form_id: i32) -> Result<Option<i32>, Error>;
}

pub trait TemplateCommon {
    async fn insert(&mut self, data: TemplateInsert) -> Result<i32, Error>;
    async fn update(&mut self, id: i32, data: TemplateUpdate) -> Result<(), Error>;
    async fn get(&mut self, id: i32) -> Result<Template, Error>;
    async fn get_for_update(&mut self, id: i32) -> Result<Template, Error>;
    async fn query(&mut self) -> Result<Vec<Template>, Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
    /// Ascending by position.
    async fn questions(&mut self, template_id: i32) -> Result<Vec<TemplateQuestion>, Error>;
    async fn max_question_position(&mut self, template_id: i32) -> Result<Option<i32>, Error>;
    async fn insert_question(&mut self, data: TemplateQuestionInsert) -> Result<i32, Error>;
    async fn get_question(&mut self, id: i32) -> Result<TemplateQuestion, Error>;
    async fn delete_question(&mut self, id: i32) -> Result<(), Error>;
}

pub trait ResponseCommon {
    async fn insert(&mut self, data: HeaderInsert) -> Result<i32, Error>;
    async fn bulk_insert_details(&mut self, details: Vec<DetailInsert>) -> Result<(), Error>;
    /// Responses with their details, ordered by submission time.
    async fn query(&mut self, query: &ResponseQuery) -> Result<Vec<ResponseWithDetails>, Error>;
    async fn headers(&mut self, query: &ResponseQuery) -> Result<Vec<ResponseHeader>, Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
}

pub trait UserCommon {
    async fn insert(&mut self, data: UserInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<User, Error>;
    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error>;
    async fn query(&mut self) -> Result<Vec<User>, Error>;
    async fn patch(&mut self, id: i32, user: UserPatch) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
}

pub trait Common: SurveyCommon + FormCommon + QuestionCommon + TemplateCommon + ResponseCommon + UserCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

pub trait Manager<'m, S, T>
where
    S: Store,
    T: TxStore,
{
    async fn db(&'m self) -> Result<S, Error>;
    async fn tx(&'m self) -> Result<T, Error>;
}
