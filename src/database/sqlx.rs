use crate::core::models::{
    form::{self, Form},
    question::{self, Question},
    response::{self, DetailInsert, DetailWithQuestion, HeaderInsert, ResponseHeader, ResponseWithDetails},
    survey::{self, Survey},
    template::{self, Template, TemplateQuestion},
    user::{self, User},
};
use crate::core::ports::repository::{Common, FormCommon, Manager, QuestionCommon, ResponseCommon, Store, SurveyCommon, TemplateCommon, TxStore, UserCommon};
use crate::database::models::{
    form::FormRow,
    question::QuestionRow,
    response::{DetailRow, ResponseRow},
    survey::SurveyRow,
    template::{TemplateQuestionRow, TemplateRow},
    user::UserRow,
};
use crate::error::Error;
use itertools::Itertools;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgQueryResult;
use sqlx::types::Json;
use sqlx::{query, query_as, query_scalar, Executor, PgPool, Postgres, QueryBuilder, Transaction};

const UNIQUE_VIOLATION: &str = "23505";

fn conflict_on_unique(e: sqlx::Error, what: String) -> Error {
    let unique = e.as_database_error().and_then(|d| d.code()).map(|c| c == UNIQUE_VIOLATION).unwrap_or(false);
    if unique {
        return Error::Conflict(what);
    }
    Error::DatabaseError(e)
}

fn affected(res: PgQueryResult, what: &str, id: i32) -> Result<(), Error> {
    if res.rows_affected() == 0 {
        return Err(Error::NotFound(format!("{} {}", what, id)));
    }
    Ok(())
}

fn found<R, T>(row: Option<R>, what: &str, id: i32) -> Result<T, Error>
where
    T: TryFrom<R, Error = Error>,
{
    row.ok_or_else(|| Error::NotFound(format!("{} {}", what, id)))?.try_into()
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, Error>
where
    T: TryFrom<R, Error = Error>,
{
    rows.into_iter().map(T::try_from).collect()
}

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E> SurveyCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: survey::Insert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO surveys (title, kind, status, description, location, project_title, proponent, municipality, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id",
        )
        .bind(data.title)
        .bind(data.kind.as_str())
        .bind(data.status.as_str())
        .bind(data.description)
        .bind(data.location)
        .bind(data.project_title)
        .bind(data.proponent)
        .bind(data.municipality)
        .bind(data.start_date)
        .bind(data.end_date)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn update(&mut self, id: i32, data: survey::Update) -> Result<(), Error> {
        let res = query(
            "UPDATE surveys
            SET title = $1, kind = $2, status = $3, description = $4, location = $5, project_title = $6,
                proponent = $7, municipality = $8, start_date = $9, end_date = $10
            WHERE id = $11",
        )
        .bind(data.title)
        .bind(data.kind.as_str())
        .bind(data.status.as_str())
        .bind(data.description)
        .bind(data.location)
        .bind(data.project_title)
        .bind(data.proponent)
        .bind(data.municipality)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(id)
        .execute(&mut self.executor)
        .await?;
        affected(res, "survey", id)
    }

    async fn get(&mut self, id: i32) -> Result<Survey, Error> {
        let row = query_as::<_, SurveyRow>("SELECT * FROM surveys WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        found(row, "survey", id)
    }

    async fn query(&mut self) -> Result<Vec<Survey>, Error> {
        let rows = query_as::<_, SurveyRow>("SELECT * FROM surveys ORDER BY created_at DESC, id DESC").fetch_all(&mut self.executor).await?;
        convert_all(rows)
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        let res = query("DELETE FROM surveys WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        affected(res, "survey", id)
    }
}

impl<E> FormCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: form::Insert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO forms (survey_id, name, description, role, active) VALUES ($1, $2, $3, $4, $5) RETURNING id")
            .bind(data.survey_id)
            .bind(data.name)
            .bind(data.description)
            .bind(data.role.as_str())
            .bind(data.active)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn update(&mut self, id: i32, data: form::Update) -> Result<(), Error> {
        let res = query("UPDATE forms SET name = $1, description = $2, role = $3, active = $4 WHERE id = $5")
            .bind(data.name)
            .bind(data.description)
            .bind(data.role.as_str())
            .bind(data.active)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        affected(res, "form", id)
    }

    async fn get(&mut self, id: i32) -> Result<Form, Error> {
        let row = query_as::<_, FormRow>("SELECT * FROM forms WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        found(row, "form", id)
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Form, Error> {
        let row = query_as::<_, FormRow>("SELECT * FROM forms WHERE id = $1 FOR UPDATE").bind(id).fetch_optional(&mut self.executor).await?;
        found(row, "form", id)
    }

    async fn query(&mut self, query: &form::Query) -> Result<Vec<Form>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM forms WHERE 1 = 1");
        if let Some(survey_id) = query.survey_id_eq {
            stmt.push(" AND survey_id = ").push_bind(survey_id);
        }
        if let Some(active) = query.active_eq {
            stmt.push(" AND active = ").push_bind(active);
        }
        stmt.push(" ORDER BY id");
        let rows: Vec<FormRow> = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        convert_all(rows)
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        let res = query("DELETE FROM forms WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        affected(res, "form", id)
    }
}

impl<E> QuestionCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: question::Insert) -> Result<i32, Error> {
        let position = data.position;
        query_scalar("INSERT INTO questions (form_id, text, answer_kind, required, position, options) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id")
            .bind(data.form_id)
            .bind(data.text)
            .bind(data.answer_kind.as_str())
            .bind(data.required)
            .bind(data.position)
            .bind(Json(data.options))
            .fetch_one(&mut self.executor)
            .await
            .map_err(|e| conflict_on_unique(e, format!("position {} already taken", position)))
    }

    async fn update(&mut self, id: i32, data: question::Update) -> Result<(), Error> {
        let res = query("UPDATE questions SET text = $1, answer_kind = $2, required = $3, options = $4 WHERE id = $5")
            .bind(data.text)
            .bind(data.answer_kind.as_str())
            .bind(data.required)
            .bind(Json(data.options))
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        affected(res, "question", id)
    }

    async fn get(&mut self, id: i32) -> Result<Question, Error> {
        let row = query_as::<_, QuestionRow>("SELECT * FROM questions WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        found(row, "question", id)
    }

    async fn query(&mut self, query: &question::Query) -> Result<Vec<Question>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM questions WHERE 1 = 1");
        if let Some(form_id) = query.form_id_eq {
            stmt.push(" AND form_id = ").push_bind(form_id);
        }
        stmt.push(" ORDER BY form_id, position");
        let rows: Vec<QuestionRow> = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        convert_all(rows)
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        let res = query("DELETE FROM questions WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        affected(res, "question", id)
    }

    async fn max_position(&mut self, form_id: i32) -> Result<Option<i32>, Error> {
        let max = query_scalar("SELECT MAX(position) FROM questions WHERE form_id = $1")
            .bind(form_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(max)
    }
}

impl<E> TemplateCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: template::Insert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO templates (name, description, role) VALUES ($1, $2, $3) RETURNING id")
            .bind(data.name)
            .bind(data.description)
            .bind(data.role.as_str())
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn update(&mut self, id: i32, data: template::Update) -> Result<(), Error> {
        let res = query("UPDATE templates SET name = $1, description = $2, role = $3 WHERE id = $4")
            .bind(data.name)
            .bind(data.description)
            .bind(data.role.as_str())
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        affected(res, "template", id)
    }

    async fn get(&mut self, id: i32) -> Result<Template, Error> {
        let row = query_as::<_, TemplateRow>("SELECT * FROM templates WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        found(row, "template", id)
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Template, Error> {
        let row = query_as::<_, TemplateRow>("SELECT * FROM templates WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        found(row, "template", id)
    }

    async fn query(&mut self) -> Result<Vec<Template>, Error> {
        let rows = query_as::<_, TemplateRow>("SELECT * FROM templates ORDER BY created_at DESC, id DESC").fetch_all(&mut self.executor).await?;
        convert_all(rows)
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        let res = query("DELETE FROM templates WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        affected(res, "template", id)
    }

    async fn questions(&mut self, template_id: i32) -> Result<Vec<TemplateQuestion>, Error> {
        let rows = query_as::<_, TemplateQuestionRow>("SELECT * FROM template_questions WHERE template_id = $1 ORDER BY position")
            .bind(template_id)
            .fetch_all(&mut self.executor)
            .await?;
        convert_all(rows)
    }

    async fn max_question_position(&mut self, template_id: i32) -> Result<Option<i32>, Error> {
        let max = query_scalar("SELECT MAX(position) FROM template_questions WHERE template_id = $1")
            .bind(template_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(max)
    }

    async fn insert_question(&mut self, data: template::QuestionInsert) -> Result<i32, Error> {
        let position = data.position;
        query_scalar(
            "INSERT INTO template_questions (template_id, text, answer_kind, required, position, options)
            VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(data.template_id)
        .bind(data.text)
        .bind(data.answer_kind.as_str())
        .bind(data.required)
        .bind(data.position)
        .bind(Json(data.options))
        .fetch_one(&mut self.executor)
        .await
        .map_err(|e| conflict_on_unique(e, format!("position {} already taken", position)))
    }

    async fn get_question(&mut self, id: i32) -> Result<TemplateQuestion, Error> {
        let row = query_as::<_, TemplateQuestionRow>("SELECT * FROM template_questions WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        found(row, "template question", id)
    }

    async fn delete_question(&mut self, id: i32) -> Result<(), Error> {
        let res = query("DELETE FROM template_questions WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        affected(res, "template question", id)
    }
}

fn push_response_filters(stmt: &mut QueryBuilder<Postgres>, query: &response::Query) {
    if let Some(survey_id) = query.survey_id_eq {
        stmt.push(" AND survey_id = ").push_bind(survey_id);
    }
    if let Some(form_id) = query.form_id_eq {
        stmt.push(" AND form_id = ").push_bind(form_id);
    }
    if let Some(since) = query.submitted_since {
        stmt.push(" AND submitted_at >= ").push_bind(since);
    }
    if query.newest_first {
        stmt.push(" ORDER BY submitted_at DESC, id DESC");
    } else {
        stmt.push(" ORDER BY submitted_at, id");
    }
}

impl<E> ResponseCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: HeaderInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO responses (form_id, survey_id, submitted_at, ip, user_agent) VALUES ($1, $2, $3, $4, $5) RETURNING id")
            .bind(data.form_id)
            .bind(data.survey_id)
            .bind(data.submitted_at)
            .bind(data.ip)
            .bind(data.user_agent)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn bulk_insert_details(&mut self, details: Vec<DetailInsert>) -> Result<(), Error> {
        if details.is_empty() {
            return Ok(());
        }
        let mut stmt = QueryBuilder::new("INSERT INTO response_details (response_id, question_id, text_value, number_value, date_value, option_value) ");
        stmt.push_values(details, |mut b, d| {
            let slots = d.value.into_slots();
            b.push_bind(d.response_id)
                .push_bind(d.question_id)
                .push_bind(slots.text_value)
                .push_bind(slots.number_value)
                .push_bind(slots.date_value)
                .push_bind(slots.option_value);
        });
        stmt.build().execute(&mut self.executor).await?;
        Ok(())
    }

    async fn query(&mut self, query: &response::Query) -> Result<Vec<ResponseWithDetails>, Error> {
        let headers = ResponseCommon::headers(self, query).await?;
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = headers.iter().map(|h| h.id).collect();
        let rows = query_as::<_, DetailRow>(
            "SELECT
                d.id, d.response_id, d.question_id,
                q.text AS question_text, q.answer_kind,
                d.text_value, d.number_value, d.date_value, d.option_value
            FROM response_details AS d
            JOIN questions AS q ON q.id = d.question_id
            WHERE d.response_id = ANY($1)
            ORDER BY d.response_id, q.position, d.id",
        )
        .bind(&ids)
        .fetch_all(&mut self.executor)
        .await?;
        let mut details = rows.into_iter().map(|r| (r.response_id, DetailWithQuestion::from(r))).into_group_map();
        Ok(headers
            .into_iter()
            .map(|header| ResponseWithDetails {
                details: details.remove(&header.id).unwrap_or_default(),
                header,
            })
            .collect())
    }

    async fn headers(&mut self, query: &response::Query) -> Result<Vec<ResponseHeader>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM responses WHERE 1 = 1");
        push_response_filters(&mut stmt, query);
        let rows: Vec<ResponseRow> = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(rows.into_iter().map(ResponseHeader::from).collect())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        let res = query("DELETE FROM responses WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        affected(res, "response", id)
    }
}

impl<E> UserCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: user::Insert) -> Result<i32, Error> {
        let email = data.email.clone();
        query_scalar("INSERT INTO users (name, email, password, salt, role) VALUES ($1, $2, $3, $4, $5) RETURNING id")
            .bind(data.name)
            .bind(data.email)
            .bind(data.password)
            .bind(data.salt)
            .bind(data.role.as_str())
            .fetch_one(&mut self.executor)
            .await
            .map_err(|e| conflict_on_unique(e, format!("email {} already registered", email)))
    }

    async fn get(&mut self, id: i32) -> Result<User, Error> {
        let row = query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        found(row, "user", id)
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error> {
        let row = query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(&mut self.executor).await?;
        row.map(User::try_from).transpose()
    }

    async fn query(&mut self) -> Result<Vec<User>, Error> {
        let rows = query_as::<_, UserRow>("SELECT * FROM users ORDER BY id").fetch_all(&mut self.executor).await?;
        convert_all(rows)
    }

    async fn patch(&mut self, id: i32, user: user::Patch) -> Result<(), Error> {
        let email = user.email.clone();
        let mut stmt = QueryBuilder::new("UPDATE users SET id = id");
        if let Some(name) = user.name {
            stmt.push(", name = ").push_bind(name);
        }
        if let Some(email) = user.email {
            stmt.push(", email = ").push_bind(email);
        }
        if let Some(password) = user.password {
            stmt.push(", password = ").push_bind(password);
        }
        if let Some(salt) = user.salt {
            stmt.push(", salt = ").push_bind(salt);
        }
        if let Some(role) = user.role {
            stmt.push(", role = ").push_bind(role.as_str());
        }
        stmt.push(" WHERE id = ").push_bind(id);
        let res = stmt
            .build()
            .execute(&mut self.executor)
            .await
            .map_err(|e| conflict_on_unique(e, format!("email {} already registered", email.unwrap_or_default())))?;
        affected(res, "user", id)
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        let res = query("DELETE FROM users WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        affected(res, "user", id)
    }
}

impl Common for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Common for PgSqlx<Transaction<'a, Postgres>> {}
impl Store for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Store for PgSqlx<Transaction<'a, Postgres>> {}

impl<'a> TxStore for PgSqlx<Transaction<'a, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn begin(&self) -> Result<PgSqlx<Transaction<'static, Postgres>>, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx { executor: tx })
    }

    pub async fn acquire(&self) -> Result<PgSqlx<PoolConnection<Postgres>>, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx { executor: conn })
    }
}

impl<'a> Manager<'a, PgSqlx<PoolConnection<Postgres>>, PgSqlx<Transaction<'static, Postgres>>> for PgSqlxManager {
    async fn db(&'a self) -> Result<PgSqlx<PoolConnection<Postgres>>, Error> {
        self.acquire().await
    }

    async fn tx(&'a self) -> Result<PgSqlx<Transaction<'static, Postgres>>, Error> {
        self.begin().await
    }
}
