//! In-memory store backing the service tests.

use crate::core::models::{
    form::{self, Form},
    question::{self, Question},
    response::{self, AnswerValue, DetailInsert, DetailWithQuestion, HeaderInsert, QuestionRef, ResponseHeader, ResponseWithDetails},
    survey::{self, Survey},
    template::{self, Template, TemplateQuestion},
    user::{self, User},
};
use crate::core::ports::repository::{Common, FormCommon, QuestionCommon, ResponseCommon, Store, SurveyCommon, TemplateCommon, TxStore, UserCommon};
use crate::error::Error;
use chrono::Utc;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct StoredDetail {
    pub id: i32,
    pub response_id: i32,
    pub question_id: i32,
    /// `None` stands for a row whose value slots are unusable.
    pub value: Option<AnswerValue>,
}

#[derive(Debug, Clone, Default)]
pub struct MemData {
    seq: i32,
    pub surveys: Vec<Survey>,
    pub forms: Vec<Form>,
    pub questions: Vec<Question>,
    pub templates: Vec<Template>,
    pub template_questions: Vec<TemplateQuestion>,
    pub responses: Vec<ResponseHeader>,
    pub details: Vec<StoredDetail>,
    pub users: Vec<User>,
}

impl MemData {
    fn next_id(&mut self) -> i32 {
        self.seq += 1;
        self.seq
    }

    fn delete_responses(&mut self, keep: impl Fn(&ResponseHeader) -> bool) {
        self.responses.retain(|r| keep(r));
        let ids: Vec<i32> = self.responses.iter().map(|r| r.id).collect();
        self.details.retain(|d| ids.contains(&d.response_id));
    }

    fn delete_forms(&mut self, keep: impl Fn(&Form) -> bool) {
        self.forms.retain(|f| keep(f));
        let ids: Vec<i32> = self.forms.iter().map(|f| f.id).collect();
        self.questions.retain(|q| ids.contains(&q.form_id));
        self.delete_responses(|r| ids.contains(&r.form_id));
        let question_ids: Vec<i32> = self.questions.iter().map(|q| q.id).collect();
        self.details.retain(|d| question_ids.contains(&d.question_id));
    }
}

fn not_found(what: &str, id: i32) -> Error {
    Error::NotFound(format!("{} {}", what, id))
}

/// Cheap handle over shared data. A transaction works on a private copy that
/// `commit` writes back; dropping it without commit discards the copy.
#[derive(Debug, Default)]
pub struct MemStore {
    shared: Rc<RefCell<MemData>>,
    pending: Option<MemData>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn db(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            pending: None,
        }
    }

    pub fn tx(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            pending: Some(self.shared.borrow().clone()),
        }
    }

    pub fn with<R>(&mut self, f: impl FnOnce(&mut MemData) -> R) -> R {
        match &mut self.pending {
            Some(data) => f(data),
            None => f(&mut self.shared.borrow_mut()),
        }
    }
}

impl SurveyCommon for MemStore {
    async fn insert(&mut self, data: survey::Insert) -> Result<i32, Error> {
        Ok(self.with(|d| {
            let id = d.next_id();
            d.surveys.push(Survey {
                id,
                title: data.title,
                kind: data.kind,
                status: data.status,
                description: data.description,
                location: data.location,
                project_title: data.project_title,
                proponent: data.proponent,
                municipality: data.municipality,
                start_date: data.start_date,
                end_date: data.end_date,
                created_at: Utc::now(),
            });
            id
        }))
    }

    async fn update(&mut self, id: i32, data: survey::Update) -> Result<(), Error> {
        self.with(|d| {
            let s = d.surveys.iter_mut().find(|s| s.id == id).ok_or_else(|| not_found("survey", id))?;
            s.title = data.title;
            s.kind = data.kind;
            s.status = data.status;
            s.description = data.description;
            s.location = data.location;
            s.project_title = data.project_title;
            s.proponent = data.proponent;
            s.municipality = data.municipality;
            s.start_date = data.start_date;
            s.end_date = data.end_date;
            Ok(())
        })
    }

    async fn get(&mut self, id: i32) -> Result<Survey, Error> {
        self.with(|d| d.surveys.iter().find(|s| s.id == id).cloned().ok_or_else(|| not_found("survey", id)))
    }

    async fn query(&mut self) -> Result<Vec<Survey>, Error> {
        Ok(self.with(|d| d.surveys.iter().rev().cloned().collect()))
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.with(|d| {
            if !d.surveys.iter().any(|s| s.id == id) {
                return Err(not_found("survey", id));
            }
            d.surveys.retain(|s| s.id != id);
            d.delete_forms(|f| f.survey_id != id);
            d.delete_responses(|r| r.survey_id != id);
            Ok(())
        })
    }
}

impl FormCommon for MemStore {
    async fn insert(&mut self, data: form::Insert) -> Result<i32, Error> {
        self.with(|d| {
            if !d.surveys.iter().any(|s| s.id == data.survey_id) {
                return Err(not_found("survey", data.survey_id));
            }
            let id = d.next_id();
            d.forms.push(Form {
                id,
                survey_id: data.survey_id,
                name: data.name,
                description: data.description,
                role: data.role,
                active: data.active,
                created_at: Utc::now(),
            });
            Ok(id)
        })
    }

    async fn update(&mut self, id: i32, data: form::Update) -> Result<(), Error> {
        self.with(|d| {
            let f = d.forms.iter_mut().find(|f| f.id == id).ok_or_else(|| not_found("form", id))?;
            f.name = data.name;
            f.description = data.description;
            f.role = data.role;
            f.active = data.active;
            Ok(())
        })
    }

    async fn get(&mut self, id: i32) -> Result<Form, Error> {
        self.with(|d| d.forms.iter().find(|f| f.id == id).cloned().ok_or_else(|| not_found("form", id)))
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Form, Error> {
        FormCommon::get(self, id).await
    }

    async fn query(&mut self, query: &form::Query) -> Result<Vec<Form>, Error> {
        Ok(self.with(|d| {
            d.forms
                .iter()
                .filter(|f| query.survey_id_eq.map_or(true, |id| f.survey_id == id))
                .filter(|f| query.active_eq.map_or(true, |a| f.active == a))
                .cloned()
                .collect()
        }))
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.with(|d| {
            if !d.forms.iter().any(|f| f.id == id) {
                return Err(not_found("form", id));
            }
            d.delete_forms(|f| f.id != id);
            Ok(())
        })
    }
}

impl QuestionCommon for MemStore {
    async fn insert(&mut self, data: question::Insert) -> Result<i32, Error> {
        self.with(|d| {
            if !d.forms.iter().any(|f| f.id == data.form_id) {
                return Err(not_found("form", data.form_id));
            }
            if d.questions.iter().any(|q| q.form_id == data.form_id && q.position == data.position) {
                return Err(Error::Conflict(format!("position {} already taken", data.position)));
            }
            let id = d.next_id();
            d.questions.push(Question {
                id,
                form_id: data.form_id,
                text: data.text,
                answer_kind: data.answer_kind,
                required: data.required,
                position: data.position,
                options: data.options,
            });
            Ok(id)
        })
    }

    async fn update(&mut self, id: i32, data: question::Update) -> Result<(), Error> {
        self.with(|d| {
            let q = d.questions.iter_mut().find(|q| q.id == id).ok_or_else(|| not_found("question", id))?;
            q.text = data.text;
            q.answer_kind = data.answer_kind;
            q.required = data.required;
            q.options = data.options;
            Ok(())
        })
    }

    async fn get(&mut self, id: i32) -> Result<Question, Error> {
        self.with(|d| d.questions.iter().find(|q| q.id == id).cloned().ok_or_else(|| not_found("question", id)))
    }

    async fn query(&mut self, query: &question::Query) -> Result<Vec<Question>, Error> {
        Ok(self.with(|d| {
            let mut questions: Vec<Question> = d
                .questions
                .iter()
                .filter(|q| query.form_id_eq.map_or(true, |id| q.form_id == id))
                .cloned()
                .collect();
            questions.sort_by_key(|q| (q.form_id, q.position));
            questions
        }))
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.with(|d| {
            if !d.questions.iter().any(|q| q.id == id) {
                return Err(not_found("question", id));
            }
            d.questions.retain(|q| q.id != id);
            d.details.retain(|dt| dt.question_id != id);
            Ok(())
        })
    }

    async fn max_position(&mut self, form_id: i32) -> Result<Option<i32>, Error> {
        Ok(self.with(|d| d.questions.iter().filter(|q| q.form_id == form_id).map(|q| q.position).max()))
    }
}

impl TemplateCommon for MemStore {
    async fn insert(&mut self, data: template::Insert) -> Result<i32, Error> {
        Ok(self.with(|d| {
            let id = d.next_id();
            d.templates.push(Template {
                id,
                name: data.name,
                description: data.description,
                role: data.role,
                created_at: Utc::now(),
            });
            id
        }))
    }

    async fn update(&mut self, id: i32, data: template::Update) -> Result<(), Error> {
        self.with(|d| {
            let t = d.templates.iter_mut().find(|t| t.id == id).ok_or_else(|| not_found("template", id))?;
            t.name = data.name;
            t.description = data.description;
            t.role = data.role;
            Ok(())
        })
    }

    async fn get(&mut self, id: i32) -> Result<Template, Error> {
        self.with(|d| d.templates.iter().find(|t| t.id == id).cloned().ok_or_else(|| not_found("template", id)))
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Template, Error> {
        TemplateCommon::get(self, id).await
    }

    async fn query(&mut self) -> Result<Vec<Template>, Error> {
        Ok(self.with(|d| d.templates.iter().rev().cloned().collect()))
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.with(|d| {
            if !d.templates.iter().any(|t| t.id == id) {
                return Err(not_found("template", id));
            }
            d.templates.retain(|t| t.id != id);
            d.template_questions.retain(|q| q.template_id != id);
            Ok(())
        })
    }

    async fn questions(&mut self, template_id: i32) -> Result<Vec<TemplateQuestion>, Error> {
        Ok(self.with(|d| {
            let mut questions: Vec<TemplateQuestion> = d.template_questions.iter().filter(|q| q.template_id == template_id).cloned().collect();
            questions.sort_by_key(|q| q.position);
            questions
        }))
    }

    async fn max_question_position(&mut self, template_id: i32) -> Result<Option<i32>, Error> {
        Ok(self.with(|d| d.template_questions.iter().filter(|q| q.template_id == template_id).map(|q| q.position).max()))
    }

    async fn insert_question(&mut self, data: template::QuestionInsert) -> Result<i32, Error> {
        self.with(|d| {
            if !d.templates.iter().any(|t| t.id == data.template_id) {
                return Err(not_found("template", data.template_id));
            }
            let id = d.next_id();
            d.template_questions.push(TemplateQuestion {
                id,
                template_id: data.template_id,
                text: data.text,
                answer_kind: data.answer_kind,
                required: data.required,
                position: data.position,
                options: data.options,
            });
            Ok(id)
        })
    }

    async fn get_question(&mut self, id: i32) -> Result<TemplateQuestion, Error> {
        self.with(|d| d.template_questions.iter().find(|q| q.id == id).cloned().ok_or_else(|| not_found("template question", id)))
    }

    async fn delete_question(&mut self, id: i32) -> Result<(), Error> {
        self.with(|d| {
            if !d.template_questions.iter().any(|q| q.id == id) {
                return Err(not_found("template question", id));
            }
            d.template_questions.retain(|q| q.id != id);
            Ok(())
        })
    }
}

fn matches(query: &response::Query, r: &ResponseHeader) -> bool {
    query.survey_id_eq.map_or(true, |id| r.survey_id == id)
        && query.form_id_eq.map_or(true, |id| r.form_id == id)
        && query.submitted_since.map_or(true, |since| r.submitted_at >= since)
}

impl ResponseCommon for MemStore {
    async fn insert(&mut self, data: HeaderInsert) -> Result<i32, Error> {
        Ok(self.with(|d| {
            let id = d.next_id();
            d.responses.push(ResponseHeader {
                id,
                form_id: data.form_id,
                survey_id: data.survey_id,
                submitted_at: data.submitted_at,
                ip: data.ip,
                user_agent: data.user_agent,
            });
            id
        }))
    }

    async fn bulk_insert_details(&mut self, details: Vec<DetailInsert>) -> Result<(), Error> {
        self.with(|d| {
            for detail in details {
                let id = d.next_id();
                d.details.push(StoredDetail {
                    id,
                    response_id: detail.response_id,
                    question_id: detail.question_id,
                    value: Some(detail.value),
                });
            }
        });
        Ok(())
    }

    async fn query(&mut self, query: &response::Query) -> Result<Vec<ResponseWithDetails>, Error> {
        let headers = ResponseCommon::headers(self, query).await?;
        Ok(self.with(|d| {
            headers
                .into_iter()
                .map(|header| {
                    let details = d
                        .details
                        .iter()
                        .filter(|dt| dt.response_id == header.id)
                        .filter_map(|dt| {
                            let q = d.questions.iter().find(|q| q.id == dt.question_id)?;
                            Some(DetailWithQuestion {
                                id: dt.id,
                                question: QuestionRef {
                                    id: q.id,
                                    text: q.text.clone(),
                                    answer_kind: Some(q.answer_kind),
                                },
                                value: dt.value.clone(),
                            })
                        })
                        .collect();
                    ResponseWithDetails { header, details }
                })
                .collect()
        }))
    }

    async fn headers(&mut self, query: &response::Query) -> Result<Vec<ResponseHeader>, Error> {
        Ok(self.with(|d| {
            let mut headers: Vec<ResponseHeader> = d.responses.iter().filter(|r| matches(query, r)).cloned().collect();
            headers.sort_by_key(|r| (r.submitted_at, r.id));
            if query.newest_first {
                headers.reverse();
            }
            headers
        }))
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.with(|d| {
            if !d.responses.iter().any(|r| r.id == id) {
                return Err(not_found("response", id));
            }
            d.delete_responses(|r| r.id != id);
            Ok(())
        })
    }
}

impl UserCommon for MemStore {
    async fn insert(&mut self, data: user::Insert) -> Result<i32, Error> {
        self.with(|d| {
            if d.users.iter().any(|u| u.email == data.email) {
                return Err(Error::Conflict(format!("email {} already registered", data.email)));
            }
            let id = d.next_id();
            d.users.push(User {
                id,
                name: data.name,
                email: data.email,
                password: data.password,
                salt: data.salt,
                role: data.role,
                created_at: Utc::now(),
            });
            Ok(id)
        })
    }

    async fn get(&mut self, id: i32) -> Result<User, Error> {
        self.with(|d| d.users.iter().find(|u| u.id == id).cloned().ok_or_else(|| not_found("user", id)))
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error> {
        Ok(self.with(|d| d.users.iter().find(|u| u.email == email).cloned()))
    }

    async fn query(&mut self) -> Result<Vec<User>, Error> {
        Ok(self.with(|d| d.users.clone()))
    }

    async fn patch(&mut self, id: i32, user: user::Patch) -> Result<(), Error> {
        self.with(|d| {
            let u = d.users.iter_mut().find(|u| u.id == id).ok_or_else(|| not_found("user", id))?;
            if let Some(name) = user.name {
                u.name = name;
            }
            if let Some(email) = user.email {
                u.email = email;
            }
            if let Some(password) = user.password {
                u.password = password;
            }
            if let Some(salt) = user.salt {
                u.salt = salt;
            }
            if let Some(role) = user.role {
                u.role = role;
            }
            Ok(())
        })
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.with(|d| {
            if !d.users.iter().any(|u| u.id == id) {
                return Err(not_found("user", id));
            }
            d.users.retain(|u| u.id != id);
            Ok(())
        })
    }
}

impl Common for MemStore {}
impl Store for MemStore {}

impl TxStore for MemStore {
    async fn commit(mut self) -> Result<(), Error> {
        if let Some(data) = self.pending.take() {
            *self.shared.borrow_mut() = data;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}
