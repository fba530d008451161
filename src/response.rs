use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct List<T> {
    list: Vec<T>,
    total: i64,
}

impl<T> List<T> {
    pub fn new(list: Vec<T>, total: i64) -> Self {
        List { list, total }
    }
}

impl<T> From<Vec<T>> for List<T> {
    fn from(list: Vec<T>) -> Self {
        let total = list.len() as i64;
        List { list, total }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub id: i32,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: usize,
}
