use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

pub const OK: i64 = 200;
pub const LOGIN_OK: i64 = 20000;
pub const TOKEN_EXPIRED: i64 = 50014;
pub const BAD_CREDENTIALS: i64 = 60204;
pub const TODO_NOT_FOUND: i64 = 40400;

pub const USERNAME: &str = "coder";
pub const PASSWORD: &str = "123456";

pub const HOUSES_PER_PAGE: u32 = 3;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    fn ok(data: T) -> Json<Self> {
        Self::with_code(OK, data)
    }

    fn with_code(code: i64, data: T) -> Json<Self> {
        Json(Self {
            code,
            data: Some(data),
            message: None,
        })
    }

    fn fail(code: i64, message: &str) -> Json<Self> {
        Json(Self {
            code,
            data: None,
            message: Some(message.to_string()),
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HotSuggest {
    #[serde(rename = "tagText")]
    pub tag_text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct House {
    pub id: u32,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HousePage {
    pub page: u32,
    pub items: Vec<House>,
}

#[derive(Deserialize)]
pub struct HouseQuery {
    pub page: Option<u32>,
}

#[derive(Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Token {
    pub token: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Deserialize)]
pub struct SlowQuery {
    #[serde(default)]
    pub ms: u64,
}

#[derive(Default)]
pub struct Store {
    todos: RwLock<HashMap<Uuid, Todo>>,
    sessions: RwLock<HashSet<String>>,
}

pub type Db = Arc<Store>;

pub fn app() -> Router {
    let db: Db = Arc::new(Store::default());
    Router::new()
        .route("/home/hotSuggests", get(hot_suggests))
        .route("/home/houselist", get(house_list))
        .route("/login", post(login))
        .route("/user/info", get(user_info))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).patch(update_todo).delete(delete_todo))
        .route("/slow", get(slow))
        .route("/status/{code}", get(raw_status))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn hot_suggests() -> Json<Envelope<Vec<HotSuggest>>> {
    let tags = ["seaside", "downtown", "pet friendly"];
    Envelope::ok(
        tags.iter()
            .map(|t| HotSuggest {
                tag_text: t.to_string(),
            })
            .collect(),
    )
}

async fn house_list(Query(query): Query<HouseQuery>) -> Json<Envelope<HousePage>> {
    let page = query.page.unwrap_or(1).max(1);
    let first = (page - 1).saturating_mul(HOUSES_PER_PAGE);
    let items = (first..first.saturating_add(HOUSES_PER_PAGE))
        .map(|id| House {
            id,
            name: format!("house-{id}"),
        })
        .collect();
    Envelope::ok(HousePage { page, items })
}

async fn login(State(db): State<Db>, Json(input): Json<Login>) -> Json<Envelope<Token>> {
    if input.username != USERNAME || input.password != PASSWORD {
        debug!(username = %input.username, "rejected login");
        return Envelope::fail(BAD_CREDENTIALS, "Account and password are incorrect.");
    }
    let token = Uuid::new_v4().to_string();
    db.sessions.write().await.insert(token.clone());
    Envelope::with_code(LOGIN_OK, Token { token })
}

async fn user_info(State(db): State<Db>, headers: HeaderMap) -> Json<Envelope<UserInfo>> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    let valid = match token {
        Some(token) => db.sessions.read().await.contains(token),
        None => false,
    };
    if !valid {
        return Envelope::fail(TOKEN_EXPIRED, "Token expired");
    }
    Envelope::ok(UserInfo {
        name: USERNAME.to_string(),
    })
}

async fn list_todos(State(db): State<Db>) -> Json<Envelope<Vec<Todo>>> {
    let todos = db.todos.read().await;
    Envelope::ok(todos.values().cloned().collect())
}

async fn create_todo(State(db): State<Db>, Json(input): Json<CreateTodo>) -> Json<Envelope<Todo>> {
    let todo = Todo {
        id: Uuid::new_v4(),
        title: input.title,
        completed: input.completed,
    };
    db.todos.write().await.insert(todo.id, todo.clone());
    Envelope::ok(todo)
}

async fn get_todo(State(db): State<Db>, Path(id): Path<Uuid>) -> Json<Envelope<Todo>> {
    let todos = db.todos.read().await;
    match todos.get(&id) {
        Some(todo) => Envelope::ok(todo.clone()),
        None => Envelope::fail(TODO_NOT_FOUND, "todo not found"),
    }
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTodo>,
) -> Json<Envelope<Todo>> {
    let mut todos = db.todos.write().await;
    let Some(todo) = todos.get_mut(&id) else {
        return Envelope::fail(TODO_NOT_FOUND, "todo not found");
    };
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    Envelope::ok(todo.clone())
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<Uuid>) -> Json<Envelope<()>> {
    let mut todos = db.todos.write().await;
    match todos.remove(&id) {
        Some(_) => Json(Envelope {
            code: OK,
            data: None,
            message: None,
        }),
        None => Envelope::fail(TODO_NOT_FOUND, "todo not found"),
    }
}

async fn slow(Query(query): Query<SlowQuery>) -> Json<Envelope<String>> {
    tokio::time::sleep(Duration::from_millis(query.ms)).await;
    Envelope::ok("done".to_string())
}

async fn raw_status(Path(code): Path<u16>) -> (StatusCode, String) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, format!("status {}", status.as_u16()))
}
