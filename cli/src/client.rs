use anyhow::{anyhow, bail, Context, Result};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use todo_core::{NewTodo, Status, Todo, TodoPatch};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Thin blocking client for the todo HTTP API.
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn create(&self, input: &NewTodo) -> Result<Todo> {
        let resp = self
            .http
            .post(self.url("todos"))
            .json(input)
            .send()
            .context("Failed to reach server")?;
        read_json(resp)
    }

    pub fn list(&self) -> Result<Vec<Todo>> {
        let resp = self
            .http
            .get(self.url("todos"))
            .send()
            .context("Failed to reach server")?;
        read_json(resp)
    }

    pub fn get(&self, id: &str) -> Result<Todo> {
        let resp = self
            .http
            .get(self.url(&format!("todos/{}", id)))
            .send()
            .context("Failed to reach server")?;
        read_json(resp)
    }

    pub fn update(&self, id: &str, patch: &TodoPatch) -> Result<Todo> {
        let resp = self
            .http
            .put(self.url(&format!("todos/{}", id)))
            .json(patch)
            .send()
            .context("Failed to reach server")?;
        read_json(resp)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("todos/{}", id)))
            .send()
            .context("Failed to reach server")?;
        check_status(resp).map(|_| ())
    }

    pub fn filter(&self, status: Status) -> Result<Vec<Todo>> {
        let resp = self
            .http
            .get(self.url("todos/filter"))
            .query(&[("status", status.as_str())])
            .send()
            .context("Failed to reach server")?;
        read_json(resp)
    }
}

fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::NOT_FOUND {
        bail!("Todo not found");
    }
    let message = resp
        .json::<ErrorBody>()
        .map(|b| b.message)
        .unwrap_or_else(|_| status.to_string());
    Err(anyhow!("Server returned {}: {}", status.as_u16(), message))
}

fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    check_status(resp)?
        .json()
        .context("Failed to decode server response")
}
