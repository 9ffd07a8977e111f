//! reqwest implementation of the remote gateway

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::{
    config::RemoteConfig,
    models::{
        id::id_from_value, Author, Book, EntityId, NewAuthor, NewBook, NewPrize, NewReview, Prize,
        Review,
    },
};

use super::{RemoteError, RemoteGateway, RemoteResult};

#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Option<String>,
}

impl HttpGateway {
    pub fn new(config: &RemoteConfig) -> RemoteResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let base_url = config.base_url();
        match &base_url {
            Some(url) => tracing::info!("Remote catalog at {}", url),
            None => tracing::info!("No remote catalog configured, using local storage only"),
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    fn url(&self, path: &str) -> RemoteResult<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}{}", base, path))
            .ok_or(RemoteError::NotConfigured)
    }

    /// Send a request and turn non-success statuses into errors
    async fn send(&self, request: RequestBuilder) -> RemoteResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn fetch_json(&self, request: RequestBuilder) -> RemoteResult<Value> {
        let response = self.send(request).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn fetch_array(&self, request: RequestBuilder) -> RemoteResult<Vec<Value>> {
        match self.fetch_json(request).await? {
            Value::Array(items) => Ok(items),
            other => Err(RemoteError::Decode(format!("expected an array, got {}", kind(&other)))),
        }
    }

    /// POST/PUT returning the stored entity, which must carry an id
    async fn fetch_entity(&self, request: RequestBuilder) -> RemoteResult<Value> {
        let value = self.fetch_json(request).await?;
        check_entity_id(value.get("id"))?;
        Ok(value)
    }
}

/// A created entity's id must be an integer, or a string holding one
fn check_entity_id(id: Option<&Value>) -> RemoteResult<()> {
    let valid = match id {
        Some(Value::Number(n)) => n.as_i64().is_some(),
        Some(Value::String(s)) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(RemoteError::Decode(format!(
            "response carries no usable id: {}",
            id.map(Value::to_string).unwrap_or_else(|| "missing".to_string())
        )))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    async fn list_authors(&self) -> RemoteResult<Vec<Author>> {
        let url = self.url("/authors")?;
        let items = self.fetch_array(self.client.get(url)).await?;
        Ok(items.iter().map(Author::from_value).collect())
    }

    async fn get_author(&self, id: EntityId) -> RemoteResult<Author> {
        let url = self.url(&format!("/authors/{}", id))?;
        let value = self.fetch_json(self.client.get(url)).await?;
        Ok(Author::from_value(&value))
    }

    async fn create_author(&self, author: &NewAuthor) -> RemoteResult<Author> {
        let url = self.url("/authors")?;
        let value = self.fetch_entity(self.client.post(url).json(author)).await?;
        Ok(Author::from_value(&value))
    }

    async fn update_author(&self, id: EntityId, author: &NewAuthor) -> RemoteResult<Author> {
        let url = self.url(&format!("/authors/{}", id))?;
        let value = self.fetch_json(self.client.put(url).json(author)).await?;
        let mut updated = Author::from_value(&value);
        updated.id = id;
        Ok(updated)
    }

    async fn delete_author(&self, id: EntityId) -> RemoteResult<()> {
        let url = self.url(&format!("/authors/{}", id))?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn list_books(&self) -> RemoteResult<Vec<Book>> {
        let url = self.url("/books")?;
        let items = self.fetch_array(self.client.get(url)).await?;
        Ok(items.iter().map(Book::from_value).collect())
    }

    async fn get_book(&self, id: EntityId) -> RemoteResult<Value> {
        let url = self.url(&format!("/books/{}", id))?;
        match self.fetch_json(self.client.get(url)).await? {
            value @ Value::Object(_) => Ok(value),
            other => Err(RemoteError::Decode(format!("expected a book, got {}", kind(&other)))),
        }
    }

    async fn create_book(&self, book: &NewBook) -> RemoteResult<Book> {
        let url = self.url("/books")?;
        let value = self.fetch_entity(self.client.post(url).json(book)).await?;
        Ok(Book::from_value(&value))
    }

    async fn update_book(&self, id: EntityId, book: &NewBook) -> RemoteResult<Book> {
        let url = self.url(&format!("/books/{}", id))?;
        let value = self.fetch_json(self.client.put(url).json(book)).await?;
        let mut updated = Book::from_value(&value);
        updated.id = id;
        Ok(updated)
    }

    async fn associate_book(&self, author_id: EntityId, book_id: EntityId) -> RemoteResult<()> {
        let url = self.url(&format!("/authors/{}/books/{}", author_id, book_id))?;
        self.send(self.client.post(url)).await?;
        Ok(())
    }

    async fn list_reviews(&self, book_id: EntityId) -> RemoteResult<Vec<Review>> {
        let url = self.url(&format!("/books/{}/reviews", book_id))?;
        let items = self.fetch_array(self.client.get(url)).await?;
        Ok(items.iter().map(Review::from_value).collect())
    }

    async fn create_review(&self, book_id: EntityId, review: &NewReview) -> RemoteResult<Option<Review>> {
        let url = self.url(&format!("/books/{}/reviews", book_id))?;
        let response = self.send(self.client.post(url).json(review)).await?;
        let stored = response
            .json::<Value>()
            .await
            .ok()
            .filter(Value::is_object)
            .map(|value| Review::from_value(&value));
        Ok(stored)
    }

    async fn create_prize(&self, prize: &NewPrize) -> RemoteResult<Prize> {
        let url = self.url("/prizes")?;
        let value = self.fetch_entity(self.client.post(url).json(prize)).await?;
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| prize.name.clone());
        let premiation_date = value
            .get("premiationDate")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| prize.premiation_date.clone());
        Ok(Prize {
            id: id_from_value(value.get("id")),
            name,
            premiation_date,
        })
    }

    async fn associate_prize(&self, prize_id: EntityId, author_id: EntityId) -> RemoteResult<()> {
        let url = self.url(&format!("/prizes/{}/author/{}", prize_id, author_id))?;
        self.send(self.client.post(url)).await?;
        Ok(())
    }
}
