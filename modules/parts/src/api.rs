use client_core::{ClientError, HttpClient};
use pagination::{Page, PageRequest};

use crate::{CreatePart, Part, PartType, UpdatePart};

/// Endpoint surface of the `/parts` resource.
///
/// Pure request shaping: URL construction and query encoding only. Errors
/// propagate from the HTTP wrapper unchanged; the store decides what to do
/// with them.
#[derive(Clone, Debug)]
pub struct PartsApi {
    http: HttpClient,
}

impl PartsApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, request: &PageRequest) -> Result<Page<Part>, ClientError> {
        self.http.get_query("/parts", &request.to_query()).await
    }

    pub async fn get(&self, id: i64) -> Result<Part, ClientError> {
        self.http.get(&format!("/parts/{id}")).await
    }

    pub async fn by_type(&self, part_type: PartType) -> Result<Vec<Part>, ClientError> {
        self.http
            .get(&format!("/parts/type/{}", part_type.as_str()))
            .await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Part>, ClientError> {
        self.http
            .get(&format!("/parts/search?q={}", urlencoding::encode(query)))
            .await
    }

    pub async fn create(&self, part: &CreatePart) -> Result<Part, ClientError> {
        self.http.post("/parts", part).await
    }

    pub async fn update(&self, id: i64, patch: &UpdatePart) -> Result<Part, ClientError> {
        self.http.put(&format!("/parts/{id}"), patch).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.http.delete(&format!("/parts/{id}")).await
    }
}
