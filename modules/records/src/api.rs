use client_core::{ClientError, HttpClient};
use pagination::{Page, PageRequest};

use crate::{CreateRecord, Genre, UpdateRecord, VinylRecord};

/// Endpoint surface of the `/records` resource. Pure request shaping; errors
/// propagate from the HTTP wrapper unchanged.
#[derive(Clone, Debug)]
pub struct RecordsApi {
    http: HttpClient,
}

impl RecordsApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, request: &PageRequest) -> Result<Page<VinylRecord>, ClientError> {
        self.http.get_query("/records", &request.to_query()).await
    }

    pub async fn get(&self, id: i64) -> Result<VinylRecord, ClientError> {
        self.http.get(&format!("/records/{id}")).await
    }

    pub async fn by_genre(&self, genre: Genre) -> Result<Vec<VinylRecord>, ClientError> {
        self.http
            .get(&format!("/records/genre/{}", genre.as_str()))
            .await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<VinylRecord>, ClientError> {
        self.http
            .get(&format!("/records/search?q={}", urlencoding::encode(query)))
            .await
    }

    pub async fn create(&self, record: &CreateRecord) -> Result<VinylRecord, ClientError> {
        self.http.post("/records", record).await
    }

    pub async fn update(&self, id: i64, patch: &UpdateRecord) -> Result<VinylRecord, ClientError> {
        self.http.put(&format!("/records/{id}"), patch).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.http.delete(&format!("/records/{id}")).await
    }
}
