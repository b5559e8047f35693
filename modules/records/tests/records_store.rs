use std::sync::Arc;

use client_core::{CredentialCell, HttpClient, SessionEvents};
use httpmock::prelude::*;
use records::{CreateRecord, Genre, RecordCondition, RecordsApi, RecordsStore};
use serde_json::json;

fn store_for(server: &MockServer) -> RecordsStore {
    let http = HttpClient::new(
        server.base_url(),
        Arc::new(CredentialCell::new()),
        Arc::new(SessionEvents::new()),
    );
    RecordsStore::new(RecordsApi::new(http))
}

fn record_json(id: i64, title: &str, genre: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "artist": "Various",
        "releaseYear": 1975,
        "genre": genre,
        "purchaseSource": null,
        "purchaseDate": null,
        "condition": "VERY_GOOD",
        "notes": null,
        "createdAt": "2024-03-01T10:00:00Z",
        "updatedAt": "2024-03-01T10:00:00Z"
    })
}

fn page_json(content: Vec<serde_json::Value>) -> serde_json::Value {
    let len = content.len();
    json!({
        "content": content,
        "pageNumber": 0,
        "pageSize": 20,
        "totalElements": len,
        "totalPages": 1
    })
}

#[tokio::test]
async fn fetch_all_loads_the_page() {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method(GET)
            .path("/records")
            .query_param("page", "0")
            .query_param("size", "20");
        then.status(200).json_body(page_json(vec![
            record_json(1, "Kind of Blue", "JAZZ"),
            record_json(2, "Nevermind", "ROCK"),
        ]));
    });

    let store = store_for(&server);
    store.fetch_all(0).await;

    list.assert();
    assert_eq!(store.visible().len(), 2);
    assert_eq!(store.total_elements(), 2);
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn genre_filter_uses_the_genre_endpoint() {
    let server = MockServer::start();
    let by_genre = server.mock(|when, then| {
        when.method(GET).path("/records/genre/JAZZ");
        then.status(200)
            .json_body(json!([record_json(1, "Kind of Blue", "JAZZ")]));
    });

    let store = store_for(&server);
    store.set_genre_filter(Some(Genre::Jazz)).await;

    by_genre.assert();
    let visible = store.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].genre, Genre::Jazz);
    assert!(!store.is_paginated());
}

#[tokio::test]
async fn delete_under_genre_filter_reissues_the_filtered_fetch() {
    let server = MockServer::start();
    let by_genre = server.mock(|when, then| {
        when.method(GET).path("/records/genre/ROCK");
        then.status(200)
            .json_body(json!([record_json(2, "Nevermind", "ROCK")]));
    });
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/records/2");
        then.status(204);
    });
    let plain_list = server.mock(|when, then| {
        when.method(GET).path("/records");
        then.status(200).json_body(page_json(vec![]));
    });

    let store = store_for(&server);
    store.set_genre_filter(Some(Genre::Rock)).await;
    store.delete(2).await.unwrap();

    delete.assert();
    by_genre.assert_calls(2);
    plain_list.assert_calls(0);
}

#[tokio::test]
async fn create_refetches_active_search_mode() {
    let server = MockServer::start();
    let search = server.mock(|when, then| {
        when.method(GET)
            .path("/records/search")
            .query_param("q", "blue");
        then.status(200)
            .json_body(json!([record_json(1, "Kind of Blue", "JAZZ")]));
    });
    let create = server.mock(|when, then| {
        when.method(POST).path("/records");
        then.status(201)
            .json_body(record_json(7, "Blue Train", "JAZZ"));
    });

    let store = store_for(&server);
    store.search("blue").await;
    search.assert_calls(1);

    store
        .create(&CreateRecord {
            title: "Blue Train".to_string(),
            artist: "John Coltrane".to_string(),
            release_year: 1958,
            genre: Genre::Jazz,
            purchase_source: None,
            purchase_date: None,
            condition: RecordCondition::Excellent,
            notes: None,
        })
        .await
        .unwrap();

    create.assert();
    // The active mode is search, so the create refetched the search query.
    search.assert_calls(2);
}

#[tokio::test]
async fn search_narrowed_by_genre_filter() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/records/search")
            .query_param("q", "blue");
        then.status(200).json_body(json!([
            record_json(1, "Kind of Blue", "JAZZ"),
            record_json(3, "Tangled Up in Blue", "ROCK"),
        ]));
    });

    let store = store_for(&server);
    store.search("blue").await;
    store.set_genre_filter(Some(Genre::Rock)).await;

    let visible = store.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, 3);

    store.set_genre_filter(None).await;
    assert_eq!(store.visible().len(), 2);
}

#[tokio::test]
async fn api_get_fetches_a_single_record_by_id() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/records/7");
        then.status(200).json_body(record_json(7, "Kind of Blue", "JAZZ"));
    });

    let http = HttpClient::new(
        server.base_url(),
        Arc::new(CredentialCell::new()),
        Arc::new(SessionEvents::new()),
    );
    let record = records::RecordsApi::new(http).get(7).await.unwrap();

    mock.assert();
    assert_eq!(record.id, 7);
    assert_eq!(record.genre, Genre::Jazz);
}

#[tokio::test]
async fn update_patches_held_page_by_identity() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/records");
        then.status(200).json_body(page_json(vec![
            record_json(1, "Kind of Blue", "JAZZ"),
            record_json(2, "Nevermind", "ROCK"),
        ]));
    });
    let put = server.mock(|when, then| {
        when.method(PUT).path("/records/2");
        then.status(200)
            .json_body(record_json(2, "Nevermind (reissue)", "ROCK"));
    });

    let store = store_for(&server);
    store.fetch_all(0).await;

    let updated = store
        .update(
            2,
            &records::UpdateRecord {
                title: Some("Nevermind (reissue)".to_string()),
                ..records::UpdateRecord::default()
            },
        )
        .await
        .unwrap();

    put.assert();
    assert_eq!(updated.title, "Nevermind (reissue)");
    assert_eq!(store.get_by_id(2).unwrap().title, "Nevermind (reissue)");
}

#[tokio::test]
async fn fetch_failure_stores_user_facing_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/records");
        then.status(503).body("unavailable");
    });

    let store = store_for(&server);
    store.fetch_all(0).await;

    let message = store.error().unwrap();
    assert!(message.contains("try again later"), "got: {message}");
}
