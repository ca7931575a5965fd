use chrono::{Duration, Utc};
use mockito::{Matcher, Mock, Server, ServerGuard};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::path::PathBuf;
use vk_client::config::RestApiConfig;
use vk_client::session::auth::VkAuth;
use vk_client::session::manager::VkSessionManager;
use vk_client::utils::logger::setup_logger;

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn manager_for(server: &ServerGuard) -> VkSessionManager {
    let config = RestApiConfig {
        base_url: server.url(),
        api_version: "5.131".to_string(),
        timeout: 5,
    };
    VkSessionManager::new(VkAuth::new(&config))
}

async fn mock_user_and_groups(server: &mut ServerGuard) -> (Mock, Mock) {
    let users = server
        .mock("POST", "/users.get")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user_ids".into(), "admin".into()),
            Matcher::UrlEncoded("access_token".into(), "token".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"response": [{"id": 77, "first_name": "Ad", "last_name": "Min"}]}"#)
        .create_async()
        .await;
    let groups = server
        .mock("POST", "/groups.get")
        .match_body(Matcher::UrlEncoded("user_id".into(), "77".into()))
        .with_status(200)
        .with_body(
            r#"{"response": {"count": 2, "items": [
                {"id": 1, "name": "Group one", "screen_name": "G1"},
                {"id": 2, "name": "Group two", "screen_name": "G2"}
            ]}}"#,
        )
        .create_async()
        .await;
    (users, groups)
}

async fn mock_wall(server: &mut ServerGuard, owner_id: &str, body: String, hits: usize) -> Mock {
    server
        .mock("POST", "/wall.get")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("owner_id".into(), owner_id.into()),
            Matcher::UrlEncoded("filter".into(), "postponed".into()),
        ]))
        .with_status(200)
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

fn empty_wall() -> String {
    r#"{"response": {"count": 0, "items": []}}"#.to_string()
}

#[tokio::test]
async fn test_blank_token_leaves_session_uninitialized() {
    setup_logger();
    let mut server = Server::new_async().await;
    let users = server
        .mock("POST", "/users.get")
        .expect(0)
        .create_async()
        .await;

    let mut manager = manager_for(&server);
    let err = manager
        .initialize("admin", "   ", &names(&["G1"]))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "VK Api - access token was blank.");
    assert!(!manager.is_initialized());
    assert_eq!(
        manager.obtain_albums("G1", &names(&["A"])).await.unwrap_err().to_string(),
        "Not initialized."
    );
    users.assert_async().await;
}

#[tokio::test]
async fn test_initialize_keeps_only_requested_groups() {
    setup_logger();
    let mut server = Server::new_async().await;
    let _user_mocks = mock_user_and_groups(&mut server).await;
    let wall_g1 = mock_wall(&mut server, "-1", empty_wall(), 1).await;
    let wall_g2 = mock_wall(&mut server, "-2", empty_wall(), 0).await;

    let mut manager = manager_for(&server);
    manager
        .initialize("admin", "token", &names(&["G1", "G9"]))
        .await
        .unwrap();

    assert!(manager.is_initialized());
    assert_eq!(manager.state().user_id(), 77);
    assert_eq!(manager.state().groups(), &HashMap::from([("G1".to_string(), 1)]));
    wall_g1.assert_async().await;
    wall_g2.assert_async().await;
}

#[tokio::test]
async fn test_initialize_surfaces_api_errors() {
    setup_logger();
    let mut server = Server::new_async().await;
    let _users = server
        .mock("POST", "/users.get")
        .with_status(200)
        .with_body(
            r#"{"error": {
                "error_code": 5,
                "error_msg": "User authorization failed: invalid access_token (4)."
            }}"#,
        )
        .create_async()
        .await;

    let mut manager = manager_for(&server);
    let err = manager
        .initialize("admin", "expired", &names(&["G1"]))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "VK Api error 5: User authorization failed: invalid access_token (4)."
    );
    assert!(!manager.is_initialized());
}

#[tokio::test]
async fn test_obtain_albums_then_upload() {
    setup_logger();
    let mut server = Server::new_async().await;
    let _user_mocks = mock_user_and_groups(&mut server).await;
    let _wall = mock_wall(&mut server, "-1", empty_wall(), 1).await;
    let albums = server
        .mock("POST", "/photos.getAlbums")
        .match_body(Matcher::UrlEncoded("owner_id".into(), "-1".into()))
        .with_status(200)
        .with_body(r#"{"response": {"count": 1, "items": [{"id": 10, "title": "A", "size": 0}]}}"#)
        .expect(2)
        .create_async()
        .await;

    let mut manager = manager_for(&server);
    manager.initialize("admin", "token", &names(&["G1"])).await.unwrap();

    let err = manager
        .obtain_albums("G1", &names(&["A", "B"]))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Not found albums: B");

    let err = manager
        .upload_photos_to_album("G1", "B", &[PathBuf::from("b.jpg")])
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Album 'B' not found locally in group 'G1'. Try refresh albums."
    );

    manager.obtain_albums("G1", &names(&["A"])).await.unwrap();
    albums.assert_async().await;

    let upload_url = format!("{}/upload/album", server.url());
    let _upload_server = server
        .mock("POST", "/photos.getUploadServer")
        .match_body(Matcher::UrlEncoded("album_id".into(), "10".into()))
        .with_status(200)
        .with_body(format!(r#"{{"response": {{"upload_url": "{upload_url}"}}}}"#))
        .create_async()
        .await;
    let _upload = server
        .mock("POST", "/upload/album")
        .with_status(200)
        .with_body(r#"{"server": 3, "photos_list": "[{\"p\":1}]", "aid": 10, "hash": "h"}"#)
        .create_async()
        .await;
    let save = server
        .mock("POST", "/photos.save")
        .with_status(200)
        .with_body(r#"{"response": [{"id": 1000, "owner_id": -1}]}"#)
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("a.jpg");
    std::fs::write(&photo, b"jpeg").unwrap();

    let uploaded = manager
        .upload_photos_to_album("G1", "A", &[photo])
        .await
        .unwrap();
    assert_eq!(uploaded, 1);
    save.assert_async().await;
}

#[tokio::test]
async fn test_delete_last_scheduled_publication() {
    setup_logger();
    let mut server = Server::new_async().await;
    let _user_mocks = mock_user_and_groups(&mut server).await;
    let soon = (Utc::now() + Duration::days(1)).timestamp();
    let later = (Utc::now() + Duration::days(2)).timestamp();
    let _wall = mock_wall(
        &mut server,
        "-1",
        format!(
            r#"{{"response": {{"count": 2, "items": [
                {{"id": 5, "date": {later}}},
                {{"id": 6, "date": {soon}}}
            ]}}}}"#
        ),
        1,
    )
    .await;
    let delete = server
        .mock("POST", "/wall.delete")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("owner_id".into(), "-1".into()),
            Matcher::UrlEncoded("post_id".into(), "5".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"response": 1}"#)
        .expect(1)
        .create_async()
        .await;

    let mut manager = manager_for(&server);
    manager.initialize("admin", "token", &names(&["G1"])).await.unwrap();

    manager.delete_last_scheduled_publication("G1").await.unwrap();

    let remaining: Vec<i64> = manager.state().scheduled_posts(1).iter().map(|p| p.id).collect();
    assert_eq!(remaining, vec![6]);
    delete.assert_async().await;
}

#[tokio::test]
async fn test_delete_without_scheduled_posts_makes_no_call() {
    setup_logger();
    let mut server = Server::new_async().await;
    let _user_mocks = mock_user_and_groups(&mut server).await;
    let _wall = mock_wall(&mut server, "-1", empty_wall(), 1).await;
    let delete = server
        .mock("POST", "/wall.delete")
        .expect(0)
        .create_async()
        .await;

    let mut manager = manager_for(&server);
    manager.initialize("admin", "token", &names(&["G1"])).await.unwrap();

    assert!(manager.delete_last_scheduled_publication("G1").await.is_ok());
    delete.assert_async().await;
}

#[tokio::test]
async fn test_update_scheduled_posts_refetches_named_groups() {
    setup_logger();
    let mut server = Server::new_async().await;
    let _user_mocks = mock_user_and_groups(&mut server).await;
    let wall_g1 = mock_wall(&mut server, "-1", empty_wall(), 2).await;
    let wall_g2 = mock_wall(&mut server, "-2", empty_wall(), 1).await;

    let mut manager = manager_for(&server);
    manager.initialize("admin", "token", &names(&["G1", "G2"])).await.unwrap();

    manager.update_scheduled_posts_for(&names(&["G1"])).await.unwrap();
    assert_eq!(
        manager
            .update_group_scheduled_posts("G3")
            .await
            .unwrap_err()
            .to_string(),
        "Group 'G3' not found locally. Try refresh groups."
    );
    wall_g1.assert_async().await;
    wall_g2.assert_async().await;
}
