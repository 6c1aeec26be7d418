use std::time::Duration;

use gitprofile::{ActivityPolicy, Error, GitHubClient, GitHubSource};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::with_base_url(Some("test-token"), &server.uri())
        .unwrap()
        .with_activity_policy(ActivityPolicy {
            max_attempts: 3,
            retry_delay: Duration::from_millis(5),
        })
}

fn user_json(login: &str) -> serde_json::Value {
    json!({
        "login": login,
        "id": 1,
        "name": "The Octocat",
        "avatar_url": "https://avatars.githubusercontent.com/u/1",
        "bio": null,
        "public_repos": 2,
        "followers": 20,
        "following": 0,
        "created_at": "2011-01-25T18:44:36Z",
        "html_url": format!("https://github.com/{}", login)
    })
}

fn repo_json(name: &str, language: Option<&str>, size: u64, stars: u32) -> serde_json::Value {
    json!({
        "id": size,
        "name": name,
        "full_name": format!("octocat/{}", name),
        "description": null,
        "language": language,
        "stargazers_count": stars,
        "forks_count": 1,
        "size": size,
        "updated_at": "2024-04-01T10:00:00Z",
        "default_branch": "main",
        "html_url": format!("https://github.com/octocat/{}", name)
    })
}

#[tokio::test]
async fn test_get_user_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("octocat")))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client(&server).get_user("octocat").await.unwrap();

    assert_eq!(profile.login, "octocat");
    assert_eq!(profile.display_name(), "The Octocat");
    assert_eq!(profile.followers, 20);
}

#[tokio::test]
async fn test_any_user_failure_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/limited"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client(&server).get_user("limited").await.unwrap_err();
    assert!(matches!(err, Error::UserNotFound(ref u) if u == "limited"));
}

#[tokio::test]
async fn test_get_user_repos_requests_recent_hundred() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .and(query_param("per_page", "100"))
        .and(query_param("sort", "updated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            repo_json("hello-world", Some("Ruby"), 120, 5),
            repo_json("notes", None, 3, 0),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let repos = client(&server).get_user_repos("octocat").await.unwrap();

    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].language.as_deref(), Some("Ruby"));
    assert_eq!(repos[1].language, None);
}

#[tokio::test]
async fn test_repository_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server).get_user_repos("octocat").await.unwrap_err();
    assert!(matches!(err, Error::RepositoriesUnavailable(_)));
}

#[tokio::test]
async fn test_commit_activity_parses_weeks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello-world/stats/commit_activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "days": [0, 1, 0, 2, 0, 0, 0], "total": 3, "week": 1_700_000_000 },
            { "days": [0, 0, 0, 0, 0, 0, 0], "total": 0, "week": 1_700_604_800 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let weeks = client(&server)
        .get_commit_activity("octocat", "hello-world")
        .await;

    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0].total, 3);
    assert_eq!(weeks[0].days, [0, 1, 0, 2, 0, 0, 0]);
}

#[tokio::test]
async fn test_commit_activity_gives_up_after_three_pending_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/busy/stats/commit_activity"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
        .expect(3)
        .mount(&server)
        .await;

    let weeks = client(&server).get_commit_activity("octocat", "busy").await;

    assert!(weeks.is_empty());
}

#[tokio::test]
async fn test_commit_activity_recovers_after_pending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/warming/stats/commit_activity"))
        .respond_with(ResponseTemplate::new(202))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/warming/stats/commit_activity"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "days": [0, 0, 0, 0, 0, 0, 0], "total": 4, "week": 1_700_000_000 }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let weeks = client(&server).get_commit_activity("octocat", "warming").await;

    assert_eq!(weeks.len(), 1);
    assert_eq!(weeks[0].total, 4);
}

#[tokio::test]
async fn test_malformed_commit_activity_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/odd/stats/commit_activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "nope" })))
        .expect(1)
        .mount(&server)
        .await;

    let weeks = client(&server).get_commit_activity("octocat", "odd").await;
    assert!(weeks.is_empty());
}
