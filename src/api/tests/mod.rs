use super::*;
use crate::fetch::stub::StubFetcher;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{basic_auth, bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod system;

/// Everything one request-level test needs: the router under test, the mock
/// catalog it talks to, and the session base directory (kept alive so the
/// tempdir is not removed under the server).
struct TestApp {
    router: Router,
    catalog: MockServer,
    base_dir: TempDir,
}

impl TestApp {
    /// Build a router wired to a mock catalog and the given fetch stub
    async fn with_fetcher(fetcher: StubFetcher) -> Self {
        let catalog = MockServer::start().await;
        let base_dir = tempfile::tempdir().unwrap();

        let mut config = Config::default();
        config.catalog.token_url = format!("{}/api/token", catalog.uri());
        config.catalog.api_base_url = format!("{}/v1", catalog.uri());
        config.storage.base_dir = base_dir.path().to_path_buf();

        let router = create_router(Arc::new(config), Arc::new(fetcher));

        Self {
            router,
            catalog,
            base_dir,
        }
    }

    async fn new() -> Self {
        Self::with_fetcher(StubFetcher::succeeding()).await
    }

    /// Mount the token handshake for the test credentials ("cid" / "cs")
    async fn mount_token(&self) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(basic_auth("cid", "cs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "test-token",
                "token_type": "Bearer",
                "expires_in": 3600,
            })))
            .mount(&self.catalog)
            .await;
    }

    /// Mount a track lookup response for the given id
    async fn mount_track(&self, id: &str, name: &str, artist: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/tracks/{id}")))
            .and(bearer_token("test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": name,
                "artists": [{"name": artist}],
                "album": {"images": [{"url": "https://img.example/cover.jpg"}]},
            })))
            .mount(&self.catalog)
            .await;
    }

    /// Mount playlist metadata and items for the given id
    async fn mount_playlist(&self, id: &str, name: &str, items: &[(&str, &str)]) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/playlists/{id}")))
            .and(bearer_token("test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": name,
                "images": [{"url": "https://img.example/playlist.jpg"}],
                "tracks": {"total": items.len()},
            })))
            .mount(&self.catalog)
            .await;

        let entries: Vec<serde_json::Value> = items
            .iter()
            .map(|(artist, title)| {
                serde_json::json!({"track": {"name": title, "artists": [{"name": artist}]}})
            })
            .collect();

        Mock::given(method("GET"))
            .and(path(format!("/v1/playlists/{id}/tracks")))
            .and(bearer_token("test-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"items": entries})),
            )
            .mount(&self.catalog)
            .await;
    }

    /// Send one request through the router
    async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Names of entries left under the session base directory
    fn leftover_entries(&self) -> Vec<String> {
        std::fs::read_dir(self.base_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn form_request(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

/// Form body for POST /download with the test credentials attached
fn download_form(link: &str, extra: &str) -> String {
    let mut body = format!("link={}&cid=cid&cs=cs", urlencoding::encode(link));
    if !extra.is_empty() {
        body.push('&');
        body.push_str(extra);
    }
    body
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn header_value(response: &Response, name: header::HeaderName) -> String {
    response
        .headers()
        .get(name)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}
