use facturo_api::app::{AppConfig, build_app};
use facturo_api::identity::DEMO_PASSWORD;
use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port. Cookie transport
        // security is dropped because the test client speaks plain HTTP.
        let app = build_app(AppConfig {
            insecure_cookies: true,
        })
        .await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Client with a cookie store and redirect following disabled, so every 303
/// and its Location header stay observable.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn location(res: &reqwest::Response) -> &str {
    res.headers()
        .get("location")
        .expect("missing Location header")
        .to_str()
        .unwrap()
}

async fn login(client: &reqwest::Client, base_url: &str, email: &str) -> reqwest::Response {
    client
        .post(format!("{}/auth/login", base_url))
        .json(&json!({ "email": email, "password": DEMO_PASSWORD }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_needs_no_session() {
    let srv = TestServer::spawn().await;

    let res = client()
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn anonymous_visit_to_protected_route_redirects_to_login() {
    let srv = TestServer::spawn().await;

    let res = client()
        .get(format!("{}/system/invoices", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login");
}

#[tokio::test]
async fn redirect_intent_round_trips_and_is_consumed_once() {
    let srv = TestServer::spawn().await;
    let client = client();

    // The denied visit parks the destination.
    let denied = client
        .get(format!("{}/system/invoices", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&denied), "/login");

    // Login returns to it.
    let res = login(&client, &srv.base_url, "books@acme.test").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/system/invoices");

    // A second login finds nothing parked and falls back to the landing route.
    let res = login(&client, &srv.base_url, "books@acme.test").await;
    assert_eq!(location(&res), "/system/dashboard");
}

#[tokio::test]
async fn login_lands_each_role_on_its_area() {
    let srv = TestServer::spawn().await;

    let viewer = client();
    let res = login(&viewer, &srv.base_url, "viewer@acme.test").await;
    assert_eq!(location(&res), "/system/dashboard");

    let admin = client();
    let res = login(&admin, &srv.base_url, "admin@facturo.dev").await;
    assert_eq!(location(&res), "/platform-admin/dashboard");
}

#[tokio::test]
async fn wrong_credentials_are_rejected_without_a_session() {
    let srv = TestServer::spawn().await;
    let client = client();

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "owner@acme.test", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // No session came out of the failed attempt.
    let res = client
        .get(format!("{}/system/dashboard", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login");
}

#[tokio::test]
async fn platform_area_turns_tenant_roles_away_entirely() {
    let srv = TestServer::spawn().await;
    let client = client();

    login(&client, &srv.base_url, "owner@acme.test").await;

    for route in ["dashboard", "tenants", "plans"] {
        let res = client
            .get(format!("{}/platform-admin/{}", srv.base_url, route))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER, "{route} not guarded");
        assert_eq!(location(&res), "/system/dashboard");
    }
}

#[tokio::test]
async fn super_admin_reads_tenant_oversight() {
    let srv = TestServer::spawn().await;
    let client = client();

    login(&client, &srv.base_url, "admin@facturo.dev").await;

    let res = client
        .get(format!("{}/platform-admin/tenants", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let slugs: Vec<&str> = body["tenants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["slug"].as_str().unwrap())
        .collect();
    assert!(slugs.contains(&"acme"));
}

#[tokio::test]
async fn logout_drops_the_whole_session() {
    let srv = TestServer::spawn().await;
    let client = client();

    login(&client, &srv.base_url, "owner@acme.test").await;

    let res = client
        .get(format!("{}/system/dashboard", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/auth/logout", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login");

    let res = client
        .get(format!("{}/system/dashboard", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login");
}

#[tokio::test]
async fn nav_links_are_filtered_by_role() {
    let srv = TestServer::spawn().await;

    let viewer = client();
    login(&viewer, &srv.base_url, "viewer@acme.test").await;
    let body: Value = viewer
        .get(format!("{}/system/nav", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let system: Vec<&str> = body["system"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(system.contains(&"dashboard"));
    assert!(system.contains(&"invoices"));
    assert!(!system.contains(&"settings"));
    assert!(!system.contains(&"payments"));
    assert!(body["platform_admin"].as_array().unwrap().is_empty());

    let owner = client();
    login(&owner, &srv.base_url, "owner@acme.test").await;
    let body: Value = owner
        .get(format!("{}/system/nav", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let system: Vec<&str> = body["system"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(system.contains(&"settings"));
    assert!(system.contains(&"payments"));
}

#[tokio::test]
async fn whoami_reflects_the_identity_record() {
    let srv = TestServer::spawn().await;
    let client = client();

    login(&client, &srv.base_url, "books@acme.test").await;

    let body: Value = client
        .get(format!("{}/system/whoami", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["role"], "ACCOUNTANT");
    assert_eq!(body["tenant_slug"], "acme");
}

#[tokio::test]
async fn platform_login_drops_prior_tenant_context() {
    let srv = TestServer::spawn().await;
    let client = client();

    login(&client, &srv.base_url, "owner@acme.test").await;
    login(&client, &srv.base_url, "admin@facturo.dev").await;

    let body: Value = client
        .get(format!("{}/system/whoami", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["role"], "SUPER_ADMIN");
    assert!(body["tenant_slug"].is_null());
}

#[tokio::test]
async fn signup_funnels_the_fresh_tenant_through_onboarding() {
    let srv = TestServer::spawn().await;
    let client = client();

    let res = client
        .post(format!("{}/auth/signup", srv.base_url))
        .json(&json!({
            "email": "founder@widgets.test",
            "password": "s3cret",
            "tenant_slug": "widgets",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/system/dashboard");

    // Until onboarding completes, everything funnels to it.
    let res = client
        .get(format!("{}/system/dashboard", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/system/onboarding");

    let res = client
        .get(format!("{}/system/onboarding", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/system/onboarding/complete", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/system/dashboard");

    // Onboarded: content renders, and the onboarding page itself bounces.
    let res = client
        .get(format!("{}/system/dashboard", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/system/onboarding", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/system/dashboard");
}

#[tokio::test]
async fn signup_conflicts_are_reported() {
    let srv = TestServer::spawn().await;
    let client = client();

    let res = client
        .post(format!("{}/auth/signup", srv.base_url))
        .json(&json!({
            "email": "owner@acme.test",
            "password": "x",
            "tenant_slug": "fresh",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .post(format!("{}/auth/signup", srv.base_url))
        .json(&json!({
            "email": "someone@new.test",
            "password": "x",
            "tenant_slug": "Not A Slug",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn denial_responses_do_not_say_why() {
    let srv = TestServer::spawn().await;
    let client = client();

    // Unknown route under the area and a role-denied area produce the same
    // shape for an anonymous caller: a silent redirect to login.
    let unknown = client
        .get(format!("{}/platform-admin/tenants", srv.base_url))
        .send()
        .await
        .unwrap();
    let denied = client
        .get(format!("{}/system/invoices", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(unknown.status(), StatusCode::SEE_OTHER);
    assert_eq!(denied.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&unknown), "/login");
    assert_eq!(location(&denied), "/login");
}
