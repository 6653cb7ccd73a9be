use reqwest::StatusCode;
use serde_json::json;

use invoicedash_api::app::{build_app, services::AppServices};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over seeded in-memory stores, on an ephemeral port.
        let services = AppServices::in_memory(true).expect("failed to seed demo data");
        let app = build_app(services);
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

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Redirects are part of the contract, so never follow them.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn location(res: &reqwest::Response) -> &str {
    res.headers()
        .get(reqwest::header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
}

async fn first_seller_id(srv: &TestServer, client: &reqwest::Client) -> String {
    let sellers: serde_json::Value = client
        .get(srv.url("/dashboard/sellers"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    sellers[0]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = client().get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_redirects_home_or_reports_invalid_credentials() {
    let srv = TestServer::spawn().await;
    let client = client();

    let res = client
        .post(srv.url("/login"))
        .form(&[("email", "user@nextmail.com"), ("password", "123456")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/dashboard");

    let res = client
        .post(srv.url("/login"))
        .form(&[("email", "user@nextmail.com"), ("password", "wrong-password")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Invalid credentials." }));
}

#[tokio::test]
async fn dashboard_overview_formats_cards_and_chart() {
    let srv = TestServer::spawn().await;

    let res = client().get(srv.url("/dashboard")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    assert_eq!(body["cards"]["numberOfSellers"], 6);
    assert!(body["cards"]["totalAwaiting"].as_str().unwrap().starts_with('$'));
    assert_eq!(body["revenueChart"]["yAxis"]["topLabel"], 5000);
    assert_eq!(body["revenueChart"]["yAxis"]["yAxisLabels"][0], "$5K");
    assert_eq!(body["latestInvoices"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn invalid_form_is_rejected_with_field_errors() {
    let srv = TestServer::spawn().await;

    let res = client()
        .post(srv.url("/dashboard/invoices"))
        .form(&[("sellerId", ""), ("amount", "abc"), ("status", "")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Missing Fields. Failed to Create Invoice.");
    assert_eq!(body["errors"]["sellerId"][0], "Please select a seller.");
    assert_eq!(body["errors"]["amount"][0], "Please enter an amount greater than $0.");
    assert_eq!(body["errors"]["status"][0], "Please select an invoice status.");
}

#[tokio::test]
async fn invoice_lifecycle_create_edit_update_delete() {
    let srv = TestServer::spawn().await;
    let client = client();
    let seller_id = first_seller_id(&srv, &client).await;

    // Prime the list cache so the create below has something to invalidate.
    let before: serde_json::Value = client
        .get(srv.url("/dashboard/invoices?page=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(before["totalPages"], 3);
    assert_eq!(before["pagination"], json!([1, 2, 3]));

    let res = client
        .post(srv.url("/dashboard/invoices"))
        .form(&[("sellerId", seller_id.as_str()), ("amount", "10.50"), ("status", "awaiting")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/dashboard/invoices");

    // Dated today, so it leads the newest-first list.
    let after: serde_json::Value = client
        .get(srv.url("/dashboard/invoices?page=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let created = &after["invoices"][0];
    assert_eq!(created["amount"], "$10.50");
    assert_eq!(created["status"], "awaiting");
    let id = created["id"].as_str().unwrap().to_string();

    let edit: serde_json::Value = client
        .get(srv.url(&format!("/dashboard/invoices/{id}/edit")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(edit["invoice"]["amount"], 10.5);
    assert_eq!(edit["invoice"]["sellerId"], seller_id.as_str());
    assert_eq!(edit["sellers"].as_array().unwrap().len(), 6);

    let res = client
        .post(srv.url(&format!("/dashboard/invoices/{id}")))
        .form(&[("sellerId", seller_id.as_str()), ("amount", "2000"), ("status", "fulfilled")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let after_update: serde_json::Value = client
        .get(srv.url("/dashboard/invoices?query=2000"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(after_update["invoices"]
        .as_array()
        .unwrap()
        .iter()
        .any(|row| row["id"] == id.as_str() && row["amount"] == "$2,000.00"));

    let res = client
        .post(srv.url(&format!("/dashboard/invoices/{id}/delete")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .post(srv.url(&format!("/dashboard/invoices/{id}/delete")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Database Error: Failed to Delete Invoice.");

    let res = client
        .get(srv.url(&format!("/dashboard/invoices/{id}/edit")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
