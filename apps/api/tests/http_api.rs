use reqwest::{header, StatusCode};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use ventas_core::{Money, Product};
use ventas_db::{Database, DbConfig, Ledger, MemoryStore};

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Same router as prod, bound to an ephemeral port.
    async fn spawn(ledger: Ledger) -> Self {
        let app = ventas_api::build_app(ledger);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    /// Memory-backed server with three products: 1 Café 15.00, 2 Cake 25.00,
    /// 3 Tea 4.50.
    async fn seeded() -> Self {
        let store = MemoryStore::with_products(catalog());
        Self::spawn(Ledger::memory(store)).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(&body).send().await.unwrap()
    }

    async fn put(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.put(self.url(path)).json(&body).send().await.unwrap()
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        self.client.delete(self.url(path)).send().await.unwrap()
    }

    /// Creates a sale and returns its id.
    async fn create_sale(&self, productos: Value, fecha: &str) -> i64 {
        let res = self
            .post("/api/ventas", json!({ "productos": productos, "fechaVenta": fecha }))
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = res.json().await.unwrap();
        body["id"].as_i64().unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn catalog() -> Vec<Product> {
    vec![
        Product::new(1, "Café", Money::new(dec!(15.00))),
        Product::new(2, "Cake", Money::new(dec!(25.00))),
        Product::new(3, "Tea", Money::new(dec!(4.50))),
    ]
}

fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|sale| sale["id"].as_i64().unwrap())
        .collect()
}

async fn assert_error(res: reqwest::Response, status: StatusCode, code: &str) -> Value {
    assert_eq!(res.status(), status);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], code, "body: {body}");
    assert!(body["error"].is_string());
    body
}

#[tokio::test]
async fn lists_products_with_links() {
    let server = TestServer::seeded().await;

    let res = server.get("/api/productos").await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 3);
    assert_eq!(products[0]["nombre"], "Café");
    assert_eq!(products[0]["precio"], "15.00");
    assert_eq!(
        products[1]["_links"]["ventas-por-producto"]["href"],
        "/api/ventas/producto/2"
    );
}

#[tokio::test]
async fn creates_and_reads_a_sale() {
    let server = TestServer::seeded().await;

    let res = server
        .post(
            "/api/ventas",
            json!({ "productos": [1, 2], "fechaVenta": "2023-03-10" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res.headers()[header::LOCATION].to_str().unwrap().to_string();

    let created: Value = res.json().await.unwrap();
    assert_eq!(created["totalVenta"], "40.00");
    assert_eq!(created["fechaVenta"], "2023-03-10");
    assert_eq!(location, format!("/api/ventas/{}", created["id"]));

    let res = server.get(&location).await;
    assert_eq!(res.status(), StatusCode::OK);
    let detail: Value = res.json().await.unwrap();
    assert_eq!(detail["total"], "40.00");
    assert_eq!(detail["venta"]["productos"].as_array().unwrap().len(), 2);
    assert_eq!(detail["venta"]["_links"]["self"]["href"], location.as_str());
}

#[tokio::test]
async fn accepts_object_product_refs_and_duplicates() {
    let server = TestServer::seeded().await;

    let res = server
        .post(
            "/api/ventas",
            json!({ "productos": [{ "id": 3 }, { "id": 3 }, 1], "fechaVenta": "2023-01-01" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["totalVenta"], "24.00");
    assert_eq!(body["productos"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn rejects_bad_create_requests() {
    let server = TestServer::seeded().await;

    let res = server
        .post("/api/ventas", json!({ "productos": [], "fechaVenta": "2023-01-01" }))
        .await;
    assert_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let res = server.post("/api/ventas", json!({ "fechaVenta": "2023-01-01" })).await;
    assert_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let res = server
        .post("/api/ventas", json!({ "productos": [1], "fechaVenta": "2023-02-30" }))
        .await;
    assert_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let res = server
        .client
        .post(server.url("/api/ventas"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn unknown_product_is_404_and_persists_nothing() {
    let server = TestServer::seeded().await;

    let res = server
        .post(
            "/api/ventas",
            json!({ "productos": [1, 99], "fechaVenta": "2023-01-01" }),
        )
        .await;
    let body = assert_error(res, StatusCode::NOT_FOUND, "NOT_FOUND").await;
    assert!(body["error"].as_str().unwrap().contains("99"));

    let res = server.get("/api/ventaanual/2000-2100").await;
    let body: Value = res.json().await.unwrap();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_and_malformed_sale_ids() {
    let server = TestServer::seeded().await;

    let res = server.get("/api/ventas/42").await;
    assert_error(res, StatusCode::NOT_FOUND, "NOT_FOUND").await;

    let res = server.get("/api/ventas/abc").await;
    assert_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn updates_the_date() {
    let server = TestServer::seeded().await;
    let id = server.create_sale(json!([1]), "2023-01-01").await;

    let res = server
        .put(
            &format!("/api/ventas/{id}/updateFecha"),
            json!({ "fechaVenta": "2024-02-29" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["fechaVenta"], "2024-02-29");

    let res = server
        .put(&format!("/api/ventas/{id}/updateFecha"), json!({}))
        .await;
    assert_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let res = server
        .put("/api/ventas/999/updateFecha", json!({ "fechaVenta": "2024-01-01" }))
        .await;
    assert_error(res, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[tokio::test]
async fn patches_a_sale() {
    let server = TestServer::seeded().await;
    let id = server.create_sale(json!([1]), "2023-06-01").await;
    let path = format!("/api/ventas/{id}/updateVenta");

    let res = server.put(&path, json!({ "productos": [2, 3] })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["totalVenta"], "29.50");
    assert_eq!(body["fechaVenta"], "2023-06-01");

    let res = server.put(&path, json!({ "fechaVenta": "2023-07-04" })).await;
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["fechaVenta"], "2023-07-04");
    assert_eq!(body["totalVenta"], "29.50");

    // unresolved replacement products are a validation error, not a 404
    let res = server.put(&path, json!({ "productos": [2, 77] })).await;
    assert_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let res = server.put(&path, json!({ "productos": [] })).await;
    assert_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;

    let res = server
        .put("/api/ventas/999/updateVenta", json!({ "fechaVenta": "bad" }))
        .await;
    assert_error(res, StatusCode::NOT_FOUND, "NOT_FOUND").await;

    let res = server.get(&format!("/api/ventas/{id}")).await;
    let detail: Value = res.json().await.unwrap();
    assert_eq!(detail["total"], "29.50");
}

#[tokio::test]
async fn deletes_a_sale_once() {
    let server = TestServer::seeded().await;
    let id = server.create_sale(json!([1, 2]), "2023-01-01").await;

    let res = server.delete(&format!("/api/ventas/{id}")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::LOCATION], "/api/productos");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Venta eliminada");
    assert_eq!(body["_links"]["listar-productos"]["href"], "/api/productos");

    let res = server.delete(&format!("/api/ventas/{id}")).await;
    assert_error(res, StatusCode::NOT_FOUND, "NOT_FOUND").await;

    let res = server.get(&format!("/api/ventas/{id}")).await;
    assert_error(res, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[tokio::test]
async fn filters_by_product_and_date_ranges() {
    let server = TestServer::seeded().await;
    let feb = server.create_sale(json!([1]), "2023-02-28").await;
    let mar = server.create_sale(json!([2, 2]), "2023-03-10").await;
    let may = server.create_sale(json!([1, 3]), "2023-05-15").await;
    let jun = server.create_sale(json!([3]), "2023-06-01").await;
    let next = server.create_sale(json!([1]), "2024-01-01").await;

    let body: Value = server.get("/api/ventas/producto/1").await.json().await.unwrap();
    assert_eq!(ids(&body), vec![feb, may, next]);

    let body: Value = server.get("/api/ventaanual/2023-2023").await.json().await.unwrap();
    assert_eq!(ids(&body), vec![feb, mar, may, jun]);

    let body: Value = server.get("/api/ventaanual/2024-2023").await.json().await.unwrap();
    assert!(ids(&body).is_empty());

    let body: Value = server
        .get("/api/ventamensual/2023-3-2023-5")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(ids(&body), vec![mar, may]);

    let body: Value = server
        .get("/api/ventadiaria/2023-3-10-2023-5-15")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(ids(&body), vec![mar, may]);
}

#[tokio::test]
async fn rejects_malformed_ranges() {
    let server = TestServer::seeded().await;

    for path in [
        "/api/ventaanual/2023",
        "/api/ventaanual/abcd-2024",
        "/api/ventamensual/2023-0-2023-5",
        "/api/ventamensual/2023-3-2023-13",
        "/api/ventadiaria/2023-2-30-2023-3-1",
        "/api/ventadiaria/2023-3-10-2023-5",
    ] {
        let res = server.get(path).await;
        assert_error(res, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    }
}

#[tokio::test]
async fn health_reports_backend() {
    let server = TestServer::seeded().await;

    let res = server.get("/health").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn sqlite_backend_serves_the_same_api() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let ledger = Ledger::sqlite(&db);
    for product in catalog() {
        ledger.add_product(product).await.unwrap();
    }
    let server = TestServer::spawn(ledger).await;

    let id = server.create_sale(json!([1, 2]), "2023-03-10").await;
    let detail: Value = server
        .get(&format!("/api/ventas/{id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(detail["total"], "40.00");

    let body: Value = server.get("/health").await.json().await.unwrap();
    assert_eq!(body["storage"], "sqlite");

    let res = server.delete(&format!("/api/ventas/{id}")).await;
    assert_eq!(res.status(), StatusCode::OK);
}
