use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use scan_service_tables::server::{router, AppState, LookupResponse, TableView};
use scan_service_tables::{ServiceName, ServiceNameTable, ServiceRecord, ServiceRecordTable, StateIcon};

fn state() -> AppState {
    let services = ServiceRecordTable::with_default_headers(vec![
        ServiceRecord::new("10.0.0.2", "443", "open"),
        ServiceRecord::new("10.0.0.1", "80", "closed"),
    ]);
    let names = ServiceNameTable::with_default_headers(vec![
        ServiceName::new("ssh"),
        ServiceName::new("http"),
    ]);
    AppState::new(services, names)
}

async fn body_json<T: serde::de::DeserializeOwned>(res: axum::response::Response) -> T {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn get_services_renders_cells_and_icons() {
    let app = router(state());
    let res = app
        .oneshot(Request::get("/api/services").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let view: TableView = body_json(res).await;
    assert_eq!(view.headers.len(), 11);
    assert_eq!(view.rows[0].cells[0], "   10.0.0.2");
    assert_eq!(view.rows[0].decorations[0], Some(StateIcon::Open));
    assert_eq!(view.rows[1].decorations[2], Some(StateIcon::Closed));
    assert_eq!(view.rows[1].decorations[1], None);
}

#[tokio::test]
async fn sort_services_by_port() {
    let app = router(state());
    let req = Request::post("/api/services/sort")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"column":1,"order":"descending"}"#))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let view: TableView = body_json(res).await;
    assert_eq!(view.rows[0].cells[1], "80");
    assert_eq!(view.rows[1].cells[1], "443");
}

#[tokio::test]
async fn lookup_service_name() {
    let app = router(state());
    let res = app
        .clone()
        .oneshot(
            Request::get("/api/service-names/lookup?name=http")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let found: LookupResponse = body_json(res).await;
    assert_eq!(found, LookupResponse { row: 1 });

    let res = app
        .oneshot(
            Request::get("/api/service-names/lookup?name=ftp")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
