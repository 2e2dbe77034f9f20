use axum::http::StatusCode;
use brightbook_core::models::customer::Customer;
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::{build_state, test_server, Fixture};

#[tokio::test]
async fn test_search_customers_passes_the_term_through() {
    let fixture = Fixture::new();
    let customer = fixture.customer.clone();
    let mut backend = fixture.backend();
    backend
        .expect_search_customers()
        .with(predicate::eq(Some("sam".to_string())))
        .times(1)
        .returning(move |_| Ok(vec![customer.clone()]));
    let server = test_server(build_state(backend));

    let response = server.get("/api/customers").add_query_param("search", "sam").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Customer>>(), vec![fixture.customer]);
}

#[tokio::test]
async fn test_get_customer() {
    let fixture = Fixture::new();
    let server = test_server(build_state(fixture.backend()));

    let response = server.get(&format!("/api/customers/{}", fixture.customer.id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Customer>(), fixture.customer);

    let response = server.get(&format!("/api/customers/{}", uuid::Uuid::new_v4())).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_customer_requires_contact_details() {
    let server = test_server(build_state(Fixture::new().backend()));

    let response = server
        .post("/api/customers")
        .json(&json!({
            "name": "Sam Carter",
            "phone": "  ",
            "email": "sam@example.com",
            "area_id": null,
            "district_id": null,
            "property_id": null,
            "residence_type_id": null,
            "apartment_number": null
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].as_str().unwrap().contains("phone"));
}
