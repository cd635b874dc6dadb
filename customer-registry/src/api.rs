use std::sync::Arc;

use poem::{
    error::ResponseError,
    get,
    middleware::{Cors, Tracing},
    web::Data,
    Endpoint, EndpointExt, Route,
};
use poem_openapi::{
    error::ParseRequestPayloadError, param::Path, payload::Json, ApiResponse, OpenApi,
    OpenApiService, Tags,
};
use registry_api::{
    ApiError, CustomerApiProvider, CustomerApiRequest, CustomerDef, CustomerDetailsDef,
    CustomerService,
};

use crate::ws::customer_feed;

#[derive(Tags)]
enum ApiTags {
    Customer,
}

#[derive(ApiResponse)]
enum RegisterResponse {
    #[oai(status = 201)]
    Created(Json<String>),
}

pub struct CustomerApiV1;

#[OpenApi]
impl CustomerApiV1 {
    #[oai(path = "/customers", method = "post", tag = "ApiTags::Customer")]
    async fn register_customer(
        &self,
        data: Data<&Arc<CustomerService>>,
        def: Json<CustomerDef>,
    ) -> poem::Result<RegisterResponse> {
        data.0
            .request(CustomerApiRequest::CreateCustomer { definition: def.0 })
            .await
            .into_unit()
            .map(|_| RegisterResponse::Created(Json("customer registered".to_string())))
    }

    #[oai(path = "/customers", method = "put", tag = "ApiTags::Customer")]
    async fn update_customer(
        &self,
        data: Data<&Arc<CustomerService>>,
        def: Json<CustomerDef>,
    ) -> poem::Result<Json<String>> {
        data.0
            .request(CustomerApiRequest::UpdateCustomer { definition: def.0 })
            .await
            .into_unit()
            .map(|_| Json("customer details updated".to_string()))
    }

    #[oai(path = "/customers", method = "get", tag = "ApiTags::Customer")]
    async fn get_customers(
        &self,
        data: Data<&Arc<CustomerService>>,
    ) -> poem::Result<Json<Vec<CustomerDef>>> {
        data.0
            .request(CustomerApiRequest::GetCustomers)
            .await
            .into_customers()
            .map(Json)
    }

    #[oai(path = "/customers/:id", method = "get", tag = "ApiTags::Customer")]
    async fn get_customer(
        &self,
        data: Data<&Arc<CustomerService>>,
        id: Path<String>,
    ) -> poem::Result<Json<CustomerDetailsDef>> {
        data.0
            .request(CustomerApiRequest::GetCustomer { id: id.0 })
            .await
            .into_customer_details()
            .map(Json)
    }

    #[oai(path = "/customers/:id", method = "delete", tag = "ApiTags::Customer")]
    async fn delete_customer(
        &self,
        data: Data<&Arc<CustomerService>>,
        id: Path<String>,
    ) -> poem::Result<Json<String>> {
        data.0
            .request(CustomerApiRequest::DeleteCustomer { id: id.0 })
            .await
            .into_unit()
            .map(|_| Json("customer deleted".to_string()))
    }
}

/**
 * REST API under `api_base`, the live feed at `/ws`,
 * Swagger UI at `/docs` and the OpenAPI document at `/spec`
 */
pub fn build_route(
    service: Arc<CustomerService>,
    api_base: &str,
    http_addr: &str,
) -> impl Endpoint {
    let api_base = format!("/{}", api_base.trim_start_matches('/'));
    let api_service = OpenApiService::new(
        CustomerApiV1,
        "Customer Registry API Version 1",
        option_env!("CARGO_PKG_VERSION").unwrap_or("<unknown>"),
    )
    .server(&format!("http://{}{}", http_addr, api_base));
    let ui = api_service.swagger_ui();
    let spec = api_service.spec();

    let api_route = Route::new()
        .nest("/", api_service)
        .catch_error(|_: ParseRequestPayloadError| async move {
            ApiError::BadRequest("invalid json body".to_string()).as_response()
        })
        .with(Tracing)
        .with(Cors::new());

    Route::new()
        .at("/ws", get(customer_feed).with(Tracing))
        .at("/spec", poem::endpoint::make_sync(move |_| spec.clone()))
        .nest("/docs", ui)
        .nest(api_base, api_route)
        .data(service)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use poem::{http::StatusCode, test::TestClient};
    use registry_api::CustomerService;
    use serde_json::json;
    use sql_provider::MemoryStore;

    use super::build_route;

    fn client() -> TestClient<impl poem::Endpoint> {
        let service = Arc::new(CustomerService::new(Arc::new(MemoryStore::new())));
        TestClient::new(build_route(service, "/api", "localhost:8080"))
    }

    fn hardik() -> serde_json::Value {
        json!({
            "id": "hs",
            "customerDetails": {
                "name": "hardik",
                "address": "udaipur",
                "contactNo": 9999999999i64
            }
        })
    }

    #[tokio::test]
    async fn test_register_customer() {
        let cli = client();
        let resp = cli.post("/api/customers").body_json(&hardik()).send().await;
        resp.assert_status(StatusCode::CREATED);
        resp.assert_json("customer registered").await;

        let resp = cli.post("/api/customers").body_json(&hardik()).send().await;
        resp.assert_status(StatusCode::CONFLICT);
        resp.assert_json("customer exists").await;

        let resp = cli.get("/api/customers").send().await;
        resp.assert_status_is_ok();
        resp.assert_json(json!([hardik()])).await;
    }

    #[tokio::test]
    async fn test_register_invalid_customer() {
        let cli = client();
        let mut customer = hardik();
        customer["id"] = json!("abc");
        cli.post("/api/customers")
            .body_json(&customer)
            .send()
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let mut customer = hardik();
        customer["customerDetails"]["contactNo"] = json!(12345);
        cli.post("/api/customers")
            .body_json(&customer)
            .send()
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let resp = cli
            .post("/api/customers")
            .content_type("application/json")
            .body("not a customer")
            .send()
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        resp.assert_json("invalid json body").await;

        cli.get("/api/customers")
            .send()
            .await
            .assert_json(json!([]))
            .await;
    }

    #[tokio::test]
    async fn test_get_customer() {
        let cli = client();
        cli.post("/api/customers")
            .body_json(&hardik())
            .send()
            .await
            .assert_status(StatusCode::CREATED);

        let resp = cli.get("/api/customers/hs").send().await;
        resp.assert_status_is_ok();
        resp.assert_json(&hardik()["customerDetails"]).await;

        let resp = cli.get("/api/customers/zz").send().await;
        resp.assert_status(StatusCode::NOT_FOUND);
        resp.assert_json("customer not found").await;
    }

    #[tokio::test]
    async fn test_update_customer() {
        let cli = client();
        let mut customer = hardik();
        customer["customerDetails"]["address"] = json!("jaipur");
        cli.put("/api/customers")
            .body_json(&customer)
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND);

        cli.post("/api/customers")
            .body_json(&hardik())
            .send()
            .await
            .assert_status(StatusCode::CREATED);
        let resp = cli.put("/api/customers").body_json(&customer).send().await;
        resp.assert_status_is_ok();
        resp.assert_json("customer details updated").await;

        cli.get("/api/customers/hs")
            .send()
            .await
            .assert_json(&customer["customerDetails"])
            .await;
    }

    #[tokio::test]
    async fn test_delete_customer() {
        let cli = client();
        cli.post("/api/customers")
            .body_json(&hardik())
            .send()
            .await
            .assert_status(StatusCode::CREATED);

        let resp = cli.delete("/api/customers/hs").send().await;
        resp.assert_status_is_ok();
        resp.assert_json("customer deleted").await;

        cli.delete("/api/customers/hs")
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_spec() {
        let resp = client().get("/spec").send().await;
        resp.assert_status_is_ok();
        let spec: serde_json::Value =
            serde_json::from_str(&resp.0.into_body().into_string().await.unwrap()).unwrap();
        assert!(spec["paths"]["/customers/{id}"].is_object());
    }
}
