use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    serve, Json, Router,
};
use serde_json::{Map, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::application::product_service::ProductService;
use crate::errors::AppError;
use products_types::domain::product::{validate_name, validate_price, Product, ValidationError};
use products_types::ports::product_repository::ProductRepository;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

#[derive(Clone)]
pub struct HttpServer<R>
where
    R: ProductRepository,
{
    pub service: Arc<ProductService<R>>,
    pub config: HttpServerConfig,
}

/// Body of `POST /api/products`. Fields stay untyped until `validate` so that
/// a wrong JSON type yields the same field error as a bad value.
#[derive(Debug, Default)]
pub struct CreateProductRequest {
    pub name: Option<Value>,
    pub price: Option<Value>,
}

impl From<Map<String, Value>> for CreateProductRequest {
    fn from(mut fields: Map<String, Value>) -> Self {
        Self {
            name: fields.remove("name"),
            price: fields.remove("price"),
        }
    }
}

impl CreateProductRequest {
    /// Only a JSON object carries fields; any other body has neither.
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Object(fields) => fields.into(),
            _ => Self::default(),
        }
    }

    /// Name is checked first, then price.
    pub fn validate(&self) -> Result<(String, f64), ValidationError> {
        let name = match &self.name {
            Some(Value::String(s)) => validate_name(s)?,
            _ => return Err(ValidationError::InvalidName),
        };
        let price = match &self.price {
            Some(Value::Number(n)) => n.as_f64().ok_or(ValidationError::InvalidPrice)?,
            _ => return Err(ValidationError::InvalidPrice),
        };
        Ok((name, validate_price(price)?))
    }
}

pub fn router<R>(service: Arc<ProductService<R>>) -> Router
where
    R: ProductRepository + Send + Sync + 'static,
{
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            let request_id = Uuid::new_v4();
            tracing::info_span!(
                "http_request",
                %request_id,
                method = %request.method(),
                uri
            )
        })
        .on_request(
            |request: &axum::extract::Request<_>, span: &tracing::Span| {
                tracing::info!(
                    parent: span,
                    method = %request.method(),
                    path = %request.uri().path(),
                    "request"
                );
            },
        )
        .on_response(
            |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                tracing::info!(
                    parent: span,
                    status = %response.status(),
                    latency_ms = %latency.as_millis(),
                    "response"
                );
            },
        );

    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/products",
            get(list_products::<R>).post(create_product::<R>),
        )
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(service)
}

impl<R> HttpServer<R>
where
    R: ProductRepository + Send + Sync + 'static,
{
    pub async fn new(service: ProductService<R>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    /// Serves until Ctrl-C, then closes the product store.
    pub async fn run(self) -> anyhow::Result<()> {
        let app = router(self.service.clone());

        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("server stopped, closing product store");
        self.service.close().await;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}

async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "ok": true })))
}

async fn create_product<R>(
    State(service): State<Arc<ProductService<R>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), AppError>
where
    R: ProductRepository + Send + Sync + 'static,
{
    let body = match payload {
        Ok(Json(body)) => body,
        // Without a JSON content type the body carries no fields.
        Err(JsonRejection::MissingJsonContentType(_)) => Value::Null,
        Err(rejection) => return Err(rejection_error(rejection)),
    };
    let (name, price) = CreateProductRequest::from_body(body).validate()?;
    let product = service.create_product(&name, price).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

fn rejection_error(rejection: JsonRejection) -> AppError {
    let detail = rejection.body_text();
    tracing::debug!(%detail, "rejected request body");
    // An unrepresentable number is the only way a price can fail to parse.
    if detail.contains("number out of range") {
        return ValidationError::InvalidPrice.into();
    }
    AppError::BadRequest("Invalid JSON body".into())
}

async fn list_products<R>(
    State(service): State<Arc<ProductService<R>>>,
) -> Result<Json<Vec<Product>>, AppError>
where
    R: ProductRepository + Send + Sync + 'static,
{
    let list = service.list_products().await?;
    Ok(Json(list))
}
