use std::{error::Error, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clientela::domain::{
    customer::{self, Customer, CustomerFields, CustomerId, CustomerRepository, ValidationError},
    StoreError,
};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

pub type Repository = Arc<dyn CustomerRepository>;

pub fn router(repository: Repository) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/read", post(index))
        .route("/create", post(create))
        .route("/update/:id", post(update))
        .route("/delete/:id", post(read).delete(remove))
        .with_state(repository)
}

#[derive(Serialize)]
pub struct Message {
    message: String,
}

impl Message {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(ValidationError),
    #[error("customer not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(Box<dyn Error + Send + Sync>),
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => Self::NotFound,
            StoreError::Unavailable(source) => Self::Unavailable(source),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(Message::new(self.to_string()))).into_response()
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn index(
    State(repository): State<Repository>,
) -> Result<Json<Vec<CustomerFields>>, ApiError> {
    let customers = repository.find_all().await?;
    Ok(Json(customers.iter().map(Customer::fields).collect()))
}

async fn create(
    State(repository): State<Repository>,
    Json(fields): Json<CustomerFields>,
) -> Result<String, ApiError> {
    let fields = validated(fields)?;
    let mut customer = Customer::new(fields);
    repository.save(&mut customer).await?;
    info!("created customer {:?}", customer.id());
    Ok("Customer created".to_owned())
}

async fn read(
    State(repository): State<Repository>,
    Path(id): Path<u64>,
) -> Result<Json<CustomerFields>, ApiError> {
    let customer = repository
        .find_by_id(CustomerId::from(id))
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(customer.fields()))
}

async fn update(
    State(repository): State<Repository>,
    Path(id): Path<u64>,
    Json(fields): Json<CustomerFields>,
) -> Result<Json<Message>, ApiError> {
    let fields = validated(fields)?;
    let mut customer = repository
        .find_by_id(CustomerId::from(id))
        .await?
        .ok_or(ApiError::NotFound)?;
    customer.apply(fields);
    repository.save(&mut customer).await?;
    info!("updated customer {}", id);
    Ok(Json(Message::new("Customer updated")))
}

async fn remove(
    State(repository): State<Repository>,
    Path(id): Path<u64>,
) -> Result<Json<Message>, ApiError> {
    let id = CustomerId::from(id);
    // Existence check first so a missing row is a deterministic 404.
    repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    repository.delete(id).await?;
    info!("deleted customer {}", id);
    Ok(Json(Message::new("Customer deleted")))
}

fn validated(fields: CustomerFields) -> Result<CustomerFields, ApiError> {
    let violations = customer::validate(&fields);
    if violations.is_empty() {
        Ok(fields)
    } else {
        Err(ApiError::Validation(ValidationError::from(violations)))
    }
}
