use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` whose rejections are reported through `AppError`, so a body
/// that is not JSON still gets the `{"error":{code,message}}` shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
