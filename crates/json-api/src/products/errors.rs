//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use shopfusion_app::domain::products::ProductsServiceError;

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        ProductsServiceError::InvalidReference
        | ProductsServiceError::MissingRequiredData
        | ProductsServiceError::InvalidQuantity
        | ProductsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid product request")
        }
        ProductsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Product already exists")
        }
        ProductsServiceError::InsufficientStock(product) => {
            StatusError::conflict().brief(format!("Insufficient stock for product {product}"))
        }
        ProductsServiceError::Sql(source) => {
            error!("failed to load products: {source}");

            StatusError::internal_server_error()
        }
    }
}
