// libs/directory-cell/src/services.rs
use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use shared_store::{Collection, DocumentStore, StoreError};

use crate::models::{AddBrandRequest, Brand, DirectoryError, Hospital};

/// Reference data: hospitals are read-only, brands are admin-curated.
pub struct DirectoryService {
    store: Arc<DocumentStore>,
}

impl DirectoryService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list_hospitals(&self) -> Result<Vec<Hospital>, DirectoryError> {
        self.store
            .list_as(Collection::Hospitals)
            .await
            .map_err(|e| DirectoryError::Storage(e.to_string()))
    }

    pub async fn list_brands(&self) -> Result<Vec<Brand>, DirectoryError> {
        self.store
            .list_as(Collection::Brands)
            .await
            .map_err(|e| DirectoryError::Storage(e.to_string()))
    }

    pub async fn add_brand(&self, request: AddBrandRequest) -> Result<Brand, DirectoryError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(DirectoryError::Validation(
                "Brand name is required".to_string(),
            ));
        }

        let stored = self
            .store
            .insert(
                Collection::Brands,
                json!({
                    "name": name,
                    "imageUrl": request.image_url,
                }),
            )
            .await
            .map_err(|e| DirectoryError::Storage(e.to_string()))?;

        let brand: Brand =
            serde_json::from_value(stored).map_err(|e| DirectoryError::Storage(e.to_string()))?;
        info!("brand {} added as {}", brand.name, brand.id);
        Ok(brand)
    }

    pub async fn remove_brand(&self, brand_id: Uuid) -> Result<(), DirectoryError> {
        self.store
            .delete(Collection::Brands, &brand_id.to_string())
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => DirectoryError::BrandNotFound,
                other => DirectoryError::Storage(other.to_string()),
            })?;
        info!("brand {} removed", brand_id);
        Ok(())
    }
}
