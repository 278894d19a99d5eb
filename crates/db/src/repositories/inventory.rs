//! Stock valuation inputs for the balance sheet.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use subledger_core::reports::{InventoryItem, TankStock};
use subledger_shared::types::OrganizationId;

use crate::entities::{materials, storage_tanks};
use crate::error::StoreError;

/// Read-only access to material and tank stock.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Active materials with on-hand quantity and unit price, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn materials(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<InventoryItem>, StoreError> {
        let models = materials::Entity::find()
            .filter(materials::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(materials::Column::IsActive.eq(true))
            .order_by_asc(materials::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Active storage tanks with current level and unit price, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn tanks(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<TankStock>, StoreError> {
        let models = storage_tanks::Entity::find()
            .filter(storage_tanks::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(storage_tanks::Column::IsActive.eq(true))
            .order_by_asc(storage_tanks::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
