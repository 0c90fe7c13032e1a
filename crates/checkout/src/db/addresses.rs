//! Address repository for database operations.
//!
//! The validation-status blob is serialized to JSON here and nowhere else;
//! the rest of the service works with the typed
//! [`AddressValidationStatus`] record.

use sqlx::{PgPool, Row, postgres::PgRow};

use driftwood_core::{AddressId, AddressKind, AddressValidationStatus};

use super::RepositoryError;
use crate::models::CustomerAddress;
use crate::services::validation::AddressBook;

/// Repository for address-book database operations.
#[derive(Clone)]
pub struct AddressRepository {
    pool: PgPool,
}

impl AddressRepository {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn address_from_row(row: &PgRow) -> Result<CustomerAddress, RepositoryError> {
        let id: String = row.try_get("id")?;
        let kind_raw: String = row.try_get("kind")?;
        let kind: AddressKind = kind_raw.parse().map_err(|e: String| {
            RepositoryError::DataCorruption(format!("invalid address kind in database: {e}"))
        })?;
        let status_raw: Option<String> = row.try_get("validation_status")?;

        Ok(CustomerAddress {
            id: AddressId::new(id),
            customer_id: row.try_get("customer_id")?,
            street: row.try_get("street")?,
            house_number: row.try_get("house_number")?,
            city: row.try_get("city")?,
            postal_code: row.try_get("postal_code")?,
            country_code: row.try_get("country_code")?,
            kind,
            validation_status: decode_status(status_raw.as_deref()),
        })
    }
}

impl AddressBook for AddressRepository {
    /// Get an address by its address-book key.
    async fn find(&self, id: &AddressId) -> Result<Option<CustomerAddress>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, customer_id, street, house_number, city, postal_code,
                   country_code, kind, validation_status
            FROM customer_address
            WHERE id = $1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::address_from_row).transpose()
    }

    /// Upsert an address together with its validation status.
    ///
    /// The field update and the status-blob write happen in one
    /// transaction, so a partially applied correction can never be
    /// observed.
    async fn save(&self, address: &CustomerAddress) -> Result<(), RepositoryError> {
        let status_blob = address
            .validation_status
            .as_ref()
            .map(encode_status)
            .transpose()?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO customer_address
                (id, customer_id, street, house_number, city, postal_code,
                 country_code, kind, validation_status, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now())
            ON CONFLICT (id) DO UPDATE SET
                street = EXCLUDED.street,
                house_number = EXCLUDED.house_number,
                city = EXCLUDED.city,
                postal_code = EXCLUDED.postal_code,
                country_code = EXCLUDED.country_code,
                kind = EXCLUDED.kind,
                validation_status = EXCLUDED.validation_status,
                updated_at = now()
            ",
        )
        .bind(address.id.as_str())
        .bind(&address.customer_id)
        .bind(&address.street)
        .bind(&address.house_number)
        .bind(&address.city)
        .bind(&address.postal_code)
        .bind(&address.country_code)
        .bind(address.kind.to_string())
        .bind(status_blob)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Deserialize a stored status blob.
///
/// A malformed blob is treated the same as no status at all, so the address
/// fails open to re-validation rather than poisoning every later request.
fn decode_status(raw: Option<&str>) -> Option<AddressValidationStatus> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::warn!(error = %e, "discarding malformed validation-status blob");
            None
        }
    }
}

/// Serialize a status to its blob form.
fn encode_status(status: &AddressValidationStatus) -> Result<String, RepositoryError> {
    serde_json::to_string(status)
        .map_err(|e| RepositoryError::DataCorruption(format!("unserializable status: {e}")))
}
