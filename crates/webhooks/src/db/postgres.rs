//! `PostgreSQL` implementation of [`WebhookStore`].
//!
//! Every write is a single `INSERT ... ON CONFLICT (shopify_id) DO UPDATE`,
//! so concurrent deliveries for the same Shopify id converge on one row.
//! Tag replacement runs in the same transaction as the customer upsert.

use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use tracing::instrument;

use shopsync_core::{ShopifyId, TagName};

use super::{StoreCounts, StoreError, StoreResult, WebhookStore};
use crate::models::{Customer, CustomerDetails, Shop, ShopDetails};

const CUSTOMER_INSERT: &str = r"
    INSERT INTO webhooks.customer (
        shopify_id, email, first_name, last_name, note, orders_count, state,
        tax_exempt, total_spent, verified_email, accepts_marketing,
        multipass_identifier, last_order_id, last_order_name,
        shopify_created_at, shopify_updated_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
";

const SHOP_COLUMNS: [&str; 38] = [
    "name",
    "email",
    "customer_email",
    "domain",
    "myshopify_domain",
    "address1",
    "city",
    "province",
    "province_code",
    "country",
    "country_code",
    "country_name",
    "zip",
    "phone",
    "latitude",
    "longitude",
    "primary_locale",
    "primary_location_id",
    "currency",
    "timezone",
    "iana_timezone",
    "shop_owner",
    "money_format",
    "money_with_currency_format",
    "money_in_emails_format",
    "money_with_currency_in_emails_format",
    "plan_name",
    "plan_display_name",
    "source",
    "google_apps_domain",
    "google_apps_login_enabled",
    "taxes_included",
    "tax_shipping",
    "county_taxes",
    "eligible_for_payments",
    "requires_extra_payments_agreement",
    "password_enabled",
    "has_storefront",
];

/// Build the shop upsert statement from [`SHOP_COLUMNS`].
///
/// `$1` is the Shopify id, followed by one placeholder per column, plus
/// `shopify_created_at` last.
fn shop_upsert_sql() -> String {
    let columns = SHOP_COLUMNS
        .iter()
        .copied()
        .chain(["shopify_created_at"])
        .collect::<Vec<_>>();
    let placeholders = (2..=columns.len() + 1)
        .map(|n| format!("${n}"))
        .collect::<Vec<_>>()
        .join(", ");
    let updates = columns
        .iter()
        .map(|c| format!("{c} = EXCLUDED.{c}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO webhooks.shop (shopify_id, {}) VALUES ($1, {placeholders}) \
         ON CONFLICT (shopify_id) DO UPDATE SET {updates}, updated_at = now() \
         RETURNING *",
        columns.join(", ")
    )
}

fn bind_customer<'q>(
    query: QueryAs<'q, Postgres, Customer, PgArguments>,
    shopify_id: ShopifyId,
    details: &'q CustomerDetails,
) -> QueryAs<'q, Postgres, Customer, PgArguments> {
    query
        .bind(shopify_id)
        .bind(details.email.as_deref())
        .bind(details.first_name.as_deref())
        .bind(details.last_name.as_deref())
        .bind(details.note.as_deref())
        .bind(details.orders_count)
        .bind(details.state)
        .bind(details.tax_exempt)
        .bind(details.total_spent)
        .bind(details.verified_email)
        .bind(details.accepts_marketing)
        .bind(details.multipass_identifier.as_deref())
        .bind(details.last_order_id)
        .bind(details.last_order_name.as_deref())
        .bind(details.shopify_created_at)
        .bind(details.shopify_updated_at)
}

fn bind_shop<'q>(
    query: QueryAs<'q, Postgres, Shop, PgArguments>,
    shopify_id: ShopifyId,
    d: &'q ShopDetails,
) -> QueryAs<'q, Postgres, Shop, PgArguments> {
    query
        .bind(shopify_id)
        .bind(d.name.as_deref())
        .bind(d.email.as_deref())
        .bind(d.customer_email.as_deref())
        .bind(d.domain.as_deref())
        .bind(d.myshopify_domain.as_deref())
        .bind(d.address1.as_deref())
        .bind(d.city.as_deref())
        .bind(d.province.as_deref())
        .bind(d.province_code.as_deref())
        .bind(d.country.as_deref())
        .bind(d.country_code.as_deref())
        .bind(d.country_name.as_deref())
        .bind(d.zip.as_deref())
        .bind(d.phone.as_deref())
        .bind(d.latitude)
        .bind(d.longitude)
        .bind(d.primary_locale.as_deref())
        .bind(d.primary_location_id)
        .bind(d.currency.as_deref())
        .bind(d.timezone.as_deref())
        .bind(d.iana_timezone.as_deref())
        .bind(d.shop_owner.as_deref())
        .bind(d.money_format.as_deref())
        .bind(d.money_with_currency_format.as_deref())
        .bind(d.money_in_emails_format.as_deref())
        .bind(d.money_with_currency_in_emails_format.as_deref())
        .bind(d.plan_name.as_deref())
        .bind(d.plan_display_name.as_deref())
        .bind(d.source.as_deref())
        .bind(d.google_apps_domain.as_deref())
        .bind(d.google_apps_login_enabled)
        .bind(d.taxes_included)
        .bind(d.tax_shipping)
        .bind(d.county_taxes)
        .bind(d.eligible_for_payments)
        .bind(d.requires_extra_payments_agreement)
        .bind(d.password_enabled)
        .bind(d.has_storefront)
        .bind(d.shopify_created_at)
}

/// Map unique violations to [`StoreError::Conflict`].
fn map_write_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(db_err.message().to_owned());
    }
    StoreError::Database(e)
}

/// [`WebhookStore`] backed by the `webhooks` schema.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    shop_upsert: String,
}

impl PostgresStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            shop_upsert: shop_upsert_sql(),
        }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl WebhookStore for PostgresStore {
    #[instrument(skip(self, details, tags), fields(shopify_id = %shopify_id))]
    async fn upsert_customer(
        &self,
        shopify_id: ShopifyId,
        details: &CustomerDetails,
        tags: Option<&[TagName]>,
    ) -> StoreResult<Customer> {
        let sql = format!(
            "{CUSTOMER_INSERT}
            ON CONFLICT (shopify_id) DO UPDATE SET
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                note = EXCLUDED.note,
                orders_count = EXCLUDED.orders_count,
                state = EXCLUDED.state,
                tax_exempt = EXCLUDED.tax_exempt,
                total_spent = EXCLUDED.total_spent,
                verified_email = EXCLUDED.verified_email,
                accepts_marketing = EXCLUDED.accepts_marketing,
                multipass_identifier = EXCLUDED.multipass_identifier,
                last_order_id = EXCLUDED.last_order_id,
                last_order_name = EXCLUDED.last_order_name,
                shopify_created_at = EXCLUDED.shopify_created_at,
                shopify_updated_at = EXCLUDED.shopify_updated_at,
                updated_at = now()
            RETURNING *"
        );

        let mut tx = self.pool.begin().await?;

        let customer = bind_customer(sqlx::query_as(&sql), shopify_id, details)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_write_error)?;

        if let Some(tags) = tags {
            sqlx::query("DELETE FROM webhooks.customer_tag WHERE customer_id = $1")
                .bind(customer.id)
                .execute(&mut *tx)
                .await?;

            if !tags.is_empty() {
                let names: Vec<&str> = tags.iter().map(TagName::as_str).collect();

                // Inserts in key order and never locks existing rows, so
                // concurrent deliveries sharing tags cannot deadlock. An
                // existing tag keeps its first stored spelling.
                sqlx::query(
                    r"
                    INSERT INTO webhooks.tag (name)
                    SELECT n.name FROM unnest($1::text[]) AS n(name)
                    ORDER BY lower(n.name)
                    ON CONFLICT ((lower(name))) DO NOTHING
                    ",
                )
                .bind(&names)
                .execute(&mut *tx)
                .await
                .map_err(map_write_error)?;

                sqlx::query(
                    r"
                    INSERT INTO webhooks.customer_tag (customer_id, tag_id)
                    SELECT $1, t.id
                    FROM webhooks.tag t
                    WHERE lower(t.name) IN (SELECT lower(n) FROM unnest($2::text[]) AS n)
                    ON CONFLICT DO NOTHING
                    ",
                )
                .bind(customer.id)
                .bind(&names)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(customer)
    }

    #[instrument(skip(self, details), fields(shopify_id = %shopify_id, state = %details.state))]
    async fn apply_customer_state(
        &self,
        shopify_id: ShopifyId,
        details: &CustomerDetails,
    ) -> StoreResult<Customer> {
        let sql = format!(
            "{CUSTOMER_INSERT}
            ON CONFLICT (shopify_id) DO UPDATE SET
                state = EXCLUDED.state,
                updated_at = now()
            RETURNING *"
        );

        bind_customer(sqlx::query_as(&sql), shopify_id, details)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    #[instrument(skip(self), fields(shopify_id = %shopify_id))]
    async fn delete_customer(&self, shopify_id: ShopifyId) -> StoreResult<bool> {
        // Links go with the row through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM webhooks.customer WHERE shopify_id = $1")
            .bind(shopify_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, details), fields(shopify_id = %shopify_id))]
    async fn upsert_shop(
        &self,
        shopify_id: ShopifyId,
        details: &ShopDetails,
    ) -> StoreResult<Shop> {
        bind_shop(sqlx::query_as(&self.shop_upsert), shopify_id, details)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn customer_by_shopify_id(
        &self,
        shopify_id: ShopifyId,
    ) -> StoreResult<Option<Customer>> {
        let customer = sqlx::query_as("SELECT * FROM webhooks.customer WHERE shopify_id = $1")
            .bind(shopify_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    async fn customer_tags(&self, shopify_id: ShopifyId) -> StoreResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT t.name
            FROM webhooks.customer c
            JOIN webhooks.customer_tag ct ON ct.customer_id = c.id
            JOIN webhooks.tag t ON t.id = ct.tag_id
            WHERE c.shopify_id = $1
            ORDER BY t.name COLLATE "C"
            "#,
        )
        .bind(shopify_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn shop_by_shopify_id(&self, shopify_id: ShopifyId) -> StoreResult<Option<Shop>> {
        let shop = sqlx::query_as("SELECT * FROM webhooks.shop WHERE shopify_id = $1")
            .bind(shopify_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(shop)
    }

    async fn counts(&self) -> StoreResult<StoreCounts> {
        let (customers, shops, tags, customer_tags): (i64, i64, i64, i64) = sqlx::query_as(
            r"
            SELECT
                (SELECT count(*) FROM webhooks.customer),
                (SELECT count(*) FROM webhooks.shop),
                (SELECT count(*) FROM webhooks.tag),
                (SELECT count(*) FROM webhooks.customer_tag)
            ",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(StoreCounts {
            customers,
            shops,
            tags,
            customer_tags,
        })
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
