//! Product Repository
//!
//! Storefront listing filters match on the normalized category/brand
//! references only; the legacy name strings are gone after the startup
//! backfill.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{
    CertificationId, Product, ProductCreate, ProductPage, ProductQuery, ProductUpdate,
};
use crate::utils::time::now_millis;
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "product";
const PAGE_SIZE: usize = 10;

#[derive(Deserialize)]
struct CountRow {
    total: usize,
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Paged storefront listing with keyword / reference / flag filters
    pub async fn find_page(&self, query: ProductQuery) -> RepoResult<ProductPage> {
        let mut conditions: Vec<&str> = vec![];

        if query.keyword.is_some() {
            conditions.push("string::lowercase(name) CONTAINS $keyword");
        }
        let category = match &query.category {
            Some(id) => {
                conditions.push("category = $category");
                Some(self.base.parse_id("category", id)?)
            }
            None => None,
        };
        let brand = match &query.brand {
            Some(id) => {
                conditions.push("brand = $brand");
                Some(self.base.parse_id("brand", id)?)
            }
            None => None,
        };
        if query.product_type.is_some() {
            conditions.push("product_type = $product_type");
        }
        if query.is_organic == Some(true) {
            conditions.push("is_organic = true");
        }
        if query.is_vegan == Some(true) {
            conditions.push("is_vegan = true");
        }
        if query.is_gluten_free == Some(true) {
            conditions.push("is_gluten_free = true");
        }
        if query.is_fair_trade == Some(true) {
            conditions.push("is_fair_trade = true");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let page = query.page.unwrap_or(1).max(1);
        let select = format!(
            "SELECT * FROM product{} ORDER BY created_at DESC LIMIT $limit START $start",
            where_clause
        );
        let count = format!(
            "SELECT count() AS total FROM product{} GROUP ALL",
            where_clause
        );

        let mut result = self
            .base
            .db()
            .query(select)
            .query(count)
            .bind(("keyword", query.keyword.map(|k| k.to_lowercase())))
            .bind(("category", category))
            .bind(("brand", brand))
            .bind(("product_type", query.product_type))
            .bind(("limit", PAGE_SIZE))
            .bind(("start", PAGE_SIZE * (page - 1)))
            .await?;

        let products: Vec<Product> = result.take(0)?;
        let total = result
            .take::<Vec<CountRow>>(1)?
            .into_iter()
            .next()
            .map(|r| r.total)
            .unwrap_or(0);

        Ok(ProductPage {
            products,
            page,
            pages: total.div_ceil(PAGE_SIZE),
            total,
        })
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let record = self.base.parse_id(TABLE, id)?;
        let product: Option<Product> = self.base.db().select(record).await?;
        Ok(product)
    }

    pub async fn find_featured(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE is_featured = true ORDER BY created_at DESC LIMIT 8")
            .await?
            .take(0)?;
        Ok(products)
    }

    pub async fn find_new_arrivals(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query(
                "SELECT * FROM product WHERE is_new_arrival = true ORDER BY created_at DESC LIMIT 8",
            )
            .await?
            .take(0)?;
        Ok(products)
    }

    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if let Some(ref sku) = data.sku
            && self.find_by_sku(sku).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Product with SKU '{}' already exists",
                sku
            )));
        }

        let category = match &data.category {
            Some(id) => Some(self.base.parse_id("category", id)?),
            None => None,
        };
        let brand = match &data.brand {
            Some(id) => Some(self.base.parse_id("brand", id)?),
            None => None,
        };
        let certifications: Vec<CertificationId> = data
            .certifications
            .iter()
            .map(|id| self.base.parse_id("certification", id))
            .collect::<RepoResult<_>>()?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE product SET
                    name = $name,
                    description = $description,
                    image = $image,
                    category = $category,
                    brand = $brand,
                    product_type = $product_type,
                    certifications = $certifications,
                    weight = $weight,
                    unit = $unit,
                    price = $price,
                    price_per_unit = $price_per_unit,
                    count_in_stock = $count_in_stock,
                    is_organic = $is_organic,
                    is_vegan = $is_vegan,
                    is_gluten_free = $is_gluten_free,
                    is_fair_trade = $is_fair_trade,
                    is_featured = $is_featured,
                    is_new_arrival = $is_new_arrival,
                    sku = $sku,
                    tags = $tags,
                    rating = 0,
                    num_reviews = 0,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("description", data.description))
            .bind(("image", data.image))
            .bind(("category", category))
            .bind(("brand", brand))
            .bind(("product_type", data.product_type))
            .bind(("certifications", certifications))
            .bind(("weight", data.weight))
            .bind(("unit", data.unit))
            .bind(("price", data.price))
            .bind(("price_per_unit", data.price_per_unit))
            .bind(("count_in_stock", data.count_in_stock))
            .bind(("is_organic", data.is_organic))
            .bind(("is_vegan", data.is_vegan))
            .bind(("is_gluten_free", data.is_gluten_free))
            .bind(("is_fair_trade", data.is_fair_trade))
            .bind(("is_featured", data.is_featured))
            .bind(("is_new_arrival", data.is_new_arrival))
            .bind(("sku", data.sku))
            .bind(("tags", data.tags))
            .bind(("created_at", now_millis()))
            .await?;

        let created: Option<Product> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let record = self.base.parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        let updated: Option<Product> = self.base.db().update(record).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record = self.base.parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        let _: Option<Product> = self.base.db().delete(record).await?;
        Ok(true)
    }

    /// Decrement stock after an order is placed
    pub async fn decrement_stock(&self, id: &str, qty: u32) -> RepoResult<()> {
        let record = self.base.parse_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $product SET count_in_stock -= $qty")
            .bind(("product", record))
            .bind(("qty", qty))
            .await?;
        Ok(())
    }

    async fn find_by_sku(&self, sku: &str) -> RepoResult<Option<Product>> {
        let sku = sku.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE sku = $sku LIMIT 1")
            .bind(("sku", sku))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }
}
