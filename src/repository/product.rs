use chrono::Local;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::product::{
        NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
        UpdateProduct as DomainUpdateProduct,
    },
    models::category::Category as DbCategory,
    models::product::{
        NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
        encode_images,
    },
    repository::{DieselRepository, ProductReader, ProductWriter},
};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::{categories, products};

        let mut conn = self.conn()?;
        let row = products::table
            .inner_join(categories::table)
            .filter(products::id.eq(id))
            .select((DbProduct::as_select(), DbCategory::as_select()))
            .first::<(DbProduct, DbCategory)>(&mut conn)
            .optional()?;

        Ok(row.map(DomainProduct::from))
    }

    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<DomainProduct>> {
        use crate::schema::{categories, products};

        if query.limit == Some(0) {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;

        let mut items = products::table
            .inner_join(categories::table)
            .select((DbProduct::as_select(), DbCategory::as_select()))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(category_ids) = query.category_ids.as_ref() {
            items = items.filter(products::category_id.eq_any(category_ids.clone()));
        }

        if query.featured_only {
            items = items.filter(products::is_featured.eq(true));
        }

        items = items.order(products::id.asc());

        if let Some(limit) = query.limit {
            items = items.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows = items.load::<(DbProduct, DbCategory)>(&mut conn)?;

        Ok(rows.into_iter().map(DomainProduct::from).collect())
    }

    fn count_products(&self) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let total = products::table.count().get_result::<i64>(&mut conn)?;

        Ok(total as usize)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_new = DbNewProduct::from(new_product);

        let created = diesel::insert_into(products::table)
            .values(&db_new)
            .get_result::<DbProduct>(&mut conn)?;

        with_category(&mut conn, created)
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateProduct::from(updates);

        let updated = diesel::update(products::table.filter(products::id.eq(product_id)))
            .set(&db_updates)
            .get_result::<DbProduct>(&mut conn)?;

        with_category(&mut conn, updated)
    }

    fn update_product_images(
        &self,
        product_id: i32,
        images: &[String],
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let updated = diesel::update(products::table.filter(products::id.eq(product_id)))
            .set((
                products::images.eq(encode_images(images)),
                products::updated_at.eq(Local::now().naive_utc()),
            ))
            .get_result::<DbProduct>(&mut conn)?;

        with_category(&mut conn, updated)
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let deleted =
            diesel::delete(products::table.filter(products::id.eq(product_id))).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn with_category(
    conn: &mut SqliteConnection,
    product: DbProduct,
) -> RepositoryResult<DomainProduct> {
    use crate::schema::categories;

    let category = categories::table
        .filter(categories::id.eq(product.category_id))
        .first::<DbCategory>(conn)?;

    Ok(DomainProduct::from((product, category)))
}
