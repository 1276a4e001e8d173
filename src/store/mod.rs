//! Generic soft-delete record store.
//!
//! Every persisted entity carries the same base columns (`id`,
//! `is_deleted`, `create_user_id`, `create_time`, `delete_user_id`,
//! `delete_time`). Implementing [`SoftDeleteEntity`] for an entity buys it
//! the shared CRUD semantics: reads filter deleted rows, mutation requires
//! ownership, and deletion is terminal. Patch application stays in the
//! handlers so each entity's mutable-field set is explicit.

use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    FromQueryResult, IntoActiveModel, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select, SqlErr,
};

use crate::error::AppError;

/// Column map and kind descriptor for a soft-deletable entity.
pub trait SoftDeleteEntity: EntityTrait {
    /// Cache key prefix, e.g. `blog` in `blog_{id}`.
    const KIND: &'static str;
    /// Human label used in error messages.
    const NAME: &'static str;

    fn id_col() -> Self::Column;
    fn is_deleted_col() -> Self::Column;
    fn create_user_id_col() -> Self::Column;
    fn create_time_col() -> Self::Column;
    fn delete_user_id_col() -> Self::Column;
    fn delete_time_col() -> Self::Column;
}

/// Read access to the base columns of a loaded row.
pub trait SoftDeleteModel {
    fn id(&self) -> &str;
    fn create_user_id(&self) -> Option<&str>;
}

/// One page of results plus the total row count across all pages.
pub struct Page<M> {
    pub items: Vec<M>,
    pub total: u64,
}

fn not_found<E: SoftDeleteEntity>() -> AppError {
    AppError::NotFound(format!("{} not found", E::NAME))
}

/// Select builder pre-filtered to live (non-deleted) rows.
pub fn live<E: SoftDeleteEntity>() -> Select<E> {
    E::find().filter(E::is_deleted_col().eq(false))
}

/// Fetch a row by id, treating soft-deleted rows as absent.
pub async fn find_live<E, C>(db: &C, id: &str) -> Result<E::Model, AppError>
where
    E: SoftDeleteEntity,
    C: ConnectionTrait,
{
    live::<E>()
        .filter(E::id_col().eq(id))
        .one(db)
        .await?
        .ok_or_else(not_found::<E>)
}

/// Fetch a live row and verify the acting user owns it.
///
/// A row with a null `create_user_id` (anonymous creation) never matches
/// any acting user.
pub async fn find_owned<E, C>(db: &C, id: &str, acting_user_id: &str) -> Result<E::Model, AppError>
where
    E: SoftDeleteEntity,
    E::Model: SoftDeleteModel,
    C: ConnectionTrait,
{
    let model = find_live::<E, C>(db, id).await?;
    if model.create_user_id() != Some(acting_user_id) {
        return Err(AppError::PermissionDenied);
    }
    Ok(model)
}

/// Insert a row, mapping unique-constraint violations to `Conflict`.
pub async fn insert<A, C>(db: &C, active: A) -> Result<<A::Entity as EntityTrait>::Model, AppError>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    A::Entity: SoftDeleteEntity,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    active.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(format!(
            "{} already exists",
            <A::Entity as SoftDeleteEntity>::NAME
        )),
        _ => AppError::from(e),
    })
}

/// Run a paginated query over a pre-filtered select.
///
/// The live filter is applied here so callers cannot forget it. Pages are
/// 1-indexed; `total` counts every matching row regardless of page. When no
/// explicit ordering is given, rows come back newest-first with the id as a
/// stable tie-break.
pub async fn page<E, C>(
    db: &C,
    select: Select<E>,
    order_by: Option<(E::Column, Order)>,
    page: u64,
    page_size: u64,
) -> Result<Page<E::Model>, AppError>
where
    E: SoftDeleteEntity,
    E::Model: FromQueryResult + Send + Sync,
    C: ConnectionTrait,
{
    let select = select.filter(E::is_deleted_col().eq(false));

    let total = select.clone().paginate(db, page_size).num_items().await?;

    let select = match order_by {
        Some((col, order)) => select.order_by(col, order),
        None => select.order_by_desc(E::create_time_col()),
    };

    // Saturate rather than overflow on absurd page numbers; the query
    // then simply returns an empty page.
    let items = select
        .order_by_asc(E::id_col())
        .offset(Some((page - 1).saturating_mul(page_size)))
        .limit(Some(page_size))
        .all(db)
        .await?;

    Ok(Page { items, total })
}

/// Soft-delete a live row owned by the acting user.
///
/// The delete statement itself re-checks `is_deleted = false`, so a racing
/// second delete affects zero rows and reports `NotFound` rather than
/// silently succeeding. Deletion is terminal: no read or write path ever
/// clears the flag again.
pub async fn soft_delete<E, C>(db: &C, id: &str, acting_user_id: &str) -> Result<(), AppError>
where
    E: SoftDeleteEntity,
    E::Model: SoftDeleteModel,
    C: ConnectionTrait,
{
    find_owned::<E, C>(db, id, acting_user_id).await?;
    mark_deleted::<E, C>(db, id, acting_user_id).await
}

/// Flip the soft-delete columns without an ownership check.
///
/// Used directly only where the authorization rule is not creator-based
/// (user self-deletion); everything else goes through [`soft_delete`].
pub async fn mark_deleted<E, C>(db: &C, id: &str, acting_user_id: &str) -> Result<(), AppError>
where
    E: SoftDeleteEntity,
    C: ConnectionTrait,
{
    let result = E::update_many()
        .col_expr(E::is_deleted_col(), Expr::value(true))
        .col_expr(E::delete_user_id_col(), Expr::value(acting_user_id))
        .col_expr(E::delete_time_col(), Expr::value(chrono::Utc::now()))
        .filter(E::id_col().eq(id))
        .filter(E::is_deleted_col().eq(false))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(not_found::<E>());
    }
    Ok(())
}

/// Atomically add `delta` to a counter column of a live row.
///
/// Decrements never take the counter below zero: the statement carries a
/// `column > 0` guard and simply affects no rows at the floor. Returns
/// whether a row was updated.
pub async fn bump_counter<E, C>(
    db: &C,
    id: &str,
    column: E::Column,
    delta: i32,
) -> Result<bool, AppError>
where
    E: SoftDeleteEntity,
    C: ConnectionTrait,
{
    let mut update = E::update_many()
        .col_expr(column, Expr::col(column).add(delta))
        .filter(E::id_col().eq(id))
        .filter(E::is_deleted_col().eq(false));

    if delta < 0 {
        update = update.filter(column.gt(0));
    }

    let result = update.exec(db).await?;
    Ok(result.rows_affected > 0)
}
