use sea_orm::{
    ActiveValue, Condition, DatabaseTransaction, Order, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait, prelude::*,
};
use sea_orm::sea_query::Expr;

use crate::{Category, EngineError, ResultEngine, categories, expenses};

use super::{Engine, with_tx};

const MIN_NAME_LEN: usize = 2;
const MAX_NAME_LEN: usize = 30;

fn normalize_name(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < MIN_NAME_LEN || len > MAX_NAME_LEN {
        return Err(EngineError::Validation(format!(
            "category name must be between {MIN_NAME_LEN} and {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_color(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    let valid = trimmed.len() == 7
        && trimmed.starts_with('#')
        && trimmed[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(EngineError::Validation(
            "color code must be in #RRGGBB format".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

impl Engine {
    /// Lists the categories visible to a user: system categories plus their
    /// own, system first, then by name (case-insensitive).
    pub async fn list_categories(&self, user_id: i64) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .filter(
                Condition::any()
                    .add(categories::Column::UserId.is_null())
                    .add(categories::Column::UserId.eq(user_id)),
            )
            .order_by_desc(categories::Column::IsSystem)
            .order_by(Expr::cust("LOWER(name)"), Order::Asc)
            .all(&self.database)
            .await?;

        Ok(models.into_iter().map(Category::from).collect())
    }

    /// Creates a user category.
    ///
    /// The name must be unique (case-insensitive) among the user's own
    /// categories; system names are not reserved.
    pub async fn create_category(
        &self,
        user_id: i64,
        name: &str,
        color_code: Option<&str>,
    ) -> ResultEngine<Category> {
        let name = normalize_name(name)?;
        let color_code = match color_code {
            Some(value) => normalize_color(value)?,
            None => categories::DEFAULT_COLOR_CODE.to_string(),
        };

        with_tx!(self, |db_tx| {
            if Self::name_taken(&db_tx, user_id, &name, None).await? {
                return Err(EngineError::DuplicateCategory(name));
            }

            let active = categories::ActiveModel {
                user_id: ActiveValue::Set(Some(user_id)),
                name: ActiveValue::Set(name),
                color_code: ActiveValue::Set(color_code),
                is_system: ActiveValue::Set(false),
                ..Default::default()
            };
            let model = active.insert(&db_tx).await?;
            Ok(Category::from(model))
        })
    }

    /// Renames or recolors a user category.
    pub async fn update_category(
        &self,
        user_id: i64,
        category_id: i64,
        name: Option<&str>,
        color_code: Option<&str>,
    ) -> ResultEngine<Category> {
        let name = name.map(normalize_name).transpose()?;
        let color_code = color_code.map(normalize_color).transpose()?;

        with_tx!(self, |db_tx| {
            let model = Self::load_editable(&db_tx, user_id, category_id).await?;

            if let Some(new_name) = &name {
                if Self::name_taken(&db_tx, user_id, new_name, Some(category_id)).await? {
                    return Err(EngineError::DuplicateCategory(new_name.clone()));
                }
            }

            let mut active: categories::ActiveModel = model.into();
            if let Some(new_name) = name {
                active.name = ActiveValue::Set(new_name);
            }
            if let Some(new_color) = color_code {
                active.color_code = ActiveValue::Set(new_color);
            }
            let model = active.update(&db_tx).await?;
            Ok(Category::from(model))
        })
    }

    /// Deletes a user category, refusing while any expense still references it.
    pub async fn delete_category(&self, user_id: i64, category_id: i64) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = Self::load_editable(&db_tx, user_id, category_id).await?;

            let references = expenses::Entity::find()
                .filter(expenses::Column::CategoryId.eq(category_id))
                .count(&db_tx)
                .await?;
            if references > 0 {
                return Err(EngineError::CategoryInUse(format!(
                    "{references} expense(s) still use this category"
                )));
            }

            model.delete(&db_tx).await?;
            Ok(())
        })
    }

    /// Checks that `category_id` is a category the user may attach expenses
    /// to: a system one or one they own.
    pub(super) async fn require_usable_category(
        db_tx: &DatabaseTransaction,
        user_id: i64,
        category_id: i64,
    ) -> ResultEngine<()> {
        let model = categories::Entity::find_by_id(category_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| {
                EngineError::InvalidCategory(format!("category {category_id} does not exist"))
            })?;

        match model.user_id {
            Some(owner) if owner != user_id => Err(EngineError::Forbidden(
                "category belongs to another user".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Loads a category the user is allowed to modify.
    ///
    /// The system check runs before the ownership check, so a system category
    /// reports as such even to users who do not own it.
    async fn load_editable(
        db_tx: &DatabaseTransaction,
        user_id: i64,
        category_id: i64,
    ) -> ResultEngine<categories::Model> {
        let model = categories::Entity::find_by_id(category_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category".to_string()))?;

        if model.is_system {
            return Err(EngineError::SystemCategory(model.name));
        }
        if model.user_id != Some(user_id) {
            return Err(EngineError::Forbidden(
                "category belongs to another user".to_string(),
            ));
        }
        Ok(model)
    }

    async fn name_taken(
        db_tx: &DatabaseTransaction,
        user_id: i64,
        name: &str,
        exclude_id: Option<i64>,
    ) -> ResultEngine<bool> {
        let mut query = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .filter(Expr::cust_with_values(
                "LOWER(name) = LOWER(?)",
                [name.to_string()],
            ));
        if let Some(id) = exclude_id {
            query = query.filter(categories::Column::Id.ne(id));
        }
        Ok(query.one(db_tx).await?.is_some())
    }
}
