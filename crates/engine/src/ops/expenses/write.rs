use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, expenses};

use super::super::Engine;

mod create;
mod delete;
mod update;

impl Engine {
    /// Loads an expense the user owns, inside the caller's transaction.
    async fn load_owned_expense(
        db_tx: &DatabaseTransaction,
        user_id: i64,
        expense_id: i64,
    ) -> ResultEngine<expenses::Model> {
        expenses::Entity::find_by_id(expense_id)
            .filter(expenses::Column::UserId.eq(user_id))
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense".to_string()))
    }
}
