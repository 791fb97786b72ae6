use chrono::{Duration, Utc};
use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{ChangeType, EngineError, ResultEngine, expenses};

use super::super::super::{Engine, with_tx};

impl Engine {
    /// Deletes a single expense, writing the audit entry first so the last
    /// snapshot survives the row.
    pub async fn delete_expense(&self, user_id: i64, expense_id: i64) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = Self::load_owned_expense(&db_tx, user_id, expense_id).await?;

            let before = expenses::snapshot(&model)?;
            Self::record_audit(
                &db_tx,
                model.id,
                ChangeType::Delete,
                user_id,
                Some(&before),
                None,
            )
            .await?;

            model.delete(&db_tx).await?;
            tracing::info!(expense_id, user_id, "expense deleted");
            Ok(())
        })
    }

    /// Deletes a batch of expenses the user owns.
    ///
    /// Rejects the whole batch when any selected expense is older than one
    /// year. Ids that do not exist or belong to someone else are skipped.
    /// Returns the number of rows deleted.
    pub async fn bulk_delete_expenses(&self, user_id: i64, ids: &[i64]) -> ResultEngine<u64> {
        if ids.is_empty() {
            return Err(EngineError::Validation("ids array required".to_string()));
        }
        let one_year_ago = Utc::now().date_naive() - Duration::days(365);

        with_tx!(self, |db_tx| {
            let rows = expenses::Entity::find()
                .filter(expenses::Column::UserId.eq(user_id))
                .filter(expenses::Column::Id.is_in(ids.to_vec()))
                .all(&db_tx)
                .await?;

            let too_old: Vec<i64> = rows
                .iter()
                .filter(|row| row.expense_date < one_year_ago)
                .map(|row| row.id)
                .collect();
            if !too_old.is_empty() {
                return Err(EngineError::TooOld(too_old));
            }

            let deleted = rows.len() as u64;
            for row in rows {
                let before = expenses::snapshot(&row)?;
                Self::record_audit(
                    &db_tx,
                    row.id,
                    ChangeType::Delete,
                    user_id,
                    Some(&before),
                    None,
                )
                .await?;
                row.delete(&db_tx).await?;
            }

            tracing::info!(user_id, deleted, "expenses bulk deleted");
            Ok(deleted)
        })
    }
}
