use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, prelude::*};

use crate::{ChangeType, ResultEngine, audit_logs};

use super::Engine;

impl Engine {
    /// Appends an audit entry inside the caller's transaction, so the change
    /// and its trail commit or roll back together.
    pub(super) async fn record_audit(
        db_tx: &DatabaseTransaction,
        expense_id: i64,
        change_type: ChangeType,
        changed_by: i64,
        old_values: Option<&serde_json::Value>,
        new_values: Option<&serde_json::Value>,
    ) -> ResultEngine<()> {
        let active = audit_logs::ActiveModel {
            expense_id: ActiveValue::Set(expense_id),
            change_type: ActiveValue::Set(change_type.as_str().to_string()),
            changed_by: ActiveValue::Set(changed_by),
            old_values: ActiveValue::Set(old_values.map(ToString::to_string)),
            new_values: ActiveValue::Set(new_values.map(ToString::to_string)),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };
        active.insert(db_tx).await?;
        Ok(())
    }
}
