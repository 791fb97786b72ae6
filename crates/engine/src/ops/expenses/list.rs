use sea_orm::{
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait, prelude::*,
};

use crate::{EngineError, Expense, ResultEngine, expenses};

use super::super::{Engine, with_tx};
use super::{DEFAULT_PAGE_SIZE, ExpenseListFilter, ExpensePage, MAX_PAGE_SIZE};

fn filtered_query(user_id: i64, filter: &ExpenseListFilter) -> Select<expenses::Entity> {
    let mut query = expenses::Entity::find().filter(expenses::Column::UserId.eq(user_id));
    if let Some(category_id) = filter.category_id {
        query = query.filter(expenses::Column::CategoryId.eq(category_id));
    }
    if let Some(from) = filter.date_from {
        query = query.filter(expenses::Column::ExpenseDate.gte(from));
    }
    if let Some(to) = filter.date_to {
        query = query.filter(expenses::Column::ExpenseDate.lte(to));
    }
    query
}

impl Engine {
    /// Lists a user's expenses, newest first, one page at a time.
    ///
    /// The count and the page rows come from the same transaction so `total`
    /// matches the filtered set.
    pub async fn list_expenses(
        &self,
        user_id: i64,
        filter: &ExpenseListFilter,
    ) -> ResultEngine<ExpensePage> {
        let limit = match filter.limit {
            0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        };
        let page = filter.page.max(1);

        with_tx!(self, |db_tx| {
            let total = filtered_query(user_id, filter).count(&db_tx).await?;

            let rows = filtered_query(user_id, filter)
                .order_by_desc(expenses::Column::ExpenseDate)
                .order_by_desc(expenses::Column::Id)
                .offset((page - 1) * limit)
                .limit(limit)
                .all(&db_tx)
                .await?;

            let mut items = Vec::with_capacity(rows.len());
            for model in rows {
                items.push(Expense::try_from(model)?);
            }

            Ok(ExpensePage {
                items,
                total,
                page,
                limit,
            })
        })
    }

    /// Returns a single expense owned by the user.
    pub async fn get_expense(&self, user_id: i64, expense_id: i64) -> ResultEngine<Expense> {
        let model = expenses::Entity::find_by_id(expense_id)
            .filter(expenses::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense".to_string()))?;
        Expense::try_from(model)
    }

    /// Returns every expense of the user for export, newest first.
    pub async fn export_expenses(&self, user_id: i64) -> ResultEngine<Vec<Expense>> {
        let rows = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user_id))
            .order_by_desc(expenses::Column::ExpenseDate)
            .order_by_desc(expenses::Column::Id)
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for model in rows {
            out.push(Expense::try_from(model)?);
        }
        Ok(out)
    }
}
