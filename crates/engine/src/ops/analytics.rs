use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, Statement, prelude::*};

use crate::{EngineError, Expense, MoneyCents, ResultEngine, expenses};

use super::Engine;

/// Dashboard summary: this month against last, where the money went, and
/// what happened recently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyticsOverview {
    pub current_month_total: MoneyCents,
    pub previous_month_total: MoneyCents,
    pub top_categories: Vec<CategorySpending>,
    pub recent_expenses: Vec<Expense>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySpending {
    pub name: String,
    pub total: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthlySpending {
    pub year: i32,
    pub month: u32,
    pub total: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpendingForecast {
    pub avg_daily: MoneyCents,
    pub projected_month_total: MoneyCents,
}

fn ymd(year: i32, month: u32, day: u32) -> ResultEngine<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| EngineError::Validation("date out of range".to_string()))
}

fn month_start(date: NaiveDate) -> ResultEngine<NaiveDate> {
    ymd(date.year(), date.month(), 1)
}

/// First day of the month `offset` months before the one containing `date`.
fn months_back(date: NaiveDate, offset: i32) -> ResultEngine<NaiveDate> {
    let index = date.year() * 12 + date.month() as i32 - 1 - offset;
    ymd(index.div_euclid(12), (index.rem_euclid(12) + 1) as u32, 1)
}

fn days_in_month(date: NaiveDate) -> ResultEngine<i64> {
    let start = month_start(date)?;
    let next = months_back(date, -1)?;
    Ok((next - start).num_days())
}

impl Engine {
    /// Sums `amount_cents` over `[from, to)` for a user.
    async fn spent_between(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ResultEngine<MoneyCents> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT COALESCE(SUM(amount_cents), 0) AS sum \
             FROM expenses \
             WHERE user_id = ? AND expense_date >= ? AND expense_date < ?",
            [user_id.into(), from.into(), to.into()],
        );
        let row = self.database.query_one(stmt).await?;
        let cents: i64 = row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0);
        Ok(MoneyCents::new(cents))
    }

    async fn top_categories_between(
        &self,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<CategorySpending>> {
        let backend = self.database.get_database_backend();
        let limit_clause = match limit {
            Some(n) => format!(" LIMIT {n}"),
            None => String::new(),
        };
        let stmt = Statement::from_sql_and_values(
            backend,
            format!(
                "SELECT c.name AS name, COALESCE(SUM(e.amount_cents), 0) AS total \
                 FROM expenses e \
                 JOIN categories c ON e.category_id = c.id \
                 WHERE e.user_id = ? AND e.expense_date >= ? AND e.expense_date < ? \
                 GROUP BY c.name \
                 ORDER BY total DESC{limit_clause}"
            ),
            [user_id.into(), from.into(), to.into()],
        );
        let rows = self.database.query_all(stmt).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(CategorySpending {
                name: row.try_get("", "name")?,
                total: MoneyCents::new(row.try_get("", "total")?),
            });
        }
        Ok(out)
    }

    /// Dashboard overview: current and previous month totals, the top 3
    /// categories this month, and the 5 most recent expenses.
    pub async fn analytics_overview(&self, user_id: i64) -> ResultEngine<AnalyticsOverview> {
        let today = Utc::now().date_naive();
        let current_start = month_start(today)?;
        let next_start = months_back(today, -1)?;
        let previous_start = months_back(today, 1)?;

        let current_month_total = self
            .spent_between(user_id, current_start, next_start)
            .await?;
        let previous_month_total = self
            .spent_between(user_id, previous_start, current_start)
            .await?;
        let top_categories = self
            .top_categories_between(user_id, current_start, next_start, Some(3))
            .await?;

        let recent_models = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user_id))
            .order_by_desc(expenses::Column::ExpenseDate)
            .order_by_desc(expenses::Column::Id)
            .limit(5)
            .all(&self.database)
            .await?;
        let mut recent_expenses = Vec::with_capacity(recent_models.len());
        for model in recent_models {
            recent_expenses.push(Expense::try_from(model)?);
        }

        Ok(AnalyticsOverview {
            current_month_total,
            previous_month_total,
            top_categories,
            recent_expenses,
        })
    }

    /// Current-month spending grouped by category name.
    pub async fn spending_by_category(&self, user_id: i64) -> ResultEngine<Vec<CategorySpending>> {
        let today = Utc::now().date_naive();
        let from = month_start(today)?;
        let to = months_back(today, -1)?;
        self.top_categories_between(user_id, from, to, None).await
    }

    /// Monthly totals over the last 12 months, oldest first.
    ///
    /// Grouping happens on the rows rather than in SQL to keep the month
    /// arithmetic out of the dialect.
    pub async fn monthly_trends(&self, user_id: i64) -> ResultEngine<Vec<MonthlySpending>> {
        let today = Utc::now().date_naive();
        let from = months_back(today, 11)?;

        let rows: Vec<(NaiveDate, i64)> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::ExpenseDate)
            .column(expenses::Column::AmountCents)
            .filter(expenses::Column::UserId.eq(user_id))
            .filter(expenses::Column::ExpenseDate.gte(from))
            .into_tuple()
            .all(&self.database)
            .await?;

        let mut totals: BTreeMap<(i32, u32), i64> = BTreeMap::new();
        for (date, cents) in rows {
            *totals.entry((date.year(), date.month())).or_insert(0) += cents;
        }

        Ok(totals
            .into_iter()
            .map(|((year, month), cents)| MonthlySpending {
                year,
                month,
                total: MoneyCents::new(cents),
            })
            .collect())
    }

    /// Projects this month's total from the average daily spend of the last
    /// 90 days (averaged over days with at least one expense).
    pub async fn forecast(&self, user_id: i64) -> ResultEngine<SpendingForecast> {
        let today = Utc::now().date_naive();
        let from = today - chrono::Duration::days(90);

        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT COALESCE(SUM(amount_cents), 0) AS total, \
                    COUNT(DISTINCT expense_date) AS days \
             FROM expenses \
             WHERE user_id = ? AND expense_date >= ?",
            [user_id.into(), from.into()],
        );
        let row = self.database.query_one(stmt).await?;
        let (total, days): (i64, i64) = match row {
            Some(row) => (
                row.try_get("", "total").unwrap_or(0),
                row.try_get("", "days").unwrap_or(0),
            ),
            None => (0, 0),
        };

        let days = days.max(1);
        let avg_daily = total as f64 / days as f64;
        let projected = avg_daily * days_in_month(today)? as f64;

        Ok(SpendingForecast {
            avg_daily: MoneyCents::new(avg_daily.round() as i64),
            projected_month_total: MoneyCents::new(projected.round() as i64),
        })
    }
}
