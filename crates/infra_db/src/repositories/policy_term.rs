//! Policy term repository implementation
//!
//! Database access for policy terms joined with their owning policy.
//!
//! Searches are built with [`QueryBuilder`] from the domain's predicate list:
//! each predicate becomes one `AND`-ed fragment with bound operands, and the
//! sort column comes from a fixed mapping of [`SortField`] values.
//!
//! The filtered join is `SELECT DISTINCT` inside a derived table; the outer
//! query orders it. Text columns are ordered with the `"C"` collation, giving
//! the same byte-wise order as the in-memory engine.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use core_kernel::{AuditStamp, PolicyId, PolicyTermId};
use domain_policy::{
    Page, Policy, PolicyTerm, SeedData, SeedReport, SortField, TermPredicate, TermQuery,
    TermWithPolicy,
};

use crate::error::DatabaseError;

/// Columns of the term/policy join, aliased to [`PolicyTermRow`] fields
const JOINED_COLUMNS: &str = "\
    t.id AS term_id, t.policy_id, t.term_number, t.state, t.status, \
    t.effective_from_date, t.effective_to_date, t.balance_due, \
    t.next_due_date, t.last_payment_date, \
    t.created_at AS term_created_at, t.updated_at AS term_updated_at, \
    p.policy_number, p.insured_name, \
    p.created_at AS policy_created_at, p.updated_at AS policy_updated_at";

const JOIN: &str = " FROM policy_term t INNER JOIN policy p ON p.id = t.policy_id";

/// Rows per multi-row `INSERT`; stays well below the bind parameter limit
const INSERT_BATCH: usize = 1_000;

/// Repository for policy terms and their policies
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::repositories::PolicyTermRepository;
///
/// let repo = PolicyTermRepository::new(pool);
/// let row = repo.find_by_id(term_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PolicyTermRepository {
    pool: PgPool,
}

impl PolicyTermRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs a filtered, sorted, paged search
    ///
    /// Issues a count over the filtered join and, when the requested page is
    /// within range, the page query itself.
    pub async fn search(&self, query: &TermQuery) -> Result<Page<PolicyTermRow>, DatabaseError> {
        let predicates = query.predicates();

        let mut count = count_query(&predicates);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        let total = u64::try_from(total).unwrap_or_default();

        let rows = if query.page.offset() >= total {
            Vec::new()
        } else {
            let mut select = search_query(query);
            select
                .build_query_as::<PolicyTermRow>()
                .fetch_all(&self.pool)
                .await?
        };

        debug!(
            total,
            returned = rows.len(),
            predicates = predicates.len(),
            "Policy term search"
        );
        Ok(Page::new(rows, query.page, total))
    }

    /// Retrieves a term and its policy by term id
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no term has this id
    pub async fn find_by_id(&self, id: Uuid) -> Result<PolicyTermRow, DatabaseError> {
        let mut select = QueryBuilder::<Postgres>::new("SELECT ");
        select
            .push(JOINED_COLUMNS)
            .push(JOIN)
            .push(" WHERE t.id = ")
            .push_bind(id);

        select
            .build_query_as::<PolicyTermRow>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("PolicyTerm", PolicyTermId::from_uuid(id)))
    }

    /// Replaces every policy and term with `data` in one transaction
    ///
    /// Terms are deleted before policies so the foreign key never dangles.
    /// On any failure the transaction is rolled back and the previous data
    /// stays in place.
    pub async fn replace_all(&self, data: &SeedData) -> Result<SeedReport, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM policy_term").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM policy").execute(&mut *tx).await?;

        for chunk in data.policies.chunks(INSERT_BATCH) {
            let mut insert = insert_policies(chunk);
            insert.build().execute(&mut *tx).await?;
        }
        for chunk in data.terms.chunks(INSERT_BATCH) {
            let mut insert = insert_terms(chunk);
            insert.build().execute(&mut *tx).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        Ok(SeedReport {
            policies: data.policies.len(),
            terms: data.terms.len(),
        })
    }

    /// Verifies the pool can run a trivial query
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

/// Builds the count of distinct terms in the filtered join
pub fn count_query(predicates: &[TermPredicate]) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT count(DISTINCT t.id)");
    builder.push(JOIN);
    push_predicates(&mut builder, predicates);
    builder
}

/// Builds the page query: filter, order with id tie-breaker, limit and offset
pub fn search_query(query: &TermQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT * FROM (SELECT DISTINCT ");
    builder.push(JOINED_COLUMNS).push(JOIN);
    push_predicates(&mut builder, &query.predicates());
    builder.push(") AS joined");

    let direction = if query.sort.direction.is_descending() {
        "DESC"
    } else {
        "ASC"
    };
    builder
        .push(" ORDER BY ")
        .push(sort_column(query.sort.field))
        .push(" ")
        .push(direction)
        .push(", term_id ASC");

    builder
        .push(" LIMIT ")
        .push_bind(i64::from(query.page.size()))
        .push(" OFFSET ")
        .push_bind(i64::try_from(query.page.offset()).unwrap_or(i64::MAX));
    builder
}

/// Appends one `AND`-ed condition per predicate
fn push_predicates(builder: &mut QueryBuilder<'static, Postgres>, predicates: &[TermPredicate]) {
    for (index, predicate) in predicates.iter().enumerate() {
        builder.push(if index == 0 { " WHERE " } else { " AND " });
        match predicate {
            // Literal substring match; % and _ in the operand are ordinary characters
            TermPredicate::PolicyTextContains(needle) => {
                builder
                    .push(format!("(strpos({}, ", ascii_lower("p.policy_number")))
                    .push_bind(needle.clone())
                    .push(format!(") > 0 OR strpos({}, ", ascii_lower("p.insured_name")))
                    .push_bind(needle.clone())
                    .push(") > 0)");
            }
            TermPredicate::StateEquals(state) => {
                builder
                    .push(format!("{} = ", ascii_lower("t.state")))
                    .push_bind(state.clone());
            }
            TermPredicate::StatusEquals(status) => {
                builder
                    .push(format!("{} = ", ascii_lower("t.status")))
                    .push_bind(status.clone());
            }
            TermPredicate::ExpiresOnOrAfter(date) => {
                builder.push("t.effective_to_date >= ").push_bind(*date);
            }
            TermPredicate::ExpiresOnOrBefore(date) => {
                builder.push("t.effective_to_date <= ").push_bind(*date);
            }
        }
    }
}

/// Lowercases A-Z only; `lower()` would follow the database locale
fn ascii_lower(column: &str) -> String {
    format!("translate({column}, 'ABCDEFGHIJKLMNOPQRSTUVWXYZ', 'abcdefghijklmnopqrstuvwxyz')")
}

/// Maps an allow-listed sort field to its expression over the derived table
fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::EffectiveToDate => "effective_to_date",
        SortField::EffectiveFromDate => "effective_from_date",
        SortField::PolicyNumber => "policy_number COLLATE \"C\"",
        SortField::InsuredName => "insured_name COLLATE \"C\"",
        SortField::State => "state COLLATE \"C\"",
        SortField::Status => "status COLLATE \"C\"",
        SortField::TermNumber => "term_number",
    }
}

fn insert_policies(policies: &[Policy]) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::new(
        "INSERT INTO policy (id, policy_number, insured_name, created_at, updated_at) ",
    );
    builder.push_values(policies, |mut row, policy| {
        row.push_bind(*policy.id.as_uuid())
            .push_bind(policy.policy_number.as_str())
            .push_bind(policy.insured_name.as_str())
            .push_bind(policy.created_at())
            .push_bind(policy.updated_at());
    });
    builder
}

fn insert_terms(terms: &[PolicyTerm]) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::new(
        "INSERT INTO policy_term (id, policy_id, term_number, state, status, \
         effective_from_date, effective_to_date, balance_due, next_due_date, \
         last_payment_date, created_at, updated_at) ",
    );
    builder.push_values(terms, |mut row, term| {
        row.push_bind(*term.id.as_uuid())
            .push_bind(*term.policy_id.as_uuid())
            .push_bind(term.term_number)
            .push_bind(term.state.as_str())
            .push_bind(term.status.as_str())
            .push_bind(term.effective_from_date)
            .push_bind(term.effective_to_date)
            .push_bind(term.balance_due)
            .push_bind(term.next_due_date)
            .push_bind(term.last_payment_date)
            .push_bind(term.created_at())
            .push_bind(term.updated_at());
    });
    builder
}

/// Database row of the term/policy join
#[derive(Debug, Clone, FromRow)]
pub struct PolicyTermRow {
    pub term_id: Uuid,
    pub policy_id: Uuid,
    pub term_number: i32,
    pub state: String,
    pub status: String,
    pub effective_from_date: NaiveDate,
    pub effective_to_date: NaiveDate,
    pub balance_due: Decimal,
    pub next_due_date: Option<NaiveDate>,
    pub last_payment_date: Option<NaiveDate>,
    pub term_created_at: DateTime<Utc>,
    pub term_updated_at: DateTime<Utc>,
    pub policy_number: String,
    pub insured_name: String,
    pub policy_created_at: DateTime<Utc>,
    pub policy_updated_at: DateTime<Utc>,
}

impl TryFrom<PolicyTermRow> for TermWithPolicy {
    type Error = DatabaseError;

    fn try_from(row: PolicyTermRow) -> Result<Self, Self::Error> {
        let invalid = |e: &dyn std::fmt::Display| {
            DatabaseError::InvalidRow(format!("policy term {}: {}", row.term_id, e))
        };

        let policy_audit = AuditStamp::new(row.policy_created_at, row.policy_updated_at)
            .map_err(|e| invalid(&e))?;
        let term_audit = AuditStamp::new(row.term_created_at, row.term_updated_at)
            .map_err(|e| invalid(&e))?;

        let policy_id = PolicyId::from_uuid(row.policy_id);
        let policy = Policy::new(
            policy_id,
            row.policy_number.clone(),
            row.insured_name.clone(),
            policy_audit,
        )
        .map_err(|e| invalid(&e))?;

        let term = PolicyTerm::builder(policy_id, row.term_number)
            .id(PolicyTermId::from_uuid(row.term_id))
            .state(row.state.clone())
            .status(row.status.clone())
            .effective(row.effective_from_date, row.effective_to_date)
            .balance_due(row.balance_due)
            .next_due_date(row.next_due_date)
            .last_payment_date(row.last_payment_date)
            .audit(term_audit)
            .build()
            .map_err(|e| invalid(&e))?;

        Ok(TermWithPolicy { term, policy })
    }
}
