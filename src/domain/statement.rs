//! Statement domain entity and the balance calculation over a ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{AMOUNT_UPPER_BOUND, MAX_AMOUNT_SCALE, OPERATION_DEPOSIT, OPERATION_WITHDRAW};
use crate::errors::{AppError, AppResult};

/// Direction of a statement. Amounts are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Deposit,
    Withdraw,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Deposit => OPERATION_DEPOSIT,
            OperationType::Withdraw => OPERATION_WITHDRAW,
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            OPERATION_DEPOSIT => Ok(OperationType::Deposit),
            OPERATION_WITHDRAW => Ok(OperationType::Withdraw),
            other => Err(AppError::internal(format!("Unknown operation type: {}", other))),
        }
    }
}

/// A recorded deposit or withdrawal. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: OperationType,
    pub amount: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Statement {
    /// Amount with the sign implied by the operation type.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            OperationType::Deposit => self.amount,
            OperationType::Withdraw => -self.amount,
        }
    }

    pub fn belongs_to(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Input of the create-statement operation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStatement {
    pub user_id: Uuid,
    pub kind: OperationType,
    pub amount: Decimal,
    pub description: String,
}

impl NewStatement {
    pub fn deposit(user_id: Uuid, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            user_id,
            kind: OperationType::Deposit,
            amount,
            description: description.into(),
        }
    }

    pub fn withdraw(user_id: Uuid, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            user_id,
            kind: OperationType::Withdraw,
            amount,
            description: description.into(),
        }
    }

    /// Accept only positive amounts the ledger column stores exactly:
    /// below 10^16 with at most four decimal places.
    pub fn validate(&self) -> AppResult<()> {
        let in_range =
            self.amount > Decimal::ZERO && self.amount < Decimal::from(AMOUNT_UPPER_BOUND);
        if !in_range || self.amount.normalize().scale() > MAX_AMOUNT_SCALE {
            return Err(AppError::InvalidAmount(self.amount));
        }
        Ok(())
    }

    /// Materialize the statement with a time-ordered id.
    pub fn into_statement(self) -> Statement {
        Statement {
            id: Uuid::now_v7(),
            user_id: self.user_id,
            kind: self.kind,
            amount: self.amount,
            description: self.description,
            created_at: Utc::now(),
        }
    }
}

/// Sum of deposits minus sum of withdrawals. Zero for an empty ledger.
///
/// Fails instead of panicking when the running total leaves the range of
/// `Decimal`.
pub fn balance_of<'a, I>(statements: I) -> AppResult<Decimal>
where
    I: IntoIterator<Item = &'a Statement>,
{
    statements
        .into_iter()
        .try_fold(Decimal::ZERO, |total, statement| {
            total
                .checked_add(statement.signed_amount())
                .ok_or_else(|| AppError::internal("Ledger balance overflowed"))
        })
}

/// Statement as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatementResponse {
    #[schema(example = "01890a5d-ac96-774b-bcce-b302099a8057")]
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: OperationType,
    #[schema(value_type = f64, example = 100.0)]
    pub amount: Decimal,
    #[schema(example = "Salary")]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Statement> for StatementResponse {
    fn from(statement: Statement) -> Self {
        Self {
            id: statement.id,
            user_id: statement.user_id,
            kind: statement.kind,
            amount: statement.amount,
            description: statement.description,
            created_at: statement.created_at,
        }
    }
}

/// A user's full ledger with the derived balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub statements: Vec<Statement>,
    pub balance: Decimal,
}

impl Balance {
    pub fn from_statements(statements: Vec<Statement>) -> AppResult<Self> {
        let balance = balance_of(&statements)?;
        Ok(Self {
            statements,
            balance,
        })
    }
}

/// Balance response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    pub statement: Vec<StatementResponse>,
    #[schema(value_type = f64, example = 10.0)]
    pub balance: Decimal,
}

impl From<Balance> for BalanceResponse {
    fn from(balance: Balance) -> Self {
        Self {
            statement: balance
                .statements
                .into_iter()
                .map(StatementResponse::from)
                .collect(),
            balance: balance.balance,
        }
    }
}
