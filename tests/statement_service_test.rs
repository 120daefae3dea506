//! Statement service tests over in-memory persistence.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use finapi::domain::{NewStatement, NewUser, OperationType};
use finapi::errors::AppError;
use finapi::infra::{MemoryPersistence, UnitOfWork};
use finapi::services::{StatementManager, StatementService};

struct Ledger {
    service: Arc<StatementManager<MemoryPersistence>>,
    user_id: Uuid,
}

async fn setup() -> Ledger {
    let uow = Arc::new(MemoryPersistence::new());
    let user = uow
        .users()
        .create(NewUser {
            name: "Jean".to_string(),
            email: "jean@email.com.br".to_string(),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap();

    Ledger {
        service: Arc::new(StatementManager::new(uow)),
        user_id: user.id,
    }
}

impl Ledger {
    async fn deposit(&self, amount: Decimal) {
        self.service
            .create_statement(NewStatement::deposit(self.user_id, amount, "deposit"))
            .await
            .unwrap();
    }

    async fn balance(&self) -> Decimal {
        self.service.get_balance(self.user_id).await.unwrap().balance
    }
}

#[tokio::test]
async fn test_empty_ledger() {
    let ledger = setup().await;
    let balance = ledger.service.get_balance(ledger.user_id).await.unwrap();

    assert!(balance.statements.is_empty());
    assert_eq!(balance.balance, Decimal::ZERO);
}

#[tokio::test]
async fn test_deposit_withdraw_scenario() {
    let ledger = setup().await;

    ledger.deposit(dec!(100)).await;
    assert_eq!(ledger.balance().await, dec!(100));

    ledger
        .service
        .create_statement(NewStatement::withdraw(ledger.user_id, dec!(90), "rent"))
        .await
        .unwrap();
    assert_eq!(ledger.balance().await, dec!(10));

    let rejected = ledger
        .service
        .create_statement(NewStatement::withdraw(ledger.user_id, dec!(20), "x"))
        .await;
    assert!(matches!(
        rejected,
        Err(AppError::InsufficientFunds { balance, requested })
            if balance == dec!(10) && requested == dec!(20)
    ));
    assert_eq!(ledger.balance().await, dec!(10));

    let history = ledger.service.get_balance(ledger.user_id).await.unwrap();
    let kinds: Vec<OperationType> = history.statements.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![OperationType::Deposit, OperationType::Withdraw]);
}

#[tokio::test]
async fn test_withdraw_entire_balance() {
    let ledger = setup().await;
    ledger.deposit(dec!(42.50)).await;

    ledger
        .service
        .create_statement(NewStatement::withdraw(ledger.user_id, dec!(42.50), "all"))
        .await
        .unwrap();

    assert_eq!(ledger.balance().await, Decimal::ZERO);
}

#[tokio::test]
async fn test_final_balance_is_deposits_minus_withdrawals() {
    let ledger = setup().await;
    let deposits = [dec!(10.10), dec!(250), dec!(0.01), dec!(99.99)];
    let withdrawals = [dec!(5.05), dec!(100), dec!(0.01)];

    for amount in deposits {
        ledger.deposit(amount).await;
    }
    for amount in withdrawals {
        ledger
            .service
            .create_statement(NewStatement::withdraw(ledger.user_id, amount, "out"))
            .await
            .unwrap();
    }

    let expected = deposits.iter().sum::<Decimal>() - withdrawals.iter().sum::<Decimal>();
    assert_eq!(ledger.balance().await, expected);
}

#[tokio::test]
async fn test_unknown_user_fails_for_both_types() {
    let ledger = setup().await;
    let stranger = Uuid::new_v4();

    for statement in [
        NewStatement::deposit(stranger, dec!(1), "in"),
        NewStatement::withdraw(stranger, dec!(1), "out"),
    ] {
        let result = ledger.service.create_statement(statement).await;
        assert!(matches!(result, Err(AppError::UserNotFound)));
    }
}

#[tokio::test]
async fn test_non_positive_amounts_rejected() {
    let ledger = setup().await;

    for amount in [Decimal::ZERO, dec!(-10)] {
        let result = ledger
            .service
            .create_statement(NewStatement::deposit(ledger.user_id, amount, "bad"))
            .await;
        assert!(matches!(result, Err(AppError::InvalidAmount(_))));
    }
    assert_eq!(ledger.balance().await, Decimal::ZERO);
}

#[tokio::test]
async fn test_amounts_beyond_ledger_range_rejected() {
    let ledger = setup().await;

    for amount in [dec!(10000000000000000), dec!(50000000000000000000000000000)] {
        let result = ledger
            .service
            .create_statement(NewStatement::deposit(ledger.user_id, amount, "huge"))
            .await;
        assert!(matches!(result, Err(AppError::InvalidAmount(_))));
    }

    ledger.deposit(dec!(9999999999999999.9999)).await;
    assert_eq!(ledger.balance().await, dec!(9999999999999999.9999));
}

#[tokio::test]
async fn test_amounts_with_more_than_four_decimals_rejected() {
    let ledger = setup().await;
    ledger.deposit(dec!(1)).await;

    for statement in [
        NewStatement::deposit(ledger.user_id, dec!(0.00001), "dust"),
        NewStatement::deposit(ledger.user_id, dec!(0.00005), "dust"),
        NewStatement::withdraw(ledger.user_id, dec!(0.12345), "dust"),
    ] {
        let result = ledger.service.create_statement(statement).await;
        assert!(matches!(result, Err(AppError::InvalidAmount(_))));
    }

    ledger.deposit(dec!(0.0001)).await;
    assert_eq!(ledger.balance().await, dec!(1.0001));
}

#[tokio::test]
async fn test_get_statement_round_trip() {
    let ledger = setup().await;
    let created = ledger
        .service
        .create_statement(NewStatement::deposit(ledger.user_id, dec!(100), "pay"))
        .await
        .unwrap();

    let fetched = ledger
        .service
        .get_statement(ledger.user_id, created.id)
        .await
        .unwrap();

    assert_eq!(fetched.kind, OperationType::Deposit);
    assert_eq!(fetched.amount, dec!(100));
    assert_eq!(fetched.description, "pay");
    assert_eq!(fetched.user_id, ledger.user_id);
}

#[tokio::test]
async fn test_get_statement_errors() {
    let ledger = setup().await;
    let created = ledger
        .service
        .create_statement(NewStatement::deposit(ledger.user_id, dec!(1), "pay"))
        .await
        .unwrap();

    let unknown_statement = ledger
        .service
        .get_statement(ledger.user_id, Uuid::new_v4())
        .await;
    assert!(matches!(unknown_statement, Err(AppError::StatementNotFound)));

    let unknown_user = ledger.service.get_statement(Uuid::new_v4(), created.id).await;
    assert!(matches!(unknown_user, Err(AppError::UserNotFound)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_withdrawals_never_overdraw() {
    let ledger = setup().await;
    ledger.deposit(dec!(100)).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = ledger.service.clone();
        let user_id = ledger.user_id;
        handles.push(tokio::spawn(async move {
            service
                .create_statement(NewStatement::withdraw(user_id, dec!(30), "race"))
                .await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(AppError::InsufficientFunds { .. }) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(succeeded, 3);
    assert_eq!(ledger.balance().await, dec!(10));
}
