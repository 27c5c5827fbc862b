//! End-to-end cover lifecycle against a real on-disk database
//!
//! Uses `ServerState::initialize` so the tested path is the production
//! one: work dir layout, migrations, WAL pool. Concurrency scenarios run
//! on separate pool connections, racing for real.

use cover_server::approval::{self, ApprovalError};
use cover_server::db::repository::{account, purchase_request, ticket, user_role};
use cover_server::occupancy;
use cover_server::tickets::{RedeemError, redeem, relocate};
use cover_server::{Config, ServerState};
use shared::models::{PaymentMethod, PurchaseRequestCreate, PurchaseStatus, TicketStatus};
use std::collections::HashSet;

async fn test_state() -> (ServerState, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(tmp.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize(&config).await.unwrap();
    (state, tmp)
}

async fn seed_purchaser(state: &ServerState, id: &str, email: &str) {
    account::create(&state.pool, id, email, "$argon2id$test")
        .await
        .unwrap();
    user_role::upsert(&state.pool, id, "user", Some(email))
        .await
        .unwrap();
}

fn transfer_request(user_id: &str, table: &str, names: &[&str]) -> PurchaseRequestCreate {
    PurchaseRequestCreate {
        user_id: user_id.to_string(),
        table_id: Some(table.to_string()),
        quantity: names.len() as i64,
        names: names.iter().map(|s| s.to_string()).collect(),
        total_price: names.len() as f64 * 500.0,
        proof_of_payment_url: Some("/uploads/payment-proofs/test.jpg".to_string()),
        reference: purchase_request::generate_reference(),
        payment_method: PaymentMethod::Transfer,
        checkout_session_id: None,
    }
}

#[tokio::test]
async fn full_lifecycle_submit_approve_scan_relocate() {
    let (state, _tmp) = test_state().await;
    seed_purchaser(&state, "user-1", "ana@example.com").await;

    // Submit: 3 covers for mesa-32
    let request = purchase_request::create(
        &state.pool,
        transfer_request("user-1", "mesa-32", &["Ana", "Beto", "Caro"]),
    )
    .await
    .unwrap();
    assert_eq!(request.status, PurchaseStatus::Pending);
    assert_eq!(request.total_price, 1500.0);

    // Approve: exactly 3 approved tickets with distinct QR codes
    let approved = approval::approve(&state.pool, request.id).await.unwrap();
    assert_eq!(approved.tickets_created, 3);

    let tickets = ticket::find_by_purchase_request(&state.pool, request.id)
        .await
        .unwrap();
    assert_eq!(tickets.len(), 3);
    let codes: HashSet<&str> = tickets.iter().map(|t| t.qr_code.as_str()).collect();
    assert_eq!(codes.len(), 3);
    for t in &tickets {
        assert_eq!(t.status, TicketStatus::Approved);
        assert_eq!(t.purchase_request_id, Some(request.id));
    }

    // Occupancy reflects the new covers
    let counts = occupancy::table_counts(&state.pool).await.unwrap();
    assert_eq!(counts.get("32"), Some(&3));

    // Scan one cover at the door; a second scan of the same code loses
    let qr = tickets[0].qr_code.clone();
    let scanned = redeem(&state.pool, &qr, "admin-1").await.unwrap();
    assert_eq!(scanned.status, TicketStatus::Used);
    assert!(matches!(
        redeem(&state.pool, &qr, "admin-2").await.unwrap_err(),
        RedeemError::AlreadyRedeemed
    ));

    // Used tickets still occupy the table
    let counts = occupancy::table_counts(&state.pool).await.unwrap();
    assert_eq!(counts.get("32"), Some(&3));

    // Move the whole order; counts follow
    let ids: Vec<i64> = tickets.iter().map(|t| t.id).collect();
    let report = relocate(&state.pool, &ids, "mesa-10").await;
    assert_eq!(report.moved, 3);
    assert_eq!(report.failed, 0);

    let counts = occupancy::table_counts(&state.pool).await.unwrap();
    assert_eq!(counts.get("32"), None);
    assert_eq!(counts.get("10"), Some(&3));
}

#[tokio::test]
async fn concurrent_approves_create_exactly_one_batch() {
    let (state, _tmp) = test_state().await;
    seed_purchaser(&state, "user-1", "ana@example.com").await;

    let request = purchase_request::create(
        &state.pool,
        transfer_request("user-1", "mesa-41", &["Ana", "Beto", "Caro"]),
    )
    .await
    .unwrap();

    // Two admins race on separate connections
    let pool_a = state.pool.clone();
    let pool_b = state.pool.clone();
    let id = request.id;
    let (a, b) = tokio::join!(
        tokio::spawn(async move { approval::approve(&pool_a, id).await }),
        tokio::spawn(async move { approval::approve(&pool_b, id).await }),
    );
    let results = [a.unwrap(), b.unwrap()];

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for r in &results {
        if let Err(e) = r {
            assert!(matches!(e, ApprovalError::AlreadyProcessed));
        }
    }

    // 3 tickets, not 6
    let tickets = ticket::find_by_purchase_request(&state.pool, request.id)
        .await
        .unwrap();
    assert_eq!(tickets.len(), 3);
}

#[tokio::test]
async fn concurrent_scans_redeem_exactly_once() {
    let (state, _tmp) = test_state().await;
    seed_purchaser(&state, "user-1", "ana@example.com").await;

    let request = purchase_request::create(
        &state.pool,
        transfer_request("user-1", "mesa-20", &["Ana"]),
    )
    .await
    .unwrap();
    approval::approve(&state.pool, request.id).await.unwrap();
    let tickets = ticket::find_by_purchase_request(&state.pool, request.id)
        .await
        .unwrap();
    let qr = tickets[0].qr_code.clone();

    let pool_a = state.pool.clone();
    let pool_b = state.pool.clone();
    let qr_a = qr.clone();
    let qr_b = qr.clone();
    let (a, b) = tokio::join!(
        tokio::spawn(async move { redeem(&pool_a, &qr_a, "door-a").await }),
        tokio::spawn(async move { redeem(&pool_b, &qr_b, "door-b").await }),
    );
    let results = [a.unwrap(), b.unwrap()];

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for r in &results {
        if let Err(e) = r {
            assert!(matches!(e, RedeemError::AlreadyRedeemed));
        }
    }

    // scanned_at/scanned_by recorded exactly once
    let after = ticket::find_by_qr(&state.pool, &qr).await.unwrap().unwrap();
    assert_eq!(after.status, TicketStatus::Used);
    assert!(after.scanned_at.is_some());
    let winner_door = results
        .iter()
        .find_map(|r| r.as_ref().ok())
        .map(|t| t.scanned_by.clone().unwrap())
        .unwrap();
    assert_eq!(after.scanned_by.as_deref(), Some(winner_door.as_str()));
}

#[tokio::test]
async fn rejected_request_stays_rejected() {
    let (state, _tmp) = test_state().await;
    seed_purchaser(&state, "user-1", "ana@example.com").await;

    let request = purchase_request::create(
        &state.pool,
        transfer_request("user-1", "mesa-50", &["Ana"]),
    )
    .await
    .unwrap();

    approval::reject(&state.pool, request.id).await.unwrap();
    assert!(matches!(
        approval::approve(&state.pool, request.id).await.unwrap_err(),
        ApprovalError::AlreadyProcessed
    ));
    assert!(matches!(
        approval::reject(&state.pool, request.id).await.unwrap_err(),
        ApprovalError::AlreadyProcessed
    ));

    // No tickets were ever issued
    let tickets = ticket::find_by_purchase_request(&state.pool, request.id)
        .await
        .unwrap();
    assert!(tickets.is_empty());
}
