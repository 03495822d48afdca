use super::*;
use serde_json::json;

#[tokio::test]
async fn test_create_dine_in_order() {
    let env = create_test_manager().await;
    let adobo = seed_dish(&env.pool, "Adobo", 250.0, 10).await;
    let table = seed_table(&env.pool, 5).await;

    let order = env
        .manager
        .create_order(dine_in(table, 4, vec![simple_item(adobo, "Adobo", 250.0, 4)]), Some(7))
        .await
        .unwrap();

    assert_eq!(order.order_status, OrderStatus::InProgress);
    assert_eq!(order.table, Some(table));
    assert!(!order.is_take_out);
    assert_eq!(order.employee, Some(7));
    assert_eq!(order.note, "None");
    assert_eq!(order.items[0].price, 1000.0);
    assert_eq!(order.bills.subtotal, 1000.0);
    assert_eq!(order.bills.tax, 52.5);
    assert_eq!(order.bills.total_with_tax, 1052.5);
    assert_eq!(order.tax_ratio, "0.0525");

    assert_eq!(stock(&env.pool, adobo).await, 6);
    assert_eq!(table_state(&env.pool, table).await, (TableStatus::Booked, Some(order.id)));

    let stored = env.manager.get_order(order.id).await.unwrap();
    assert_eq!(stored.items, order.items);
    assert_eq!(stored.bills, order.bills);
}

#[tokio::test]
async fn test_create_take_out_order() {
    let env = create_test_manager().await;
    let pancit = seed_dish(&env.pool, "Pancit", 120.0, 3).await;

    let order = env
        .manager
        .create_order(take_out(1, vec![simple_item(pancit, "Pancit", 120.0, 2)]), None)
        .await
        .unwrap();

    assert!(order.is_take_out);
    assert_eq!(order.table, None);
    assert_eq!(order.payment_method, PaymentMethod::Gcash);
    assert_eq!(stock(&env.pool, pancit).await, 1);
}

#[tokio::test]
async fn test_create_with_claims_computes_discount() {
    let env = create_test_manager().await;
    let lechon = seed_dish(&env.pool, "Lechon", 500.0, 10).await;
    let table = seed_table(&env.pool, 1).await;

    let mut input = dine_in(table, 4, vec![simple_item(lechon, "Lechon", 500.0, 2)]);
    input.discounts = serde_json::from_value(json!([
        {"type": "Senior", "cardId": "S-100", "discountValue": 20},
        {"type": "PWD", "cardId": "P-200", "discountValue": "20"},
        {"type": "Student", "cardId": "X-1", "discountValue": 50}
    ]))
    .unwrap();

    let order = env.manager.create_order(input, None).await.unwrap();
    assert_eq!(order.discounts.len(), 2);
    assert_eq!(order.bills.discount_amount, 100.0);
    assert_eq!(order.bills.tax, 47.25);
    assert_eq!(order.bills.total_with_tax, 947.25);
}

#[tokio::test]
async fn test_create_rejects_missing_customer_fields() {
    let env = create_test_manager().await;
    let adobo = seed_dish(&env.pool, "Adobo", 250.0, 10).await;

    let mut input = take_out(2, vec![simple_item(adobo, "Adobo", 250.0, 1)]);
    input.customer_details.name = "  ".to_string();
    let err = env.manager.create_order(input, None).await.unwrap_err();
    assert!(matches!(err, OrderError::Validation(_)));

    let mut input = take_out(0, vec![simple_item(adobo, "Adobo", 250.0, 1)]);
    input.customer_details.guests = 0;
    let err = env.manager.create_order(input, None).await.unwrap_err();
    assert!(matches!(err, OrderError::Validation(_)));

    assert_eq!(stock(&env.pool, adobo).await, 10);
}

#[tokio::test]
async fn test_create_rejects_empty_items() {
    let env = create_test_manager().await;
    let err = env.manager.create_order(take_out(1, vec![]), None).await.unwrap_err();
    assert!(matches!(err, OrderError::Validation(_)));
    assert!(env.manager.list_orders(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_rejects_out_of_range_claim() {
    let env = create_test_manager().await;
    let adobo = seed_dish(&env.pool, "Adobo", 250.0, 10).await;

    let mut input = take_out(2, vec![simple_item(adobo, "Adobo", 250.0, 1)]);
    input.discounts = serde_json::from_value(json!([
        {"type": "Senior", "cardId": "S-1", "discountValue": 150}
    ]))
    .unwrap();

    let err = env.manager.create_order(input, None).await.unwrap_err();
    assert!(matches!(err, OrderError::Validation(_)));
    assert_eq!(stock(&env.pool, adobo).await, 10);
}

#[tokio::test]
async fn test_create_with_unknown_table_rolls_back() {
    let env = create_test_manager().await;
    let adobo = seed_dish(&env.pool, "Adobo", 250.0, 10).await;

    let err = env
        .manager
        .create_order(dine_in(424242, 2, vec![simple_item(adobo, "Adobo", 250.0, 2)]), None)
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::TableNotFound(424242)));
    assert_eq!(stock(&env.pool, adobo).await, 10);
    assert!(env.manager.list_orders(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_unknown_order() {
    let env = create_test_manager().await;
    let err = env.manager.get_order(99).await.unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(99)));
}

#[tokio::test]
async fn test_list_orders_filters_by_status() {
    let env = create_test_manager().await;
    let adobo = seed_dish(&env.pool, "Adobo", 250.0, 10).await;

    let first = env
        .manager
        .create_order(take_out(1, vec![simple_item(adobo, "Adobo", 250.0, 1)]), None)
        .await
        .unwrap();
    let second = env
        .manager
        .create_order(take_out(1, vec![simple_item(adobo, "Adobo", 250.0, 1)]), None)
        .await
        .unwrap();
    env.manager.set_status(first.id, OrderStatus::Ready).await.unwrap();

    assert_eq!(env.manager.list_orders(None).await.unwrap().len(), 2);

    let ready = env.manager.list_orders(Some(OrderStatus::Ready)).await.unwrap();
    assert_eq!(ready.len(), 1);
    assert_eq!(ready[0].id, first.id);

    let in_progress = env
        .manager
        .list_orders(Some(OrderStatus::InProgress))
        .await
        .unwrap();
    assert_eq!(in_progress.len(), 1);
    assert_eq!(in_progress[0].id, second.id);
}

// ========================================================================
// Discount updates
// ========================================================================

#[tokio::test]
async fn test_update_discount_on_ready_order() {
    let env = create_test_manager().await;
    let adobo = seed_dish(&env.pool, "Adobo", 250.0, 10).await;
    let table = seed_table(&env.pool, 3).await;

    let order = env
        .manager
        .create_order(dine_in(table, 4, vec![simple_item(adobo, "Adobo", 250.0, 4)]), None)
        .await
        .unwrap();
    env.manager.set_status(order.id, OrderStatus::Ready).await.unwrap();

    let claims = serde_json::from_value(json!([
        {"type": "Senior", "cardId": "S-1", "discountValue": 20},
        {"type": "Senior", "cardId": "S-2", "discountValue": 20}
    ]))
    .unwrap();
    let updated = env.manager.update_discount(order.id, claims).await.unwrap();

    assert_eq!(updated.bills.subtotal, 1000.0);
    assert_eq!(updated.bills.discount_percent, 20.0);
    assert_eq!(updated.bills.discount_amount, 100.0);
    assert_eq!(updated.bills.tax, 47.25);
    assert_eq!(updated.bills.total_with_tax, 947.25);
    assert_eq!(updated.order_status, OrderStatus::Ready);

    let stored = env.manager.get_order(order.id).await.unwrap();
    assert_eq!(stored.discounts, updated.discounts);
    assert_eq!(stored.bills, updated.bills);
}

#[tokio::test]
async fn test_update_discount_drops_invalid_rows_and_clears() {
    let env = create_test_manager().await;
    let adobo = seed_dish(&env.pool, "Adobo", 100.0, 10).await;

    let order = env
        .manager
        .create_order(take_out(2, vec![simple_item(adobo, "Adobo", 100.0, 2)]), None)
        .await
        .unwrap();

    let claims = serde_json::from_value(json!([
        {"type": "PWD", "cardId": "P-1", "discountValue": 10},
        {"type": "PWD", "cardId": "", "discountValue": 10},
        {"type": "Senior", "cardId": "S-1", "discountValue": "abc"}
    ]))
    .unwrap();
    let updated = env.manager.update_discount(order.id, claims).await.unwrap();
    assert_eq!(updated.discounts.len(), 1);
    assert_eq!(updated.bills.discount_amount, 10.0);

    let cleared = env.manager.update_discount(order.id, vec![]).await.unwrap();
    assert!(cleared.discounts.is_empty());
    assert_eq!(cleared.bills.discount_amount, 0.0);
    assert_eq!(cleared.bills.total_with_tax, 210.5);
}

#[tokio::test]
async fn test_update_discount_unknown_order() {
    let env = create_test_manager().await;
    let err = env.manager.update_discount(5, vec![]).await.unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(5)));
}

#[tokio::test]
async fn test_tax_ratio_fixed_at_creation() {
    let (dir, pool) = open_pool().await;
    let adobo = seed_dish(&pool, "Adobo", 100.0, 10).await;

    let at_five = OrdersManager::new(
        pool.clone(),
        OrderSettings {
            tax_rate_percent: Decimal::new(5, 0),
            restore_stock_on_cancel: false,
        },
    );
    let order = at_five
        .create_order(take_out(1, vec![simple_item(adobo, "Adobo", 100.0, 1)]), None)
        .await
        .unwrap();
    assert_eq!(order.bills.tax, 5.0);

    // Config changes later; the stored ratio still governs recomputation
    let at_twelve = OrdersManager::new(
        pool.clone(),
        OrderSettings {
            tax_rate_percent: Decimal::new(12, 0),
            restore_stock_on_cancel: false,
        },
    );
    let updated = at_twelve.update_discount(order.id, vec![]).await.unwrap();
    assert_eq!(updated.bills.tax, 5.0);
    assert_eq!(updated.bills.total_with_tax, 105.0);
    drop(dir);
}

#[tokio::test]
async fn test_discount_recompute_uses_creation_bill_ratio() {
    let env = create_test_manager().await;
    let pancit = seed_dish(&env.pool, "Pancit", 10.01, 10).await;

    let order = env
        .manager
        .create_order(take_out(1, vec![simple_item(pancit, "Pancit", 10.01, 1)]), None)
        .await
        .unwrap();
    assert_eq!(order.bills.tax, 0.53);
    assert_eq!(
        order.tax_ratio.parse::<Decimal>().unwrap(),
        Decimal::new(53, 2) / Decimal::new(1001, 2)
    );

    // Rows with non-string type or card id are dropped, not rejected
    let claims = serde_json::from_value(json!([
        {"type": 3, "cardId": "S-2", "discountValue": 50},
        {"type": "Senior", "cardId": 42, "discountValue": 50},
        {"type": "Senior", "cardId": "S-1", "discountValue": 10}
    ]))
    .unwrap();
    let updated = env.manager.update_discount(order.id, claims).await.unwrap();
    assert_eq!(updated.discounts.len(), 1);
    assert_eq!(updated.bills.discount_amount, 1.0);
    assert_eq!(updated.bills.tax, 0.48);
    assert_eq!(updated.bills.total_with_tax, 9.49);
}

// ========================================================================
// Table binding
// ========================================================================

#[tokio::test]
async fn test_binding_failure_keeps_order() {
    let env = create_manager_with_binding(Arc::new(FailingBinding)).await;
    let adobo = seed_dish(&env.pool, "Adobo", 250.0, 5).await;
    let table = seed_table(&env.pool, 9).await;

    let order = env
        .manager
        .create_order(dine_in(table, 2, vec![simple_item(adobo, "Adobo", 250.0, 2)]), None)
        .await
        .unwrap();

    assert_eq!(stock(&env.pool, adobo).await, 3);
    assert!(env.manager.get_order(order.id).await.is_ok());
    assert_eq!(table_state(&env.pool, table).await, (TableStatus::Available, None));

    let ready = env.manager.set_status(order.id, OrderStatus::Ready).await.unwrap();
    assert_eq!(ready.order_status, OrderStatus::Ready);
}

#[tokio::test]
async fn test_take_out_never_signals() {
    let recorder = Arc::new(RecordingBinding::default());
    let env = create_manager_with_binding(recorder.clone()).await;
    let adobo = seed_dish(&env.pool, "Adobo", 250.0, 5).await;

    let order = env
        .manager
        .create_order(take_out(1, vec![simple_item(adobo, "Adobo", 250.0, 1)]), None)
        .await
        .unwrap();
    env.manager.set_status(order.id, OrderStatus::Ready).await.unwrap();
    env.manager.set_status(order.id, OrderStatus::Paid).await.unwrap();

    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_signal_sequence_for_dine_in() {
    let recorder = Arc::new(RecordingBinding::default());
    let env = create_manager_with_binding(recorder.clone()).await;
    let adobo = seed_dish(&env.pool, "Adobo", 250.0, 5).await;
    let table = seed_table(&env.pool, 2).await;

    let order = env
        .manager
        .create_order(dine_in(table, 2, vec![simple_item(adobo, "Adobo", 250.0, 1)]), None)
        .await
        .unwrap();
    env.manager.set_status(order.id, OrderStatus::Ready).await.unwrap();
    env.manager.set_status(order.id, OrderStatus::InProgress).await.unwrap();
    env.manager.set_status(order.id, OrderStatus::Ready).await.unwrap();
    env.manager.set_status(order.id, OrderStatus::Paid).await.unwrap();

    assert_eq!(
        recorder.calls(),
        vec![
            (TableSignal::Bind, table),
            (TableSignal::Bind, table),
            (TableSignal::Bind, table),
            (TableSignal::Bind, table),
            (TableSignal::Release, table),
        ]
    );
}
