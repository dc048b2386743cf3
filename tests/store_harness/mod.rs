//! Shared test harness for `EntityStore` backends
//!
//! Provides record builders and the `store_contract_tests!` macro, which
//! checks any backend against the `EntityStore` contract for all three
//! record types.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//!
//! store_contract_tests!(
//!     InMemoryStore::<Product>::new(),
//!     InMemoryStore::<Customer>::new(),
//!     InMemoryStore::<Order>::new()
//! );
//! ```

#![allow(dead_code)]

use sales::core::id::RecordId;
use sales::entities::{Customer, Order, Product, STATUS_PENDING};

pub fn product(name: &str, price: f64) -> Product {
    Product {
        id: RecordId::new(),
        name: name.to_string(),
        price,
        amount: 0,
    }
}

pub fn customer(name: &str, address: &str) -> Customer {
    Customer {
        id: RecordId::new(),
        name: name.to_string(),
        address: address.to_string(),
    }
}

pub fn order(sum: f64, status: &str) -> Order {
    Order {
        id: RecordId::new(),
        amount: 1,
        sum,
        customer_ref: RecordId::new(),
        product_ref: RecordId::new(),
        status: status.to_string(),
    }
}

pub fn pending_order(customer_ref: RecordId, product_ref: RecordId, amount: i32) -> Order {
    Order {
        id: RecordId::new(),
        amount,
        sum: 2.5 * f64::from(amount),
        customer_ref,
        product_ref,
        status: STATUS_PENDING.to_string(),
    }
}

/// Generate an `EntityStore` conformance suite.
///
/// Each factory is re-evaluated per test and must yield a fresh, empty store
/// for products, customers and orders respectively.
#[macro_export]
macro_rules! store_contract_tests {
    ($products:expr, $customers:expr, $orders:expr) => {
        mod store_contract_tests {
            use super::*;
            use sales::core::id::RecordId;
            use sales::core::store::{EntityStore, ListFilter, UpdateOutcome};
            use sales::entities::{
                Customer, CustomerPatch, Order, OrderPatch, Product, ProductPatch,
                STATUS_DELIVERED, STATUS_PENDING,
            };
            use sales::services::AggregationReporter;

            // ==============================================================
            // Insert & find
            // ==============================================================

            #[tokio::test]
            async fn test_insert_and_find_by_id() {
                let store = $products;
                let widget = product("Widget", 9.99);

                let created = store.insert(widget.clone()).await.unwrap();
                assert_eq!(created, widget);

                let found = store.find_by_id(&widget.id).await.unwrap();
                assert_eq!(found, Some(widget));
            }

            #[tokio::test]
            async fn test_find_unknown_id_is_none() {
                let store = $customers;
                assert!(store.find_by_id(&RecordId::new()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_order_references_survive_round_trip() {
                let store = $orders;
                let customer_ref = RecordId::new();
                let product_ref = RecordId::new();
                let stored = pending_order(customer_ref, product_ref, 4);

                store.insert(stored.clone()).await.unwrap();
                let found = store.find_by_id(&stored.id).await.unwrap().unwrap();
                assert_eq!(found.customer_ref, customer_ref);
                assert_eq!(found.product_ref, product_ref);
                assert_eq!(found.sum, 10.0);
                assert_eq!(found, stored);
            }

            // ==============================================================
            // List & filter
            // ==============================================================

            #[tokio::test]
            async fn test_list_empty() {
                let store = $orders;
                let all = store.find(&ListFilter::all::<Order>()).await.unwrap();
                assert!(all.is_empty());
            }

            #[tokio::test]
            async fn test_list_in_creation_order() {
                let store = $products;
                for name in ["Alpha", "Beta", "Gamma"] {
                    store.insert(product(name, 1.0)).await.unwrap();
                }

                let all = store.find(&ListFilter::all::<Product>()).await.unwrap();
                let names: Vec<_> = all.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
            }

            #[tokio::test]
            async fn test_filter_is_case_insensitive_substring() {
                let store = $customers;
                store.insert(customer("Ada Lovelace", "London")).await.unwrap();
                store.insert(customer("Charles Babbage", "London")).await.unwrap();
                store.insert(customer("Lady ADA", "Surrey")).await.unwrap();

                let found = store
                    .find(&ListFilter::containing::<Customer>("aDa"))
                    .await
                    .unwrap();
                assert_eq!(found.len(), 2);
                assert!(found.iter().all(|c| c.name.to_lowercase().contains("ada")));
            }

            #[tokio::test]
            async fn test_filter_matches_metacharacters_literally() {
                let store = $products;
                store.insert(product("Widget (large)", 5.0)).await.unwrap();
                store.insert(product("Widget large", 5.0)).await.unwrap();

                let found = store
                    .find(&ListFilter::containing::<Product>("(large)"))
                    .await
                    .unwrap();
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].name, "Widget (large)");

                let dotted = store
                    .find(&ListFilter::containing::<Product>("w.dget"))
                    .await
                    .unwrap();
                assert!(dotted.is_empty());
            }

            #[tokio::test]
            async fn test_order_filter_uses_status() {
                let store = $orders;
                store.insert(order(1.0, STATUS_PENDING)).await.unwrap();
                store.insert(order(2.0, STATUS_DELIVERED)).await.unwrap();

                let found = store
                    .find(&ListFilter::containing::<Order>("DELIV"))
                    .await
                    .unwrap();
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].status, STATUS_DELIVERED);
            }

            // ==============================================================
            // Update
            // ==============================================================

            #[tokio::test]
            async fn test_update_sets_only_patched_fields() {
                let store = $products;
                let widget = store.insert(product("Widget", 9.99)).await.unwrap();
                let patch = ProductPatch {
                    amount: Some(12),
                    ..ProductPatch::default()
                };

                let outcome = store.update_by_id(&widget.id, &patch).await.unwrap();
                assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 1 });

                let found = store.find_by_id(&widget.id).await.unwrap().unwrap();
                assert_eq!(found.amount, 12);
                assert_eq!(found.name, "Widget");
                assert_eq!(found.price, 9.99);
            }

            #[tokio::test]
            async fn test_update_with_same_values_matches_without_modifying() {
                let store = $customers;
                let ada = store.insert(customer("Ada", "London")).await.unwrap();
                let patch = CustomerPatch {
                    address: Some("London".to_string()),
                    ..CustomerPatch::default()
                };

                let outcome = store.update_by_id(&ada.id, &patch).await.unwrap();
                assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 0 });
            }

            #[tokio::test]
            async fn test_update_unknown_id_matches_nothing() {
                let store = $orders;
                let patch = OrderPatch {
                    status: Some(STATUS_DELIVERED.to_string()),
                };

                let outcome = store.update_by_id(&RecordId::new(), &patch).await.unwrap();
                assert_eq!(outcome.matched, 0);
                assert_eq!(outcome.modified, 0);
            }

            // ==============================================================
            // Delete
            // ==============================================================

            #[tokio::test]
            async fn test_delete_then_find() {
                let store = $products;
                let widget = store.insert(product("Widget", 1.0)).await.unwrap();

                assert_eq!(store.delete_by_id(&widget.id).await.unwrap(), 1);
                assert!(store.find_by_id(&widget.id).await.unwrap().is_none());
                assert_eq!(store.delete_by_id(&widget.id).await.unwrap(), 0);
            }

            // ==============================================================
            // Aggregation
            // ==============================================================

            #[tokio::test]
            async fn test_aggregate_with_no_match_is_zero() {
                let store = $orders;
                store.insert(order(50.0, STATUS_PENDING)).await.unwrap();

                let total = store
                    .aggregate_sum(&AggregationReporter::delivered_pipeline())
                    .await
                    .unwrap();
                assert_eq!(total, 0.0);
            }

            #[tokio::test]
            async fn test_aggregate_sums_exact_status_only() {
                let store = $orders;
                store.insert(order(10.25, STATUS_DELIVERED)).await.unwrap();
                store.insert(order(4.75, STATUS_DELIVERED)).await.unwrap();
                store.insert(order(100.0, STATUS_PENDING)).await.unwrap();
                store.insert(order(7.0, "delivered-late")).await.unwrap();

                let total = store
                    .aggregate_sum(&AggregationReporter::delivered_pipeline())
                    .await
                    .unwrap();
                assert_eq!(total, 15.0);
            }

            // ==============================================================
            // Concurrency
            // ==============================================================

            #[tokio::test]
            async fn test_concurrent_inserts() {
                let store = std::sync::Arc::new($customers);
                let mut handles = Vec::new();
                for i in 0..10 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        store
                            .insert(customer(&format!("Customer {}", i), "Somewhere"))
                            .await
                            .unwrap();
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }

                let all = store.find(&ListFilter::all::<Customer>()).await.unwrap();
                assert_eq!(all.len(), 10);
            }
        }
    };
}
