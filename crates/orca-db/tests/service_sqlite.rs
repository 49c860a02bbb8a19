//! QuoteService against an in-memory SQLite database.

mod common;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use common::date;
use orca_core::report::ReportFilter;
use orca_core::{
    ClientId, DiscountMode, DiscountSpec, GroupKey, Money, ProductGroupId, ProductId, QuoteDraft,
    QuoteId,
};
use orca_db::{Database, OrcaConfig, QuoteService, SubmitError};

struct Fixture {
    service: QuoteService,
    ana: ClientId,
    bruno: ClientId,
    papelaria: ProductGroupId,
    servicos: ProductGroupId,
    caneta: ProductId,
    caderno: ProductId,
    instalacao: ProductId,
}

async fn fixture_with(config: OrcaConfig) -> Fixture {
    let db = Database::in_memory().await.unwrap();
    let service = QuoteService::new(db, &config);

    let ana = service.add_client("Ana", Some("ana@example.com"), None).await.unwrap();
    let bruno = service.add_client("Bruno", None, Some(" ")).await.unwrap();
    let papelaria = service.add_product_group("Papelaria").await.unwrap();
    let servicos = service.add_product_group("Serviços").await.unwrap();
    let caneta = service
        .add_product("Caneta", Money::from_cents(10000), Some(papelaria))
        .await
        .unwrap();
    let caderno = service
        .add_product("Caderno", Money::from_cents(5000), Some(papelaria))
        .await
        .unwrap();
    let instalacao = service
        .add_product("Instalação", Money::from_cents(20000), Some(servicos))
        .await
        .unwrap();

    Fixture {
        service,
        ana,
        bruno,
        papelaria,
        servicos,
        caneta,
        caderno,
        instalacao,
    }
}

async fn fixture() -> Fixture {
    fixture_with(OrcaConfig::default()).await
}

impl Fixture {
    /// Saves a quote through a draft; `lines` are (product, quantity).
    async fn save(&self, client: ClientId, day: u32, lines: &[(ProductId, i64)]) -> QuoteId {
        let products = self.service.list_products().await.unwrap();
        let mut draft = QuoteDraft::new(date(2026, 3, day)).with_client(client);
        for (id, qty) in lines {
            let product = products.iter().find(|p| p.id == *id).unwrap();
            draft.add_item(product).unwrap();
            draft.set_quantity(*id, *qty).unwrap();
        }
        self.service.submit_draft(&draft).await.unwrap()
    }
}

// =============================================================================
// Submission and details
// =============================================================================

#[tokio::test]
async fn absolute_discount_roundtrip() {
    let f = fixture().await;
    let products = f.service.list_products().await.unwrap();
    let caneta = products.iter().find(|p| p.id == f.caneta).unwrap();
    let caderno = products.iter().find(|p| p.id == f.caderno).unwrap();

    let mut draft = QuoteDraft::new(date(2026, 3, 10))
        .with_client(f.ana)
        .with_notes("entrega na sexta");
    draft.add_item(caneta).unwrap();
    draft.add_item(caderno).unwrap();
    draft.set_quantity(f.caneta, 2).unwrap();
    draft.set_discount(DiscountSpec::from_input(DiscountMode::Absolute, "50,00"));
    let totals = draft.totals();

    let id = f.service.submit_draft(&draft).await.unwrap();
    let details = f.service.details(id).await.unwrap();

    assert_eq!(details.net_total, totals.net_total);
    assert_eq!(details.net_total.cents(), 20000);
    assert_eq!(details.gross_total.cents(), 25000);
    assert!((details.discount_percent - 20.0).abs() < 1e-9);
    assert!(details.has_discount);
    assert_eq!(details.notes.as_deref(), Some("entrega na sexta"));
    assert_eq!(details.client.name, "Ana");
    assert_eq!(details.client.email.as_deref(), Some("ana@example.com"));

    assert_eq!(details.items.len(), 2);
    assert_eq!(details.items[0].product_name, "Caneta");
    assert_eq!(details.items[0].subtotal.cents(), 20000);
    assert_eq!(details.items[1].product_name, "Caderno");
}

#[tokio::test]
async fn blank_contact_fields_are_not_stored() {
    let f = fixture().await;
    let clients = f.service.list_clients().await.unwrap();
    let bruno = clients.iter().find(|c| c.id == f.bruno).unwrap();
    assert_eq!(bruno.phone, None);
}

#[tokio::test]
async fn details_fall_back_to_item_sum_without_stored_gross() {
    let f = fixture().await;
    let pool = f.service.database().pool();

    // a row written before gross totals were stored
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO orcamentos (cliente_id, created_at, desconto, valor_total) VALUES (?1, ?2, 0, 15000) RETURNING id",
    )
    .bind(f.bruno.get())
    .bind(Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap())
    .fetch_one(pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO orcamento_itens (orcamento_id, produto_id, quantidade, valor_unitario) VALUES (?1, ?2, 3, 5000)",
    )
    .bind(id)
    .bind(f.caderno.get())
    .execute(pool)
    .await
    .unwrap();

    let details = f.service.details(QuoteId(id)).await.unwrap();

    assert_eq!(details.gross_total.cents(), 15000);
    assert!(!details.has_discount);
    assert_eq!(details.print_count, None);
}

#[tokio::test]
async fn details_of_unknown_quote_is_not_found() {
    let f = fixture().await;
    let err = f.service.details(QuoteId(404)).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn failed_items_insert_leaves_no_header() {
    let f = fixture().await;
    let header = QuoteDraft::new(date(2026, 3, 1)).with_client(f.ana).header();

    // product 999 does not exist, so the items insert violates the foreign key
    let items = [common::line(999, 1, 100)];
    let result = f.service.submit(&header, &items).await;

    assert!(matches!(result, Err(SubmitError::ItemsInsertFailed(_))));
    assert_eq!(f.service.database().quotes().count().await.unwrap(), 0);
}

#[tokio::test]
async fn stored_totals_follow_quantity_and_price() {
    let f = fixture().await;
    let header = QuoteDraft::new(date(2026, 3, 1)).with_client(f.ana).header();

    let mut stale = common::line(f.caneta.get(), 2, 10000);
    stale.subtotal = Money::from_cents(1);
    let id = f.service.submit(&header, &[stale]).await.unwrap();

    let details = f.service.details(id).await.unwrap();
    let item_sum: Money = details.items.iter().map(|i| i.subtotal).sum();
    assert_eq!(item_sum.cents(), 20000);
    assert_eq!(details.gross_total, item_sum);
    assert_eq!(details.net_total, item_sum);
}

#[tokio::test]
async fn empty_draft_is_rejected_before_storage() {
    let f = fixture().await;
    let draft = QuoteDraft::new(date(2026, 3, 1)).with_client(f.ana);

    let result = f.service.submit_draft(&draft).await;

    assert!(matches!(result, Err(ref e) if e.is_validation()));
    assert_eq!(f.service.database().quotes().count().await.unwrap(), 0);
}

// =============================================================================
// Print tracking
// =============================================================================

#[tokio::test]
async fn print_tracking_disabled_by_default() {
    let f = fixture().await;
    let id = f.save(f.ana, 1, &[(f.caneta, 1)]).await;

    assert_eq!(f.service.record_print(id).await, None);
    assert_eq!(f.service.details(id).await.unwrap().print_count, None);
}

#[tokio::test]
async fn print_tracking_counts_prints() {
    let config = OrcaConfig {
        track_print_count: true,
        ..OrcaConfig::default()
    };
    let f = fixture_with(config).await;
    let id = f.save(f.ana, 1, &[(f.caneta, 1)]).await;

    assert_eq!(f.service.record_print(id).await, Some(1));
    assert_eq!(f.service.record_print(id).await, Some(2));
    assert_eq!(f.service.details(id).await.unwrap().print_count, Some(2));

    // failures are swallowed
    assert_eq!(f.service.record_print(QuoteId(404)).await, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_prints_are_all_counted() {
    let config = OrcaConfig {
        track_print_count: true,
        ..OrcaConfig::default()
    };
    let f = fixture_with(config).await;
    let id = f.save(f.ana, 1, &[(f.caneta, 1)]).await;
    let service = Arc::new(f.service);

    let prints: Vec<_> = (0..50)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.record_print(id).await })
        })
        .collect();

    let mut counts = Vec::new();
    for print in prints {
        counts.push(print.await.unwrap().unwrap());
    }
    counts.sort_unstable();

    assert_eq!(counts, (1..=50).collect::<Vec<i64>>());
    assert_eq!(service.details(id).await.unwrap().print_count, Some(50));
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn report_filters_and_groups() {
    let f = fixture().await;
    let q1 = f.save(f.ana, 2, &[(f.caneta, 1)]).await; // 100,00
    let q2 = f.save(f.bruno, 5, &[(f.instalacao, 1), (f.caderno, 2)]).await; // 300,00
    let q3 = f.save(f.ana, 5, &[(f.caderno, 1)]).await; // 50,00
    let q4 = f.save(f.bruno, 20, &[(f.caneta, 3)]).await; // 300,00

    // no filter, grouped by client in first-seen order
    let report = f
        .service
        .report(&ReportFilter::default(), GroupKey::Client)
        .await
        .unwrap();
    assert_eq!(report.quote_count, 4);
    assert_eq!(report.grand_total.cents(), 75000);
    assert_eq!(report.groups.len(), 2);
    assert_eq!(report.groups[0].label, "Ana");
    assert_eq!(report.groups[0].subtotal.cents(), 15000);
    assert_eq!(report.groups[1].subtotal.cents(), 60000);

    // inclusive date range
    let filter = ReportFilter {
        start_date: Some(date(2026, 3, 2)),
        end_date: Some(date(2026, 3, 5)),
        ..Default::default()
    };
    let report = f.service.report(&filter, GroupKey::Date).await.unwrap();
    let ids: Vec<_> = report
        .groups
        .iter()
        .flat_map(|g| g.quotes.iter().map(|q| q.id))
        .collect();
    assert_eq!(ids, vec![q1, q2, q3]);
    assert_eq!(report.groups[0].key, "2026-03-02");
    assert_eq!(report.groups[1].label, "05/03/2026");

    // client filter
    let filter = ReportFilter {
        client_id: Some(f.bruno),
        ..Default::default()
    };
    let report = f.service.report(&filter, GroupKey::None).await.unwrap();
    assert_eq!(report.quote_count, 2);
    assert_eq!(report.groups[0].key, "general");
    assert_eq!(report.grand_total.cents(), 60000);

    // product group filter keeps matching quotes and only matching items
    let filter = ReportFilter {
        product_group_id: Some(f.servicos),
        ..Default::default()
    };
    let report = f.service.report(&filter, GroupKey::ProductGroup).await.unwrap();
    assert_eq!(report.quote_count, 1);
    let quote = &report.groups[0].quotes[0];
    assert_eq!(quote.id, q2);
    assert_eq!(quote.items.len(), 1);
    assert_eq!(report.groups[0].label, "Serviços");

    // grouped by first item's group: q2 lands in Serviços even with Papelaria items
    let report = f
        .service
        .report(&ReportFilter::default(), GroupKey::ProductGroup)
        .await
        .unwrap();
    assert_eq!(report.groups.len(), 2);
    assert_eq!(report.groups[0].key, f.papelaria.to_string());
    let papelaria_ids: Vec<_> = report.groups[0].quotes.iter().map(|q| q.id).collect();
    assert_eq!(papelaria_ids, vec![q1, q3, q4]);
    assert_eq!(report.groups[1].quotes[0].id, q2);
}

#[tokio::test]
async fn lookups_are_ordered_by_name() {
    let f = fixture().await;

    let products: Vec<_> = f
        .service
        .list_products()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(products, vec!["Caderno", "Caneta", "Instalação"]);

    let groups: Vec<_> = f
        .service
        .list_product_groups()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(groups, vec!["Papelaria", "Serviços"]);
}

#[tokio::test]
async fn catalogue_validation() {
    let f = fixture().await;

    assert!(f.service.add_client("   ", None, None).await.is_err());
    assert!(f
        .service
        .add_product("Brinde", Money::from_cents(-100), None)
        .await
        .is_err());
}

#[tokio::test]
async fn views_serialize_for_the_front_end() {
    let f = fixture().await;
    let id = f.save(f.ana, 9, &[(f.caneta, 1)]).await;

    let details = serde_json::to_value(f.service.details(id).await.unwrap()).unwrap();
    assert_eq!(details["netTotal"], 10000);
    assert_eq!(details["hasDiscount"], false);
    assert_eq!(details["items"][0]["productName"], "Caneta");

    let report = f
        .service
        .report(&ReportFilter::default(), GroupKey::Client)
        .await
        .unwrap();
    let report = serde_json::to_value(report).unwrap();
    assert_eq!(report["groupBy"], "client");
    assert_eq!(report["quoteCount"], 1);
}
