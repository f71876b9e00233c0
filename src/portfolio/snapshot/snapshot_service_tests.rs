#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::portfolio::{
        Portfolio, PortfolioSnapshot, PositionValuationDaily, SnapshotRepositoryTrait,
        SnapshotService, SnapshotServiceTrait, ValuationRepositoryTrait,
    };
    use crate::storage::memory::{InMemorySnapshotRepository, InMemoryValuationRepository};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn usd_portfolio() -> Portfolio {
        Portfolio {
            id: "p1".to_string(),
            name: "Main".to_string(),
            base_currency: "USD".to_string(),
            settings: json!({}),
            created_at: Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap(),
        }
    }

    fn fact(asset: &str, valuation_date: NaiveDate, value_base: Decimal) -> PositionValuationDaily {
        PositionValuationDaily {
            id: PositionValuationDaily::make_id("p1", asset, valuation_date),
            portfolio_id: "p1".to_string(),
            asset_id: asset.to_string(),
            valuation_date,
            quantity: Decimal::ONE,
            price: value_base,
            price_currency: "USD".to_string(),
            fx_rate: Decimal::ONE,
            value_base,
            cost_basis_base: value_base,
            realized_pnl_base: Decimal::ZERO,
            unrealized_pnl_base: Decimal::ZERO,
            income_base: Decimal::ZERO,
            metadata: json!({}),
            calculated_at: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        }
    }

    struct Fixture {
        valuation_repository: Arc<InMemoryValuationRepository>,
        snapshot_repository: Arc<InMemorySnapshotRepository>,
        service: SnapshotService,
    }

    impl Fixture {
        fn new() -> Self {
            let valuation_repository = Arc::new(InMemoryValuationRepository::new());
            let snapshot_repository = Arc::new(InMemorySnapshotRepository::new());
            let service = SnapshotService::new(
                valuation_repository.clone(),
                snapshot_repository.clone(),
            );
            Self {
                valuation_repository,
                snapshot_repository,
                service,
            }
        }

        async fn seed(&self, facts: Vec<PositionValuationDaily>) {
            for f in facts {
                self.valuation_repository.upsert_fact(f).await.unwrap();
            }
        }
    }

    #[tokio::test]
    async fn sums_all_positions_for_the_day() {
        let fixture = Fixture::new();
        let as_of = date(2024, 1, 2);
        fixture
            .seed(vec![
                fact("asset-a", as_of, dec!(100)),
                fact("asset-b", as_of, dec!(250)),
            ])
            .await;

        let snapshot = fixture
            .service
            .recompute(&usd_portfolio(), as_of)
            .await
            .unwrap();

        assert_eq!(snapshot.id, "p1_2024-01-02");
        assert_eq!(snapshot.base_currency, "USD");
        assert_eq!(snapshot.total_value_base, dec!(350));
    }

    #[tokio::test]
    async fn deltas_compare_against_prior_day_facts() {
        let fixture = Fixture::new();
        let as_of = date(2024, 2, 1);
        fixture
            .seed(vec![
                fact("asset-a", as_of, dec!(350)),
                fact("asset-a", as_of - chrono::Duration::days(1), dec!(300)),
                fact("asset-a", as_of - chrono::Duration::days(30), dec!(200)),
            ])
            .await;

        let snapshot = fixture
            .service
            .recompute(&usd_portfolio(), as_of)
            .await
            .unwrap();

        assert_eq!(snapshot.pnl_1d_base, dec!(50));
        // No facts 7 days back: the window baseline is zero.
        assert_eq!(snapshot.pnl_7d_base, dec!(350));
        assert_eq!(snapshot.pnl_30d_base, dec!(150));
    }

    #[tokio::test]
    async fn empty_day_snapshots_to_zero() {
        let fixture = Fixture::new();

        let snapshot = fixture
            .service
            .recompute(&usd_portfolio(), date(2024, 1, 2))
            .await
            .unwrap();

        assert_eq!(snapshot.total_value_base, Decimal::ZERO);
        assert_eq!(snapshot.pnl_1d_base, Decimal::ZERO);
        assert_eq!(snapshot.pnl_30d_base, Decimal::ZERO);
    }

    #[tokio::test]
    async fn recompute_replaces_the_stored_snapshot() {
        let fixture = Fixture::new();
        let as_of = date(2024, 1, 2);

        // A stale snapshot from a run before the facts changed.
        fixture
            .snapshot_repository
            .save_snapshot(PortfolioSnapshot {
                id: PortfolioSnapshot::make_id("p1", as_of),
                portfolio_id: "p1".to_string(),
                snapshot_date: as_of,
                base_currency: "USD".to_string(),
                total_value_base: dec!(999),
                pnl_1d_base: dec!(999),
                pnl_7d_base: dec!(999),
                pnl_30d_base: dec!(999),
                calculated_at: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            })
            .await
            .unwrap();

        fixture.seed(vec![fact("asset-a", as_of, dec!(100))]).await;
        fixture
            .service
            .recompute(&usd_portfolio(), as_of)
            .await
            .unwrap();

        let stored = fixture
            .snapshot_repository
            .get_snapshot("p1", as_of)
            .unwrap()
            .unwrap();
        assert_eq!(stored.total_value_base, dec!(100));
        assert_eq!(stored.pnl_1d_base, dec!(100));
    }
}
