#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::errors::Error;
    use crate::fx::{FxService, NewFxRate};
    use crate::market_data::{DataSource, Interval, NewPrice, PriceService};
    use crate::portfolio::{
        Portfolio, RecalculationService, SnapshotRepositoryTrait, SnapshotService,
        ValuationRepositoryTrait, ValuationService,
    };
    use crate::storage::memory::{
        InMemoryFxRepository, InMemoryPortfolioRepository, InMemoryPriceRepository,
        InMemorySnapshotRepository, InMemoryTransactionRepository, InMemoryValuationRepository,
    };
    use crate::transactions::{NewTransaction, TransactionType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 15, 30, 0).unwrap()
    }

    fn portfolio(id: &str, base_currency: &str) -> Portfolio {
        Portfolio {
            id: id.to_string(),
            name: format!("Portfolio {}", id),
            base_currency: base_currency.to_string(),
            settings: json!({}),
            created_at: ts(2023, 12, 1),
        }
    }

    struct Fixture {
        fx_repository: Arc<InMemoryFxRepository>,
        price_repository: Arc<InMemoryPriceRepository>,
        transaction_repository: Arc<InMemoryTransactionRepository>,
        portfolio_repository: Arc<InMemoryPortfolioRepository>,
        valuation_repository: Arc<InMemoryValuationRepository>,
        snapshot_repository: Arc<InMemorySnapshotRepository>,
        service: RecalculationService,
    }

    impl Fixture {
        fn new() -> Self {
            let fx_repository = Arc::new(InMemoryFxRepository::new());
            let price_repository = Arc::new(InMemoryPriceRepository::new());
            let transaction_repository = Arc::new(InMemoryTransactionRepository::new());
            let portfolio_repository = Arc::new(InMemoryPortfolioRepository::new());
            let valuation_repository = Arc::new(InMemoryValuationRepository::new());
            let snapshot_repository = Arc::new(InMemorySnapshotRepository::new());

            let fx_service = Arc::new(FxService::new(fx_repository.clone()));
            let price_service = Arc::new(PriceService::new(price_repository.clone()));
            let valuation_service = Arc::new(ValuationService::new(
                transaction_repository.clone(),
                valuation_repository.clone(),
                price_service,
                fx_service,
            ));
            let snapshot_service = Arc::new(SnapshotService::new(
                valuation_repository.clone(),
                snapshot_repository.clone(),
            ));
            let service = RecalculationService::new(
                portfolio_repository.clone(),
                transaction_repository.clone(),
                valuation_service,
                snapshot_service,
            );

            Self {
                fx_repository,
                price_repository,
                transaction_repository,
                portfolio_repository,
                valuation_repository,
                snapshot_repository,
                service,
            }
        }

        fn add_rate(&self, base: &str, quote: &str, at: DateTime<Utc>, rate: Decimal) {
            self.fx_repository
                .add_rate(NewFxRate {
                    base_currency: base.to_string(),
                    quote_currency: quote.to_string(),
                    ts: at,
                    rate,
                    source: DataSource::Frankfurter,
                })
                .unwrap();
        }

        fn add_daily_price(&self, asset: &str, at: DateTime<Utc>, price: Decimal, currency: &str) {
            self.price_repository
                .add_price(NewPrice {
                    asset_id: asset.to_string(),
                    ts: at,
                    price,
                    currency: currency.to_string(),
                    source: DataSource::Yahoo,
                    interval: Interval::Day,
                })
                .unwrap();
        }

        fn add_buy(
            &self,
            portfolio_id: &str,
            asset: &str,
            at: DateTime<Utc>,
            quantity: Decimal,
            price: Decimal,
            currency: &str,
        ) {
            self.transaction_repository
                .add_transaction(NewTransaction {
                    id: None,
                    portfolio_id: portfolio_id.to_string(),
                    asset_id: asset.to_string(),
                    tx_type: TransactionType::Buy,
                    tx_time: at,
                    quantity: Some(quantity),
                    price: Some(price),
                    price_currency: Some(currency.to_string()),
                    fee: Decimal::ZERO,
                    linked_tx_id: None,
                    notes: None,
                    metadata: None,
                })
                .unwrap();
        }
    }

    #[tokio::test]
    async fn recalculates_every_portfolio_when_untargeted() {
        let fixture = Fixture::new();
        let as_of = date(2024, 1, 2);
        fixture.portfolio_repository.add_portfolio(portfolio("p1", "USD"));
        fixture.portfolio_repository.add_portfolio(portfolio("p2", "USD"));

        fixture.add_daily_price("asset-a", ts(2024, 1, 2), dec!(105), "USD");
        fixture.add_buy("p1", "asset-a", ts(2024, 1, 1), dec!(10), dec!(100), "USD");
        fixture.add_buy("p2", "asset-a", ts(2024, 1, 1), dec!(2), dec!(100), "USD");

        fixture.service.recalc(as_of, None).await.unwrap();

        let s1 = fixture
            .snapshot_repository
            .get_snapshot("p1", as_of)
            .unwrap()
            .unwrap();
        let s2 = fixture
            .snapshot_repository
            .get_snapshot("p2", as_of)
            .unwrap()
            .unwrap();
        assert_eq!(s1.total_value_base, dec!(1050));
        assert_eq!(s2.total_value_base, dec!(210));
    }

    #[tokio::test]
    async fn targets_a_single_portfolio() {
        let fixture = Fixture::new();
        let as_of = date(2024, 1, 2);
        fixture.portfolio_repository.add_portfolio(portfolio("p1", "USD"));
        fixture.portfolio_repository.add_portfolio(portfolio("p2", "USD"));

        fixture.add_daily_price("asset-a", ts(2024, 1, 2), dec!(105), "USD");
        fixture.add_buy("p1", "asset-a", ts(2024, 1, 1), dec!(10), dec!(100), "USD");
        fixture.add_buy("p2", "asset-a", ts(2024, 1, 1), dec!(2), dec!(100), "USD");

        fixture.service.recalc(as_of, Some("p1")).await.unwrap();

        assert!(fixture
            .snapshot_repository
            .get_snapshot("p1", as_of)
            .unwrap()
            .is_some());
        assert!(fixture
            .snapshot_repository
            .get_snapshot("p2", as_of)
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn unknown_portfolio_target_is_rejected() {
        let fixture = Fixture::new();

        let err = fixture
            .service
            .recalc(date(2024, 1, 2), Some("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn one_failing_asset_does_not_block_the_portfolio() {
        let fixture = Fixture::new();
        let as_of = date(2024, 1, 2);
        fixture.portfolio_repository.add_portfolio(portfolio("p1", "USD"));

        // asset-a is fine; asset-b quotes in EUR with no EUR/USD rate.
        fixture.add_daily_price("asset-a", ts(2024, 1, 2), dec!(105), "USD");
        fixture.add_daily_price("asset-b", ts(2024, 1, 2), dec!(50), "EUR");
        fixture.add_buy("p1", "asset-a", ts(2024, 1, 1), dec!(10), dec!(100), "USD");
        fixture.add_buy("p1", "asset-b", ts(2024, 1, 1), dec!(5), dec!(40), "USD");

        fixture.service.recalc(as_of, None).await.unwrap();

        assert!(fixture
            .valuation_repository
            .get_fact("p1", "asset-a", as_of)
            .unwrap()
            .is_some());
        assert!(fixture
            .valuation_repository
            .get_fact("p1", "asset-b", as_of)
            .unwrap()
            .is_none());

        // The snapshot still lands, covering the assets that valued.
        let snapshot = fixture
            .snapshot_repository
            .get_snapshot("p1", as_of)
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.total_value_base, dec!(1050));
    }

    #[tokio::test]
    async fn repeated_runs_converge_on_identical_facts() {
        let fixture = Fixture::new();
        let as_of = date(2024, 1, 2);
        fixture.portfolio_repository.add_portfolio(portfolio("p1", "USD"));

        fixture.add_rate("EUR", "USD", ts(2024, 1, 1), dec!(1.10));
        fixture.add_rate("EUR", "USD", ts(2024, 1, 2), dec!(1.12));
        fixture.add_daily_price("asset-a", ts(2024, 1, 2), dec!(105), "EUR");
        fixture.add_buy("p1", "asset-a", ts(2024, 1, 1), dec!(10), dec!(100), "EUR");

        fixture.service.recalc(as_of, None).await.unwrap();
        let mut first = fixture
            .valuation_repository
            .get_fact("p1", "asset-a", as_of)
            .unwrap()
            .unwrap();
        let mut first_snapshot = fixture
            .snapshot_repository
            .get_snapshot("p1", as_of)
            .unwrap()
            .unwrap();

        fixture.service.recalc(as_of, None).await.unwrap();
        let mut second = fixture
            .valuation_repository
            .get_fact("p1", "asset-a", as_of)
            .unwrap()
            .unwrap();
        let mut second_snapshot = fixture
            .snapshot_repository
            .get_snapshot("p1", as_of)
            .unwrap()
            .unwrap();

        first.calculated_at = DateTime::UNIX_EPOCH;
        second.calculated_at = DateTime::UNIX_EPOCH;
        assert_eq!(first, second);

        first_snapshot.calculated_at = DateTime::UNIX_EPOCH;
        second_snapshot.calculated_at = DateTime::UNIX_EPOCH;
        assert_eq!(first_snapshot, second_snapshot);
    }
}
