//! In-memory reference backend for the feed and derived-fact stores.
//!
//! Honors the same contracts a database-backed implementation must:
//! latest-at-or-before lookups on the feeds, unique observation keys, and
//! delete-then-insert idempotence on the derived facts. Used by the test
//! suite and by embedders that want the engine without a storage engine.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::Result;
use crate::fx::{FxError, FxRate, FxRepositoryTrait, NewFxRate};
use crate::market_data::{
    Interval, MarketDataError, NewPrice, Price, PriceRepositoryTrait,
};
use crate::portfolio::{
    Portfolio, PortfolioRepositoryTrait, PortfolioSnapshot, PositionValuationDaily,
    SnapshotRepositoryTrait, ValuationRepositoryTrait,
};
use crate::transactions::{NewTransaction, Transaction, TransactionRepositoryTrait};

#[derive(Default)]
pub struct InMemoryFxRepository {
    // (base, quote) -> observations
    rates: DashMap<(String, String), Vec<FxRate>>,
}

impl InMemoryFxRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rate(&self, new_rate: NewFxRate) -> Result<FxRate> {
        if new_rate.rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(format!(
                "{}/{} rate must be positive, got {}",
                new_rate.base_currency, new_rate.quote_currency, new_rate.rate
            ))
            .into());
        }

        let rate = FxRate {
            id: Uuid::new_v4().to_string(),
            base_currency: new_rate.base_currency,
            quote_currency: new_rate.quote_currency,
            ts: new_rate.ts,
            rate: new_rate.rate,
            source: new_rate.source,
        };

        let key = (rate.base_currency.clone(), rate.quote_currency.clone());
        let mut entries = self.rates.entry(key).or_default();
        // Unique on (base, quote, ts, source): a re-observation replaces.
        entries.retain(|r| !(r.ts == rate.ts && r.source == rate.source));
        entries.push(rate.clone());
        Ok(rate)
    }
}

impl FxRepositoryTrait for InMemoryFxRepository {
    fn get_latest_rate_for_date(
        &self,
        base_currency: &str,
        quote_currency: &str,
        as_of: NaiveDate,
    ) -> Result<Option<FxRate>> {
        let key = (base_currency.to_string(), quote_currency.to_string());
        Ok(self.rates.get(&key).and_then(|entries| {
            entries
                .iter()
                .filter(|r| r.ts.date_naive() <= as_of)
                .max_by_key(|r| r.ts)
                .cloned()
        }))
    }
}

#[derive(Default)]
pub struct InMemoryPriceRepository {
    // asset_id -> observations
    prices: DashMap<String, Vec<Price>>,
}

impl InMemoryPriceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_price(&self, new_price: NewPrice) -> Result<Price> {
        if new_price.price <= Decimal::ZERO {
            return Err(MarketDataError::InvalidPrice(format!(
                "{} price must be positive, got {}",
                new_price.asset_id, new_price.price
            ))
            .into());
        }

        let price = Price {
            id: Uuid::new_v4().to_string(),
            asset_id: new_price.asset_id,
            ts: new_price.ts,
            price: new_price.price,
            currency: new_price.currency,
            source: new_price.source,
            interval: new_price.interval,
            metadata: serde_json::Value::Object(serde_json::Map::new()),
            created_at: Utc::now(),
        };

        let mut entries = self.prices.entry(price.asset_id.clone()).or_default();
        // Unique on (asset, ts, source, interval): a re-observation replaces.
        entries.retain(|p| {
            !(p.ts == price.ts && p.source == price.source && p.interval == price.interval)
        });
        entries.push(price.clone());
        Ok(price)
    }
}

impl PriceRepositoryTrait for InMemoryPriceRepository {
    fn get_latest_price_for_date(
        &self,
        asset_id: &str,
        interval: Interval,
        as_of: NaiveDate,
    ) -> Result<Option<Price>> {
        Ok(self.prices.get(asset_id).and_then(|entries| {
            entries
                .iter()
                .filter(|p| p.interval == interval && p.ts.date_naive() <= as_of)
                .max_by_key(|p| p.ts)
                .cloned()
        }))
    }
}

#[derive(Default)]
pub struct InMemoryTransactionRepository {
    // portfolio_id -> ledger entries
    transactions: DashMap<String, Vec<Transaction>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transaction(&self, new_tx: NewTransaction) -> Result<Transaction> {
        new_tx.validate()?;

        let tx = Transaction {
            id: new_tx.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            portfolio_id: new_tx.portfolio_id,
            asset_id: new_tx.asset_id,
            tx_type: new_tx.tx_type,
            tx_time: new_tx.tx_time,
            quantity: new_tx.quantity,
            price: new_tx.price,
            price_currency: new_tx.price_currency,
            fee: new_tx.fee,
            linked_tx_id: new_tx.linked_tx_id,
            notes: new_tx.notes,
            metadata: new_tx
                .metadata
                .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new())),
            created_at: Utc::now(),
        };

        self.transactions
            .entry(tx.portfolio_id.clone())
            .or_default()
            .push(tx.clone());
        Ok(tx)
    }
}

impl TransactionRepositoryTrait for InMemoryTransactionRepository {
    fn get_for_asset_until(
        &self,
        portfolio_id: &str,
        asset_id: &str,
        as_of: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let mut matching: Vec<Transaction> = self
            .transactions
            .get(portfolio_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|tx| tx.asset_id == asset_id && tx.tx_time.date_naive() <= as_of)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        matching.sort_by(|a, b| (a.tx_time, a.id.as_str()).cmp(&(b.tx_time, b.id.as_str())));
        Ok(matching)
    }

    fn get_active_asset_ids(&self, portfolio_id: &str, as_of: NaiveDate) -> Result<Vec<String>> {
        let asset_ids: BTreeSet<String> = self
            .transactions
            .get(portfolio_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|tx| tx.tx_time.date_naive() <= as_of)
                    .map(|tx| tx.asset_id.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(asset_ids.into_iter().collect())
    }
}

#[derive(Default)]
pub struct InMemoryPortfolioRepository {
    portfolios: DashMap<String, Portfolio>,
}

impl InMemoryPortfolioRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_portfolio(&self, portfolio: Portfolio) {
        self.portfolios.insert(portfolio.id.clone(), portfolio);
    }
}

impl PortfolioRepositoryTrait for InMemoryPortfolioRepository {
    fn get_portfolio(&self, portfolio_id: &str) -> Result<Option<Portfolio>> {
        Ok(self
            .portfolios
            .get(portfolio_id)
            .map(|p| p.value().clone()))
    }

    fn list_portfolios(&self) -> Result<Vec<Portfolio>> {
        let mut portfolios: Vec<Portfolio> =
            self.portfolios.iter().map(|p| p.value().clone()).collect();
        portfolios.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(portfolios)
    }
}

#[derive(Default)]
pub struct InMemoryValuationRepository {
    // (portfolio_id, asset_id, valuation_date) -> fact
    facts: DashMap<(String, String, NaiveDate), PositionValuationDaily>,
}

impl InMemoryValuationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ValuationRepositoryTrait for InMemoryValuationRepository {
    fn get_fact(
        &self,
        portfolio_id: &str,
        asset_id: &str,
        valuation_date: NaiveDate,
    ) -> Result<Option<PositionValuationDaily>> {
        let key = (
            portfolio_id.to_string(),
            asset_id.to_string(),
            valuation_date,
        );
        Ok(self.facts.get(&key).map(|f| f.value().clone()))
    }

    fn get_facts_for_date(
        &self,
        portfolio_id: &str,
        valuation_date: NaiveDate,
    ) -> Result<Vec<PositionValuationDaily>> {
        let mut facts: Vec<PositionValuationDaily> = self
            .facts
            .iter()
            .filter(|entry| {
                let (portfolio, _, date) = entry.key();
                portfolio == portfolio_id && *date == valuation_date
            })
            .map(|entry| entry.value().clone())
            .collect();
        facts.sort_by(|a, b| a.asset_id.cmp(&b.asset_id));
        Ok(facts)
    }

    async fn upsert_fact(&self, fact: PositionValuationDaily) -> Result<PositionValuationDaily> {
        let key = (
            fact.portfolio_id.clone(),
            fact.asset_id.clone(),
            fact.valuation_date,
        );
        // Delete-then-insert scoped to the key.
        self.facts.remove(&key);
        self.facts.insert(key, fact.clone());
        Ok(fact)
    }

    async fn delete_fact(
        &self,
        portfolio_id: &str,
        asset_id: &str,
        valuation_date: NaiveDate,
    ) -> Result<()> {
        let key = (
            portfolio_id.to_string(),
            asset_id.to_string(),
            valuation_date,
        );
        self.facts.remove(&key);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySnapshotRepository {
    // (portfolio_id, snapshot_date) -> snapshot
    snapshots: DashMap<(String, NaiveDate), PortfolioSnapshot>,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for InMemorySnapshotRepository {
    fn get_snapshot(
        &self,
        portfolio_id: &str,
        snapshot_date: NaiveDate,
    ) -> Result<Option<PortfolioSnapshot>> {
        let key = (portfolio_id.to_string(), snapshot_date);
        Ok(self.snapshots.get(&key).map(|s| s.value().clone()))
    }

    async fn save_snapshot(&self, snapshot: PortfolioSnapshot) -> Result<PortfolioSnapshot> {
        let key = (snapshot.portfolio_id.clone(), snapshot.snapshot_date);
        self.snapshots.insert(key, snapshot.clone());
        Ok(snapshot)
    }

    async fn delete_snapshot(&self, portfolio_id: &str, snapshot_date: NaiveDate) -> Result<()> {
        let key = (portfolio_id.to_string(), snapshot_date);
        self.snapshots.remove(&key);
        Ok(())
    }
}
