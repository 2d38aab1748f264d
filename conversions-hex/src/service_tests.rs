//! ConversionService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use conversions_types::{
        AppError, ConversionId, ConversionRecord, ConversionRepository, CurrencyCount,
        NewConversion, PairStat, RepoError, SaveConversionRequest, SavedConversion,
    };

    use crate::ConversionService;

    /// Simple in-memory repository for testing the service layer.
    pub struct MockRepo {
        records: Mutex<Vec<ConversionRecord>>,
        fail: bool,
    }

    impl MockRepo {
        pub fn new() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        /// A repository whose every call fails.
        pub fn failing() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn check(&self) -> Result<(), RepoError> {
            if self.fail {
                Err(RepoError::Database("connection reset".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ConversionRepository for MockRepo {
        async fn save_conversion(
            &self,
            conversion: NewConversion,
        ) -> Result<SavedConversion, RepoError> {
            self.check()?;
            let mut records = self.records.lock().unwrap();
            let record = ConversionRecord {
                id: ConversionId::from_i64(records.len() as i64 + 1),
                amount: conversion.amount,
                from_currency: conversion.from_currency,
                to_currency: conversion.to_currency,
                conversion_rate: conversion.rate,
                converted_amount: conversion.converted_amount,
                created_at: Utc::now(),
            };
            let saved = SavedConversion {
                id: record.id,
                created_at: record.created_at,
            };
            records.push(record);
            Ok(saved)
        }

        async fn conversion_history(
            &self,
            limit: i64,
        ) -> Result<Vec<ConversionRecord>, RepoError> {
            self.check()?;
            let records = self.records.lock().unwrap();
            let take = usize::try_from(limit).unwrap_or(usize::MAX);
            Ok(records.iter().rev().take(take).cloned().collect())
        }

        async fn pair_stats(&self) -> Result<Vec<PairStat>, RepoError> {
            self.check()?;
            let mut counts: HashMap<(String, String), i64> = HashMap::new();
            for r in self.records.lock().unwrap().iter() {
                *counts
                    .entry((r.from_currency.clone(), r.to_currency.clone()))
                    .or_default() += 1;
            }
            let mut stats: Vec<PairStat> = counts
                .into_iter()
                .map(|((from_currency, to_currency), count)| PairStat {
                    from_currency,
                    to_currency,
                    count,
                })
                .collect();
            stats.sort_by(|a, b| b.count.cmp(&a.count));
            stats.truncate(5);
            Ok(stats)
        }

        async fn currency_distribution(&self) -> Result<Vec<CurrencyCount>, RepoError> {
            self.check()?;
            let mut counts: HashMap<String, i64> = HashMap::new();
            for r in self.records.lock().unwrap().iter() {
                *counts.entry(r.from_currency.clone()).or_default() += 1;
                *counts.entry(r.to_currency.clone()).or_default() += 1;
            }
            let mut distribution: Vec<CurrencyCount> = counts
                .into_iter()
                .map(|(currency_code, count)| CurrencyCount {
                    currency_code,
                    count,
                })
                .collect();
            distribution.sort_by(|a, b| b.count.cmp(&a.count));
            distribution.truncate(10);
            Ok(distribution)
        }
    }

    fn create_service() -> ConversionService<MockRepo> {
        ConversionService::new(MockRepo::new())
    }

    fn request(from: &str, to: &str) -> SaveConversionRequest {
        SaveConversionRequest {
            amount: Some(Decimal::new(100, 0)),
            from_currency: Some(from.into()),
            to_currency: Some(to.into()),
            rate: Some(Decimal::new(9, 1)),
            converted_amount: Some(Decimal::new(90, 0)),
        }
    }

    #[tokio::test]
    async fn test_save_conversion() {
        let service = create_service();

        let saved = service.save_conversion(request("USD", "EUR")).await.unwrap();

        assert_eq!(saved.id, ConversionId::from_i64(1));
        let history = service.conversion_history(10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].conversion_rate, Decimal::new(9, 1));
    }

    #[tokio::test]
    async fn test_save_conversion_missing_field() {
        let service = create_service();
        let mut req = request("USD", "EUR");
        req.rate = None;

        let result = service.save_conversion(req).await;

        assert_eq!(
            result,
            Err(AppError::BadRequest("Missing required fields".into()))
        );
        assert!(service.repo().records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_conversion_zero_amount() {
        let service = create_service();
        let mut req = request("USD", "EUR");
        req.amount = Some(Decimal::ZERO);

        let result = service.save_conversion(req).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(service.repo().records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let service = create_service();
        service.save_conversion(request("USD", "EUR")).await.unwrap();
        service.save_conversion(request("GBP", "JPY")).await.unwrap();

        let history = service.conversion_history(1).await.unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].from_currency, "GBP");
    }

    #[tokio::test]
    async fn test_stats_and_distribution() {
        let service = create_service();
        for (from, to) in [("USD", "EUR"), ("USD", "EUR"), ("EUR", "USD")] {
            service.save_conversion(request(from, to)).await.unwrap();
        }

        let stats = service.pair_stats().await.unwrap();
        assert_eq!(stats[0].from_currency, "USD");
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[1].count, 1);

        let distribution = service.currency_distribution().await.unwrap();
        assert_eq!(distribution.len(), 2);
        assert!(distribution.iter().all(|c| c.count == 3));
    }

    #[tokio::test]
    async fn test_repository_failures_are_hidden() {
        let service = ConversionService::new(MockRepo::failing());

        assert_eq!(
            service.save_conversion(request("USD", "EUR")).await,
            Err(AppError::Internal("Failed to save conversion".into()))
        );
        assert_eq!(
            service.conversion_history(10).await,
            Err(AppError::Internal(
                "Failed to fetch conversion history".into()
            ))
        );
        assert_eq!(
            service.pair_stats().await,
            Err(AppError::Internal(
                "Failed to fetch conversion statistics".into()
            ))
        );
        assert_eq!(
            service.currency_distribution().await,
            Err(AppError::Internal(
                "Failed to fetch currency distribution".into()
            ))
        );
    }
}
